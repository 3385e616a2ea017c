//! Built-in marketplace catalog used by the in-memory backend. Ids match the
//! seed migration so both backends serve the same services.

use crate::domain::{AvailableService, BillingCycle, Cost, ServiceName, ServicePlan};
use uuid::{uuid, Uuid};

pub const NETFLIX_ID: Uuid = uuid!("7f3b9e2a-5c41-4d8a-9f06-1b2a8c4d5e6f");
pub const SPOTIFY_ID: Uuid = uuid!("3c9d1f4e-8a25-4b07-8c3d-9e0f1a2b3c4d");
pub const DISNEY_PLUS_ID: Uuid = uuid!("5e8a2b7c-1d93-47f5-a6b8-0c1d2e3f4a5b");
pub const ADOBE_CC_ID: Uuid = uuid!("9b4c6d8e-2f07-4a19-b3c5-d7e9f0a1b2c3");
pub const MICROSOFT_365_ID: Uuid = uuid!("1a5b8c2d-6e49-40d3-8e7f-a9b0c1d2e3f4");
pub const DROPBOX_ID: Uuid = uuid!("6d2e9f3a-7b58-49c1-9a4b-5c6d7e8f9a0b");

pub fn builtin_services() -> Vec<AvailableService> {
    vec![
        service(
            NETFLIX_ID,
            "Netflix",
            "Streaming",
            "https://logo.clearbit.com/netflix.com",
            "Stream award-winning films, series and documentaries.",
            "7.99",
            true,
            &["Unlimited streaming", "Cancel anytime", "Watch on any device"],
            Some("https://www.netflix.com"),
            vec![
                plan(
                    uuid!("b8e1f0c3-9d2a-4e57-8b19-3f6a0c5d7e92"),
                    "Standard with ads",
                    "7.99",
                    BillingCycle::Monthly,
                    &["1080p Full HD", "Watch on 2 devices"],
                ),
                plan(
                    uuid!("4a7c2e9f-0b1d-483a-9c6e-2d5f8a1b4c7e"),
                    "Standard",
                    "15.49",
                    BillingCycle::Monthly,
                    &["1080p Full HD", "Watch on 2 devices", "Ad-free"],
                ),
                plan(
                    uuid!("e3b6d9a2-5c8f-4071-b4d7-8e1a3c6f9b20"),
                    "Premium",
                    "22.99",
                    BillingCycle::Monthly,
                    &["4K Ultra HD", "Watch on 4 devices", "Ad-free", "Spatial audio"],
                ),
            ],
        ),
        service(
            SPOTIFY_ID,
            "Spotify",
            "Music",
            "https://logo.clearbit.com/spotify.com",
            "Music and podcasts for every moment.",
            "11.99",
            true,
            &["Ad-free music", "Offline listening", "Podcasts included"],
            Some("https://open.spotify.com"),
            vec![
                plan(
                    uuid!("2c5f8b1e-4a7d-4093-86c9-e2f5a8b1d4c7"),
                    "Individual",
                    "11.99",
                    BillingCycle::Monthly,
                    &["1 Premium account", "Ad-free music"],
                ),
                plan(
                    uuid!("917e4a6c-3b0d-4f28-a5c7-1e9b3d6f8a0c"),
                    "Duo",
                    "16.99",
                    BillingCycle::Monthly,
                    &["2 Premium accounts", "Ad-free music"],
                ),
                plan(
                    uuid!("d0a3c6e9-2f5b-481d-97a0-c3e6f9b2d5a8"),
                    "Family",
                    "19.99",
                    BillingCycle::Monthly,
                    &["6 Premium accounts", "Explicit content filter"],
                ),
            ],
        ),
        service(
            DISNEY_PLUS_ID,
            "Disney+",
            "Streaming",
            "https://logo.clearbit.com/disneyplus.com",
            "The home of Disney, Pixar, Marvel, Star Wars and National Geographic.",
            "9.99",
            false,
            &["New releases", "Exclusive originals", "Family profiles"],
            Some("https://www.disneyplus.com"),
            vec![
                plan(
                    uuid!("68b1d4f7-0a3c-4e69-82b5-d8f1a4c7e0b3"),
                    "Basic",
                    "9.99",
                    BillingCycle::Monthly,
                    &["1080p Full HD", "2 concurrent streams"],
                ),
                plan(
                    uuid!("f5a8c1e4-7b0d-4326-95c8-b1e4f7a0d3c6"),
                    "Premium",
                    "139.99",
                    BillingCycle::Annual,
                    &["4K Ultra HD", "4 concurrent streams", "Downloads"],
                ),
            ],
        ),
        service(
            ADOBE_CC_ID,
            "Adobe Creative Cloud",
            "Software",
            "https://logo.clearbit.com/adobe.com",
            "Creative apps and services for photography, design and video.",
            "19.99",
            true,
            &["20+ creative apps", "100GB cloud storage", "Adobe Fonts"],
            Some("https://creativecloud.adobe.com"),
            vec![
                plan(
                    uuid!("3e6a9d2f-5c8b-41e4-a7d0-f3a6c9e2b5d8"),
                    "Photography",
                    "19.99",
                    BillingCycle::Monthly,
                    &["Photoshop", "Lightroom", "20GB storage"],
                ),
                plan(
                    uuid!("a2d5f8b1-4e7c-40a3-b6e9-2c5f8b1e4a7d"),
                    "All Apps",
                    "59.99",
                    BillingCycle::Monthly,
                    &["20+ apps", "100GB storage"],
                ),
                plan(
                    uuid!("7c0e3a6d-9f2b-458e-81b4-d7f0a3c6e9b2"),
                    "All Apps Annual",
                    "659.88",
                    BillingCycle::Annual,
                    &["20+ apps", "100GB storage", "Two months free"],
                ),
            ],
        ),
        service(
            MICROSOFT_365_ID,
            "Microsoft 365",
            "Software",
            "https://logo.clearbit.com/microsoft.com",
            "Premium Office apps with cloud storage and security.",
            "9.99",
            false,
            &["Word, Excel, PowerPoint", "1TB OneDrive storage", "Works across devices"],
            Some("https://www.office.com"),
            vec![
                plan(
                    uuid!("c9b2e5a8-1d4f-47b0-a3d6-f9c2e5a8b1d4"),
                    "Personal",
                    "9.99",
                    BillingCycle::Monthly,
                    &["1 person", "1TB storage"],
                ),
                plan(
                    uuid!("5f8b1e4a-7d0c-43f6-89c2-e5a8b1d4f7a0"),
                    "Family",
                    "12.99",
                    BillingCycle::Monthly,
                    &["Up to 6 people", "6TB storage"],
                ),
                plan(
                    uuid!("0d3f6a9c-2e5b-4c81-b4a7-c0d3f6a9c2e5"),
                    "Personal Annual",
                    "99.99",
                    BillingCycle::Annual,
                    &["1 person", "1TB storage", "Two months free"],
                ),
            ],
        ),
        service(
            DROPBOX_ID,
            "Dropbox",
            "Storage",
            "https://logo.clearbit.com/dropbox.com",
            "Secure cloud storage and file sharing.",
            "11.99",
            false,
            &["Secure file storage", "Easy sharing", "Automatic backup"],
            Some("https://www.dropbox.com"),
            vec![
                plan(
                    uuid!("8a1c4e7b-0d3f-46a9-92e5-b8a1c4e7b0d3"),
                    "Plus",
                    "11.99",
                    BillingCycle::Monthly,
                    &["2TB storage", "File recovery"],
                ),
                plan(
                    uuid!("e4f7a0c3-6b9d-4258-a1c4-d7e0f3a6b9d2"),
                    "Essentials",
                    "19.99",
                    BillingCycle::Monthly,
                    &["3TB storage", "Signatures", "PDF editing"],
                ),
                plan(
                    uuid!("1b4d7f0a-3c6e-49b2-85d8-f1b4d7f0a3c6"),
                    "Plus Annual",
                    "119.88",
                    BillingCycle::Annual,
                    &["2TB storage", "File recovery", "Two months free"],
                ),
            ],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn service(
    id: Uuid,
    name: &str,
    category: &str,
    logo_url: &str,
    description: &str,
    base_price: &str,
    is_popular: bool,
    features: &[&str],
    launch_url: Option<&str>,
    plans: Vec<ServicePlan>,
) -> AvailableService {
    AvailableService {
        id,
        name: ServiceName::parse(name.to_string()).expect("catalog service name is valid"),
        category: category.to_string(),
        logo_url: logo_url.to_string(),
        description: description.to_string(),
        base_price: Cost::parse(base_price.to_string()).expect("catalog price is valid"),
        plans,
        is_popular,
        features: features.iter().map(|s| s.to_string()).collect(),
        launch_url: launch_url.map(|s| s.to_string()),
    }
}

fn plan(
    id: Uuid,
    name: &str,
    price: &str,
    cycle: BillingCycle,
    features: &[&str],
) -> ServicePlan {
    ServicePlan {
        id,
        name: name.to_string(),
        price: Cost::parse(price.to_string()).expect("catalog price is valid"),
        billing_cycle: cycle,
        features: features.iter().map(|s| s.to_string()).collect(),
    }
}

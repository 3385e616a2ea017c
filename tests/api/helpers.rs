use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use subtrackr::{
    configuration::{get_configuration, StorageBackend},
    startup::Application,
    storage::InMemoryStore,
    telemetry::{get_subscriber, init_subscriber},
};
use time::{macros::format_description, Date};

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

static FAILED_TO_EXECUTE_REQUEST: &'static str = "Failed to execute request";

pub struct TestApp {
    pub address: SocketAddr,
    pub store: Arc<InMemoryStore>,
    client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Failed to read configuration");
        config.application.port = 0;
        config.application.cookie_secure = false;
        config.database.backend = StorageBackend::Memory;

        let store = Arc::new(InMemoryStore::new());
        let app = Application::build_with_store(config, store.clone()).await;
        let address = app.local_addr();

        tokio::spawn(app.run_until_stopped());

        Self {
            address,
            store,
            client: cookie_client(),
        }
    }

    /// Logs the default persona in and returns the user object.
    pub async fn login(&self) -> Value {
        let response = self
            .post_login(&json!({ "email": "ada@example.com", "name": "Ada" }))
            .await;
        assert_eq!(response.status(), 200, "login failed during test setup");
        response.json::<Value>().await.expect("Failed to parse login response")["user"].clone()
    }

    pub async fn get_health_check(&self) -> Response {
        self.client
            .get(self.url("/health_check"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_login(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_logout(&self) -> Response {
        self.client
            .post(self.url("/api/auth/logout"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_me(&self) -> Response {
        self.client
            .get(self.url("/api/auth/me"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_subscriptions(&self) -> Response {
        self.get_subscriptions_with("").await
    }

    /// `query` is appended verbatim, e.g. `"?costRange=under-10"`.
    pub async fn get_subscriptions_with(&self, query: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/subscriptions{query}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_expiring_subscriptions(&self, query: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/subscriptions/expiring{query}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_subscription(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/api/subscriptions"))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_subscription(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/subscriptions/{id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn patch_subscription(&self, id: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(&format!("/api/subscriptions/{id}")))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn delete_subscription(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/api/subscriptions/{id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_subscribe(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/api/subscriptions/subscribe"))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_launch(&self, id: &str) -> Response {
        self.client
            .post(self.url(&format!("/api/subscriptions/{id}/launch")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_launch_stats(&self) -> Response {
        self.client
            .get(self.url("/api/users/launch-stats"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_available_services(&self) -> Response {
        self.client
            .get(self.url("/api/available-services"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_available_service(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/available-services/{id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_dashboard_summary(&self) -> Response {
        self.client
            .get(self.url("/api/dashboard/summary"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

/// A second browser, for cross-tenant tests: fresh cookie jar, same app.
pub struct OtherUser<'a> {
    app: &'a TestApp,
    client: Client,
}

impl<'a> OtherUser<'a> {
    pub async fn login(app: &'a TestApp, email: &str) -> OtherUser<'a> {
        let client = cookie_client();
        let response = client
            .post(app.url("/api/auth/login"))
            .json(&json!({ "email": email, "name": "Grace" }))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST);
        assert_eq!(response.status(), 200, "login failed during test setup");
        OtherUser { app, client }
    }

    pub async fn get_subscriptions(&self) -> Response {
        self.client
            .get(self.app.url("/api/subscriptions"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn patch_subscription(&self, id: &str, body: &Value) -> Response {
        self.client
            .patch(self.app.url(&format!("/api/subscriptions/{id}")))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn delete_subscription(&self, id: &str) -> Response {
        self.client
            .delete(self.app.url(&format!("/api/subscriptions/{id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_launch(&self, id: &str) -> Response {
        self.client
            .post(self.app.url(&format!("/api/subscriptions/{id}/launch")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_launch_stats(&self) -> Response {
        self.client
            .get(self.app.url("/api/users/launch-stats"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_dashboard_summary(&self) -> Response {
        self.client
            .get(self.app.url("/api/dashboard/summary"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }
}

fn cookie_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build an http client")
}

pub fn iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .expect("Failed to format date")
}

pub fn subscription_body(name: &str, cost: &str, renewal_date: &str) -> Value {
    json!({
        "name": name,
        "cost": cost,
        "billingCycle": "monthly",
        "renewalDate": renewal_date,
        "status": "active",
    })
}

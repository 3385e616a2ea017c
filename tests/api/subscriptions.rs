use crate::helpers::{iso_date, subscription_body, OtherUser, TestApp};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};

#[tokio::test]
async fn creating_a_subscription_returns_201_with_a_generated_id() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let body = json!({
        "name": "Netflix",
        "cost": "15.99",
        "billingCycle": "monthly",
        "renewalDate": "2025-01-01",
        "status": "active",
    });

    // when
    let response = app.post_subscription(&body).await;

    // then
    assert_eq!(response.status(), 201);
    let created = response.json::<Value>().await.unwrap();
    assert!(created["id"].is_string());
    assert_eq!(created["name"], "Netflix");
    assert_eq!(created["cost"], "15.99");
    assert_eq!(created["renewalDate"], "2025-01-01");
    assert_eq!(created["ownerEmail"], "ada@example.com");
}

#[tokio::test]
async fn a_created_subscription_can_be_listed_and_deleted() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let created = app
        .post_subscription(&subscription_body("Netflix", "15.99", "2025-01-01"))
        .await
        .json::<Value>()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    // when / then
    let listed = app.get_subscriptions().await.json::<Value>().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"].as_str().unwrap(), id);

    assert_eq!(app.delete_subscription(id).await.status(), 204);

    let listed = app.get_subscriptions().await.json::<Value>().await.unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn renewal_dates_survive_a_round_trip() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let created = app
        .post_subscription(&subscription_body("Netflix", "15.99", "2025-01-15"))
        .await
        .json::<Value>()
        .await
        .unwrap();

    // when
    let fetched = app
        .get_subscription(created["id"].as_str().unwrap())
        .await
        .json::<Value>()
        .await
        .unwrap();

    // then
    assert_eq!(fetched["renewalDate"], "2025-01-15");
}

#[tokio::test]
async fn listing_requires_authentication() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_subscriptions().await;

    // then
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn malformed_payloads_are_rejected_with_field_errors() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let test_cases = vec![
        (
            json!({
                "name": "Netflix",
                "cost": "abc",
                "billingCycle": "monthly",
                "renewalDate": "2025-01-01",
                "status": "active",
            }),
            "cost",
            "a non-decimal cost",
        ),
        (
            json!({
                "name": "<script>",
                "cost": "15.99",
                "billingCycle": "monthly",
                "renewalDate": "2025-01-01",
                "status": "active",
            }),
            "name",
            "a name with forbidden characters",
        ),
    ];

    for (body, field, description) in test_cases {
        // when
        let response = app.post_subscription(&body).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not return a 400 for {description}"
        );
        let body = response.json::<Value>().await.unwrap();
        assert!(
            body["fields"][field].is_array(),
            "No field error for `{field}` given {description}"
        );
    }
}

#[tokio::test]
async fn unknown_enum_values_are_rejected() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let test_cases = vec![
        (
            json!({
                "name": "Netflix",
                "cost": "15.99",
                "billingCycle": "weekly",
                "renewalDate": "2025-01-01",
                "status": "active",
            }),
            "an unknown billing cycle",
        ),
        (
            json!({
                "name": "Netflix",
                "cost": "15.99",
                "billingCycle": "monthly",
                "renewalDate": "2025-01-01",
                "status": "cancelled",
            }),
            "an unknown status",
        ),
        (
            json!({ "name": "Netflix" }),
            "a payload missing required fields",
        ),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_subscription(&body).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not return a 400 for {description}"
        );
    }
}

#[tokio::test]
async fn fetching_an_unknown_subscription_returns_404() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;

    // when
    let response = app
        .get_subscription("7f3b9e2a-5c41-4d8a-9f06-1b2a8c4d5e6f")
        .await;

    // then
    assert_eq!(response.status(), 404);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Subscription not found");
}

#[tokio::test]
async fn a_malformed_subscription_id_is_rejected() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;

    // when
    let response = app.get_subscription("not-a-uuid").await;

    // then
    assert_eq!(response.status(), 400);
    let body = response.json::<Value>().await.unwrap();
    assert!(body["fields"]["id"].is_array());
}

#[tokio::test]
async fn patching_replaces_only_the_provided_fields() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let created = app
        .post_subscription(&subscription_body("Netflix", "15.99", "2025-01-01"))
        .await
        .json::<Value>()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    // when
    let response = app
        .patch_subscription(id, &json!({ "cost": "19.99", "status": "inactive" }))
        .await;

    // then
    assert_eq!(response.status(), 200);
    let updated = response.json::<Value>().await.unwrap();
    assert_eq!(updated["cost"], "19.99");
    assert_eq!(updated["status"], "inactive");
    assert_eq!(updated["name"], "Netflix");
    assert_eq!(updated["renewalDate"], "2025-01-01");
}

#[tokio::test]
async fn deleting_a_nonexistent_subscription_returns_404() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;

    // when
    let response = app
        .delete_subscription("3c9d1f4e-8a25-4b07-8c3d-9e0f1a2b3c4d")
        .await;

    // then
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn subscriptions_are_invisible_to_other_users() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let created = app
        .post_subscription(&subscription_body("Netflix", "15.99", "2025-01-01"))
        .await
        .json::<Value>()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();
    let other = OtherUser::login(&app, "grace@example.com").await;

    // when / then
    let listed = other.get_subscriptions().await.json::<Value>().await.unwrap();
    assert!(listed.as_array().unwrap().is_empty());

    assert_eq!(
        other.patch_subscription(id, &json!({ "cost": "1.00" })).await.status(),
        404
    );
    assert_eq!(other.delete_subscription(id).await.status(), 404);

    // the owner still sees the untouched subscription
    let fetched = app.get_subscription(id).await.json::<Value>().await.unwrap();
    assert_eq!(fetched["cost"], "15.99");
}

#[tokio::test]
async fn expiring_returns_only_rows_inside_the_window() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let today = OffsetDateTime::now_utc().date();
    let in_window = json!({
        "name": "Soon",
        "cost": "5.00",
        "billingCycle": "monthly",
        "renewalDate": iso_date(today),
        "expirationDate": iso_date(today + Duration::days(10)),
        "status": "active",
    });
    let out_of_window = json!({
        "name": "Later",
        "cost": "5.00",
        "billingCycle": "monthly",
        "renewalDate": iso_date(today),
        "expirationDate": iso_date(today + Duration::days(40)),
        "status": "active",
    });
    let no_expiry = subscription_body("Open-ended", "5.00", &iso_date(today));
    for body in [&in_window, &out_of_window, &no_expiry] {
        assert_eq!(app.post_subscription(body).await.status(), 201);
    }

    // when
    let default_window = app
        .get_expiring_subscriptions("")
        .await
        .json::<Value>()
        .await
        .unwrap();
    let wide_window = app
        .get_expiring_subscriptions("?days=60")
        .await
        .json::<Value>()
        .await
        .unwrap();

    // then
    let names: Vec<_> = default_window
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Soon"]);

    let names: Vec<_> = wide_window
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Soon", "Later"]);
}

#[tokio::test]
async fn invalid_expiring_windows_are_rejected() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;

    let test_cases = [
        ("?days=-1", "a negative window"),
        ("?days=abc", "a non-numeric window"),
        ("?days=3000000", "a window past the calendar range"),
    ];

    for (query, description) in test_cases {
        // when
        let response = app.get_expiring_subscriptions(query).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not return a 400 for {description}"
        );
        let body = response.json::<Value>().await.unwrap();
        assert!(
            body["fields"]["days"].is_array(),
            "No field error for `days` given {description}"
        );
    }
}

#[tokio::test]
async fn cost_range_filters_compose_as_bucket_membership() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    for (name, cost) in [("Cheap", "5.00"), ("Middle", "15.00"), ("Premium", "60.00")] {
        app.post_subscription(&subscription_body(name, cost, "2025-01-01"))
            .await;
    }

    // when
    let filtered = app
        .get_subscriptions_with("?costRange=under-10,over-50")
        .await
        .json::<Value>()
        .await
        .unwrap();

    // then
    let names: Vec<_> = filtered
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cheap", "Premium"]);
}

#[tokio::test]
async fn unknown_filter_tokens_are_rejected() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let test_cases = vec![
        ("?costRange=under-5", "costRange"),
        ("?status=cancelled", "status"),
        ("?renewal=14-days", "renewal"),
        ("?sort=price", "sort"),
    ];

    for (query, field) in test_cases {
        // when
        let response = app.get_subscriptions_with(query).await;

        // then
        assert_eq!(response.status(), 400, "No 400 for `{query}`");
        let body = response.json::<Value>().await.unwrap();
        assert!(
            body["fields"][field].is_array(),
            "No field error for `{field}` given `{query}`"
        );
    }
}

#[tokio::test]
async fn a_malformed_query_string_is_rejected_with_field_errors() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;

    // when: the same key twice cannot deserialize into a single filter
    let response = app
        .get_subscriptions_with("?search=netflix&search=spotify")
        .await;

    // then
    assert_eq!(response.status(), 400);
    let body = response.json::<Value>().await.unwrap();
    assert!(
        body["fields"]["query"].is_array(),
        "No field error for the query string"
    );
}

#[tokio::test]
async fn sorting_by_cost_orders_the_list_ascending() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    for (name, cost) in [("Mid", "15.00"), ("Low", "5.00"), ("High", "60.00")] {
        app.post_subscription(&subscription_body(name, cost, "2025-01-01"))
            .await;
    }

    // when
    let sorted = app
        .get_subscriptions_with("?sort=cost")
        .await
        .json::<Value>()
        .await
        .unwrap();

    // then
    let names: Vec<_> = sorted
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Low", "Mid", "High"]);
}

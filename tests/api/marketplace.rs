use crate::helpers::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn the_catalog_is_readable_without_a_session() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.get_available_services().await;

    // then
    assert_eq!(response.status(), 200);
    let services = response.json::<Value>().await.unwrap();
    let services = services.as_array().unwrap();
    assert!(!services.is_empty());
    for service in services {
        assert!(service["id"].is_string());
        assert!(!service["plans"].as_array().unwrap().is_empty());
        assert!(service["basePrice"].is_string());
    }
}

#[tokio::test]
async fn a_single_service_can_be_fetched_by_id() {
    // given
    let app = TestApp::spawn().await;
    let services = app
        .get_available_services()
        .await
        .json::<Value>()
        .await
        .unwrap();
    let id = services[0]["id"].as_str().unwrap().to_string();

    // when
    let response = app.get_available_service(&id).await;

    // then
    assert_eq!(response.status(), 200);
    let service = response.json::<Value>().await.unwrap();
    assert_eq!(service["id"].as_str().unwrap(), id);
}

#[tokio::test]
async fn an_unknown_service_id_returns_404() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .get_available_service("00000000-0000-0000-0000-000000000000")
        .await;

    // then
    assert_eq!(response.status(), 404);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Service not found");
}

#[tokio::test]
async fn subscribing_requires_authentication() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_subscribe(&json!({
            "serviceId": "7f3b9e2a-5c41-4d8a-9f06-1b2a8c4d5e6f",
            "planId": "7f3b9e2a-5c41-4d8a-9f06-1b2a8c4d5e6f",
        }))
        .await;

    // then
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn one_click_subscribe_synthesizes_a_subscription_from_the_plan() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let services = app
        .get_available_services()
        .await
        .json::<Value>()
        .await
        .unwrap();
    let service = &services[0];
    let plan = &service["plans"][0];

    // when
    let response = app
        .post_subscribe(&json!({
            "serviceId": service["id"],
            "planId": plan["id"],
        }))
        .await;

    // then
    assert_eq!(response.status(), 201);
    let subscription = response.json::<Value>().await.unwrap();
    assert_eq!(subscription["name"], service["name"]);
    assert_eq!(subscription["category"], service["category"]);
    assert_eq!(subscription["cost"], plan["price"]);
    assert_eq!(subscription["billingCycle"], plan["billingCycle"]);
    assert_eq!(subscription["status"], "active");
    // one billing cycle from today, so the two dates coincide
    assert_eq!(subscription["renewalDate"], subscription["expirationDate"]);
    assert!(subscription["renewalDate"].is_string());
}

#[tokio::test]
async fn subscribing_to_an_unknown_service_returns_404() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;

    // when
    let response = app
        .post_subscribe(&json!({
            "serviceId": "00000000-0000-0000-0000-000000000000",
            "planId": "00000000-0000-0000-0000-000000000001",
        }))
        .await;

    // then
    assert_eq!(response.status(), 404);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Service not found");
}

#[tokio::test]
async fn subscribing_to_an_unknown_plan_returns_404() {
    // given
    let app = TestApp::spawn().await;
    app.login().await;
    let services = app
        .get_available_services()
        .await
        .json::<Value>()
        .await
        .unwrap();

    // when
    let response = app
        .post_subscribe(&json!({
            "serviceId": services[0]["id"],
            "planId": "00000000-0000-0000-0000-000000000001",
        }))
        .await;

    // then
    assert_eq!(response.status(), 404);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Plan not found");
}

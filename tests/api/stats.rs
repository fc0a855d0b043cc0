use chrono::{Duration, Utc};
use serde_json::Value;

use crate::helpers::{stored_record, TestApp};

#[tokio::test]
async fn stats_count_customers_per_status() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    let today = Utc::now().date_naive();
    let yesterday = (today - Duration::days(1)).to_string();
    let in_three_days = (today + Duration::days(3)).to_string();
    test_app.seed(serde_json::json!([
        stored_record(1, "Ana Silva", "active", "2099-01-01"),
        stored_record(2, "Carlos", "active", &in_three_days),
        stored_record(3, "Mariana", "inactive", &in_three_days),
        stored_record(4, "Bruno", "expired", "2020-01-01"),
        stored_record(5, "Joana", "active", &yesterday),
    ]));

    let response = test_app.get("/customers/stats", &token).await;

    assert_eq!(response.status().as_u16(), 200);

    let stats: Value = response.json().await.unwrap();
    assert_eq!(
        stats,
        serde_json::json!({
            "total": 5,
            "active": 2,
            "inactive": 1,
            "expired": 2,
            "expiring_soon": 1,
        })
    );
}

#[tokio::test]
async fn stats_of_an_empty_store_are_zero() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let stats: Value = test_app
        .get("/customers/stats", &token)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(stats["total"], 0);
    assert_eq!(stats["expiring_soon"], 0);
}

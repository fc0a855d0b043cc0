use crate::helpers::{stored_record, TestApp};

const HEADER: &str = "id,name,phone,login,status,registration_date,expiration_date,days_remaining";

#[tokio::test]
async fn export_returns_a_csv_attachment() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([
        stored_record(1, "Ana Silva", "active", "2099-01-01"),
        stored_record(2, "Carlos", "inactive", "2099-01-01"),
    ]));

    let response = test_app.get("/customers/export", &token).await;

    assert_eq!(response.status().as_u16(), 200);

    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    let disposition = response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    let body = response.text().await.unwrap();

    assert!(content_type.starts_with("text/csv"));
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("customers_"));
    assert!(disposition.contains(".csv"));
    assert_eq!(body.lines().next(), Some(HEADER));
    assert_eq!(body.lines().count(), 3);
    assert!(!body.contains("secret-1"));
    assert!(!body.contains("secret-2"));
}

#[tokio::test]
async fn export_of_an_empty_store_only_has_the_header() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let response = test_app.get("/customers/export", &token).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap().trim_end(), HEADER);
}

#[tokio::test]
async fn export_applies_the_listing_filters() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([
        stored_record(1, "Ana Silva", "active", "2099-01-01"),
        stored_record(2, "Carlos", "inactive", "2099-01-01"),
        stored_record(3, "Mariana", "inactive", "2099-01-01"),
    ]));

    let response = test_app
        .get("/customers/export?status=inactive&sort=name", &token)
        .await;
    let body = response.text().await.unwrap();
    let rows: Vec<&str> = body.lines().skip(1).collect();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("2,Carlos,"));
    assert!(rows[1].starts_with("3,Mariana,"));
}

#[tokio::test]
async fn export_requires_a_session() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get("/customers/export", "not-a-session").await;

    assert_eq!(response.status().as_u16(), 401);
}

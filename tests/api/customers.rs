use chrono::{Duration, Utc};
use serde_json::Value;

use crate::helpers::{customer_body, stored_record, TestApp};

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|customer| customer["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn create_customer_returns_201_with_sequential_ids() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let first = test_app.post_customer(&token, &customer_body("Ana Silva", "2030-01-01")).await;
    let second = test_app.post_customer(&token, &customer_body("Carlos", "2030-01-01")).await;

    assert_eq!(first.status().as_u16(), 201);
    assert_eq!(second.status().as_u16(), 201);

    let first: Value = first.json().await.unwrap();
    let second: Value = second.json().await.unwrap();
    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);
    assert_eq!(first["status"], "active");
    assert_eq!(
        first["registration_date"],
        Utc::now().date_naive().to_string()
    );
}

#[tokio::test]
async fn create_customer_persists_the_record_without_exposing_the_password() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let response = test_app.post_customer(&token, &customer_body("Ana Silva", "2030-01-01")).await;
    let body = response.text().await.unwrap();
    let stored = test_app.stored_records();

    assert!(!body.contains("account-secret"));
    assert!(!body.contains("password"));
    assert_eq!(stored[0]["name"], "Ana Silva");
    assert_eq!(stored[0]["expiration_date"], "2030-01-01");
    assert_eq!(stored[0]["password"], "account-secret");
}

#[tokio::test]
async fn create_customer_returns_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    let valid = customer_body("Ana Silva", "2030-01-01");
    let with = |field: &str, value: Value| {
        let mut body = valid.clone();
        body[field] = value;
        body
    };
    let without = |field: &str| {
        let mut body = valid.clone();
        body.as_object_mut().unwrap().remove(field);
        body
    };

    // Table-driven: every body below must be rejected before anything is stored
    let test_cases = vec![
        (serde_json::json!({}), "missing every field"),
        (without("name"), "missing name"),
        (without("password"), "missing password"),
        (without("expiration_date"), "missing expiration date"),
        (with("name", Value::from("   ")), "blank name"),
        (with("phone", Value::from("call me")), "invalid phone"),
        (with("expiration_date", Value::from("01/01/2030")), "malformed expiration date"),
        (with("status", Value::from("renewed")), "unknown status"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_customer(&token, &invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload had {}",
            error_message
        );
    }

    assert!(!test_app.json_path.exists());
}

#[tokio::test]
async fn list_applies_text_status_and_expiration_filters() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([
        stored_record(1, "Ana Silva", "active", "2099-03-10"),
        stored_record(2, "Carlos", "inactive", "2099-01-15"),
        stored_record(3, "Mariana", "inactive", "2099-05-01"),
    ]));

    let all = test_app.get_customers(&token, &[]).await;
    let by_text = test_app.get_customers(&token, &[("q", "ana")]).await;
    let by_status = test_app.get_customers(&token, &[("status", "inactive")]).await;
    let by_date = test_app
        .get_customers(&token, &[("expires_on_or_before", "2099-03-10")])
        .await;
    let combined = test_app
        .get_customers(&token, &[("q", "ana"), ("status", "inactive")])
        .await;

    assert_eq!(ids(&all.json().await.unwrap()), vec![1, 2, 3]);
    assert_eq!(ids(&by_text.json().await.unwrap()), vec![1, 3]);
    assert_eq!(ids(&by_status.json().await.unwrap()), vec![2, 3]);
    assert_eq!(ids(&by_date.json().await.unwrap()), vec![1, 2]);
    assert_eq!(ids(&combined.json().await.unwrap()), vec![3]);
}

#[tokio::test]
async fn list_can_be_sorted() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([
        stored_record(1, "Mariana", "active", "2099-03-10"),
        stored_record(2, "carlos", "active", "2099-01-15"),
        stored_record(3, "Ana", "active", "2099-05-01"),
    ]));

    let by_name = test_app.get_customers(&token, &[("sort", "name")]).await;
    let by_expiration = test_app.get_customers(&token, &[("sort", "expiration")]).await;
    let invalid = test_app.get_customers(&token, &[("sort", "phone")]).await;

    assert_eq!(ids(&by_name.json().await.unwrap()), vec![3, 2, 1]);
    assert_eq!(ids(&by_expiration.json().await.unwrap()), vec![2, 1, 3]);
    assert_eq!(invalid.status().as_u16(), 400);
}

#[tokio::test]
async fn list_returns_400_for_invalid_filters() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let bad_status = test_app.get_customers(&token, &[("status", "pending")]).await;
    let bad_date = test_app
        .get_customers(&token, &[("expires_on_or_before", "tomorrow")])
        .await;

    assert_eq!(bad_status.status().as_u16(), 400);
    assert_eq!(bad_date.status().as_u16(), 400);
}

#[tokio::test]
async fn list_expires_overdue_customers_and_persists_them() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();
    test_app.seed(serde_json::json!([
        stored_record(1, "Ana Silva", "active", &yesterday),
        stored_record(2, "Carlos", "active", "2099-01-01"),
    ]));

    let response = test_app.get_customers(&token, &[("status", "expired")]).await;

    assert_eq!(ids(&response.json().await.unwrap()), vec![1]);

    let stored = test_app.stored_records();
    assert_eq!(stored[0]["status"], "expired");
    assert_eq!(stored[0]["status_history"][0]["actor"], "system");
    assert_eq!(stored[0]["status_history"][0]["from"], "active");
    assert_eq!(stored[1]["status"], "active");
}

#[tokio::test]
async fn get_customer_returns_404_for_unknown_ids() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let response = test_app.get("/customers/42", &token).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn update_customer_replaces_fields_and_records_status_changes() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([stored_record(1, "Ana Silva", "active", "2099-01-01")]));
    let mut body = customer_body("Ana Souza", "2099-06-30");
    body.as_object_mut().unwrap().remove("password");
    body["status"] = Value::from("inactive");

    let response = test_app.put_customer(&token, 1, &body).await;

    assert_eq!(response.status().as_u16(), 200);

    let customer: Value = response.json().await.unwrap();
    let stored = test_app.stored_records();
    assert_eq!(customer["name"], "Ana Souza");
    assert_eq!(customer["status"], "inactive");
    assert_eq!(customer["expiration_date"], "2099-06-30");
    assert_eq!(stored[0]["password"], "secret-1");
    assert_eq!(stored[0]["status_history"].as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["status_history"][0]["actor"], "admin");
}

#[tokio::test]
async fn update_customer_returns_404_and_400() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([stored_record(1, "Ana Silva", "active", "2099-01-01")]));

    let unknown = test_app
        .put_customer(&token, 7, &customer_body("Ana", "2099-01-01"))
        .await;
    let invalid = test_app
        .put_customer(&token, 1, &customer_body("Ana", "2099-02-30"))
        .await;

    assert_eq!(unknown.status().as_u16(), 404);
    assert_eq!(invalid.status().as_u16(), 400);
    assert_eq!(test_app.stored_records()[0]["expiration_date"], "2099-01-01");
}

#[tokio::test]
async fn delete_customer_removes_the_record() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([
        stored_record(1, "Ana Silva", "active", "2099-01-01"),
        stored_record(2, "Carlos", "active", "2099-01-01"),
    ]));

    let deleted = test_app.delete_customer(&token, 1).await;
    let deleted_again = test_app.delete_customer(&token, 1).await;

    assert_eq!(deleted.status().as_u16(), 204);
    assert_eq!(deleted_again.status().as_u16(), 404);
    assert_eq!(ids(&test_app.stored_records()), vec![2]);
}

#[tokio::test]
async fn legacy_records_are_readable() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([{
        "id": 5,
        "nome": "Joana",
        "telefone": "11 97777-0000",
        "login": "joana",
        "senha": "legacy",
        "status": "desativado",
        "data_cadastro": "2022-01-01",
        "data_vencimento": "2099-01-01"
    }]));

    let response = test_app.get("/customers/5", &token).await;
    let customer: Value = response.json().await.unwrap();

    assert_eq!(customer["name"], "Joana");
    assert_eq!(customer["status"], "inactive");
}

#[tokio::test]
async fn records_sharing_an_id_are_reported_as_a_server_error() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([
        stored_record(1, "Ana Silva", "active", "2099-01-01"),
        stored_record(1, "Carlos", "active", "2099-01-01"),
    ]));

    let list = test_app.get_customers(&token, &[]).await;
    let delete = test_app.delete_customer(&token, 1).await;

    assert_eq!(list.status().as_u16(), 500);
    assert_eq!(delete.status().as_u16(), 500);
    assert_eq!(test_app.stored_records().as_array().unwrap().len(), 2);
}

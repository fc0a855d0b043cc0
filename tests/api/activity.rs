use serde_json::Value;

use crate::helpers::{customer_body, stored_record, TestApp};

async fn activity(test_app: &TestApp, token: &str) -> Vec<Value> {
    let response = test_app.get("/activity", token).await;

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();

    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn activity_is_empty_before_any_change() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    assert!(activity(&test_app, &token).await.is_empty());
}

#[tokio::test]
async fn activity_requires_a_session() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get("/activity", "not-a-session").await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn every_administrative_change_is_logged_newest_first() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    test_app
        .post_customer(&token, &customer_body("Ana Silva", "2099-01-01"))
        .await;
    let mut edit = customer_body("Ana Souza", "2099-01-01");
    edit.as_object_mut().unwrap().remove("password");
    edit["login"] = Value::from("ana.silva.login");
    test_app.put_customer(&token, 1, &edit).await;
    test_app
        .post("/customers/1/renew", &token, Some(&serde_json::json!({ "days": 10 })))
        .await;
    test_app.post("/customers/1/toggle", &token, None).await;
    test_app.delete_customer(&token, 1).await;

    let entries = activity(&test_app, &token).await;
    let actions: Vec<&str> = entries
        .iter()
        .map(|entry| entry["action"].as_str().unwrap())
        .collect();

    assert_eq!(
        actions,
        vec!["deleted", "status_changed", "renewed", "updated", "created"]
    );
    assert!(entries.iter().all(|entry| entry["actor"] == "admin"));
    assert!(entries.iter().all(|entry| entry["customer_id"] == 1));
    assert_eq!(entries[3]["details"], "Changed name.");
    assert_eq!(entries[2]["details"], "Renewed for 10 days. New expiration date 2099-01-11.");
    assert_eq!(entries[0]["customer_name"], "Ana Souza");
}

#[tokio::test]
async fn no_op_edits_and_rejected_requests_are_not_logged() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;
    test_app.seed(serde_json::json!([stored_record(1, "Ana Silva", "active", "2099-01-01")]));
    let mut same = serde_json::json!({
        "name": "Ana Silva",
        "phone": "11 9000-0001",
        "login": "login1",
        "expiration_date": "2099-01-01",
    });

    test_app.put_customer(&token, 1, &same).await;
    same["expiration_date"] = Value::from("not-a-date");
    test_app.put_customer(&token, 1, &same).await;
    test_app.delete_customer(&token, 7).await;

    assert!(activity(&test_app, &token).await.is_empty());
}

#[tokio::test]
async fn activity_can_be_limited() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    for name in ["Ana", "Bia", "Carlos"] {
        test_app
            .post_customer(&token, &customer_body(name, "2099-01-01"))
            .await;
    }

    let entries: Value = test_app
        .get("/activity?limit=2", &token)
        .await
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["customer_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Carlos", "Bia"]);
}

#[tokio::test]
async fn deleting_a_customer_keeps_its_earlier_activity() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    test_app
        .post_customer(&token, &customer_body("Ana Silva", "2099-01-01"))
        .await;
    test_app.delete_customer(&token, 1).await;
    let entries = activity(&test_app, &token).await;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["details"], "Customer Ana Silva was added.");
    assert_eq!(entries[0]["details"], "Customer Ana Silva was removed.");
}

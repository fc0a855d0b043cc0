use crate::helpers::TestApp;

#[tokio::test]
async fn login_with_valid_credentials_returns_a_session_token() {
    let test_app = TestApp::spawn_app().await;
    let body = serde_json::json!({ "username": "admin", "password": "admin" });

    let response = test_app.post_login(&body).await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("set-cookie")
        .and_then(|value| value.to_str().ok())
        .map_or(false, |cookie| cookie.starts_with("session_token=")));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["token"].as_str().unwrap().len(), 30);
}

#[tokio::test]
async fn login_returns_401_when_credentials_are_wrong() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({ "username": "admin", "password": "wrong" }),
            "wrong password",
        ),
        (
            serde_json::json!({ "username": "root", "password": "admin" }),
            "unknown user",
        ),
    ];

    for (body, error_message) in test_cases {
        let response = test_app.post_login(&body).await;

        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not fail with 401 status when login was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn customers_require_an_authenticated_session() {
    let test_app = TestApp::spawn_app().await;

    let without_session = test_app
        .api_client
        .get(format!("{}/customers", test_app.address))
        .send()
        .await
        .unwrap();
    let with_unknown_session = test_app.get_customers("not-a-session", &[]).await;
    let create = test_app
        .api_client
        .post(format!("{}/customers", test_app.address))
        .json(&crate::helpers::customer_body("Ana", "2030-01-01"))
        .send()
        .await
        .unwrap();

    assert_eq!(without_session.status().as_u16(), 401);
    assert_eq!(with_unknown_session.status().as_u16(), 401);
    assert_eq!(create.status().as_u16(), 401);
    assert!(!test_app.json_path.exists());
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let response = test_app
        .api_client
        .get(format!("{}/customers", test_app.address))
        .header("Cookie", format!("session_token={}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let test_app = TestApp::spawn_app().await;
    let token = test_app.login().await;

    let logout = test_app.post("/logout", &token, None).await;
    let response = test_app.get_customers(&token, &[]).await;

    assert_eq!(logout.status().as_u16(), 204);
    assert_eq!(response.status().as_u16(), 401);
}

mod common;

use common::unique_email;

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn login_valid_credentials_returns_token_and_profile() {
    let (addr, pool) = common::setup_test_app().await;
    let employee_id = common::create_test_employee(&pool, "Anna", false).await;
    let email = unique_email("auth-valid");
    let user_id = common::create_test_user(&pool, "employee", &email, Some(employee_id), true).await;

    let resp = common::http_client()
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": common::PASSWORD,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["token"].is_string(), "Response should contain a token");
    assert_eq!(body["user"]["email"].as_str().unwrap(), email);
    assert_eq!(body["user"]["role"].as_str().unwrap(), "employee");
    assert_eq!(body["user"]["employee_id"].as_str().unwrap(), employee_id.to_string());
    assert!(body["user"].get("password_hash").is_none());

    common::cleanup(&pool, &[user_id], &[employee_id]).await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn login_wrong_password_returns_401() {
    let (addr, pool) = common::setup_test_app().await;
    let email = unique_email("auth-wrong-pw");
    let user_id = common::create_test_user(&pool, "dispatcher", &email, None, true).await;

    let resp = common::http_client()
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": "wrong-password",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);

    common::cleanup(&pool, &[user_id], &[]).await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn login_inactive_user_returns_401() {
    let (addr, pool) = common::setup_test_app().await;
    let email = unique_email("auth-inactive");
    let user_id = common::create_test_user(&pool, "dispatcher", &email, None, false).await;

    let resp = common::http_client()
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": common::PASSWORD,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);

    common::cleanup(&pool, &[user_id], &[]).await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn request_with_expired_token_returns_401() {
    let (addr, pool) = common::setup_test_app().await;
    let email = unique_email("auth-expired");
    let user_id = common::create_test_user(&pool, "employee", &email, None, true).await;

    let resp = common::http_client()
        .get(format!("http://{}/api/auth/me", addr))
        .header("Authorization", format!("Bearer {}", common::create_expired_token(user_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401, "Expired token should be rejected");

    common::cleanup(&pool, &[user_id], &[]).await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn auth_me_with_valid_token_returns_profile() {
    let (addr, pool) = common::setup_test_app().await;
    let email = unique_email("auth-me");
    let user_id = common::create_test_user(&pool, "admin", &email, None, true).await;
    let token = common::get_auth_token(addr, &email).await;

    let resp = common::http_client()
        .get(format!("http://{}/api/auth/me", addr))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["email"].as_str().unwrap(), email);
    assert_eq!(body["role"].as_str().unwrap(), "admin");

    common::cleanup(&pool, &[user_id], &[]).await;
}

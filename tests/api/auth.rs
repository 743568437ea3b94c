use crate::helpers::{spawn_app, unique_email, PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn customer_registration_and_login_returns_token() {
    //arrange
    let app = spawn_app().await;
    let email = unique_email("login");

    //act
    let response = app
        .post_json(
            "/api/auth/register",
            None,
            &json!({
                "name": "Lam",
                "email": email,
                "password": PASSWORD,
                "user_type": "customer",
                "address_line1": "22 Nathan Road"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let response = app.login(&email, "customer").await;

    //assert
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert!(body.get("token").is_some(), "JWT token not found in response");
    assert!(body["expires_at"].as_i64().unwrap() > 0);
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn email_is_unique_across_account_kinds() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;

    let response = app
        .post_json(
            "/api/auth/register",
            None,
            &json!({
                "name": "Someone",
                "email": restaurant.email.to_uppercase(),
                "password": PASSWORD,
                "user_type": "delivery"
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn registration_rejects_bad_input() {
    let app = spawn_app().await;
    let cases = [
        (json!({"name": "A", "email": "not-an-email", "password": PASSWORD, "user_type": "restaurant"}), "invalid email"),
        (json!({"name": "A", "email": unique_email("short"), "password": "123", "user_type": "restaurant"}), "short password"),
        (json!({"name": "A", "email": unique_email("kind"), "password": PASSWORD, "user_type": "admin"}), "unknown user type"),
        (json!({"name": "A", "email": unique_email("addr"), "password": PASSWORD, "user_type": "customer"}), "customer without address"),
    ];

    for (body, description) in cases {
        let response = app.post_json("/api/auth/register", None, &body).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not reject the payload when it was {}.",
            description
        );
    }
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    let customer = app.customer().await;

    let response = app
        .post_json(
            "/api/auth/login",
            None,
            &json!({"email": customer.email, "password": "wrong-password", "user_type": "customer"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn login_is_scoped_to_the_account_kind() {
    let app = spawn_app().await;
    let customer = app.customer().await;

    let response = app.login(&customer.email, "restaurant").await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = spawn_app().await;

    let missing = app.get("/api/customer/profile", None).await;
    let garbage = app.get("/api/customer/profile", Some("not-a-jwt")).await;

    assert_eq!(missing.status().as_u16(), 401);
    assert_eq!(garbage.status().as_u16(), 401);
}

#[tokio::test]
async fn token_of_another_role_is_forbidden() {
    let app = spawn_app().await;
    let rider = app.delivery_staff().await;

    let response = app.get("/api/customer/profile", Some(&rider.token)).await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn customer_can_update_and_view_profile() {
    let app = spawn_app().await;
    let customer = app.customer().await;

    let response = app
        .put_json(
            "/api/customer/profile",
            &customer.token,
            &json!({"custname": "Updated name", "phone": "91234567"}),
        )
        .await;
    assert!(response.status().is_success());

    let profile: Value = app
        .get("/api/customer/profile", Some(&customer.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(profile["custname"], "Updated name");
    assert_eq!(profile["phone"], "91234567");
    assert!(profile["latest_login_date"].is_string());
}

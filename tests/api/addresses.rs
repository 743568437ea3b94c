use crate::helpers::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn registration_address_is_the_default() {
    let app = spawn_app().await;
    let customer = app.customer().await;

    let response = app.get("/api/customer/addresses/default", Some(&customer.token)).await;

    assert!(response.status().is_success());
    let address: Value = response.json().await.unwrap();
    assert_eq!(address["address_line1"], "1 Queen's Road Central");
    assert_eq!(address["country"], "Hong Kong");
    assert_eq!(address["is_default"], true);
}

#[tokio::test]
async fn changing_the_default_keeps_a_single_default() {
    let app = spawn_app().await;
    let customer = app.customer().await;

    let response = app
        .post_json(
            "/api/customer/addresses",
            Some(&customer.token),
            &json!({"address_line1": "8 Finance Street", "city": "Central"}),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let added: Value = response.json().await.unwrap();
    assert_eq!(added["is_default"], false);
    let addressid = added["addressid"].as_i64().unwrap();

    let response = app
        .put_json(
            &format!("/api/customer/addresses/{}/default", addressid),
            &customer.token,
            &json!({}),
        )
        .await;
    assert!(response.status().is_success());

    let addresses: Vec<Value> = app
        .get("/api/customer/addresses", Some(&customer.token))
        .await
        .json()
        .await
        .unwrap();
    let defaults: Vec<&Value> = addresses.iter().filter(|a| a["is_default"] == true).collect();
    assert_eq!(addresses.len(), 2);
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["addressid"].as_i64(), Some(addressid));
}

#[tokio::test]
async fn other_customers_addresses_are_hidden() {
    let app = spawn_app().await;
    let owner = app.customer().await;
    let other = app.customer().await;
    let addresses: Vec<Value> = app
        .get("/api/customer/addresses", Some(&owner.token))
        .await
        .json()
        .await
        .unwrap();
    let addressid = addresses[0]["addressid"].as_i64().unwrap();

    let response = app
        .delete(&format!("/api/customer/addresses/{}", addressid), &other.token)
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn address_can_be_edited_and_deleted() {
    let app = spawn_app().await;
    let customer = app.customer().await;
    let added: Value = app
        .post_json(
            "/api/customer/addresses",
            Some(&customer.token),
            &json!({"address_line1": "3 Old Street"}),
        )
        .await
        .json()
        .await
        .unwrap();
    let addressid = added["addressid"].as_i64().unwrap();

    let edited: Value = app
        .put_json(
            &format!("/api/customer/addresses/{}", addressid),
            &customer.token,
            &json!({"address_line1": "4 New Street", "postal_code": "000000"}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(edited["address_line1"], "4 New Street");
    assert_eq!(edited["postal_code"], "000000");

    let response = app
        .delete(&format!("/api/customer/addresses/{}", addressid), &customer.token)
        .await;
    assert!(response.status().is_success());
    let addresses: Vec<Value> = app
        .get("/api/customer/addresses", Some(&customer.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(addresses.len(), 1);
}

use crate::helpers::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn cart_totals_use_catalog_prices() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let item_id = app.menu_item(&restaurant, "Pineapple bun", "12.50").await;

    for _ in 0..2 {
        let response = app
            .post_json(
                "/api/cart/add",
                Some(&customer.token),
                &json!({"item_id": item_id, "quantity": 1}),
            )
            .await;
        assert!(response.status().is_success());
    }

    let cart: Value = app
        .get("/api/cart/items", Some(&customer.token))
        .await
        .json()
        .await
        .unwrap();
    let total: Value = app
        .get("/api/cart/total", Some(&customer.token))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["items"][0]["subtotal"], "25.00");
    assert_eq!(total["total"], "25.00");
}

#[tokio::test]
async fn cart_holds_one_restaurant_at_a_time() {
    let app = spawn_app().await;
    let first = app.restaurant().await;
    let second = app.restaurant().await;
    let customer = app.customer().await;
    let a = app.menu_item(&first, "Siu mai", "20.00").await;
    let b = app.menu_item(&second, "Pizza", "90.00").await;

    app.post_json("/api/cart/add", Some(&customer.token), &json!({"item_id": a}))
        .await;
    let response = app
        .post_json("/api/cart/add", Some(&customer.token), &json!({"item_id": b}))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn ordering_the_cart_empties_it() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let item_id = app.menu_item(&restaurant, "Fish balls", "15.00").await;
    app.post_json(
        "/api/cart/add",
        Some(&customer.token),
        &json!({"item_id": item_id, "quantity": 3}),
    )
    .await;

    let response = app
        .post_json("/api/orders/create", Some(&customer.token), &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let order: Value = response.json().await.unwrap();

    let cart: Value = app
        .get("/api/cart/items", Some(&customer.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(order["total_amount"], "45.00");
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn quantity_can_be_changed_and_items_removed() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let a = app.menu_item(&restaurant, "Congee", "28.00").await;
    let b = app.menu_item(&restaurant, "Fried dough", "10.00").await;
    for item_id in [a, b] {
        app.post_json("/api/cart/add", Some(&customer.token), &json!({"item_id": item_id}))
            .await;
    }

    let updated: Value = app
        .put_json(
            &format!("/api/cart/items/{}", a),
            &customer.token,
            &json!({"quantity": 4}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["total"], "122.00");

    let removed: Value = app
        .delete(&format!("/api/cart/remove/{}", b), &customer.token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(removed["items"].as_array().unwrap().len(), 1);

    let response = app.delete("/api/cart/clear", &customer.token).await;
    assert!(response.status().is_success());
}

#[tokio::test]
async fn cart_quantity_overflow_is_a_bad_request() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let item_id = app.menu_item(&restaurant, "Egg tart", "0.01").await;
    let body = json!({"item_id": item_id, "quantity": i32::MAX});

    let first = app.post_json("/api/cart/add", Some(&customer.token), &body).await;
    let second = app.post_json("/api/cart/add", Some(&customer.token), &body).await;

    assert!(first.status().is_success());
    assert_eq!(second.status().as_u16(), 400);
    let cart: Value = app
        .get("/api/cart/items", Some(&customer.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"][0]["quantity"], i32::MAX);
}

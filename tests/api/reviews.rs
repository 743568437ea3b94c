use crate::helpers::{spawn_app, TestAccount, TestApp};
use serde_json::{json, Value};

/// Returns (restaurant, customer, delivered order id).
async fn delivered_order(app: &TestApp) -> (TestAccount, TestAccount, i64) {
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let rider = app.delivery_staff().await;
    let item_id = app.menu_item(&restaurant, "Roast goose", "120.00").await;
    let order = app
        .place_order(&customer, json!([{"item_id": item_id, "quantity": 1}]))
        .await;
    let orderid = order["orderid"].as_i64().unwrap();
    for status in ["preparing", "ready"] {
        app.set_status(&restaurant, orderid, status).await;
    }
    app.put_json(&format!("/api/delivery/orders/{}/accept", orderid), &rider.token, &json!({}))
        .await;
    let response = app.set_status(&rider, orderid, "delivered").await;
    assert!(response.status().is_success());
    (restaurant, customer, orderid)
}

#[tokio::test]
async fn delivered_order_is_reviewed_once() {
    let app = spawn_app().await;
    let (restaurant, customer, orderid) = delivered_order(&app).await;
    let path = format!("/api/orders/{}/review", orderid);

    let first = app
        .post_json(
            &path,
            Some(&customer.token),
            &json!({"rest_rating": 4, "delivery_rating": 5, "comment": "Crispy skin"}),
        )
        .await;
    let second = app
        .post_json(
            &path,
            Some(&customer.token),
            &json!({"rest_rating": 1, "delivery_rating": 1}),
        )
        .await;

    assert_eq!(first.status().as_u16(), 201);
    assert_eq!(second.status().as_u16(), 409);

    let review: Value = app.get(&path, Some(&restaurant.token)).await.json().await.unwrap();
    assert_eq!(review["comment"], "Crispy skin");

    let rating: Value = app
        .get(&format!("/api/restaurants/{}/rating", restaurant.id), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(rating["average_rating"], 4.0);
    assert_eq!(rating["rating_count"], 1);
}

#[tokio::test]
async fn review_before_delivery_is_rejected() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let item_id = app.menu_item(&restaurant, "Rice", "5.00").await;
    let order = app
        .place_order(&customer, json!([{"item_id": item_id, "quantity": 1}]))
        .await;

    let response = app
        .post_json(
            &format!("/api/orders/{}/review", order["orderid"].as_i64().unwrap()),
            Some(&customer.token),
            &json!({"rest_rating": 5, "delivery_rating": 5}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let app = spawn_app().await;
    let (_, customer, orderid) = delivered_order(&app).await;

    let response = app
        .post_json(
            &format!("/api/orders/{}/review", orderid),
            Some(&customer.token),
            &json!({"rest_rating": 6, "delivery_rating": 3}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn unrated_restaurant_reports_zero() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;

    let rating: Value = app
        .get(&format!("/api/restaurants/{}/rating", restaurant.id), None)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(rating["average_rating"], 0.0);
    assert_eq!(rating["rating_count"], 0);
}

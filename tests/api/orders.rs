use crate::helpers::{spawn_app, TestAccount, TestApp};
use serde_json::{json, Value};

struct Kitchen {
    restaurant: TestAccount,
    customer: TestAccount,
    dumplings: i32,
    tea: i32,
}

async fn kitchen(app: &TestApp) -> Kitchen {
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let dumplings = app.menu_item(&restaurant, "Dumplings", "10.00").await;
    let tea = app.menu_item(&restaurant, "Tea", "5.00").await;
    Kitchen {
        restaurant,
        customer,
        dumplings,
        tea,
    }
}

async fn ready_order(app: &TestApp, k: &Kitchen) -> i64 {
    let order = app
        .place_order(&k.customer, json!([{"item_id": k.dumplings, "quantity": 1}]))
        .await;
    let orderid = order["orderid"].as_i64().unwrap();
    for status in ["preparing", "ready"] {
        let response = app.set_status(&k.restaurant, orderid, status).await;
        assert!(response.status().is_success(), "moving to {} failed", status);
    }
    orderid
}

#[tokio::test]
async fn placing_an_order_snapshots_prices() {
    //arrange
    let app = spawn_app().await;
    let k = kitchen(&app).await;

    //act
    let order = app
        .place_order(
            &k.customer,
            json!([{"item_id": k.dumplings, "quantity": 2}, {"item_id": k.tea, "quantity": 1}]),
        )
        .await;

    //assert
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], "25.00");
    assert_eq!(order["discount_amount"], "0.00");
    assert_eq!(order["shipping_address"], "1 Queen's Road Central, Central, Hong Kong");
    assert_eq!(order["order_items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_orders_are_rejected() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;

    let response = app
        .post_json("/api/orders/create", Some(&k.customer.token), &json!({"items": []}))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn restaurant_drives_the_order_to_ready() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;
    let order = app
        .place_order(&k.customer, json!([{"item_id": k.tea, "quantity": 1}]))
        .await;
    let orderid = order["orderid"].as_i64().unwrap();

    let skipped = app.set_status(&k.restaurant, orderid, "ready").await;
    let preparing = app
        .put_json(
            &format!("/api/restaurant/orders/{}/status", orderid),
            &k.restaurant.token,
            &json!({"status": "preparing"}),
        )
        .await;
    let ready = app
        .put_json(
            &format!("/api/restaurant/orders/{}/ready", orderid),
            &k.restaurant.token,
            &json!({}),
        )
        .await;

    assert_eq!(skipped.status().as_u16(), 409);
    assert!(preparing.status().is_success());
    let ready: Value = ready.json().await.unwrap();
    assert_eq!(ready["status"], "ready");
}

#[tokio::test]
async fn customer_cannot_advance_an_order() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;
    let order = app
        .place_order(&k.customer, json!([{"item_id": k.tea, "quantity": 1}]))
        .await;
    let orderid = order["orderid"].as_i64().unwrap();

    let response = app.set_status(&k.customer, orderid, "preparing").await;
    let unknown = app.set_status(&k.customer, orderid, "teleported").await;
    let cancelled = app
        .put_json(&format!("/api/orders/{}/cancel", orderid), &k.customer.token, &json!({}))
        .await;

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(unknown.status().as_u16(), 400);
    let cancelled: Value = cancelled.json().await.unwrap();
    assert_eq!(cancelled["status"], "cancelled");
}

#[tokio::test]
async fn delivery_lifecycle_completes() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;
    let rider = app.delivery_staff().await;
    let orderid = ready_order(&app, &k).await;

    let available: Vec<Value> = app
        .get("/api/delivery/orders/available", Some(&rider.token))
        .await
        .json()
        .await
        .unwrap();
    assert!(available.iter().any(|o| o["orderid"].as_i64() == Some(orderid)));

    let accepted: Value = app
        .put_json(&format!("/api/delivery/orders/{}/accept", orderid), &rider.token, &json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(accepted["status"], "out_for_delivery");
    assert_eq!(accepted["deliver_man_id"].as_i64(), Some(rider.id as i64));

    let delivered: Value = app
        .put_json(&format!("/api/delivery/orders/{}/complete", orderid), &rider.token, &json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(delivered["status"], "delivered");
    assert!(delivered["end_deliver_time"].is_string());

    let detail: Value = app
        .get(&format!("/api/orders/{}", orderid), Some(&k.customer.token))
        .await
        .json()
        .await
        .unwrap();
    let history: Vec<&str> = detail["history"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        history,
        vec!["pending", "preparing", "ready", "out_for_delivery", "delivered"]
    );
    assert_eq!(detail["order"]["order_items"][0]["item_name"], "Dumplings");
}

#[tokio::test]
async fn order_is_accepted_by_only_one_rider() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;
    let first = app.delivery_staff().await;
    let second = app.delivery_staff().await;
    let orderid = ready_order(&app, &k).await;

    let path = format!("/api/delivery/orders/{}/accept", orderid);
    let body = json!({});
    let (a, b) = tokio::join!(
        app.put_json(&path, &first.token, &body),
        app.put_json(&path, &second.token, &body)
    );

    let mut codes = vec![a.status().as_u16(), b.status().as_u16()];
    codes.sort();
    assert_eq!(codes, vec![200, 409]);
}

#[tokio::test]
async fn rider_can_hand_an_order_back() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;
    let rider = app.delivery_staff().await;
    let orderid = ready_order(&app, &k).await;
    app.put_json(&format!("/api/delivery/orders/{}/accept", orderid), &rider.token, &json!({}))
        .await;

    let released: Value = app
        .put_json(&format!("/api/delivery/orders/{}/cancel", orderid), &rider.token, &json!({}))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(released["status"], "pending");
    assert!(released["deliver_man_id"].is_null());
}

#[tokio::test]
async fn orders_are_visible_only_to_their_parties() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;
    let stranger = app.customer().await;
    let other_restaurant = app.restaurant().await;
    let order = app
        .place_order(&k.customer, json!([{"item_id": k.tea, "quantity": 1}]))
        .await;
    let path = format!("/api/orders/{}", order["orderid"].as_i64().unwrap());

    let own = app.get(&path, Some(&k.customer.token)).await;
    let restaurant = app.get(&path, Some(&k.restaurant.token)).await;
    let by_stranger = app.get(&path, Some(&stranger.token)).await;
    let by_other_restaurant = app.get(&path, Some(&other_restaurant.token)).await;

    assert!(own.status().is_success());
    assert!(restaurant.status().is_success());
    assert_eq!(by_stranger.status().as_u16(), 403);
    assert_eq!(by_other_restaurant.status().as_u16(), 403);
}

#[tokio::test]
async fn order_lists_are_per_account() {
    let app = spawn_app().await;
    let k = kitchen(&app).await;
    app.place_order(&k.customer, json!([{"item_id": k.tea, "quantity": 1}]))
        .await;
    app.place_order(&k.customer, json!([{"item_id": k.dumplings, "quantity": 1}]))
        .await;
    let other = app.customer().await;

    let mine: Vec<Value> = app.get("/api/orders", Some(&k.customer.token)).await.json().await.unwrap();
    let theirs: Vec<Value> = app.get("/api/orders", Some(&other.token)).await.json().await.unwrap();
    let incoming: Vec<Value> = app
        .get("/api/restaurant/orders", Some(&k.restaurant.token))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(mine.len(), 2);
    assert!(theirs.is_empty());
    assert_eq!(incoming.len(), 2);
}

use crate::helpers::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn restaurant_menu_is_public_and_hides_inactive_items() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    app.menu_item(&restaurant, "Char siu rice", "48.00").await;
    let hidden = app.menu_item(&restaurant, "Seasonal soup", "30.00").await;
    let response = app
        .put_json(
            &format!("/api/restaurant/menu/{}", hidden),
            &restaurant.token,
            &json!({"status": "out_of_stock"}),
        )
        .await;
    assert!(response.status().is_success());

    let public: Vec<Value> = app
        .get(&format!("/api/restaurants/{}/menu", restaurant.id), None)
        .await
        .json()
        .await
        .unwrap();
    let own: Vec<Value> = app
        .get("/api/restaurant/menu", Some(&restaurant.token))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["price"], "48.00");
    assert_eq!(own.len(), 2);
}

#[tokio::test]
async fn menu_can_be_browsed_by_category() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let item_id = app.menu_item(&restaurant, "Beef brisket noodles", "52.00").await;

    let by_category: Vec<Value> = app
        .get(
            &format!("/api/menu/restaurant/{}/category/mains", restaurant.id),
            None,
        )
        .await
        .json()
        .await
        .unwrap();
    let item: Value = app
        .get(&format!("/api/menu/item/{}", item_id), None)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(by_category.len(), 1);
    assert_eq!(item["item_name"], "Beef brisket noodles");
}

#[tokio::test]
async fn restaurants_are_listed_and_found_by_name() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let profile: Value = app
        .get("/api/restaurant/profile", Some(&restaurant.token))
        .await
        .json()
        .await
        .unwrap();
    let name = profile["restname"].as_str().unwrap();

    let found = app.get(&format!("/api/restaurants/name/{}", name), None).await;
    let listed: Vec<Value> = app.get("/api/restaurants", None).await.json().await.unwrap();

    assert!(found.status().is_success());
    assert!(listed.iter().any(|r| r["restid"].as_i64() == Some(restaurant.id as i64)));
}

#[tokio::test]
async fn only_the_owner_edits_a_menu_item() {
    let app = spawn_app().await;
    let owner = app.restaurant().await;
    let other = app.restaurant().await;
    let item_id = app.menu_item(&owner, "Egg tart", "8.00").await;

    let response = app
        .put_json(
            &format!("/api/restaurant/menu/{}", item_id),
            &other.token,
            &json!({"price": "1.00"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn ordered_menu_item_cannot_be_deleted() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;
    let customer = app.customer().await;
    let item_id = app.menu_item(&restaurant, "Milk tea", "18.00").await;
    app.place_order(&customer, json!([{"item_id": item_id, "quantity": 1}])).await;

    let response = app
        .delete(&format!("/api/restaurant/menu/{}", item_id), &restaurant.token)
        .await;

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn out_of_range_price_is_a_bad_request() {
    let app = spawn_app().await;
    let restaurant = app.restaurant().await;

    let response = app
        .post_json(
            "/api/restaurant/menu",
            Some(&restaurant.token),
            &json!({"item_name": "Golden bun", "price": "79228162514264337593543950335", "category": "mains"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

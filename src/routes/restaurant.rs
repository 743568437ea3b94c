//! Endpoints for a signed-in restaurant managing its menu and incoming orders.

use crate::domain::Role;
use crate::dto::accounts::RestaurantProfile;
use crate::dto::catalog::MenuItemResponse;
use crate::dto::orders::OrderResponse;
use crate::errors::custom::CustomError;
use crate::middleware::AuthenticatedUser;
use crate::services::accounts;
use crate::services::catalog::{self, NewMenuItemRequest, UpdateMenuItemRequest};
use crate::services::orders::{self, UpdateStatusRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::instrument;

/**
 * @route   GET /api/restaurant/profile
 * @access  JWT Protected (restaurant)
 */
pub async fn view_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let restid = user.require(Role::Restaurant)?;
    let restaurant = accounts::restaurant_profile(state.repo.as_ref(), restid).await?;
    Ok(HttpResponse::Ok().json(RestaurantProfile::from(restaurant)))
}

/******************************************/
// Menu management
/******************************************/
/**
 * @route   GET /api/restaurant/menu
 * @access  JWT Protected (restaurant)
 */
#[instrument(name = "List own menu", skip(state, user), fields(user_id = user.id()))]
pub async fn list_menu(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let restid = user.require(Role::Restaurant)?;
    let items: Vec<MenuItemResponse> = catalog::restaurant_menu(state.repo.as_ref(), restid, false)
        .await?
        .into_iter()
        .map(MenuItemResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/**
 * @route   POST /api/restaurant/menu
 * @access  JWT Protected (restaurant)
 */
#[instrument(name = "Create menu item", skip(state, user, req_item), fields(user_id = user.id()))]
pub async fn add_menu_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req_item: web::Json<NewMenuItemRequest>,
) -> Result<HttpResponse, CustomError> {
    let restid = user.require(Role::Restaurant)?;
    let item = catalog::add_menu_item(state.repo.as_ref(), restid, req_item.into_inner()).await?;
    Ok(HttpResponse::Created().json(MenuItemResponse::from(item)))
}

/**
 * @route   PUT /api/restaurant/menu/{id}
 * @access  JWT Protected (restaurant)
 */
#[instrument(name = "Edit menu item", skip(state, user, req_item), fields(user_id = user.id()))]
pub async fn update_menu_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    item_id: web::Path<i32>,
    req_item: web::Json<UpdateMenuItemRequest>,
) -> Result<HttpResponse, CustomError> {
    let restid = user.require(Role::Restaurant)?;
    let item = catalog::update_menu_item(
        state.repo.as_ref(),
        restid,
        item_id.into_inner(),
        req_item.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(MenuItemResponse::from(item)))
}

/**
 * @route   DELETE /api/restaurant/menu/{id}
 * @access  JWT Protected (restaurant)
 */
#[instrument(name = "Remove menu item", skip(state, user), fields(user_id = user.id()))]
pub async fn delete_menu_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    item_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let restid = user.require(Role::Restaurant)?;
    let item_id = item_id.into_inner();
    catalog::delete_menu_item(state.repo.as_ref(), restid, item_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": "Menu item deleted", "item_id": item_id})))
}

/******************************************/
// Incoming orders
/******************************************/
/**
 * @route   GET /api/restaurant/orders
 * @access  JWT Protected (restaurant)
 */
#[instrument(name = "List restaurant orders", skip(state, user), fields(user_id = user.id()))]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    user.require(Role::Restaurant)?;
    let orders: Vec<OrderResponse> = orders::list_orders(state.repo.as_ref(), user.caller())
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(orders))
}

/**
 * @route   GET /api/restaurant/orders/by_status
 * @access  JWT Protected (restaurant)
 */
pub async fn orders_by_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    user.require(Role::Restaurant)?;
    let grouped: BTreeMap<String, Vec<OrderResponse>> =
        orders::orders_by_status(state.repo.as_ref(), user.caller())
            .await?
            .into_iter()
            .map(|(status, list)| (status, list.into_iter().map(OrderResponse::from).collect()))
            .collect();
    Ok(HttpResponse::Ok().json(grouped))
}

/**
 * @route   PUT /api/restaurant/orders/{id}/status
 * @access  JWT Protected (restaurant)
 */
#[instrument(name = "Restaurant updates order status", skip(state, user, req_status), fields(user_id = user.id()))]
pub async fn update_order_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
    req_status: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, CustomError> {
    user.require(Role::Restaurant)?;
    let order = orders::update_order_status(
        state.repo.as_ref(),
        user.caller(),
        order_id.into_inner(),
        &req_status.status,
    )
    .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/**
 * @route   PUT /api/restaurant/orders/{id}/ready
 * @access  JWT Protected (restaurant)
 */
#[instrument(name = "Mark order ready", skip(state, user), fields(user_id = user.id()))]
pub async fn mark_ready(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let restid = user.require(Role::Restaurant)?;
    let order = orders::mark_ready(state.repo.as_ref(), restid, order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

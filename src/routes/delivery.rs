//! Endpoints for delivery staff picking up and completing orders.

use crate::domain::Role;
use crate::dto::accounts::DeliveryStaffProfile;
use crate::dto::orders::OrderResponse;
use crate::errors::custom::CustomError;
use crate::middleware::AuthenticatedUser;
use crate::services::{accounts, orders};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use tracing::instrument;

fn respond(list: Vec<crate::db_models::Order>) -> HttpResponse {
    let list: Vec<OrderResponse> = list.into_iter().map(OrderResponse::from).collect();
    HttpResponse::Ok().json(list)
}

/**
 * @route   GET /api/delivery/profile
 * @access  JWT Protected (delivery)
 */
pub async fn view_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let staff_id = user.require(Role::Delivery)?;
    let staff = accounts::delivery_staff_profile(state.repo.as_ref(), staff_id).await?;
    Ok(HttpResponse::Ok().json(DeliveryStaffProfile::from(staff)))
}

/**
 * @route   GET /api/delivery/orders
 * @access  JWT Protected (delivery)
 */
#[instrument(name = "List assigned orders", skip(state, user), fields(user_id = user.id()))]
pub async fn my_orders(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    user.require(Role::Delivery)?;
    Ok(respond(orders::list_orders(state.repo.as_ref(), user.caller()).await?))
}

/**
 * @route   GET /api/delivery/orders/available
 * @access  JWT Protected (delivery)
 */
#[instrument(name = "List available orders", skip(state, user), fields(user_id = user.id()))]
pub async fn available_orders(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    user.require(Role::Delivery)?;
    Ok(respond(orders::available_orders(state.repo.as_ref()).await?))
}

/**
 * @route   PUT /api/delivery/orders/{id}/accept
 * @access  JWT Protected (delivery)
 */
#[instrument(name = "Delivery accepts order", skip(state, user), fields(user_id = user.id()))]
pub async fn accept_order(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let staff_id = user.require(Role::Delivery)?;
    let order = orders::accept_order(state.repo.as_ref(), staff_id, order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/**
 * @route   PUT /api/delivery/orders/{id}/complete
 * @access  JWT Protected (delivery)
 */
#[instrument(name = "Complete delivery", skip(state, user), fields(user_id = user.id()))]
pub async fn complete_order(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let staff_id = user.require(Role::Delivery)?;
    let order = orders::complete_order(state.repo.as_ref(), staff_id, order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/**
 * @route   PUT /api/delivery/orders/{id}/cancel
 * @access  JWT Protected (delivery)
 */
#[instrument(name = "Hand order back", skip(state, user), fields(user_id = user.id()))]
pub async fn release_order(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let staff_id = user.require(Role::Delivery)?;
    let order = orders::release_order(state.repo.as_ref(), staff_id, order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

//! Order endpoints shared by every account kind. Access depends on the
//! caller's role and whether they are a party to the order.

use crate::domain::Role;
use crate::dto::orders::OrderResponse;
use crate::dto::reviews::ReviewResponse;
use crate::errors::custom::CustomError;
use crate::middleware::AuthenticatedUser;
use crate::services::orders::{self, CreateOrderRequest, UpdateStatusRequest};
use crate::services::reviews::{self, ReviewRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use tracing::instrument;

/******************************************/
// Placing an order
/******************************************/
/**
 * @route   POST /api/orders/create
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Place order", skip(state, user, req_order), fields(user_id = user.id()))]
pub async fn create_order(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req_order: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let order = orders::create_order(
        state.repo.as_ref(),
        state.carts.as_ref(),
        custid,
        req_order.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(order))
}

/**
 * @route   GET /api/orders
 * @access  JWT Protected
 */
#[instrument(name = "List my orders", skip(state, user), fields(user_id = user.id()))]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let list: Vec<OrderResponse> = orders::list_orders(state.repo.as_ref(), user.caller())
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(list))
}

/**
 * @route   GET /api/orders/{id}
 * @access  JWT Protected
 */
#[instrument(name = "Get order", skip(state, user), fields(user_id = user.id()))]
pub async fn get_order(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let detail = orders::order_detail(state.repo.as_ref(), user.caller(), order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/**
 * @route   GET /api/orders/{id}/history
 * @access  JWT Protected
 */
pub async fn order_history(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let history = orders::history(state.repo.as_ref(), user.caller(), order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(history))
}

/******************************************/
// Status changes
/******************************************/
/**
 * @route   PUT /api/orders/{id}/status
 * @access  JWT Protected
 */
#[instrument(name = "Order status request", skip(state, user, req_status), fields(user_id = user.id(), status = %req_status.status))]
pub async fn update_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
    req_status: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, CustomError> {
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
 * @route   PUT /api/orders/{id}/cancel
 * @access  JWT Protected
 */
#[instrument(name = "Cancel order request", skip(state, user), fields(user_id = user.id()))]
pub async fn cancel_order(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let order = orders::cancel_order(state.repo.as_ref(), user.caller(), order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/******************************************/
// Reviews
/******************************************/
/**
 * @route   POST /api/orders/{id}/review
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Review order", skip(state, user, req_review), fields(user_id = user.id()))]
pub async fn submit_review(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
    req_review: web::Json<ReviewRequest>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let review = reviews::submit_review(
        state.repo.as_ref(),
        custid,
        order_id.into_inner(),
        req_review.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

/**
 * @route   GET /api/orders/{id}/review
 * @access  JWT Protected
 */
pub async fn get_review(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    order_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let review =
        reviews::get_review(state.repo.as_ref(), user.caller(), order_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ReviewResponse::from(review)))
}

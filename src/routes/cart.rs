use crate::domain::money::from_cents;
use crate::domain::Role;
use crate::errors::custom::CustomError;
use crate::middleware::AuthenticatedUser;
use crate::services::cart::{self, AddToCartRequest, CartResponse, UpdateCartItemRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

/**
 * @route   GET /api/cart/items
 * @access  JWT Protected (customer)
 */
pub async fn view_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let cart = state.carts.get(custid).await;
    Ok(HttpResponse::Ok().json(CartResponse::try_from(cart)?))
}

/**
 * @route   POST /api/cart/add
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Add to cart", skip(state, user, req_item), fields(user_id = user.id(), item_id = req_item.item_id))]
pub async fn add_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req_item: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let cart = cart::add_item(
        state.repo.as_ref(),
        state.carts.as_ref(),
        custid,
        req_item.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(CartResponse::try_from(cart)?))
}

/**
 * @route   PUT /api/cart/items/{item_id}
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Change cart quantity", skip(state, user, req_quantity), fields(user_id = user.id()))]
pub async fn update_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    item_id: web::Path<i32>,
    req_quantity: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let cart = cart::update_item(
        state.carts.as_ref(),
        custid,
        item_id.into_inner(),
        req_quantity.quantity,
    )
    .await?;
    Ok(HttpResponse::Ok().json(CartResponse::try_from(cart)?))
}

/**
 * @route   DELETE /api/cart/remove/{item_id}
 * @access  JWT Protected (customer)
 */
pub async fn remove_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    item_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let cart = state.carts.remove(custid, item_id.into_inner()).await;
    Ok(HttpResponse::Ok().json(CartResponse::try_from(cart)?))
}

/**
 * @route   DELETE /api/cart/clear
 * @access  JWT Protected (customer)
 */
pub async fn clear_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    state.carts.clear(custid).await;
    Ok(HttpResponse::Ok().json(json!({"message": "Cart cleared"})))
}

/**
 * @route   GET /api/cart/total
 * @access  JWT Protected (customer)
 */
pub async fn cart_total(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let cart = state.carts.get(custid).await;
    Ok(HttpResponse::Ok().json(json!({"total": from_cents(cart.total_cents()?)})))
}

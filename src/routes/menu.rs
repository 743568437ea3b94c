//! Public menu browsing. Listings hold orderable items unless noted.

use crate::dto::catalog::MenuItemResponse;
use crate::errors::custom::CustomError;
use crate::services::catalog;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

fn respond(items: Vec<crate::db_models::MenuItem>) -> HttpResponse {
    let items: Vec<MenuItemResponse> = items.into_iter().map(MenuItemResponse::from).collect();
    HttpResponse::Ok().json(items)
}

/**
 * @route   GET /api/menu/restaurant/{id}
 * @access  Public
 */
pub async fn by_restaurant(
    state: web::Data<AppState>,
    restid: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let items = catalog::restaurant_menu(state.repo.as_ref(), restid.into_inner(), true).await?;
    Ok(respond(items))
}

/**
 * @route   GET /api/menu/restaurant/{id}/all
 * @access  Public
 */
pub async fn all_by_restaurant(
    state: web::Data<AppState>,
    restid: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let items = catalog::restaurant_menu(state.repo.as_ref(), restid.into_inner(), false).await?;
    Ok(respond(items))
}

/**
 * @route   GET /api/menu/category/{category}
 * @access  Public
 */
pub async fn by_category(
    state: web::Data<AppState>,
    category: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let items = catalog::menu_by_category(state.repo.as_ref(), &category, None).await?;
    Ok(respond(items))
}

/**
 * @route   GET /api/menu/restaurant/{id}/category/{category}
 * @access  Public
 */
pub async fn by_restaurant_and_category(
    state: web::Data<AppState>,
    path: web::Path<(i32, String)>,
) -> Result<HttpResponse, CustomError> {
    let (restid, category) = path.into_inner();
    let items = catalog::menu_by_category(state.repo.as_ref(), &category, Some(restid)).await?;
    Ok(respond(items))
}

/**
 * @route   GET /api/menu/item/{id}
 * @access  Public
 */
pub async fn get_item(
    state: web::Data<AppState>,
    item_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let item = catalog::get_menu_item(state.repo.as_ref(), item_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MenuItemResponse::from(item)))
}

//! Public restaurant directory.

use crate::dto::accounts::RestaurantProfile;
use crate::dto::catalog::MenuItemResponse;
use crate::errors::custom::CustomError;
use crate::services::{catalog, reviews};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use tracing::instrument;

/**
 * @route   GET /api/restaurants
 * @access  Public
 */
#[instrument(name = "List restaurants", skip(state))]
pub async fn list_restaurants(state: web::Data<AppState>) -> Result<HttpResponse, CustomError> {
    let restaurants: Vec<RestaurantProfile> = catalog::list_restaurants(state.repo.as_ref())
        .await?
        .into_iter()
        .map(RestaurantProfile::from)
        .collect();
    Ok(HttpResponse::Ok().json(restaurants))
}

/**
 * @route   GET /api/restaurants/{id}
 * @access  Public
 */
pub async fn get_restaurant(
    state: web::Data<AppState>,
    restid: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let restaurant = catalog::get_restaurant(state.repo.as_ref(), restid.into_inner()).await?;
    Ok(HttpResponse::Ok().json(RestaurantProfile::from(restaurant)))
}

/**
 * @route   GET /api/restaurants/name/{name}
 * @access  Public
 */
pub async fn get_restaurant_by_name(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let restaurant = catalog::get_restaurant_by_name(state.repo.as_ref(), &name).await?;
    Ok(HttpResponse::Ok().json(RestaurantProfile::from(restaurant)))
}

/**
 * @route   GET /api/restaurants/{id}/menu
 * @access  Public
 */
#[instrument(name = "View restaurant menu", skip(state))]
pub async fn restaurant_menu(
    state: web::Data<AppState>,
    restid: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let menu: Vec<MenuItemResponse> =
        catalog::restaurant_menu(state.repo.as_ref(), restid.into_inner(), true)
            .await?
            .into_iter()
            .map(MenuItemResponse::from)
            .collect();
    Ok(HttpResponse::Ok().json(menu))
}

/**
 * @route   GET /api/restaurants/{id}/rating
 * @access  Public
 */
pub async fn restaurant_rating(
    state: web::Data<AppState>,
    restid: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let rating = reviews::restaurant_rating(state.repo.as_ref(), restid.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rating))
}

use crate::db_models::{MenuItem, MenuItemChanges, NewMenuItem, Restaurant};
use crate::domain::money::to_cents;
use crate::domain::MenuItemStatus;
use crate::errors::custom::{CustomError, DbError};
use crate::repository::Repository;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct NewMenuItemRequest {
    pub item_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub status: Option<MenuItemStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub status: Option<MenuItemStatus>,
}

fn parse_price(price: Decimal) -> Result<i64, CustomError> {
    to_cents(price).map_err(CustomError::ValidationError)
}

fn parse_item_name(name: String) -> Result<String, CustomError> {
    let name = name.trim().to_string();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(CustomError::ValidationError(
            "Item name must be between 1 and 100 characters.".to_string(),
        ));
    }
    Ok(name)
}

fn is_open(restaurant: &Restaurant) -> bool {
    restaurant.is_validate && restaurant.deleted_time.is_none()
}

/******************************************/
// Public browsing
/******************************************/
pub async fn list_restaurants(repo: &dyn Repository) -> Result<Vec<Restaurant>, CustomError> {
    Ok(repo.list_restaurants().await?)
}

/// Inactive or deleted restaurants are reported as missing.
pub async fn get_restaurant(repo: &dyn Repository, restid: i32) -> Result<Restaurant, CustomError> {
    repo.find_restaurant(restid)
        .await?
        .filter(is_open)
        .ok_or_else(|| CustomError::NotFound(format!("Restaurant {} not found", restid)))
}

pub async fn get_restaurant_by_name(
    repo: &dyn Repository,
    name: &str,
) -> Result<Restaurant, CustomError> {
    repo.find_restaurant_by_name(name.trim())
        .await?
        .filter(is_open)
        .ok_or_else(|| CustomError::NotFound(format!("Restaurant {} not found", name)))
}

/// `active_only` hides inactive and sold-out items from customers.
pub async fn restaurant_menu(
    repo: &dyn Repository,
    restid: i32,
    active_only: bool,
) -> Result<Vec<MenuItem>, CustomError> {
    get_restaurant(repo, restid).await?;
    let status = active_only.then_some(MenuItemStatus::Active);
    Ok(repo.list_menu(restid, status).await?)
}

pub async fn menu_by_category(
    repo: &dyn Repository,
    category: &str,
    restid: Option<i32>,
) -> Result<Vec<MenuItem>, CustomError> {
    Ok(repo.list_menu_by_category(category.trim(), restid).await?)
}

pub async fn get_menu_item(repo: &dyn Repository, item_id: i32) -> Result<MenuItem, CustomError> {
    repo.find_menu_item(item_id)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Menu item {} not found", item_id)))
}

/******************************************/
// Restaurant-owned menu management
/******************************************/
async fn owned_item(
    repo: &dyn Repository,
    restid: i32,
    item_id: i32,
) -> Result<MenuItem, CustomError> {
    let item = get_menu_item(repo, item_id).await?;
    if item.restid != restid {
        return Err(CustomError::Forbidden(format!(
            "Menu item {} belongs to another restaurant",
            item_id
        )));
    }
    Ok(item)
}

#[instrument(name = "Add menu item", skip(repo, request), fields(item_name = %request.item_name))]
pub async fn add_menu_item(
    repo: &dyn Repository,
    restid: i32,
    request: NewMenuItemRequest,
) -> Result<MenuItem, CustomError> {
    let item = NewMenuItem {
        restid,
        category: request.category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        item_name: parse_item_name(request.item_name)?,
        description: request.description,
        price_cents: parse_price(request.price)?,
        status: request.status.unwrap_or_default(),
        created_time: Utc::now().naive_utc(),
    };
    Ok(repo.insert_menu_item(item).await?)
}

#[instrument(name = "Update menu item", skip(repo, request))]
pub async fn update_menu_item(
    repo: &dyn Repository,
    restid: i32,
    item_id: i32,
    request: UpdateMenuItemRequest,
) -> Result<MenuItem, CustomError> {
    owned_item(repo, restid, item_id).await?;
    let changes = MenuItemChanges {
        category: request.category,
        item_name: request.item_name.map(parse_item_name).transpose()?,
        description: request.description,
        price_cents: request.price.map(parse_price).transpose()?,
        status: request.status,
    };
    repo.update_menu_item(item_id, changes)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Menu item {} not found", item_id)))
}

#[instrument(name = "Delete menu item", skip(repo))]
pub async fn delete_menu_item(
    repo: &dyn Repository,
    restid: i32,
    item_id: i32,
) -> Result<(), CustomError> {
    owned_item(repo, restid, item_id).await?;
    match repo.delete_menu_item(item_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(CustomError::NotFound(format!(
            "Menu item {} not found",
            item_id
        ))),
        Err(DbError::ForeignKeyViolation(_)) => Err(CustomError::Conflict(format!(
            "Menu item {} appears in existing orders; mark it inactive instead",
            item_id
        ))),
        Err(err) => Err(err.into()),
    }
}

use crate::db_models::MenuItem;
use crate::domain::money::from_cents;
use crate::domain::MenuItemStatus;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MenuItemResponse {
    pub item_id: i32,
    pub restid: i32,
    pub item_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub status: MenuItemStatus,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            item_id: item.item_id,
            restid: item.restid,
            item_name: item.item_name,
            description: item.description,
            price: from_cents(item.price_cents),
            category: item.category,
            status: item.status,
        }
    }
}

//! Per-customer shopping carts held in process memory.
//!
//! Every mutation goes through [`moka`]'s per-key `and_compute_with`, so two
//! requests adding the same item for the same customer both count.

use crate::config::configuration::CartSettings;
use crate::domain::money::from_cents;
use crate::errors::custom::{CustomError, OrderError};
use crate::repository::Repository;
use async_trait::async_trait;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item_id: i32,
    pub restid: i32,
    pub item_name: String,
    pub price_cents: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// All lines share one restaurant.
    pub fn restaurant(&self) -> Option<i32> {
        self.lines.first().map(|line| line.restid)
    }

    pub fn total_cents(&self) -> Result<i64, CustomError> {
        self.checked_total().ok_or_else(too_large)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn checked_total(&self) -> Option<i64> {
        self.lines
            .iter()
            .try_fold(0i64, |total, line| total.checked_add(line.subtotal_cents()?))
    }

    /// Returns false, leaving the cart untouched, when the quantity or total would overflow.
    fn add(&mut self, line: CartLine) -> bool {
        let mut updated = self.clone();
        match updated.lines.iter_mut().find(|l| l.item_id == line.item_id) {
            Some(existing) => match existing.quantity.checked_add(line.quantity) {
                Some(quantity) => existing.quantity = quantity,
                None => return false,
            },
            None => updated.lines.push(line),
        }
        if updated.checked_total().is_none() {
            return false;
        }
        *self = updated;
        true
    }
}

impl CartLine {
    fn subtotal_cents(&self) -> Option<i64> {
        self.price_cents.checked_mul(i64::from(self.quantity))
    }
}

fn too_large() -> CustomError {
    CustomError::ValidationError("Cart quantity or total is too large.".to_string())
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn get(&self, custid: i32) -> Cart;

    /// Adds `line`, or bumps the quantity of the same item already in the cart.
    async fn add(&self, custid: i32, line: CartLine) -> Result<Cart, CustomError>;

    /// A quantity of zero or less removes the line. `None` when the item is not in the cart.
    async fn set_quantity(&self, custid: i32, item_id: i32, quantity: i32) -> Option<Cart>;

    async fn remove(&self, custid: i32, item_id: i32) -> Cart;

    async fn clear(&self, custid: i32);
}

pub struct MokaCartStore {
    carts: Cache<i32, Cart>,
}

impl MokaCartStore {
    pub fn new(settings: &CartSettings) -> Self {
        let carts = Cache::builder()
            .max_capacity(settings.max_carts)
            .time_to_idle(Duration::from_secs(settings.idle_timeout_minutes * 60))
            .build();
        Self { carts }
    }
}

#[async_trait]
impl CartStore for MokaCartStore {
    async fn get(&self, custid: i32) -> Cart {
        self.carts.get(&custid).await.unwrap_or_default()
    }

    async fn add(&self, custid: i32, line: CartLine) -> Result<Cart, CustomError> {
        let restid = line.restid;
        let result = self
            .carts
            .entry(custid)
            .and_compute_with(|current| async move {
                let mut cart = current.map(|entry| entry.into_value()).unwrap_or_default();
                if cart.restaurant().is_some_and(|restid| restid != line.restid) {
                    return Op::Nop;
                }
                if !cart.add(line) {
                    return Op::Nop;
                }
                Op::Put(cart)
            })
            .await;
        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                Ok(entry.into_value())
            }
            CompResult::Unchanged(entry) => {
                // The closure left the cart alone for one of two reasons.
                if entry.value().restaurant().is_some_and(|current| current != restid) {
                    Err(OrderError::MixedRestaurants.into())
                } else {
                    Err(too_large())
                }
            }
            CompResult::StillNone(_) | CompResult::Removed(_) => Err(too_large()),
        }
    }

    async fn set_quantity(&self, custid: i32, item_id: i32, quantity: i32) -> Option<Cart> {
        let result = self
            .carts
            .entry(custid)
            .and_compute_with(|current| async move {
                let Some(mut cart) = current.map(|entry| entry.into_value()) else {
                    return Op::Nop;
                };
                let Some(position) = cart.lines.iter().position(|l| l.item_id == item_id) else {
                    return Op::Nop;
                };
                if quantity <= 0 {
                    cart.lines.remove(position);
                } else {
                    cart.lines[position].quantity = quantity;
                }
                Op::Put(cart)
            })
            .await;
        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                Some(entry.into_value())
            }
            CompResult::Unchanged(_) | CompResult::StillNone(_) | CompResult::Removed(_) => None,
        }
    }

    async fn remove(&self, custid: i32, item_id: i32) -> Cart {
        let result = self
            .carts
            .entry(custid)
            .and_compute_with(|current| async move {
                let Some(mut cart) = current.map(|entry| entry.into_value()) else {
                    return Op::Nop;
                };
                cart.lines.retain(|line| line.item_id != item_id);
                Op::Put(cart)
            })
            .await;
        match result {
            CompResult::Inserted(entry)
            | CompResult::ReplacedWith(entry)
            | CompResult::Unchanged(entry) => entry.into_value(),
            CompResult::StillNone(_) | CompResult::Removed(_) => Cart::default(),
        }
    }

    async fn clear(&self, custid: i32) {
        self.carts.invalidate(&custid).await;
    }
}

/******************************************/
// Cart operations used by the routes
/******************************************/
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub item_id: i32,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLineResponse {
    pub item_id: i32,
    pub restid: i32,
    pub item_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub restid: Option<i32>,
    pub items: Vec<CartLineResponse>,
    pub total: Decimal,
}

impl TryFrom<Cart> for CartResponse {
    type Error = CustomError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        let total = from_cents(cart.total_cents()?);
        let restid = cart.restaurant();
        let items = cart
            .lines
            .into_iter()
            .map(|line| {
                let subtotal = line.subtotal_cents().ok_or_else(too_large)?;
                Ok(CartLineResponse {
                    item_id: line.item_id,
                    restid: line.restid,
                    price: from_cents(line.price_cents),
                    item_name: line.item_name,
                    quantity: line.quantity,
                    subtotal: from_cents(subtotal),
                })
            })
            .collect::<Result<Vec<_>, CustomError>>()?;
        Ok(Self {
            restid,
            items,
            total,
        })
    }
}

/// Prices and names always come from the catalog, never from the client.
#[instrument(name = "Add item to cart", skip(repo, carts))]
pub async fn add_item(
    repo: &dyn Repository,
    carts: &dyn CartStore,
    custid: i32,
    request: AddToCartRequest,
) -> Result<Cart, CustomError> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(CustomError::ValidationError(
            "Quantity must be at least 1.".to_string(),
        ));
    }
    let item = repo
        .find_menu_item(request.item_id)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Menu item {} not found", request.item_id)))?;
    if !item.status.is_orderable() {
        return Err(OrderError::ItemUnavailable(item.item_id).into());
    }
    carts
        .add(
            custid,
            CartLine {
                item_id: item.item_id,
                restid: item.restid,
                item_name: item.item_name,
                price_cents: item.price_cents,
                quantity,
            },
        )
        .await
}

pub async fn update_item(
    carts: &dyn CartStore,
    custid: i32,
    item_id: i32,
    quantity: i32,
) -> Result<Cart, CustomError> {
    carts
        .set_quantity(custid, item_id, quantity)
        .await
        .ok_or_else(|| CustomError::NotFound(format!("Item {} is not in the cart", item_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_matches, assert_none, assert_ok, assert_ok_eq};

    fn store() -> MokaCartStore {
        MokaCartStore::new(&CartSettings {
            idle_timeout_minutes: 10,
            max_carts: 100,
        })
    }

    fn line(item_id: i32, restid: i32, price_cents: i64, quantity: i32) -> CartLine {
        CartLine {
            item_id,
            restid,
            item_name: format!("item {item_id}"),
            price_cents,
            quantity,
        }
    }

    #[tokio::test]
    async fn adding_the_same_item_twice_increments_quantity() {
        let carts = store();
        assert_ok!(carts.add(1, line(10, 5, 1000, 1)).await);
        let cart = assert_ok!(carts.add(1, line(10, 5, 1000, 2)).await);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_ok_eq!(cart.total_cents(), 3000);
    }

    #[tokio::test]
    async fn concurrent_adds_are_not_lost() {
        let carts = std::sync::Arc::new(store());
        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let carts = carts.clone();
                tokio::spawn(async move { carts.add(1, line(10, 5, 100, 1)).await })
            })
            .collect();
        for task in tasks {
            assert_ok!(task.await.unwrap());
        }
        assert_eq!(carts.get(1).await.lines[0].quantity, 20);
    }

    #[tokio::test]
    async fn items_from_another_restaurant_are_refused() {
        let carts = store();
        carts.add(1, line(10, 5, 1000, 1)).await.unwrap();
        let result = carts.add(1, line(11, 6, 500, 1)).await;
        assert_matches!(result, Err(CustomError::OrderError(OrderError::MixedRestaurants)));
        assert_eq!(carts.get(1).await.lines.len(), 1);
    }

    #[tokio::test]
    async fn quantity_overflow_is_refused_and_keeps_the_cart() {
        let carts = store();
        carts.add(1, line(10, 5, 1, i32::MAX)).await.unwrap();
        let result = carts.add(1, line(10, 5, 1, i32::MAX)).await;
        assert_matches!(result, Err(CustomError::ValidationError(_)));
        assert_eq!(carts.get(1).await.lines[0].quantity, i32::MAX);
    }

    #[tokio::test]
    async fn total_overflow_is_refused() {
        let carts = store();
        carts.add(1, line(10, 5, i64::MAX / 2 + 1, 1)).await.unwrap();
        let result = carts.add(1, line(11, 5, i64::MAX / 2 + 1, 1)).await;
        assert_matches!(result, Err(CustomError::ValidationError(_)));
        assert_eq!(carts.get(1).await.lines.len(), 1);
    }

    #[test]
    fn oversized_cart_reports_an_error_instead_of_a_total() {
        let cart = Cart {
            lines: vec![line(10, 5, i64::MAX / 2 + 1, 2)],
        };
        assert_err!(cart.total_cents());
        assert_matches!(
            CartResponse::try_from(cart),
            Err(CustomError::ValidationError(_))
        );
    }

    #[test]
    fn response_carries_line_subtotals() {
        let cart = Cart {
            lines: vec![line(10, 5, 1250, 2), line(11, 5, 300, 1)],
        };
        let response = assert_ok!(CartResponse::try_from(cart));
        assert_eq!(response.restid, Some(5));
        assert_eq!(response.items[0].subtotal.to_string(), "25.00");
        assert_eq!(response.total.to_string(), "28.00");
    }

    #[tokio::test]
    async fn zero_quantity_removes_the_line() {
        let carts = store();
        carts.add(1, line(10, 5, 1000, 1)).await.unwrap();
        carts.add(1, line(11, 5, 500, 1)).await.unwrap();
        let cart = carts.set_quantity(1, 10, 0).await.unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_none!(carts.set_quantity(1, 99, 2).await);
    }

    #[tokio::test]
    async fn carts_are_isolated_per_customer() {
        let carts = store();
        carts.add(1, line(10, 5, 1000, 1)).await.unwrap();
        assert!(carts.get(2).await.is_empty());
        carts.clear(1).await;
        assert!(carts.get(1).await.is_empty());
    }
}

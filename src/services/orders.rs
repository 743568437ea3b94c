//! Order lifecycle: creation, status changes and delivery hand-offs.
//!
//! Every status change is checked against [`OrderStatus::allowed_next`] and
//! then applied as a compare-and-set on the status it was read with. When the
//! store reports that nothing matched, another request got there first.

use crate::db_models::{NewOrder, Order, OrderItem, OrderLine};
use crate::domain::{OrderStatus, Role};
use crate::dto::orders::{OrderDetailResponse, OrderItemResponse, OrderResponse, StatusRecord};
use crate::errors::custom::{CustomError, OrderError};
use crate::repository::{OrderFilter, Repository};
use crate::services::cart::CartStore;
use crate::services::catalog;
use chrono::Utc;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

/// Who is acting on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
    pub id: i32,
}

impl Caller {
    pub fn new(role: Role, id: i32) -> Self {
        Self { role, id }
    }

    /// Target states this kind of account may request through a status update.
    fn may_request(self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        match self.role {
            Role::Customer => matches!(target, Cancelled),
            Role::Restaurant => matches!(target, Preparing | Ready | Cancelled),
            Role::Delivery => matches!(target, Delivered),
        }
    }

    fn is_party_to(self, order: &Order) -> bool {
        match self.role {
            Role::Customer => order.custid == self.id,
            Role::Restaurant => order.restid == self.id,
            Role::Delivery => {
                order.deliver_man_id == Some(self.id)
                    || (order.deliver_man_id.is_none() && order.status == OrderStatus::Ready)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub item_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub restid: Option<i32>,
    pub addressid: Option<i32>,
    pub shipping_address: Option<String>,
    pub remark: Option<String>,
    /// When absent the customer's cart is ordered instead.
    pub items: Option<Vec<OrderItemRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn not_found(orderid: i32) -> CustomError {
    CustomError::NotFound(format!("Order {} not found", orderid))
}

async fn load_order(repo: &dyn Repository, orderid: i32) -> Result<Order, CustomError> {
    repo.find_order(orderid)
        .await?
        .ok_or_else(|| not_found(orderid))
}

pub(crate) async fn load_order_for(
    repo: &dyn Repository,
    caller: Caller,
    orderid: i32,
) -> Result<Order, CustomError> {
    let order = load_order(repo, orderid).await?;
    if !caller.is_party_to(&order) {
        return Err(CustomError::Forbidden(format!(
            "Order {} does not belong to you",
            orderid
        )));
    }
    Ok(order)
}

/// Sums quantities of repeated items, keeping first-seen order.
fn merge_lines(requested: Vec<(i32, i32)>) -> Result<Vec<(i32, i32)>, CustomError> {
    let mut merged: Vec<(i32, i32)> = Vec::with_capacity(requested.len());
    for (item_id, quantity) in requested {
        if quantity < 1 {
            return Err(CustomError::ValidationError(format!(
                "Quantity of item {} must be at least 1.",
                item_id
            )));
        }
        match merged.iter_mut().find(|(id, _)| *id == item_id) {
            Some((_, total)) => {
                *total = total.checked_add(quantity).ok_or_else(|| {
                    CustomError::ValidationError("Quantity is too large.".to_string())
                })?
            }
            None => merged.push((item_id, quantity)),
        }
    }
    Ok(merged)
}

async fn resolve_shipping_address(
    repo: &dyn Repository,
    custid: i32,
    request: &CreateOrderRequest,
) -> Result<(Option<i32>, String), CustomError> {
    let chosen = match request.addressid {
        Some(addressid) => match repo.find_address(addressid).await? {
            Some(address) if address.custid == custid => Some(address),
            _ => {
                return Err(CustomError::NotFound(format!(
                    "Address {} not found",
                    addressid
                )))
            }
        },
        None => None,
    };
    let free_text = request
        .shipping_address
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    if let Some(text) = free_text {
        return Ok((chosen.map(|a| a.addressid), text.to_string()));
    }
    if let Some(address) = chosen {
        return Ok((Some(address.addressid), address.one_line()));
    }
    match repo.default_address(custid).await? {
        Some(address) => Ok((Some(address.addressid), address.one_line())),
        None => Err(CustomError::ValidationError(
            "A shipping address is required.".to_string(),
        )),
    }
}

/// Prices come from the catalog at the moment of ordering.
#[instrument(name = "Create order", skip(repo, carts, request))]
pub async fn create_order(
    repo: &dyn Repository,
    carts: &dyn CartStore,
    custid: i32,
    request: CreateOrderRequest,
) -> Result<OrderResponse, CustomError> {
    let from_cart = request.items.is_none();
    let requested = match &request.items {
        Some(items) => items.iter().map(|i| (i.item_id, i.quantity)).collect(),
        None => carts
            .get(custid)
            .await
            .lines
            .into_iter()
            .map(|line| (line.item_id, line.quantity))
            .collect(),
    };
    let requested = merge_lines(requested)?;
    if requested.is_empty() {
        return Err(OrderError::EmptyOrder.into());
    }

    let ids: Vec<i32> = requested.iter().map(|(id, _)| *id).collect();
    let catalog_items: HashMap<i32, _> = repo
        .find_menu_items(&ids)
        .await?
        .into_iter()
        .map(|item| (item.item_id, item))
        .collect();

    let mut restid = request.restid;
    let mut lines = Vec::with_capacity(requested.len());
    let mut total_cents: i64 = 0;
    for (item_id, quantity) in requested {
        let item = catalog_items
            .get(&item_id)
            .ok_or_else(|| CustomError::NotFound(format!("Menu item {} not found", item_id)))?;
        match restid {
            Some(expected) if expected != item.restid => {
                return Err(OrderError::MixedRestaurants.into())
            }
            _ => restid = Some(item.restid),
        }
        if !item.status.is_orderable() {
            return Err(OrderError::ItemUnavailable(item_id).into());
        }
        let line_total = item
            .price_cents
            .checked_mul(i64::from(quantity))
            .and_then(|line_total| total_cents.checked_add(line_total))
            .ok_or_else(|| CustomError::ValidationError("Order total is too large.".into()))?;
        total_cents = line_total;
        lines.push(OrderLine {
            item_id,
            quantity,
            price_cents: item.price_cents,
        });
    }
    let restid = restid.ok_or(OrderError::EmptyOrder)?;
    catalog::get_restaurant(repo, restid).await?;

    let (addressid, shipping_address) = resolve_shipping_address(repo, custid, &request).await?;
    let now = Utc::now().naive_utc();
    let new_order = NewOrder {
        custid,
        restid,
        addressid,
        shipping_address,
        status: OrderStatus::Pending,
        remark: request.remark.filter(|r| !r.trim().is_empty()),
        total_cents,
        discount_cents: 0,
        created_time: now,
        updated_time: now,
    };
    let (order, items) = repo.insert_order(new_order, lines).await?;
    if from_cart {
        carts.clear(custid).await;
    }
    tracing::info!(orderid = order.orderid, total_cents, "Order created");

    let names: HashMap<i32, String> = catalog_items
        .into_iter()
        .map(|(id, item)| (id, item.item_name))
        .collect();
    let items = items
        .into_iter()
        .map(|item| {
            let name = names.get(&item.item_id).cloned();
            OrderItemResponse::new(item, name)
        })
        .collect();
    Ok(OrderResponse::with_items(order, items))
}

async fn item_responses(
    repo: &dyn Repository,
    items: Vec<OrderItem>,
) -> Result<Vec<OrderItemResponse>, CustomError> {
    let ids: Vec<i32> = items.iter().map(|item| item.item_id).collect();
    let names: HashMap<i32, String> = repo
        .find_menu_items(&ids)
        .await?
        .into_iter()
        .map(|item| (item.item_id, item.item_name))
        .collect();
    Ok(items
        .into_iter()
        .map(|item| {
            let name = names.get(&item.item_id).cloned();
            OrderItemResponse::new(item, name)
        })
        .collect())
}

/// Timeline derived from the current status and the stored timestamps.
/// Steps the order passed without a recorded time carry no timestamp.
pub fn order_history(order: &Order) -> Vec<StatusRecord> {
    let mut history = vec![StatusRecord {
        status: OrderStatus::Pending,
        timestamp: Some(order.created_time),
        description: "Order placed, waiting for the restaurant to confirm",
    }];
    let reached = order.status.stage().unwrap_or(0);
    if reached >= 1 {
        history.push(StatusRecord {
            status: OrderStatus::Preparing,
            timestamp: None,
            description: "Restaurant confirmed the order and is preparing it",
        });
    }
    if reached >= 2 {
        history.push(StatusRecord {
            status: OrderStatus::Ready,
            timestamp: None,
            description: "Order is ready for pickup",
        });
    }
    if reached >= 3 {
        history.push(StatusRecord {
            status: OrderStatus::OutForDelivery,
            timestamp: order.start_deliver_time,
            description: "Delivery staff picked up the order",
        });
    }
    if reached >= 4 {
        history.push(StatusRecord {
            status: OrderStatus::Delivered,
            timestamp: order.end_deliver_time,
            description: "Order delivered",
        });
    }
    if order.status == OrderStatus::Cancelled {
        history.push(StatusRecord {
            status: OrderStatus::Cancelled,
            timestamp: Some(order.updated_time),
            description: "Order cancelled",
        });
    }
    history
}

pub async fn order_detail(
    repo: &dyn Repository,
    caller: Caller,
    orderid: i32,
) -> Result<OrderDetailResponse, CustomError> {
    let order = load_order_for(repo, caller, orderid).await?;
    let history = order_history(&order);
    let items = item_responses(repo, repo.order_items(orderid).await?).await?;
    Ok(OrderDetailResponse {
        order: OrderResponse::with_items(order, items),
        history,
    })
}

pub async fn history(
    repo: &dyn Repository,
    caller: Caller,
    orderid: i32,
) -> Result<Vec<StatusRecord>, CustomError> {
    let order = load_order_for(repo, caller, orderid).await?;
    Ok(order_history(&order))
}

/// Orders the caller is a party to, newest first.
pub async fn list_orders(repo: &dyn Repository, caller: Caller) -> Result<Vec<Order>, CustomError> {
    let filter = match caller.role {
        Role::Customer => OrderFilter::Customer(caller.id),
        Role::Restaurant => OrderFilter::Restaurant(caller.id),
        Role::Delivery => OrderFilter::DeliveryStaff(caller.id),
    };
    Ok(repo.list_orders(filter).await?)
}

/// Same listing, grouped by status.
pub async fn orders_by_status(
    repo: &dyn Repository,
    caller: Caller,
) -> Result<BTreeMap<String, Vec<Order>>, CustomError> {
    let mut grouped: BTreeMap<String, Vec<Order>> = BTreeMap::new();
    for order in list_orders(repo, caller).await? {
        grouped
            .entry(order.status.to_string())
            .or_default()
            .push(order);
    }
    Ok(grouped)
}

pub async fn available_orders(repo: &dyn Repository) -> Result<Vec<Order>, CustomError> {
    Ok(repo.list_orders(OrderFilter::Available).await?)
}

#[instrument(name = "Update order status", skip(repo))]
pub async fn update_order_status(
    repo: &dyn Repository,
    caller: Caller,
    orderid: i32,
    status: &str,
) -> Result<Order, CustomError> {
    let target = status
        .parse::<OrderStatus>()
        .map_err(OrderError::InvalidStatus)?;
    let order = load_order_for(repo, caller, orderid).await?;

    if !caller.may_request(target) {
        return Err(OrderError::NotPermitted(target).into());
    }
    if !order.status.can_transition_to(target) {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: target,
        }
        .into());
    }
    if target == OrderStatus::Delivered {
        return complete_order(repo, caller.id, orderid).await;
    }

    let updated = repo
        .compare_and_set_status(orderid, order.status, target, Utc::now().naive_utc())
        .await?
        .ok_or(OrderError::StatusChanged(orderid))?;
    tracing::info!(from = %order.status, to = %target, "Order status changed");
    Ok(updated)
}

pub async fn mark_ready(
    repo: &dyn Repository,
    restid: i32,
    orderid: i32,
) -> Result<Order, CustomError> {
    update_order_status(
        repo,
        Caller::new(Role::Restaurant, restid),
        orderid,
        OrderStatus::Ready.as_str(),
    )
    .await
}

/// Customers and restaurants cancel outright; delivery staff hand the order back.
#[instrument(name = "Cancel order", skip(repo))]
pub async fn cancel_order(
    repo: &dyn Repository,
    caller: Caller,
    orderid: i32,
) -> Result<Order, CustomError> {
    match caller.role {
        Role::Customer | Role::Restaurant => {
            update_order_status(repo, caller, orderid, OrderStatus::Cancelled.as_str()).await
        }
        Role::Delivery => release_order(repo, caller.id, orderid).await,
    }
}

#[instrument(name = "Release order", skip(repo))]
pub async fn release_order(
    repo: &dyn Repository,
    staff_id: i32,
    orderid: i32,
) -> Result<Order, CustomError> {
    let order = load_order(repo, orderid).await?;
    if order.deliver_man_id != Some(staff_id) {
        return Err(CustomError::Forbidden(format!(
            "Order {} is not assigned to you",
            orderid
        )));
    }
    if order.status != OrderStatus::OutForDelivery {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Pending,
        }
        .into());
    }
    let released = repo
        .release_delivery(orderid, staff_id, Utc::now().naive_utc())
        .await?
        .ok_or(OrderError::StatusChanged(orderid))?;
    tracing::info!("Order handed back by delivery staff");
    Ok(released)
}

#[instrument(name = "Accept order", skip(repo))]
pub async fn accept_order(
    repo: &dyn Repository,
    staff_id: i32,
    orderid: i32,
) -> Result<Order, CustomError> {
    let order = load_order(repo, orderid).await?;
    if order.deliver_man_id.is_some() {
        return Err(OrderError::AlreadyAssigned(orderid).into());
    }
    if order.status != OrderStatus::Ready {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: OrderStatus::OutForDelivery,
        }
        .into());
    }
    // Losing the race to another staff member lands here.
    let accepted = repo
        .assign_delivery(orderid, staff_id, Utc::now().naive_utc())
        .await?
        .ok_or(OrderError::AlreadyAssigned(orderid))?;
    tracing::info!("Order accepted for delivery");
    Ok(accepted)
}

#[instrument(name = "Complete order", skip(repo))]
pub async fn complete_order(
    repo: &dyn Repository,
    staff_id: i32,
    orderid: i32,
) -> Result<Order, CustomError> {
    let order = load_order(repo, orderid).await?;
    if order.deliver_man_id != Some(staff_id) {
        return Err(CustomError::Forbidden(format!(
            "Order {} is not assigned to you",
            orderid
        )));
    }
    if order.status != OrderStatus::OutForDelivery {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Delivered,
        }
        .into());
    }
    let delivered = repo
        .complete_delivery(orderid, staff_id, Utc::now().naive_utc())
        .await?
        .ok_or(OrderError::StatusChanged(orderid))?;
    tracing::info!("Order delivered");
    Ok(delivered)
}

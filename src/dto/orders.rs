use crate::db_models::{Order, OrderItem};
use crate::domain::money::from_cents;
use crate::domain::OrderStatus;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub item_id: i32,
    pub item_name: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItemResponse {
    pub fn new(item: OrderItem, item_name: Option<String>) -> Self {
        Self {
            item_id: item.item_id,
            item_name,
            quantity: item.quantity,
            price: from_cents(item.price_cents),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub orderid: i32,
    pub custid: i32,
    pub restid: i32,
    pub deliver_man_id: Option<i32>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub remark: Option<String>,
    pub shipping_address: String,
    pub start_deliver_time: Option<NaiveDateTime>,
    pub end_deliver_time: Option<NaiveDateTime>,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn with_items(order: Order, order_items: Vec<OrderItemResponse>) -> Self {
        Self {
            orderid: order.orderid,
            custid: order.custid,
            restid: order.restid,
            deliver_man_id: order.deliver_man_id,
            status: order.status,
            total_amount: from_cents(order.total_cents),
            discount_amount: from_cents(order.discount_cents),
            remark: order.remark,
            shipping_address: order.shipping_address,
            start_deliver_time: order.start_deliver_time,
            end_deliver_time: order.end_deliver_time,
            created_time: order.created_time,
            updated_time: order.updated_time,
            order_items,
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self::with_items(order, Vec::new())
    }
}

/// One step of an order's status timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub status: OrderStatus,
    pub timestamp: Option<NaiveDateTime>,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetailResponse {
    pub order: OrderResponse,
    pub history: Vec<StatusRecord>,
}

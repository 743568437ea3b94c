//! Storage seams for the service layer.
//!
//! Services only ever see `&dyn Repository`. [`PgRepository`] is the
//! production store; [`InMemoryRepository`] backs tests and DB-less runs and
//! follows the same uniqueness and foreign-key rules.

pub mod memory;
pub mod postgres;

use crate::db_models::{
    AddressChanges, AddressDraft, Customer, CustomerAddress, CustomerChanges, DeliveryStaff,
    MenuItem, MenuItemChanges, NewCustomer, NewDeliveryStaff, NewMenuItem, NewOrder, NewRestaurant,
    NewReview, Order, OrderItem, OrderLine, OrderReview, Restaurant, StoredCredentials,
};
use crate::domain::{MenuItemStatus, OrderStatus, Role};
use crate::errors::custom::DbError;
use async_trait::async_trait;
use chrono::NaiveDateTime;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

/// Which orders a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    Customer(i32),
    Restaurant(i32),
    DeliveryStaff(i32),
    /// Ready and not yet taken by anyone.
    Available,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// True when any account kind already uses `email`.
    async fn email_taken(&self, email: &str) -> Result<bool, DbError>;

    /// Stores the customer and, when given, their first address in one unit.
    async fn insert_customer(
        &self,
        customer: NewCustomer,
        address: Option<AddressDraft>,
    ) -> Result<Customer, DbError>;

    async fn insert_restaurant(&self, restaurant: NewRestaurant) -> Result<Restaurant, DbError>;

    async fn insert_delivery_staff(
        &self,
        staff: NewDeliveryStaff,
    ) -> Result<DeliveryStaff, DbError>;

    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<StoredCredentials>, DbError>;

    async fn record_login(&self, role: Role, id: i32, at: NaiveDateTime) -> Result<(), DbError>;

    async fn find_customer(&self, custid: i32) -> Result<Option<Customer>, DbError>;

    async fn update_customer(
        &self,
        custid: i32,
        changes: CustomerChanges,
        at: NaiveDateTime,
    ) -> Result<Option<Customer>, DbError>;

    async fn find_restaurant(&self, restid: i32) -> Result<Option<Restaurant>, DbError>;

    async fn find_restaurant_by_name(&self, name: &str) -> Result<Option<Restaurant>, DbError>;

    /// Active restaurants ordered by id.
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, DbError>;

    async fn find_delivery_staff(&self, staff_id: i32) -> Result<Option<DeliveryStaff>, DbError>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn list_addresses(&self, custid: i32) -> Result<Vec<CustomerAddress>, DbError>;

    async fn find_address(&self, addressid: i32) -> Result<Option<CustomerAddress>, DbError>;

    async fn default_address(&self, custid: i32) -> Result<Option<CustomerAddress>, DbError>;

    /// A default address clears the customer's previous default first.
    async fn insert_address(
        &self,
        custid: i32,
        draft: AddressDraft,
        at: NaiveDateTime,
    ) -> Result<CustomerAddress, DbError>;

    async fn update_address(
        &self,
        addressid: i32,
        changes: AddressChanges,
        at: NaiveDateTime,
    ) -> Result<Option<CustomerAddress>, DbError>;

    async fn delete_address(&self, addressid: i32) -> Result<bool, DbError>;

    /// Leaves `addressid` as the only default of `custid`.
    async fn set_default_address(
        &self,
        custid: i32,
        addressid: i32,
        at: NaiveDateTime,
    ) -> Result<Option<CustomerAddress>, DbError>;
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn list_menu(
        &self,
        restid: i32,
        status: Option<MenuItemStatus>,
    ) -> Result<Vec<MenuItem>, DbError>;

    /// Active items of a category, optionally limited to one restaurant.
    async fn list_menu_by_category(
        &self,
        category: &str,
        restid: Option<i32>,
    ) -> Result<Vec<MenuItem>, DbError>;

    async fn find_menu_item(&self, item_id: i32) -> Result<Option<MenuItem>, DbError>;

    async fn find_menu_items(&self, item_ids: &[i32]) -> Result<Vec<MenuItem>, DbError>;

    async fn insert_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, DbError>;

    async fn update_menu_item(
        &self,
        item_id: i32,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItem>, DbError>;

    /// Fails with a foreign key violation while orders still reference the item.
    async fn delete_menu_item(&self, item_id: i32) -> Result<bool, DbError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_order(
        &self,
        order: NewOrder,
        lines: Vec<OrderLine>,
    ) -> Result<(Order, Vec<OrderItem>), DbError>;

    async fn find_order(&self, orderid: i32) -> Result<Option<Order>, DbError>;

    async fn order_items(&self, orderid: i32) -> Result<Vec<OrderItem>, DbError>;

    /// Newest first.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DbError>;

    /// Moves the order to `next` only while it is still in `expected`.
    /// `None` means the order was missing or had already moved on.
    async fn compare_and_set_status(
        &self,
        orderid: i32,
        expected: OrderStatus,
        next: OrderStatus,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError>;

    /// Claims a ready, unassigned order for `staff_id`.
    async fn assign_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError>;

    /// Hands an order out for delivery back to the pool as pending.
    async fn release_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError>;

    async fn complete_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_review_by_order(&self, orderid: i32) -> Result<Option<OrderReview>, DbError>;

    /// A second review of the same order is a unique violation.
    async fn insert_review(&self, review: NewReview) -> Result<OrderReview, DbError>;

    async fn restaurant_reviews(&self, restid: i32) -> Result<Vec<OrderReview>, DbError>;
}

pub trait Repository:
    AccountRepository + AddressRepository + MenuRepository + OrderRepository + ReviewRepository
{
}

impl<T> Repository for T where
    T: AccountRepository + AddressRepository + MenuRepository + OrderRepository + ReviewRepository
{
}

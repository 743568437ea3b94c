use crate::domain::{MenuItemStatus, OrderStatus, VehicleType};
use crate::schema::{
    customer, customer_addresses, delivery_staff, menu_items, order_items, order_reviews, orders,
    restaurant,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;

/******************************************/
// Accounts
/******************************************/
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customer, primary_key(custid), check_for_backend(diesel::pg::Pg))]
pub struct Customer {
    pub custid: i32,
    pub custname: String,
    pub phone: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub icon: Option<String>,
    pub is_validate: bool,
    pub latest_login_date: Option<NaiveDateTime>,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub deleted_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customer)]
pub struct NewCustomer {
    pub custname: String,
    pub phone: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub is_validate: bool,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = customer)]
pub struct CustomerChanges {
    pub custname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub icon: Option<String>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.custname.is_none() && self.phone.is_none() && self.email.is_none() && self.icon.is_none()
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = restaurant, primary_key(restid), check_for_backend(diesel::pg::Pg))]
pub struct Restaurant {
    pub restid: i32,
    pub restname: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub password_hash: String,
    pub icon: Option<String>,
    pub is_validate: bool,
    pub latest_login_date: Option<NaiveDateTime>,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub deleted_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = restaurant)]
pub struct NewRestaurant {
    pub restname: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub password_hash: String,
    pub is_validate: bool,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = delivery_staff, primary_key(staff_id), check_for_backend(diesel::pg::Pg))]
pub struct DeliveryStaff {
    pub staff_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub icon: Option<String>,
    pub vehicle_type: VehicleType,
    pub license_number: Option<String>,
    pub is_validate: bool,
    pub latest_login_date: Option<NaiveDateTime>,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub deleted_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = delivery_staff)]
pub struct NewDeliveryStaff {
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub vehicle_type: VehicleType,
    pub license_number: Option<String>,
    pub is_validate: bool,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

/// What login needs from any account kind.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_validate: bool,
}

/******************************************/
// Addresses
/******************************************/
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customer_addresses, primary_key(addressid), check_for_backend(diesel::pg::Pg))]
pub struct CustomerAddress {
    pub addressid: i32,
    pub custid: i32,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub is_default: bool,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub deleted_time: Option<NaiveDateTime>,
}

impl CustomerAddress {
    /// Single-line form stored on orders as the shipping snapshot.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address_line1.as_str()];
        parts.extend(self.address_line2.as_deref());
        parts.extend(self.city.as_deref());
        parts.extend(self.postal_code.as_deref());
        parts.push(self.country.as_str());
        parts
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Address fields before the owning customer is known.
#[derive(Debug, Clone)]
pub struct AddressDraft {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub is_default: bool,
}

impl AddressDraft {
    pub fn for_customer(self, custid: i32, at: NaiveDateTime) -> NewAddress {
        NewAddress {
            custid,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            postal_code: self.postal_code,
            country: self.country,
            is_default: self.is_default,
            created_time: at,
            updated_time: at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customer_addresses)]
pub struct NewAddress {
    pub custid: i32,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub is_default: bool,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = customer_addresses)]
pub struct AddressChanges {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

/******************************************/
// Catalog
/******************************************/
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = menu_items, primary_key(item_id), check_for_backend(diesel::pg::Pg))]
pub struct MenuItem {
    pub item_id: i32,
    pub restid: i32,
    pub category: Option<String>,
    pub item_name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub status: MenuItemStatus,
    pub created_time: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = menu_items)]
pub struct NewMenuItem {
    pub restid: i32,
    pub category: Option<String>,
    pub item_name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub status: MenuItemStatus,
    pub created_time: NaiveDateTime,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = menu_items)]
pub struct MenuItemChanges {
    pub category: Option<String>,
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub status: Option<MenuItemStatus>,
}

impl MenuItemChanges {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.item_name.is_none()
            && self.description.is_none()
            && self.price_cents.is_none()
            && self.status.is_none()
    }
}

/******************************************/
// Orders
/******************************************/
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders, primary_key(orderid), check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub orderid: i32,
    pub custid: i32,
    pub restid: i32,
    pub addressid: Option<i32>,
    pub shipping_address: String,
    pub deliver_man_id: Option<i32>,
    pub start_deliver_time: Option<NaiveDateTime>,
    pub end_deliver_time: Option<NaiveDateTime>,
    pub status: OrderStatus,
    pub remark: Option<String>,
    pub total_cents: i64,
    pub discount_cents: i64,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub custid: i32,
    pub restid: i32,
    pub addressid: Option<i32>,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub remark: Option<String>,
    pub total_cents: i64,
    pub discount_cents: i64,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_items, primary_key(orderitemid), check_for_backend(diesel::pg::Pg))]
pub struct OrderItem {
    pub orderitemid: i32,
    pub orderid: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub price_cents: i64,
    pub created_time: NaiveDateTime,
}

/// One priced line of an order that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: i32,
    pub quantity: i32,
    pub price_cents: i64,
}

/******************************************/
// Reviews
/******************************************/
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_reviews, primary_key(reviewid), check_for_backend(diesel::pg::Pg))]
pub struct OrderReview {
    pub reviewid: i32,
    pub orderid: i32,
    pub custid: i32,
    pub rest_rating: Option<i32>,
    pub delivery_rating: Option<i32>,
    pub comment: Option<String>,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_reviews)]
pub struct NewReview {
    pub orderid: i32,
    pub custid: i32,
    pub rest_rating: Option<i32>,
    pub delivery_rating: Option<i32>,
    pub comment: Option<String>,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
}

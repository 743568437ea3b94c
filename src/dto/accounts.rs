use crate::db_models::{Customer, CustomerAddress, DeliveryStaff, Restaurant};
use crate::domain::VehicleType;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfile {
    pub custid: i32,
    pub custname: String,
    pub phone: Option<String>,
    pub email: String,
    pub icon: Option<String>,
    pub is_validate: bool,
    pub latest_login_date: Option<NaiveDateTime>,
}

impl From<Customer> for CustomerProfile {
    fn from(customer: Customer) -> Self {
        Self {
            custid: customer.custid,
            custname: customer.custname,
            phone: customer.phone,
            email: customer.email,
            icon: customer.icon,
            is_validate: customer.is_validate,
            latest_login_date: customer.latest_login_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantProfile {
    pub restid: i32,
    pub restname: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub icon: Option<String>,
    pub is_validate: bool,
}

impl From<Restaurant> for RestaurantProfile {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            restid: restaurant.restid,
            restname: restaurant.restname,
            email: restaurant.email,
            phone: restaurant.phone,
            description: restaurant.description,
            address: restaurant.address,
            icon: restaurant.icon,
            is_validate: restaurant.is_validate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryStaffProfile {
    pub staff_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub icon: Option<String>,
    pub vehicle_type: VehicleType,
    pub license_number: Option<String>,
    pub is_validate: bool,
}

impl From<DeliveryStaff> for DeliveryStaffProfile {
    fn from(staff: DeliveryStaff) -> Self {
        Self {
            staff_id: staff.staff_id,
            name: staff.name,
            email: staff.email,
            phone: staff.phone,
            icon: staff.icon,
            vehicle_type: staff.vehicle_type,
            license_number: staff.license_number,
            is_validate: staff.is_validate,
        }
    }
}

/// Any of the three profiles, serialized without a wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AccountProfile {
    Customer(CustomerProfile),
    Restaurant(RestaurantProfile),
    Delivery(DeliveryStaffProfile),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: AccountProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressResponse {
    pub addressid: i32,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub is_default: bool,
}

impl From<CustomerAddress> for AddressResponse {
    fn from(address: CustomerAddress) -> Self {
        Self {
            addressid: address.addressid,
            address_line1: address.address_line1,
            address_line2: address.address_line2,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
            is_default: address.is_default,
        }
    }
}

pub mod auth;
pub mod cart;
pub mod customer;
pub mod delivery;
pub mod health_check;
pub mod menu;
pub mod orders;
pub mod restaurant;
pub mod restaurants;

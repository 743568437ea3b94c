mod addresses;
mod auth;
mod cart;
mod health_check;
mod helpers;
mod menu;
mod orders;
mod reviews;

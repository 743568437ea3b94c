pub mod catalog;
pub mod money;
pub mod order_status;
pub mod role;

pub use catalog::{MenuItemStatus, VehicleType};
pub use order_status::OrderStatus;
pub use role::Role;

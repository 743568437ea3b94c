//! JSON shapes returned by the API.

pub mod accounts;
pub mod catalog;
pub mod orders;
pub mod reviews;

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::MenuItemStatus"]
#[serde(rename_all = "snake_case")]
pub enum MenuItemStatus {
    #[default]
    Active,
    Inactive,
    OutOfStock,
}

impl MenuItemStatus {
    pub fn is_orderable(self) -> bool {
        self == MenuItemStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::VehicleType"]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    Bike,
    Scooter,
    Car,
    Van,
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bike" => Ok(VehicleType::Bike),
            "scooter" => Ok(VehicleType::Scooter),
            "car" => Ok(VehicleType::Car),
            "van" => Ok(VehicleType::Van),
            _ => Err(format!("{} is not a valid vehicle type.", s)),
        }
    }
}

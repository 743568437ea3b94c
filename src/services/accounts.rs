//! Profiles of the calling account and the customer's address book.

use crate::db_models::{
    AddressChanges, AddressDraft, Customer, CustomerAddress, CustomerChanges, DeliveryStaff,
    Restaurant,
};
use crate::errors::custom::{AuthError, CustomError, DbError};
use crate::repository::Repository;
use crate::services::auth::DEFAULT_COUNTRY;
use crate::validations::name_email::{AccountEmail, AccountName};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub custname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAddressRequest {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

pub async fn customer_profile(repo: &dyn Repository, custid: i32) -> Result<Customer, CustomError> {
    repo.find_customer(custid)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Customer {} not found", custid)))
}

pub async fn restaurant_profile(
    repo: &dyn Repository,
    restid: i32,
) -> Result<Restaurant, CustomError> {
    repo.find_restaurant(restid)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Restaurant {} not found", restid)))
}

pub async fn delivery_staff_profile(
    repo: &dyn Repository,
    staff_id: i32,
) -> Result<DeliveryStaff, CustomError> {
    repo.find_delivery_staff(staff_id)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Delivery staff {} not found", staff_id)))
}

#[instrument(name = "Update customer profile", skip(repo, request))]
pub async fn update_customer_profile(
    repo: &dyn Repository,
    custid: i32,
    request: UpdateProfileRequest,
) -> Result<Customer, CustomError> {
    let current = customer_profile(repo, custid).await?;
    let custname = request
        .custname
        .map(|name| AccountName::parse(name).map(String::from))
        .transpose()
        .map_err(CustomError::ValidationError)?;
    let email = request
        .email
        .map(|email| AccountEmail::parse(email).map(String::from))
        .transpose()
        .map_err(CustomError::ValidationError)?
        .filter(|email| *email != current.email);

    if let Some(email) = &email {
        if repo.email_taken(email).await? {
            return Err(AuthError::DuplicateEmail(email.clone()).into());
        }
    }

    let changes = CustomerChanges {
        custname,
        phone: request.phone,
        email,
        icon: request.icon,
    };
    if changes.is_empty() {
        return Ok(current);
    }
    repo.update_customer(custid, changes, Utc::now().naive_utc())
        .await
        .map_err(|err| match err {
            DbError::UniqueViolation(msg) => AuthError::DuplicateEmail(msg).into(),
            other => CustomError::from(other),
        })?
        .ok_or_else(|| CustomError::NotFound(format!("Customer {} not found", custid)))
}

/******************************************/
// Addresses
/******************************************/
fn required_line(line: String) -> Result<String, CustomError> {
    let line = line.trim().to_string();
    if line.is_empty() {
        return Err(CustomError::ValidationError(
            "address_line1 must not be empty.".to_string(),
        ));
    }
    Ok(line)
}

async fn owned_address(
    repo: &dyn Repository,
    custid: i32,
    addressid: i32,
) -> Result<CustomerAddress, CustomError> {
    match repo.find_address(addressid).await? {
        Some(address) if address.custid == custid => Ok(address),
        // Someone else's address is reported exactly like a missing one.
        _ => Err(CustomError::NotFound(format!(
            "Address {} not found",
            addressid
        ))),
    }
}

pub async fn list_addresses(
    repo: &dyn Repository,
    custid: i32,
) -> Result<Vec<CustomerAddress>, CustomError> {
    Ok(repo.list_addresses(custid).await?)
}

pub async fn default_address(
    repo: &dyn Repository,
    custid: i32,
) -> Result<CustomerAddress, CustomError> {
    repo.default_address(custid)
        .await?
        .ok_or_else(|| CustomError::NotFound("No default address set".to_string()))
}

/// The first address a customer saves becomes the default.
#[instrument(name = "Add customer address", skip(repo, request))]
pub async fn add_address(
    repo: &dyn Repository,
    custid: i32,
    request: AddressRequest,
) -> Result<CustomerAddress, CustomError> {
    let has_default = repo.default_address(custid).await?.is_some();
    let draft = AddressDraft {
        address_line1: required_line(request.address_line1)?,
        address_line2: request.address_line2,
        city: request.city,
        postal_code: request.postal_code,
        country: request
            .country
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        is_default: request.is_default || !has_default,
    };
    Ok(repo
        .insert_address(custid, draft, Utc::now().naive_utc())
        .await?)
}

#[instrument(name = "Update customer address", skip(repo, request))]
pub async fn update_address(
    repo: &dyn Repository,
    custid: i32,
    addressid: i32,
    request: UpdateAddressRequest,
) -> Result<CustomerAddress, CustomError> {
    owned_address(repo, custid, addressid).await?;
    let changes = AddressChanges {
        address_line1: request.address_line1.map(required_line).transpose()?,
        address_line2: request.address_line2,
        city: request.city,
        postal_code: request.postal_code,
        country: request.country,
        is_default: request.is_default,
    };
    repo.update_address(addressid, changes, Utc::now().naive_utc())
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Address {} not found", addressid)))
}

#[instrument(name = "Delete customer address", skip(repo))]
pub async fn delete_address(
    repo: &dyn Repository,
    custid: i32,
    addressid: i32,
) -> Result<(), CustomError> {
    owned_address(repo, custid, addressid).await?;
    repo.delete_address(addressid).await?;
    Ok(())
}

#[instrument(name = "Set default address", skip(repo))]
pub async fn set_default_address(
    repo: &dyn Repository,
    custid: i32,
    addressid: i32,
) -> Result<CustomerAddress, CustomError> {
    repo.set_default_address(custid, addressid, Utc::now().naive_utc())
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Address {} not found", addressid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_models::NewCustomer;
    use crate::repository::{AccountRepository, InMemoryRepository};
    use claim::{assert_matches, assert_ok};

    async fn customer(repo: &InMemoryRepository, email: &str) -> i32 {
        let now = Utc::now().naive_utc();
        repo.insert_customer(
            NewCustomer {
                custname: "Lee".to_string(),
                phone: None,
                email: email.to_string(),
                password_hash: "hash".to_string(),
                is_validate: true,
                created_time: now,
                updated_time: now,
            },
            None,
        )
        .await
        .unwrap()
        .custid
    }

    fn address(line: &str, is_default: bool) -> AddressRequest {
        AddressRequest {
            address_line1: line.to_string(),
            address_line2: None,
            city: None,
            postal_code: None,
            country: None,
            is_default,
        }
    }

    #[tokio::test]
    async fn first_address_becomes_default() {
        let repo = InMemoryRepository::new();
        let custid = customer(&repo, "first@example.com").await;
        let saved = assert_ok!(add_address(&repo, custid, address("1 Peak Road", false)).await);
        assert!(saved.is_default);
        assert_eq!(saved.country, DEFAULT_COUNTRY);
    }

    #[tokio::test]
    async fn setting_default_leaves_exactly_one() {
        let repo = InMemoryRepository::new();
        let custid = customer(&repo, "many@example.com").await;
        add_address(&repo, custid, address("1 Peak Road", true)).await.unwrap();
        let second = add_address(&repo, custid, address("2 Peak Road", false)).await.unwrap();
        add_address(&repo, custid, address("3 Peak Road", false)).await.unwrap();

        set_default_address(&repo, custid, second.addressid).await.unwrap();

        let defaults: Vec<_> = list_addresses(&repo, custid)
            .await
            .unwrap()
            .into_iter()
            .filter(|a| a.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].addressid, second.addressid);
    }

    #[tokio::test]
    async fn another_customers_address_is_not_found() {
        let repo = InMemoryRepository::new();
        let owner = customer(&repo, "owner@example.com").await;
        let intruder = customer(&repo, "intruder@example.com").await;
        let saved = add_address(&repo, owner, address("1 Peak Road", true)).await.unwrap();
        assert_matches!(
            set_default_address(&repo, intruder, saved.addressid).await,
            Err(CustomError::NotFound(_))
        );
        assert_matches!(
            delete_address(&repo, intruder, saved.addressid).await,
            Err(CustomError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn profile_email_must_stay_unique() {
        let repo = InMemoryRepository::new();
        customer(&repo, "taken@example.com").await;
        let custid = customer(&repo, "mine@example.com").await;
        let result = update_customer_profile(
            &repo,
            custid,
            UpdateProfileRequest {
                email: Some("Taken@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert_matches!(
            result,
            Err(CustomError::AuthenticationError(AuthError::DuplicateEmail(_)))
        );
    }
}

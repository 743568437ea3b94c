//! Registration and login for all three account kinds.

use crate::auth_jwt::auth::JwtKeys;
use crate::config::configuration::{Argon2Settings, AuthSettings};
use crate::db_models::{AddressDraft, NewCustomer, NewDeliveryStaff, NewRestaurant, StoredCredentials};
use crate::domain::{Role, VehicleType};
use crate::dto::accounts::{AccountProfile, LoginResponse};
use crate::errors::custom::{AuthError, CustomError, DbError};
use crate::repository::Repository;
use crate::validations::name_email::{AccountEmail, AccountName};
use crate::validations::password::Password;
use actix_web::web;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

pub const DEFAULT_COUNTRY: &str = "Hong Kong";

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: String,
    pub phone: Option<String>,
    // customer
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    // restaurant
    pub restname: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    // delivery staff
    pub vehicle_type: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub user_type: String,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_role(user_type: &str) -> Result<Role, CustomError> {
    user_type
        .parse::<Role>()
        .map_err(|err| CustomError::AuthenticationError(AuthError::InvalidUserType(err)))
}

fn hasher(settings: &Argon2Settings) -> Result<Argon2<'static>, CustomError> {
    let params = Params::new(
        settings.memory_kib,
        settings.iterations,
        settings.parallelism,
        None,
    )
    .map_err(|err| CustomError::HashingError(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Salted Argon2id hash in PHC string form, computed off the async workers.
pub async fn hash_password(
    password: Password,
    settings: Argon2Settings,
) -> Result<String, CustomError> {
    web::block(move || {
        let salt = SaltString::generate(&mut rand::thread_rng());
        hasher(&settings)?
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CustomError::HashingError(err.to_string()))
    })
    .await?
}

/// Parameters are read back from the PHC string, so old hashes keep verifying
/// after the configured costs change.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool, CustomError> {
    web::block(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|err| CustomError::HashingError(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await?
}

#[instrument(
    name = "Register a new account",
    skip(repo, settings, request),
    fields(email = %request.email, user_type = %request.user_type)
)]
pub async fn register(
    repo: &dyn Repository,
    settings: &AuthSettings,
    request: RegisterRequest,
) -> Result<AccountProfile, CustomError> {
    let role = parse_role(&request.user_type)?;
    let email = AccountEmail::parse(request.email).map_err(CustomError::ValidationError)?;
    let password = Password::parse(request.password).map_err(CustomError::ValidationError)?;

    if repo.email_taken(email.as_ref()).await? {
        return Err(AuthError::DuplicateEmail(email.as_ref().to_string()).into());
    }

    let now = Utc::now().naive_utc();
    let phone = blank_to_none(request.phone);
    let email_text = email.as_ref().to_string();

    let profile = match role {
        Role::Customer => {
            let name = AccountName::parse(request.name).map_err(CustomError::ValidationError)?;
            let address_line1 = blank_to_none(request.address_line1).ok_or_else(|| {
                CustomError::ValidationError("address_line1 is required for customers.".into())
            })?;
            let address = AddressDraft {
                address_line1,
                address_line2: blank_to_none(request.address_line2),
                city: blank_to_none(request.city),
                postal_code: blank_to_none(request.postal_code),
                country: blank_to_none(request.country)
                    .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
                is_default: true,
            };
            let password_hash = hash_password(password, settings.argon2).await?;
            let customer = NewCustomer {
                custname: name.into(),
                phone,
                email: email.into(),
                password_hash,
                is_validate: true,
                created_time: now,
                updated_time: now,
            };
            let stored = repo
                .insert_customer(customer, Some(address))
                .await
                .map_err(duplicate_as_auth_error(&email_text))?;
            AccountProfile::Customer(stored.into())
        }
        Role::Restaurant => {
            let name = blank_to_none(request.restname).unwrap_or(request.name);
            let name = AccountName::parse(name).map_err(CustomError::ValidationError)?;
            let password_hash = hash_password(password, settings.argon2).await?;
            let restaurant = NewRestaurant {
                restname: name.into(),
                email: email.into(),
                phone,
                description: blank_to_none(request.description),
                address: blank_to_none(request.address),
                password_hash,
                is_validate: true,
                created_time: now,
                updated_time: now,
            };
            let stored = repo
                .insert_restaurant(restaurant)
                .await
                .map_err(duplicate_as_auth_error(&email_text))?;
            AccountProfile::Restaurant(stored.into())
        }
        Role::Delivery => {
            let name = AccountName::parse(request.name).map_err(CustomError::ValidationError)?;
            let vehicle_type = match blank_to_none(request.vehicle_type) {
                Some(vehicle) => vehicle
                    .parse::<VehicleType>()
                    .map_err(CustomError::ValidationError)?,
                None => VehicleType::default(),
            };
            let password_hash = hash_password(password, settings.argon2).await?;
            let staff = NewDeliveryStaff {
                name: name.into(),
                phone,
                email: email.into(),
                password_hash,
                vehicle_type,
                license_number: blank_to_none(request.license_number),
                is_validate: settings.auto_activate_delivery_staff,
                created_time: now,
                updated_time: now,
            };
            let stored = repo
                .insert_delivery_staff(staff)
                .await
                .map_err(duplicate_as_auth_error(&email_text))?;
            AccountProfile::Delivery(stored.into())
        }
    };
    tracing::info!("Account registered");
    Ok(profile)
}

// Two concurrent registrations can both pass `email_taken`; the unique index decides.
fn duplicate_as_auth_error(email: &str) -> impl FnOnce(DbError) -> CustomError + '_ {
    move |err| match err {
        DbError::UniqueViolation(_) => AuthError::DuplicateEmail(email.to_string()).into(),
        other => other.into(),
    }
}

#[instrument(
    name = "Login",
    skip(repo, jwt, request),
    fields(email = %request.email, user_type = %request.user_type)
)]
pub async fn login(
    repo: &dyn Repository,
    jwt: &JwtKeys,
    request: LoginRequest,
) -> Result<LoginResponse, CustomError> {
    let role = parse_role(&request.user_type)?;
    let email = request.email.trim().to_lowercase();

    let StoredCredentials {
        id,
        name,
        email,
        password_hash,
        is_validate,
    } = repo
        .find_credentials(role, &email)
        .await?
        .ok_or(AuthError::AccountNotFound)?;

    if !is_validate {
        return Err(AuthError::AccountDisabled.into());
    }
    if !verify_password(request.password, password_hash).await? {
        return Err(AuthError::InvalidPassword.into());
    }

    repo.record_login(role, id, Utc::now().naive_utc()).await?;
    let issued = jwt.create_jwt(id, role, &email, &name)?;
    let user = load_profile(repo, role, id).await?;
    Ok(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user,
    })
}

/// Profile of the account behind a token.
pub async fn load_profile(
    repo: &dyn Repository,
    role: Role,
    id: i32,
) -> Result<AccountProfile, CustomError> {
    let not_found = || CustomError::NotFound(format!("{} {} not found", role, id));
    let profile = match role {
        Role::Customer => AccountProfile::Customer(
            repo.find_customer(id).await?.ok_or_else(not_found)?.into(),
        ),
        Role::Restaurant => AccountProfile::Restaurant(
            repo.find_restaurant(id).await?.ok_or_else(not_found)?.into(),
        ),
        Role::Delivery => AccountProfile::Delivery(
            repo.find_delivery_staff(id)
                .await?
                .ok_or_else(not_found)?
                .into(),
        ),
    };
    Ok(profile)
}

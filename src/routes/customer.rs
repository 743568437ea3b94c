use crate::domain::Role;
use crate::dto::accounts::{AddressResponse, CustomerProfile};
use crate::errors::custom::CustomError;
use crate::middleware::AuthenticatedUser;
use crate::services::accounts::{self, AddressRequest, UpdateAddressRequest, UpdateProfileRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

/******************************************/
// Viewing the customer profile
/******************************************/
/**
 * @route   GET /api/customer/profile
 * @access  JWT Protected (customer)
 */
#[instrument(name = "View customer profile", skip(state, user), fields(user_id = user.id()))]
pub async fn view_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let customer = accounts::customer_profile(state.repo.as_ref(), custid).await?;
    Ok(HttpResponse::Ok().json(CustomerProfile::from(customer)))
}

/******************************************/
// Updating the customer profile
/******************************************/
/**
 * @route   PUT /api/customer/profile
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Edit profile", skip(state, user, req_update), fields(user_id = user.id()))]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req_update: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let customer =
        accounts::update_customer_profile(state.repo.as_ref(), custid, req_update.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(CustomerProfile::from(customer)))
}

/******************************************/
// Address book
/******************************************/
/**
 * @route   GET /api/customer/addresses
 * @access  JWT Protected (customer)
 */
#[instrument(name = "List addresses", skip(state, user), fields(user_id = user.id()))]
pub async fn list_addresses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let addresses: Vec<AddressResponse> = accounts::list_addresses(state.repo.as_ref(), custid)
        .await?
        .into_iter()
        .map(AddressResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(addresses))
}

/**
 * @route   GET /api/customer/addresses/default
 * @access  JWT Protected (customer)
 */
pub async fn default_address(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let address = accounts::default_address(state.repo.as_ref(), custid).await?;
    Ok(HttpResponse::Ok().json(AddressResponse::from(address)))
}

/**
 * @route   POST /api/customer/addresses
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Add address", skip(state, user, req_address), fields(user_id = user.id()))]
pub async fn add_address(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req_address: web::Json<AddressRequest>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let address = accounts::add_address(state.repo.as_ref(), custid, req_address.into_inner()).await?;
    Ok(HttpResponse::Created().json(AddressResponse::from(address)))
}

/**
 * @route   PUT /api/customer/addresses/{id}
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Update address", skip(state, user, req_address), fields(user_id = user.id()))]
pub async fn update_address(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    address_id: web::Path<i32>,
    req_address: web::Json<UpdateAddressRequest>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let address = accounts::update_address(
        state.repo.as_ref(),
        custid,
        address_id.into_inner(),
        req_address.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(AddressResponse::from(address)))
}

/**
 * @route   DELETE /api/customer/addresses/{id}
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Delete address", skip(state, user), fields(user_id = user.id()))]
pub async fn delete_address(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    address_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let address_id = address_id.into_inner();
    accounts::delete_address(state.repo.as_ref(), custid, address_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": "Address deleted", "addressid": address_id})))
}

/**
 * @route   PUT /api/customer/addresses/{id}/default
 * @access  JWT Protected (customer)
 */
#[instrument(name = "Choose default address", skip(state, user), fields(user_id = user.id()))]
pub async fn set_default_address(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    address_id: web::Path<i32>,
) -> Result<HttpResponse, CustomError> {
    let custid = user.require(Role::Customer)?;
    let address =
        accounts::set_default_address(state.repo.as_ref(), custid, address_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AddressResponse::from(address)))
}

use super::PgRepository;
use crate::db_models::{
    AddressDraft, Customer, CustomerChanges, DeliveryStaff, NewCustomer, NewDeliveryStaff,
    NewRestaurant, Restaurant, StoredCredentials,
};
use crate::domain::Role;
use crate::errors::custom::DbError;
use crate::repository::AccountRepository;
use crate::schema::{customer, customer_addresses, delivery_staff, restaurant};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

type CredentialRow = (i32, String, String, String, bool);

fn into_credentials((id, name, email, password_hash, is_validate): CredentialRow) -> StoredCredentials {
    StoredCredentials {
        id,
        name,
        email,
        password_hash,
        is_validate,
    }
}

#[async_trait]
impl AccountRepository for PgRepository {
    async fn email_taken(&self, email: &str) -> Result<bool, DbError> {
        let mut conn = self.conn().await?;
        let in_customers: bool = diesel::select(exists(customer::table.filter(customer::email.eq(email))))
            .get_result(&mut conn)
            .await?;
        let in_restaurants: bool =
            diesel::select(exists(restaurant::table.filter(restaurant::email.eq(email))))
                .get_result(&mut conn)
                .await?;
        let in_staff: bool = diesel::select(exists(
            delivery_staff::table.filter(delivery_staff::email.eq(email)),
        ))
        .get_result(&mut conn)
        .await?;
        Ok(in_customers || in_restaurants || in_staff)
    }

    async fn insert_customer(
        &self,
        new: NewCustomer,
        address: Option<AddressDraft>,
    ) -> Result<Customer, DbError> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, DbError, _>(|conn| {
            async move {
                let created = new.created_time;
                let stored = diesel::insert_into(customer::table)
                    .values(&new)
                    .returning(Customer::as_returning())
                    .get_result(conn)
                    .await?;
                if let Some(draft) = address {
                    diesel::insert_into(customer_addresses::table)
                        .values(draft.for_customer(stored.custid, created))
                        .execute(conn)
                        .await?;
                }
                Ok(stored)
            }
            .scope_boxed()
        })
        .await
    }

    async fn insert_restaurant(&self, new: NewRestaurant) -> Result<Restaurant, DbError> {
        let mut conn = self.conn().await?;
        let stored = diesel::insert_into(restaurant::table)
            .values(&new)
            .returning(Restaurant::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored)
    }

    async fn insert_delivery_staff(&self, new: NewDeliveryStaff) -> Result<DeliveryStaff, DbError> {
        let mut conn = self.conn().await?;
        let stored = diesel::insert_into(delivery_staff::table)
            .values(&new)
            .returning(DeliveryStaff::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored)
    }

    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<StoredCredentials>, DbError> {
        let mut conn = self.conn().await?;
        let row: Option<CredentialRow> = match role {
            Role::Customer => {
                customer::table
                    .filter(customer::email.eq(email))
                    .select((
                        customer::custid,
                        customer::custname,
                        customer::email,
                        customer::password_hash,
                        customer::is_validate,
                    ))
                    .first(&mut conn)
                    .await
                    .optional()?
            }
            Role::Restaurant => {
                restaurant::table
                    .filter(restaurant::email.eq(email))
                    .select((
                        restaurant::restid,
                        restaurant::restname,
                        restaurant::email,
                        restaurant::password_hash,
                        restaurant::is_validate,
                    ))
                    .first(&mut conn)
                    .await
                    .optional()?
            }
            Role::Delivery => {
                delivery_staff::table
                    .filter(delivery_staff::email.eq(email))
                    .select((
                        delivery_staff::staff_id,
                        delivery_staff::name,
                        delivery_staff::email,
                        delivery_staff::password_hash,
                        delivery_staff::is_validate,
                    ))
                    .first(&mut conn)
                    .await
                    .optional()?
            }
        };
        Ok(row.map(into_credentials))
    }

    async fn record_login(&self, role: Role, id: i32, at: NaiveDateTime) -> Result<(), DbError> {
        let mut conn = self.conn().await?;
        match role {
            Role::Customer => {
                diesel::update(customer::table.find(id))
                    .set((
                        customer::latest_login_date.eq(Some(at)),
                        customer::updated_time.eq(at),
                    ))
                    .execute(&mut conn)
                    .await?
            }
            Role::Restaurant => {
                diesel::update(restaurant::table.find(id))
                    .set((
                        restaurant::latest_login_date.eq(Some(at)),
                        restaurant::updated_time.eq(at),
                    ))
                    .execute(&mut conn)
                    .await?
            }
            Role::Delivery => {
                diesel::update(delivery_staff::table.find(id))
                    .set((
                        delivery_staff::latest_login_date.eq(Some(at)),
                        delivery_staff::updated_time.eq(at),
                    ))
                    .execute(&mut conn)
                    .await?
            }
        };
        Ok(())
    }

    async fn find_customer(&self, custid: i32) -> Result<Option<Customer>, DbError> {
        let mut conn = self.conn().await?;
        let found = customer::table
            .find(custid)
            .select(Customer::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn update_customer(
        &self,
        custid: i32,
        changes: CustomerChanges,
        at: NaiveDateTime,
    ) -> Result<Option<Customer>, DbError> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(customer::table.find(custid))
            .set((&changes, customer::updated_time.eq(at)))
            .returning(Customer::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(updated)
    }

    async fn find_restaurant(&self, restid: i32) -> Result<Option<Restaurant>, DbError> {
        let mut conn = self.conn().await?;
        let found = restaurant::table
            .find(restid)
            .select(Restaurant::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn find_restaurant_by_name(&self, name: &str) -> Result<Option<Restaurant>, DbError> {
        let mut conn = self.conn().await?;
        let found = restaurant::table
            .filter(restaurant::restname.eq(name))
            .order(restaurant::restid.asc())
            .select(Restaurant::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, DbError> {
        let mut conn = self.conn().await?;
        let found = restaurant::table
            .filter(restaurant::is_validate.eq(true))
            .filter(restaurant::deleted_time.is_null())
            .order(restaurant::restid.asc())
            .select(Restaurant::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }

    async fn find_delivery_staff(&self, staff_id: i32) -> Result<Option<DeliveryStaff>, DbError> {
        let mut conn = self.conn().await?;
        let found = delivery_staff::table
            .find(staff_id)
            .select(DeliveryStaff::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }
}

use super::PgRepository;
use crate::db_models::{AddressChanges, AddressDraft, CustomerAddress};
use crate::errors::custom::DbError;
use crate::repository::AddressRepository;
use crate::schema::customer_addresses::dsl::*;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

#[async_trait]
impl AddressRepository for PgRepository {
    async fn list_addresses(&self, customer_id: i32) -> Result<Vec<CustomerAddress>, DbError> {
        let mut conn = self.conn().await?;
        let found = customer_addresses
            .filter(custid.eq(customer_id))
            .order((is_default.desc(), addressid.asc()))
            .select(CustomerAddress::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }

    async fn find_address(&self, address_id: i32) -> Result<Option<CustomerAddress>, DbError> {
        let mut conn = self.conn().await?;
        let found = customer_addresses
            .find(address_id)
            .select(CustomerAddress::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn default_address(&self, customer_id: i32) -> Result<Option<CustomerAddress>, DbError> {
        let mut conn = self.conn().await?;
        let found = customer_addresses
            .filter(custid.eq(customer_id))
            .filter(is_default.eq(true))
            .select(CustomerAddress::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn insert_address(
        &self,
        customer_id: i32,
        draft: AddressDraft,
        at: NaiveDateTime,
    ) -> Result<CustomerAddress, DbError> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, DbError, _>(|conn| {
            async move {
                if draft.is_default {
                    diesel::update(
                        customer_addresses
                            .filter(custid.eq(customer_id))
                            .filter(is_default.eq(true)),
                    )
                    .set((is_default.eq(false), updated_time.eq(at)))
                    .execute(conn)
                    .await?;
                }
                let stored = diesel::insert_into(customer_addresses)
                    .values(draft.for_customer(customer_id, at))
                    .returning(CustomerAddress::as_returning())
                    .get_result(conn)
                    .await?;
                Ok(stored)
            }
            .scope_boxed()
        })
        .await
    }

    async fn update_address(
        &self,
        address_id: i32,
        changes: AddressChanges,
        at: NaiveDateTime,
    ) -> Result<Option<CustomerAddress>, DbError> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, DbError, _>(|conn| {
            async move {
                if changes.is_default == Some(true) {
                    let owner: Option<i32> = customer_addresses
                        .find(address_id)
                        .select(custid)
                        .first(conn)
                        .await
                        .optional()?;
                    if let Some(owner) = owner {
                        diesel::update(
                            customer_addresses
                                .filter(custid.eq(owner))
                                .filter(is_default.eq(true))
                                .filter(addressid.ne(address_id)),
                        )
                        .set((is_default.eq(false), updated_time.eq(at)))
                        .execute(conn)
                        .await?;
                    }
                }
                let updated = diesel::update(customer_addresses.find(address_id))
                    .set((&changes, updated_time.eq(at)))
                    .returning(CustomerAddress::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                Ok(updated)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete_address(&self, address_id: i32) -> Result<bool, DbError> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(customer_addresses.find(address_id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn set_default_address(
        &self,
        customer_id: i32,
        address_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<CustomerAddress>, DbError> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, DbError, _>(|conn| {
            async move {
                let owned: Option<i32> = customer_addresses
                    .filter(addressid.eq(address_id))
                    .filter(custid.eq(customer_id))
                    .select(addressid)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if owned.is_none() {
                    return Ok(None);
                }
                diesel::update(
                    customer_addresses
                        .filter(custid.eq(customer_id))
                        .filter(is_default.eq(true))
                        .filter(addressid.ne(address_id)),
                )
                .set((is_default.eq(false), updated_time.eq(at)))
                .execute(conn)
                .await?;
                let updated = diesel::update(customer_addresses.find(address_id))
                    .set((is_default.eq(true), updated_time.eq(at)))
                    .returning(CustomerAddress::as_returning())
                    .get_result(conn)
                    .await?;
                Ok(Some(updated))
            }
            .scope_boxed()
        })
        .await
    }
}

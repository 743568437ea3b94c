use super::PgRepository;
use crate::db_models::{NewReview, OrderReview};
use crate::errors::custom::DbError;
use crate::repository::ReviewRepository;
use crate::schema::{order_reviews, orders};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

#[async_trait]
impl ReviewRepository for PgRepository {
    async fn find_review_by_order(&self, orderid: i32) -> Result<Option<OrderReview>, DbError> {
        let mut conn = self.conn().await?;
        let found = order_reviews::table
            .filter(order_reviews::orderid.eq(orderid))
            .select(OrderReview::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn insert_review(&self, review: NewReview) -> Result<OrderReview, DbError> {
        let mut conn = self.conn().await?;
        let stored = diesel::insert_into(order_reviews::table)
            .values(&review)
            .returning(OrderReview::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored)
    }

    async fn restaurant_reviews(&self, restid: i32) -> Result<Vec<OrderReview>, DbError> {
        let mut conn = self.conn().await?;
        let found = order_reviews::table
            .inner_join(orders::table)
            .filter(orders::restid.eq(restid))
            .select(OrderReview::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }
}

use super::PgRepository;
use crate::db_models::{NewOrder, Order, OrderItem, OrderLine};
use crate::domain::OrderStatus;
use crate::errors::custom::DbError;
use crate::repository::{OrderFilter, OrderRepository};
use crate::schema::{order_items, orders};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

#[async_trait]
impl OrderRepository for PgRepository {
    async fn insert_order(
        &self,
        new: NewOrder,
        lines: Vec<OrderLine>,
    ) -> Result<(Order, Vec<OrderItem>), DbError> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, DbError, _>(|conn| {
            async move {
                let order = diesel::insert_into(orders::table)
                    .values(&new)
                    .returning(Order::as_returning())
                    .get_result(conn)
                    .await?;
                let rows: Vec<_> = lines
                    .iter()
                    .map(|line| {
                        (
                            order_items::orderid.eq(order.orderid),
                            order_items::item_id.eq(line.item_id),
                            order_items::quantity.eq(line.quantity),
                            order_items::price_cents.eq(line.price_cents),
                            order_items::created_time.eq(new.created_time),
                        )
                    })
                    .collect();
                let items = diesel::insert_into(order_items::table)
                    .values(rows)
                    .returning(OrderItem::as_returning())
                    .get_results(conn)
                    .await?;
                Ok((order, items))
            }
            .scope_boxed()
        })
        .await
    }

    async fn find_order(&self, orderid: i32) -> Result<Option<Order>, DbError> {
        let mut conn = self.conn().await?;
        let found = orders::table
            .find(orderid)
            .select(Order::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn order_items(&self, orderid: i32) -> Result<Vec<OrderItem>, DbError> {
        let mut conn = self.conn().await?;
        let found = order_items::table
            .filter(order_items::orderid.eq(orderid))
            .order(order_items::orderitemid.asc())
            .select(OrderItem::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DbError> {
        let mut conn = self.conn().await?;
        let query = orders::table.into_boxed();
        let query = match filter {
            OrderFilter::Customer(id) => query.filter(orders::custid.eq(id)),
            OrderFilter::Restaurant(id) => query.filter(orders::restid.eq(id)),
            OrderFilter::DeliveryStaff(id) => query.filter(orders::deliver_man_id.eq(id)),
            OrderFilter::Available => query
                .filter(orders::status.eq(OrderStatus::Ready))
                .filter(orders::deliver_man_id.is_null()),
        };
        let found = query
            .order((orders::created_time.desc(), orders::orderid.desc()))
            .select(Order::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }

    async fn compare_and_set_status(
        &self,
        orderid: i32,
        expected: OrderStatus,
        next: OrderStatus,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(
            orders::table
                .filter(orders::orderid.eq(orderid))
                .filter(orders::status.eq(expected)),
        )
        .set((orders::status.eq(next), orders::updated_time.eq(at)))
        .returning(Order::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        Ok(updated)
    }

    async fn assign_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(
            orders::table
                .filter(orders::orderid.eq(orderid))
                .filter(orders::status.eq(OrderStatus::Ready))
                .filter(orders::deliver_man_id.is_null()),
        )
        .set((
            orders::deliver_man_id.eq(Some(staff_id)),
            orders::status.eq(OrderStatus::OutForDelivery),
            orders::start_deliver_time.eq(Some(at)),
            orders::updated_time.eq(at),
        ))
        .returning(Order::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        Ok(updated)
    }

    async fn release_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(
            orders::table
                .filter(orders::orderid.eq(orderid))
                .filter(orders::status.eq(OrderStatus::OutForDelivery))
                .filter(orders::deliver_man_id.eq(staff_id)),
        )
        .set((
            orders::deliver_man_id.eq(None::<i32>),
            orders::status.eq(OrderStatus::Pending),
            orders::start_deliver_time.eq(None::<NaiveDateTime>),
            orders::end_deliver_time.eq(None::<NaiveDateTime>),
            orders::updated_time.eq(at),
        ))
        .returning(Order::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        Ok(updated)
    }

    async fn complete_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(
            orders::table
                .filter(orders::orderid.eq(orderid))
                .filter(orders::status.eq(OrderStatus::OutForDelivery))
                .filter(orders::deliver_man_id.eq(staff_id)),
        )
        .set((
            orders::status.eq(OrderStatus::Delivered),
            orders::end_deliver_time.eq(Some(at)),
            orders::updated_time.eq(at),
        ))
        .returning(Order::as_returning())
        .get_result(&mut conn)
        .await
        .optional()?;
        Ok(updated)
    }
}

use super::PgRepository;
use crate::db_models::{MenuItem, MenuItemChanges, NewMenuItem};
use crate::domain::MenuItemStatus;
use crate::errors::custom::DbError;
use crate::repository::MenuRepository;
use crate::schema::menu_items;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

#[async_trait]
impl MenuRepository for PgRepository {
    async fn list_menu(
        &self,
        restid: i32,
        status: Option<MenuItemStatus>,
    ) -> Result<Vec<MenuItem>, DbError> {
        let mut conn = self.conn().await?;
        let mut query = menu_items::table
            .filter(menu_items::restid.eq(restid))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(menu_items::status.eq(status));
        }
        let found = query
            .order((menu_items::category.asc(), menu_items::item_id.asc()))
            .select(MenuItem::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }

    async fn list_menu_by_category(
        &self,
        category: &str,
        restid: Option<i32>,
    ) -> Result<Vec<MenuItem>, DbError> {
        let mut conn = self.conn().await?;
        let mut query = menu_items::table
            .filter(menu_items::category.eq(category))
            .filter(menu_items::status.eq(MenuItemStatus::Active))
            .into_boxed();
        if let Some(restid) = restid {
            query = query.filter(menu_items::restid.eq(restid));
        }
        let found = query
            .order(menu_items::item_id.asc())
            .select(MenuItem::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }

    async fn find_menu_item(&self, item_id: i32) -> Result<Option<MenuItem>, DbError> {
        let mut conn = self.conn().await?;
        let found = menu_items::table
            .find(item_id)
            .select(MenuItem::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }

    async fn find_menu_items(&self, item_ids: &[i32]) -> Result<Vec<MenuItem>, DbError> {
        let mut conn = self.conn().await?;
        let found = menu_items::table
            .filter(menu_items::item_id.eq_any(item_ids.to_vec()))
            .select(MenuItem::as_select())
            .load(&mut conn)
            .await?;
        Ok(found)
    }

    async fn insert_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, DbError> {
        let mut conn = self.conn().await?;
        let stored = diesel::insert_into(menu_items::table)
            .values(&item)
            .returning(MenuItem::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(stored)
    }

    async fn update_menu_item(
        &self,
        item_id: i32,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItem>, DbError> {
        // An empty changeset is a query builder error in diesel.
        if changes.is_empty() {
            return self.find_menu_item(item_id).await;
        }
        let mut conn = self.conn().await?;
        let updated = diesel::update(menu_items::table.find(item_id))
            .set(&changes)
            .returning(MenuItem::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(updated)
    }

    async fn delete_menu_item(&self, item_id: i32) -> Result<bool, DbError> {
        let mut conn = self.conn().await?;
        let deleted = diesel::delete(menu_items::table.find(item_id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}

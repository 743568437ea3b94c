use super::{
    AccountRepository, AddressRepository, MenuRepository, OrderFilter, OrderRepository,
    ReviewRepository,
};
use crate::db_models::{
    AddressChanges, AddressDraft, Customer, CustomerAddress, CustomerChanges, DeliveryStaff,
    MenuItem, MenuItemChanges, NewCustomer, NewDeliveryStaff, NewMenuItem, NewOrder, NewRestaurant,
    NewReview, Order, OrderItem, OrderLine, OrderReview, Restaurant, StoredCredentials,
};
use crate::domain::{MenuItemStatus, OrderStatus, Role};
use crate::errors::custom::DbError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    next_id: i32,
    customers: BTreeMap<i32, Customer>,
    restaurants: BTreeMap<i32, Restaurant>,
    delivery_staff: BTreeMap<i32, DeliveryStaff>,
    addresses: BTreeMap<i32, CustomerAddress>,
    menu_items: BTreeMap<i32, MenuItem>,
    orders: BTreeMap<i32, Order>,
    order_items: BTreeMap<i32, OrderItem>,
    reviews: BTreeMap<i32, OrderReview>,
}

impl Tables {
    // One sequence shared by every table is enough for a process-local store.
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn clear_default(&mut self, custid: i32, at: NaiveDateTime) {
        for address in self.addresses.values_mut() {
            if address.custid == custid && address.is_default {
                address.is_default = false;
                address.updated_time = at;
            }
        }
    }

    fn push_address(
        &mut self,
        custid: i32,
        draft: AddressDraft,
        at: NaiveDateTime,
    ) -> CustomerAddress {
        if draft.is_default {
            self.clear_default(custid, at);
        }
        let address = CustomerAddress {
            addressid: self.next_id(),
            custid,
            address_line1: draft.address_line1,
            address_line2: draft.address_line2,
            city: draft.city,
            postal_code: draft.postal_code,
            country: draft.country,
            is_default: draft.is_default,
            created_time: at,
            updated_time: at,
            deleted_time: None,
        };
        self.addresses.insert(address.addressid, address.clone());
        address
    }

    fn email_in_use(&self, email: &str) -> bool {
        self.customers.values().any(|c| c.email == email)
            || self.restaurants.values().any(|r| r.email == email)
            || self.delivery_staff.values().any(|d| d.email == email)
    }
}

fn unique_violation(what: &str) -> DbError {
    DbError::UniqueViolation(format!("duplicate key value violates unique constraint on {what}"))
}

fn foreign_key_violation(what: &str) -> DbError {
    DbError::ForeignKeyViolation(format!("{what} is still referenced"))
}

/// Process-local store with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn email_taken(&self, email: &str) -> Result<bool, DbError> {
        Ok(self.tables.read().await.email_in_use(email))
    }

    async fn insert_customer(
        &self,
        new: NewCustomer,
        address: Option<AddressDraft>,
    ) -> Result<Customer, DbError> {
        let mut tables = self.tables.write().await;
        if tables.customers.values().any(|c| c.email == new.email) {
            return Err(unique_violation("customer.email"));
        }
        let customer = Customer {
            custid: tables.next_id(),
            custname: new.custname,
            phone: new.phone,
            email: new.email,
            password_hash: new.password_hash,
            icon: None,
            is_validate: new.is_validate,
            latest_login_date: None,
            created_time: new.created_time,
            updated_time: new.updated_time,
            deleted_time: None,
        };
        tables.customers.insert(customer.custid, customer.clone());
        if let Some(draft) = address {
            tables.push_address(customer.custid, draft, new.created_time);
        }
        Ok(customer)
    }

    async fn insert_restaurant(&self, new: NewRestaurant) -> Result<Restaurant, DbError> {
        let mut tables = self.tables.write().await;
        if tables.restaurants.values().any(|r| r.email == new.email) {
            return Err(unique_violation("restaurant.email"));
        }
        let restaurant = Restaurant {
            restid: tables.next_id(),
            restname: new.restname,
            email: new.email,
            phone: new.phone,
            description: new.description,
            address: new.address,
            password_hash: new.password_hash,
            icon: None,
            is_validate: new.is_validate,
            latest_login_date: None,
            created_time: new.created_time,
            updated_time: new.updated_time,
            deleted_time: None,
        };
        tables
            .restaurants
            .insert(restaurant.restid, restaurant.clone());
        Ok(restaurant)
    }

    async fn insert_delivery_staff(&self, new: NewDeliveryStaff) -> Result<DeliveryStaff, DbError> {
        let mut tables = self.tables.write().await;
        if tables.delivery_staff.values().any(|d| d.email == new.email) {
            return Err(unique_violation("delivery_staff.email"));
        }
        let staff = DeliveryStaff {
            staff_id: tables.next_id(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            password_hash: new.password_hash,
            icon: None,
            vehicle_type: new.vehicle_type,
            license_number: new.license_number,
            is_validate: new.is_validate,
            latest_login_date: None,
            created_time: new.created_time,
            updated_time: new.updated_time,
            deleted_time: None,
        };
        tables.delivery_staff.insert(staff.staff_id, staff.clone());
        Ok(staff)
    }

    async fn find_credentials(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<StoredCredentials>, DbError> {
        let tables = self.tables.read().await;
        let found = match role {
            Role::Customer => tables
                .customers
                .values()
                .find(|c| c.email == email)
                .map(|c| StoredCredentials {
                    id: c.custid,
                    name: c.custname.clone(),
                    email: c.email.clone(),
                    password_hash: c.password_hash.clone(),
                    is_validate: c.is_validate,
                }),
            Role::Restaurant => tables
                .restaurants
                .values()
                .find(|r| r.email == email)
                .map(|r| StoredCredentials {
                    id: r.restid,
                    name: r.restname.clone(),
                    email: r.email.clone(),
                    password_hash: r.password_hash.clone(),
                    is_validate: r.is_validate,
                }),
            Role::Delivery => tables
                .delivery_staff
                .values()
                .find(|d| d.email == email)
                .map(|d| StoredCredentials {
                    id: d.staff_id,
                    name: d.name.clone(),
                    email: d.email.clone(),
                    password_hash: d.password_hash.clone(),
                    is_validate: d.is_validate,
                }),
        };
        Ok(found)
    }

    async fn record_login(&self, role: Role, id: i32, at: NaiveDateTime) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        match role {
            Role::Customer => {
                if let Some(c) = tables.customers.get_mut(&id) {
                    c.latest_login_date = Some(at);
                    c.updated_time = at;
                }
            }
            Role::Restaurant => {
                if let Some(r) = tables.restaurants.get_mut(&id) {
                    r.latest_login_date = Some(at);
                    r.updated_time = at;
                }
            }
            Role::Delivery => {
                if let Some(d) = tables.delivery_staff.get_mut(&id) {
                    d.latest_login_date = Some(at);
                    d.updated_time = at;
                }
            }
        }
        Ok(())
    }

    async fn find_customer(&self, custid: i32) -> Result<Option<Customer>, DbError> {
        Ok(self.tables.read().await.customers.get(&custid).cloned())
    }

    async fn update_customer(
        &self,
        custid: i32,
        changes: CustomerChanges,
        at: NaiveDateTime,
    ) -> Result<Option<Customer>, DbError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables
                .customers
                .values()
                .any(|c| c.custid != custid && &c.email == email)
            {
                return Err(unique_violation("customer.email"));
            }
        }
        let Some(customer) = tables.customers.get_mut(&custid) else {
            return Ok(None);
        };
        if let Some(name) = changes.custname {
            customer.custname = name;
        }
        if let Some(phone) = changes.phone {
            customer.phone = Some(phone);
        }
        if let Some(email) = changes.email {
            customer.email = email;
        }
        if let Some(icon) = changes.icon {
            customer.icon = Some(icon);
        }
        customer.updated_time = at;
        Ok(Some(customer.clone()))
    }

    async fn find_restaurant(&self, restid: i32) -> Result<Option<Restaurant>, DbError> {
        Ok(self.tables.read().await.restaurants.get(&restid).cloned())
    }

    async fn find_restaurant_by_name(&self, name: &str) -> Result<Option<Restaurant>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .restaurants
            .values()
            .find(|r| r.restname == name)
            .cloned())
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .restaurants
            .values()
            .filter(|r| r.is_validate && r.deleted_time.is_none())
            .cloned()
            .collect())
    }

    async fn find_delivery_staff(&self, staff_id: i32) -> Result<Option<DeliveryStaff>, DbError> {
        Ok(self.tables.read().await.delivery_staff.get(&staff_id).cloned())
    }
}

#[async_trait]
impl AddressRepository for InMemoryRepository {
    async fn list_addresses(&self, custid: i32) -> Result<Vec<CustomerAddress>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .addresses
            .values()
            .filter(|a| a.custid == custid)
            .cloned()
            .collect())
    }

    async fn find_address(&self, addressid: i32) -> Result<Option<CustomerAddress>, DbError> {
        Ok(self.tables.read().await.addresses.get(&addressid).cloned())
    }

    async fn default_address(&self, custid: i32) -> Result<Option<CustomerAddress>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .addresses
            .values()
            .find(|a| a.custid == custid && a.is_default)
            .cloned())
    }

    async fn insert_address(
        &self,
        custid: i32,
        draft: AddressDraft,
        at: NaiveDateTime,
    ) -> Result<CustomerAddress, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&custid) {
            return Err(DbError::ForeignKeyViolation(format!(
                "customer {custid} does not exist"
            )));
        }
        Ok(tables.push_address(custid, draft, at))
    }

    async fn update_address(
        &self,
        addressid: i32,
        changes: AddressChanges,
        at: NaiveDateTime,
    ) -> Result<Option<CustomerAddress>, DbError> {
        let mut tables = self.tables.write().await;
        let Some(custid) = tables.addresses.get(&addressid).map(|a| a.custid) else {
            return Ok(None);
        };
        if changes.is_default == Some(true) {
            tables.clear_default(custid, at);
        }
        let Some(address) = tables.addresses.get_mut(&addressid) else {
            return Ok(None);
        };
        if let Some(line1) = changes.address_line1 {
            address.address_line1 = line1;
        }
        if let Some(line2) = changes.address_line2 {
            address.address_line2 = Some(line2);
        }
        if let Some(city) = changes.city {
            address.city = Some(city);
        }
        if let Some(postal_code) = changes.postal_code {
            address.postal_code = Some(postal_code);
        }
        if let Some(country) = changes.country {
            address.country = country;
        }
        if let Some(is_default) = changes.is_default {
            address.is_default = is_default;
        }
        address.updated_time = at;
        Ok(Some(address.clone()))
    }

    async fn delete_address(&self, addressid: i32) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        let removed = tables.addresses.remove(&addressid).is_some();
        if removed {
            // Mirrors ON DELETE SET NULL on orders.addressid.
            for order in tables.orders.values_mut() {
                if order.addressid == Some(addressid) {
                    order.addressid = None;
                }
            }
        }
        Ok(removed)
    }

    async fn set_default_address(
        &self,
        custid: i32,
        addressid: i32,
        at: NaiveDateTime,
    ) -> Result<Option<CustomerAddress>, DbError> {
        let mut tables = self.tables.write().await;
        match tables.addresses.get(&addressid) {
            Some(address) if address.custid == custid => {}
            _ => return Ok(None),
        }
        tables.clear_default(custid, at);
        let Some(address) = tables.addresses.get_mut(&addressid) else {
            return Ok(None);
        };
        address.is_default = true;
        address.updated_time = at;
        Ok(Some(address.clone()))
    }
}

#[async_trait]
impl MenuRepository for InMemoryRepository {
    async fn list_menu(
        &self,
        restid: i32,
        status: Option<MenuItemStatus>,
    ) -> Result<Vec<MenuItem>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .menu_items
            .values()
            .filter(|item| item.restid == restid)
            .filter(|item| status.map_or(true, |s| item.status == s))
            .cloned()
            .collect())
    }

    async fn list_menu_by_category(
        &self,
        category: &str,
        restid: Option<i32>,
    ) -> Result<Vec<MenuItem>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .menu_items
            .values()
            .filter(|item| item.category.as_deref() == Some(category))
            .filter(|item| item.status == MenuItemStatus::Active)
            .filter(|item| restid.map_or(true, |id| item.restid == id))
            .cloned()
            .collect())
    }

    async fn find_menu_item(&self, item_id: i32) -> Result<Option<MenuItem>, DbError> {
        Ok(self.tables.read().await.menu_items.get(&item_id).cloned())
    }

    async fn find_menu_items(&self, item_ids: &[i32]) -> Result<Vec<MenuItem>, DbError> {
        let tables = self.tables.read().await;
        Ok(item_ids
            .iter()
            .filter_map(|id| tables.menu_items.get(id).cloned())
            .collect())
    }

    async fn insert_menu_item(&self, new: NewMenuItem) -> Result<MenuItem, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.restaurants.contains_key(&new.restid) {
            return Err(DbError::ForeignKeyViolation(format!(
                "restaurant {} does not exist",
                new.restid
            )));
        }
        let item = MenuItem {
            item_id: tables.next_id(),
            restid: new.restid,
            category: new.category,
            item_name: new.item_name,
            description: new.description,
            price_cents: new.price_cents,
            status: new.status,
            created_time: new.created_time,
        };
        tables.menu_items.insert(item.item_id, item.clone());
        Ok(item)
    }

    async fn update_menu_item(
        &self,
        item_id: i32,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItem>, DbError> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.menu_items.get_mut(&item_id) else {
            return Ok(None);
        };
        if let Some(category) = changes.category {
            item.category = Some(category);
        }
        if let Some(name) = changes.item_name {
            item.item_name = name;
        }
        if let Some(description) = changes.description {
            item.description = Some(description);
        }
        if let Some(price) = changes.price_cents {
            item.price_cents = price;
        }
        if let Some(status) = changes.status {
            item.status = status;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_menu_item(&self, item_id: i32) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        if tables.order_items.values().any(|line| line.item_id == item_id) {
            return Err(foreign_key_violation("menu item"));
        }
        Ok(tables.menu_items.remove(&item_id).is_some())
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn insert_order(
        &self,
        new: NewOrder,
        lines: Vec<OrderLine>,
    ) -> Result<(Order, Vec<OrderItem>), DbError> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&new.custid) {
            return Err(DbError::ForeignKeyViolation(format!(
                "customer {} does not exist",
                new.custid
            )));
        }
        if !tables.restaurants.contains_key(&new.restid) {
            return Err(DbError::ForeignKeyViolation(format!(
                "restaurant {} does not exist",
                new.restid
            )));
        }
        if let Some(missing) = lines
            .iter()
            .find(|line| !tables.menu_items.contains_key(&line.item_id))
        {
            return Err(DbError::ForeignKeyViolation(format!(
                "menu item {} does not exist",
                missing.item_id
            )));
        }
        let order = Order {
            orderid: tables.next_id(),
            custid: new.custid,
            restid: new.restid,
            addressid: new.addressid,
            shipping_address: new.shipping_address,
            deliver_man_id: None,
            start_deliver_time: None,
            end_deliver_time: None,
            status: new.status,
            remark: new.remark,
            total_cents: new.total_cents,
            discount_cents: new.discount_cents,
            created_time: new.created_time,
            updated_time: new.updated_time,
        };
        tables.orders.insert(order.orderid, order.clone());
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = OrderItem {
                orderitemid: tables.next_id(),
                orderid: order.orderid,
                item_id: line.item_id,
                quantity: line.quantity,
                price_cents: line.price_cents,
                created_time: new.created_time,
            };
            tables.order_items.insert(item.orderitemid, item.clone());
            items.push(item);
        }
        Ok((order, items))
    }

    async fn find_order(&self, orderid: i32) -> Result<Option<Order>, DbError> {
        Ok(self.tables.read().await.orders.get(&orderid).cloned())
    }

    async fn order_items(&self, orderid: i32) -> Result<Vec<OrderItem>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .order_items
            .values()
            .filter(|item| item.orderid == orderid)
            .cloned()
            .collect())
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DbError> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| match filter {
                OrderFilter::Customer(id) => order.custid == id,
                OrderFilter::Restaurant(id) => order.restid == id,
                OrderFilter::DeliveryStaff(id) => order.deliver_man_id == Some(id),
                OrderFilter::Available => {
                    order.status == OrderStatus::Ready && order.deliver_man_id.is_none()
                }
            })
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.created_time
                .cmp(&a.created_time)
                .then(b.orderid.cmp(&a.orderid))
        });
        Ok(orders)
    }

    async fn compare_and_set_status(
        &self,
        orderid: i32,
        expected: OrderStatus,
        next: OrderStatus,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&orderid) {
            Some(order) if order.status == expected => {
                order.status = next;
                order.updated_time = at;
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn assign_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&orderid) {
            Some(order) if order.status == OrderStatus::Ready && order.deliver_man_id.is_none() => {
                order.deliver_man_id = Some(staff_id);
                order.status = OrderStatus::OutForDelivery;
                order.start_deliver_time = Some(at);
                order.updated_time = at;
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&orderid) {
            Some(order)
                if order.status == OrderStatus::OutForDelivery
                    && order.deliver_man_id == Some(staff_id) =>
            {
                order.deliver_man_id = None;
                order.status = OrderStatus::Pending;
                order.start_deliver_time = None;
                order.end_deliver_time = None;
                order.updated_time = at;
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn complete_delivery(
        &self,
        orderid: i32,
        staff_id: i32,
        at: NaiveDateTime,
    ) -> Result<Option<Order>, DbError> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&orderid) {
            Some(order)
                if order.status == OrderStatus::OutForDelivery
                    && order.deliver_man_id == Some(staff_id) =>
            {
                order.status = OrderStatus::Delivered;
                order.end_deliver_time = Some(at);
                order.updated_time = at;
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ReviewRepository for InMemoryRepository {
    async fn find_review_by_order(&self, orderid: i32) -> Result<Option<OrderReview>, DbError> {
        Ok(self
            .tables
            .read()
            .await
            .reviews
            .values()
            .find(|review| review.orderid == orderid)
            .cloned())
    }

    async fn insert_review(&self, new: NewReview) -> Result<OrderReview, DbError> {
        let mut tables = self.tables.write().await;
        if tables.reviews.values().any(|r| r.orderid == new.orderid) {
            return Err(unique_violation("order_reviews.orderid"));
        }
        if !tables.orders.contains_key(&new.orderid) {
            return Err(DbError::ForeignKeyViolation(format!(
                "order {} does not exist",
                new.orderid
            )));
        }
        let review = OrderReview {
            reviewid: tables.next_id(),
            orderid: new.orderid,
            custid: new.custid,
            rest_rating: new.rest_rating,
            delivery_rating: new.delivery_rating,
            comment: new.comment,
            created_time: new.created_time,
            updated_time: new.updated_time,
        };
        tables.reviews.insert(review.reviewid, review.clone());
        Ok(review)
    }

    async fn restaurant_reviews(&self, restid: i32) -> Result<Vec<OrderReview>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|review| {
                tables
                    .orders
                    .get(&review.orderid)
                    .is_some_and(|order| order.restid == restid)
            })
            .cloned()
            .collect())
    }
}

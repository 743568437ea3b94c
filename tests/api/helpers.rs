use dotenv::dotenv;
use food_delivery::config::configuration::{Argon2Settings, Settings, StorageBackend};
use food_delivery::startup::Application;
use food_delivery::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    dotenv().ok();
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub port: u16,
    pub address: String,
    pub api_client: reqwest::Client,
}

/// A registered, logged-in account.
pub struct TestAccount {
    pub id: i32,
    pub email: String,
    pub token: String,
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, token: Option<&str>, body: &Value) -> reqwest::Response {
        let mut request = self.api_client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn put_json(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, email: &str, user_type: &str) -> reqwest::Response {
        self.post_json(
            "/api/auth/login",
            None,
            &json!({"email": email, "password": PASSWORD, "user_type": user_type}),
        )
        .await
    }

    async fn register_and_login(&self, mut body: Value, id_field: &str) -> TestAccount {
        let user_type = body["user_type"].as_str().unwrap().to_string();
        let email = body["email"].as_str().unwrap().to_string();
        body["password"] = json!(PASSWORD);

        let response = self.post_json("/api/auth/register", None, &body).await;
        assert_eq!(response.status().as_u16(), 201, "registration failed");
        let profile: Value = response.json().await.unwrap();
        let id = profile[id_field].as_i64().unwrap() as i32;

        let response = self.login(&email, &user_type).await;
        assert!(response.status().is_success(), "login failed");
        let body: Value = response.json().await.unwrap();
        TestAccount {
            id,
            email,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn customer(&self) -> TestAccount {
        self.register_and_login(
            json!({
                "name": "Chan Tai Man",
                "email": unique_email("customer"),
                "user_type": "customer",
                "address_line1": "1 Queen's Road Central",
                "city": "Central"
            }),
            "custid",
        )
        .await
    }

    pub async fn restaurant(&self) -> TestAccount {
        self.register_and_login(
            json!({
                "name": "Owner",
                "restname": format!("Kitchen-{}", Uuid::new_v4()),
                "email": unique_email("restaurant"),
                "user_type": "restaurant"
            }),
            "restid",
        )
        .await
    }

    pub async fn delivery_staff(&self) -> TestAccount {
        self.register_and_login(
            json!({
                "name": "Rider",
                "email": unique_email("rider"),
                "user_type": "delivery",
                "vehicle_type": "scooter"
            }),
            "staff_id",
        )
        .await
    }

    /// Adds an active menu item and returns its id.
    pub async fn menu_item(&self, restaurant: &TestAccount, name: &str, price: &str) -> i32 {
        let response = self
            .post_json(
                "/api/restaurant/menu",
                Some(&restaurant.token),
                &json!({"item_name": name, "price": price, "category": "mains"}),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let item: Value = response.json().await.unwrap();
        item["item_id"].as_i64().unwrap() as i32
    }

    /// Places an order for the given items and returns the order body.
    pub async fn place_order(&self, customer: &TestAccount, items: Value) -> Value {
        let response = self
            .post_json(
                "/api/orders/create",
                Some(&customer.token),
                &json!({"items": items}),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.unwrap()
    }

    pub async fn set_status(&self, account: &TestAccount, orderid: i64, status: &str) -> reqwest::Response {
        self.put_json(
            &format!("/api/orders/{}/status", orderid),
            &account.token,
            &json!({"status": status}),
        )
        .await
    }
}

pub async fn spawn_app() -> TestApp {
    // To Ensure that the tracing stack is only initialized once
    Lazy::force(&TRACING);

    let mut settings = Settings::new().expect("Failed to load configuration");
    settings.database.backend = StorageBackend::Memory;
    settings.application.host = "127.0.0.1".to_string();
    settings.application.port = 0;
    settings.auth.auto_activate_delivery_staff = true;
    settings.auth.argon2 = Argon2Settings {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    let application = Application::build(settings)
        .await
        .expect("Failed to build application");
    let port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        port,
        address: format!("http://127.0.0.1:{}", port),
        api_client: reqwest::Client::new(),
    }
}

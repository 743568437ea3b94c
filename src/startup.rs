use crate::auth_jwt::auth::JwtKeys;
use crate::config::configuration::{Settings, StorageBackend};
use crate::db::{establish_connection, run_migrations};
use crate::middleware::jwt_auth_middleware;
use crate::repository::{InMemoryRepository, PgRepository, Repository};
use crate::routes::{auth, cart, customer, delivery, health_check, menu, orders, restaurant, restaurants};
use crate::services::cart::{CartStore, MokaCartStore};
use crate::state::AppState;
use actix_web::{dev::Server, web, App, HttpServer};
use actix_web_lab::middleware::from_fn;
use secrecy::ExposeSecret;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/******************************************/
// Selecting the storage backend
/******************************************/
async fn build_repository(settings: &Settings) -> Result<Arc<dyn Repository>, std::io::Error> {
    match settings.database.backend {
        StorageBackend::Postgres => {
            let to_io = |err: crate::errors::custom::DbError| {
                std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
            };
            let pool = establish_connection(
                settings.database.url.expose_secret(),
                settings.database.pool_max_size,
            )
            .map_err(to_io)?;
            run_migrations(&pool).await.map_err(to_io)?;
            Ok(Arc::new(PgRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(InMemoryRepository::new()))
        }
    }
}

/**************************************************************/
// Application State re reuse the same code in main and tests
/***************************************************************/
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, std::io::Error> {
        let repo = build_repository(&settings).await?;
        let carts: Arc<dyn CartStore> = Arc::new(MokaCartStore::new(&settings.cart));
        let state = AppState {
            repo,
            carts,
            jwt: JwtKeys::new(&settings.jwt.secret, settings.jwt.expiration_minutes),
            auth: settings.auth.clone(),
        };

        let address = format!("{}:{}", settings.application.host, settings.application.port);
        let listener = TcpListener::bind(&address)?;
        let actual_port = listener.local_addr()?.port();
        tracing::info!(address = %address, port = actual_port, "Listening");

        let server = run_server(listener, web::Data::new(state))?;
        Ok(Self {
            port: actual_port,
            server,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/******************************************/
// Running Server
/******************************************/
pub fn run_server(listener: TcpListener, state: web::Data<AppState>) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .route("/health_check", web::get().to(health_check::health_check))
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            .service(
                web::scope("/api/restaurants")
                    .route("", web::get().to(restaurants::list_restaurants))
                    .route("/name/{name}", web::get().to(restaurants::get_restaurant_by_name))
                    .route("/{id}", web::get().to(restaurants::get_restaurant))
                    .route("/{id}/menu", web::get().to(restaurants::restaurant_menu))
                    .route("/{id}/rating", web::get().to(restaurants::restaurant_rating)),
            )
            .service(
                web::scope("/api/menu")
                    .route("/restaurant/{id}", web::get().to(menu::by_restaurant))
                    .route("/restaurant/{id}/all", web::get().to(menu::all_by_restaurant))
                    .route(
                        "/restaurant/{id}/category/{category}",
                        web::get().to(menu::by_restaurant_and_category),
                    )
                    .route("/category/{category}", web::get().to(menu::by_category))
                    .route("/item/{id}", web::get().to(menu::get_item)),
            )
            .service(
                web::scope("/api/customer")
                    .wrap(from_fn(jwt_auth_middleware))
                    .route("/profile", web::get().to(customer::view_profile))
                    .route("/profile", web::put().to(customer::update_profile))
                    .route("/addresses", web::get().to(customer::list_addresses))
                    .route("/addresses", web::post().to(customer::add_address))
                    .route("/addresses/default", web::get().to(customer::default_address))
                    .route("/addresses/{id}", web::put().to(customer::update_address))
                    .route("/addresses/{id}", web::delete().to(customer::delete_address))
                    .route(
                        "/addresses/{id}/default",
                        web::put().to(customer::set_default_address),
                    ),
            )
            .service(
                web::scope("/api/restaurant")
                    .wrap(from_fn(jwt_auth_middleware))
                    .route("/profile", web::get().to(restaurant::view_profile))
                    .route("/menu", web::get().to(restaurant::list_menu))
                    .route("/menu", web::post().to(restaurant::add_menu_item))
                    .route("/menu/{id}", web::put().to(restaurant::update_menu_item))
                    .route("/menu/{id}", web::delete().to(restaurant::delete_menu_item))
                    .route("/orders", web::get().to(restaurant::list_orders))
                    .route("/orders/by_status", web::get().to(restaurant::orders_by_status))
                    .route(
                        "/orders/{id}/status",
                        web::put().to(restaurant::update_order_status),
                    )
                    .route("/orders/{id}/ready", web::put().to(restaurant::mark_ready)),
            )
            .service(
                web::scope("/api/delivery")
                    .wrap(from_fn(jwt_auth_middleware))
                    .route("/profile", web::get().to(delivery::view_profile))
                    .route("/orders", web::get().to(delivery::my_orders))
                    .route("/orders/available", web::get().to(delivery::available_orders))
                    .route("/orders/{id}/accept", web::put().to(delivery::accept_order))
                    .route("/orders/{id}/complete", web::put().to(delivery::complete_order))
                    .route("/orders/{id}/cancel", web::put().to(delivery::release_order)),
            )
            .service(
                web::scope("/api/orders")
                    .wrap(from_fn(jwt_auth_middleware))
                    .route("", web::get().to(orders::list_orders))
                    .route("/create", web::post().to(orders::create_order))
                    .route("/{id}", web::get().to(orders::get_order))
                    .route("/{id}/history", web::get().to(orders::order_history))
                    .route("/{id}/status", web::put().to(orders::update_status))
                    .route("/{id}/cancel", web::put().to(orders::cancel_order))
                    .route("/{id}/review", web::post().to(orders::submit_review))
                    .route("/{id}/review", web::get().to(orders::get_review)),
            )
            .service(
                web::scope("/api/cart")
                    .wrap(from_fn(jwt_auth_middleware))
                    .route("/items", web::get().to(cart::view_cart))
                    .route("/add", web::post().to(cart::add_item))
                    .route("/items/{item_id}", web::put().to(cart::update_item))
                    .route("/remove/{item_id}", web::delete().to(cart::remove_item))
                    .route("/clear", web::delete().to(cart::clear_cart))
                    .route("/total", web::get().to(cart::cart_total)),
            )
    })
    .listen(listener)?
    .run();
    Ok(server)
}

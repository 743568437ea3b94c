use crate::auth_jwt::auth::JwtKeys;
use crate::config::configuration::AuthSettings;
use crate::repository::Repository;
use crate::services::cart::CartStore;
use std::sync::Arc;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub carts: Arc<dyn CartStore>,
    pub jwt: JwtKeys,
    pub auth: AuthSettings,
}

use std::sync::Arc;

use wayfare_booking::BookingService;

#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub expiration: u64,
    pub master_admin_email: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub auth: AuthSettings,
}

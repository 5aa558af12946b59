use std::sync::Arc;

use lendit_core::service::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
}

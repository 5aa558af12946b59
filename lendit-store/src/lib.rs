pub mod app_config;
pub mod database;
pub mod user_repo;
pub mod item_repo;
pub mod booking_repo;

pub use booking_repo::PgBookingStore;
pub use database::DbClient;
pub use item_repo::PgItemDirectory;
pub use user_repo::PgUserDirectory;

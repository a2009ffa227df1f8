pub mod app_store_client;
pub mod aso_client;

pub use app_store_client::AppStoreClient;
pub use aso_client::AsoClient;

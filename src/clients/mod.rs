pub mod api_client;
pub mod store;

pub use api_client::ApiClient;
pub use store::{ImageStore, RecordStore};

pub mod error;
pub mod gateway;
pub mod local;
pub mod records;
pub mod store;

pub use error::StoreError;
pub use gateway::StoreGateway;
pub use local::local_store::LocalStore;
pub use store::traits::ConfidentialStore;

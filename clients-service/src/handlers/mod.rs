//! HTTP handlers for clients-service.

pub mod clients;
pub mod health;

pub use clients::{clients_count, ClientsCountResponse};
pub use health::health_check;

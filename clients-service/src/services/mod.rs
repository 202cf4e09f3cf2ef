pub mod database;
pub mod metrics;

pub use self::database::{ClientCounter, ClientsDb};
pub use self::metrics::{init_metrics, record_clients_count};

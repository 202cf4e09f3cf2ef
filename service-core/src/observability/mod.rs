pub mod logging;

pub use self::logging::{init_tracing, shutdown_tracing};

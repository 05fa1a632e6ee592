pub mod hot_reload;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_env;

pub use hot_reload::ConfigHandle;
pub use schema::{Config, GateConfig, ObservabilityConfig, PassportConfig, StoreConfig};

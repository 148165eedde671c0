mod config_types;

pub use config_types::*;

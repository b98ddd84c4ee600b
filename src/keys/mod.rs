//! Named secrets sealed into a JSON file

pub mod sealed;

pub use sealed::{seal_env_file, seal_vars, SealedKeys};

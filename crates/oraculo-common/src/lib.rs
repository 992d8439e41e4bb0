pub mod errors;

pub use errors::{ConfigError, OraculoError};

pub type Result<T> = std::result::Result<T, OraculoError>;

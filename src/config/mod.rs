//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (MC_*, BOT_*)
//!     → loader.rs (read variables, apply defaults)
//!     → validation.rs (semantic checks)
//!     → BodyConfig (validated, immutable)
//!
//! On connect:
//!     ConnectionConfig (env + defaults)
//!     → merged with ConnectionOverrides
//!     → validated again, handed to the connector
//! ```
//!
//! # Design Decisions
//! - Precedence: call-site overrides > environment > defaults
//! - All fields have defaults so an empty environment is a valid setup
//! - Lookup is injectable so tests never mutate the process environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, load_with, ConfigError};
pub use schema::{
    BodyConfig, ConnectionConfig, ConnectionOverrides, HttpConfig, LifecycleConfig,
    ObservabilityConfig,
};
pub use validation::ValidationError;

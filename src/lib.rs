//! Body service library: HTTP status endpoint and game-bot connection
//! manager.

// Core subsystems
pub mod bot;
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use bot::{BotConnector, BotHandle, ConnectionManager};
pub use config::{BodyConfig, ConnectionConfig, ConnectionOverrides};
pub use http::HttpServer;
pub use lifecycle::{BodyService, Shutdown};

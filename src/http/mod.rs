//! HTTP status service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → request.rs (request ID)
//!     → middleware/json_body.rs (content-type check, JSON parsing)
//!     → status.rs (GET /status) | response.rs (404 fallback)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Stateless per request
//! - Every error uses the same `{success, error: {code, message}}` envelope
//! - Content-type mismatches are reported, never rejected

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod status;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{ApiError, ErrorEnvelope};
pub use server::{build_router, HttpServer};

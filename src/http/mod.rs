//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, route label)
//!     → hooks.rs (before: start time)
//!     → error.rs (error boundary)
//!     → handlers.rs (demo endpoints)
//!     → error.rs (sanitize server errors, count them)
//!     → hooks.rs (after: duration + request count)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod hooks;
pub mod request;
pub mod server;

pub use error::{AppError, ErrorBody, GENERIC_ERROR};
pub use handlers::Message;
pub use hooks::RequestStart;
pub use request::{MakeRequestUuid, UNMATCHED_ROUTE, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

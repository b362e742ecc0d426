//! HTTP host adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, method/target/host/scheme)
//!     → routing layer (redirect or match outcome)
//!     → response.rs (301 + Location, or dispatch document)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestFacts, RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use response::{resolution_response, DispatchDocument};
pub use server::HttpServer;

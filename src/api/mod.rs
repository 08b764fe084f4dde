//! HTTP API.
//!
//! Exposes the office's records as REST endpoints for the front end.
//! Routes are nested under `/api/`; mutating routes sit behind a
//! bearer-token middleware, while registration, login, health, and the
//! doctor roster stay public.
//!
//! The router is composable — `api_router()` returns a `Router` that
//! can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;

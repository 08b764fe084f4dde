//! API middleware stack.
//!
//! A single layer: bearer-token authentication. Protected routes reject
//! before any store access; public routes skip it entirely.

pub mod auth;

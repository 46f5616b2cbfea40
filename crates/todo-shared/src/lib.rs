//! # Todo Shared
//!
//! Wire types shared between the API server and its clients.
//! Nothing here depends on the domain crate, so it can be compiled for a
//! WASM frontend as well.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::ErrorResponse;

//! # Todo Core
//!
//! The domain layer of the todo service.
//! This crate holds the entities, the BR-012 prioritization engine, display
//! classification and the ownership rules. It has zero infrastructure
//! dependencies; storage and crypto sit behind the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;

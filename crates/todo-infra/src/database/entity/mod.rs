//! SeaORM entities.

pub mod todo;
pub mod user;

//! Application services - orchestrate ports and domain rules per use case.

mod auth;
mod ownership;
mod todos;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthService, LoginOutcome};
pub use ownership::authorize;
pub use todos::TodoService;

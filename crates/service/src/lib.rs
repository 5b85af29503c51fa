//! Service layer providing the todo API's business operations on top of models.
//! - Separates business logic from data access via injected repository traits.
//! - Ships in-memory repositories (tests, dev) and sea-orm ones (production).
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod validation;
pub mod auth;
pub mod todo;
#[cfg(test)]
pub mod test_support;

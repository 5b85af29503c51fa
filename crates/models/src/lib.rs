//! sea-orm entities for the todo API plus model-level validation helpers.

pub mod errors;
pub mod db;
pub mod user;
pub mod todo;
pub mod token;

#[cfg(test)]
mod tests;

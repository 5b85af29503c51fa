//! Todos scoped to their owner: every operation takes the authenticated
//! user's id and never sees rows belonging to anyone else.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::TodoService;

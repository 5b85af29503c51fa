/// CRUD round trips for user, todo and token entities against a live database
pub mod crud_tests;

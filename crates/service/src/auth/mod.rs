//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, token validation and logout live here, independent of
//! the web framework. The password hasher, token issuer and session store are
//! separate leaves composed by [`AuthService`].

pub mod domain;
pub mod errors;
pub mod password;
pub mod token;
pub mod session;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};

/// Purpose tag carried by tokens issued at login.
pub const AUTH_PURPOSE: &str = "authentication";

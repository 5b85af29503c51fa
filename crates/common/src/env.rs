//! Environment/runtime helpers

use tracing::warn;

/// Resolve a non-empty environment variable, treating blank values as unset.
pub fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Whether database-backed tests should run in this environment.
///
/// Skipped when `SKIP_DB_TESTS` is set or no `DATABASE_URL` is configured.
pub fn db_tests_enabled() -> bool {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return false;
    }
    match non_empty_var("DATABASE_URL") {
        Some(_) => true,
        None => {
            warn!("DATABASE_URL missing; skipping database-backed test");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_vars_are_unset() {
        std::env::set_var("COMMON_ENV_TEST_BLANK", "   ");
        assert_eq!(non_empty_var("COMMON_ENV_TEST_BLANK"), None);
        std::env::set_var("COMMON_ENV_TEST_SET", "value");
        assert_eq!(non_empty_var("COMMON_ENV_TEST_SET").as_deref(), Some("value"));
    }
}

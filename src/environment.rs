use std::env;

/// Retrieves an environment variable, treating empty and template
/// placeholder values (the `.env.example` style `your_..._here`) as absent.
///
/// # Arguments
/// - `var`: The name of the environment variable.
///
/// # Returns
/// - `Option<String>`
pub fn get_optional_env(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() || trimmed.starts_with("your_") {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_values_are_absent() {
        env::set_var("GYMINTEL_TEST_KEY", "your_api_key_here");
        assert_eq!(get_optional_env("GYMINTEL_TEST_KEY"), None);

        env::set_var("GYMINTEL_TEST_KEY", "  real-key  ");
        assert_eq!(
            get_optional_env("GYMINTEL_TEST_KEY").as_deref(),
            Some("real-key")
        );

        env::remove_var("GYMINTEL_TEST_KEY");
        assert_eq!(get_optional_env("GYMINTEL_TEST_KEY"), None);
    }
}

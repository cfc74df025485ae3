use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN).context("invalid env var pattern")?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let placeholder = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let Some(var_name) = caps.get(1).or(caps.get(2)).map(|m| m.as_str()) else {
            return placeholder.to_string();
        };

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                // Keep the placeholder; the validator reports it
                placeholder.to_string()
            }
        }
    });
    let result = result.into_owned();

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(ENV_VAR_PATTERN)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_braced_and_bare_vars() {
        env::set_var("OPTLAB_TEST_HOST", "pricing.local");
        env::set_var("OPTLAB_TEST_PORT", "9000");

        let out = substitute_env_vars("http://${OPTLAB_TEST_HOST}:$OPTLAB_TEST_PORT/api/v1").unwrap();
        assert_eq!(out, "http://pricing.local:9000/api/v1");
        assert!(!has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_missing_var_keeps_placeholder() {
        env::remove_var("OPTLAB_TEST_MISSING");

        let out = substitute_env_vars("base_url: ${OPTLAB_TEST_MISSING}").unwrap();
        assert_eq!(out, "base_url: ${OPTLAB_TEST_MISSING}");
        assert!(has_unresolved_env_vars(&out));
    }
}

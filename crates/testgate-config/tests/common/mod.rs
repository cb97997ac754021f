// crates/testgate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for testgate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use testgate_config::ConfigError;
use testgate_config::RunConfig;
use testgate_config::SuiteConfig;

/// Parses a TOML string into a `SuiteConfig` without validating it.
pub fn suite_from_toml(toml_str: &str) -> Result<SuiteConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Parses a TOML string into a `RunConfig` without validating it.
pub fn run_from_toml(toml_str: &str) -> Result<RunConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Checks that validation failed with a message containing `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

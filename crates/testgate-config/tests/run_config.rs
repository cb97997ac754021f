//! Run configuration tests for testgate-config.
// crates/testgate-config/tests/run_config.rs
// =============================================================================
// Module: Run Config Tests
// Description: Validate run configuration parsing and platform matching.
// Purpose: Ensure run settings are validated before selection uses them.
// =============================================================================

use testgate_config::PlatformConfig;
use testgate_config::RunConfig;
use testgate_config::run_toml_example;
use testgate_core::TestStatus;

mod common;

type TestResult = Result<(), String>;

#[test]
fn example_run_config_validates() -> TestResult {
    let config = RunConfig::from_toml_str(&run_toml_example()).map_err(|err| err.to_string())?;
    if config.timeout_limit_secs != Some(600) {
        return Err("timeout limit".to_string());
    }
    if !config.prior_status.contains(&TestStatus::Failed) {
        return Err("prior status".to_string());
    }
    if config.platform.os != "linux" {
        return Err("platform".to_string());
    }
    Ok(())
}

#[test]
fn invalid_run_fields_are_rejected() -> TestResult {
    let mut config = common::run_from_toml("").map_err(|err| err.to_string())?;
    config.timeout_limit_secs = Some(0);
    common::assert_invalid(config.validate(), "timeout_limit_secs")?;

    let mut config = RunConfig::default();
    config.keywords = Some("manual &".to_string());
    common::assert_invalid(config.validate(), "keywords")?;

    let mut config = RunConfig::default();
    config.vm_options = vec![" ".to_string()];
    common::assert_invalid(config.validate(), "vm_options[0]")?;

    let mut config = RunConfig::default();
    config.platform.arch = "x-64".to_string();
    common::assert_invalid(config.validate(), "platform.arch")?;
    Ok(())
}

#[test]
fn platform_qualifiers_match_wildcards() -> TestResult {
    let platform = PlatformConfig {
        os: "linux".to_string(),
        arch: "x64".to_string(),
    };
    for qualifier in ["generic-all", "linux-all", "linux-x64", "generic-x64", "linux"] {
        if !platform.matches(qualifier) {
            return Err(format!("{qualifier} should match"));
        }
    }
    for qualifier in ["windows-all", "linux-aarch64", "macosx-x64"] {
        if platform.matches(qualifier) {
            return Err(format!("{qualifier} should not match"));
        }
    }
    Ok(())
}

#[test]
fn run_config_loads_from_disk() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("run.toml");
    std::fs::write(&path, "vm_options = [\"-Xcomp\"]\n").map_err(|err| err.to_string())?;
    let config = RunConfig::load(&path).map_err(|err| err.to_string())?;
    if config.vm_options != ["-Xcomp"] {
        return Err("vm options".to_string());
    }
    if config.platform != PlatformConfig::host() {
        return Err("platform defaults to host".to_string());
    }
    Ok(())
}

//! Suite configuration tests for testgate-config.
// crates/testgate-config/tests/suite_config.rs
// =============================================================================
// Module: Suite Config Tests
// Description: Validate suite defaults, loading, and field validation.
// Purpose: Ensure testgate.toml is parsed strictly and fails closed.
// =============================================================================

use std::path::PathBuf;

use testgate_config::CommentStyle;
use testgate_config::ConfigError;
use testgate_config::SuiteConfig;
use testgate_config::suite_toml_example;

mod common;

type TestResult = Result<(), String>;

#[test]
fn empty_suite_config_uses_defaults() -> TestResult {
    let config = common::suite_from_toml("").map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if !config.bug_validation {
        return Err("bug validation should default on".to_string());
    }
    if config.valid_keys().is_some() {
        return Err("no key set by default".to_string());
    }
    if !config.ignored_directory_names().contains("SCCS") {
        return Err("default ignored directories".to_string());
    }
    Ok(())
}

#[test]
fn example_suite_config_validates() -> TestResult {
    let config = SuiteConfig::from_toml_str(&suite_toml_example()).map_err(|err| err.to_string())?;
    if config.extensions.get("ksh") != Some(&CommentStyle::Shell) {
        return Err("extension override".to_string());
    }
    let groups = config.group_files();
    if groups.len() != 2 || groups[0].optional || !groups[1].optional {
        return Err(format!("group files: {groups:?}"));
    }
    if groups[1].path != PathBuf::from("closed/TEST.groups") {
        return Err("optional path unwrapped".to_string());
    }
    Ok(())
}

#[test]
fn keys_normalize_dashes() -> TestResult {
    let config = common::suite_from_toml(r#"keys = ["cte-test", "headful"]"#).map_err(|err| err.to_string())?;
    let keys = config.valid_keys().ok_or("keys configured")?;
    if !keys.contains("cte_test") || keys.contains("cte-test") {
        return Err(format!("normalized keys: {keys:?}"));
    }
    Ok(())
}

#[test]
fn invalid_fields_are_rejected_with_field_names() -> TestResult {
    let mut config = SuiteConfig::default();
    config.keys = Some(vec!["bad key".to_string()]);
    common::assert_invalid(config.validate(), "keys[0]")?;

    let mut config = SuiteConfig::default();
    config.requires_properties = vec!["vm..flavor".to_string()];
    common::assert_invalid(config.validate(), "requires_properties[0]")?;

    let mut config = SuiteConfig::default();
    config.groups = vec!["[TEST.groups".to_string()];
    common::assert_invalid(config.validate(), "groups[0] has unbalanced brackets")?;

    let mut config = SuiteConfig::default();
    config.testng_dirs = vec!["../outside".to_string()];
    common::assert_invalid(config.validate(), "testng_dirs[0] must not contain `..`")?;

    let mut config = SuiteConfig::default();
    config.testng_dirs = vec!["a".to_string()];
    config.junit_dirs = vec!["a/".to_string()];
    common::assert_invalid(config.validate(), "junit_dirs[0] is also a testng dir")?;

    let mut config = SuiteConfig::default();
    config.modules = vec!["java..base".to_string()];
    common::assert_invalid(config.validate(), "modules[0]")?;
    Ok(())
}

#[test]
fn unknown_comment_style_fails_to_parse() -> TestResult {
    match SuiteConfig::from_toml_str("[extensions]\nfoo = \"pascal\"\n") {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn load_reads_file_from_disk() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("testgate.toml");
    std::fs::write(&path, "keys = [\"headful\"]\n").map_err(|err| err.to_string())?;
    let config = SuiteConfig::load(Some(path.as_path())).map_err(|err| err.to_string())?;
    if config.keys != Some(vec!["headful".to_string()]) {
        return Err("keys loaded".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_oversized_and_non_utf8_files() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let big = dir.path().join("big.toml");
    std::fs::write(&big, vec![b'#'; 1024 * 1024 + 1]).map_err(|err| err.to_string())?;
    common::assert_invalid(SuiteConfig::load(Some(big.as_path())).map(|_| ()), "size limit")?;

    let binary = dir.path().join("binary.toml");
    std::fs::write(&binary, [0xff, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    common::assert_invalid(SuiteConfig::load(Some(binary.as_path())).map(|_| ()), "utf-8")?;

    let missing = dir.path().join("missing.toml");
    match SuiteConfig::load(Some(missing.as_path())) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

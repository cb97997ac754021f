// crates/testgate-core/tests/description.rs
// ============================================================================
// Module: Test Description Tests
// Description: Tests for URLs, parameter views, and serialization.
// Purpose: Validate the flat view report layers consume.
// Dependencies: testgate-core, serde_json
// ============================================================================

//! ## Overview
//! Exercises [`testgate_core::TestDescription`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use serde_json::Value;
use support::TestResult;
use support::ensure;
use testgate_core::Action;
use testgate_core::ModuleModifier;
use testgate_core::ModuleSpec;
use testgate_core::TestDescription;

/// Builds a populated description.
fn sample() -> TestDescription {
    let mut desc = TestDescription::new("/suite/lang/Foo.java", "lang/Foo.java", 3, Some("id1".to_string()));
    desc.title = "Checks foo".to_string();
    desc.run = vec![
        Action::new("build", "Foo", false),
        Action::parse("main/othervm Foo arg", true).unwrap(),
    ];
    desc.bugs = vec!["1234567".to_string()];
    desc.keywords = ["othervm", "bug1234567"].iter().map(ToString::to_string).collect();
    desc.modules = vec![ModuleSpec {
        module: "java.base".to_string(),
        package: Some("jdk.internal.misc".to_string()),
        modifiers: vec![ModuleModifier::Open],
    }];
    desc.max_timeout = 120;
    desc
}

/// Tests URLs combine the relative path and the id.
#[test]
fn url_includes_id_when_present() -> TestResult {
    ensure(sample().url == "lang/Foo.java#id1", "url with id")?;
    let single = TestDescription::new("/suite/lang/Bar.java", "lang/Bar.java", 1, None);
    ensure(single.url == "lang/Bar.java", "url without id")?;
    ensure(single.source == "Bar.java", "source defaults to file name")?;
    Ok(())
}

/// Tests the flat parameter view renders each field.
#[test]
fn parameter_view_renders_fields() -> TestResult {
    let desc = sample();
    ensure(desc.parameter("title").as_deref() == Some("Checks foo"), "title")?;
    ensure(desc.parameter("run").as_deref() == Some("build Foo\nmain/othervm Foo arg"), "run")?;
    ensure(desc.parameter("keywords").as_deref() == Some("bug1234567 othervm"), "keywords")?;
    ensure(desc.parameter("modules").as_deref() == Some("java.base/jdk.internal.misc:open"), "modules")?;
    ensure(desc.parameter("maxTimeout").as_deref() == Some("120"), "max timeout")?;
    ensure(desc.parameter("library").is_none(), "empty list absent")?;
    ensure(desc.parameter("requires").is_none(), "absent requires")?;
    ensure(desc.parameter("nonsense").is_none(), "unknown name")?;
    Ok(())
}

/// Tests descriptions serialize with camel-case field names.
#[test]
fn description_serializes_for_reports() -> TestResult {
    let json: Value = serde_json::to_value(sample())?;
    ensure(json["url"] == "lang/Foo.java#id1", "url")?;
    ensure(json["maxTimeout"] == 120, "camel case")?;
    ensure(json["run"][1]["userSpecified"] == Value::Null, "action fields keep snake case")?;
    ensure(json["run"][1]["user_specified"] == true, "user specified flag")?;
    Ok(())
}

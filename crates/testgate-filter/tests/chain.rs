// crates/testgate-filter/tests/chain.rs
// ============================================================================
// Module: Filter Chain Tests
// Description: Standard chain construction and selection.
// Purpose: Validate filter order, list loading, and fault reporting.
// Dependencies: testgate-filter, requires-logic, testgate-config, testgate-core, tempfile
// ============================================================================

//! ## Overview
//! Builds chains from [`testgate_config::RunConfig`] values and runs them over
//! small sets of descriptions.

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

use std::collections::BTreeSet;
use std::fs;

use requires_logic::Context;
use requires_logic::ContextBuilder;
use requires_logic::OsFacts;
use support::TestResult;
use support::ensure;
use support::test;
use support::with_keywords;
use testgate_config::PlatformConfig;
use testgate_config::RunConfig;
use testgate_core::DiagnosticKind;
use testgate_core::MemorySink;
use testgate_core::TestStatus;
use testgate_filter::ChainError;
use testgate_filter::FilterChain;
use testgate_filter::RunInputs;

fn linux_run() -> RunConfig {
    RunConfig {
        platform: PlatformConfig {
            os: "linux".to_string(),
            arch: "x64".to_string(),
        },
        ..RunConfig::default()
    }
}

#[test]
fn empty_run_keeps_modules_and_requires_only() -> TestResult {
    let chain = FilterChain::for_run(&linux_run(), RunInputs::default())?;
    ensure(chain.names() == ["modules", "requires"], format!("unexpected filters {:?}", chain.names()))?;
    ensure(chain.accepts(&test("A.java", None))?, "plain test accepted")
}

#[test]
fn full_run_orders_filters() -> TestResult {
    let dir = tempfile::tempdir()?;
    let excludes = dir.path().join("excludes.txt");
    let matches = dir.path().join("matches.txt");
    fs::write(&excludes, "a/Excluded.java 1234567 generic-all\n")?;
    fs::write(&matches, "a/Excluded.java\na/Kept.java\na/Manual.java\n")?;
    let run = RunConfig {
        timeout_limit_secs: Some(600),
        keywords: Some("!manual".to_string()),
        exclude_lists: vec![excludes],
        match_lists: vec![matches],
        prior_status: BTreeSet::from([TestStatus::NotRun]),
        ..linux_run()
    };
    let chain = FilterChain::for_run(&run, RunInputs::default())?;
    ensure(
        chain.names() == ["modules", "requires", "time_limit", "exclude_list", "match_list", "keyword", "prior_status"],
        format!("unexpected filters {:?}", chain.names()),
    )?;

    let tests = vec![
        test("a/Kept.java", None),
        test("a/Excluded.java", None),
        test("a/Unlisted.java", None),
        with_keywords("a/Manual.java", &["manual"]),
    ];
    let sink = MemorySink::new();
    let selection = chain.select(&tests, &sink);
    let accepted: Vec<&str> = selection.accepted.iter().map(|desc| desc.url.as_str()).collect();
    ensure(accepted == ["a/Kept.java"], format!("unexpected accepted {accepted:?}"))?;
    let rejected: Vec<(&str, &str)> = selection.rejected.iter().map(|r| (r.url.as_str(), r.filter)).collect();
    ensure(
        rejected == [("a/Excluded.java", "exclude_list"), ("a/Unlisted.java", "match_list"), ("a/Manual.java", "keyword")],
        format!("unexpected rejections {rejected:?}"),
    )?;
    ensure(sink.is_empty(), "no faults reported")
}

#[test]
fn requirement_faults_are_reported_not_rejected() -> TestResult {
    let mut context = Context::new();
    context.set_error("vm.gc", "VM exited");
    let inputs = RunInputs {
        context,
        ..RunInputs::default()
    };
    let chain = FilterChain::for_run(&linux_run(), inputs)?;
    let mut desc = test("Faulty.java", None);
    desc.requires = Some(r#"vm.gc == "Z""#.to_string());
    let sink = MemorySink::new();
    let selection = chain.select(&[desc], &sink);
    ensure(selection.accepted.len() == 1, "faulting test still selected")?;
    let faults = chain.requirement_faults()?;
    ensure(faults.contains_key("Faulty.java"), "fault recorded by url")?;
    let reported = sink.of_kind(DiagnosticKind::Filter);
    ensure(reported.len() == 1, "fault reported once")?;
    ensure(reported[0].url.as_deref() == Some("Faulty.java"), "diagnostic carries url")
}

#[test]
fn run_vm_options_reach_requirement_evaluation() -> TestResult {
    let run = RunConfig {
        vm_options: vec!["-XX:+UseG1GC".to_string(), "-Xcomp".to_string()],
        test_thread_factory: Some("Virtual".to_string()),
        ..linux_run()
    };
    let chain = FilterChain::for_run(&run, RunInputs::default())?;
    let mut g1 = test("G1.java", None);
    g1.requires = Some(r#"vm.gc == "G1" & vm.compMode == "Xcomp""#.to_string());
    let mut virtual_threads = test("Virtual.java", None);
    virtual_threads.requires = Some(r#"test.thread.factory == "Virtual""#.to_string());
    let mut serial = test("Serial.java", None);
    serial.requires = Some(r#"vm.gc == "Serial""#.to_string());
    let selection = chain.select(&[g1, virtual_threads, serial], &MemorySink::new());
    let accepted: Vec<&str> = selection.accepted.iter().map(|desc| desc.url.as_str()).collect();
    ensure(accepted == ["G1.java", "Virtual.java"], format!("unexpected accepted {accepted:?}"))?;
    ensure(selection.rejected.len() == 1 && selection.rejected[0].filter == "requires", "serial gc rejected")
}

#[test]
fn caller_facts_win_over_run_vm_options() -> TestResult {
    let run = RunConfig {
        vm_options: vec!["-XX:+UseG1GC".to_string()],
        ..linux_run()
    };
    let inputs = RunInputs {
        context: [("vm.gc", "Z")].into_iter().collect(),
        ..RunInputs::default()
    };
    let chain = FilterChain::for_run(&run, inputs)?;
    let mut desc = test("Z.java", None);
    desc.requires = Some(r#"vm.gc == "Z""#.to_string());
    ensure(chain.accepts(&desc)?, "caller-provided gc kept")
}

#[test]
fn run_inputs_build_context_from_run_config() -> TestResult {
    let run = RunConfig {
        vm_options: vec!["-XX:-TieredCompilation".to_string()],
        test_thread_factory: Some("Virtual".to_string()),
        ..linux_run()
    };
    let builder = ContextBuilder::new().jdk_version("21.0.1").os(OsFacts::new("Linux", "amd64", "6.1.0"));
    let inputs = RunInputs::for_run(&run, builder);
    ensure(inputs.context.value("vm.opt.TieredCompilation") == Some("false"), "vm option fact")?;
    ensure(inputs.context.value("test.thread.factory") == Some("Virtual"), "thread factory")?;
    ensure(inputs.context.value("jdk.version.major") == Some("21"), "builder facts kept")?;
    ensure(inputs.context.value("os.simpleArch") == Some("x64"), "os facts kept")
}

#[test]
fn keyword_ignores_surface_through_chain() -> TestResult {
    let run = RunConfig {
        keywords: Some("!ignore".to_string()),
        ..linux_run()
    };
    let chain = FilterChain::for_run(&run, RunInputs::default())?;
    let tests = vec![with_keywords("Skip.java", &["ignore"]), test("Run.java", None)];
    let selection = chain.select(&tests, &MemorySink::new());
    ensure(selection.accepted.len() == 1, "one accepted")?;
    ensure(chain.ignored_tests()? == BTreeSet::from(["Skip.java".to_string()]), "ignored test recorded")
}

#[test]
fn missing_list_file_fails_construction() -> TestResult {
    let run = RunConfig {
        exclude_lists: vec!["/nonexistent/testgate/excludes.txt".into()],
        ..linux_run()
    };
    ensure(matches!(FilterChain::for_run(&run, RunInputs::default()), Err(ChainError::Io { .. })), "io error")
}

// crates/testgate-tags/tests/scan.rs
// ============================================================================
// Module: Scanner Tests
// Description: End-to-end scanning of on-disk suites.
// Purpose: Validate ids, defaults, duplicates, and file-level failures.
// Dependencies: testgate-tags, testgate-config, testgate-core, tempfile
// ============================================================================

//! ## Overview
//! Builds small suites in a temporary directory and scans them.

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

use support::Suite;
use support::TestResult;
use support::ensure;
use testgate_config::SuiteConfig;
use testgate_core::DiagnosticKind;

// ============================================================================
// SECTION: Ids and URLs
// ============================================================================

#[test]
fn single_declaration_has_no_id() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write(
        "a/Single.java",
        "/*\n * @test\n * @bug 1234567 ABC-1234567\n * @summary Checks single. More text.\n */\npublic class Single {}\n",
    )?;
    let scanner = suite.scanner();
    let tests = scanner.scan_file(&path);
    ensure(tests.len() == 1, "one test expected")?;
    let test = &tests[0];
    ensure(test.id.is_none(), "single declaration must not get an id")?;
    ensure(test.url == "a/Single.java", format!("unexpected url {}", test.url))?;
    ensure(test.line == 1, "declaration line")?;
    ensure(test.title == "Checks single.", format!("unexpected title {}", test.title))?;
    ensure(test.bugs == ["1234567", "ABC-1234567"], "both bug forms accepted")?;
    ensure(test.keywords.contains("bug1234567"), "bug keyword derived")?;
    ensure(test.run.len() == 1 && test.run[0].to_string() == "main Single", "default main action")?;
    ensure(!test.run[0].user_specified, "default action is assumed")?;
    ensure(test.max_timeout == 0, "no declared timeout")?;
    ensure(test.error.is_none(), "no error expected")?;
    ensure(scanner.sink().is_empty(), "no diagnostics expected")
}

#[test]
fn multiple_declarations_get_ids_in_file_order() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write(
        "Multi.java",
        "/* @test */\n/* @test id=custom */\n/* not a test */\n/* @test */\nclass Multi {}\n",
    )?;
    let tests = suite.scanner().scan_file(&path);
    let ids: Vec<Option<&str>> = tests.iter().map(|test| test.id.as_deref()).collect();
    ensure(ids == [Some("id0"), Some("custom"), Some("id2")], format!("unexpected ids {ids:?}"))?;
    ensure(tests[1].url == "Multi.java#custom", "explicit id in url")?;
    ensure(tests[2].line == 4, "line of third declaration")
}

#[test]
fn synthetic_ids_skip_explicit_ones() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write("Q.java", "/* @test id=id1 */\n/* @test */\n/* @test */\n")?;
    let scanner = suite.scanner();
    let tests = scanner.scan_paths(&[path]);
    let urls: Vec<&str> = tests.iter().map(|test| test.url.as_str()).collect();
    ensure(urls == ["Q.java#id1", "Q.java#id2", "Q.java#id3"], format!("unexpected urls {urls:?}"))?;
    ensure(scanner.sink().of_kind(DiagnosticKind::Duplicate).is_empty(), "no duplicates reported")
}

#[test]
fn explicit_id_on_single_declaration_is_kept() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write("One.java", "/* @test id=only */\n")?;
    let tests = suite.scanner().scan_file(&path);
    ensure(tests.len() == 1 && tests[0].id.as_deref() == Some("only"), "explicit id kept")
}

#[test]
fn duplicate_urls_keep_first_declaration() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write("Dup.java", "/* @test id=x\n @summary first */\n/* @test id=x\n @summary second */\n")?;
    let scanner = suite.scanner();
    let tests = scanner.scan_paths(&[path]);
    ensure(tests.len() == 1, "duplicate dropped")?;
    ensure(tests[0].summary.as_deref() == Some("first"), "first declaration kept")?;
    let duplicates = scanner.sink().of_kind(DiagnosticKind::Duplicate);
    ensure(duplicates.len() == 1, "duplicate reported once")?;
    ensure(duplicates[0].url.as_deref() == Some("Dup.java#x"), "duplicate carries url")
}

// ============================================================================
// SECTION: File-Level Failures
// ============================================================================

#[test]
fn unknown_extension_is_reported_and_skipped() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write("notes.txt", "@test\n")?;
    let scanner = suite.scanner();
    ensure(scanner.scan_file(&path).is_empty(), "file skipped")?;
    let diagnostics = scanner.sink().diagnostics();
    ensure(diagnostics.len() == 1, "reported once")?;
    ensure(diagnostics[0].message.contains("no comment strategy"), "message names the problem")
}

#[test]
fn unreadable_file_is_reported_as_io() -> TestResult {
    let suite = Suite::new()?;
    let scanner = suite.scanner();
    ensure(scanner.scan_file(&suite.path("Missing.java")).is_empty(), "file skipped")?;
    ensure(scanner.sink().of_kind(DiagnosticKind::Io).len() == 1, "io diagnostic reported")
}

#[test]
fn file_outside_root_is_rejected() -> TestResult {
    let suite = Suite::new()?;
    let other = Suite::new()?;
    let path = other.write("Elsewhere.java", "/* @test */\n")?;
    let result = suite.scanner().try_scan_file(&path);
    ensure(matches!(result, Err(testgate_tags::ScanError::OutsideRoot { .. })), "outside root")
}

// ============================================================================
// SECTION: Defaults and Keywords
// ============================================================================

#[test]
fn default_actions_follow_extension() -> TestResult {
    let suite = Suite::new()?;
    let shell = suite.write("t/run.sh", "#!/bin/sh\n# @test\n# @summary shell test\necho hi\n")?;
    let applet = suite.write("t/page.html", "<html>\n<!-- @test -->\n</html>\n")?;
    let jasm = suite.write("t/Bytes.jasm", "/* @test */\n")?;
    let scanner = suite.scanner();

    let shell_tests = scanner.scan_file(&shell);
    ensure(shell_tests[0].run[0].to_string() == "shell run.sh", "shell default")?;
    ensure(shell_tests[0].keywords.contains("shell"), "shell keyword")?;

    let applet_tests = scanner.scan_file(&applet);
    ensure(applet_tests[0].run[0].to_string() == "applet page.html", "applet default")?;

    let jasm_tests = scanner.scan_file(&jasm);
    ensure(jasm_tests.len() == 1, "test still produced")?;
    ensure(
        jasm_tests[0].error.as_deref() == Some("no default action for Bytes.jasm"),
        format!("unexpected error {:?}", jasm_tests[0].error),
    )?;
    ensure(scanner.sink().of_kind(DiagnosticKind::Parse).len() == 1, "parse error reported")
}

#[test]
fn run_options_drive_keywords_and_timeout() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write(
        "T.java",
        "/*\n * @test\n * @build Helper\n * @run main/timeout=300 A\n * @run main/othervm/manual B\n */\n",
    )?;
    let tests = suite.scanner().scan_file(&path);
    let test = &tests[0];
    ensure(test.run.len() == 3, "all actions kept in order")?;
    ensure(test.run[0].name == "build", "build first")?;
    ensure(test.max_timeout == 300, format!("unexpected max timeout {}", test.max_timeout))?;
    ensure(test.keywords.contains("othervm") && test.keywords.contains("manual"), "option keywords")?;
    ensure(test.parameter("run").as_deref() == Some("build Helper\nmain/timeout=300 A\nmain/othervm/manual B"), "run view")
}

#[test]
fn repeated_library_and_requires_tags_combine() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write(
        "L.java",
        "/*\n * @test\n * @library /lib\n * @library ../share extra\n * @requires os.family == \"linux\"\n * @requires vm.gc == \"G1\"\n * @run main L\n */\n",
    )?;
    let tests = suite.scanner().scan_file(&path);
    let test = &tests[0];
    ensure(test.error.is_none(), format!("unexpected error {:?}", test.error))?;
    ensure(test.libraries == ["/lib", "../share", "extra"], format!("search order {:?}", test.libraries))?;
    ensure(
        test.requires.as_deref() == Some(r#"(os.family == "linux") & (vm.gc == "G1")"#),
        format!("unexpected requires {:?}", test.requires),
    )?;
    ensure(
        test.parameter("requires").as_deref() == Some(r#"(os.family == "linux") & (vm.gc == "G1")"#),
        "flat view carries the conjunction",
    )
}

#[test]
fn undeclared_timeouts_do_not_count() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write("P.java", "/* @test\n @run main P */\n")?;
    let tests = suite.scanner().scan_file(&path);
    ensure(tests[0].max_timeout == 0, format!("unexpected max timeout {}", tests[0].max_timeout))?;
    let mixed = suite.write("M.java", "/* @test\n @run main A\n @run main/timeout=45 B */\n")?;
    let tests = suite.scanner().scan_file(&mixed);
    ensure(tests[0].max_timeout == 45, format!("unexpected max timeout {}", tests[0].max_timeout))
}

#[test]
fn unlimited_timeout_wins() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write("T.java", "/* @test\n @run main/timeout=300 A\n @run main/timeout=0 B */\n")?;
    let tests = suite.scanner().scan_file(&path);
    ensure(tests[0].max_timeout == 0, "zero timeout means unlimited")
}

#[test]
fn runner_directories_default_to_runner_class() -> TestResult {
    let suite = Suite::new()?;
    let path = suite.write("ng/p/FooTest.java", "/* @test */\npackage p;\n")?;
    let config = SuiteConfig {
        testng_dirs: vec!["ng".to_string()],
        modules: vec!["java.base/jdk.internal.misc".to_string()],
        ..SuiteConfig::default()
    };
    let tests = suite.scanner_with(config).scan_file(&path);
    let test = &tests[0];
    ensure(test.run[0].to_string() == "testng p.FooTest", format!("unexpected run {}", test.run[0]))?;
    ensure(test.keywords.contains("testng"), "runner keyword")?;
    ensure(test.modules.len() == 1, "suite modules injected")
}

// ============================================================================
// SECTION: Suite Walk
// ============================================================================

#[test]
fn suite_walk_skips_ignored_directories_and_foreign_files() -> TestResult {
    let suite = Suite::new()?;
    suite.write("b/Second.java", "/* @test */\n")?;
    suite.write("a/First.java", "/* @test */\n")?;
    suite.write("SCCS/Hidden.java", "/* @test */\n")?;
    suite.write("a/README.txt", "@test\n")?;
    suite.write("a/Helper.java", "class Helper {}\n")?;
    let scanner = suite.scanner();
    let urls: Vec<String> = scanner.scan_suite().into_iter().map(|test| test.url).collect();
    ensure(urls == ["a/First.java", "b/Second.java"], format!("unexpected urls {urls:?}"))?;
    ensure(scanner.sink().is_empty(), "walk reports nothing")
}

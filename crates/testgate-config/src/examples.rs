// crates/testgate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical examples for suite and run configuration. Outputs are
//! deterministic and parse under the current validation rules.

/// Returns a canonical example `testgate.toml` suite configuration.
#[must_use]
pub fn suite_toml_example() -> String {
    String::from(
        r#"keys = ["cte_test", "headful", "intermittent", "randomness"]
requires_properties = ["vm.flavor", "vm.debug", "vm.cds"]
groups = ["TEST.groups", "[closed/TEST.groups]"]
modules = ["java.base"]
enable_preview = false
bug_validation = true
ignored_directories = ["SCCS", ".git"]
testng_dirs = ["java/util/stream"]
junit_dirs = ["jdk/internal/junit"]

[extensions]
jasm = "block"
ksh = "shell"

[directories."java/lang/invoke"]
modules = ["java.base/jdk.internal.misc"]
keys = ["randomness"]

[directories."java/lang/preview"]
enable_preview = true
"#,
    )
}

/// Returns a canonical example run configuration.
#[must_use]
pub fn run_toml_example() -> String {
    String::from(
        r#"timeout_limit_secs = 600
keywords = "!manual & !intermittent"
exclude_lists = ["ProblemList.txt"]
match_lists = []
prior_status = ["failed", "error"]
vm_options = ["-XX:+UseG1GC", "-Xmixed"]
test_thread_factory = "Virtual"

[platform]
os = "linux"
arch = "x64"
"#,
    )
}

// crates/requires-logic/src/platform.rs
// ============================================================================
// Module: Platform Context Builder
// Description: Populates an evaluation context from JDK, OS, and VM facts.
// Purpose: Turn collaborator-supplied raw facts into normalized properties.
// Dependencies: crate::context
// ============================================================================

//! ## Overview
//! [`ContextBuilder`] assembles a [`Context`] in a fixed order:
//! 1. the `null` constant;
//! 2. JDK system properties (values or recorded failures);
//! 3. `jdk.version` and `jdk.version.major`;
//! 4. OS facts, raw and normalized;
//! 5. the test thread factory name;
//! 6. facts derived from VM options.
//!
//! Steps 1-5 overwrite. Step 6 is first-set-wins: a fact already provided by
//! the JDK properties, or by an earlier option, is kept.

use std::collections::BTreeMap;

use crate::context::Context;
use crate::context::NULL_VALUE;

// ============================================================================
// SECTION: OS Facts
// ============================================================================

/// Operating-system facts for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsFacts {
    /// Raw OS name (`Linux`, `Windows 11`, `Mac OS X`).
    pub name: String,
    /// Raw architecture (`amd64`, `aarch64`).
    pub arch: String,
    /// Raw OS version (`5.15.0-91-generic`).
    pub version: String,
    /// Available processors.
    pub processors: Option<u64>,
    /// Physical memory in bytes.
    pub max_memory: Option<u64>,
    /// Swap space in bytes.
    pub max_swap: Option<u64>,
}

impl OsFacts {
    /// Creates facts from raw name, architecture, and version.
    #[must_use]
    pub fn new(name: impl Into<String>, arch: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: arch.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Normalized OS family: `linux`, `windows`, `mac`, `aix`, `solaris`, or
    /// the lowercased name.
    #[must_use]
    pub fn family(&self) -> String {
        let lower = self.name.to_ascii_lowercase();
        if lower.starts_with("windows") {
            "windows".to_string()
        } else if lower.starts_with("linux") {
            "linux".to_string()
        } else if lower.starts_with("mac") || lower.starts_with("darwin") {
            "mac".to_string()
        } else if lower.starts_with("aix") {
            "aix".to_string()
        } else if lower.starts_with("sunos") || lower.starts_with("solaris") {
            "solaris".to_string()
        } else {
            lower
        }
    }

    /// Normalized architecture: `x64`, `x86`, `aarch64`, or the raw value.
    #[must_use]
    pub fn simple_arch(&self) -> String {
        match self.arch.to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" | "x64" => "x64".to_string(),
            "i386" | "i486" | "i586" | "i686" | "x86" => "x86".to_string(),
            "arm64" | "aarch64" => "aarch64".to_string(),
            other => other.to_string(),
        }
    }

    /// First two numeric components of the version (`5.15`), or `0.0`.
    #[must_use]
    pub fn simple_version(&self) -> String {
        let mut parts = self
            .version
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| !part.is_empty())
            .take(2);
        let major = parts.next().unwrap_or("0");
        let minor = parts.next().unwrap_or("0");
        format!("{major}.{minor}")
    }
}

// ============================================================================
// SECTION: Context Builder
// ============================================================================

/// Builds a full evaluation context for one run configuration.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    /// JDK system properties; `Err` records a property that failed to resolve.
    jdk_properties: BTreeMap<String, Result<String, String>>,
    /// Raw JDK version string.
    jdk_version: Option<String>,
    /// OS facts.
    os: Option<OsFacts>,
    /// Test thread factory name.
    thread_factory: Option<String>,
    /// Effective VM options in command-line order.
    vm_options: Vec<String>,
}

impl ContextBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a JDK system property.
    #[must_use]
    pub fn jdk_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.jdk_properties.insert(name.into(), Ok(value.into()));
        self
    }

    /// Records a JDK property that could not be determined.
    #[must_use]
    pub fn jdk_property_error(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.jdk_properties.insert(name.into(), Err(reason.into()));
        self
    }

    /// Adds all properties from a map.
    #[must_use]
    pub fn jdk_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in properties {
            self.jdk_properties.insert(name.into(), Ok(value.into()));
        }
        self
    }

    /// Sets the raw JDK version string (`17.0.2`, `1.8.0_292`, `21-ea`).
    #[must_use]
    pub fn jdk_version(mut self, version: impl Into<String>) -> Self {
        self.jdk_version = Some(version.into());
        self
    }

    /// Sets the OS facts.
    #[must_use]
    pub fn os(mut self, os: OsFacts) -> Self {
        self.os = Some(os);
        self
    }

    /// Sets the test thread factory name.
    #[must_use]
    pub fn test_thread_factory(mut self, name: impl Into<String>) -> Self {
        self.thread_factory = Some(name.into());
        self
    }

    /// Appends effective VM options.
    #[must_use]
    pub fn vm_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vm_options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> Context {
        let mut ctx = Context::new();

        for (name, value) in self.jdk_properties {
            match value {
                Ok(value) => ctx.set(name, value),
                Err(reason) => ctx.set_error(name, reason),
            }
        }

        if let Some(version) = &self.jdk_version {
            ctx.set("jdk.version", version.clone());
            match major_version(version) {
                Some(major) => ctx.set("jdk.version.major", major.to_string()),
                None => ctx.set_error(
                    "jdk.version.major",
                    format!("cannot determine major version from {version}"),
                ),
            }
        }

        if let Some(os) = &self.os {
            ctx.set("os.name", os.name.clone());
            ctx.set("os.arch", os.arch.clone());
            ctx.set("os.simpleArch", os.simple_arch());
            ctx.set("os.version", os.version.clone());
            ctx.set("os.simpleVersion", os.simple_version());
            ctx.set("os.family", os.family());
            set_optional(&mut ctx, "os.processors", os.processors);
            set_optional(&mut ctx, "os.maxMemory", os.max_memory);
            set_optional(&mut ctx, "os.maxSwap", os.max_swap);
        }

        ctx.set(
            "test.thread.factory",
            self.thread_factory.unwrap_or_else(|| NULL_VALUE.to_string()),
        );

        apply_vm_options(&mut ctx, &self.vm_options);
        ctx
    }
}

/// Adds facts derived from VM options to an existing context, first-set-wins.
pub fn apply_vm_options<I, S>(ctx: &mut Context, options: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for option in options {
        apply_vm_option(ctx, option.as_ref());
    }
}

/// Stores a numeric fact, or `null` when unknown.
fn set_optional(ctx: &mut Context, name: &str, value: Option<u64>) {
    match value {
        Some(value) => ctx.set(name, value.to_string()),
        None => ctx.set(name, NULL_VALUE),
    }
}

/// Derives facts from one VM option, first-set-wins.
fn apply_vm_option(ctx: &mut Context, option: &str) {
    if let Some(gc) = option.strip_prefix("-XX:+Use").and_then(|rest| rest.strip_suffix("GC"))
        && is_flag_name(gc)
    {
        ctx.set_if_absent("vm.gc", gc);
        return;
    }
    if matches!(option, "-Xint" | "-Xmixed" | "-Xcomp") {
        ctx.set_if_absent("vm.compMode", &option[1 ..]);
        return;
    }
    let Some(rest) = option.strip_prefix("-XX:") else {
        return;
    };
    if let Some((name, value)) = rest.split_once('=') {
        if is_flag_name(name) {
            ctx.set_if_absent(format!("vm.opt.{name}"), value);
        }
        return;
    }
    let (enabled, name) = match rest.as_bytes().first() {
        Some(b'+') => (true, &rest[1 ..]),
        Some(b'-') => (false, &rest[1 ..]),
        _ => return,
    };
    if is_flag_name(name) {
        ctx.set_if_absent(format!("vm.opt.{name}"), if enabled { "true" } else { "false" });
    }
}

/// Returns true for `[A-Za-z0-9_]+`.
fn is_flag_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Extracts the feature release number: `17.0.2` → 17, `1.8.0_292` → 8.
#[must_use]
pub fn major_version(version: &str) -> Option<u32> {
    let mut numbers = version
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .map(str::parse::<u32>);
    let first = numbers.next()?.ok()?;
    if first == 1 {
        return numbers.next()?.ok();
    }
    Some(first)
}

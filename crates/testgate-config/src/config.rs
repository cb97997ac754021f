// crates/testgate-config/src/config.rs
// ============================================================================
// Module: Test Gate Configuration
// Description: Suite and run configuration loading and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: requires-logic, testgate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from TOML files with strict size and path limits.
//! [`SuiteConfig`] describes the suite itself (valid keys, extra requirement
//! property names, group files, defaults, per-directory overrides) and lives
//! at the suite root. [`RunConfig`] describes one selection run (time limit,
//! keyword expression, exclude and match lists, VM options, platform).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use requires_logic::parse_expr;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use testgate_core::TestStatus;
use thiserror::Error;

use crate::directory::DirectoryOverride;
use crate::directory::DirectoryProperties;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default suite configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "testgate.toml";
/// Environment variable overriding the suite configuration path.
pub const CONFIG_ENV_VAR: &str = "TESTGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Directory names skipped when no list is configured.
pub const DEFAULT_IGNORED_DIRECTORIES: &[&str] = &["SCCS", "RCS", "CVS", ".git", ".hg", ".svn"];

// ============================================================================
// SECTION: Comment Styles
// ============================================================================

/// Comment extraction style selected for a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// `/* ... */` block comments.
    Block,
    /// Runs of `#` line comments.
    Shell,
    /// `<!-- ... -->` comments.
    Html,
}

// ============================================================================
// SECTION: Suite Configuration
// ============================================================================

/// Suite-level configuration read from `testgate.toml`.
///
/// # Invariants
/// - `validate` has succeeded before the config is handed to other crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Valid `@key` tokens; `None` makes `@key` an unknown tag.
    #[serde(default)]
    pub keys: Option<Vec<String>>,
    /// Property names `@requires` may reference beyond the built-in set.
    #[serde(default)]
    pub requires_properties: Vec<String>,
    /// Group definition files; `[path]` marks an optional file.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Suite default `@modules` entries.
    #[serde(default)]
    pub modules: Vec<String>,
    /// Suite default for `@enablePreview`.
    #[serde(default)]
    pub enable_preview: bool,
    /// Whether `@bug` tokens are validated.
    #[serde(default = "default_true")]
    pub bug_validation: bool,
    /// Extension to comment-style overrides.
    #[serde(default)]
    pub extensions: BTreeMap<String, CommentStyle>,
    /// Directory names skipped during scans and group expansion.
    #[serde(default)]
    pub ignored_directories: Option<Vec<String>>,
    /// Root-relative directories whose tests default to the TestNG runner.
    #[serde(default)]
    pub testng_dirs: Vec<String>,
    /// Root-relative directories whose tests default to the JUnit runner.
    #[serde(default)]
    pub junit_dirs: Vec<String>,
    /// Per-directory overrides keyed by root-relative path.
    #[serde(default)]
    pub directories: BTreeMap<String, DirectoryOverride>,
}

/// One group definition file reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFileRef {
    /// Root-relative path to the file.
    pub path: PathBuf,
    /// True when a missing file is tolerated.
    pub optional: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            keys: None,
            requires_properties: Vec::new(),
            groups: Vec::new(),
            modules: Vec::new(),
            enable_preview: false,
            bug_validation: true,
            extensions: BTreeMap::new(),
            ignored_directories: None,
            testng_dirs: Vec::new(),
            junit_dirs: Vec::new(),
            directories: BTreeMap::new(),
        }
    }
}

impl SuiteConfig {
    /// Loads the suite configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let config: Self = load_document(&resolved)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(keys) = &self.keys {
            validate_keys("keys", keys)?;
        }
        for (index, name) in self.requires_properties.iter().enumerate() {
            if !is_property_name(name) {
                return Err(ConfigError::Invalid(format!(
                    "requires_properties[{index}] is not a property name: {name}"
                )));
            }
        }
        for (index, entry) in self.groups.iter().enumerate() {
            let field = format!("groups[{index}]");
            let (path, _) = split_optional(entry)
                .ok_or_else(|| ConfigError::Invalid(format!("{field} has unbalanced brackets")))?;
            validate_path_string(&field, path)?;
        }
        validate_modules("modules", &self.modules)?;
        for extension in self.extensions.keys() {
            let bare = extension.trim_start_matches('.');
            if bare.is_empty() || bare.contains(['/', '\\', '.']) {
                return Err(ConfigError::Invalid(format!("extensions key is not an extension: {extension}")));
            }
        }
        if let Some(ignored) = &self.ignored_directories {
            for (index, name) in ignored.iter().enumerate() {
                if name.trim().is_empty() || name.contains(['/', '\\']) {
                    return Err(ConfigError::Invalid(format!(
                        "ignored_directories[{index}] must be a single directory name"
                    )));
                }
            }
        }
        for (index, dir) in self.testng_dirs.iter().enumerate() {
            validate_relative_dir(&format!("testng_dirs[{index}]"), dir)?;
        }
        for (index, dir) in self.junit_dirs.iter().enumerate() {
            validate_relative_dir(&format!("junit_dirs[{index}]"), dir)?;
            if self.testng_dirs.iter().any(|other| normalize_dir(other) == normalize_dir(dir)) {
                return Err(ConfigError::Invalid(format!("junit_dirs[{index}] is also a testng dir: {dir}")));
            }
        }
        for (dir, overrides) in &self.directories {
            let field = format!("directories.\"{dir}\"");
            validate_relative_dir(&field, dir)?;
            overrides.validate(&field)?;
        }
        Ok(())
    }

    /// Returns the valid key set with `-` normalized to `_`, if configured.
    #[must_use]
    pub fn valid_keys(&self) -> Option<BTreeSet<String>> {
        self.keys.as_ref().map(|keys| keys.iter().map(|key| normalize_key(key)).collect())
    }

    /// Returns the group file references.
    #[must_use]
    pub fn group_files(&self) -> Vec<GroupFileRef> {
        self.groups
            .iter()
            .filter_map(|entry| split_optional(entry))
            .map(|(path, optional)| GroupFileRef {
                path: PathBuf::from(path.trim()),
                optional,
            })
            .collect()
    }

    /// Returns the ignored directory names.
    #[must_use]
    pub fn ignored_directory_names(&self) -> BTreeSet<String> {
        match &self.ignored_directories {
            Some(names) => names.iter().map(|name| name.trim().to_string()).collect(),
            None => DEFAULT_IGNORED_DIRECTORIES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Returns the override for a root-relative directory, if any.
    #[must_use]
    pub fn directory_override(&self, dir: &str) -> Option<&DirectoryOverride> {
        let wanted = normalize_dir(dir);
        self.directories.iter().find(|(key, _)| normalize_dir(key) == wanted).map(|(_, value)| value)
    }

    /// Resolves the properties for a root-relative directory.
    #[must_use]
    pub fn properties_for(&self, dir: &str) -> DirectoryProperties {
        let mut properties = DirectoryProperties::root(self);
        let normalized = normalize_dir(dir);
        let mut current = String::new();
        for component in normalized.split('/').filter(|component| !component.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(component);
            properties = properties.child(self, &current);
        }
        properties
    }
}

// ============================================================================
// SECTION: Run Configuration
// ============================================================================

/// Platform identity used for exclude-list qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Operating system label (`linux`, `windows`, `macosx`).
    pub os: String,
    /// Architecture label (`x64`, `aarch64`).
    pub arch: String,
}

impl PlatformConfig {
    /// Describes the host this process runs on.
    #[must_use]
    pub fn host() -> Self {
        let os = match env::consts::OS {
            "macos" => "macosx",
            other => other,
        };
        let arch = match env::consts::ARCH {
            "x86_64" => "x64",
            other => other,
        };
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// Returns true when an `os-arch` qualifier applies to this platform.
    #[must_use]
    pub fn matches(&self, qualifier: &str) -> bool {
        let qualifier = qualifier.trim();
        if qualifier == "generic-all" {
            return true;
        }
        let Some((os, arch)) = qualifier.split_once('-') else {
            return qualifier == self.os;
        };
        let os_matches = os == "generic" || os == self.os;
        let arch_matches = arch == "all" || arch == self.arch;
        os_matches && arch_matches
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::host()
    }
}

/// Configuration for one selection run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Largest acceptable declared timeout, in seconds.
    #[serde(default)]
    pub timeout_limit_secs: Option<u64>,
    /// Keyword expression, e.g. `!manual & !ignore`.
    #[serde(default)]
    pub keywords: Option<String>,
    /// Exclude list files.
    #[serde(default)]
    pub exclude_lists: Vec<PathBuf>,
    /// Match list files.
    #[serde(default)]
    pub match_lists: Vec<PathBuf>,
    /// Prior statuses a test must have to be selected.
    #[serde(default)]
    pub prior_status: BTreeSet<TestStatus>,
    /// Effective VM options.
    #[serde(default)]
    pub vm_options: Vec<String>,
    /// Test thread factory name.
    #[serde(default)]
    pub test_thread_factory: Option<String>,
    /// Target platform.
    #[serde(default)]
    pub platform: PlatformConfig,
}

impl RunConfig {
    /// Loads a run configuration from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let config: Self = load_document(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_limit_secs == Some(0) {
            return Err(ConfigError::Invalid("timeout_limit_secs must be greater than zero".to_string()));
        }
        if let Some(keywords) = &self.keywords {
            parse_expr(keywords).map_err(|err| ConfigError::Invalid(format!("keywords: {err}")))?;
        }
        for (index, path) in self.exclude_lists.iter().enumerate() {
            validate_path_string(&format!("exclude_lists[{index}]"), &path.to_string_lossy())?;
        }
        for (index, path) in self.match_lists.iter().enumerate() {
            validate_path_string(&format!("match_lists[{index}]"), &path.to_string_lossy())?;
        }
        for (index, option) in self.vm_options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("vm_options[{index}] must be non-empty")));
            }
        }
        for (field, value) in [("platform.os", &self.platform.os), ("platform.arch", &self.platform.arch)] {
            if value.is_empty() || value.contains(|c: char| c.is_whitespace() || c == '-' || c == ',') {
                return Err(ConfigError::Invalid(format!("{field} must be a single label")));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde default for boolean fields that default to on.
const fn default_true() -> bool {
    true
}

/// Resolves the suite config path from an explicit path, env var, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Reads and parses one TOML document under the size and encoding limits.
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    validate_path(path)?;
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content =
        std::str::from_utf8(&bytes).map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a suite-root-relative directory.
fn validate_relative_dir(field: &str, value: &str) -> Result<(), ConfigError> {
    validate_path_string(field, value)?;
    let path = Path::new(value.trim());
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {
                return Err(ConfigError::Invalid(format!("{field} must be relative to the suite root")));
            }
            Component::ParentDir => {
                return Err(ConfigError::Invalid(format!("{field} must not contain `..`")));
            }
        }
    }
    Ok(())
}

/// Validates a key list.
pub(crate) fn validate_keys(field: &str, keys: &[String]) -> Result<(), ConfigError> {
    for (index, key) in keys.iter().enumerate() {
        let valid = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(ConfigError::Invalid(format!("{field}[{index}] is not a valid key: {key}")));
        }
    }
    Ok(())
}

/// Validates suite default module entries at the shape level.
pub(crate) fn validate_modules(field: &str, modules: &[String]) -> Result<(), ConfigError> {
    for (index, module) in modules.iter().enumerate() {
        let name = module.split('/').next().unwrap_or_default();
        let valid = !name.is_empty()
            && name.split('.').all(|part| {
                !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
            });
        if !valid {
            return Err(ConfigError::Invalid(format!("{field}[{index}] is not a module entry: {module}")));
        }
    }
    Ok(())
}

/// Returns true for dotted property names such as `vm.flavor`.
fn is_property_name(name: &str) -> bool {
    name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        && name
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_'))
}

/// Splits `[path]` into the path and the optional flag.
fn split_optional(entry: &str) -> Option<(&str, bool)> {
    let trimmed = entry.trim();
    match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
        (Some(rest), true) => rest.strip_suffix(']').map(|path| (path, true)),
        (None, false) => Some((trimmed, false)),
        _ => None,
    }
}

/// Normalizes a key token: `-` becomes `_`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().replace('-', "_")
}

/// Normalizes a root-relative directory: forward slashes, no `./`, no trailing `/`.
#[must_use]
pub fn normalize_dir(dir: &str) -> String {
    dir.trim()
        .replace('\\', "/")
        .split('/')
        .filter(|component| !component.is_empty() && *component != ".")
        .collect::<Vec<_>>()
        .join("/")
}

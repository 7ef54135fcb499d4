//! Generator configuration and plugin parameter parsing

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::naming::{NamingContext, ReservedNames};

/// Package alias (Go) or crate name (Rust) of the runtime library.
pub const DEFAULT_RUNTIME_ALIAS: &str = "micro";

/// Go import path of the runtime library.
pub const DEFAULT_RUNTIME_IMPORT: &str = "github.com/plimble/micro";

/// Output language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    #[default]
    Go,
    Rust,
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "go" => Ok(Target::Go),
            "rust" | "rs" => Ok(Target::Rust),
            other => Err(Error::configuration(
                format!("unknown target '{}', expected 'go' or 'rust'", other),
                Some("target".to_string()),
            )),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Go => f.write_str("go"),
            Target::Rust => f.write_str("rust"),
        }
    }
}

/// What to do with methods that stream in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamingPolicy {
    /// Declare signatures and handler types, emit empty registration shells.
    #[default]
    Shell,
    /// Fail the run.
    Reject,
}

impl FromStr for StreamingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "shell" => Ok(StreamingPolicy::Shell),
            "reject" => Ok(StreamingPolicy::Reject),
            other => Err(Error::configuration(
                format!("unknown streaming policy '{}', expected 'shell' or 'reject'", other),
                Some("streaming".to_string()),
            )),
        }
    }
}

/// Everything a generation run needs besides the schema itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorConfig {
    pub target: Target,
    pub naming: NamingContext,
    pub runtime_import: String,
    pub import_prefix: String,
    pub streaming: StreamingPolicy,
    pub reserved: ReservedNames,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            naming: NamingContext::default(),
            runtime_import: DEFAULT_RUNTIME_IMPORT.to_string(),
            import_prefix: String::new(),
            streaming: StreamingPolicy::default(),
            reserved: ReservedNames::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse the protoc parameter string (`key=value,key=value`).
    ///
    /// Keys: `target`, `prefix`, `alias`, `runtime_import`, `import_prefix`,
    /// `streaming` and `reserved` (`+`-separated identifiers).
    pub fn from_parameter(parameter: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        let Some(parameter) = parameter else {
            return Ok(config);
        };

        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::configuration(
                    format!("parameter '{}' is not of the form key=value", pair),
                    Some(pair.to_string()),
                )
            })?;
            let value = value.trim();

            match key.trim() {
                "target" => config.target = value.parse()?,
                "prefix" => config.naming.subject_prefix = Some(value.to_string()),
                "alias" => {
                    if value.is_empty() {
                        return Err(Error::configuration(
                            "runtime alias must not be empty",
                            Some("alias".to_string()),
                        ));
                    }
                    config.naming.package_alias = value.to_string();
                }
                "runtime_import" => config.runtime_import = value.to_string(),
                "import_prefix" => config.import_prefix = value.to_string(),
                "streaming" => config.streaming = value.parse()?,
                "reserved" => {
                    for name in value.split('+').filter(|n| !n.is_empty()) {
                        config.reserved.insert(name);
                    }
                }
                other => {
                    return Err(Error::configuration(
                        format!("unknown parameter '{}'", other),
                        Some(other.to_string()),
                    ))
                }
            }
        }

        Ok(config)
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.naming.subject_prefix = Some(prefix.into());
        self
    }

    pub fn with_package_alias(mut self, alias: impl Into<String>) -> Self {
        self.naming.package_alias = alias.into();
        self
    }

    pub fn with_streaming(mut self, streaming: StreamingPolicy) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.reserved.insert(name);
        }
        self
    }

    /// Runtime import path with `import_prefix` joined in front.
    pub fn runtime_import_path(&self) -> String {
        join_import_path(&self.import_prefix, &self.runtime_import)
    }
}

/// `path.Join` for import paths, ignoring an empty prefix.
pub(crate) fn join_import_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", prefix, path.trim_start_matches('/'))
    }
}

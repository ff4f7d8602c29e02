//! Configuration type definitions

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, ProxyResult};

use super::loader::{self, ConfigWarning};

/// When stand-ins are (re)generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoGenerate {
    /// Never generate; generated files must already exist
    #[default]
    Never,
    /// Regenerate on every resolution
    Always,
    /// Generate when the file is absent
    FileNotExists,
    /// Define in-process, no file
    Eval,
    /// Generate when the file is absent or older than the type's source file
    FileNotExistsOrChanged,
}

impl AutoGenerate {
    pub const ALL: [AutoGenerate; 5] = [
        AutoGenerate::Never,
        AutoGenerate::Always,
        AutoGenerate::FileNotExists,
        AutoGenerate::Eval,
        AutoGenerate::FileNotExistsOrChanged,
    ];

    /// Numeric value used by integer configuration
    pub fn as_i64(self) -> i64 {
        match self {
            AutoGenerate::Never => 0,
            AutoGenerate::Always => 1,
            AutoGenerate::FileNotExists => 2,
            AutoGenerate::Eval => 3,
            AutoGenerate::FileNotExistsOrChanged => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AutoGenerate::Never => "never",
            AutoGenerate::Always => "always",
            AutoGenerate::FileNotExists => "file_not_exists",
            AutoGenerate::Eval => "eval",
            AutoGenerate::FileNotExistsOrChanged => "file_not_exists_or_changed",
        }
    }

    /// Modes that write stand-in files
    pub fn writes_files(self) -> bool {
        matches!(
            self,
            AutoGenerate::Always
                | AutoGenerate::FileNotExists
                | AutoGenerate::FileNotExistsOrChanged
        )
    }
}

impl fmt::Display for AutoGenerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for AutoGenerate {
    fn from(enabled: bool) -> Self {
        if enabled {
            AutoGenerate::Always
        } else {
            AutoGenerate::Never
        }
    }
}

impl TryFrom<i64> for AutoGenerate {
    type Error = ProxyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        AutoGenerate::ALL
            .into_iter()
            .find(|mode| mode.as_i64() == value)
            .ok_or_else(|| ProxyError::InvalidAutoGenerateMode {
                value: value.to_string(),
            })
    }
}

impl FromStr for AutoGenerate {
    type Err = ProxyError;

    /// Accepts mode names (`file-not-exists` or `file_not_exists`), their
    /// numeric values and `true`/`false`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");

        if let Ok(value) = normalized.parse::<i64>() {
            return AutoGenerate::try_from(value);
        }
        match normalized.as_str() {
            "true" => return Ok(AutoGenerate::Always),
            "false" => return Ok(AutoGenerate::Never),
            _ => {}
        }

        AutoGenerate::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ProxyError::InvalidAutoGenerateMode {
                value: s.to_string(),
            })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AutoGenerateDe {
    Flag(bool),
    Number(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for AutoGenerate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parsed = match AutoGenerateDe::deserialize(deserializer)? {
            AutoGenerateDe::Flag(enabled) => Ok(AutoGenerate::from(enabled)),
            AutoGenerateDe::Number(value) => AutoGenerate::try_from(value),
            AutoGenerateDe::Name(name) => name.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// `[proxy]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProxySection {
    /// Directory generated stand-ins are written to
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Namespace stand-in names are placed under
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub auto_generate: AutoGenerate,
}

/// `[mapping]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MappingConfig {
    /// Mapping file describing the documents
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub proxy: ProxySection,

    #[serde(default)]
    pub mapping: MappingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ProxyResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ProxyResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> ProxyResult<Self> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (DOCPROXY_* prefix)
    pub fn with_env_overrides(self) -> ProxyResult<Self> {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Validated settings for a `ProxyFactory`
    pub fn factory_config(&self) -> ProxyResult<ProxyConfig> {
        ProxyConfig::new(
            self.proxy.dir.clone().unwrap_or_default(),
            self.proxy.namespace.clone().unwrap_or_default(),
            self.proxy.auto_generate,
        )
    }
}

/// Validated proxy factory settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    dir: PathBuf,
    namespace: String,
    auto_generate: AutoGenerate,
}

impl ProxyConfig {
    /// Both the directory and the namespace are required
    pub fn new(
        dir: impl Into<PathBuf>,
        namespace: impl Into<String>,
        auto_generate: AutoGenerate,
    ) -> ProxyResult<Self> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            return Err(ProxyError::ProxyDirectoryRequired);
        }
        let namespace = namespace.into().trim().trim_matches(':').to_string();
        if namespace.is_empty() {
            return Err(ProxyError::ProxyNamespaceRequired);
        }

        Ok(Self {
            dir,
            namespace,
            auto_generate,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn auto_generate(&self) -> AutoGenerate {
        self.auto_generate
    }

    /// Same settings with another generation mode
    pub fn with_auto_generate(mut self, auto_generate: AutoGenerate) -> Self {
        self.auto_generate = auto_generate;
        self
    }
}

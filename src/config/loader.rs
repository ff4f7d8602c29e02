//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProxyError, ProxyResult};

use super::types::{AutoGenerate, Config};

/// Project configuration file name, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "docproxy.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ProxyResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ProxyError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults, then apply
/// environment overrides
pub fn load_or_default(project_root: Option<&Path>) -> ProxyResult<Config> {
    let candidates = project_root
        .map(|root| root.join(PROJECT_CONFIG_FILE))
        .into_iter()
        .chain(dirs_config_dir().map(|dir| dir.join("docproxy/config.toml")));

    for path in candidates {
        if path.exists() {
            let (config, warnings) = load_with_warnings(&path)?;
            for warning in &warnings {
                tracing::warn!(
                    key = %warning.key,
                    file = %warning.file.display(),
                    suggestion = ?warning.suggestion,
                    "unknown configuration key"
                );
            }
            return config.with_env_overrides();
        }
    }

    Config::default().with_env_overrides()
}

/// Apply DOCPROXY_* overrides read through `var`
pub fn with_env_overrides<F>(mut config: Config, var: F) -> ProxyResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // DOCPROXY_PROXY_DIR
    if let Some(dir) = var("DOCPROXY_PROXY_DIR").filter(|v| !v.is_empty()) {
        config.proxy.dir = Some(PathBuf::from(dir));
    }

    // DOCPROXY_PROXY_NAMESPACE
    if let Some(namespace) = var("DOCPROXY_PROXY_NAMESPACE").filter(|v| !v.is_empty()) {
        config.proxy.namespace = Some(namespace);
    }

    // DOCPROXY_AUTO_GENERATE
    if let Some(mode) = var("DOCPROXY_AUTO_GENERATE") {
        config.proxy.auto_generate = mode.parse::<AutoGenerate>()?;
    }

    // DOCPROXY_MAPPING
    if let Some(path) = var("DOCPROXY_MAPPING").filter(|v| !v.is_empty()) {
        config.mapping.path = Some(PathBuf::from(path));
    }

    Ok(config)
}

/// Get XDG config directory
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "proxy",
        "dir",
        "namespace",
        "auto_generate",
        "mapping",
        "path",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}

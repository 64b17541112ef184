use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::Configuration;
use crate::config::error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// Java-style properties (.properties): `=`, `:` or whitespace
    /// separators, backslash escapes and line continuations
    Properties,
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Properties => "properties",
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "properties" => Some(ConfigFormat::Properties),
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// An externally loaded `key -> value` mapping. Read-only once handed to the
/// orchestrator.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    values: Configuration,
    origin: Option<PathBuf>,
}

impl ConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            origin: None,
        }
    }

    /// Load a file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut source = Self::parse(&data, format)?;
        source.origin = Some(path.to_path_buf());
        log::debug!(
            "Loaded {} configuration keys from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    /// Parse configuration text. Structured formats are flattened: nested
    /// tables join their keys with `.`, scalars are stringified, arrays are
    /// joined with `,`.
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let values = match format {
            ConfigFormat::Properties => parse_properties(data)?,
            ConfigFormat::Json => {
                let tree: Value = serde_json::from_str(data).map_err(|e| ConfigError::Parse {
                    format: "JSON".to_string(),
                    message: e.to_string(),
                })?;
                flatten(&tree)
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                let tree: Value = serde_yaml::from_str(data).map_err(|e| ConfigError::Parse {
                    format: "YAML".to_string(),
                    message: e.to_string(),
                })?;
                flatten(&tree)
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                let tree: Value = toml::from_str(data).map_err(|e| ConfigError::Parse {
                    format: "TOML".to_string(),
                    message: e.to_string(),
                })?;
                flatten(&tree)
            }
        };
        Ok(Self {
            values,
            origin: None,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Merge with another source, its values overriding existing ones
    pub fn merge(&mut self, other: &ConfigSource) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn values(&self) -> &Configuration {
        &self.values
    }

    /// File this source was loaded from, if any
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_properties(data: &str) -> Result<Configuration, ConfigError> {
    let mut values = Configuration::new();
    let mut pending = String::new();
    let mut pending_start = 0;

    for (index, raw) in data.lines().enumerate() {
        let line = raw.trim_start();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }
        if pending.is_empty() {
            pending_start = index + 1;
        }

        if continues(line) {
            pending.push_str(&line[..line.len() - 1]);
            continue;
        }
        pending.push_str(line);

        let logical = std::mem::take(&mut pending);
        let (key, value) = split_entry(&logical);
        if key.is_empty() {
            return Err(ConfigError::MalformedLine {
                line: pending_start,
                content: logical,
            });
        }
        values.insert(key, value);
    }

    if !pending.is_empty() {
        return Err(ConfigError::MalformedLine {
            line: pending_start,
            content: pending,
        });
    }
    Ok(values)
}

/// An odd run of trailing backslashes escapes the line break.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line into key and value. The key ends at the first
/// unescaped `=`, `:` or whitespace; whitespace around a single `=`/`:` is
/// part of the separator. A line holding only a key maps it to `""`.
fn split_entry(logical: &str) -> (String, String) {
    let mut escaped = false;
    let mut end = logical.len();
    for (i, c) in logical.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            end = i;
            break;
        }
    }

    let rest = logical[end..].trim_start();
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim_start();
    (unescape(&logical[..end]), unescape(rest))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000c}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32);
                match decoded {
                    Some(ch) if hex.len() == 4 => {
                        out.push(ch);
                        chars.nth(3);
                    }
                    _ => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn flatten(tree: &Value) -> Configuration {
    let mut values = Configuration::new();
    flatten_into(None, tree, &mut values);
    values
}

fn flatten_into(prefix: Option<&str>, value: &Value, out: &mut Configuration) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full = match prefix {
                    Some(p) => format!("{}.{}", p, key),
                    None => key.clone(),
                };
                flatten_into(Some(&full), child, out);
            }
        }
        leaf => {
            if let Some(key) = prefix {
                out.insert(key.to_string(), scalar_to_string(leaf));
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for jobscope.
///
/// Allows users to save common inspection settings and reuse them across
/// runs. Configuration files are loaded from the current directory, the user
/// configuration directory, or a specified path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Treeherder server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Treeherder instance base URL
    #[serde(default = "default_server_base_url")]
    pub base_url: String,

    /// Default repository to inspect jobs in (e.g., 'autoland')
    pub project: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_server_base_url(),
            project: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            pretty: false,
        }
    }
}

fn default_server_base_url() -> String {
    "https://treeherder.mozilla.org".to_string()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (missing file is an error)
    /// 2. ./jobscope.toml
    /// 3. ./jobscope.json
    /// 4. ./jobscope.yaml
    /// 5. ./jobscope.yml
    /// 6. <config dir>/jobscope/config.toml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                return Self::load_from_path(&candidate);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = [
            "jobscope.toml",
            "jobscope.json",
            "jobscope.yaml",
            "jobscope.yml",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("jobscope").join("config.toml"));
        }
        candidates
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "https://treeherder.mozilla.org");
        assert_eq!(config.server.project, None);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config_without_extension_falls_back() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let toml_content = r#"
[server]
base-url = "https://treeherder.example.org"
project = "autoland"

[output]
format = "json"
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.server.base_url, "https://treeherder.example.org");
        assert_eq!(config.server.project, Some("autoland".to_string()));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "server": {
    "base-url": "https://treeherder.json.example",
    "project": "try"
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.server.base_url, "https://treeherder.json.example");
        assert_eq!(config.server.project, Some("try".to_string()));
        assert_eq!(config.output.format, OutputFormat::Summary);
    }

    #[test]
    fn test_load_with_explicit_missing_path_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/jobscope.toml")));

        assert!(result.is_err());
    }

    #[test]
    fn test_load_without_any_config_file_returns_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let config = Config::load(None).unwrap();

        std::env::set_current_dir(original_dir).unwrap();
        assert_eq!(config.server.base_url, "https://treeherder.mozilla.org");
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let config = Config {
            server: ServerConfig {
                base_url: "https://treeherder.example.org".to_string(),
                project: Some("mozilla-central".to_string()),
            },
            output: OutputConfig {
                format: OutputFormat::Json,
                pretty: true,
            },
        };

        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("treeherder.example.org"));
        assert!(toml.contains("mozilla-central"));
        assert!(toml.contains("pretty = true"));
    }
}

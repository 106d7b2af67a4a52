use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{CONFIG_FILENAME, CONFIG_FILENAME_ALT};
use crate::dimensions::{DimensionTable, Dimensions, SizeEntry};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for sitemend.
    pub sitemend: SitemendConfig,
    /// The path to the configuration file this was loaded from.
    /// `None` when using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for sitemend.
pub struct SitemendConfig {
    /// List of folders to exclude from file collection.
    pub exclude_folders: Option<Vec<String>>,
    /// Image dimension table configuration.
    #[serde(default)]
    pub images: ImagesConfig,
    /// CSP generation configuration.
    #[serde(default)]
    pub csp: CspConfig,
    /// Local server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration of the image dimension table.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ImagesConfig {
    /// Default width when no table entry or heuristic matches.
    pub default_width: Option<u32>,
    /// Default height when no table entry or heuristic matches.
    pub default_height: Option<u32>,
    /// Extra table entries; consulted before the built-in ones.
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
}

/// Configuration for CSP policy generation.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CspConfig {
    /// Extra origins appended to the generated `script-src` directive.
    #[serde(default)]
    pub extra_script_src: Vec<String>,
}

/// Configuration for the local static file server.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Port to bind (default 8000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory to serve; defaults to the current directory.
    pub root: Option<std::path::PathBuf>,
    /// Content-Security-Policy header override.
    pub csp: Option<String>,
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root: None,
            csp: None,
        }
    }
}

impl SitemendConfig {
    /// Build the dimension table for the attribute-completion rule:
    /// built-in entries extended (and overridable) by configured ones.
    #[must_use]
    pub fn dimension_table(&self) -> DimensionTable {
        let default = match (self.images.default_width, self.images.default_height) {
            (Some(w), Some(h)) => Some(Dimensions::new(w, h)),
            _ => None,
        };
        DimensionTable::builtin_extended(self.images.sizes.clone(), default)
    }
}

impl Config {
    /// Loads configuration from default locations in the current directory.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            for name in [CONFIG_FILENAME, CONFIG_FILENAME_ALT] {
                let candidate = current.join(name);
                if candidate.exists() {
                    if let Ok(content) = fs::read_to_string(&candidate) {
                        if let Ok(mut config) = toml::from_str::<Config>(&content) {
                            config.config_file_path = Some(candidate);
                            return config;
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.sitemend.exclude_folders.is_none());
        assert_eq!(config.sitemend.server.port, 8000);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_path_sitemend_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".sitemend.toml")).unwrap();
        writeln!(
            file,
            r#"[sitemend]
exclude_folders = ["dist"]

[sitemend.server]
port = 9000
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(
            config.sitemend.exclude_folders,
            Some(vec!["dist".to_owned()])
        );
        assert_eq!(config.sitemend.server.port, 9000);
        assert!(config.config_file_path.is_some());
    }

    #[test]
    fn test_load_from_path_traverses_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("site").join("pages");
        std::fs::create_dir_all(&nested).unwrap();

        let mut file = std::fs::File::create(dir.path().join("sitemend.toml")).unwrap();
        writeln!(
            file,
            r#"[sitemend.csp]
extra_script_src = ["https://cdn.example"]
"#
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(
            config.sitemend.csp.extra_script_src,
            vec!["https://cdn.example".to_owned()]
        );
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".sitemend.toml")).unwrap();
        writeln!(
            file,
            r#"[sitemend.images]
default_width = 120
default_height = 90
"#
        )
        .unwrap();

        let html_file = dir.path().join("index.html");
        std::fs::write(&html_file, "<html></html>").unwrap();

        let config = Config::load_from_path(&html_file);
        assert_eq!(config.sitemend.images.default_width, Some(120));
    }

    #[test]
    fn test_dimension_table_from_config() {
        let content = r#"[sitemend.images]
default_width = 100
default_height = 75

[[sitemend.images.sizes]]
match = "hero-banner"
width = 1200
height = 400
"#;
        let config = toml::from_str::<Config>(content).unwrap();
        let table = config.sitemend.dimension_table();
        let dims = table.lookup("hero-banner-v2.webp");
        assert_eq!((dims.width, dims.height), (1200, 400));
        let dims = table.lookup("unknown.webp");
        assert_eq!((dims.width, dims.height), (100, 75));
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::UmlsGraphError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub uts: UtsConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Terminology service (UTS REST API) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UtsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// ISO 639-3 code of the language related names must be in.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for UtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            language: default_language(),
        }
    }
}

/// Crawl defaults (the term box and depth slider of an interactive host)
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    #[serde(default = "default_term")]
    pub default_term: String,
    #[serde(default = "default_depth")]
    pub default_depth: usize,
    #[serde(default = "default_page_number")]
    pub page_number: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            default_term: default_term(),
            default_depth: default_depth(),
            page_number: default_page_number(),
        }
    }
}

/// Force-directed layout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            iterations: default_iterations(),
        }
    }
}

/// Artifact output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_relationships_file")]
    pub relationships_file: String,
    #[serde(default = "default_scene_file")]
    pub scene_file: String,
    /// Local plotly.js bundle to inline into the scene instead of the built-in viewer
    #[serde(default)]
    pub plotly_js: Option<PathBuf>,
    /// Load plotly.js from its CDN; the scene then needs network access to render
    #[serde(default)]
    pub plotly_cdn: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            relationships_file: default_relationships_file(),
            scene_file: default_scene_file(),
            plotly_js: None,
            plotly_cdn: false,
        }
    }
}

/// Inclusive range accepted for a user-chosen depth bound.
pub const DEPTH_RANGE: std::ops::RangeInclusive<usize> = 1..=5;

fn default_base_url() -> String {
    "https://uts-ws.nlm.nih.gov/rest".to_string()
}

fn default_api_key_env() -> String {
    "UMLS_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    2
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_term() -> String {
    "Age-related macular degeneration".to_string()
}

fn default_depth() -> usize {
    3
}

fn default_page_number() -> u32 {
    1
}

fn default_seed() -> u64 {
    42
}

fn default_iterations() -> usize {
    50
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_relationships_file() -> String {
    "relationships.txt".to_string()
}

fn default_scene_file() -> String {
    "3d_graph.html".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in UMLS_GRAPH_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (optional, defaults otherwise)
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var("UMLS_GRAPH_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    log::debug!("No config.toml found, using built-in defaults");
                    Config::default()
                }
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse a config file without consulting the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.uts.base_url)
            .with_context(|| format!("uts.base_url is not a valid URL: {}", self.uts.base_url))?;

        if self.uts.timeout_secs == 0 {
            anyhow::bail!("uts.timeout_secs must be greater than 0");
        }

        if whatlang::Lang::from_code(&self.uts.language).is_none() {
            anyhow::bail!(
                "uts.language must be an ISO 639-3 code known to the language detector, got {}",
                self.uts.language
            );
        }

        if !DEPTH_RANGE.contains(&self.crawl.default_depth) {
            anyhow::bail!(
                "crawl.default_depth must be between {} and {}",
                DEPTH_RANGE.start(),
                DEPTH_RANGE.end()
            );
        }

        if self.crawl.page_number == 0 {
            anyhow::bail!("crawl.page_number must be greater than 0");
        }

        if self.layout.iterations == 0 {
            anyhow::bail!("layout.iterations must be greater than 0");
        }

        Ok(())
    }

    /// Read the API key from the environment variable named by `uts.api_key_env`.
    ///
    /// A missing key is [`UmlsGraphError::ConfigMissing`]; callers must stop before crawling.
    pub fn api_key(&self) -> crate::Result<String> {
        match std::env::var(&self.uts.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(UmlsGraphError::ConfigMissing(format!(
                "Environment variable {} not set. Set it in your .env file or as an environment variable with your UTS API key.",
                self.uts.api_key_env
            ))),
        }
    }

    /// Path of the relationship listing artifact
    pub fn relationships_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.relationships_file)
    }

    /// Path of the 3D scene artifact
    pub fn scene_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.scene_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const TEST_CONFIG: &str = r#"
[uts]
base_url = "http://localhost:9999/rest"
api_key_env = "UMLS_GRAPH_TEST_KEY"
timeout_secs = 5

[crawl]
default_term = "Myocardial infarction"
default_depth = 2

[layout]
seed = 7
"#;

    fn with_env(config_path: Option<&Path>, api_key: Option<&str>, f: impl FnOnce()) {
        let original_config = std::env::var("UMLS_GRAPH_CONFIG").ok();
        let original_key = std::env::var("UMLS_GRAPH_TEST_KEY").ok();
        match config_path {
            Some(p) => std::env::set_var("UMLS_GRAPH_CONFIG", p),
            None => std::env::remove_var("UMLS_GRAPH_CONFIG"),
        }
        match api_key {
            Some(k) => std::env::set_var("UMLS_GRAPH_TEST_KEY", k),
            None => std::env::remove_var("UMLS_GRAPH_TEST_KEY"),
        }
        f();
        std::env::remove_var("UMLS_GRAPH_CONFIG");
        std::env::remove_var("UMLS_GRAPH_TEST_KEY");
        if let Some(val) = original_config {
            std::env::set_var("UMLS_GRAPH_CONFIG", val);
        }
        if let Some(val) = original_key {
            std::env::set_var("UMLS_GRAPH_TEST_KEY", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, TEST_CONFIG).unwrap();
        with_env(Some(&config_path), Some("secret"), || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.crawl.default_term, "Myocardial infarction");
            assert_eq!(config.crawl.default_depth, 2);
            assert_eq!(config.layout.seed, 7);
            // untouched sections fall back to defaults
            assert_eq!(config.layout.iterations, 50);
            assert_eq!(config.uts.language, "eng");
            assert_eq!(config.output.relationships_file, "relationships.txt");
            assert!(config.output.plotly_js.is_none());
            assert!(!config.output.plotly_cdn);
            assert_eq!(config.api_key().unwrap(), "secret");
        });
    }

    #[test]
    fn test_config_missing_api_key() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, TEST_CONFIG).unwrap();
        with_env(Some(&config_path), None, || {
            let config = Config::load().unwrap();
            let err = config.api_key().unwrap_err();
            assert!(matches!(err, UmlsGraphError::ConfigMissing(_)));
            assert!(err.to_string().contains("UMLS_GRAPH_TEST_KEY"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_env(Some(Path::new("nonexistent.toml")), None, || {
            assert!(Config::load().is_err());
        });
    }

    #[test]
    fn test_config_rejects_out_of_range_depth() {
        let mut config = Config::default();
        config.crawl.default_depth = 6;
        assert!(config.validate().is_err());
        config.crawl.default_depth = 0;
        assert!(config.validate().is_err());
        config.crawl.default_depth = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_unknown_language() {
        let mut config = Config::default();
        config.uts.language = "klingon".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.relationships_path(), PathBuf::from("./relationships.txt"));
        assert_eq!(config.scene_path(), PathBuf::from("./3d_graph.html"));
    }
}

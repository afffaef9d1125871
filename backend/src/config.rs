use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "config/rater.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub vertex: VertexConfig,
    pub rating: RatingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VertexConfig {
    pub project: String,
    pub location: String,
    pub model: String,
    /// Overrides the endpoint derived from `location`.
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub train_dir: PathBuf,
    pub test_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("static"),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project: "trycatch-project-465608".to_string(),
            location: "global".to_string(),
            model: "gemini-2.5-flash".to_string(),
            endpoint: None,
            access_token: None,
            timeout_secs: 120,
            max_concurrent_requests: 8,
        }
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            train_dir: PathBuf::from("train"),
            test_dir: PathBuf::from("test"),
        }
    }
}

impl AppConfig {
    /// Reads the YAML file named by `RATER_CONFIG` (or the default path), then
    /// applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("RATER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|name| env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config file at {}, using built-in defaults", path.display());
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BIND_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_value("PORT", port)?;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Some(limit) = lookup("MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = parse_value("MAX_UPLOAD_BYTES", limit)?;
        }
        if let Some(dir) = lookup("TRAIN_DIR") {
            self.rating.train_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("TEST_DIR") {
            self.rating.test_dir = PathBuf::from(dir);
        }
        if let Some(project) = lookup("VERTEX_PROJECT") {
            self.vertex.project = project;
        }
        if let Some(location) = lookup("VERTEX_LOCATION") {
            self.vertex.location = location;
        }
        if let Some(model) = lookup("VERTEX_MODEL") {
            self.vertex.model = model;
        }
        if let Some(endpoint) = lookup("VERTEX_ENDPOINT") {
            self.vertex.endpoint = Some(endpoint);
        }
        if let Some(token) = lookup("VERTEX_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.vertex.access_token = Some(token.trim().to_string());
        }
        if let Some(secs) = lookup("INFERENCE_TIMEOUT_SECS") {
            self.vertex.timeout_secs = parse_value("INFERENCE_TIMEOUT_SECS", secs)?;
        }
        if let Some(limit) = lookup("MAX_CONCURRENT_INFERENCES") {
            self.vertex.max_concurrent_requests = parse_value("MAX_CONCURRENT_INFERENCES", limit)?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.vertex.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_concurrent_requests",
                value: "0".to_string(),
            });
        }
        if self.vertex.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

impl VertexConfig {
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None if self.location == "global" => "https://aiplatform.googleapis.com".to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    pub fn stream_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:streamGenerateContent",
            self.base_url(),
            self.project,
            self.location,
            self.model
        ))?;
        url.query_pairs_mut().append_pair("alt", "sse");
        Ok(url)
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

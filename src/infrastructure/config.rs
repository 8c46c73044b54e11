use crate::application::mock_data::DEFAULT_SEED;
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "PROPERTY_INSIGHTS";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub classifier: ClassifierSettings,
    pub peers: PeerSettings,
    pub mock: MockSettings,
    pub cache: CacheSettings,
    pub debug: DebugSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound on a multipart request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClassifierSettings {
    pub enabled: bool,
    pub model_repo: String,
    pub weights_file: String,
    /// Local safetensors file; skips the hub download when set.
    pub weights_path: Option<PathBuf>,
    pub labels_path: PathBuf,
    pub labels_url: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model_repo: "timm/resnet18.a1_in1k".to_string(),
            weights_file: "model.safetensors".to_string(),
            weights_path: None,
            labels_path: PathBuf::from("imagenet_classes.txt"),
            labels_url: "https://raw.githubusercontent.com/pytorch/hub/master/imagenet_classes.txt"
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PeerSettings {
    /// Base URL of the report API; mock reports are served when unset or unreachable.
    pub report_api_url: Option<String>,
    pub report_api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            report_api_url: None,
            report_api_token: None,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MockSettings {
    pub seed: u64,
    pub report_count: usize,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            report_count: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DebugSettings {
    /// When set, accepted uploads are written here base64-encoded.
    pub dump_dir: Option<PathBuf>,
}

/// Layer `config/service.toml` (optional) under `PROPERTY_INSIGHTS__*`
/// environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/service")
}

pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

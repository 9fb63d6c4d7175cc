use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "KLADR";

/// 静态配置（从 TOML 加载，启动时使用，之后只读）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量
/// - index: 搜索索引地址与超时
/// - search: 分页大小、GeoIP 国家
/// - cors: 跨域设置
/// - logging: 日志配置
/// - app: 版本标签
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub app: AppConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：KLADR，分隔符：__
    /// 示例：KLADR__SERVER__PORT=9999
    pub fn try_load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<StaticConfig>()?)
    }

    /// Same as [`StaticConfig::try_load`] but falls back to defaults on error
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        match Self::try_load(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// Search index endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Locality (KLADR) index URL, without the `/_search` suffix
    #[serde(default = "default_kladr_url")]
    pub kladr_url: String,
    /// GeoIP range index URL
    #[serde(default = "default_geoip_url")]
    pub geoip_url: String,
    /// Global timeout of one outbound call, in seconds
    #[serde(default = "default_index_timeout")]
    pub timeout_secs: u64,
}

/// Query shaping constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size of the single-match endpoints
    #[serde(default = "default_single_page_size")]
    pub single_page_size: u32,
    /// Page size of the paginated `search` listing
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
    /// Country code the GeoIP ranges are restricted to
    #[serde(default = "default_geo_country")]
    pub geo_country: String,
}

/// 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_credentials")]
    pub allow_credentials: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reported by `/api/system/version`
    #[serde(default = "default_branch")]
    pub branch: String,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_kladr_url() -> String {
    "http://localhost:9200/kladr".to_string()
}

fn default_geoip_url() -> String {
    "http://localhost:9200/geoip".to_string()
}

fn default_index_timeout() -> u64 {
    5
}

fn default_single_page_size() -> u32 {
    15
}

fn default_list_page_size() -> u32 {
    30
}

fn default_geo_country() -> String {
    "RU".to_string()
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_credentials() -> bool {
    true
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_branch() -> String {
    "dev".to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            kladr_url: default_kladr_url(),
            geoip_url: default_geoip_url(),
            timeout_secs: default_index_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            single_page_size: default_single_page_size(),
            list_page_size: default_list_page_size(),
            geo_country: default_geo_country(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_cors_origins(),
            allow_credentials: default_cors_credentials(),
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            branch: default_branch(),
        }
    }
}

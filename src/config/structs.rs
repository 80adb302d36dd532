use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - auth: JWT 与令牌有效期
/// - social: 社交登录 provider 的 profile 接口地址
/// - verification: 手机验证码与激活链接配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub social: SocialConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：PP，分隔符：__
    /// 示例：PP__SERVER__PORT=9999
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    /// 从指定路径加载配置
    pub fn load_from(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 PP，分隔符 __
            .add_source(
                Environment::with_prefix("PP")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
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
    /// CORS 允许的来源，空表示仅同源
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 认证与令牌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT 签名密钥，为空时启动会生成随机值并告警
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: u64,
    /// 激活 / 密码重置令牌有效期（分钟）
    #[serde(default = "default_purpose_token_minutes")]
    pub purpose_token_minutes: u64,
}

/// 社交登录配置
///
/// 各 provider 的 profile 接口地址。登录端点用客户端传来的
/// access token 调这些接口换取用户资料。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialConfig {
    #[serde(default = "default_kakao_profile_url")]
    pub kakao_profile_url: String,
    #[serde(default = "default_naver_profile_url")]
    pub naver_profile_url: String,
    #[serde(default = "default_google_profile_url")]
    pub google_profile_url: String,
}

/// 手机验证码配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// 验证码有效期（秒）
    #[serde(default = "default_code_ttl_secs")]
    pub code_ttl_secs: u64,
    /// 激活链接的基础 URL（邮件里拼接 uid/token）
    #[serde(default = "default_activation_base_url")]
    pub activation_base_url: String,
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

fn default_database_url() -> String {
    "placepin.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_access_token_minutes() -> u64 {
    30
}

fn default_refresh_token_days() -> u64 {
    14
}

fn default_purpose_token_minutes() -> u64 {
    60
}

fn default_kakao_profile_url() -> String {
    "https://kapi.kakao.com/v2/user/me".to_string()
}

fn default_naver_profile_url() -> String {
    "https://openapi.naver.com/v1/nid/me".to_string()
}

fn default_google_profile_url() -> String {
    "https://www.googleapis.com/oauth2/v3/userinfo".to_string()
}

fn default_code_ttl_secs() -> u64 {
    300
}

fn default_activation_base_url() -> String {
    "http://127.0.0.1:8080/users/verify-email".to_string()
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
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
            refresh_token_days: default_refresh_token_days(),
            purpose_token_minutes: default_purpose_token_minutes(),
        }
    }
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            kakao_profile_url: default_kakao_profile_url(),
            naver_profile_url: default_naver_profile_url(),
            google_profile_url: default_google_profile_url(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: default_code_ttl_secs(),
            activation_base_url: default_activation_base_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = StaticConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.database_url, "placepin.db");
        assert_eq!(config.auth.access_token_minutes, 30);
        assert_eq!(config.auth.refresh_token_days, 14);
        assert_eq!(config.verification.code_ttl_secs, 300);
    }

    #[test]
    fn test_generate_sample_config_is_valid_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: Result<StaticConfig, _> = toml::from_str(&sample);
        assert!(parsed.is_ok(), "sample config should round-trip: {:?}", parsed.err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = StaticConfig::load_from("definitely-missing-config.toml");
        assert_eq!(config.server.port, 8080);
    }
}

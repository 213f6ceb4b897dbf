//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, MediaHostKind, StoreBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `COURSEWARE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `COURSEWARE_SERVER__PORT=9000`
/// - `COURSEWARE_DATABASE__BACKEND=memory`
/// - `COURSEWARE_MEDIA__TOKEN_SECRET=...`
///
/// 认证 token 是列表，只能写在配置文件中：
///
/// ```toml
/// [[auth.tokens]]
/// token = "AbC-Secret-9Z"
/// user_id = "user_1"
/// ```
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.backend", "sqlite")?
        .set_default("database.path", "data/courseware.db")?
        .set_default("database.max_connections", 5)?
        .set_default("media.kind", "http")?
        .set_default("media.base_url", "https://api.mux.com")?
        .set_default("media.timeout_secs", 30)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("COURSEWARE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.backend == StoreBackend::Sqlite {
        if config.database.path.is_empty() {
            return Err(ConfigError::ValidationError(
                "Database path cannot be empty".to_string(),
            ));
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "Database max_connections cannot be 0".to_string(),
            ));
        }
    }

    if config.media.kind == MediaHostKind::Http {
        let url = url::Url::parse(&config.media.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid media base_url: {}", e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(
                "Media base_url must be http or https".to_string(),
            ));
        }
        if config.media.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Media timeout cannot be 0".to_string(),
            ));
        }
    }

    if config
        .auth
        .tokens
        .iter()
        .any(|entry| entry.token.trim().is_empty() || entry.user_id.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "Auth tokens and user ids cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出任何凭证
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Store Backend: {:?}", config.database.backend);
    if config.database.backend == StoreBackend::Sqlite {
        tracing::info!("Database: {}", config.database.path);
        tracing::info!("Database Max Connections: {}", config.database.max_connections);
    }
    tracing::info!("Media Host: {:?}", config.media.kind);
    if config.media.kind == MediaHostKind::Http {
        tracing::info!("Media URL: {}", config.media.base_url);
        tracing::info!("Media Timeout: {}s", config.media.timeout_secs);
    }
    tracing::info!("Auth Tokens: {}", config.auth.tokens.len());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenEntry;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());

        // 内存后端不需要路径
        config.database.backend = StoreBackend::Memory;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_bad_media_url() {
        let mut config = AppConfig::default();
        config.media.base_url = "ftp://media.example.com".to_string();
        assert!(validate_config(&config).is_err());

        config.media.base_url = "not a url".to_string();
        assert!(validate_config(&config).is_err());

        config.media.kind = MediaHostKind::Fake;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_blank_token() {
        let mut config = AppConfig::default();
        config.auth.tokens.push(TokenEntry {
            token: "tok".to_string(),
            user_id: " ".to_string(),
        });
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9001

[database]
backend = "memory"

[media]
kind = "fake"

[[auth.tokens]]
token = "AbC-Secret-9Z"
user_id = "user_1"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.media.kind, MediaHostKind::Fake);
        // token 大小写原样保留
        assert_eq!(
            config.auth.tokens,
            vec![TokenEntry {
                token: "AbC-Secret-9Z".to_string(),
                user_id: "user_1".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = load_config_from_path(Some(Path::new("/nonexistent/courseware.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}

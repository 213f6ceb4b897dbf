//! HTTP Media Host - 调用外部视频托管服务（Mux 风格 REST API）
//!
//! 实现 MediaHostPort trait
//!
//! 外部 API:
//! POST   {base_url}/video/v1/assets          {"input": "...", "playback_policy": ["public"]}
//! DELETE {base_url}/video/v1/assets/{id}     204 / 404
//! 认证: HTTP Basic（token_id / token_secret）

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{MediaAsset, MediaError, MediaHostPort};

/// 创建资源请求体
#[derive(Debug, Serialize)]
struct CreateAssetRequest<'a> {
    input: &'a str,
    playback_policy: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    data: AssetData,
}

#[derive(Debug, Deserialize)]
struct AssetData {
    id: String,
    #[serde(default)]
    playback_ids: Vec<PlaybackId>,
}

#[derive(Debug, Deserialize)]
struct PlaybackId {
    id: String,
}

/// HTTP 媒体托管客户端配置
#[derive(Debug, Clone)]
pub struct HttpMediaHostConfig {
    /// 服务基础 URL
    pub base_url: String,
    pub token_id: String,
    pub token_secret: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpMediaHostConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mux.com".to_string(),
            token_id: String::new(),
            token_secret: String::new(),
            timeout_secs: 30,
        }
    }
}

impl HttpMediaHostConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, token_id: impl Into<String>, token_secret: impl Into<String>) -> Self {
        self.token_id = token_id.into();
        self.token_secret = token_secret.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 媒体托管客户端
pub struct HttpMediaHost {
    client: Client,
    config: HttpMediaHostConfig,
}

impl HttpMediaHost {
    pub fn new(config: HttpMediaHostConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MediaError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn assets_url(&self) -> String {
        format!("{}/video/v1/assets", self.config.base_url.trim_end_matches('/'))
    }

    fn asset_url(&self, asset_id: &str) -> String {
        format!("{}/{}", self.assets_url(), asset_id)
    }

    fn map_send_error(e: reqwest::Error) -> MediaError {
        if e.is_timeout() {
            MediaError::Timeout
        } else if e.is_connect() {
            MediaError::NetworkError(format!("Cannot connect to media host: {}", e))
        } else {
            MediaError::NetworkError(e.to_string())
        }
    }
}

#[async_trait]
impl MediaHostPort for HttpMediaHost {
    async fn create_asset(&self, input_url: &str) -> Result<MediaAsset, MediaError> {
        tracing::debug!(url = %self.assets_url(), input = %input_url, "Creating media asset");

        let response = self
            .client
            .post(self.assets_url())
            .basic_auth(&self.config.token_id, Some(&self.config.token_secret))
            .json(&CreateAssetRequest {
                input: input_url,
                playback_policy: ["public"],
            })
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MediaError::ServiceError(format!("HTTP {}: {}", status, error_text)));
        }

        let envelope: AssetEnvelope = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(format!("Failed to parse asset: {}", e)))?;

        let asset = MediaAsset {
            asset_id: envelope.data.id,
            playback_id: envelope.data.playback_ids.into_iter().next().map(|p| p.id),
        };

        tracing::info!(
            asset_id = %asset.asset_id,
            playback_id = ?asset.playback_id,
            "Media asset created"
        );

        Ok(asset)
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .delete(self.asset_url(asset_id))
            .basic_auth(&self.config.token_id, Some(&self.config.token_secret))
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(asset_id = %asset_id, "Media asset already gone");
            return Ok(());
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MediaError::ServiceError(format!("HTTP {}: {}", status, error_text)));
        }

        tracing::info!(asset_id = %asset_id, "Media asset deleted");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.assets_url())
            .basic_auth(&self.config.token_id, Some(&self.config.token_secret))
            .query(&[("limit", "1")])
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpMediaHostConfig::default();
        assert_eq!(config.base_url, "https://api.mux.com");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpMediaHostConfig::new("http://localhost:9000")
            .with_credentials("id", "secret")
            .with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.token_id, "id");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_asset_urls_ignore_trailing_slash() {
        let host = HttpMediaHost::new(HttpMediaHostConfig::new("http://localhost:9000/")).unwrap();
        assert_eq!(host.assets_url(), "http://localhost:9000/video/v1/assets");
        assert_eq!(host.asset_url("abc"), "http://localhost:9000/video/v1/assets/abc");
    }

    #[test]
    fn test_asset_envelope_parsing() {
        let json = r#"{"data":{"id":"a1","status":"preparing","playback_ids":[{"id":"p1","policy":"public"}]}}"#;
        let envelope: AssetEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.id, "a1");
        assert_eq!(envelope.data.playback_ids[0].id, "p1");

        let bare: AssetEnvelope = serde_json::from_str(r#"{"data":{"id":"a2"}}"#).unwrap();
        assert!(bare.data.playback_ids.is_empty());
    }
}

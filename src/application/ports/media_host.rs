//! Media Host Port - 视频托管服务抽象
//!
//! 定义远端视频资源的创建与删除，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 媒体托管错误
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 远端视频资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    /// 资源 ID（删除时使用）
    pub asset_id: String,
    /// 公开播放 ID
    pub playback_id: Option<String>,
}

/// Media Host Port
#[async_trait]
pub trait MediaHostPort: Send + Sync {
    /// 从可访问的视频地址创建托管资源
    async fn create_asset(&self, input_url: &str) -> Result<MediaAsset, MediaError>;

    /// 删除托管资源；资源已不存在时视为成功
    async fn delete_asset(&self, asset_id: &str) -> Result<(), MediaError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}

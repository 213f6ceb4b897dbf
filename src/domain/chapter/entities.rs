//! Chapter Context - Entities

use serde::{Deserialize, Serialize};

/// 视频编码元数据（与章节一对一，附加视频时创建）
///
/// 不变量:
/// - asset_id 指向媒体托管服务上的远端资源，不可为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAsset {
    /// 媒体托管服务上的资源 ID
    asset_id: String,
    /// 播放 ID（资源处理完成后才有）
    playback_id: Option<String>,
}

impl VideoAsset {
    pub fn new(asset_id: impl Into<String>, playback_id: Option<String>) -> Result<Self, &'static str> {
        let asset_id = asset_id.into();
        if asset_id.trim().is_empty() {
            return Err("资源 ID 不能为空");
        }
        Ok(Self {
            asset_id,
            playback_id: playback_id.filter(|p| !p.trim().is_empty()),
        })
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn playback_id(&self) -> Option<&str> {
        self.playback_id.as_deref()
    }
}

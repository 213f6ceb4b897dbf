//! Fake Media Host - 本地开发与测试用
//!
//! 在内存中记录资源，不调用外部服务；可注入失败

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ports::{MediaAsset, MediaError, MediaHostPort};

/// Fake Media Host 配置
#[derive(Debug, Clone)]
pub struct FakeMediaHostConfig {
    /// 模拟的请求延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeMediaHostConfig {
    fn default() -> Self {
        Self { latency_ms: 0 }
    }
}

/// Fake Media Host
pub struct FakeMediaHost {
    config: FakeMediaHostConfig,
    /// asset_id -> input url
    assets: DashMap<String, String>,
    fail_creates: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakeMediaHost {
    pub fn new(config: FakeMediaHostConfig) -> Self {
        tracing::info!(latency_ms = config.latency_ms, "FakeMediaHost initialized");
        Self {
            config,
            assets: DashMap::new(),
            fail_creates: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeMediaHostConfig::default())
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.contains_key(asset_id)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

#[async_trait]
impl MediaHostPort for FakeMediaHost {
    async fn create_asset(&self, input_url: &str) -> Result<MediaAsset, MediaError> {
        self.simulate_latency().await;

        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(MediaError::ServiceError("injected create failure".to_string()));
        }

        let asset_id = format!("fake-asset-{}", uuid::Uuid::new_v4().simple());
        let playback_id = format!("fake-play-{}", uuid::Uuid::new_v4().simple());
        self.assets.insert(asset_id.clone(), input_url.to_string());

        tracing::debug!(asset_id = %asset_id, input = %input_url, "FakeMediaHost: asset created");

        Ok(MediaAsset {
            asset_id,
            playback_id: Some(playback_id),
        })
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), MediaError> {
        self.simulate_latency().await;

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MediaError::ServiceError("injected delete failure".to_string()));
        }

        self.assets.remove(asset_id);
        tracing::debug!(asset_id = %asset_id, "FakeMediaHost: asset deleted");
        Ok(())
    }
}

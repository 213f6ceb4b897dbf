//! Event Publisher Implementation
//!
//! 章节生命周期事件通过全局 broadcast 通道推送给 WebSocket 订阅者，
//! 每条事件带课程所有者，订阅端只转发属于自己的事件

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::UserId;

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 章节已发布
    ChapterPublished { course_id: Uuid, chapter_id: Uuid },
    /// 章节已取消发布
    ChapterUnpublished { course_id: Uuid, chapter_id: Uuid },
    /// 编辑导致必填字段缺失，章节回到草稿
    ChapterRevertedToDraft { course_id: Uuid, chapter_id: Uuid },
    /// 章节已删除
    ChapterDeleted { course_id: Uuid, chapter_id: Uuid },
    /// 远端视频资源删除失败
    AssetOrphaned {
        chapter_id: Uuid,
        asset_id: String,
        error: String,
    },
    /// 课程已无发布章节，自动取消发布
    CourseUnpublished { course_id: Uuid },
}

/// 带所有者的事件
#[derive(Debug, Clone)]
pub struct OwnedEvent {
    pub owner_id: UserId,
    pub event: WsEvent,
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<OwnedEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅所有事件
    pub fn subscribe(&self) -> broadcast::Receiver<OwnedEvent> {
        self.channel.subscribe()
    }

    pub fn publish_chapter_published(&self, owner: &UserId, course_id: Uuid, chapter_id: Uuid) {
        self.publish(owner, WsEvent::ChapterPublished { course_id, chapter_id });
    }

    pub fn publish_chapter_unpublished(&self, owner: &UserId, course_id: Uuid, chapter_id: Uuid) {
        self.publish(owner, WsEvent::ChapterUnpublished { course_id, chapter_id });
    }

    pub fn publish_chapter_reverted(&self, owner: &UserId, course_id: Uuid, chapter_id: Uuid) {
        self.publish(owner, WsEvent::ChapterRevertedToDraft { course_id, chapter_id });
    }

    pub fn publish_chapter_deleted(&self, owner: &UserId, course_id: Uuid, chapter_id: Uuid) {
        self.publish(owner, WsEvent::ChapterDeleted { course_id, chapter_id });
    }

    pub fn publish_asset_orphaned(
        &self,
        owner: &UserId,
        chapter_id: Uuid,
        asset_id: &str,
        error: &str,
    ) {
        self.publish(
            owner,
            WsEvent::AssetOrphaned {
                chapter_id,
                asset_id: asset_id.to_string(),
                error: error.to_string(),
            },
        );
    }

    pub fn publish_course_unpublished(&self, owner: &UserId, course_id: Uuid) {
        self.publish(owner, WsEvent::CourseUnpublished { course_id });
    }

    fn publish(&self, owner: &UserId, event: WsEvent) {
        let owned = OwnedEvent {
            owner_id: owner.clone(),
            event,
        };
        if let Err(e) = self.channel.send(owned) {
            tracing::debug!(
                owner_id = %owner,
                error = %e,
                "Failed to publish event (no receivers)"
            );
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite / 内存）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Course Repository
// ============================================================================

/// 课程实体（用于持久化）
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course Repository Port
#[async_trait]
pub trait CourseRepositoryPort: Send + Sync {
    /// 保存课程
    async fn save(&self, course: &CourseRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找课程
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepositoryError>;

    /// 更新课程发布状态
    async fn set_published(&self, id: Uuid, is_published: bool) -> Result<(), RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub position: u32,
    pub is_free: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 视频资源元数据（与章节一对一）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAssetRecord {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub asset_id: String,
    pub playback_id: Option<String>,
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 插入或覆盖章节
    async fn save(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    /// 按课程 + 章节 ID 查找
    async fn find_chapter(
        &self,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 获取课程下所有章节（按 position 排序）
    async fn find_by_course(&self, course_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 课程内下一个可用的 position（从 1 开始）
    async fn next_position(&self, course_id: Uuid) -> Result<u32, RepositoryError>;

    /// 更新已存在的章节，不存在时返回 NotFound
    async fn update(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    /// 删除章节及其视频元数据（同一事务）
    async fn delete(&self, chapter_id: Uuid) -> Result<(), RepositoryError>;

    /// 获取章节的视频元数据
    async fn find_video_asset(
        &self,
        chapter_id: Uuid,
    ) -> Result<Option<VideoAssetRecord>, RepositoryError>;

    /// 更新章节并替换视频元数据（同一事务），返回被替换的旧记录
    async fn replace_video_asset(
        &self,
        chapter: &ChapterRecord,
        asset: &VideoAssetRecord,
    ) -> Result<Option<VideoAssetRecord>, RepositoryError>;

    /// 课程内已发布章节数
    async fn count_published(&self, course_id: Uuid) -> Result<usize, RepositoryError>;
}

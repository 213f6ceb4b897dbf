//! Application DTOs
//!
//! 命令与查询共用的响应结构，以及持久化记录与领域聚合之间的转换

use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRecord, CourseRecord, VideoAssetRecord};
use crate::domain::chapter::{
    Chapter, ChapterId, ChapterSnapshot, CompletionStatus, CourseId, VideoAsset,
};

// ============================================================================
// Responses
// ============================================================================

/// 课程响应
#[derive(Debug, Clone)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub is_published: bool,
    pub created_at: String,
}

impl From<CourseRecord> for CourseResponse {
    fn from(record: CourseRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            is_published: record.is_published,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// 视频元数据响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAssetResponse {
    pub asset_id: String,
    pub playback_id: Option<String>,
}

/// 章节响应
#[derive(Debug, Clone)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub position: u32,
    pub is_free: bool,
    pub is_published: bool,
    pub video_asset: Option<VideoAssetResponse>,
    pub completion: CompletionStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Chapter> for ChapterResponse {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: *chapter.id().as_uuid(),
            course_id: *chapter.course_id().as_uuid(),
            title: chapter.title().to_string(),
            description: chapter.description().map(str::to_string),
            video_url: chapter.video_url().map(|url| url.as_str().to_string()),
            position: chapter.position(),
            is_free: chapter.is_free(),
            is_published: chapter.is_published(),
            video_asset: chapter.video_asset().map(|asset| VideoAssetResponse {
                asset_id: asset.asset_id().to_string(),
                playback_id: asset.playback_id().map(str::to_string),
            }),
            completion: chapter.completion_status(),
            created_at: chapter.created_at().to_rfc3339(),
            updated_at: chapter.updated_at().to_rfc3339(),
        }
    }
}

/// 远端资源删除失败后遗留的孤儿资源，需要人工清理
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedAsset {
    pub asset_id: String,
    pub error: String,
}

// ============================================================================
// Record <-> Domain
// ============================================================================

/// 由章节记录和视频元数据重建聚合
pub(crate) fn chapter_from_records(
    record: ChapterRecord,
    asset: Option<VideoAssetRecord>,
) -> Result<Chapter, ApplicationError> {
    let video_asset = asset
        .map(|a| {
            VideoAsset::new(a.asset_id, a.playback_id).map_err(|e| {
                ApplicationError::internal(format!("Corrupt video asset for {}: {}", record.id, e))
            })
        })
        .transpose()?;

    Ok(Chapter::restore(ChapterSnapshot {
        id: ChapterId::from_uuid(record.id),
        course_id: CourseId::from_uuid(record.course_id),
        title: record.title,
        description: record.description,
        video_url: record.video_url,
        video_asset,
        position: record.position,
        is_free: record.is_free,
        is_published: record.is_published,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }))
}

pub(crate) fn chapter_to_record(chapter: &Chapter) -> ChapterRecord {
    ChapterRecord {
        id: *chapter.id().as_uuid(),
        course_id: *chapter.course_id().as_uuid(),
        title: chapter.title().to_string(),
        description: chapter.description().map(str::to_string),
        video_url: chapter.video_url().map(|url| url.as_str().to_string()),
        position: chapter.position(),
        is_free: chapter.is_free(),
        is_published: chapter.is_published(),
        created_at: chapter.created_at(),
        updated_at: chapter.updated_at(),
    }
}

pub(crate) fn asset_to_record(chapter_id: &ChapterId, asset: &VideoAsset) -> VideoAssetRecord {
    VideoAssetRecord {
        id: Uuid::new_v4(),
        chapter_id: *chapter_id.as_uuid(),
        asset_id: asset.asset_id().to_string(),
        playback_id: asset.playback_id().map(str::to_string),
    }
}

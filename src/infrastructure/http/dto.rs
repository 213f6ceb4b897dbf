//! Data Transfer Objects
//!
//! 统一响应信封，以及应用层响应到 JSON 的映射

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    AttachChapterVideoResponse, ChapterEditorView, ChapterResponse, CourseResponse,
    DeleteChapterResponse, OrphanedAsset, SetChapterPublishedResponse, UpdateChapterResponse,
};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub course_id: Uuid,
    pub title: String,
}

/// 定位一个章节（get / publish / unpublish / delete 共用）
#[derive(Debug, Deserialize)]
pub struct ChapterRef {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListChaptersRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_free: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AttachVideoRequest {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
    pub video_url: String,
}

// ============================================================================
// Course DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CourseDto {
    pub id: Uuid,
    pub title: String,
    pub is_published: bool,
    pub created_at: String,
}

impl From<CourseResponse> for CourseDto {
    fn from(course: CourseResponse) -> Self {
        Self {
            id: course.id,
            title: course.title,
            is_published: course.is_published,
            created_at: course.created_at,
        }
    }
}

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VideoAssetDto {
    pub asset_id: String,
    pub playback_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChapterDto {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub position: u32,
    pub is_free: bool,
    pub is_published: bool,
    pub video_asset: Option<VideoAssetDto>,
    pub completed_fields: usize,
    pub total_fields: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterResponse> for ChapterDto {
    fn from(chapter: ChapterResponse) -> Self {
        Self {
            id: chapter.id,
            course_id: chapter.course_id,
            title: chapter.title,
            description: chapter.description,
            video_url: chapter.video_url,
            position: chapter.position,
            is_free: chapter.is_free,
            is_published: chapter.is_published,
            video_asset: chapter.video_asset.map(|asset| VideoAssetDto {
                asset_id: asset.asset_id,
                playback_id: asset.playback_id,
            }),
            completed_fields: chapter.completion.completed,
            total_fields: chapter.completion.total,
            created_at: chapter.created_at,
            updated_at: chapter.updated_at,
        }
    }
}

/// 编辑页视图
#[derive(Debug, Serialize)]
pub struct ChapterEditorDto {
    pub chapter: ChapterDto,
    pub completion_text: String,
    pub can_publish: bool,
    pub missing_fields: Vec<&'static str>,
    pub show_draft_banner: bool,
}

impl From<ChapterEditorView> for ChapterEditorDto {
    fn from(view: ChapterEditorView) -> Self {
        Self {
            chapter: view.chapter.into(),
            completion_text: view.completion_text,
            can_publish: view.can_publish,
            missing_fields: view.missing_fields.iter().map(|f| f.as_str()).collect(),
            show_draft_banner: view.show_draft_banner,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterListDto {
    pub course_id: Uuid,
    pub total: usize,
    pub chapters: Vec<ChapterDto>,
}

#[derive(Debug, Serialize)]
pub struct OrphanedAssetDto {
    pub asset_id: String,
    pub error: String,
}

impl From<OrphanedAsset> for OrphanedAssetDto {
    fn from(orphan: OrphanedAsset) -> Self {
        Self {
            asset_id: orphan.asset_id,
            error: orphan.error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateChapterDto {
    pub chapter: ChapterDto,
    pub reverted_to_draft: bool,
    pub course_unpublished: bool,
}

impl From<UpdateChapterResponse> for UpdateChapterDto {
    fn from(result: UpdateChapterResponse) -> Self {
        Self {
            chapter: result.chapter.into(),
            reverted_to_draft: result.reverted_to_draft,
            course_unpublished: result.course_unpublished,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttachVideoDto {
    pub chapter: ChapterDto,
    pub replaced_asset: Option<String>,
    pub orphaned_asset: Option<OrphanedAssetDto>,
}

impl From<AttachChapterVideoResponse> for AttachVideoDto {
    fn from(result: AttachChapterVideoResponse) -> Self {
        Self {
            chapter: result.chapter.into(),
            replaced_asset: result.replaced_asset,
            orphaned_asset: result.orphaned_asset.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublishStateDto {
    pub chapter: ChapterDto,
    pub changed: bool,
    pub course_unpublished: bool,
}

impl From<SetChapterPublishedResponse> for PublishStateDto {
    fn from(result: SetChapterPublishedResponse) -> Self {
        Self {
            chapter: result.chapter.into(),
            changed: result.changed,
            course_unpublished: result.course_unpublished,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteChapterDto {
    pub chapter_id: Uuid,
    pub course_unpublished: bool,
    pub orphaned_asset: Option<OrphanedAssetDto>,
}

impl From<DeleteChapterResponse> for DeleteChapterDto {
    fn from(result: DeleteChapterResponse) -> Self {
        Self {
            chapter_id: result.chapter_id,
            course_unpublished: result.course_unpublished,
            orphaned_asset: result.orphaned_asset.map(Into::into),
        }
    }
}

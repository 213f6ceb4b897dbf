//! Chapter Command Handlers
//!
//! 章节编辑、发布和删除。所有处理器都显式接收调用者的 `AuthContext`

use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::{load_chapter, owned_course, unpublish_course_if_empty};
use crate::application::commands::{
    AttachChapterVideo, CreateChapter, DeleteChapter, SetChapterPublished, UpdateChapter,
};
use crate::application::dto::{asset_to_record, chapter_to_record, ChapterResponse, OrphanedAsset};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRepositoryPort, CourseRepositoryPort, MediaHostPort};
use crate::domain::chapter::{
    Chapter, ChapterError, ChapterTitle, CourseId, VideoAsset, VideoUrl,
};
use crate::domain::AuthContext;

/// 删除远端资源；失败只记录并返回孤儿信息，不影响本地状态
async fn delete_remote_asset(
    media_host: &dyn MediaHostPort,
    chapter_id: Uuid,
    asset_id: &str,
) -> Option<OrphanedAsset> {
    match media_host.delete_asset(asset_id).await {
        Ok(()) => {
            tracing::debug!(chapter_id = %chapter_id, asset_id = %asset_id, "Remote asset deleted");
            None
        }
        Err(e) => {
            tracing::warn!(
                chapter_id = %chapter_id,
                asset_id = %asset_id,
                error = %e,
                "Remote asset deletion failed, asset orphaned"
            );
            Some(OrphanedAsset {
                asset_id: asset_id.to_string(),
                error: e.to_string(),
            })
        }
    }
}

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
pub struct CreateChapterHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl CreateChapterHandler {
    pub fn new(
        course_repo: Arc<dyn CourseRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            course_repo,
            chapter_repo,
        }
    }

    pub async fn handle(
        &self,
        ctx: &AuthContext,
        command: CreateChapter,
    ) -> Result<ChapterResponse, ApplicationError> {
        let course = owned_course(self.course_repo.as_ref(), ctx, command.course_id).await?;

        let title = ChapterTitle::new(command.title)
            .map_err(|e| ChapterError::InvalidTitle(e.to_string()))?;
        let position = self.chapter_repo.next_position(course.id).await?;

        let chapter = Chapter::new(CourseId::from_uuid(course.id), title, position);
        self.chapter_repo.save(&chapter_to_record(&chapter)).await?;

        tracing::info!(
            course_id = %course.id,
            chapter_id = %chapter.id(),
            position = position,
            "Chapter created"
        );

        Ok(ChapterResponse::from(&chapter))
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// 编辑章节响应
#[derive(Debug, Clone)]
pub struct UpdateChapterResponse {
    pub chapter: ChapterResponse,
    /// 编辑导致必填字段缺失，已发布章节回到草稿
    pub reverted_to_draft: bool,
    pub course_unpublished: bool,
}

/// UpdateChapter Handler - 标题、描述、免费试看
pub struct UpdateChapterHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(
        course_repo: Arc<dyn CourseRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            course_repo,
            chapter_repo,
        }
    }

    pub async fn handle(
        &self,
        ctx: &AuthContext,
        command: UpdateChapter,
    ) -> Result<UpdateChapterResponse, ApplicationError> {
        if command.title.is_none() && command.description.is_none() && command.is_free.is_none() {
            return Err(ApplicationError::validation("Nothing to update"));
        }

        let course = owned_course(self.course_repo.as_ref(), ctx, command.course_id).await?;
        let mut chapter =
            load_chapter(self.chapter_repo.as_ref(), course.id, command.chapter_id).await?;

        if let Some(title) = command.title {
            let title =
                ChapterTitle::new(title).map_err(|e| ChapterError::InvalidTitle(e.to_string()))?;
            chapter.rename(title);
        }

        let mut reverted_to_draft = false;
        if let Some(description) = command.description {
            reverted_to_draft |= chapter.set_description(Some(description));
        }

        if let Some(is_free) = command.is_free {
            chapter.set_access(is_free);
        }

        self.chapter_repo.update(&chapter_to_record(&chapter)).await?;

        let course_unpublished = if reverted_to_draft {
            tracing::info!(
                chapter_id = %chapter.id(),
                "Chapter reverted to draft: required field cleared"
            );
            unpublish_course_if_empty(self.course_repo.as_ref(), self.chapter_repo.as_ref(), &course)
                .await
        } else {
            false
        };

        tracing::info!(chapter_id = %chapter.id(), "Chapter updated");

        Ok(UpdateChapterResponse {
            chapter: ChapterResponse::from(&chapter),
            reverted_to_draft,
            course_unpublished,
        })
    }
}

// ============================================================================
// AttachChapterVideo
// ============================================================================

/// 附加视频响应
#[derive(Debug, Clone)]
pub struct AttachChapterVideoResponse {
    pub chapter: ChapterResponse,
    /// 被替换掉的旧资源 ID
    pub replaced_asset: Option<String>,
    pub orphaned_asset: Option<OrphanedAsset>,
}

/// AttachChapterVideo Handler
///
/// 顺序: 远端创建新资源 -> 本地事务替换元数据 -> 远端删除旧资源
pub struct AttachChapterVideoHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    media_host: Arc<dyn MediaHostPort>,
}

impl AttachChapterVideoHandler {
    pub fn new(
        course_repo: Arc<dyn CourseRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        media_host: Arc<dyn MediaHostPort>,
    ) -> Self {
        Self {
            course_repo,
            chapter_repo,
            media_host,
        }
    }

    pub async fn handle(
        &self,
        ctx: &AuthContext,
        command: AttachChapterVideo,
    ) -> Result<AttachChapterVideoResponse, ApplicationError> {
        let video_url = parse_video_url(&command.video_url)?;

        let course = owned_course(self.course_repo.as_ref(), ctx, command.course_id).await?;
        let mut chapter =
            load_chapter(self.chapter_repo.as_ref(), course.id, command.chapter_id).await?;

        let created = self.media_host.create_asset(video_url.as_str()).await?;
        let asset = VideoAsset::new(created.asset_id.clone(), created.playback_id)
            .map_err(|e| ApplicationError::ExternalServiceError(e.to_string()))?;
        let asset_record = asset_to_record(chapter.id(), &asset);

        chapter.attach_video(video_url, asset);

        let previous = match self
            .chapter_repo
            .replace_video_asset(&chapter_to_record(&chapter), &asset_record)
            .await
        {
            Ok(previous) => previous,
            Err(e) => {
                // 本地未落库，新建的远端资源没有引用
                delete_remote_asset(self.media_host.as_ref(), command.chapter_id, &created.asset_id)
                    .await;
                return Err(e.into());
            }
        };

        let replaced_asset = previous.map(|p| p.asset_id);
        let orphaned_asset = match &replaced_asset {
            Some(old) if *old != created.asset_id => {
                delete_remote_asset(self.media_host.as_ref(), command.chapter_id, old).await
            }
            _ => None,
        };

        tracing::info!(
            chapter_id = %chapter.id(),
            asset_id = %created.asset_id,
            replaced = ?replaced_asset,
            "Chapter video attached"
        );

        Ok(AttachChapterVideoResponse {
            chapter: ChapterResponse::from(&chapter),
            replaced_asset,
            orphaned_asset,
        })
    }
}

fn parse_video_url(raw: &str) -> Result<VideoUrl, ApplicationError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| ChapterError::InvalidVideo(format!("{}: {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ChapterError::InvalidVideo(format!("unsupported scheme: {}", parsed.scheme())).into());
    }
    VideoUrl::new(parsed.as_str())
        .map_err(|e| ChapterError::InvalidVideo(e.to_string()).into())
}

// ============================================================================
// SetChapterPublished
// ============================================================================

/// 发布状态切换响应
#[derive(Debug, Clone)]
pub struct SetChapterPublishedResponse {
    pub chapter: ChapterResponse,
    /// 发布状态是否发生了变化（重复发布 / 撤下草稿为 false）
    pub changed: bool,
    pub course_unpublished: bool,
}

/// SetChapterPublished Handler
///
/// Draft -> Published 需要满足发布资格，否则返回 ValidationError 且不写库
pub struct SetChapterPublishedHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl SetChapterPublishedHandler {
    pub fn new(
        course_repo: Arc<dyn CourseRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            course_repo,
            chapter_repo,
        }
    }

    pub async fn handle(
        &self,
        ctx: &AuthContext,
        command: SetChapterPublished,
    ) -> Result<SetChapterPublishedResponse, ApplicationError> {
        let course = owned_course(self.course_repo.as_ref(), ctx, command.course_id).await?;
        let mut chapter =
            load_chapter(self.chapter_repo.as_ref(), course.id, command.chapter_id).await?;

        let was_published = chapter.is_published();
        if let Err(e) = chapter.set_published(command.published) {
            tracing::info!(
                chapter_id = %chapter.id(),
                error = %e,
                "Chapter publish rejected"
            );
            return Err(e.into());
        }

        if chapter.is_published() == was_published {
            tracing::debug!(
                chapter_id = %chapter.id(),
                state = chapter.publish_state().as_str(),
                "Chapter publish state unchanged"
            );
            return Ok(SetChapterPublishedResponse {
                chapter: ChapterResponse::from(&chapter),
                changed: false,
                course_unpublished: false,
            });
        }

        self.chapter_repo.update(&chapter_to_record(&chapter)).await?;

        let course_unpublished = if command.published {
            false
        } else {
            unpublish_course_if_empty(self.course_repo.as_ref(), self.chapter_repo.as_ref(), &course)
                .await
        };

        tracing::info!(
            chapter_id = %chapter.id(),
            state = chapter.publish_state().as_str(),
            "Chapter publish state changed"
        );

        Ok(SetChapterPublishedResponse {
            chapter: ChapterResponse::from(&chapter),
            changed: true,
            course_unpublished,
        })
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// 删除章节响应
#[derive(Debug, Clone)]
pub struct DeleteChapterResponse {
    pub chapter_id: Uuid,
    pub course_unpublished: bool,
    /// 远端资源删除失败时的孤儿资源
    pub orphaned_asset: Option<OrphanedAsset>,
}

/// DeleteChapter Handler
///
/// 先在同一事务中删除章节和视频元数据，再删除远端资源。
/// 远端删除失败不回滚本地删除
pub struct DeleteChapterHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    media_host: Arc<dyn MediaHostPort>,
}

impl DeleteChapterHandler {
    pub fn new(
        course_repo: Arc<dyn CourseRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        media_host: Arc<dyn MediaHostPort>,
    ) -> Self {
        Self {
            course_repo,
            chapter_repo,
            media_host,
        }
    }

    pub async fn handle(
        &self,
        ctx: &AuthContext,
        command: DeleteChapter,
    ) -> Result<DeleteChapterResponse, ApplicationError> {
        let chapter_id = command.chapter_id;
        let course = owned_course(self.course_repo.as_ref(), ctx, command.course_id).await?;

        let chapter = self
            .chapter_repo
            .find_chapter(course.id, chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;
        let asset = self.chapter_repo.find_video_asset(chapter_id).await?;

        self.chapter_repo.delete(chapter_id).await?;

        let orphaned_asset = match &asset {
            Some(asset) => {
                delete_remote_asset(self.media_host.as_ref(), chapter_id, &asset.asset_id).await
            }
            None => None,
        };

        let course_unpublished =
            unpublish_course_if_empty(self.course_repo.as_ref(), self.chapter_repo.as_ref(), &course)
                .await;

        tracing::info!(
            course_id = %course.id,
            chapter_id = %chapter_id,
            title = %chapter.title,
            was_published = chapter.is_published,
            "Chapter deleted"
        );

        Ok(DeleteChapterResponse {
            chapter_id,
            course_unpublished,
            orphaned_asset,
        })
    }
}

//! Chapter HTTP Handlers
//!
//! 命令成功后按结果发布事件；事件只发给课程所有者（即当前调用者）

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    AttachChapterVideo, CreateChapter, DeleteChapter, GetChapterEditor, ListCourseChapters,
    SetChapterPublished, UpdateChapter,
};
use crate::domain::AuthContext;
use crate::infrastructure::http::dto::{
    ApiResponse, AttachVideoDto, AttachVideoRequest, ChapterDto, ChapterEditorDto,
    ChapterListDto, ChapterRef, CreateChapterRequest, DeleteChapterDto, ListChaptersRequest,
    PublishStateDto, UpdateChapterDto, UpdateChapterRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequireAuth;
use crate::infrastructure::http::state::AppState;

/// 创建章节
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterDto>>, ApiError> {
    let chapter = state
        .create_chapter_handler
        .handle(
            &ctx,
            CreateChapter {
                course_id: req.course_id,
                title: req.title,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 章节编辑页
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<ChapterRef>,
) -> Result<Json<ApiResponse<ChapterEditorDto>>, ApiError> {
    let view = state
        .get_chapter_editor_handler
        .handle(
            &ctx,
            GetChapterEditor {
                course_id: req.course_id,
                chapter_id: req.chapter_id,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(view.into())))
}

/// 课程章节列表
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<ListChaptersRequest>,
) -> Result<Json<ApiResponse<ChapterListDto>>, ApiError> {
    let chapters = state
        .list_chapters_handler
        .handle(&ctx, ListCourseChapters { course_id: req.course_id })
        .await?;

    let chapters: Vec<ChapterDto> = chapters.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(ChapterListDto {
        course_id: req.course_id,
        total: chapters.len(),
        chapters,
    })))
}

/// 编辑章节
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<Json<ApiResponse<UpdateChapterDto>>, ApiError> {
    let result = state
        .update_chapter_handler
        .handle(
            &ctx,
            UpdateChapter {
                course_id: req.course_id,
                chapter_id: req.chapter_id,
                title: req.title,
                description: req.description,
                is_free: req.is_free,
            },
        )
        .await?;

    let owner = ctx.user_id();
    if result.reverted_to_draft {
        state
            .event_publisher
            .publish_chapter_reverted(owner, req.course_id, req.chapter_id);
    }
    if result.course_unpublished {
        state.event_publisher.publish_course_unpublished(owner, req.course_id);
    }

    Ok(Json(ApiResponse::success(result.into())))
}

/// 附加或替换视频
pub async fn attach_video(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<AttachVideoRequest>,
) -> Result<Json<ApiResponse<AttachVideoDto>>, ApiError> {
    let result = state
        .attach_video_handler
        .handle(
            &ctx,
            AttachChapterVideo {
                course_id: req.course_id,
                chapter_id: req.chapter_id,
                video_url: req.video_url,
            },
        )
        .await?;

    if let Some(orphan) = &result.orphaned_asset {
        state.event_publisher.publish_asset_orphaned(
            ctx.user_id(),
            req.chapter_id,
            &orphan.asset_id,
            &orphan.error,
        );
    }

    Ok(Json(ApiResponse::success(result.into())))
}

/// 发布章节
pub async fn publish_chapter(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<ChapterRef>,
) -> Result<Json<ApiResponse<PublishStateDto>>, ApiError> {
    set_published(&state, &ctx, req, true).await
}

/// 取消发布章节
pub async fn unpublish_chapter(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<ChapterRef>,
) -> Result<Json<ApiResponse<PublishStateDto>>, ApiError> {
    set_published(&state, &ctx, req, false).await
}

async fn set_published(
    state: &AppState,
    ctx: &AuthContext,
    req: ChapterRef,
    published: bool,
) -> Result<Json<ApiResponse<PublishStateDto>>, ApiError> {
    let result = state
        .set_published_handler
        .handle(
            ctx,
            SetChapterPublished {
                course_id: req.course_id,
                chapter_id: req.chapter_id,
                published,
            },
        )
        .await?;

    let owner = ctx.user_id();
    if result.changed && published {
        state
            .event_publisher
            .publish_chapter_published(owner, req.course_id, req.chapter_id);
    } else if result.changed {
        state
            .event_publisher
            .publish_chapter_unpublished(owner, req.course_id, req.chapter_id);
    }
    if result.course_unpublished {
        state.event_publisher.publish_course_unpublished(owner, req.course_id);
    }

    Ok(Json(ApiResponse::success(result.into())))
}

/// 删除章节
///
/// 远端视频删除失败不影响结果，孤儿资源在响应和事件中返回
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<ChapterRef>,
) -> Result<Json<ApiResponse<DeleteChapterDto>>, ApiError> {
    let result = state
        .delete_chapter_handler
        .handle(
            &ctx,
            DeleteChapter {
                course_id: req.course_id,
                chapter_id: req.chapter_id,
            },
        )
        .await?;

    let owner = ctx.user_id();
    state
        .event_publisher
        .publish_chapter_deleted(owner, req.course_id, result.chapter_id);
    if let Some(orphan) = &result.orphaned_asset {
        state.event_publisher.publish_asset_orphaned(
            owner,
            result.chapter_id,
            &orphan.asset_id,
            &orphan.error,
        );
    }
    if result.course_unpublished {
        state.event_publisher.publish_course_unpublished(owner, req.course_id);
    }

    Ok(Json(ApiResponse::success(result.into())))
}

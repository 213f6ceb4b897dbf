//! 访问控制与跨聚合规则
//!
//! - 课程只对其所有者可见，非所有者与不存在一样返回 NotFound
//! - 课程最后一个已发布章节被撤下或删除时，课程随之撤下

use uuid::Uuid;

use crate::application::dto::chapter_from_records;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRepositoryPort, CourseRecord, CourseRepositoryPort, RepositoryError,
};
use crate::domain::chapter::Chapter;
use crate::domain::AuthContext;

/// 加载调用者拥有的课程
pub(crate) async fn owned_course(
    course_repo: &dyn CourseRepositoryPort,
    ctx: &AuthContext,
    course_id: Uuid,
) -> Result<CourseRecord, ApplicationError> {
    let course = course_repo
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Course", course_id))?;

    if course.owner_id != ctx.user_id().as_str() {
        tracing::warn!(
            course_id = %course_id,
            user_id = %ctx.user_id(),
            "Course access denied for non-owner"
        );
        return Err(ApplicationError::not_found("Course", course_id));
    }

    Ok(course)
}

/// 加载章节聚合（含视频元数据）
pub(crate) async fn load_chapter(
    chapter_repo: &dyn ChapterRepositoryPort,
    course_id: Uuid,
    chapter_id: Uuid,
) -> Result<Chapter, ApplicationError> {
    let record = chapter_repo
        .find_chapter(course_id, chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;
    let asset = chapter_repo.find_video_asset(chapter_id).await?;

    chapter_from_records(record, asset)
}

/// 课程已无已发布章节时撤下课程，返回是否发生了撤下
///
/// 在章节改动提交之后调用，失败只记录 warn 并返回 false，不影响已完成的章节操作
pub(crate) async fn unpublish_course_if_empty(
    course_repo: &dyn CourseRepositoryPort,
    chapter_repo: &dyn ChapterRepositoryPort,
    course: &CourseRecord,
) -> bool {
    if !course.is_published {
        return false;
    }

    match try_unpublish_course(course_repo, chapter_repo, course.id).await {
        Ok(unpublished) => unpublished,
        Err(e) => {
            tracing::warn!(
                course_id = %course.id,
                error = %e,
                "Course follow-up failed, course left published"
            );
            false
        }
    }
}

async fn try_unpublish_course(
    course_repo: &dyn CourseRepositoryPort,
    chapter_repo: &dyn ChapterRepositoryPort,
    course_id: Uuid,
) -> Result<bool, RepositoryError> {
    if chapter_repo.count_published(course_id).await? > 0 {
        return Ok(false);
    }

    course_repo.set_published(course_id, false).await?;

    tracing::info!(
        course_id = %course_id,
        "Course unpublished: no published chapters left"
    );

    Ok(true)
}

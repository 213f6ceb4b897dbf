//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::access::{load_chapter, owned_course};
use crate::application::dto::{chapter_from_records, ChapterResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRepositoryPort, CourseRepositoryPort};
use crate::application::queries::{GetChapterEditor, ListCourseChapters};
use crate::domain::chapter::RequiredField;
use crate::domain::AuthContext;

// ============================================================================
// Response DTOs
// ============================================================================

/// 章节编辑页视图
#[derive(Debug, Clone)]
pub struct ChapterEditorView {
    pub chapter: ChapterResponse,
    /// "(n/m)"
    pub completion_text: String,
    /// 发布按钮是否可用：必填字段全部完成
    pub can_publish: bool,
    pub missing_fields: Vec<RequiredField>,
    /// 未发布时显示草稿提示
    pub show_draft_banner: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetChapterEditor Handler
pub struct GetChapterEditorHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterEditorHandler {
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
        query: GetChapterEditor,
    ) -> Result<ChapterEditorView, ApplicationError> {
        let course = owned_course(self.course_repo.as_ref(), ctx, query.course_id).await?;
        let chapter = load_chapter(self.chapter_repo.as_ref(), course.id, query.chapter_id).await?;

        let completion = chapter.completion_status();

        Ok(ChapterEditorView {
            completion_text: completion.text(),
            can_publish: completion.is_complete(),
            missing_fields: chapter.missing_fields(),
            show_draft_banner: !chapter.is_published(),
            chapter: ChapterResponse::from(&chapter),
        })
    }
}

/// ListCourseChapters Handler
pub struct ListCourseChaptersHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListCourseChaptersHandler {
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
        query: ListCourseChapters,
    ) -> Result<Vec<ChapterResponse>, ApplicationError> {
        let course = owned_course(self.course_repo.as_ref(), ctx, query.course_id).await?;
        let records = self.chapter_repo.find_by_course(course.id).await?;

        let mut chapters = Vec::with_capacity(records.len());
        for record in records {
            let asset = self.chapter_repo.find_video_asset(record.id).await?;
            let chapter = chapter_from_records(record, asset)?;
            chapters.push(ChapterResponse::from(&chapter));
        }

        Ok(chapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::application::ports::{ChapterRecord, CourseRecord};
    use crate::domain::UserId;
    use crate::infrastructure::memory::{InMemoryChapterRepository, InMemoryCourseRepository};

    async fn seed(
        description: Option<&str>,
        video_url: Option<&str>,
        is_published: bool,
    ) -> (
        Arc<InMemoryCourseRepository>,
        Arc<InMemoryChapterRepository>,
        Uuid,
        Uuid,
    ) {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let chapters = Arc::new(InMemoryChapterRepository::new());
        let now = Utc::now();
        let course_id = Uuid::new_v4();
        let chapter_id = Uuid::new_v4();

        courses
            .save(&CourseRecord {
                id: course_id,
                owner_id: "instructor_1".to_string(),
                title: "Rust 101".to_string(),
                is_published: false,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        chapters
            .save(&ChapterRecord {
                id: chapter_id,
                course_id,
                title: "Intro".to_string(),
                description: description.map(str::to_string),
                video_url: video_url.map(str::to_string),
                position: 1,
                is_free: false,
                is_published,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        (courses, chapters, course_id, chapter_id)
    }

    fn ctx() -> AuthContext {
        AuthContext::new(UserId::new("instructor_1").unwrap())
    }

    #[tokio::test]
    async fn test_editor_view_for_title_only_chapter() {
        let (courses, chapters, course_id, chapter_id) = seed(None, None, false).await;
        let handler = GetChapterEditorHandler::new(courses, chapters);

        let view = handler
            .handle(&ctx(), GetChapterEditor { course_id, chapter_id })
            .await
            .unwrap();

        assert_eq!(view.completion_text, "(1/3)");
        assert!(!view.can_publish);
        assert!(view.show_draft_banner);
        assert_eq!(
            view.missing_fields,
            vec![RequiredField::Description, RequiredField::VideoUrl]
        );
    }

    #[tokio::test]
    async fn test_editor_view_for_complete_published_chapter() {
        let (courses, chapters, course_id, chapter_id) =
            seed(Some("text"), Some("video-1"), true).await;
        let handler = GetChapterEditorHandler::new(courses, chapters);

        let view = handler
            .handle(&ctx(), GetChapterEditor { course_id, chapter_id })
            .await
            .unwrap();

        assert_eq!(view.completion_text, "(3/3)");
        assert!(view.can_publish);
        assert!(!view.show_draft_banner);
        assert!(view.missing_fields.is_empty());
    }

    #[tokio::test]
    async fn test_editor_view_for_chapter_in_other_course() {
        let (courses, chapters, _course_id, chapter_id) = seed(None, None, false).await;
        let now = Utc::now();
        let other_course = Uuid::new_v4();
        courses
            .save(&CourseRecord {
                id: other_course,
                owner_id: "instructor_1".to_string(),
                title: "Other".to_string(),
                is_published: false,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        let handler = GetChapterEditorHandler::new(courses, chapters);

        let err = handler
            .handle(
                &ctx(),
                GetChapterEditor {
                    course_id: other_course,
                    chapter_id,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::NotFound { resource_type: "Chapter", .. }
        ));
    }

    #[tokio::test]
    async fn test_list_course_chapters() {
        let (courses, chapters, course_id, _) = seed(None, None, false).await;
        let handler = ListCourseChaptersHandler::new(courses, chapters);

        let list = handler
            .handle(&ctx(), ListCourseChapters { course_id })
            .await
            .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Intro");
    }
}

//! Application State
//!
//! 端口与所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AttachChapterVideoHandler, CreateChapterHandler, CreateCourseHandler, DeleteChapterHandler,
    SetChapterPublishedHandler, UpdateChapterHandler,
    // Query handlers
    GetChapterEditorHandler, ListCourseChaptersHandler,
    // Ports
    AuthProviderPort, ChapterRepositoryPort, CourseRepositoryPort, MediaHostPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub course_repo: Arc<dyn CourseRepositoryPort>,
    pub chapter_repo: Arc<dyn ChapterRepositoryPort>,
    pub media_host: Arc<dyn MediaHostPort>,
    pub auth_provider: Arc<dyn AuthProviderPort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub create_course_handler: CreateCourseHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub attach_video_handler: AttachChapterVideoHandler,
    pub set_published_handler: SetChapterPublishedHandler,
    pub delete_chapter_handler: DeleteChapterHandler,

    // ========== Query Handlers ==========
    pub get_chapter_editor_handler: GetChapterEditorHandler,
    pub list_chapters_handler: ListCourseChaptersHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        course_repo: Arc<dyn CourseRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        media_host: Arc<dyn MediaHostPort>,
        auth_provider: Arc<dyn AuthProviderPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            // Ports
            course_repo: course_repo.clone(),
            chapter_repo: chapter_repo.clone(),
            media_host: media_host.clone(),
            auth_provider,
            event_publisher,

            // Command handlers
            create_course_handler: CreateCourseHandler::new(course_repo.clone()),
            create_chapter_handler: CreateChapterHandler::new(
                course_repo.clone(),
                chapter_repo.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(
                course_repo.clone(),
                chapter_repo.clone(),
            ),
            attach_video_handler: AttachChapterVideoHandler::new(
                course_repo.clone(),
                chapter_repo.clone(),
                media_host.clone(),
            ),
            set_published_handler: SetChapterPublishedHandler::new(
                course_repo.clone(),
                chapter_repo.clone(),
            ),
            delete_chapter_handler: DeleteChapterHandler::new(
                course_repo.clone(),
                chapter_repo.clone(),
                media_host,
            ),

            // Query handlers
            get_chapter_editor_handler: GetChapterEditorHandler::new(
                course_repo.clone(),
                chapter_repo.clone(),
            ),
            list_chapters_handler: ListCourseChaptersHandler::new(course_repo, chapter_repo),
        }
    }
}

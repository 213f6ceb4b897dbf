//! Chapter Queries

use uuid::Uuid;

/// 章节编辑页查询
#[derive(Debug, Clone)]
pub struct GetChapterEditor {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
}

/// 列出课程章节查询
#[derive(Debug, Clone)]
pub struct ListCourseChapters {
    pub course_id: Uuid,
}

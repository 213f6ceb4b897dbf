//! Chapter Commands

use uuid::Uuid;

/// 创建章节命令（追加到课程末尾）
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub course_id: Uuid,
    pub title: String,
}

/// 编辑章节命令
///
/// 只修改给出的字段；description 传空白表示清空
#[derive(Debug, Clone, Default)]
pub struct UpdateChapter {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_free: Option<bool>,
}

/// 附加/替换章节视频命令
#[derive(Debug, Clone)]
pub struct AttachChapterVideo {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
    pub video_url: String,
}

/// 发布/撤下章节命令
#[derive(Debug, Clone)]
pub struct SetChapterPublished {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
    pub published: bool,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub course_id: Uuid,
    pub chapter_id: Uuid,
}

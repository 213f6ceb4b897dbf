//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、MediaHost、AuthProvider）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - dto: 命令/查询共用的响应结构
//! - error: 应用层错误定义

mod access;

pub mod commands;
pub mod dto;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Course commands
    CreateCourse,
    // Chapter commands
    AttachChapterVideo,
    CreateChapter,
    DeleteChapter,
    SetChapterPublished,
    UpdateChapter,
    // Handlers
    handlers::{
        AttachChapterVideoHandler, AttachChapterVideoResponse, CreateChapterHandler,
        CreateCourseHandler, DeleteChapterHandler, DeleteChapterResponse,
        SetChapterPublishedHandler, SetChapterPublishedResponse, UpdateChapterHandler,
        UpdateChapterResponse,
    },
};

pub use dto::{ChapterResponse, CourseResponse, OrphanedAsset, VideoAssetResponse};
pub use error::ApplicationError;

pub use ports::{
    // Auth provider
    AuthError,
    AuthProviderPort,
    // Media host
    MediaAsset,
    MediaError,
    MediaHostPort,
    // Repositories
    ChapterRecord,
    ChapterRepositoryPort,
    CourseRecord,
    CourseRepositoryPort,
    RepositoryError,
    VideoAssetRecord,
};

pub use queries::{
    GetChapterEditor,
    ListCourseChapters,
    // Handlers
    handlers::{ChapterEditorView, GetChapterEditorHandler, ListCourseChaptersHandler},
};

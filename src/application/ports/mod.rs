//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod auth_provider;
mod media_host;
mod repositories;

pub use auth_provider::{AuthError, AuthProviderPort};
pub use media_host::{MediaAsset, MediaError, MediaHostPort};
pub use repositories::{
    ChapterRecord, ChapterRepositoryPort, CourseRecord, CourseRepositoryPort, RepositoryError,
    VideoAssetRecord,
};

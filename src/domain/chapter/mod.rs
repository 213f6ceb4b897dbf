//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节聚合管理
//! - 必填字段完成度与发布资格
//! - 发布状态机（Draft <-> Published）
//! - 视频资源元数据实体

mod aggregate;
mod entities;
mod errors;
mod policy;
mod value_objects;

pub use aggregate::{Chapter, ChapterSnapshot};
pub use entities::VideoAsset;
pub use errors::ChapterError;
pub use policy::{ChapterPublishPolicy, CompletionStatus, PublishState, RequiredField};
pub use value_objects::{ChapterId, ChapterTitle, CourseId, VideoUrl};

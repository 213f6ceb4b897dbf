//! Chapter Context - Errors

use thiserror::Error;

use super::RequiredField;

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("章节未完成，缺少必填字段: {}", join_fields(.missing))]
    Incomplete { missing: Vec<RequiredField> },

    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的视频: {0}")]
    InvalidVideo(String),
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

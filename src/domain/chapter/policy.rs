//! Chapter Context - Publish Policy
//!
//! 发布资格判定与发布状态机:
//! - 必填字段: title, description, video_url
//! - Draft -> Published: 仅当所有必填字段已填写
//! - Published -> Draft: 无条件

use serde::{Deserialize, Serialize};

use super::Chapter;

/// 必填字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Title,
    Description,
    VideoUrl,
}

impl RequiredField {
    /// 按声明顺序排列的全部必填字段
    pub const ALL: [RequiredField; 3] = [
        RequiredField::Title,
        RequiredField::Description,
        RequiredField::VideoUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Title => "title",
            RequiredField::Description => "description",
            RequiredField::VideoUrl => "video_url",
        }
    }

    /// 读取章节上对应字段的值，空白视为未填写
    pub fn value<'a>(&self, chapter: &'a Chapter) -> Option<&'a str> {
        let raw = match self {
            RequiredField::Title => Some(chapter.title()),
            RequiredField::Description => chapter.description(),
            RequiredField::VideoUrl => chapter.video_url().map(|url| url.as_str()),
        };
        raw.filter(|v| !v.trim().is_empty())
    }

    pub fn is_filled(&self, chapter: &Chapter) -> bool {
        self.value(chapter).is_some()
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 完成度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStatus {
    pub completed: usize,
    pub total: usize,
}

impl CompletionStatus {
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// 渲染为 "(n/m)"
    pub fn text(&self) -> String {
        format!("({}/{})", self.completed, self.total)
    }
}

/// 发布状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    #[default]
    Draft,
    Published,
}

impl PublishState {
    pub fn from_flag(is_published: bool) -> Self {
        if is_published {
            PublishState::Published
        } else {
            PublishState::Draft
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, PublishState::Published)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PublishState::Draft => "draft",
            PublishState::Published => "published",
        }
    }
}

/// 章节发布策略（纯函数，无副作用）
#[derive(Debug, Clone, Copy, Default)]
pub struct ChapterPublishPolicy;

impl ChapterPublishPolicy {
    pub fn completion_status(chapter: &Chapter) -> CompletionStatus {
        let completed = RequiredField::ALL
            .iter()
            .filter(|field| field.is_filled(chapter))
            .count();
        CompletionStatus {
            completed,
            total: RequiredField::ALL.len(),
        }
    }

    pub fn is_eligible_for_publish(chapter: &Chapter) -> bool {
        Self::completion_status(chapter).is_complete()
    }

    pub fn missing_fields(chapter: &Chapter) -> Vec<RequiredField> {
        RequiredField::ALL
            .iter()
            .copied()
            .filter(|field| !field.is_filled(chapter))
            .collect()
    }
}

//! Chapter Context - Aggregate Root

use chrono::{DateTime, Utc};

use super::{
    ChapterError, ChapterId, ChapterPublishPolicy, ChapterTitle, CompletionStatus, CourseId,
    PublishState, RequiredField, VideoAsset, VideoUrl,
};

/// 持久化快照，用于从存储层重建聚合
#[derive(Debug, Clone)]
pub struct ChapterSnapshot {
    pub id: ChapterId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub video_asset: Option<VideoAsset>,
    pub position: u32,
    pub is_free: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Chapter 聚合根
///
/// 不变量:
/// - 已发布的章节必须填写 title、description、video_url
/// - 编辑导致必填字段缺失时，已发布章节自动回到 Draft
/// - video_asset 只属于这一个章节
#[derive(Debug, Clone)]
pub struct Chapter {
    id: ChapterId,
    course_id: CourseId,
    title: String,
    description: Option<String>,
    video_url: Option<VideoUrl>,
    video_asset: Option<VideoAsset>,
    position: u32,
    is_free: bool,
    state: PublishState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Chapter {
    /// 创建新章节（初始为 Draft）
    pub fn new(course_id: CourseId, title: ChapterTitle, position: u32) -> Self {
        let now = Utc::now();
        Self {
            id: ChapterId::new(),
            course_id,
            title: title.as_str().to_string(),
            description: None,
            video_url: None,
            video_asset: None,
            position,
            is_free: false,
            state: PublishState::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// 从持久化快照重建
    ///
    /// 存储中的数据按原样恢复，空白描述和空白视频地址视为未填写
    /// 从快照重建；已发布但不完整的快照按 Draft 重建
    pub fn restore(snapshot: ChapterSnapshot) -> Self {
        let mut chapter = Self {
            id: snapshot.id,
            course_id: snapshot.course_id,
            title: snapshot.title,
            description: normalize_text(snapshot.description),
            video_url: snapshot.video_url.and_then(|url| VideoUrl::new(url).ok()),
            video_asset: snapshot.video_asset,
            position: snapshot.position,
            is_free: snapshot.is_free,
            state: PublishState::from_flag(snapshot.is_published),
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        };
        chapter.enforce_completion();
        chapter
    }

    pub fn rename(&mut self, title: ChapterTitle) {
        self.title = title.as_str().to_string();
        self.touch();
    }

    /// 设置描述，返回是否因此回到 Draft
    pub fn set_description(&mut self, description: Option<String>) -> bool {
        self.description = normalize_text(description);
        self.touch();
        self.enforce_completion()
    }

    /// 设置免费试看
    pub fn set_access(&mut self, is_free: bool) {
        self.is_free = is_free;
        self.touch();
    }

    /// 设置视频地址，返回是否因此回到 Draft
    pub fn set_video_url(&mut self, video_url: Option<VideoUrl>) -> bool {
        self.video_url = video_url;
        self.touch();
        self.enforce_completion()
    }

    /// 附加新视频，返回被替换的旧资源（需要调用方清理远端）
    pub fn attach_video(&mut self, video_url: VideoUrl, asset: VideoAsset) -> Option<VideoAsset> {
        self.video_url = Some(video_url);
        self.touch();
        self.video_asset.replace(asset)
    }

    /// Draft -> Published，要求所有必填字段已填写
    pub fn publish(&mut self) -> Result<(), ChapterError> {
        if self.state.is_published() {
            return Ok(());
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ChapterError::Incomplete { missing });
        }
        self.state = PublishState::Published;
        self.touch();
        Ok(())
    }

    /// Published -> Draft，无条件
    pub fn unpublish(&mut self) {
        if self.state.is_published() {
            self.state = PublishState::Draft;
            self.touch();
        }
    }

    pub fn set_published(&mut self, published: bool) -> Result<(), ChapterError> {
        if published {
            self.publish()
        } else {
            self.unpublish();
            Ok(())
        }
    }

    fn enforce_completion(&mut self) -> bool {
        if self.state.is_published() && !ChapterPublishPolicy::is_eligible_for_publish(self) {
            self.state = PublishState::Draft;
            return true;
        }
        false
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn video_url(&self) -> Option<&VideoUrl> {
        self.video_url.as_ref()
    }

    pub fn video_asset(&self) -> Option<&VideoAsset> {
        self.video_asset.as_ref()
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn is_free(&self) -> bool {
        self.is_free
    }

    pub fn publish_state(&self) -> PublishState {
        self.state
    }

    pub fn is_published(&self) -> bool {
        self.state.is_published()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn completion_status(&self) -> CompletionStatus {
        ChapterPublishPolicy::completion_status(self)
    }

    pub fn is_eligible_for_publish(&self) -> bool {
        ChapterPublishPolicy::is_eligible_for_publish(self)
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        ChapterPublishPolicy::missing_fields(self)
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Chapter {
        Chapter::new(CourseId::new(), ChapterTitle::new("Intro").unwrap(), 1)
    }

    fn complete() -> Chapter {
        let mut chapter = draft();
        chapter.set_description(Some("text".to_string()));
        chapter.set_video_url(Some(VideoUrl::new("video-1").unwrap()));
        chapter
    }

    #[test]
    fn test_new_chapter_is_draft() {
        let chapter = draft();
        assert_eq!(chapter.publish_state(), PublishState::Draft);
        assert!(!chapter.is_free());
        assert_eq!(chapter.position(), 1);
    }

    #[test]
    fn test_publish_incomplete_fails_and_keeps_draft() {
        let mut chapter = draft();
        let err = chapter.publish().unwrap_err();

        match err {
            ChapterError::Incomplete { missing } => {
                assert_eq!(missing, vec![RequiredField::Description, RequiredField::VideoUrl]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!chapter.is_published());
    }

    #[test]
    fn test_publish_complete_succeeds() {
        let mut chapter = complete();
        chapter.set_published(true).unwrap();
        assert!(chapter.is_published());

        // 重复发布不报错
        chapter.set_published(true).unwrap();
        assert!(chapter.is_published());
    }

    #[test]
    fn test_unpublish_always_allowed() {
        let mut chapter = draft();
        chapter.set_published(false).unwrap();
        assert!(!chapter.is_published());

        let mut chapter = complete();
        chapter.publish().unwrap();
        chapter.set_published(false).unwrap();
        assert_eq!(chapter.publish_state(), PublishState::Draft);
    }

    #[test]
    fn test_clearing_description_reverts_published_chapter() {
        let mut chapter = complete();
        chapter.publish().unwrap();

        let reverted = chapter.set_description(Some("  ".to_string()));

        assert!(reverted);
        assert!(!chapter.is_published());
        assert_eq!(chapter.description(), None);
    }

    #[test]
    fn test_editing_draft_never_reports_revert() {
        let mut chapter = draft();
        assert!(!chapter.set_description(None));
        assert!(!chapter.set_video_url(None));
    }

    #[test]
    fn test_attach_video_returns_previous_asset() {
        let mut chapter = draft();
        let first = VideoAsset::new("asset-1", Some("play-1".to_string())).unwrap();
        let second = VideoAsset::new("asset-2", None).unwrap();

        assert!(chapter
            .attach_video(VideoUrl::new("https://cdn/a.mp4").unwrap(), first.clone())
            .is_none());
        let previous = chapter.attach_video(VideoUrl::new("https://cdn/b.mp4").unwrap(), second);

        assert_eq!(previous, Some(first));
        assert_eq!(chapter.video_asset().unwrap().asset_id(), "asset-2");
        assert_eq!(chapter.video_url().unwrap().as_str(), "https://cdn/b.mp4");
    }

    #[test]
    fn test_restore_treats_blank_fields_as_missing() {
        let now = Utc::now();
        let chapter = Chapter::restore(ChapterSnapshot {
            id: ChapterId::new(),
            course_id: CourseId::new(),
            title: "Intro".to_string(),
            description: Some(String::new()),
            video_url: Some(" ".to_string()),
            video_asset: None,
            position: 3,
            is_free: true,
            is_published: false,
            created_at: now,
            updated_at: now,
        });

        assert_eq!(chapter.completion_status(), CompletionStatus { completed: 1, total: 3 });
        assert!(chapter.is_free());
        assert_eq!(chapter.position(), 3);
    }

    #[test]
    fn test_restore_never_yields_incomplete_published_chapter() {
        let now = Utc::now();
        let chapter = Chapter::restore(ChapterSnapshot {
            id: ChapterId::new(),
            course_id: CourseId::new(),
            title: "Intro".to_string(),
            description: None,
            video_url: None,
            video_asset: None,
            position: 1,
            is_free: false,
            is_published: true,
            created_at: now,
            updated_at: now,
        });

        assert!(!chapter.is_published());
        assert_eq!(chapter.updated_at(), now);
    }
}

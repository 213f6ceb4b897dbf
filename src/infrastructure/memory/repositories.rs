//! In-Memory Repository Implementation
//!
//! `database.backend = "memory"` 时使用，也用于处理器测试

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, CourseRecord, CourseRepositoryPort, RepositoryError,
    VideoAssetRecord,
};

/// 内存课程仓储
pub struct InMemoryCourseRepository {
    courses: DashMap<Uuid, CourseRecord>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self {
            courses: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryCourseRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseRepositoryPort for InMemoryCourseRepository {
    async fn save(&self, course: &CourseRecord) -> Result<(), RepositoryError> {
        self.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepositoryError> {
        Ok(self.courses.get(&id).map(|c| c.clone()))
    }

    async fn set_published(&self, id: Uuid, is_published: bool) -> Result<(), RepositoryError> {
        let mut course = self
            .courses
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("course {}", id)))?;
        course.is_published = is_published;
        course.updated_at = Utc::now();
        Ok(())
    }
}

/// 内存章节仓储
///
/// 视频元数据按 chapter_id 存放，保证一对一
pub struct InMemoryChapterRepository {
    chapters: DashMap<Uuid, ChapterRecord>,
    assets: DashMap<Uuid, VideoAssetRecord>,
}

impl InMemoryChapterRepository {
    pub fn new() -> Self {
        Self {
            chapters: DashMap::new(),
            assets: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryChapterRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChapterRepositoryPort for InMemoryChapterRepository {
    async fn save(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        self.chapters.insert(chapter.id, chapter.clone());
        Ok(())
    }

    async fn find_chapter(
        &self,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        Ok(self
            .chapters
            .get(&chapter_id)
            .filter(|c| c.course_id == course_id)
            .map(|c| c.clone()))
    }

    async fn find_by_course(&self, course_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let mut chapters: Vec<ChapterRecord> = self
            .chapters
            .iter()
            .filter(|entry| entry.course_id == course_id)
            .map(|entry| entry.value().clone())
            .collect();
        chapters.sort_by_key(|c| c.position);
        Ok(chapters)
    }

    async fn next_position(&self, course_id: Uuid) -> Result<u32, RepositoryError> {
        let max = self
            .chapters
            .iter()
            .filter(|entry| entry.course_id == course_id)
            .map(|entry| entry.position)
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    async fn update(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        let mut existing = self
            .chapters
            .get_mut(&chapter.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("chapter {}", chapter.id)))?;
        *existing = chapter.clone();
        Ok(())
    }

    async fn delete(&self, chapter_id: Uuid) -> Result<(), RepositoryError> {
        self.assets.remove(&chapter_id);
        self.chapters.remove(&chapter_id);
        Ok(())
    }

    async fn find_video_asset(
        &self,
        chapter_id: Uuid,
    ) -> Result<Option<VideoAssetRecord>, RepositoryError> {
        Ok(self.assets.get(&chapter_id).map(|a| a.clone()))
    }

    async fn replace_video_asset(
        &self,
        chapter: &ChapterRecord,
        asset: &VideoAssetRecord,
    ) -> Result<Option<VideoAssetRecord>, RepositoryError> {
        self.update(chapter).await?;
        Ok(self.assets.insert(chapter.id, asset.clone()))
    }

    async fn count_published(&self, course_id: Uuid) -> Result<usize, RepositoryError> {
        Ok(self
            .chapters
            .iter()
            .filter(|entry| entry.course_id == course_id && entry.is_published)
            .count())
    }
}

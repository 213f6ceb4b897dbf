//! SQLite Chapter Repository
//!
//! 章节与视频元数据；删除、替换视频都在事务内完成

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::course_repo::parse_timestamp;
use super::DbPool;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, RepositoryError, VideoAssetRecord,
};

const CHAPTER_COLUMNS: &str = "id, course_id, title, description, video_url, position, is_free, is_published, created_at, updated_at";

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    course_id: String,
    title: String,
    description: Option<String>,
    video_url: Option<String>,
    position: i64,
    is_free: bool,
    is_published: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: parse_uuid(&row.id)?,
            course_id: parse_uuid(&row.course_id)?,
            title: row.title,
            description: row.description,
            video_url: row.video_url,
            position: u32::try_from(row.position)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            is_free: row.is_free,
            is_published: row.is_published,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct VideoAssetRow {
    id: String,
    chapter_id: String,
    asset_id: String,
    playback_id: Option<String>,
}

impl TryFrom<VideoAssetRow> for VideoAssetRecord {
    type Error = RepositoryError;

    fn try_from(row: VideoAssetRow) -> Result<Self, Self::Error> {
        Ok(VideoAssetRecord {
            id: parse_uuid(&row.id)?,
            chapter_id: parse_uuid(&row.chapter_id)?,
            asset_id: row.asset_id,
            playback_id: row.playback_id,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn save(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chapters (id, course_id, title, description, video_url, position, is_free, is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                video_url = excluded.video_url,
                position = excluded.position,
                is_free = excluded.is_free,
                is_published = excluded.is_published,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.course_id.to_string())
        .bind(&chapter.title)
        .bind(&chapter.description)
        .bind(&chapter.video_url)
        .bind(chapter.position as i64)
        .bind(chapter.is_free)
        .bind(chapter.is_published)
        .bind(chapter.created_at.to_rfc3339())
        .bind(chapter.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_chapter(
        &self,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE id = ? AND course_id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(chapter_id.to_string())
        .bind(course_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_by_course(&self, course_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {} FROM chapters WHERE course_id = ? ORDER BY position",
            CHAPTER_COLUMNS
        ))
        .bind(course_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn next_position(&self, course_id: Uuid) -> Result<u32, RepositoryError> {
        let next: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM chapters WHERE course_id = ?",
        )
        .bind(course_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        u32::try_from(next).map_err(|e| RepositoryError::SerializationError(e.to_string()))
    }

    async fn update(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE chapters SET
                title = ?, description = ?, video_url = ?, position = ?,
                is_free = ?, is_published = ?, updated_at = ?
            WHERE id = ? AND course_id = ?
            "#,
        )
        .bind(&chapter.title)
        .bind(&chapter.description)
        .bind(&chapter.video_url)
        .bind(chapter.position as i64)
        .bind(chapter.is_free)
        .bind(chapter.is_published)
        .bind(chapter.updated_at.to_rfc3339())
        .bind(chapter.id.to_string())
        .bind(chapter.course_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chapter {}", chapter.id)));
        }
        Ok(())
    }

    async fn delete(&self, chapter_id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM video_assets WHERE chapter_id = ?")
            .bind(chapter_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(chapter_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn find_video_asset(
        &self,
        chapter_id: Uuid,
    ) -> Result<Option<VideoAssetRecord>, RepositoryError> {
        let row: Option<VideoAssetRow> = sqlx::query_as(
            "SELECT id, chapter_id, asset_id, playback_id FROM video_assets WHERE chapter_id = ?",
        )
        .bind(chapter_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(VideoAssetRecord::try_from).transpose()
    }

    async fn replace_video_asset(
        &self,
        chapter: &ChapterRecord,
        asset: &VideoAssetRecord,
    ) -> Result<Option<VideoAssetRecord>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let updated = sqlx::query(
            "UPDATE chapters SET video_url = ?, is_published = ?, updated_at = ? WHERE id = ? AND course_id = ?",
        )
        .bind(&chapter.video_url)
        .bind(chapter.is_published)
        .bind(chapter.updated_at.to_rfc3339())
        .bind(chapter.id.to_string())
        .bind(chapter.course_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("chapter {}", chapter.id)));
        }

        let previous: Option<VideoAssetRow> = sqlx::query_as(
            "SELECT id, chapter_id, asset_id, playback_id FROM video_assets WHERE chapter_id = ?",
        )
        .bind(chapter.id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query("DELETE FROM video_assets WHERE chapter_id = ?")
            .bind(chapter.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query(
            "INSERT INTO video_assets (id, chapter_id, asset_id, playback_id) VALUES (?, ?, ?, ?)",
        )
        .bind(asset.id.to_string())
        .bind(chapter.id.to_string())
        .bind(&asset.asset_id)
        .bind(&asset.playback_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        previous.map(VideoAssetRecord::try_from).transpose()
    }

    async fn count_published(&self, course_id: Uuid) -> Result<usize, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chapters WHERE course_id = ? AND is_published = 1",
        )
        .bind(course_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CourseRecord, CourseRepositoryPort};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteCourseRepository,
    };
    use chrono::Utc;

    /// chapters.course_id 有外键约束，先写入一门课程
    async fn repo() -> (SqliteChapterRepository, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let now = Utc::now();
        let course = CourseRecord {
            id: Uuid::new_v4(),
            owner_id: "user-1".to_string(),
            title: "Rust 入门".to_string(),
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        SqliteCourseRepository::new(pool.clone())
            .save(&course)
            .await
            .unwrap();

        (SqliteChapterRepository::new(pool), course.id)
    }

    fn chapter(course_id: Uuid, position: u32) -> ChapterRecord {
        let now = Utc::now();
        ChapterRecord {
            id: Uuid::new_v4(),
            course_id,
            title: format!("Chapter {}", position),
            description: Some("intro".to_string()),
            video_url: None,
            position,
            is_free: false,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn asset(chapter_id: Uuid, asset_id: &str) -> VideoAssetRecord {
        VideoAssetRecord {
            id: Uuid::new_v4(),
            chapter_id,
            asset_id: asset_id.to_string(),
            playback_id: Some(format!("play-{}", asset_id)),
        }
    }

    #[tokio::test]
    async fn test_save_find_and_order() {
        let (repo, course) = repo().await;
        let second = chapter(course, 2);
        let first = chapter(course, 1);
        repo.save(&second).await.unwrap();
        repo.save(&first).await.unwrap();

        let list = repo.find_by_course(course).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, first.id);
        assert_eq!(list[0].description.as_deref(), Some("intro"));

        assert_eq!(repo.next_position(course).await.unwrap(), 3);
        assert_eq!(repo.next_position(Uuid::new_v4()).await.unwrap(), 1);

        // 课程不匹配时查不到
        assert!(repo.find_chapter(Uuid::new_v4(), first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_count_published() {
        let (repo, course) = repo().await;
        let mut record = chapter(course, 1);
        repo.save(&record).await.unwrap();
        assert_eq!(repo.count_published(course).await.unwrap(), 0);

        record.is_published = true;
        repo.update(&record).await.unwrap();
        assert_eq!(repo.count_published(course).await.unwrap(), 1);

        let missing = chapter(course, 9);
        assert!(matches!(
            repo.update(&missing).await.unwrap_err(),
            RepositoryError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_replace_video_asset_returns_previous() {
        let (repo, course) = repo().await;
        let mut record = chapter(course, 1);
        repo.save(&record).await.unwrap();

        record.video_url = Some("https://cdn.example.com/a.mp4".to_string());
        let previous = repo.replace_video_asset(&record, &asset(record.id, "a")).await.unwrap();
        assert!(previous.is_none());

        record.video_url = Some("https://cdn.example.com/b.mp4".to_string());
        let previous = repo.replace_video_asset(&record, &asset(record.id, "b")).await.unwrap();
        assert_eq!(previous.unwrap().asset_id, "a");

        let current = repo.find_video_asset(record.id).await.unwrap().unwrap();
        assert_eq!(current.asset_id, "b");
        let stored = repo.find_chapter(record.course_id, record.id).await.unwrap().unwrap();
        assert_eq!(stored.video_url.as_deref(), Some("https://cdn.example.com/b.mp4"));
    }

    #[tokio::test]
    async fn test_delete_removes_chapter_and_asset() {
        let (repo, course) = repo().await;
        let record = chapter(course, 1);
        repo.save(&record).await.unwrap();
        repo.replace_video_asset(&record, &asset(record.id, "a")).await.unwrap();

        repo.delete(record.id).await.unwrap();

        assert!(repo.find_chapter(record.course_id, record.id).await.unwrap().is_none());
        assert!(repo.find_video_asset(record.id).await.unwrap().is_none());
        assert!(repo.find_by_course(course).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chapter_without_course_is_rejected() {
        let (repo, _) = repo().await;
        let orphan = chapter(Uuid::new_v4(), 1);

        let err = repo.save(&orphan).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DatabaseError(_)));
    }
}

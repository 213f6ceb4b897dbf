//! SQLite Course Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{CourseRecord, CourseRepositoryPort, RepositoryError};

/// SQLite Course Repository
pub struct SqliteCourseRepository {
    pool: DbPool,
}

impl SqliteCourseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CourseRow {
    id: String,
    owner_id: String,
    title: String,
    is_published: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<CourseRow> for CourseRecord {
    type Error = RepositoryError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(CourseRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            owner_id: row.owner_id,
            title: row.title,
            is_published: row.is_published,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

pub(super) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

#[async_trait]
impl CourseRepositoryPort for SqliteCourseRepository {
    async fn save(&self, course: &CourseRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, owner_id, title, is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                is_published = excluded.is_published,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(course.id.to_string())
        .bind(&course.owner_id)
        .bind(&course.title)
        .bind(course.is_published)
        .bind(course.created_at.to_rfc3339())
        .bind(course.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseRecord>, RepositoryError> {
        let row: Option<CourseRow> = sqlx::query_as(
            "SELECT id, owner_id, title, is_published, created_at, updated_at FROM courses WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(CourseRecord::try_from).transpose()
    }

    async fn set_published(&self, id: Uuid, is_published: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE courses SET is_published = ?, updated_at = ? WHERE id = ?")
            .bind(is_published)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("course {}", id)));
        }
        Ok(())
    }
}

//! Course Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::CreateCourse;
use crate::application::dto::CourseResponse;
use crate::application::error::ApplicationError;
use crate::application::ports::{CourseRecord, CourseRepositoryPort};
use crate::domain::AuthContext;

/// CreateCourse Handler - 课程归调用者所有
pub struct CreateCourseHandler {
    course_repo: Arc<dyn CourseRepositoryPort>,
}

impl CreateCourseHandler {
    pub fn new(course_repo: Arc<dyn CourseRepositoryPort>) -> Self {
        Self { course_repo }
    }

    pub async fn handle(
        &self,
        ctx: &AuthContext,
        command: CreateCourse,
    ) -> Result<CourseResponse, ApplicationError> {
        let title = command.title.trim().to_string();
        if title.is_empty() {
            return Err(ApplicationError::validation("Course title cannot be empty"));
        }

        let now = Utc::now();
        let course = CourseRecord {
            id: Uuid::new_v4(),
            owner_id: ctx.user_id().as_str().to_string(),
            title,
            is_published: false,
            created_at: now,
            updated_at: now,
        };

        self.course_repo.save(&course).await?;

        tracing::info!(
            course_id = %course.id,
            owner_id = %course.owner_id,
            title = %course.title,
            "Course created"
        );

        Ok(CourseResponse::from(course))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::infrastructure::memory::InMemoryCourseRepository;

    #[tokio::test]
    async fn test_course_owned_by_caller() {
        let repo = Arc::new(InMemoryCourseRepository::new());
        let handler = CreateCourseHandler::new(repo.clone());
        let ctx = AuthContext::new(UserId::new("user_1").unwrap());

        let course = handler
            .handle(&ctx, CreateCourse { title: " Rust 101 ".to_string() })
            .await
            .unwrap();

        assert_eq!(course.title, "Rust 101");
        assert!(!course.is_published);
        let stored = repo.find_by_id(course.id).await.unwrap().unwrap();
        assert_eq!(stored.owner_id, "user_1");
    }

    #[tokio::test]
    async fn test_blank_course_title_rejected() {
        let handler = CreateCourseHandler::new(Arc::new(InMemoryCourseRepository::new()));
        let ctx = AuthContext::new(UserId::new("user_1").unwrap());

        let err = handler
            .handle(&ctx, CreateCourse { title: "  ".to_string() })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}

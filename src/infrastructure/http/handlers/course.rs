//! Course HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::CreateCourse;
use crate::infrastructure::http::dto::{ApiResponse, CourseDto, CreateCourseRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::RequireAuth;
use crate::infrastructure::http::state::AppState;

/// 创建课程
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
    Json(req): Json<CreateCourseRequest>,
) -> Result<Json<ApiResponse<CourseDto>>, ApiError> {
    let course = state
        .create_course_handler
        .handle(&ctx, CreateCourse { title: req.title })
        .await?;

    Ok(Json(ApiResponse::success(course.into())))
}

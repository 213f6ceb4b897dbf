//! HTTP Routes
//!
//! API Endpoints（除 /api/ping 外都需要 `Authorization: Bearer <token>`）:
//! - /api/ping               GET   健康检查
//! - /api/course/create      POST  创建课程
//! - /api/chapter/create     POST  创建章节（草稿）
//! - /api/chapter/get        POST  章节编辑页视图
//! - /api/chapter/list       POST  课程下的章节列表
//! - /api/chapter/update     POST  编辑标题 / 描述 / 免费试看
//! - /api/chapter/video      POST  附加或替换视频
//! - /api/chapter/publish    POST  发布章节
//! - /api/chapter/unpublish  POST  取消发布
//! - /api/chapter/delete     POST  删除章节
//! - /ws/events              WS    章节生命周期事件（可用 ?token= 认证）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 事件推送路径，唯一接受 `?token=` 的路由
pub const WS_EVENTS_PATH: &str = "/ws/events";

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route(WS_EVENTS_PATH, get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/course", course_routes())
        .nest("/chapter", chapter_routes())
}

/// Course 路由
fn course_routes() -> Router<Arc<AppState>> {
    Router::new().route("/create", post(handlers::create_course))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_chapter))
        .route("/get", post(handlers::get_chapter))
        .route("/list", post(handlers::list_chapters))
        .route("/update", post(handlers::update_chapter))
        .route("/video", post(handlers::attach_video))
        .route("/publish", post(handlers::publish_chapter))
        .route("/unpublish", post(handlers::unpublish_chapter))
        .route("/delete", post(handlers::delete_chapter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::infrastructure::adapters::{FakeMediaHost, StaticTokenAuthProvider};
    use crate::infrastructure::events::{EventPublisher, WsEvent};
    use crate::infrastructure::http::server::build_router;
    use crate::infrastructure::memory::{InMemoryChapterRepository, InMemoryCourseRepository};

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Arc::new(InMemoryCourseRepository::new()),
            Arc::new(InMemoryChapterRepository::new()),
            Arc::new(FakeMediaHost::with_defaults()),
            Arc::new(StaticTokenAuthProvider::new([
                ("tok-alice", "alice"),
                ("tok-bob", "bob"),
            ])),
            Arc::new(EventPublisher::new()),
        ))
    }

    async fn call(app: &Router, token: Option<&str>, path: &str, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create_course_and_chapter(app: &Router) -> (String, String) {
        let (_, course) = call(app, Some("tok-alice"), "/api/course/create", json!({"title": "Rust"})).await;
        let course_id = course["data"]["id"].as_str().unwrap().to_string();
        let (_, chapter) = call(
            app,
            Some("tok-alice"),
            "/api/chapter/create",
            json!({"course_id": course_id, "title": "Intro"}),
        )
        .await;
        let chapter_id = chapter["data"]["id"].as_str().unwrap().to_string();
        (course_id, chapter_id)
    }

    #[tokio::test]
    async fn test_ping_is_public() {
        let app = build_router(test_state());
        let request = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_or_unknown_token_is_unauthorized() {
        let app = build_router(test_state());

        let (status, body) = call(&app, None, "/api/course/create", json!({"title": "Rust"})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errno"], 401);

        let (status, _) = call(&app, Some("nope"), "/api/course/create", json!({"title": "Rust"})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // 非 WebSocket 路由不接受 query token
        let (status, _) = call(
            &app,
            None,
            "/api/course/create?token=tok-alice",
            json!({"title": "Rust"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_publish_flow() {
        let state = test_state();
        let mut events = state.event_publisher.subscribe();
        let app = build_router(state);
        let (course_id, chapter_id) = create_course_and_chapter(&app).await;
        let chapter_ref = json!({"course_id": course_id, "chapter_id": chapter_id});

        // 新章节 (1/3)，不可发布
        let (_, editor) = call(&app, Some("tok-alice"), "/api/chapter/get", chapter_ref.clone()).await;
        assert_eq!(editor["data"]["completion_text"], "(1/3)");
        assert_eq!(editor["data"]["can_publish"], false);
        assert_eq!(editor["data"]["show_draft_banner"], true);
        assert_eq!(editor["data"]["missing_fields"], json!(["description", "video_url"]));

        let (status, rejected) = call(&app, Some("tok-alice"), "/api/chapter/publish", chapter_ref.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rejected["errno"], 400);

        call(
            &app,
            Some("tok-alice"),
            "/api/chapter/update",
            json!({"course_id": course_id, "chapter_id": chapter_id, "description": "text"}),
        )
        .await;
        let (_, attached) = call(
            &app,
            Some("tok-alice"),
            "/api/chapter/video",
            json!({"course_id": course_id, "chapter_id": chapter_id, "video_url": "https://cdn.example.com/intro.mp4"}),
        )
        .await;
        assert_eq!(attached["errno"], 0);
        assert!(attached["data"]["chapter"]["video_asset"]["asset_id"].is_string());

        let (_, published) = call(&app, Some("tok-alice"), "/api/chapter/publish", chapter_ref.clone()).await;
        assert_eq!(published["errno"], 0);
        assert_eq!(published["data"]["chapter"]["is_published"], true);

        let event = events.recv().await.unwrap();
        assert_eq!(event.owner_id.as_str(), "alice");
        assert!(matches!(event.event, WsEvent::ChapterPublished { .. }));

        // 重复发布成功但不产生事件
        let (_, again) = call(&app, Some("tok-alice"), "/api/chapter/publish", chapter_ref.clone()).await;
        assert_eq!(again["errno"], 0);
        assert_eq!(again["data"]["changed"], false);
        assert!(events.try_recv().is_err());

        let (_, list) = call(&app, Some("tok-alice"), "/api/chapter/list", json!({"course_id": course_id})).await;
        assert_eq!(list["data"]["total"], 1);
    }

    #[tokio::test]
    async fn test_delete_chapter() {
        let app = build_router(test_state());
        let (course_id, chapter_id) = create_course_and_chapter(&app).await;
        let chapter_ref = json!({"course_id": course_id, "chapter_id": chapter_id});

        let (_, deleted) = call(&app, Some("tok-alice"), "/api/chapter/delete", chapter_ref.clone()).await;
        assert_eq!(deleted["errno"], 0);
        assert!(deleted["data"]["orphaned_asset"].is_null());

        let (_, again) = call(&app, Some("tok-alice"), "/api/chapter/delete", chapter_ref).await;
        assert_eq!(again["errno"], 404);
    }

    #[tokio::test]
    async fn test_other_users_course_is_not_found() {
        let app = build_router(test_state());
        let (course_id, chapter_id) = create_course_and_chapter(&app).await;

        let (_, body) = call(
            &app,
            Some("tok-bob"),
            "/api/chapter/get",
            json!({"course_id": course_id, "chapter_id": chapter_id}),
        )
        .await;
        assert_eq!(body["errno"], 404);
    }
}

//! HTTP Middleware
//!
//! - `auth_middleware`: 解析 Bearer token，把 `AuthContext` 写入请求扩展
//! - `RequireAuth`: 从扩展读取 `AuthContext` 的提取器，缺失时返回 401
//! - `error_logging_middleware`: HTTP 4xx/5xx 状态码日志

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ApiError;
use super::routes::WS_EVENTS_PATH;
use super::state::AppState;
use crate::application::AuthError;
use crate::domain::AuthContext;

/// WebSocket 握手无法设置请求头，仅该路由允许通过 `?token=` 传递
#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.trim().split_once(' '))
        // scheme 不区分大小写
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim().to_string())
        .filter(|t| !t.is_empty());

    if header.is_some() || parts.uri.path() != WS_EVENTS_PATH {
        return header;
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.token)
        .filter(|t| !t.is_empty())
}

/// 认证中间件
///
/// 没有 token 时直接放行，由 `RequireAuth` 决定是否拒绝；
/// token 无法解析为用户时返回 401
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    if let Some(token) = bearer_token(&parts) {
        match state.auth_provider.current_user_id(&token).await {
            Ok(Some(user_id)) => {
                parts.extensions.insert(AuthContext::new(user_id));
            }
            Ok(None) | Err(AuthError::InvalidCredentials) => {
                return ApiError::Unauthorized("Invalid token".to_string()).into_response();
            }
            Err(AuthError::ServiceUnavailable(msg)) => {
                return ApiError::ServiceUnavailable(format!(
                    "Authentication service unavailable: {}",
                    msg
                ))
                .into_response();
            }
        }
    }

    next.run(Request::from_parts(parts, body)).await
}

/// 需要登录的提取器
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 注意：业务错误（errno != 0）在 ApiError::into_response() 中记录；
/// 只记录 path，query 可能带 token
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

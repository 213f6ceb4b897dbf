//! Auth Provider Port - 身份解析
//!
//! 把请求携带的凭证解析为用户 ID；解析不到用户即为拒绝访问

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UserId;

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Auth Provider Port
#[async_trait]
pub trait AuthProviderPort: Send + Sync {
    /// 解析 Bearer token 对应的当前用户，未知 token 返回 `Ok(None)`
    async fn current_user_id(&self, token: &str) -> Result<Option<UserId>, AuthError>;
}

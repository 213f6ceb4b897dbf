//! Static Token Auth Provider
//!
//! 从配置中的 token / user_id 列表解析当前用户，适合自托管部署与测试
//! token 区分大小写

use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::ports::{AuthError, AuthProviderPort};
use crate::domain::UserId;

/// 静态 token 认证
pub struct StaticTokenAuthProvider {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenAuthProvider {
    /// 构建认证器；空 token 或空用户 ID 的条目会被跳过
    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut resolved = HashMap::new();
        for (token, user) in entries {
            if token.trim().is_empty() {
                tracing::warn!("Skipping empty auth token");
                continue;
            }
            match UserId::new(user) {
                Ok(user_id) => {
                    resolved.insert(token.to_string(), user_id);
                }
                Err(e) => tracing::warn!(error = %e, "Skipping auth token with invalid user id"),
            }
        }

        tracing::info!(tokens = resolved.len(), "StaticTokenAuthProvider initialized");
        Self { tokens: resolved }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl AuthProviderPort for StaticTokenAuthProvider {
    async fn current_user_id(&self, token: &str) -> Result<Option<UserId>, AuthError> {
        Ok(self.tokens.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticTokenAuthProvider {
        StaticTokenAuthProvider::new([
            ("tok-alice", "user-alice"),
            ("AbC-Secret-9Z", "user-mixed"),
            ("tok-blank", "   "),
            ("", "user-empty"),
        ])
    }

    #[tokio::test]
    async fn test_known_token_resolves_user() {
        let provider = provider();
        let user = provider.current_user_id("tok-alice").await.unwrap();
        assert_eq!(user.unwrap().as_str(), "user-alice");
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let provider = provider();
        assert!(provider.current_user_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_match_is_case_sensitive() {
        let provider = provider();
        let user = provider.current_user_id("AbC-Secret-9Z").await.unwrap();
        assert_eq!(user.unwrap().as_str(), "user-mixed");
        assert!(provider.current_user_id("abc-secret-9z").await.unwrap().is_none());
    }

    #[test]
    fn test_invalid_entries_skipped() {
        let provider = provider();
        assert_eq!(provider.len(), 2);
    }
}

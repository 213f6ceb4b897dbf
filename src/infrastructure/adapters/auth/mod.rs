//! Auth Adapter - 身份解析实现

mod static_token;

pub use static_token::StaticTokenAuthProvider;

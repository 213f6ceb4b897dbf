//! Domain Layer - 领域层
//!
//! - Chapter Context: 章节编辑与发布
//! - Identity: 调用者身份

pub mod chapter;
pub mod identity;

pub use identity::{AuthContext, UserId};

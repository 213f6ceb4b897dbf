//! Memory Layer - In-Memory State Management
//!
//! 课程与章节仓储的内存实现（开发模式与测试）

mod repositories;

pub use repositories::{InMemoryChapterRepository, InMemoryCourseRepository};

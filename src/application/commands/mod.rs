//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod chapter_commands;
mod course_commands;

pub mod handlers;

pub use chapter_commands::*;
pub use course_commands::*;

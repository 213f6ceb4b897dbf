//! Course Commands

/// 创建课程命令
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub title: String,
}

//! Courseware - 课程章节编辑与发布后端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Chapter Context: 章节聚合、必填字段与发布策略
//! - Identity: 调用者身份（AuthContext）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, MediaHost, AuthProvider）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Persistence: SQLite 存储
//! - Memory: 内存仓储（开发与测试）
//! - Adapters: 视频托管客户端, 静态 token 认证
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

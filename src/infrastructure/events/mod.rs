//! Events - 章节生命周期事件推送

mod publisher;

pub use publisher::{EventPublisher, OwnedEvent, WsEvent};

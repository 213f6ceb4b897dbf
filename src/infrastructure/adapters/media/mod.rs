//! Media Adapter - 视频托管服务客户端实现

mod fake_media_host;
mod http_media_host;

pub use fake_media_host::{FakeMediaHost, FakeMediaHostConfig};
pub use http_media_host::*;

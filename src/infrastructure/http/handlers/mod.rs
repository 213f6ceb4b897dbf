//! HTTP Handlers

mod chapter;
mod course;
mod ping;
mod websocket;

pub use chapter::*;
pub use course::*;
pub use ping::*;
pub use websocket::*;

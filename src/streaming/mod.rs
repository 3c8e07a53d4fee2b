//! Relay of upstream audio for catalog songs.
//!
//! The catalog only stores a stable reference per song. Media URLs handed out
//! by the provider expire, so every playback resolves a fresh one and the
//! upstream bytes are passed through without being buffered.

mod proxy;

pub use proxy::{StreamError, StreamProxy, UpstreamStream, DEFAULT_CONTENT_TYPE};

//! Crate-wide error re-exports.
//!
//! The codec and session layers define their own error types close to where
//! they're produced (`rtsp::CodecError`, `wfd::ProtocolError`,
//! `wfd::WfdError`); this module re-exports the one callers most often need.

pub use crate::wfd::error::{ProtocolError, WfdError};

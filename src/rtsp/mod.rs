//! RTSP/1.0 wire codec and message model.
//!
//! This module is pure: no sockets, no async runtime. `wfd::endpoint` and
//! `wfd::async_endpoint` are the two I/O drivers built on top of it.

pub mod codec;
pub mod headers;
pub mod message;
pub mod status;

pub use codec::{decode, encode, CodecError, MAX_MESSAGE_SIZE};
pub use headers::Headers;
pub use message::{Content, Message, Method, Request, Response, VERSION};
pub use status::StatusCode;

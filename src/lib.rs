//! # wfd
//!
//! A Wi-Fi Display (WFD / Miracast) RTSP session-control library: the wire
//! codec/framing layer for RTSP/1.0 over TCP, and the WFD session state
//! machine that drives the M1-M7 handshake and the PLAY/PAUSE/TEARDOWN
//! steady state between a source and a sink.
//!
//! This crate negotiates the session; it never moves RTP media bytes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wfd::{Endpoint, SourceSession};
//! use std::net::TcpStream;
//!
//! # fn example() -> Result<(), wfd::WfdError> {
//! let stream = TcpStream::connect("127.0.0.1:7236")?;
//! let mut endpoint = Endpoint::new(stream);
//! let mut session = SourceSession::new();
//! endpoint.wait_for_request(&mut session)?; // M1
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Error types
pub mod error;
/// Runtime-agnostic async I/O traits
pub mod net;
/// RTSP/1.0 wire codec and message model
pub mod rtsp;
/// WFD session state machine and I/O drivers
pub mod wfd;

/// Process configuration for the server and client binaries
mod config;

pub use config::Config;
pub use error::{ProtocolError, WfdError};
pub use wfd::{AsyncEndpoint, Endpoint, HandshakePhase, Phase, Receiver, SinkSession, SourceSession};

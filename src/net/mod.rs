//! Network abstraction layer
//!
//! This module provides runtime-agnostic async read/write traits so the
//! async Endpoint can be driven over a real socket or an in-memory duplex
//! stream alike.

mod traits;

#[cfg(feature = "tokio-runtime")]
mod tokio_impl;

pub use traits::{
    AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, Flush, Read, ReadExact, WriteAll,
};

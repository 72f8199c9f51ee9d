//! The single-threaded, cooperative, event-driven Endpoint variant.
//!
//! An inbound-data callback appends to a buffer and repeatedly extracts
//! framed messages; a pending-request table keyed by `CSeq` replaces
//! call-stack continuations for responses. Built on the runtime-agnostic
//! `net::{AsyncRead, AsyncWrite}` traits rather than tokio's directly, so it
//! runs over a real socket or an in-memory duplex stream alike.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::net::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use crate::rtsp::{decode, encode, Message, Request};
use crate::wfd::error::{ProtocolError, WfdError};
use crate::wfd::session::{as_request, as_response, Receiver};

/// A non-blocking Endpoint: `feed` appends bytes and drains every complete
/// message currently framed, dispatching each through `receiver`.
pub struct AsyncEndpoint<S> {
    stream: S,
    buffer: Vec<u8>,
    next_cseq: u32,
    pending: HashMap<u32, Request>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> AsyncEndpoint<S> {
    /// Wrap a stream with an empty receive buffer and `CSeq` counter starting at 0.
    #[must_use]
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            next_cseq: 0,
            pending: HashMap::new(),
        }
    }

    /// Stamp and send a request without waiting for the response; registers
    /// it in the pending-request table keyed by the stamped `CSeq`.
    ///
    /// # Errors
    /// Propagates write or framing errors from the underlying stream.
    pub async fn send_request(&mut self, mut request: Request) -> Result<u32, WfdError> {
        let cseq = self.next_cseq;
        request.headers.insert("CSeq", cseq.to_string());
        trace!(method = ?request.method, cseq, "sending request (async)");
        let raw = encode(&Message::Request(request.clone()))?;
        self.stream.write_all(&raw).await?;
        self.stream.flush().await?;
        self.pending.insert(cseq, request);
        self.next_cseq += 1;
        Ok(cseq)
    }

    /// Read one chunk from the stream, append it to the buffer, and drain
    /// every fully framed message, dispatching each to `receiver`.
    ///
    /// Returns the number of messages processed. Zero means the peer closed
    /// the stream with no further bytes available.
    ///
    /// # Errors
    /// Any protocol, codec, or I/O error is connection-fatal.
    pub async fn poll_once<R: Receiver>(&mut self, receiver: &mut R) -> Result<usize, WfdError> {
        let mut chunk = [0u8; 4096];
        let n = self.stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(WfdError::Closed);
        }
        self.buffer.extend_from_slice(&chunk[..n]);
        self.data_received(receiver).await
    }

    /// Drain every message currently framed in the buffer without reading
    /// more bytes from the stream.
    ///
    /// # Errors
    /// Any protocol, codec, or I/O error is connection-fatal.
    pub async fn data_received<R: Receiver>(&mut self, receiver: &mut R) -> Result<usize, WfdError> {
        let mut processed = 0;
        while let Some((message, consumed)) = decode(&self.buffer)? {
            self.buffer.drain(..consumed);
            self.dispatch(message, receiver).await?;
            processed += 1;
        }
        Ok(processed)
    }

    async fn dispatch<R: Receiver>(
        &mut self,
        message: Message,
        receiver: &mut R,
    ) -> Result<(), WfdError> {
        if let Some(response) = as_response(&message) {
            let cseq = response.cseq().ok_or(ProtocolError::UnknownCseq(0))?;
            let request = self
                .pending
                .remove(&cseq)
                .ok_or(ProtocolError::UnknownCseq(cseq))?;
            receiver.process_response(response, &request)?;
            return Ok(());
        }
        let request = as_request(&message).expect("message is a request or response");
        let result = receiver.process_request(request)?;
        let mut response = result.response;
        if let Some(cseq) = request.cseq() {
            response.headers.prepend("CSeq", cseq.to_string());
        }
        debug!(method = ?request.method, status = response.status.as_u16(), "replying to request (async)");
        let raw = encode(&Message::Response(response))?;
        self.stream.write_all(&raw).await?;
        self.stream.flush().await?;
        if let Some(follow_up) = result.follow_up {
            debug!(method = ?follow_up.method, "sending follow-up request");
            self.send_request(follow_up).await?;
        }
        Ok(())
    }

    /// Close the underlying stream.
    ///
    /// # Errors
    /// Returns a transport error if the final flush fails.
    pub async fn teardown(mut self) -> Result<(), WfdError> {
        self.stream.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtsp::headers::names;
    use crate::rtsp::Method;
    use crate::wfd::session::SourceSession;

    #[tokio::test]
    async fn feeds_and_replies_to_m1_options() {
        let (mut client, server) = tokio::io::duplex(4096);
        let mut endpoint = AsyncEndpoint::new(server);
        let mut source = SourceSession::new();

        let raw = b"OPTIONS * RTSP/1.0\r\nCSeq: 0\r\nRequire: org.wfa.wfd1.0\r\n\r\n";
        tokio::io::AsyncWriteExt::write_all(&mut client, raw)
            .await
            .unwrap();

        let processed = endpoint.poll_once(&mut source).await.unwrap();
        assert_eq!(processed, 1);

        let mut out = [0u8; 256];
        let n = tokio::io::AsyncReadExt::read(&mut client, &mut out)
            .await
            .unwrap();
        assert_eq!(
            &out[..n],
            b"RTSP/1.0 200 OK\r\nCSeq: 0\r\nPublic: org.wfa.wfd1.0, GET_PARAMETER, SET_PARAMETER\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn pending_table_matches_out_of_order_responses() {
        let (mut client, server) = tokio::io::duplex(4096);
        let mut endpoint = AsyncEndpoint::new(server);
        let mut source = SourceSession::new();

        let req0 = crate::rtsp::Request::new(Method::Options, "*")
            .with_header(names::REQUIRE, "org.wfa.wfd1.0");
        let req1 = crate::rtsp::Request::new(Method::GetParameter, "rtsp://x/wfd1.0");
        endpoint.send_request(req0).await.unwrap();
        endpoint.send_request(req1).await.unwrap();

        let mut buf = [0u8; 512];
        let n = tokio::io::AsyncReadExt::read(&mut client, &mut buf)
            .await
            .unwrap();
        assert!(buf[..n].windows(9).any(|w| w == b"CSeq: 0\r\n"));

        // Reply out of order: CSeq 1 before CSeq 0.
        tokio::io::AsyncWriteExt::write_all(
            &mut client,
            b"RTSP/1.0 200 OK\r\nCSeq: 1\r\n\r\nRTSP/1.0 200 OK\r\nCSeq: 0\r\n\r\n",
        )
        .await
        .unwrap();
        let processed = endpoint.poll_once(&mut source).await.unwrap();
        assert_eq!(processed, 2);
        assert_eq!(source.handshake_phase, crate::wfd::session::HandshakePhase::GetParameters);
    }

    #[tokio::test]
    async fn unknown_cseq_response_is_a_protocol_error() {
        let (mut client, server) = tokio::io::duplex(4096);
        let mut endpoint = AsyncEndpoint::new(server);
        let mut source = SourceSession::new();
        tokio::io::AsyncWriteExt::write_all(&mut client, b"RTSP/1.0 200 OK\r\nCSeq: 99\r\n\r\n")
            .await
            .unwrap();
        let err = endpoint.poll_once(&mut source).await.unwrap_err();
        assert!(matches!(
            err,
            WfdError::Protocol(ProtocolError::UnknownCseq(99))
        ));
    }
}

//! The synchronous, blocking Endpoint: one OS thread per connection.
//!
//! `send_request` blocks until a matching response is framed;
//! `wait_for_request` blocks until a request is framed.

use std::io::{Read, Write};

use tracing::{debug, error, trace};

use crate::rtsp::{decode, encode, Message, Request, Response};
use crate::wfd::error::{ProtocolError, WfdError};
use crate::wfd::session::{as_request, as_response, Receiver};

/// Owns a byte stream, a receive buffer of undelivered bytes, and a
/// monotonic `CSeq` counter.
pub struct Endpoint<S> {
    stream: S,
    buffer: Vec<u8>,
    next_cseq: u32,
}

impl<S: Read + Write> Endpoint<S> {
    /// Wrap a stream with an empty receive buffer and `CSeq` counter starting at 0.
    #[must_use]
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            next_cseq: 0,
        }
    }

    /// Stamp, send, and block until the matching response is framed.
    ///
    /// # Errors
    /// Returns [`WfdError::Protocol`] if the response's `CSeq` does not match
    /// the one this call stamped onto the request (connection-fatal).
    pub fn send_request<R: Receiver>(
        &mut self,
        mut request: Request,
        receiver: &mut R,
    ) -> Result<(), WfdError> {
        let cseq = self.next_cseq;
        request.headers.insert("CSeq", cseq.to_string());
        trace!(method = ?request.method, cseq, "sending request");
        let raw = encode(&Message::Request(request.clone()))?;
        self.stream.write_all(&raw)?;
        self.stream.flush()?;

        let response = self.read_response()?;
        let received_cseq = response.cseq().ok_or(ProtocolError::UnknownCseq(0))?;
        if received_cseq != cseq {
            error!(sent = cseq, received = received_cseq, "CSeq mismatch");
            return Err(ProtocolError::CseqMismatch {
                sent: cseq,
                received: received_cseq,
            }
            .into());
        }
        receiver.process_response(&response, &request)?;
        self.next_cseq += 1;
        Ok(())
    }

    /// Block until a request is framed, dispatch it, and write back the
    /// stamped response.
    ///
    /// # Errors
    /// Propagates any protocol, codec, or I/O error surfaced while framing
    /// or dispatching.
    pub fn wait_for_request<R: Receiver>(&mut self, receiver: &mut R) -> Result<Request, WfdError> {
        let request = self.read_request()?;
        let result = receiver.process_request(&request)?;
        let mut response = result.response;
        if let Some(cseq) = request.cseq() {
            response.headers.prepend("CSeq", cseq.to_string());
        }
        debug!(method = ?request.method, status = response.status.as_u16(), "replying to request");
        let raw = encode(&Message::Response(response))?;
        self.stream.write_all(&raw)?;
        self.stream.flush()?;
        if let Some(follow_up) = result.follow_up {
            debug!(method = ?follow_up.method, "sending follow-up request");
            self.send_request(follow_up, receiver)?;
        }
        Ok(request)
    }

    /// Close the underlying stream if it supports shutdown, otherwise a
    /// no-op drop.
    pub fn teardown(self) {
        drop(self.stream);
    }

    fn read_response(&mut self) -> Result<Response, WfdError> {
        let message = self.read_message()?;
        as_response(&message)
            .cloned()
            .ok_or_else(|| ProtocolError::ForbiddenInPhase("expected response, got request".into()).into())
    }

    fn read_request(&mut self) -> Result<Request, WfdError> {
        let message = self.read_message()?;
        as_request(&message)
            .cloned()
            .ok_or_else(|| ProtocolError::ForbiddenInPhase("expected request, got response".into()).into())
    }

    /// Re-invoke the codec on the existing buffer before blocking on the
    /// stream; only if framing fails does more data get read.
    fn read_message(&mut self) -> Result<Message, WfdError> {
        loop {
            if let Some((message, consumed)) = decode(&self.buffer)? {
                self.buffer.drain(..consumed);
                return Ok(message);
            }
            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk)?;
            if n == 0 {
                return Err(WfdError::Closed);
            }
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}

//! Pure RTSP wire codec: byte slices in, framed messages out.
//!
//! `decode` and `encode` never touch a socket; they operate directly on byte
//! slices so the framing/round-trip properties can be tested without an I/O
//! harness wrapped around them.

use super::headers::Headers;
use super::message::{Content, Message, Method, Request, Response, VERSION};
use super::status::{reason_phrase, StatusCode};

/// Errors that can occur while decoding or encoding a message.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// The start line isn't `METHOD URL VERSION` or `VERSION STATUS REASON`.
    #[error("malformed start line: {0:?}")]
    MalformedStartLine(String),
    /// The status token on a response start line isn't a number.
    #[error("invalid status code: {0:?}")]
    InvalidStatusCode(String),
    /// No complete frame within [`MAX_MESSAGE_SIZE`] bytes.
    #[error("buffer exceeds maximum message size ({0} bytes)")]
    Oversize(usize),
    /// Tried to emit a response with a status code that has no reason phrase.
    #[error("unknown status code on emit: {0}")]
    UnknownStatusOnEmit(u16),
}

/// Buffers larger than this with no complete frame are a fatal framing error
/// (implementations SHOULD impose a ceiling on unbounded peers).
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Attempt to decode the longest leading complete message from `buf`.
///
/// Returns `Ok(None)` if no complete message is framed yet (caller should
/// feed more bytes and retry); never partially consumes a message.
///
/// # Errors
/// Returns [`CodecError`] on a malformed start line, a missing
/// `Content-Length` the body implies, or an oversize buffer with no framed
/// message.
pub fn decode(buf: &[u8]) -> Result<Option<(Message, usize)>, CodecError> {
    let Some(header_end) = find_header_terminator(buf) else {
        if buf.len() > MAX_MESSAGE_SIZE {
            return Err(CodecError::Oversize(buf.len()));
        }
        return Ok(None);
    };

    let head = std::str::from_utf8(&buf[..header_end]).map_err(|_| {
        CodecError::MalformedStartLine(String::from_utf8_lossy(&buf[..header_end]).into_owned())
    })?;
    let mut lines = head.split("\r\n");
    let start_line = lines.next().unwrap_or_default();

    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, ": ");
        let name = parts.next();
        let value = parts.next();
        if let (Some(name), Some(value)) = (name, value) {
            headers.insert(name, value);
        }
    }

    let body_start = header_end + 4;
    let content_length = headers.content_length();
    let total_len = body_start + content_length.unwrap_or(0);
    if buf.len() < total_len {
        if total_len > MAX_MESSAGE_SIZE {
            return Err(CodecError::Oversize(total_len));
        }
        return Ok(None);
    }

    let content = content_length.map(|len| {
        let media_type = headers
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        Content::new(media_type, buf[body_start..body_start + len].to_vec())
    });

    let message = if start_line.starts_with("RTSP") {
        decode_response(start_line, headers, content)?
    } else {
        decode_request(start_line, headers, content)?
    };

    Ok(Some((message, total_len)))
}

fn find_header_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn decode_request(
    start_line: &str,
    headers: Headers,
    content: Option<Content>,
) -> Result<Message, CodecError> {
    let mut tokens = start_line.split(' ');
    let (Some(method), Some(url), Some(_version)) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(CodecError::MalformedStartLine(start_line.to_string()));
    };
    Ok(Message::Request(Request {
        method: Method::from_token(method),
        url: url.to_string(),
        headers,
        content,
    }))
}

fn decode_response(
    start_line: &str,
    headers: Headers,
    content: Option<Content>,
) -> Result<Message, CodecError> {
    let mut tokens = start_line.splitn(3, ' ');
    let (Some(_version), Some(status), _reason) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(CodecError::MalformedStartLine(start_line.to_string()));
    };
    let code: u16 = status
        .parse()
        .map_err(|_| CodecError::InvalidStatusCode(status.to_string()))?;
    Ok(Message::Response(Response {
        status: StatusCode(code),
        headers,
        content,
    }))
}

/// Serialize a message to its wire form.
///
/// # Errors
/// Returns [`CodecError::UnknownStatusOnEmit`] if a response carries a status
/// code absent from the reason-phrase table.
pub fn encode(message: &Message) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    match message {
        Message::Request(r) => {
            out.extend_from_slice(
                format!("{} {} {}\r\n", r.method.as_str(), r.url, VERSION).as_bytes(),
            );
            encode_headers_and_body(&mut out, &r.headers, r.content.as_ref());
        }
        Message::Response(r) => {
            let reason = reason_phrase(r.status.as_u16())
                .ok_or(CodecError::UnknownStatusOnEmit(r.status.as_u16()))?;
            out.extend_from_slice(
                format!("{} {} {}\r\n", VERSION, r.status.as_u16(), reason).as_bytes(),
            );
            encode_headers_and_body(&mut out, &r.headers, r.content.as_ref());
        }
    }
    Ok(out)
}

fn encode_headers_and_body(out: &mut Vec<u8>, headers: &Headers, content: Option<&Content>) {
    for (name, value) in headers.iter() {
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(b"\r\n");
    if let Some(content) = content {
        out.extend_from_slice(&content.bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtsp::headers::names;

    #[test]
    fn decodes_minimal_options_request() {
        let raw = b"OPTIONS * RTSP/1.0\r\nCSeq: 0\r\nRequire: org.wfa.wfd1.0\r\n\r\n";
        let (msg, consumed) = decode(raw).unwrap().unwrap();
        assert_eq!(consumed, raw.len());
        match msg {
            Message::Request(r) => {
                assert_eq!(r.method, Method::Options);
                assert_eq!(r.url, "*");
                assert_eq!(r.headers.cseq(), Some(0));
                assert_eq!(r.headers.get("Require"), Some("org.wfa.wfd1.0"));
            }
            Message::Response(_) => panic!("expected request"),
        }
    }

    #[test]
    fn scenario_1_minimal_options_exchange() {
        let request = Request::new(Method::Options, "*").with_header("CSeq", "0").with_header(
            names::REQUIRE,
            "org.wfa.wfd1.0",
        );
        let mut response = Response::new(StatusCode::OK)
            .with_header(names::CSEQ, "0")
            .with_header(
                names::PUBLIC,
                "org.wfa.wfd1.0, GET_PARAMETER, SET_PARAMETER",
            );
        response.headers.insert(names::CSEQ, "0");
        let raw_request = encode(&Message::Request(request)).unwrap();
        assert_eq!(
            raw_request,
            b"OPTIONS * RTSP/1.0\r\nCSeq: 0\r\nRequire: org.wfa.wfd1.0\r\n\r\n"
        );
        let raw_response = encode(&Message::Response(response)).unwrap();
        assert_eq!(
            raw_response,
            b"RTSP/1.0 200 OK\r\nCSeq: 0\r\nPublic: org.wfa.wfd1.0, GET_PARAMETER, SET_PARAMETER\r\n\r\n"
        );
    }

    #[test]
    fn scenario_2_body_round_trip() {
        let request = Request::new(Method::GetParameter, "rtsp://localhost/wfd1.0")
            .with_header("CSeq", "1")
            .with_content(Content::text_parameters("wfd_video_formats\r\n"));
        let raw = encode(&Message::Request(request.clone())).unwrap();
        let (decoded, consumed) = decode(&raw).unwrap().unwrap();
        assert_eq!(consumed, raw.len());
        match decoded {
            Message::Request(r) => {
                assert_eq!(r.headers.content_type(), Some("text/parameters"));
                assert_eq!(r.headers.content_length(), Some(19));
                assert_eq!(r.content.unwrap().bytes, b"wfd_video_formats\r\n".to_vec());
            }
            Message::Response(_) => panic!("expected request"),
        }
    }

    #[test]
    fn incomplete_header_returns_none() {
        let raw = b"OPTIONS * RTSP/1.0\r\nCSeq: 0\r\n";
        assert_eq!(decode(raw).unwrap(), None);
    }

    #[test]
    fn incomplete_body_returns_none() {
        let raw = b"OPTIONS * RTSP/1.0\r\nCSeq: 0\r\nContent-Length: 10\r\n\r\nshort";
        assert_eq!(decode(raw).unwrap(), None);
    }

    #[test]
    fn framing_with_tail_leaves_extra_bytes() {
        let raw = b"OPTIONS * RTSP/1.0\r\nCSeq: 0\r\n\r\n";
        let mut buf = raw.to_vec();
        buf.extend_from_slice(b"garbage-tail");
        let (_, consumed) = decode(&buf).unwrap().unwrap();
        assert_eq!(consumed, raw.len());
    }

    #[test]
    fn header_value_containing_separator_is_truncated() {
        let raw = b"OPTIONS * RTSP/1.0\r\nX-Odd: a: b: c\r\n\r\n";
        let (msg, _) = decode(raw).unwrap().unwrap();
        assert_eq!(msg.headers().get("X-Odd"), Some("a"));
    }

    #[test]
    fn header_line_without_separator_is_ignored() {
        let raw = b"OPTIONS * RTSP/1.0\r\nNoSeparatorHere\r\nCSeq: 2\r\n\r\n";
        let (msg, _) = decode(raw).unwrap().unwrap();
        assert_eq!(msg.headers().len(), 1);
        assert_eq!(msg.cseq(), Some(2));
    }

    #[test]
    fn unknown_status_on_emit_is_an_error() {
        let response = Response::new(StatusCode(999)).with_header("CSeq", "0");
        assert_eq!(
            encode(&Message::Response(response)),
            Err(CodecError::UnknownStatusOnEmit(999))
        );
    }

    #[test]
    fn status_250_emits_correct_reason() {
        let response = Response::new(StatusCode(250)).with_header("CSeq", "0");
        let raw = encode(&Message::Response(response)).unwrap();
        assert!(raw.starts_with(b"RTSP/1.0 250 Low on Storage Space\r\n"));
    }

    #[test]
    fn unrecognized_method_still_frames_as_a_request() {
        let raw = b"FOO * RTSP/1.0\r\nCSeq: 2\r\n\r\n";
        let (msg, _) = decode(raw).unwrap().unwrap();
        match msg {
            Message::Request(r) => assert_eq!(r.method, Method::Other("FOO".to_string())),
            Message::Response(_) => panic!("expected request"),
        }
    }
}

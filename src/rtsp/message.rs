//! RTSP message model: requests, responses, and content bodies.

use super::headers::{names, Headers};
use super::status::StatusCode;

/// Fixed RTSP version token carried by every message.
pub const VERSION: &str = "RTSP/1.0";

/// An RTSP request method.
///
/// Wire classification never rejects an unrecognized method token: it is
/// carried as `Other`, and it is the session layer's job to reply
/// `406 Not Acceptable` for anything it has no handler for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `OPTIONS`
    Options,
    /// `GET_PARAMETER`
    GetParameter,
    /// `SET_PARAMETER`
    SetParameter,
    /// `SETUP`
    Setup,
    /// `PLAY`
    Play,
    /// `PAUSE`
    Pause,
    /// `TEARDOWN`
    Teardown,
    /// Any other method token.
    Other(String),
}

impl Method {
    /// The wire token for this method, e.g. `"GET_PARAMETER"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Method::Options => "OPTIONS",
            Method::GetParameter => "GET_PARAMETER",
            Method::SetParameter => "SET_PARAMETER",
            Method::Setup => "SETUP",
            Method::Play => "PLAY",
            Method::Pause => "PAUSE",
            Method::Teardown => "TEARDOWN",
            Method::Other(token) => token,
        }
    }

    /// Parse a method token from a start line. Infallible: an unrecognized
    /// token becomes `Method::Other`.
    #[must_use]
    pub fn from_token(s: &str) -> Self {
        match s {
            "OPTIONS" => Method::Options,
            "GET_PARAMETER" => Method::GetParameter,
            "SET_PARAMETER" => Method::SetParameter,
            "SETUP" => Method::Setup,
            "PLAY" => Method::Play,
            "PAUSE" => Method::Pause,
            "TEARDOWN" => Method::Teardown,
            other => Method::Other(other.to_string()),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Method::from_token(s))
    }
}

/// A typed body: a media type paired with raw bytes.
///
/// Attaching content to a message keeps `Content-Type`/`Content-Length`
/// in lockstep; see `Message::set_content`/`clear_content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// The `Content-Type` this body carries, e.g. `"text/parameters"`.
    pub media_type: String,
    /// The raw body bytes (the `Content-Length` is their count).
    pub bytes: Vec<u8>,
}

impl Content {
    /// Build a typed body from a media type and raw bytes.
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// A `text/parameters` body built from a UTF-8 string.
    pub fn text_parameters(body: impl Into<String>) -> Self {
        Self::new("text/parameters", body.into().into_bytes())
    }
}

/// An RTSP request: `METHOD URL VERSION` plus headers and optional content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The request method.
    pub method: Method,
    /// The request target, e.g. `"rtsp://localhost/wfd1.0"` or `"*"`.
    pub url: String,
    /// Headers in insertion order.
    pub headers: Headers,
    /// Optional typed body.
    pub content: Option<Content>,
}

/// An RTSP response: `VERSION STATUS REASON` plus headers and optional content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The status code; the reason phrase is derived from it on serialization.
    pub status: StatusCode,
    /// Headers in insertion order.
    pub headers: Headers,
    /// Optional typed body.
    pub content: Option<Content>,
}

/// A framed RTSP message: either a request or a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A request sent by either peer.
    Request(Request),
    /// A response sent by either peer.
    Response(Response),
}

impl Request {
    /// A request with no headers and no content.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            content: None,
        }
    }

    /// Insert a header, returning `self` for chaining.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach content, returning `self` for chaining.
    #[must_use]
    pub fn with_content(mut self, content: Content) -> Self {
        self.set_content(Some(content));
        self
    }

    /// Attach or clear content, keeping `Content-Type`/`Content-Length` consistent.
    pub fn set_content(&mut self, content: Option<Content>) {
        set_content(&mut self.headers, &mut self.content, content);
    }

    /// The `CSeq` header, parsed as an integer.
    #[must_use]
    pub fn cseq(&self) -> Option<u32> {
        self.headers.cseq()
    }
}

impl Response {
    /// A response with no headers and no content.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            content: None,
        }
    }

    /// Insert a header, returning `self` for chaining.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach content, returning `self` for chaining.
    #[must_use]
    pub fn with_content(mut self, content: Content) -> Self {
        self.set_content(Some(content));
        self
    }

    /// Attach or clear content, keeping `Content-Type`/`Content-Length` consistent.
    pub fn set_content(&mut self, content: Option<Content>) {
        set_content(&mut self.headers, &mut self.content, content);
    }

    /// The `CSeq` header, parsed as an integer.
    #[must_use]
    pub fn cseq(&self) -> Option<u32> {
        self.headers.cseq()
    }
}

fn set_content(headers: &mut Headers, slot: &mut Option<Content>, content: Option<Content>) {
    if let Some(c) = &content {
        headers.insert(names::CONTENT_TYPE, c.media_type.clone());
        headers.insert(names::CONTENT_LENGTH, c.bytes.len().to_string());
    } else {
        headers.remove(names::CONTENT_TYPE);
        headers.remove(names::CONTENT_LENGTH);
    }
    *slot = content;
}

impl Message {
    /// The headers of either variant.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        match self {
            Message::Request(r) => &r.headers,
            Message::Response(r) => &r.headers,
        }
    }

    /// The `CSeq` header, parsed as an integer.
    #[must_use]
    pub fn cseq(&self) -> Option<u32> {
        self.headers().cseq()
    }

    /// Overwrite the `CSeq` header on either variant.
    pub fn set_cseq(&mut self, cseq: u32) {
        let headers = match self {
            Message::Request(r) => &mut r.headers,
            Message::Response(r) => &mut r.headers,
        };
        headers.insert(names::CSEQ, cseq.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_content_keeps_headers_consistent() {
        let mut req = Request::new(Method::GetParameter, "rtsp://localhost/wfd1.0");
        req.set_content(Some(Content::text_parameters("wfd_video_formats\r\n")));
        assert_eq!(req.headers.content_type(), Some("text/parameters"));
        assert_eq!(req.headers.content_length(), Some(19));
        req.set_content(None);
        assert_eq!(req.headers.content_type(), None);
        assert_eq!(req.headers.content_length(), None);
    }

    #[test]
    fn method_round_trips_through_str() {
        for m in [
            Method::Options,
            Method::GetParameter,
            Method::SetParameter,
            Method::Setup,
            Method::Play,
            Method::Pause,
            Method::Teardown,
        ] {
            let s = m.as_str();
            assert_eq!(s.parse::<Method>().unwrap(), m);
        }
    }
}

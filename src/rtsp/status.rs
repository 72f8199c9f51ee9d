//! RTSP status codes and reason phrases

/// An RTSP response status code (100-599).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// `100 Continue`.
    pub const CONTINUE: StatusCode = StatusCode(100);
    /// `200 OK`.
    pub const OK: StatusCode = StatusCode(200);
    /// `201 Created`.
    pub const CREATED: StatusCode = StatusCode(201);
    /// `406 Not Acceptable`.
    pub const NOT_ACCEPTABLE: StatusCode = StatusCode(406);

    /// Number of the status code.
    #[must_use]
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// `2xx`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// `4xx`.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// `5xx`.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// Look up the reason phrase for this status code.
    ///
    /// Returns `None` for codes outside the table; serializing such a code
    /// is a programmer error.
    #[must_use]
    pub fn reason(&self) -> Option<&'static str> {
        reason_phrase(self.0)
    }
}

/// Reason-phrase table for the RTSP status codes WFD devices use.
#[must_use]
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    Some(match code {
        100 => "Continue",
        200 => "OK",
        201 => "Created",
        250 => "Low on Storage Space",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Moved Temporarily",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Time-out",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request-URI Too Large",
        415 => "Unsupported Media Type",
        451 => "Parameter Not Understood",
        452 => "Conference Not Found",
        453 => "Not Enough Bandwidth",
        454 => "Session Not Found",
        455 => "Method Not Valid in This State",
        456 => "Header Field Not Valid for Resource",
        457 => "Invalid Range",
        458 => "Parameter Is Read-Only",
        459 => "Aggregate operation not allowed",
        460 => "Only aggregate operation allowed",
        461 => "Unsupported transport",
        462 => "Destination unreachable",
        463 => "Key management Failure",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Time-out",
        505 => "RTSP Version not supported",
        551 => "Option not supported",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_reasons() {
        assert_eq!(StatusCode(200).reason(), Some("OK"));
        assert_eq!(StatusCode(250).reason(), Some("Low on Storage Space"));
        assert_eq!(StatusCode(406).reason(), Some("Not Acceptable"));
        assert_eq!(StatusCode(551).reason(), Some("Option not supported"));
    }

    #[test]
    fn unknown_code_has_no_reason() {
        assert_eq!(StatusCode(999).reason(), None);
    }
}

//! Ordered RTSP header collection

/// Well-known RTSP header names used by the WFD handshake.
pub mod names {
    /// `CSeq`
    pub const CSEQ: &str = "CSeq";
    /// `Content-Type`
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// `Content-Length`
    pub const CONTENT_LENGTH: &str = "Content-Length";
    /// `Session`
    pub const SESSION: &str = "Session";
    /// `Transport`
    pub const TRANSPORT: &str = "Transport";
    /// `Require`
    pub const REQUIRE: &str = "Require";
    /// `Public`
    pub const PUBLIC: &str = "Public";
}

/// An ordered, case-insensitive-lookup RTSP header collection.
///
/// Insertion order is preserved on serialization. A
/// fresh `Headers` always starts empty — no process-wide shared default,
/// avoiding a shared-default aliasing hazard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header, preserving its first-seen position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    /// Insert or replace a header, forcing it to the front. Used for `CSeq`,
    /// which RTSP implementations conventionally emit as the first header
    /// on a response regardless of what the handler already populated.
    pub fn prepend(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.0.insert(0, (name, value.into()));
    }

    /// Remove a header by name (case-insensitive).
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Look up a header value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The `CSeq` header, parsed as an integer.
    #[must_use]
    pub fn cseq(&self) -> Option<u32> {
        self.get(names::CSEQ)?.parse().ok()
    }

    /// The `Content-Length` header, parsed as an integer.
    #[must_use]
    pub fn content_length(&self) -> Option<usize> {
        self.get(names::CONTENT_LENGTH)?.parse().ok()
    }

    /// The `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get(names::CONTENT_TYPE)
    }

    /// Iterate headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut h = Headers::new();
        h.insert("CSeq", "0");
        h.insert("Require", "org.wfa.wfd1.0");
        h.insert("Public", "org.wfa.wfd1.0, GET_PARAMETER, SET_PARAMETER");
        let names: Vec<&str> = h.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["CSeq", "Require", "Public"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut h = Headers::new();
        h.insert("CSeq", "0");
        h.insert("Require", "org.wfa.wfd1.0");
        h.insert("CSeq", "1");
        let names: Vec<&str> = h.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["CSeq", "Require"]);
        assert_eq!(h.get("CSeq"), Some("1"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut h = Headers::new();
        h.insert("Content-Type", "text/parameters");
        assert_eq!(h.get("content-type"), Some("text/parameters"));
    }

    #[test]
    fn fresh_headers_never_alias() {
        let a = Headers::new();
        let mut b = Headers::new();
        b.insert("CSeq", "5");
        assert!(a.is_empty());
        assert_eq!(b.len(), 1);
    }
}

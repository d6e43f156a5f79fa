//! SHIORI response construction and completion.

use std::fmt;

use bytes::{BufMut, BytesMut};

use super::{Headers, reason_phrase};

/// Protocol version written into responses that do not set one themselves.
pub const DEFAULT_VERSION: &str = "3.0";

/// The leading line of a SHIORI response: protocol version and status code.
///
/// Both fields are optional until [`Response::complete`] runs; a handler may
/// build a response with neither and rely on completion to fill them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    version: Option<String>,
    code: Option<u16>,
}

impl StatusLine {
    /// Returns the bare protocol version (e.g. `3.0`), if set.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the numeric status code, if set.
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// Sets the bare protocol version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// Sets the numeric status code.
    pub fn set_code(&mut self, code: u16) {
        self.code = Some(code);
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.version.as_deref().unwrap_or(DEFAULT_VERSION);
        let code = self.code.unwrap_or(0);
        write!(f, "SHIORI/{} {} {}", version, code, reason_phrase(code))
    }
}

/// A SHIORI response, mutable until completed.
///
/// Created either by the builders in [`crate::respond`] or directly by a
/// handler, then run through [`complete`](Self::complete) before
/// serialization. After completion the status line always carries a version
/// and a code.
///
/// # Examples
///
/// ```
/// use shiori_dispatch::{Headers, Response};
///
/// let mut response = Response::new();
/// response.headers_mut().set("Value", "hello");
/// response.complete(&Headers::new());
///
/// assert_eq!(response.status_line().version(), Some("3.0"));
/// assert_eq!(response.status_line().code(), Some(200));
/// assert!(response.to_string().starts_with("SHIORI/3.0 200 OK\r\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    status_line: StatusLine,
    headers: Headers,
}

impl Response {
    /// Creates a response with no status line and no headers — the
    /// uncompleted starting point for building a response manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a response with the given status code and no headers.
    pub fn with_code(code: u16) -> Self {
        let mut response = Self::new();
        response.status_line.set_code(code);
        response
    }

    /// Returns the status line.
    pub fn status_line(&self) -> &StatusLine {
        &self.status_line
    }

    /// Returns a mutable reference to the status line.
    pub fn status_line_mut(&mut self) -> &mut StatusLine {
        &mut self.status_line
    }

    /// Returns the numeric status code, if set.
    pub fn code(&self) -> Option<u16> {
        self.status_line.code()
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns a mutable reference to the response headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Sets a header and returns `self`, for builder-style construction.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Fills in missing status line fields and merges default headers.
    ///
    /// 1. An unset version becomes [`DEFAULT_VERSION`].
    /// 2. An unset code becomes 200 when the `Value` header is present and
    ///    non-empty, 204 otherwise.
    /// 3. Each default header is copied in only when the response does not
    ///    already have that name — presence, not the value, is the test, so
    ///    a header set to the empty string is never overwritten.
    ///
    /// Idempotent: completing an already-complete response again with the
    /// same defaults changes nothing. `defaults` is never mutated.
    pub fn complete(&mut self, defaults: &Headers) -> &mut Self {
        if self.status_line.version.is_none() {
            self.status_line.set_version(DEFAULT_VERSION);
        }
        if self.status_line.code.is_none() {
            let has_value = self.headers.get("Value").is_some_and(|v| !v.is_empty());
            self.status_line.set_code(if has_value { 200 } else { 204 });
        }
        for (name, value) in defaults.iter() {
            if !self.headers.contains(name) {
                self.headers.set(name, value);
            }
        }
        self
    }

    /// Serializes the response into a `BytesMut` buffer in wire form, for
    /// transports that write bytes directly.
    ///
    /// The response should be completed first; an unset version falls back
    /// to [`DEFAULT_VERSION`] and an unset code serializes as `0`.
    pub fn into_bytes(self) -> BytesMut {
        let text = self.to_string();
        let mut buf = BytesMut::with_capacity(text.len());
        buf.put(text.as_bytes());
        buf
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n{}\r\n", self.status_line, self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_fills_version_and_code() {
        let mut r = Response::new();
        r.headers_mut().set("Value", "hi");
        r.complete(&Headers::new());
        assert_eq!(r.status_line().version(), Some("3.0"));
        assert_eq!(r.status_line().code(), Some(200));
    }

    #[test]
    fn complete_picks_204_without_value() {
        let mut r = Response::new();
        r.complete(&Headers::new());
        assert_eq!(r.status_line().code(), Some(204));

        // An empty Value header also yields 204.
        let mut r = Response::new();
        r.headers_mut().set("Value", "");
        r.complete(&Headers::new());
        assert_eq!(r.status_line().code(), Some(204));
    }

    #[test]
    fn complete_keeps_explicit_fields() {
        let mut r = Response::with_code(500);
        r.status_line_mut().set_version("3.1");
        r.complete(&Headers::new());
        assert_eq!(r.status_line().version(), Some("3.1"));
        assert_eq!(r.status_line().code(), Some(500));
    }

    #[test]
    fn complete_merges_defaults_without_overwriting() {
        let defaults: Headers =
            [("Charset", "UTF-8"), ("Value", "default")].into_iter().collect();
        let mut r = Response::new();
        r.headers_mut().set("Value", "mine");
        r.complete(&defaults);
        assert_eq!(r.headers().get("Value"), Some("mine"));
        assert_eq!(r.headers().get("Charset"), Some("UTF-8"));
    }

    #[test]
    fn complete_respects_empty_but_present_header() {
        let defaults: Headers = [("Value", "default")].into_iter().collect();
        let mut r = Response::new();
        r.headers_mut().set("Value", "");
        r.complete(&defaults);
        assert_eq!(r.headers().get("Value"), Some(""));
    }

    #[test]
    fn complete_is_idempotent() {
        let defaults: Headers = [("Charset", "UTF-8")].into_iter().collect();
        let mut once = Response::new();
        once.headers_mut().set("Value", "v");
        once.complete(&defaults);
        let mut twice = once.clone();
        twice.complete(&defaults);
        assert_eq!(once, twice);
    }

    #[test]
    fn wire_form() {
        let mut r = Response::with_code(200);
        r.headers_mut().set("Value", "res");
        r.complete(&Headers::new());
        assert_eq!(r.to_string(), "SHIORI/3.0 200 OK\r\nValue: res\r\n\r\n");
    }

    #[test]
    fn bytes_match_text() {
        let mut r = Response::new();
        r.headers_mut().set("Value", "res");
        r.complete(&Headers::new());
        let text = r.to_string();
        assert_eq!(&r.into_bytes()[..], text.as_bytes());
    }
}

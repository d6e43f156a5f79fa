//! SHIORI request parsing and construction.

use std::fmt;

use thiserror::Error;

use super::Headers;

/// Errors that can occur while parsing a SHIORI request.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request is incomplete — missing terminating blank line")]
    Incomplete,

    #[error("invalid request line: {line:?}")]
    InvalidRequestLine { line: String },

    #[error("invalid protocol version: {version:?}")]
    InvalidVersion { version: String },

    #[error("invalid header line: {line:?}")]
    InvalidHeader { line: String },
}

/// The leading line of a SHIORI request: a method and a protocol version.
///
/// The method is free-form text up to the protocol tag — SHIORI/2.x methods
/// such as `GET Sentence` contain a space, so the method is everything before
/// the final ` SHIORI/` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    version: String,
}

impl RequestLine {
    /// Creates a request line from a method and a bare version (e.g. `"3.0"`).
    pub fn new(method: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            version: version.into(),
        }
    }

    /// Returns the request method (e.g. `GET`).
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the bare protocol version (e.g. `3.0`).
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SHIORI/{}", self.method, self.version)
    }
}

/// A parsed SHIORI request.
///
/// Immutable once handed to the pipeline: created once per inbound message,
/// consumed by exactly one handler invocation, then discarded.
///
/// # Examples
///
/// ```
/// use shiori_dispatch::Request;
///
/// let raw = "GET SHIORI/3.0\r\nCharset: UTF-8\r\nID: OnBoot\r\n\r\n";
/// let request = Request::parse(raw).unwrap();
///
/// assert_eq!(request.method(), "GET");
/// assert_eq!(request.version(), "3.0");
/// assert_eq!(request.headers().get("ID"), Some("OnBoot"));
/// assert_eq!(request.to_string(), raw);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
}

impl Request {
    /// Creates a request with the given method and bare version and no headers.
    pub fn new(method: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            request_line: RequestLine::new(method, version),
            headers: Headers::new(),
        }
    }

    /// Parse a raw SHIORI request from a complete wire string.
    ///
    /// The message must be terminated by a blank line (`\r\n\r\n`). The
    /// request line is split at the final ` SHIORI/` marker so that 2.x
    /// methods containing spaces (`GET Sentence`) parse as well — version
    /// admission is the pipeline's decision, not the parser's.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Incomplete`] — no terminating blank line.
    /// - [`ParseError::InvalidRequestLine`] — no ` SHIORI/` marker or empty method.
    /// - [`ParseError::InvalidVersion`] — version is empty or not `digits.digits`.
    /// - [`ParseError::InvalidHeader`] — a header line has no `:` separator.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let body = text
            .strip_suffix("\r\n\r\n")
            .ok_or(ParseError::Incomplete)?;

        let mut lines = body.split("\r\n");
        let first = lines.next().unwrap_or_default();

        let marker = first
            .rfind(" SHIORI/")
            .ok_or_else(|| ParseError::InvalidRequestLine {
                line: first.to_owned(),
            })?;
        let method = &first[..marker];
        let version = &first[marker + " SHIORI/".len()..];

        if method.is_empty() {
            return Err(ParseError::InvalidRequestLine {
                line: first.to_owned(),
            });
        }
        if version.is_empty()
            || !version.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(ParseError::InvalidVersion {
                version: version.to_owned(),
            });
        }

        let mut headers = Headers::new();
        for line in lines {
            let (name, value) = line.split_once(':').ok_or_else(|| {
                ParseError::InvalidHeader {
                    line: line.to_owned(),
                }
            })?;
            let value = value.strip_prefix(' ').unwrap_or(value);
            headers.set(name, value);
        }

        Ok(Self {
            request_line: RequestLine::new(method, version),
            headers,
        })
    }

    /// Returns the request line.
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    /// Returns the request method.
    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    /// Returns the bare protocol version (e.g. `3.0`).
    pub fn version(&self) -> &str {
        self.request_line.version()
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns a mutable reference to the request headers, for construction.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Returns the `Reference<n>` header value, if present.
    pub fn reference(&self, n: usize) -> Option<&str> {
        self.headers.get(&format!("Reference{n}"))
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n{}\r\n", self.request_line, self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let raw = "GET SHIORI/3.0\r\nCharset: UTF-8\r\nSender: embryo\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.method(), "GET");
        assert_eq!(req.version(), "3.0");
        assert_eq!(req.headers().get("Charset"), Some("UTF-8"));
        assert_eq!(req.headers().get("Sender"), Some("embryo"));
    }

    #[test]
    fn parse_two_x_method_with_space() {
        let raw = "GET Sentence SHIORI/2.6\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.method(), "GET Sentence");
        assert_eq!(req.version(), "2.6");
    }

    #[test]
    fn parse_references() {
        let raw = "GET SHIORI/3.0\r\nID: OnChoiceSelect\r\nReference0: kero\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.reference(0), Some("kero"));
        assert_eq!(req.reference(1), None);
    }

    #[test]
    fn unparsable_text() {
        assert!(matches!(
            Request::parse("foo"),
            Err(ParseError::Incomplete)
        ));
        assert!(matches!(
            Request::parse("foo\r\n\r\n"),
            Err(ParseError::InvalidRequestLine { .. })
        ));
    }

    #[test]
    fn bad_version() {
        assert!(matches!(
            Request::parse("GET SHIORI/x.y\r\n\r\n"),
            Err(ParseError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn bad_header_line() {
        let raw = "GET SHIORI/3.0\r\nno separator here\r\n\r\n";
        assert!(matches!(
            Request::parse(raw),
            Err(ParseError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn display_round_trip() {
        let raw = "GET SHIORI/3.0\r\nID: OnBoot\r\nReference0: master\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.to_string(), raw);
        assert_eq!(Request::parse(&req.to_string()).unwrap(), req);
    }

    #[test]
    fn constructed_request() {
        let mut req = Request::new("GET", "3.0");
        req.headers_mut().set("Charset", "UTF-8");
        assert_eq!(req.to_string(), "GET SHIORI/3.0\r\nCharset: UTF-8\r\n\r\n");
    }
}

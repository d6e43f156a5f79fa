//! SHIORI protocol types and parsing.
//!
//! This module provides the core protocol primitives:
//! [`StatusCode`], [`Headers`], [`Request`], and [`Response`].

use std::fmt;

pub mod headers;
pub mod request;
pub mod response;

pub use headers::Headers;
pub use request::{ParseError, Request, RequestLine};
pub use response::{DEFAULT_VERSION, Response, StatusLine};

/// A SHIORI response status code.
///
/// The protocol defines a small fixed set of codes; [`Response`] stores a
/// plain `u16` so handlers may set codes outside this set, but everything the
/// pipeline produces itself uses one of these.
///
/// # Examples
///
/// ```
/// use shiori_dispatch::StatusCode;
///
/// let status = StatusCode::NoContent;
/// assert_eq!(status.as_u16(), 204);
/// assert_eq!(status.canonical_reason(), "No Content");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    // 2xx Success
    Ok = 200,
    NoContent = 204,

    // 3xx Communicate
    Communicate = 310,
    NotEnough = 311,
    Advice = 312,

    // 4xx Client Error
    BadRequest = 400,

    // 5xx Server Error
    InternalServerError = 500,
}

impl StatusCode {
    /// Returns the numeric status code as a `u16`.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the canonical reason phrase for this status code.
    pub fn canonical_reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoContent => "No Content",
            Self::Communicate => "Communicate",
            Self::NotEnough => "Not Enough",
            Self::Advice => "Advice",
            Self::BadRequest => "Bad Request",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.canonical_reason())
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> u16 {
        code.as_u16()
    }
}

/// Returns the reason phrase for a numeric status code, or `"Undefined"` for
/// codes outside the protocol's set.
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => StatusCode::Ok.canonical_reason(),
        204 => StatusCode::NoContent.canonical_reason(),
        310 => StatusCode::Communicate.canonical_reason(),
        311 => StatusCode::NotEnough.canonical_reason(),
        312 => StatusCode::Advice.canonical_reason(),
        400 => StatusCode::BadRequest.canonical_reason(),
        500 => StatusCode::InternalServerError.canonical_reason(),
        _ => "Undefined",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::BadRequest.as_u16(), 400);
        assert_eq!(u16::from(StatusCode::InternalServerError), 500);
    }

    #[test]
    fn reason_lookup() {
        assert_eq!(reason_phrase(204), "No Content");
        assert_eq!(reason_phrase(310), "Communicate");
        assert_eq!(reason_phrase(999), "Undefined");
    }

    #[test]
    fn display() {
        assert_eq!(StatusCode::Ok.to_string(), "200 OK");
    }
}

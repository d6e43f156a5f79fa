//! Canonical response builders for the fixed protocol outcomes.
//!
//! Each builder is side-effect-free and returns a fresh [`Response`]. The
//! responses come back uncompleted — the pipeline runs them through
//! [`Response::complete`] before serialization, so builders only set what is
//! specific to their outcome.

use std::error::Error;
use std::fmt;

use crate::message::{Response, StatusCode};

/// Header the 500 builders store their diagnostic in by default.
pub const ERROR_HEADER: &str = "X-Shiori-Error";

/// Normal response: 200 OK with a `Value` header, or 204 No Content when the
/// value's string form is empty.
///
/// Numbers convert through their standard decimal `Display` form.
///
/// # Examples
///
/// ```
/// use shiori_dispatch::respond;
///
/// assert_eq!(respond::ok("hello").headers().get("Value"), Some("hello"));
/// assert_eq!(respond::ok(42).headers().get("Value"), Some("42"));
/// assert_eq!(respond::ok("").code(), Some(204));
/// ```
pub fn ok(value: impl fmt::Display) -> Response {
    let value = value.to_string();
    if value.is_empty() {
        no_content()
    } else {
        Response::with_code(StatusCode::Ok.as_u16()).header("Value", value)
    }
}

/// Like [`ok`], additionally addressing another character: sets `Reference0`
/// to `to` for communication. An empty value still collapses to
/// [`no_content`] and carries no `Reference0`.
pub fn ok_to(value: impl fmt::Display, to: impl Into<String>) -> Response {
    let value = value.to_string();
    if value.is_empty() {
        no_content()
    } else {
        Response::with_code(StatusCode::Ok.as_u16())
            .header("Value", value)
            .header("Reference0", to)
    }
}

/// 204 No Content, no headers.
pub fn no_content() -> Response {
    Response::with_code(StatusCode::NoContent.as_u16())
}

/// 400 Bad Request, no headers.
pub fn bad_request() -> Response {
    Response::with_code(StatusCode::BadRequest.as_u16())
}

/// 500 Internal Server Error, no headers.
pub fn internal_server_error() -> Response {
    Response::with_code(StatusCode::InternalServerError.as_u16())
}

/// 500 Internal Server Error carrying a diagnostic in [`ERROR_HEADER`].
///
/// The diagnostic is the error's full source chain flattened to a single
/// line — headers are one-per-line on the wire, so raw line breaks must not
/// reach the header value.
pub fn internal_server_error_from(error: &(dyn Error + 'static)) -> Response {
    internal_server_error_in(error, ERROR_HEADER)
}

/// Like [`internal_server_error_from`] with a caller-chosen header name.
pub fn internal_server_error_in(
    error: &(dyn Error + 'static),
    header_name: impl Into<String>,
) -> Response {
    Response::with_code(StatusCode::InternalServerError.as_u16())
        .header(header_name, diagnostic(error))
}

/// A response with no status line and no headers — the uncompleted starting
/// point for building a response manually.
pub fn empty() -> Response {
    Response::new()
}

/// Renders an error and its source chain as a single header-safe line.
///
/// Each cause gets its own `caused by:` segment; any CR/LF sequence is
/// replaced with the literal two characters `\n`.
fn diagnostic(error: &(dyn Error + 'static)) -> String {
    let mut trace = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        trace.push('\n');
        trace.push_str("caused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    flatten_line(&trace)
}

/// Replaces every CR/LF sequence with the literal two-character escape `\n`.
fn flatten_line(text: &str) -> String {
    text.replace("\r\n", "\\n")
        .replace(['\r', '\n'], "\\n")
}

//! Handler contract and outcome normalization.
//!
//! A handler is the caller-supplied function implementing the actual
//! request-answering logic. Its return contract is heterogeneous — nothing,
//! a string, a number, a pre-built [`Response`], or a failure — so the
//! contract is modeled as the closed sum type [`Outcome`] plus the
//! [`IntoOutcome`] conversion trait. [`normalize`] maps a settled outcome
//! into a canonical response; the pipeline awaits sync and async handlers
//! uniformly before normalizing.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::message::{Request, Response};
use crate::respond;

/// Error type handler failures travel as.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// The settled result of a handler invocation, before normalization.
///
/// Types outside this contract simply do not convert: the trait is closed,
/// so booleans, collections, and the like are rejected at compile time
/// rather than coerced at run time.
#[derive(Debug)]
pub enum Outcome {
    /// The handler produced no value.
    Empty,
    /// A string value, destined for the `Value` header.
    Text(String),
    /// A numeric value, converted to its decimal string form.
    Number(f64),
    /// A full response, passed through unchanged.
    Response(Response),
}

/// Conversion into a settled handler outcome.
///
/// Implemented for the documented handler return types; `Result` carries
/// failures and `Option` treats `None` as absence of a value.
pub trait IntoOutcome {
    /// Converts `self` into an outcome or a failure.
    fn into_outcome(self) -> Result<Outcome, BoxError>;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(self)
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Empty)
    }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Text(self))
    }
}

impl IntoOutcome for &'static str {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Text(self.to_owned()))
    }
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Response(self))
    }
}

macro_rules! impl_into_outcome_for_number {
    ($($ty:ty),*) => {
        $(
            impl IntoOutcome for $ty {
                fn into_outcome(self) -> Result<Outcome, BoxError> {
                    Ok(Outcome::Number(self as f64))
                }
            }
        )*
    };
}

impl_into_outcome_for_number!(i32, i64, u32, f64);

impl<T: IntoOutcome> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        match self {
            Some(value) => value.into_outcome(),
            None => Ok(Outcome::Empty),
        }
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        match self {
            Ok(value) => value.into_outcome(),
            Err(error) => Err(error.into()),
        }
    }
}

/// The request handler contract.
///
/// Any `Fn(Request) -> impl Future` whose output converts via [`IntoOutcome`]
/// implements this trait automatically through the blanket impl below, so
/// both `|req| async { 1 }` and handlers returning `Result<Response, E>`
/// work without adapters. Handlers are shared across concurrent dispatches,
/// hence `Send + Sync`.
pub trait Handler: Send + Sync + 'static {
    /// Invokes the handler, boxing the returned future.
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Result<Outcome, BoxError>> + Send>>;
}

impl<T, F, R> Handler for T
where
    T: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn call(&self, request: Request) -> Pin<Box<dyn Future<Output = Result<Outcome, BoxError>> + Send>> {
        let future = (self)(request);
        Box::pin(async move { future.await.into_outcome() })
    }
}

/// Maps a settled handler outcome into a canonical response.
///
/// | Outcome | Response |
/// |---|---|
/// | `Empty` | 204 No Content |
/// | `Text` / `Number` | [`respond::ok`] (204 when the string form is empty) |
/// | `Response` | passed through unchanged |
/// | failure | 500 with the error's diagnostic |
pub fn normalize(outcome: Result<Outcome, BoxError>) -> Response {
    match outcome {
        Ok(Outcome::Empty) => respond::no_content(),
        Ok(Outcome::Text(value)) => respond::ok(value),
        Ok(Outcome::Number(value)) => respond::ok(value),
        Ok(Outcome::Response(response)) => response,
        Err(error) => {
            let error: &(dyn Error + 'static) = &*error;
            respond::internal_server_error_from(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(value: impl IntoOutcome) -> Response {
        normalize(value.into_outcome())
    }

    #[test]
    fn empty_becomes_no_content() {
        assert_eq!(settle(()).code(), Some(204));
        assert_eq!(settle(None::<String>).code(), Some(204));
    }

    #[test]
    fn text_becomes_ok() {
        let r = settle("str");
        assert_eq!(r.code(), Some(200));
        assert_eq!(r.headers().get("Value"), Some("str"));
    }

    #[test]
    fn empty_text_becomes_no_content() {
        assert_eq!(settle(String::new()).code(), Some(204));
    }

    #[test]
    fn numbers_use_decimal_form() {
        assert_eq!(settle(42).headers().get("Value"), Some("42"));
        assert_eq!(settle(0).headers().get("Value"), Some("0"));
        assert_eq!(settle(0).code(), Some(200));
        assert_eq!(settle(1.5).headers().get("Value"), Some("1.5"));
    }

    #[test]
    fn response_passes_through() {
        let r = settle(respond::ok("res"));
        assert_eq!(r.code(), Some(200));
        assert_eq!(r.headers().get("Value"), Some("res"));
    }

    #[test]
    fn failure_becomes_internal_error() {
        let failing: Result<(), BoxError> = Err("boom".into());
        let r = settle(failing);
        assert_eq!(r.code(), Some(500));
        assert_eq!(r.headers().get(respond::ERROR_HEADER), Some("boom"));
    }

    #[tokio::test]
    async fn handler_blanket_impl_awaits_sync_and_async() {
        let sync_style: &dyn Handler = &|_req: Request| async { 1 };
        let outcome = sync_style.call(Request::new("GET", "3.0")).await;
        assert!(matches!(outcome, Ok(Outcome::Number(n)) if n == 1.0));

        let async_style: &dyn Handler = &|_req: Request| async {
            tokio::task::yield_now().await;
            "later"
        };
        let outcome = async_style.call(Request::new("GET", "3.0")).await;
        assert!(matches!(outcome, Ok(Outcome::Text(ref s)) if s == "later"));
    }
}

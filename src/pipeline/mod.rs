//! Request pipeline — admission, handler invocation, normalization, completion.
//!
//! [`Pipeline`] is the orchestrator: it accepts raw wire text or a pre-parsed
//! [`Request`], rejects unsupported protocol versions, awaits the caller's
//! handler, normalizes whatever the handler produced into a canonical
//! [`Response`], and completes it with the pipeline's default headers. Every
//! failure is recovered locally into a well-formed response — a
//! malfunctioning handler can never crash the host or leave a request
//! unanswered.

use std::error::Error;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, warn};

use crate::handler::{BoxError, Handler, IntoOutcome, normalize};
use crate::message::{Headers, ParseError, Request, Response};
use crate::respond;

/// Default-header table shared between a pipeline and its creator.
///
/// The pipeline holds a live reference, not a snapshot: writes the owner
/// makes between dispatches are visible on the next dispatch. Callers who
/// need a stable snapshot must copy the table before constructing the
/// pipeline.
pub type SharedHeaders = Arc<RwLock<Headers>>;

/// The parser collaborator: turns raw wire text into a [`Request`].
///
/// The pipeline treats any parse failure uniformly as a bad request and does
/// not inspect the error's shape.
pub trait RequestParser: Send + Sync {
    /// Parses a complete request message.
    fn parse(&self, text: &str) -> Result<Request, ParseError>;
}

/// The built-in parser, delegating to [`Request::parse`]. Installed by
/// default on every new pipeline.
#[derive(Debug, Default)]
pub struct WireParser;

impl RequestParser for WireParser {
    fn parse(&self, text: &str) -> Result<Request, ParseError> {
        Request::parse(text)
    }
}

/// Pipeline input: raw wire text or an already-parsed request.
#[derive(Debug)]
pub enum Input {
    /// A raw request string; the pipeline's parser will run on it.
    Raw(String),
    /// A pre-parsed request; the parser is bypassed entirely.
    Parsed(Request),
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_owned())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<Request> for Input {
    fn from(request: Request) -> Self {
        Self::Parsed(request)
    }
}

/// Failures the pipeline recovers into responses. Never escapes a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Raw text failed to parse.
    #[error("malformed request: {0}")]
    Malformed(#[from] ParseError),

    /// The request declared a 2.x protocol version, whose message grammar is
    /// incompatible with this pipeline's 3.x generation.
    #[error("unsupported protocol version {version}")]
    UnsupportedVersion { version: String },

    /// Raw text was dispatched but no parser is configured.
    #[error("parser not found")]
    MissingParser,

    /// The handler failed or its asynchronous outcome rejected.
    #[error("handler failed")]
    Handler(#[source] BoxError),
}

impl DispatchError {
    /// Converts the failure into its terminal response. Handler failures
    /// carry the underlying error's diagnostic, not the wrapper's.
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(_) | Self::UnsupportedVersion { .. } => respond::bad_request(),
            Self::MissingParser => respond::internal_server_error_from(&Self::MissingParser),
            Self::Handler(error) => {
                let error: &(dyn Error + 'static) = &*error;
                respond::internal_server_error_from(error)
            }
        }
    }
}

/// The request-handling pipeline.
///
/// Stateless across requests apart from the shared default-header table,
/// which the pipeline reads on every dispatch and never writes. A single
/// pipeline may serve concurrent dispatches; the handler invocation is the
/// only suspension point, and the pipeline imposes no timeout of its own.
///
/// # Examples
///
/// ```
/// use shiori_dispatch::{Pipeline, Request};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let pipeline = Pipeline::new(|request: Request| async move {
///     match request.headers().get("ID") {
///         Some("OnBoot") => "\\h\\s[0]Hello.\\e",
///         _ => "",
///     }
/// });
///
/// let response = pipeline
///     .dispatch("GET SHIORI/3.0\r\nID: OnBoot\r\n\r\n")
///     .await;
/// assert_eq!(response.status_line().code(), Some(200));
/// # }
/// ```
pub struct Pipeline {
    handler: Arc<dyn Handler>,
    parser: Option<Arc<dyn RequestParser>>,
    default_headers: SharedHeaders,
}

impl Pipeline {
    /// Creates a pipeline around a handler, with the built-in [`WireParser`]
    /// and an empty default-header table.
    pub fn new<H, F, R>(handler: H) -> Self
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = R> + Send + 'static,
        R: IntoOutcome + Send + 'static,
    {
        Self {
            handler: Arc::new(handler),
            parser: Some(Arc::new(WireParser)),
            default_headers: Arc::new(RwLock::new(Headers::new())),
        }
    }

    /// Seeds the default-header table.
    #[must_use]
    pub fn with_default_headers(mut self, headers: Headers) -> Self {
        self.default_headers = Arc::new(RwLock::new(headers));
        self
    }

    /// Aliases an existing shared default-header table. Writes the owner
    /// makes through its own handle are visible on subsequent dispatches.
    #[must_use]
    pub fn with_shared_default_headers(mut self, headers: SharedHeaders) -> Self {
        self.default_headers = headers;
        self
    }

    /// Replaces the built-in parser with a custom collaborator.
    #[must_use]
    pub fn with_parser(mut self, parser: impl RequestParser + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Removes the parser. Dispatching raw text afterwards is an internal
    /// configuration error and yields a 500 response.
    #[must_use]
    pub fn without_parser(mut self) -> Self {
        self.parser = None;
        self
    }

    /// Returns a handle to the shared default-header table, for mutation
    /// between dispatches.
    pub fn default_headers(&self) -> SharedHeaders {
        Arc::clone(&self.default_headers)
    }

    /// Dispatches a request and returns the completed structured response.
    ///
    /// Accepts raw wire text or a pre-parsed [`Request`]. Never fails: every
    /// error condition is converted into a well-formed response.
    pub async fn dispatch(&self, input: impl Into<Input>) -> Response {
        let mut response = self.execute(input.into()).await;
        let defaults = self
            .default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        response.complete(&defaults);
        response
    }

    /// Dispatches a request and returns the serialized wire string.
    ///
    /// A serialization wrapper over [`dispatch`](Self::dispatch); the
    /// completion logic is not duplicated here.
    pub async fn dispatch_text(&self, input: impl Into<Input>) -> String {
        self.dispatch(input).await.to_string()
    }

    /// Runs the per-request state machine up to (but not including)
    /// completion.
    async fn execute(&self, input: Input) -> Response {
        let request = match self.admit(input) {
            Ok(request) => request,
            Err(error) => {
                match &error {
                    DispatchError::MissingParser => {
                        warn!(error = %error, "pipeline misconfigured");
                    }
                    _ => debug!(error = %error, "request rejected"),
                }
                return error.into_response();
            }
        };

        debug!(
            method = %request.method(),
            version = %request.version(),
            "invoking handler"
        );

        match self.handler.call(request).await {
            Ok(outcome) => normalize(Ok(outcome)),
            Err(error) => {
                let error = DispatchError::Handler(error);
                warn!(error = %error, "handler failed");
                error.into_response()
            }
        }
    }

    /// Parses raw input if needed and enforces protocol-version admission.
    /// The handler is never invoked for a request rejected here.
    fn admit(&self, input: Input) -> Result<Request, DispatchError> {
        let request = match input {
            Input::Parsed(request) => request,
            Input::Raw(text) => {
                let parser = self
                    .parser
                    .as_deref()
                    .ok_or(DispatchError::MissingParser)?;
                parser.parse(&text)?
            }
        };

        // This pipeline speaks only the 3.x generation; 2.x uses an
        // incompatible message grammar.
        if request.version().starts_with('2') {
            return Err(DispatchError::UnsupportedVersion {
                version: request.version().to_owned(),
            });
        }

        Ok(request)
    }
}

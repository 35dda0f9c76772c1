//! Typed error carried through the authentication pipeline.
//!
//! An [`Error`] bundles a closed [`ErrorKind`], an HTTP status hint, a human
//! message, optional details, the wrapped [`Cause`] and the call [`Stack`]
//! recorded where it was constructed.

pub mod kind;
pub mod stack;

use std::any::Any;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

pub use kind::ErrorKind;
pub use kind::UnknownKind;
pub use stack::Stack;
pub use stack::StackFrame;
pub use stack::MAX_STACK_DEPTH;

/// Path prefix shared by the capturing constructors below.
const CONSTRUCTOR_PATH: &str = concat!(module_path!(), "::Error::");

/// Plain text used as a cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MessageError(pub String);

/// What an [`Error`] wraps, fixed when the error is built.
#[derive(Debug, Clone)]
pub enum Cause {
    /// Another typed error, kept by [`Error::translate`].
    Typed(Box<Error>),
    /// Any other error value.
    Error {
        error: Arc<dyn StdError + Send + Sync>,
        type_name: &'static str,
    },
    /// Free-form text.
    Message(MessageError),
    /// Payload of a recovered panic.
    Panic(MessageError),
}

impl Cause {
    pub fn error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::shared(Arc::new(error))
    }

    /// Wrap an error that the caller keeps a handle on.
    pub fn shared<E>(error: Arc<E>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Cause::Error {
            error,
            type_name: std::any::type_name::<E>(),
        }
    }

    pub fn message(message: impl fmt::Display) -> Self {
        Cause::Message(MessageError(message.to_string()))
    }

    pub fn panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            text.to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Cause::Panic(MessageError(message))
    }

    pub fn as_error(&self) -> &(dyn StdError + 'static) {
        match self {
            Cause::Typed(error) => &**error as &(dyn StdError + 'static),
            Cause::Error { error, .. } => &**error as &(dyn StdError + 'static),
            Cause::Message(error) | Cause::Panic(error) => error as &(dyn StdError + 'static),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Cause::Typed(_) => std::any::type_name::<Error>(),
            Cause::Error { type_name, .. } => *type_name,
            Cause::Message(_) => std::any::type_name::<MessageError>(),
            Cause::Panic(_) => "panic",
        }
    }
}

impl From<Error> for Cause {
    fn from(error: Error) -> Self {
        Cause::Typed(Box::new(error))
    }
}

/// Error value shared by every stage of the pipeline.
///
/// Errors built by [`Error::new`], [`Error::with_cause`], [`Error::wrap`]
/// and [`Error::msg`] record the call stack at construction. Templates from
/// [`ErrorKind::template`] carry none.
#[derive(Debug, Clone)]
pub struct Error {
    kind: Option<ErrorKind>,
    status: Option<u16>,
    message: String,
    details: BTreeMap<String, serde_json::Value>,
    cause: Option<Cause>,
    stack: Stack,
}

impl Error {
    /// Create a classified error without a cause.
    #[inline(never)]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::classified(kind, message.into(), None, Stack::capture())
    }

    /// Create a classified error wrapping `cause`.
    ///
    /// A typed cause is returned unchanged, so an error is never wrapped in
    /// a second one of its own type by this constructor.
    #[inline(never)]
    pub fn with_cause(kind: ErrorKind, message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        match cause.into() {
            Cause::Typed(error) => *error,
            cause => Self::classified(kind, message.into(), Some(cause), Stack::capture()),
        }
    }

    /// Wrap `cause` without classifying it, recording the stack here.
    ///
    /// A typed cause is returned unchanged.
    #[inline(never)]
    pub fn wrap(cause: impl Into<Cause>) -> Self {
        match cause.into() {
            Cause::Typed(error) => *error,
            cause => Self {
                kind: None,
                status: None,
                message: String::new(),
                details: BTreeMap::new(),
                cause: Some(cause),
                stack: Stack::capture(),
            },
        }
    }

    /// [`Error::wrap`] that passes `None` through.
    #[inline(never)]
    pub fn wrap_option<C: Into<Cause>>(cause: Option<C>) -> Option<Self> {
        cause.map(Self::wrap)
    }

    /// Unclassified error from a formatted message.
    #[inline(never)]
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::wrap(Cause::message(message))
    }

    /// Internal error for a panic payload caught at a boundary.
    #[inline(never)]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::with_cause(
            ErrorKind::Internal,
            ErrorKind::Internal.as_str(),
            Cause::panic(payload),
        )
    }

    fn classified(
        kind: ErrorKind,
        message: String,
        cause: Option<Cause>,
        stack: Stack,
    ) -> Self {
        Self {
            kind: Some(kind),
            status: Some(kind.status_code()),
            message,
            details: BTreeMap::new(),
            cause,
            stack,
        }
    }

    pub(crate) fn template(kind: ErrorKind) -> Self {
        Self::classified(
            kind,
            kind.as_str().to_string(),
            Some(Cause::message(kind.as_str())),
            Stack::default(),
        )
    }

    /// Re-classify for the caller.
    ///
    /// The original error becomes the cause and its capture point is kept;
    /// no new stack is recorded.
    pub fn translate(self, kind: ErrorKind, message: impl Into<String>) -> Self {
        let stack = self.stack.clone();
        Self::classified(kind, message.into(), Some(self.into()), stack)
    }

    /// Attach a detail entry. Values that fail to serialize are dropped.
    pub fn with_detail(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.details.insert(key.to_string(), value);
        }
        self
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Status to answer with; unclassified errors count as internal.
    pub fn http_status(&self) -> u16 {
        self.status
            .unwrap_or_else(|| ErrorKind::Internal.status_code())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.details
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Raw program addresses recorded at construction.
    pub fn callers(&self) -> &[usize] {
        self.stack.callers()
    }

    /// Symbolized frames, materialized on first access.
    pub fn stack_frames(&self) -> &[StackFrame] {
        self.stack.frames()
    }

    /// Human readable stack trace.
    pub fn stack(&self) -> String {
        self.stack.to_string()
    }

    /// Cause type, error text and stack trace in one block.
    pub fn error_stack(&self) -> String {
        format!("{} {}\n{}", self.type_name(), self, self.stack)
    }

    pub fn type_name(&self) -> &'static str {
        self.cause
            .as_ref()
            .map_or(std::any::type_name::<Error>(), Cause::type_name)
    }

    /// Coarse structural equality: kind, message and status.
    ///
    /// Causes, details and stacks are not compared.
    pub fn matches(&self, other: &Error) -> bool {
        self.kind == other.kind && self.message == other.message && self.status == other.status
    }

    /// True if the first typed error in `target`'s source chain matches this one.
    pub fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        chain(target)
            .find_map(|link| link.downcast_ref::<Error>())
            .is_some_and(|typed| self.matches(typed))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.cause) {
            (Some(status), Some(cause)) => {
                write!(f, "error {}: {}: {}", status, self.message, cause.as_error())
            }
            (Some(status), None) => write!(f, "error {}: {}", status, self.message),
            (None, Some(cause)) => write!(f, "{}", cause.as_error()),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(Cause::as_error)
    }
}

/// Equivalence across plain and typed errors.
///
/// True when some link of `err`'s source chain is `original` itself or a
/// typed error equivalent to it, or, failing that, when `err` is equivalent
/// to the cause wrapped by a typed `original`.
pub fn is(err: &(dyn StdError + 'static), original: &(dyn StdError + 'static)) -> bool {
    let linked = chain(err).any(|link| {
        same_object(link, original)
            || link
                .downcast_ref::<Error>()
                .is_some_and(|typed| typed.is(original))
    });
    if linked {
        return true;
    }

    match original.downcast_ref::<Error>().and_then(Error::cause) {
        Some(cause) => is(err, cause.as_error()),
        None => false,
    }
}

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&link| link.source())
}

fn same_object(a: &(dyn StdError + 'static), b: &(dyn StdError + 'static)) -> bool {
    std::ptr::eq(
        a as *const dyn StdError as *const (),
        b as *const dyn StdError as *const (),
    )
}

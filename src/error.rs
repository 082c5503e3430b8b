// ABOUTME: Error types for the reader, the evaluator, and interpreter startup

use crate::object::Object;
use thiserror::Error;

/// Result of evaluating a form. `Err` is the in-flight lisp throw; every
/// frame propagates it with `?` after releasing its own bindings.
pub type EvalResult = Result<Object, Thrown>;

/// A lisp-level `(throw tag attach)` in flight. Caught only by a `catch`
/// whose tag is `eq` to `tag`.
#[derive(Debug, Clone)]
pub struct Thrown {
    pub tag: Object,
    pub attach: Object,
}

impl Thrown {
    pub fn new(tag: Object, attach: Object) -> Self {
        Thrown { tag, attach }
    }
}

/// A reader diagnostic. The reader has already recovered (consumed the rest
/// of the line and cleared its parse stack) by the time this is returned,
/// so the caller may keep reading the next form.
#[derive(Error, Debug, Clone)]
#[error("{name}:{line}: {message}")]
pub struct ReadError {
    pub name: String,
    pub line: u32,
    pub message: String,
    /// True when the input ended inside a partially-built form. The REPL
    /// uses this to keep accumulating lines instead of reporting an error.
    pub premature_eof: bool,
}

/// Host-level failures surfaced by the binary.
#[derive(Error, Debug)]
pub enum WispError {
    #[error("could not load core lisp \"{path}\": {source}")]
    CoreLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

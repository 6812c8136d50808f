//! Library error type.

use thiserror::Error;

/// Errors surfaced while building a document.
#[derive(Debug, Error)]
pub enum DocError {
    /// `peek` or `pop` on an empty buffer. The caller removed more
    /// fragments than were written.
    #[error("document buffer is empty")]
    EmptyBuffer,

    /// The docstring parser hit markup it cannot recover from. Caught and
    /// logged at the `include_docstring` boundary; a malformed docstring
    /// never aborts a build.
    #[error("malformed docstring: {0}")]
    DocStringParse(String),

    /// The example synthesizer was driven with a schema root it has no
    /// block rendering for.
    #[error("cannot synthesize an example for a {0} value")]
    UnsupportedSchemaType(String),
}

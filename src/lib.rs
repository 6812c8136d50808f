//! clidoc — event-driven ReST reference documentation from CLI/service
//! metadata.
//!
//! A build documents one object (a provider, a service, or an operation)
//! into one UTF-8 text blob. The pieces:
//!
//! - a help context carries the object, its argument table, and the
//!   output buffer;
//! - a handler variant registers capabilities for the lifecycle event
//!   families it cares about;
//! - a driver fires the event sequence; each matching capability writes
//!   its section through the style renderer, the docstring converter,
//!   and the example synthesizer;
//! - the buffer is finalized once into the result.
//!
//! ```
//! use clidoc::{generate, DocTarget, HelpContext, Operation};
//!
//! let operation = Operation {
//!     name: "ListItems".to_string(),
//!     cli_name: "list-items".to_string(),
//!     documentation: "<p>Lists every item.</p>".to_string(),
//!     params: Vec::new(),
//!     filters: None,
//! };
//! let help = HelpContext::new("list-items", DocTarget::Operation(operation));
//! let text = generate(help).unwrap();
//! assert!(text.contains("list-items"));
//! ```

pub mod docstring;
pub mod document;
pub mod driver;
pub mod error;
pub mod events;
pub mod example;
pub mod handlers;
pub mod model;
pub mod style;

pub use document::{RstDocument, Target};
pub use driver::{document_operation, document_provider, document_service, generate};
pub use error::DocError;
pub use events::{
    DocEvent, EventClass, EventDispatcher, EventFamily, EventName, EventPattern,
};
pub use handlers::{DocHandler, OperationHandler, ProviderHandler, ServiceHandler};
pub use model::{
    Argument, DocTarget, Filter, HelpContext, KeySpec, Member, Operation, Param, Provider,
    ScalarKind, SchemaNode, Service,
};
pub use style::RstStyle;

//! Lifecycle event handlers.
//!
//! Each variant opts into the event catalogue through a compile-time
//! capability table: a list of `(family, method)` pairs. Registration
//! walks the table, derives the subscription pattern and id for the
//! build's event class, and binds each method into the dispatcher. A
//! family missing from the table is simply never delivered; new variants
//! participate by listing a capability.

mod operation;
mod provider;
mod service;

pub use operation::OperationHandler;
pub use provider::ProviderHandler;
pub use service::ServiceHandler;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::DocError;
use crate::events::{DocEvent, EventClass, EventDispatcher, EventFamily};
use crate::model::HelpContext;

/// One capability: an event family paired with the method servicing it.
pub type Capability<H> = (
    EventFamily,
    fn(&mut H, &mut DocEvent<'_>) -> Result<(), DocError>,
);

/// A handler variant: its capability table plus the translation map it
/// installs into the document when it registers.
pub trait DocHandler: 'static {
    /// Families this variant opts into.
    fn capabilities() -> &'static [Capability<Self>]
    where
        Self: Sized;

    /// Identifier-to-CLI-spelling map for the build. Empty by default.
    fn translation_map(&self, help: &HelpContext) -> HashMap<String, String> {
        let _ = help;
        HashMap::new()
    }
}

/// Bind every capability of `handler` into the dispatcher for the
/// context's event class, and install its translation map into the
/// document. The handler lives for one build pass; the returned handle
/// keeps it alive alongside the subscriptions.
pub fn register<H: DocHandler>(
    handler: H,
    dispatcher: &mut EventDispatcher,
    help: &mut HelpContext,
) -> Rc<RefCell<H>> {
    let translation_map = handler.translation_map(help);
    help.doc.set_translation_map(translation_map);
    let class = help.event_class;
    let handler = Rc::new(RefCell::new(handler));
    for (family, method) in H::capabilities() {
        let shared = Rc::clone(&handler);
        let method = *method;
        dispatcher.register(
            family.pattern(class),
            family.subscription_id(class),
            Box::new(move |event| method(&mut shared.borrow_mut(), event)),
        );
    }
    handler
}

/// Remove every subscription `register` created for this variant and
/// class. Mirrors registration: only the listed capabilities are touched.
pub fn unregister<H: DocHandler>(dispatcher: &mut EventDispatcher, class: EventClass) {
    for (family, _) in H::capabilities() {
        dispatcher.unregister(&family.subscription_id(class));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventFamily, EventName};
    use crate::model::{DocTarget, Service};

    fn service_help() -> HelpContext {
        let service = Service {
            name: "storage".to_string(),
            documentation: String::new(),
            operations: Vec::new(),
        };
        HelpContext::new("storage", DocTarget::Service(service))
    }

    #[test]
    fn register_binds_every_capability() {
        let mut dispatcher = EventDispatcher::new();
        let mut help = service_help();
        register(ServiceHandler::new(), &mut dispatcher, &mut help);
        assert_eq!(
            dispatcher.subscription_count(),
            ServiceHandler::capabilities().len()
        );
    }

    #[test]
    fn unregister_mirrors_register() {
        let mut dispatcher = EventDispatcher::new();
        let mut help = service_help();
        register(ServiceHandler::new(), &mut dispatcher, &mut help);
        unregister::<ServiceHandler>(&mut dispatcher, EventClass::Service);
        assert_eq!(dispatcher.subscription_count(), 0);
    }

    #[test]
    fn double_registration_fires_once() {
        let mut dispatcher = EventDispatcher::new();
        let mut help = service_help();
        register(ServiceHandler::new(), &mut dispatcher, &mut help);
        register(ServiceHandler::new(), &mut dispatcher, &mut help);
        assert_eq!(
            dispatcher.subscription_count(),
            ServiceHandler::capabilities().len()
        );

        let name = EventName::new(EventFamily::Title, EventClass::Service, &["storage"]);
        dispatcher.emit(&name, &mut help, None, None).unwrap();
        let text = help.doc.finalize();
        assert_eq!(text.matches("storage\n=======").count(), 1);
    }

    #[test]
    fn uncataloged_capability_is_never_delivered() {
        let mut dispatcher = EventDispatcher::new();
        let mut help = service_help();
        register(ServiceHandler::new(), &mut dispatcher, &mut help);
        // Services opt out of the synopsis families entirely.
        let name = EventName::new(
            EventFamily::SynopsisStart,
            EventClass::Service,
            &["storage"],
        );
        dispatcher.emit(&name, &mut help, None, None).unwrap();
        assert_eq!(help.doc.finalize(), "");
    }
}

//! Build drivers.
//!
//! A driver walks one help context and fires the lifecycle event sequence
//! for its class; whatever is subscribed on the dispatcher writes the
//! sections. `generate` is the one-call form: register the class handler,
//! drive, tear down, finalize.

use crate::error::DocError;
use crate::events::{EventClass, EventDispatcher, EventFamily, EventName};
use crate::handlers::{self, OperationHandler, ProviderHandler, ServiceHandler};
use crate::model::{DocTarget, HelpContext};

fn fire_section(
    dispatcher: &mut EventDispatcher,
    help: &mut HelpContext,
    family: EventFamily,
) -> Result<(), DocError> {
    let subject = help.obj.name().to_string();
    let name = EventName::new(family, help.event_class, &[subject.as_str()]);
    dispatcher.emit(&name, help, None, None)
}

fn fire_argument(
    dispatcher: &mut EventDispatcher,
    help: &mut HelpContext,
    family: EventFamily,
    arg_name: &str,
) -> Result<(), DocError> {
    let subject = help.obj.name().to_string();
    let name = EventName::new(family, help.event_class, &[subject.as_str(), arg_name]);
    dispatcher.emit(&name, help, Some(arg_name), None)
}

fn fire_subitem(
    dispatcher: &mut EventDispatcher,
    help: &mut HelpContext,
    item_name: &str,
) -> Result<(), DocError> {
    let subject = help.obj.name().to_string();
    let name = EventName::new(
        EventFamily::Subitem,
        help.event_class,
        &[subject.as_str(), item_name],
    );
    dispatcher.emit(&name, help, None, Some(item_name))
}

/// Fire the provider sequence: title, description, synopsis, flat options
/// (with examples), and the service table of contents.
pub fn document_provider(
    dispatcher: &mut EventDispatcher,
    help: &mut HelpContext,
) -> Result<(), DocError> {
    fire_section(dispatcher, help, EventFamily::Title)?;
    fire_section(dispatcher, help, EventFamily::Description)?;
    fire_section(dispatcher, help, EventFamily::SynopsisStart)?;
    fire_section(dispatcher, help, EventFamily::SynopsisEnd)?;
    fire_section(dispatcher, help, EventFamily::OptionsStart)?;
    let arg_names: Vec<String> = help.arg_table.keys().cloned().collect();
    for arg_name in &arg_names {
        fire_argument(dispatcher, help, EventFamily::Option, arg_name)?;
        fire_argument(dispatcher, help, EventFamily::OptionExample, arg_name)?;
    }
    fire_section(dispatcher, help, EventFamily::OptionsEnd)?;
    fire_section(dispatcher, help, EventFamily::SubitemsStart)?;
    let services: Vec<String> = match &help.obj {
        DocTarget::Provider(provider) => provider
            .services
            .iter()
            .map(|service| service.name.clone())
            .collect(),
        _ => Vec::new(),
    };
    for service in &services {
        fire_subitem(dispatcher, help, service)?;
    }
    fire_section(dispatcher, help, EventFamily::SubitemsEnd)
}

/// Fire the service sequence: title, description, and the operation table
/// of contents. The synopsis and option families fire too; services leave
/// them unsubscribed.
pub fn document_service(
    dispatcher: &mut EventDispatcher,
    help: &mut HelpContext,
) -> Result<(), DocError> {
    fire_section(dispatcher, help, EventFamily::Title)?;
    fire_section(dispatcher, help, EventFamily::Description)?;
    fire_section(dispatcher, help, EventFamily::SynopsisStart)?;
    fire_section(dispatcher, help, EventFamily::SynopsisEnd)?;
    fire_section(dispatcher, help, EventFamily::OptionsStart)?;
    fire_section(dispatcher, help, EventFamily::OptionsEnd)?;
    fire_section(dispatcher, help, EventFamily::SubitemsStart)?;
    let operations: Vec<String> = match &help.obj {
        DocTarget::Service(service) => service
            .operations
            .iter()
            .map(|operation| operation.cli_name.clone())
            .collect(),
        _ => Vec::new(),
    };
    for operation in &operations {
        fire_subitem(dispatcher, help, operation)?;
    }
    fire_section(dispatcher, help, EventFamily::SubitemsEnd)
}

/// Fire the operation sequence: title, description, per-argument synopsis,
/// per-argument option docs and examples, options end, and the examples
/// hook.
pub fn document_operation(
    dispatcher: &mut EventDispatcher,
    help: &mut HelpContext,
) -> Result<(), DocError> {
    fire_section(dispatcher, help, EventFamily::Title)?;
    fire_section(dispatcher, help, EventFamily::Description)?;
    fire_section(dispatcher, help, EventFamily::SynopsisStart)?;
    let arg_names: Vec<String> = help.arg_table.keys().cloned().collect();
    for arg_name in &arg_names {
        fire_argument(dispatcher, help, EventFamily::SynopsisOption, arg_name)?;
    }
    fire_section(dispatcher, help, EventFamily::SynopsisEnd)?;
    fire_section(dispatcher, help, EventFamily::OptionsStart)?;
    for arg_name in &arg_names {
        fire_argument(dispatcher, help, EventFamily::Option, arg_name)?;
        fire_argument(dispatcher, help, EventFamily::OptionExample, arg_name)?;
    }
    fire_section(dispatcher, help, EventFamily::OptionsEnd)?;
    fire_section(dispatcher, help, EventFamily::Examples)
}

/// One-call build: register the class handler, run the driver, tear the
/// handler down, and finalize the buffer into the output text.
pub fn generate(mut help: HelpContext) -> Result<String, DocError> {
    let mut dispatcher = EventDispatcher::new();
    match help.event_class {
        EventClass::Provider => {
            handlers::register(ProviderHandler::new(), &mut dispatcher, &mut help);
            document_provider(&mut dispatcher, &mut help)?;
            handlers::unregister::<ProviderHandler>(&mut dispatcher, EventClass::Provider);
        }
        EventClass::Service => {
            handlers::register(ServiceHandler::new(), &mut dispatcher, &mut help);
            document_service(&mut dispatcher, &mut help)?;
            handlers::unregister::<ServiceHandler>(&mut dispatcher, EventClass::Service);
        }
        EventClass::Operation => {
            let handler = OperationHandler::new(&help);
            handlers::register(handler, &mut dispatcher, &mut help);
            document_operation(&mut dispatcher, &mut help)?;
            handlers::unregister::<OperationHandler>(&mut dispatcher, EventClass::Operation);
        }
    }
    Ok(help.doc.finalize())
}

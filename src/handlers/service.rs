//! Service documentation handler.

use std::collections::HashMap;

use crate::docstring::include_docstring;
use crate::error::DocError;
use crate::events::{DocEvent, EventFamily};
use crate::model::{DocTarget, HelpContext};

use super::{Capability, DocHandler};

/// Documents a service page: title, description, and a table of contents
/// of its operations. Services carry no options of their own, so the
/// synopsis and option families are left unimplemented.
#[derive(Debug, Default)]
pub struct ServiceHandler;

impl ServiceHandler {
    pub fn new() -> Self {
        ServiceHandler
    }

    fn doc_title(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h1(&mut help.doc, &help.name);
        Ok(())
    }

    fn doc_description(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Description");
        if let DocTarget::Service(service) = &help.obj {
            include_docstring(&mut help.doc, &mut help.style, &service.documentation);
        }
        Ok(())
    }

    fn doc_subitems_start(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Available Commands");
        help.style.toctree(&mut help.doc);
        Ok(())
    }

    fn doc_subitem(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        let Some(item) = event.item_name else {
            return Ok(());
        };
        help.style.tocitem(&mut help.doc, item, None);
        Ok(())
    }
}

impl ServiceHandler {
    const CAPABILITIES: &'static [Capability<Self>] = &[
        (EventFamily::Title, Self::doc_title),
        (EventFamily::Description, Self::doc_description),
        (EventFamily::SubitemsStart, Self::doc_subitems_start),
        (EventFamily::Subitem, Self::doc_subitem),
    ];
}

impl DocHandler for ServiceHandler {
    fn capabilities() -> &'static [Capability<Self>] {
        Self::CAPABILITIES
    }

    /// Docstrings refer to operations by internal identifier; map them to
    /// CLI spellings so prose renders the way users type them.
    fn translation_map(&self, help: &HelpContext) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let DocTarget::Service(service) = &help.obj {
            for operation in &service.operations {
                map.insert(operation.name.clone(), operation.cli_name.clone());
            }
        }
        map
    }
}

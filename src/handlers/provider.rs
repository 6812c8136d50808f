//! Provider (top-level program) documentation handler.

use crate::docstring::include_docstring;
use crate::error::DocError;
use crate::events::{DocEvent, EventFamily};
use crate::model::DocTarget;

use super::{Capability, DocHandler};

/// Documents the provider page: title, description, flat ungrouped
/// synopsis and options, and a table of contents of its services.
#[derive(Debug, Default)]
pub struct ProviderHandler;

impl ProviderHandler {
    pub fn new() -> Self {
        ProviderHandler
    }

    fn doc_title(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h1(&mut help.doc, &help.name);
        Ok(())
    }

    fn doc_description(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Description");
        include_docstring(&mut help.doc, &mut help.style, &help.description);
        help.style.new_paragraph(&mut help.doc);
        Ok(())
    }

    fn doc_synopsis_start(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Synopsis");
        help.style.codeblock(&mut help.doc, &help.synopsis);
        if let DocTarget::Provider(provider) = &help.obj {
            include_docstring(&mut help.doc, &mut help.style, &provider.usage);
        }
        Ok(())
    }

    fn doc_synopsis_end(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.new_paragraph(&mut help.doc);
        Ok(())
    }

    fn doc_options_start(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Options");
        Ok(())
    }

    /// Provider options are flat: no groups, choices as a bullet list.
    fn doc_option(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        let Some(arg_name) = event.arg_name else {
            return Ok(());
        };
        let Some(argument) = help.arg_table.get(arg_name) else {
            return Ok(());
        };
        help.doc.write_line(&format!(
            "``{}`` ({})",
            argument.cli_name, argument.cli_type_name
        ));
        include_docstring(&mut help.doc, &mut help.style, &argument.documentation);
        if !argument.choices.is_empty() {
            help.style.start_ul(&mut help.doc);
            for choice in &argument.choices {
                help.style.li(&mut help.doc, choice);
            }
            help.style.end_ul(&mut help.doc);
        }
        Ok(())
    }

    fn doc_subitems_start(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Available Services");
        help.style.toctree(&mut help.doc);
        Ok(())
    }

    fn doc_subitem(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        let Some(item) = event.item_name else {
            return Ok(());
        };
        let file_name = format!("{}/index", item);
        help.style.tocitem(&mut help.doc, item, Some(&file_name));
        Ok(())
    }
}

impl ProviderHandler {
    const CAPABILITIES: &'static [Capability<Self>] = &[
        (EventFamily::Title, Self::doc_title),
        (EventFamily::Description, Self::doc_description),
        (EventFamily::SynopsisStart, Self::doc_synopsis_start),
        (EventFamily::SynopsisEnd, Self::doc_synopsis_end),
        (EventFamily::OptionsStart, Self::doc_options_start),
        (EventFamily::Option, Self::doc_option),
        (EventFamily::SubitemsStart, Self::doc_subitems_start),
        (EventFamily::Subitem, Self::doc_subitem),
    ];
}

impl DocHandler for ProviderHandler {
    fn capabilities() -> &'static [Capability<Self>] {
        Self::CAPABILITIES
    }
}

//! Operation documentation handler.
//!
//! The widest surface of the three variants: synopsis with argument-group
//! folding, per-option docs and usage examples, and the filters appendix.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::docstring::include_docstring;
use crate::error::DocError;
use crate::events::{DocEvent, EventFamily};
use crate::example;
use crate::model::{DocTarget, HelpContext, SchemaNode};

use super::{Capability, DocHandler};

/// A mutually associated argument cluster, folded to one synopsis token
/// and one option entry per pass.
#[derive(Debug)]
struct ArgGroup {
    /// Member CLI names, sorted so rendering does not depend on argument
    /// table order.
    members: Vec<String>,
    /// True when any member is required; the group then renders without
    /// the optional brackets.
    required: bool,
}

/// Documents one operation: title, description, group-aware synopsis,
/// option docs with usage examples, filters appendix.
pub struct OperationHandler {
    groups: BTreeMap<String, ArgGroup>,
    /// Groups already rendered in the current pass. Cleared at synopsis
    /// start, synopsis end, and options start, so each pass documents a
    /// group exactly once.
    documented_groups: HashSet<String>,
}

impl OperationHandler {
    /// Group membership is computed once, from the context's argument
    /// table.
    pub fn new(help: &HelpContext) -> Self {
        let mut groups: BTreeMap<String, ArgGroup> = BTreeMap::new();
        for argument in help.arg_table.values() {
            if let Some(name) = &argument.group_name {
                let group = groups.entry(name.clone()).or_insert_with(|| ArgGroup {
                    members: Vec::new(),
                    required: false,
                });
                group.members.push(argument.cli_name.clone());
                group.required |= argument.required;
            }
        }
        for group in groups.values_mut() {
            group.members.sort();
        }
        OperationHandler {
            groups,
            documented_groups: HashSet::new(),
        }
    }

    fn doc_title(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h1(&mut help.doc, &help.name);
        Ok(())
    }

    fn doc_description(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Description");
        if let DocTarget::Operation(operation) = &help.obj {
            include_docstring(&mut help.doc, &mut help.style, &operation.documentation);
        }
        Ok(())
    }

    fn doc_synopsis_start(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        self.documented_groups.clear();
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Synopsis");
        help.style.start_codeblock(&mut help.doc);
        help.doc.write_line(&help.name);
        Ok(())
    }

    fn doc_synopsis_option(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        let Some(arg_name) = event.arg_name else {
            return Ok(());
        };
        let Some(argument) = help.arg_table.get(arg_name) else {
            return Ok(());
        };
        let group = argument
            .group_name
            .as_deref()
            .and_then(|name| self.groups.get(name).map(|group| (name, group)));
        let (option, optional) = match group {
            Some((name, group)) => {
                // One synopsis token per group, however many members fire.
                if self.documented_groups.contains(name) {
                    return Ok(());
                }
                self.documented_groups.insert(name.to_string());
                (group.members.join(" | "), !group.required)
            }
            None if argument.is_boolean() => (argument.cli_name.clone(), !argument.required),
            None => (
                format!("{} <value>", argument.cli_name),
                !argument.required,
            ),
        };
        let option = if optional {
            format!("[{}]", option)
        } else {
            option
        };
        help.doc.write_line(&option);
        Ok(())
    }

    fn doc_synopsis_end(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        help.style.end_codeblock(&mut help.doc);
        // The option section documents the same groups again.
        self.documented_groups.clear();
        Ok(())
    }

    fn doc_options_start(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        self.documented_groups.clear();
        let help = &mut *event.help;
        help.style.h2(&mut help.doc, "Options");
        if let DocTarget::Operation(operation) = &help.obj {
            if operation.params.is_empty() {
                help.doc.write("*None*\n");
            }
        }
        Ok(())
    }

    fn doc_option(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        let Some(arg_name) = event.arg_name else {
            return Ok(());
        };
        let Some(argument) = help.arg_table.get(arg_name) else {
            return Ok(());
        };
        let group = argument
            .group_name
            .as_deref()
            .and_then(|name| self.groups.get(name).map(|group| (name, group)));
        let name = match group {
            Some((name, group)) => {
                if self.documented_groups.contains(name) {
                    return Ok(());
                }
                self.documented_groups.insert(name.to_string());
                group
                    .members
                    .iter()
                    .map(|member| format!("``{}``", member))
                    .collect::<Vec<_>>()
                    .join(" | ")
            }
            None => format!("``{}``", argument.cli_name),
        };
        help.doc
            .write(&format!("{} ({})\n", name, argument.cli_type_name));
        help.doc.indent();
        include_docstring(&mut help.doc, &mut help.style, &argument.documentation);
        help.doc.dedent();
        help.style.new_paragraph(&mut help.doc);
        Ok(())
    }

    fn doc_option_example(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        let Some(arg_name) = event.arg_name else {
            return Ok(());
        };
        let Some(argument) = help.arg_table.get(arg_name) else {
            return Ok(());
        };
        let Some(param) = &argument.argument_object else {
            return Ok(());
        };
        if let Some(example_fn) = param.example_fn {
            help.style.new_paragraph(&mut help.doc);
            help.doc.write("Shorthand Syntax");
            help.style.start_codeblock(&mut help.doc);
            let shorthand = example_fn(param);
            for line in shorthand.lines() {
                help.doc.write_line(line);
            }
            help.style.end_codeblock(&mut help.doc);
        }
        match &param.schema {
            // Scalar lists double as space-separated bare tokens, so the
            // JSON form is not worth documenting; show the token syntax.
            SchemaNode::List { member } if member.is_scalar() => {
                if let SchemaNode::Scalar { kind, choices } = member.as_ref() {
                    let placeholder = example::scalar_placeholder(*kind, choices);
                    help.style.new_paragraph(&mut help.doc);
                    help.doc.write("Syntax");
                    help.style.start_codeblock(&mut help.doc);
                    help.doc
                        .write(&format!("{} {} ...", placeholder, placeholder));
                    help.style.end_codeblock(&mut help.doc);
                    help.style.new_paragraph(&mut help.doc);
                }
            }
            _ if !argument.is_scalar_type() => {
                help.style.new_paragraph(&mut help.doc);
                help.doc.write("JSON Syntax");
                help.style.start_codeblock(&mut help.doc);
                example::json_example(&mut help.doc, &help.style, &param.schema)?;
                help.style.end_codeblock(&mut help.doc);
                help.style.new_paragraph(&mut help.doc);
            }
            _ => {}
        }
        Ok(())
    }

    fn doc_options_end(&mut self, event: &mut DocEvent<'_>) -> Result<(), DocError> {
        let help = &mut *event.help;
        let DocTarget::Operation(operation) = &help.obj else {
            return Ok(());
        };
        let Some(filters) = &operation.filters else {
            return Ok(());
        };
        help.style.h2(&mut help.doc, "Filters");
        for (name, filter) in filters {
            help.style.h3(&mut help.doc, name);
            if let Some(documentation) = &filter.documentation {
                include_docstring(&mut help.doc, &mut help.style, documentation);
            }
            if let Some(choices) = &filter.choices {
                help.style.new_paragraph(&mut help.doc);
                help.doc.write("Valid Values: ");
                help.doc.write(&choices.join("|"));
            }
            help.style.new_paragraph(&mut help.doc);
        }
        Ok(())
    }
}

impl OperationHandler {
    const CAPABILITIES: &'static [Capability<Self>] = &[
        (EventFamily::Title, Self::doc_title),
        (EventFamily::Description, Self::doc_description),
        (EventFamily::SynopsisStart, Self::doc_synopsis_start),
        (EventFamily::SynopsisOption, Self::doc_synopsis_option),
        (EventFamily::SynopsisEnd, Self::doc_synopsis_end),
        (EventFamily::OptionsStart, Self::doc_options_start),
        (EventFamily::Option, Self::doc_option),
        (EventFamily::OptionExample, Self::doc_option_example),
        (EventFamily::OptionsEnd, Self::doc_options_end),
    ];
}

impl DocHandler for OperationHandler {
    fn capabilities() -> &'static [Capability<Self>] {
        Self::CAPABILITIES
    }

    /// Docstrings refer to parameters and the operation itself by internal
    /// identifier; map both to CLI spellings.
    fn translation_map(&self, help: &HelpContext) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let DocTarget::Operation(operation) = &help.obj {
            for param in &operation.params {
                map.insert(param.name.clone(), param.cli_name.clone());
            }
            map.insert(operation.name.clone(), operation.cli_name.clone());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventClass, EventDispatcher, EventName};
    use crate::handlers;
    use crate::model::{Argument, Member, Operation, Param, ScalarKind};

    fn scalar(kind: ScalarKind) -> SchemaNode {
        SchemaNode::Scalar {
            kind,
            choices: Vec::new(),
        }
    }

    fn plain_argument(cli_name: &str, cli_type_name: &str) -> Argument {
        Argument {
            cli_name: cli_name.to_string(),
            cli_type_name: cli_type_name.to_string(),
            documentation: String::new(),
            choices: Vec::new(),
            required: false,
            group_name: None,
            argument_object: None,
        }
    }

    fn grouped_argument(cli_name: &str, group: &str, required: bool) -> Argument {
        Argument {
            required,
            group_name: Some(group.to_string()),
            ..plain_argument(cli_name, "boolean")
        }
    }

    fn operation_help(args: Vec<(&str, Argument)>) -> HelpContext {
        let operation = Operation {
            name: "list-items".to_string(),
            cli_name: "list-items".to_string(),
            documentation: String::new(),
            params: vec![Param {
                name: "Placeholder".to_string(),
                cli_name: "--placeholder".to_string(),
                documentation: String::new(),
                schema: scalar(ScalarKind::String),
                example_fn: None,
            }],
            filters: None,
        };
        let mut help = HelpContext::new("list-items", DocTarget::Operation(operation));
        for (id, argument) in args {
            help.arg_table.insert(id.to_string(), argument);
        }
        help
    }

    fn fire(
        dispatcher: &mut EventDispatcher,
        help: &mut HelpContext,
        family: EventFamily,
        arg_name: Option<&str>,
    ) {
        let subject = help.name.clone();
        let name = match arg_name {
            Some(arg) => EventName::new(family, EventClass::Operation, &[subject.as_str(), arg]),
            None => EventName::new(family, EventClass::Operation, &[subject.as_str()]),
        };
        dispatcher.emit(&name, help, arg_name, None).unwrap();
    }

    fn run_synopsis(help: &mut HelpContext) {
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(help);
        handlers::register(handler, &mut dispatcher, help);
        fire(&mut dispatcher, help, EventFamily::SynopsisStart, None);
        let arg_names: Vec<String> = help.arg_table.keys().cloned().collect();
        for arg in &arg_names {
            fire(&mut dispatcher, help, EventFamily::SynopsisOption, Some(arg));
        }
        fire(&mut dispatcher, help, EventFamily::SynopsisEnd, None);
    }

    #[test]
    fn group_renders_one_synopsis_token() {
        // Deliberately unsorted table order; the token is still sorted.
        let mut help = operation_help(vec![
            ("gamma", grouped_argument("--gamma", "toggle", false)),
            ("alpha", grouped_argument("--alpha", "toggle", false)),
            ("beta", grouped_argument("--beta", "toggle", false)),
        ]);
        run_synopsis(&mut help);
        let text = help.doc.finalize();
        assert_eq!(text.matches("--alpha | --beta | --gamma").count(), 1);
        assert!(text.contains("[--alpha | --beta | --gamma]"));
    }

    #[test]
    fn group_with_required_member_is_not_bracketed() {
        let mut help = operation_help(vec![
            ("alpha", grouped_argument("--alpha", "toggle", false)),
            ("beta", grouped_argument("--beta", "toggle", true)),
        ]);
        run_synopsis(&mut help);
        let text = help.doc.finalize();
        assert!(text.contains("--alpha | --beta"));
        assert!(!text.contains("[--alpha | --beta]"));
    }

    #[test]
    fn required_argument_is_not_bracketed() {
        let mut help = operation_help(vec![
            ("name", {
                let mut arg = plain_argument("--name", "string");
                arg.required = true;
                arg
            }),
            ("limit", plain_argument("--limit", "integer")),
        ]);
        run_synopsis(&mut help);
        let text = help.doc.finalize();
        assert!(text.contains("\n  --name <value>\n"));
        assert!(text.contains("\n  [--limit <value>]\n"));
    }

    #[test]
    fn boolean_flag_has_no_value_placeholder() {
        let mut help = operation_help(vec![("dry-run", plain_argument("--dry-run", "boolean"))]);
        run_synopsis(&mut help);
        let text = help.doc.finalize();
        assert!(text.contains("[--dry-run]"));
        assert!(!text.contains("--dry-run <value>"));
    }

    #[test]
    fn group_documented_once_per_pass_but_again_next_pass() {
        let mut help = operation_help(vec![
            ("alpha", grouped_argument("--alpha", "toggle", false)),
            ("beta", grouped_argument("--beta", "toggle", false)),
        ]);
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(&help);
        handlers::register(handler, &mut dispatcher, &mut help);

        fire(&mut dispatcher, &mut help, EventFamily::SynopsisStart, None);
        for arg in ["alpha", "beta"] {
            fire(
                &mut dispatcher,
                &mut help,
                EventFamily::SynopsisOption,
                Some(arg),
            );
        }
        fire(&mut dispatcher, &mut help, EventFamily::SynopsisEnd, None);
        fire(&mut dispatcher, &mut help, EventFamily::OptionsStart, None);
        for arg in ["alpha", "beta"] {
            fire(&mut dispatcher, &mut help, EventFamily::Option, Some(arg));
        }
        let text = help.doc.finalize();
        // Once in the synopsis, once again in the option section.
        assert_eq!(text.matches("[--alpha | --beta]").count(), 1);
        assert_eq!(text.matches("``--alpha`` | ``--beta``").count(), 1);
    }

    #[test]
    fn scalar_list_renders_syntax_line_not_json() {
        let mut help = operation_help(vec![("tags", {
            let mut arg = plain_argument("--tags", "list");
            arg.argument_object = Some(Param {
                name: "Tags".to_string(),
                cli_name: "--tags".to_string(),
                documentation: String::new(),
                schema: SchemaNode::List {
                    member: Box::new(scalar(ScalarKind::String)),
                },
                example_fn: None,
            });
            arg
        })]);
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(&help);
        handlers::register(handler, &mut dispatcher, &mut help);
        fire(
            &mut dispatcher,
            &mut help,
            EventFamily::OptionExample,
            Some("tags"),
        );
        let text = help.doc.finalize();
        assert!(text.contains("Syntax"));
        assert!(text.contains("\"string\" \"string\" ..."));
        assert!(!text.contains("JSON Syntax"));
    }

    #[test]
    fn structure_argument_renders_json_syntax_block() {
        let mut help = operation_help(vec![("item", {
            let mut arg = plain_argument("--item", "structure");
            arg.argument_object = Some(Param {
                name: "Item".to_string(),
                cli_name: "--item".to_string(),
                documentation: String::new(),
                schema: SchemaNode::Structure {
                    members: vec![
                        Member {
                            name: "Key".to_string(),
                            node: scalar(ScalarKind::String),
                        },
                        Member {
                            name: "Count".to_string(),
                            node: scalar(ScalarKind::Integer),
                        },
                    ],
                },
                example_fn: None,
            });
            arg
        })]);
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(&help);
        handlers::register(handler, &mut dispatcher, &mut help);
        fire(
            &mut dispatcher,
            &mut help,
            EventFamily::OptionExample,
            Some("item"),
        );
        let text = help.doc.finalize();
        assert!(text.contains("JSON Syntax"));
        let key = text.find("\"Key\": \"string\"").unwrap();
        let count = text.find("\"Count\": integer").unwrap();
        assert!(key < count);
        assert_eq!(
            text.chars().filter(|&c| c == '{').count(),
            text.chars().filter(|&c| c == '}').count()
        );
    }

    fn key_value_shorthand(_param: &Param) -> String {
        "Key=string,Count=integer".to_string()
    }

    #[test]
    fn shorthand_hook_renders_before_json() {
        let mut help = operation_help(vec![("item", {
            let mut arg = plain_argument("--item", "structure");
            arg.argument_object = Some(Param {
                name: "Item".to_string(),
                cli_name: "--item".to_string(),
                documentation: String::new(),
                schema: SchemaNode::Structure {
                    members: vec![Member {
                        name: "Key".to_string(),
                        node: scalar(ScalarKind::String),
                    }],
                },
                example_fn: Some(key_value_shorthand),
            });
            arg
        })]);
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(&help);
        handlers::register(handler, &mut dispatcher, &mut help);
        fire(
            &mut dispatcher,
            &mut help,
            EventFamily::OptionExample,
            Some("item"),
        );
        let text = help.doc.finalize();
        let shorthand = text.find("Shorthand Syntax").unwrap();
        let json = text.find("JSON Syntax").unwrap();
        assert!(shorthand < json);
        assert!(text.contains("Key=string,Count=integer"));
    }

    #[test]
    fn options_section_shows_none_without_params() {
        let operation = Operation {
            name: "ping".to_string(),
            cli_name: "ping".to_string(),
            documentation: String::new(),
            params: Vec::new(),
            filters: None,
        };
        let mut help = HelpContext::new("ping", DocTarget::Operation(operation));
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(&help);
        handlers::register(handler, &mut dispatcher, &mut help);
        fire(&mut dispatcher, &mut help, EventFamily::OptionsStart, None);
        assert!(help.doc.finalize().contains("*None*"));
    }

    #[test]
    fn filters_appendix_is_sorted_with_valid_values() {
        let mut filters = BTreeMap::new();
        filters.insert(
            "status".to_string(),
            crate::model::Filter {
                documentation: Some("<p>Match by status.</p>".to_string()),
                choices: Some(vec!["open".to_string(), "closed".to_string()]),
            },
        );
        filters.insert(
            "label".to_string(),
            crate::model::Filter {
                documentation: None,
                choices: None,
            },
        );
        let operation = Operation {
            name: "list-items".to_string(),
            cli_name: "list-items".to_string(),
            documentation: String::new(),
            params: Vec::new(),
            filters: Some(filters),
        };
        let mut help = HelpContext::new("list-items", DocTarget::Operation(operation));
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(&help);
        handlers::register(handler, &mut dispatcher, &mut help);
        fire(&mut dispatcher, &mut help, EventFamily::OptionsEnd, None);
        let text = help.doc.finalize();
        assert!(text.contains("Filters"));
        let label = text.find("label").unwrap();
        let status = text.find("status").unwrap();
        assert!(label < status);
        assert!(text.contains("Valid Values: open|closed"));
    }

    #[test]
    fn translation_map_covers_params_and_operation() {
        let operation = Operation {
            name: "ListItems".to_string(),
            cli_name: "list-items".to_string(),
            documentation: String::new(),
            params: vec![Param {
                name: "MaxResults".to_string(),
                cli_name: "--max-results".to_string(),
                documentation: String::new(),
                schema: scalar(ScalarKind::Integer),
                example_fn: None,
            }],
            filters: None,
        };
        let mut help = HelpContext::new("list-items", DocTarget::Operation(operation));
        let mut dispatcher = EventDispatcher::new();
        let handler = OperationHandler::new(&help);
        handlers::register(handler, &mut dispatcher, &mut help);
        assert_eq!(help.doc.translate("MaxResults"), "--max-results");
        assert_eq!(help.doc.translate("ListItems"), "list-items");
    }
}

//! Recursive schema-to-example synthesis.
//!
//! Renders a value schema as literal JSON-shaped placeholder text:
//! quoted type placeholders at the leaves, brackets and indentation for
//! the nesting. Members render in declaration order, never sorted.
//! Termination relies on the model's acyclic-nesting invariant.

use crate::document::RstDocument;
use crate::error::DocError;
use crate::model::{ScalarKind, SchemaNode};
use crate::style::RstStyle;

/// Placeholder text for a scalar leaf: quoted enumerated choices when
/// present, `"string"` for free strings, `true|false` for booleans, the
/// bare type name otherwise.
pub(crate) fn scalar_placeholder(kind: ScalarKind, choices: &[String]) -> String {
    match kind {
        ScalarKind::String if !choices.is_empty() => choices
            .iter()
            .map(|choice| format!("\"{}\"", choice))
            .collect::<Vec<_>>()
            .join("|"),
        ScalarKind::String => "\"string\"".to_string(),
        ScalarKind::Boolean => "true|false".to_string(),
        other => other.type_name().to_string(),
    }
}

/// Render a JSON-shaped example for `node` into the document. The root
/// must be a list, map, or structure; a scalar root has no block form and
/// fails with `UnsupportedSchemaType`.
pub fn json_example(
    doc: &mut RstDocument,
    style: &RstStyle,
    node: &SchemaNode,
) -> Result<(), DocError> {
    if node.is_scalar() {
        return Err(DocError::UnsupportedSchemaType(
            node.kind_name().to_string(),
        ));
    }
    render(doc, style, node);
    Ok(())
}

fn render(doc: &mut RstDocument, style: &RstStyle, node: &SchemaNode) {
    match node {
        SchemaNode::Scalar { kind, choices } => {
            doc.write(&scalar_placeholder(*kind, choices));
        }
        SchemaNode::List { member } => {
            doc.write("[");
            if let SchemaNode::Scalar { kind, choices } = member.as_ref() {
                doc.write(&format!("{}, ...", scalar_placeholder(*kind, choices)));
            } else {
                doc.indent();
                style.new_line(doc);
                render(doc, style, member);
                style.new_line(doc);
                doc.write("...");
                doc.dedent();
                style.new_line(doc);
            }
            doc.write("]");
        }
        SchemaNode::Map { key, member } => {
            doc.write("{");
            doc.indent();
            doc.write(&format!(
                "{}: ",
                scalar_placeholder(key.kind, &key.choices)
            ));
            if let SchemaNode::Scalar { kind, choices } = member.as_ref() {
                doc.write(&scalar_placeholder(*kind, choices));
            } else {
                doc.indent();
                render(doc, style, member);
                doc.dedent();
            }
            style.new_line(doc);
            doc.write("...");
            doc.dedent();
            doc.write("}");
        }
        SchemaNode::Structure { members } => {
            if members.is_empty() {
                doc.write("{}");
                return;
            }
            doc.write("{");
            doc.indent();
            style.new_line(doc);
            let last = members.len() - 1;
            for (index, member) in members.iter().enumerate() {
                match &member.node {
                    SchemaNode::Scalar { kind, choices } => {
                        doc.write(&format!(
                            "\"{}\": {}",
                            member.name,
                            scalar_placeholder(*kind, choices)
                        ));
                    }
                    nested => {
                        doc.write(&format!("\"{}\": ", member.name));
                        render(doc, style, nested);
                    }
                }
                if index < last {
                    doc.write(",");
                    style.new_line(doc);
                } else {
                    doc.dedent();
                    style.new_line(doc);
                }
            }
            doc.write("}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeySpec, Member};

    fn scalar(kind: ScalarKind) -> SchemaNode {
        SchemaNode::Scalar {
            kind,
            choices: Vec::new(),
        }
    }

    fn member(name: &str, node: SchemaNode) -> Member {
        Member {
            name: name.to_string(),
            node,
        }
    }

    fn synthesize(node: &SchemaNode) -> String {
        let mut doc = RstDocument::default();
        let style = RstStyle::new();
        json_example(&mut doc, &style, node).unwrap();
        doc.finalize()
    }

    fn assert_balanced(text: &str) {
        let count = |c: char| text.chars().filter(|&ch| ch == c).count();
        assert_eq!(count('['), count(']'), "unbalanced brackets in {:?}", text);
        assert_eq!(count('{'), count('}'), "unbalanced braces in {:?}", text);
    }

    #[test]
    fn scalar_placeholders() {
        assert_eq!(scalar_placeholder(ScalarKind::String, &[]), "\"string\"");
        assert_eq!(scalar_placeholder(ScalarKind::Boolean, &[]), "true|false");
        assert_eq!(scalar_placeholder(ScalarKind::Integer, &[]), "integer");
        assert_eq!(
            scalar_placeholder(
                ScalarKind::String,
                &["on".to_string(), "off".to_string()]
            ),
            "\"on\"|\"off\""
        );
    }

    #[test]
    fn scalar_list_renders_inline() {
        let node = SchemaNode::List {
            member: Box::new(scalar(ScalarKind::String)),
        };
        assert_eq!(synthesize(&node), "[\"string\", ...]");
    }

    #[test]
    fn list_of_structure_scenario() {
        let node = SchemaNode::List {
            member: Box::new(SchemaNode::Structure {
                members: vec![
                    member("Key", scalar(ScalarKind::String)),
                    member("Value", scalar(ScalarKind::String)),
                ],
            }),
        };
        assert_eq!(
            synthesize(&node),
            "[\n  {\n    \"Key\": \"string\",\n    \"Value\": \"string\"\n  }\n  ...\n]"
        );
    }

    #[test]
    fn structure_members_keep_declaration_order() {
        let node = SchemaNode::Structure {
            members: vec![
                member("Zebra", scalar(ScalarKind::String)),
                member("Apple", scalar(ScalarKind::Integer)),
            ],
        };
        let text = synthesize(&node);
        let zebra = text.find("Zebra").unwrap();
        let apple = text.find("Apple").unwrap();
        assert!(zebra < apple);
        assert_balanced(&text);
    }

    #[test]
    fn map_of_scalar() {
        let node = SchemaNode::Map {
            key: KeySpec {
                kind: ScalarKind::String,
                choices: Vec::new(),
            },
            member: Box::new(scalar(ScalarKind::String)),
        };
        assert_eq!(synthesize(&node), "{\"string\": \"string\"\n  ...}");
    }

    #[test]
    fn deep_nesting_terminates_and_balances() {
        let node = SchemaNode::Structure {
            members: vec![member(
                "Outer",
                SchemaNode::List {
                    member: Box::new(SchemaNode::Map {
                        key: KeySpec {
                            kind: ScalarKind::String,
                            choices: Vec::new(),
                        },
                        member: Box::new(SchemaNode::Structure {
                            members: vec![
                                member("Leaf", scalar(ScalarKind::Boolean)),
                                member(
                                    "Tags",
                                    SchemaNode::List {
                                        member: Box::new(scalar(ScalarKind::String)),
                                    },
                                ),
                            ],
                        }),
                    }),
                },
            )],
        };
        let text = synthesize(&node);
        assert_balanced(&text);
        assert!(text.contains("true|false"));
        assert!(text.contains("[\"string\", ...]"));
    }

    #[test]
    fn empty_structure_renders_empty_braces() {
        let node = SchemaNode::Structure { members: vec![] };
        assert_eq!(synthesize(&node), "{}");
    }

    #[test]
    fn scalar_root_is_rejected() {
        let mut doc = RstDocument::default();
        let style = RstStyle::new();
        let err = json_example(&mut doc, &style, &scalar(ScalarKind::String)).unwrap_err();
        assert!(matches!(err, DocError::UnsupportedSchemaType(_)));
    }
}

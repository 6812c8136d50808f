//! Document lifecycle events: the catalogue, names, wildcard patterns,
//! and the subscription dispatcher.
//!
//! A build fires one dotted event per lifecycle step,
//! `<family>.<event-class>.<qualifiers...>`. Handlers subscribe under
//! patterns derived from the catalogue; a family nobody subscribed to
//! fires as a silent no-op. That opt-in routing is the extension point:
//! a new handler variant participates by listing a capability for a
//! family, nothing else.

use std::fmt;

use crate::error::DocError;
use crate::model::HelpContext;

/// Build class a help context documents. Becomes the literal second
/// segment of every fired event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    Provider,
    Service,
    Operation,
}

impl EventClass {
    pub fn tag(self) -> &'static str {
        match self {
            EventClass::Provider => "Provider",
            EventClass::Service => "Service",
            EventClass::Operation => "Operation",
        }
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The event catalogue: one family per lifecycle notification, fired once
/// per qualifying object during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFamily {
    Title,
    Description,
    SynopsisStart,
    SynopsisOption,
    SynopsisEnd,
    OptionsStart,
    Option,
    OptionExample,
    OptionsEnd,
    Examples,
    SubitemsStart,
    Subitem,
    SubitemsEnd,
}

impl EventFamily {
    pub const ALL: [EventFamily; 13] = [
        EventFamily::Title,
        EventFamily::Description,
        EventFamily::SynopsisStart,
        EventFamily::SynopsisOption,
        EventFamily::SynopsisEnd,
        EventFamily::OptionsStart,
        EventFamily::Option,
        EventFamily::OptionExample,
        EventFamily::OptionsEnd,
        EventFamily::Examples,
        EventFamily::SubitemsStart,
        EventFamily::Subitem,
        EventFamily::SubitemsEnd,
    ];

    /// External family name, the first segment of a fired event.
    pub fn name(self) -> &'static str {
        match self {
            EventFamily::Title => "doc-title",
            EventFamily::Description => "doc-description",
            EventFamily::SynopsisStart => "doc-synopsis-start",
            EventFamily::SynopsisOption => "doc-synopsis-option",
            EventFamily::SynopsisEnd => "doc-synopsis-end",
            EventFamily::OptionsStart => "doc-options-start",
            EventFamily::Option => "doc-option",
            EventFamily::OptionExample => "doc-option-example",
            EventFamily::OptionsEnd => "doc-options-end",
            EventFamily::Examples => "doc-examples",
            EventFamily::SubitemsStart => "doc-subitems-start",
            EventFamily::Subitem => "doc-subitem",
            EventFamily::SubitemsEnd => "doc-subitems-end",
        }
    }

    /// Capability name: the family name with `-` mapped to `_`. Used in
    /// subscription ids.
    pub fn capability_name(self) -> &'static str {
        match self {
            EventFamily::Title => "doc_title",
            EventFamily::Description => "doc_description",
            EventFamily::SynopsisStart => "doc_synopsis_start",
            EventFamily::SynopsisOption => "doc_synopsis_option",
            EventFamily::SynopsisEnd => "doc_synopsis_end",
            EventFamily::OptionsStart => "doc_options_start",
            EventFamily::Option => "doc_option",
            EventFamily::OptionExample => "doc_option_example",
            EventFamily::OptionsEnd => "doc_options_end",
            EventFamily::Examples => "doc_examples",
            EventFamily::SubitemsStart => "doc_subitems_start",
            EventFamily::Subitem => "doc_subitem",
            EventFamily::SubitemsEnd => "doc_subitems_end",
        }
    }

    /// Number of qualifier segments after the event class: 1 for section
    /// events, 2 for per-item events.
    pub fn arity(self) -> usize {
        match self {
            EventFamily::SynopsisOption
            | EventFamily::Option
            | EventFamily::OptionExample
            | EventFamily::Subitem => 2,
            _ => 1,
        }
    }

    /// Subscription pattern for a class: the literal class tag in the
    /// first qualifier slot, a wildcard for each remaining slot.
    pub fn pattern(self, class: EventClass) -> EventPattern {
        let mut raw = format!("{}.{}", self.name(), class.tag());
        for _ in 0..self.arity() {
            raw.push_str(".*");
        }
        EventPattern { raw }
    }

    /// Unique subscription id for one class/capability pair.
    pub fn subscription_id(self, class: EventClass) -> String {
        format!("{}{}", class.tag(), self.capability_name())
    }
}

/// A concrete fired event, `<family>.<class>.<qualifiers...>`.
///
/// Qualifiers are CLI names and identifiers, assumed dot-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventName {
    raw: String,
}

impl EventName {
    pub fn new(family: EventFamily, class: EventClass, qualifiers: &[&str]) -> Self {
        debug_assert_eq!(qualifiers.len(), family.arity());
        let mut raw = format!("{}.{}", family.name(), class.tag());
        for qualifier in qualifiers {
            raw.push('.');
            raw.push_str(qualifier);
        }
        EventName { raw }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Wildcard subscription pattern. `*` matches exactly one segment; a
/// pattern matches a name iff segment counts are equal and every literal
/// segment matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPattern {
    raw: String,
}

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        EventPattern {
            raw: pattern.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, event: &EventName) -> bool {
        let mut pattern = self.raw.split('.');
        let mut name = event.as_str().split('.');
        loop {
            match (pattern.next(), name.next()) {
                (None, None) => return true,
                (Some(p), Some(n)) => {
                    if p != "*" && p != n {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

/// Payload delivered to handler capabilities.
pub struct DocEvent<'a> {
    /// The full fired event.
    pub name: &'a EventName,
    pub help: &'a mut HelpContext,
    /// Argument id for the per-argument families.
    pub arg_name: Option<&'a str>,
    /// Child command name for `doc-subitem`.
    pub item_name: Option<&'a str>,
}

pub type Callback = Box<dyn FnMut(&mut DocEvent<'_>) -> Result<(), DocError>>;

struct Subscription {
    pattern: EventPattern,
    id: String,
    callback: Callback,
}

/// Subscription router. Registration order is invocation order; ids are
/// unique, so re-registering replaces instead of duplicating.
#[derive(Default)]
pub struct EventDispatcher {
    subscriptions: Vec<Subscription>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        EventDispatcher::default()
    }

    /// Register `callback` under `id` for events matching `pattern`.
    /// A subscription already registered under `id` is replaced in place.
    pub fn register(&mut self, pattern: EventPattern, id: impl Into<String>, callback: Callback) {
        let id = id.into();
        match self.subscriptions.iter_mut().find(|sub| sub.id == id) {
            Some(sub) => {
                sub.pattern = pattern;
                sub.callback = callback;
            }
            None => self.subscriptions.push(Subscription {
                pattern,
                id,
                callback,
            }),
        }
    }

    /// Remove the subscription registered under `id`. Unknown ids are a
    /// no-op.
    pub fn unregister(&mut self, id: &str) {
        self.subscriptions.retain(|sub| sub.id != id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Fire one event. Matching subscriptions run to completion in
    /// registration order; no match is a silent no-op.
    pub fn emit(
        &mut self,
        name: &EventName,
        help: &mut HelpContext,
        arg_name: Option<&str>,
        item_name: Option<&str>,
    ) -> Result<(), DocError> {
        for sub in self
            .subscriptions
            .iter_mut()
            .filter(|sub| sub.pattern.matches(name))
        {
            let mut event = DocEvent {
                name,
                help: &mut *help,
                arg_name,
                item_name,
            };
            (sub.callback)(&mut event)?;
        }
        Ok(())
    }
}

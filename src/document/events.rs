use std::fmt;

use crate::types::AttrMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Empty(RawElement),
    Start(RawElement),
    End(String),
    Comment(String),
    Text(String),
    CData(String),
    Other(super::RawXmlEvent),
}

/// Positional metadata for an event within its `InputList`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventMeta {
    /// index of this event in the list
    pub index: usize,
    /// source line the event started on
    pub line: usize,
    /// for Start events, the index of the matching End event (and vice
    /// versa); the subtree of an element is the index span between them
    pub alt_idx: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub event: EventKind,
    pub meta: EventMeta,
}

impl InputEvent {
    /// The element carried by a Start or Empty event.
    pub fn element(&self) -> Option<&RawElement> {
        match &self.event {
            EventKind::Start(el) | EventKind::Empty(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut RawElement> {
        match &mut self.event {
            EventKind::Start(el) | EventKind::Empty(el) => Some(el),
            _ => None,
        }
    }

    /// Index just past this event's subtree: for a Start event that is
    /// beyond the matching End, otherwise beyond the event itself.
    pub fn subtree_end(&self) -> usize {
        match self.event {
            EventKind::Start(_) => self.meta.alt_idx.unwrap_or(self.meta.index) + 1,
            _ => self.meta.index + 1,
        }
    }
}

/// An element name plus its attributes, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    pub name: String,
    pub attrs: AttrMap,
}

impl RawElement {
    pub fn new(name: impl Into<String>, attrs: AttrMap) -> Self {
        Self {
            name: name.into(),
            attrs,
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key, value);
    }

    /// Element name with any namespace prefix stripped.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for RawElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.attrs.is_empty() {
            write!(f, " {}", self.attrs)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputList {
    pub events: Vec<InputEvent>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OutputList {
    pub events: Vec<InputEvent>,
}

impl From<InputList> for OutputList {
    fn from(value: InputList) -> Self {
        Self {
            events: value.events,
        }
    }
}

impl From<Vec<InputEvent>> for OutputList {
    fn from(value: Vec<InputEvent>) -> Self {
        Self { events: value }
    }
}

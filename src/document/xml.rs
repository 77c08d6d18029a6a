use std::io::{BufRead, Write};

use super::{EventKind, EventMeta, InputEvent, InputList, OutputList, RawElement};
use crate::errors::{Error, Result};
use crate::types::AttrMap;

use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::{Reader, Writer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawXmlEvent(XmlEvent<'static>);

impl EventKind {
    fn is_eof(&self) -> bool {
        matches!(self, EventKind::Other(event) if matches!(event.0, XmlEvent::Eof))
    }
}

impl TryFrom<XmlEvent<'_>> for EventKind {
    type Error = Error;
    fn try_from(event: XmlEvent) -> Result<Self> {
        let res = match event {
            XmlEvent::Empty(bs) => EventKind::Empty(bs.try_into()?),
            XmlEvent::Start(bs) => EventKind::Start(bs.try_into()?),
            XmlEvent::End(e) => {
                let name = String::from_utf8(e.name().into_inner().to_vec())?;
                EventKind::End(name)
            }
            XmlEvent::Text(t) => {
                let content = String::from_utf8(t.into_inner().to_vec())?;
                EventKind::Text(content)
            }
            XmlEvent::CData(c) => {
                let content = String::from_utf8(c.into_inner().to_vec())?;
                EventKind::CData(content)
            }
            XmlEvent::Comment(c) => {
                let content = String::from_utf8(c.into_inner().to_vec())?;
                EventKind::Comment(content)
            }
            other => EventKind::Other(RawXmlEvent(other.into_owned())),
        };
        Ok(res)
    }
}

impl<'a> From<EventKind> for XmlEvent<'a> {
    fn from(ev: EventKind) -> XmlEvent<'a> {
        match ev {
            EventKind::Empty(e) => XmlEvent::Empty(e.into()),
            EventKind::Start(e) => XmlEvent::Start(e.into()),
            EventKind::Comment(content) => XmlEvent::Comment(BytesText::from_escaped(content)),
            EventKind::Text(content) => {
                XmlEvent::Text(BytesText::from_escaped(partial_escape(content)))
            }
            EventKind::CData(content) => XmlEvent::CData(BytesCData::new(content)),
            EventKind::End(name) => XmlEvent::End(BytesEnd::new(name)),
            EventKind::Other(event) => event.0,
        }
    }
}

impl TryFrom<BytesStart<'_>> for RawElement {
    type Error = Error;

    /// Build a `RawElement` from a `BytesStart` value. Failures here are
    /// low-level XML type errors (bad attribute names, non-UTF8) rather
    /// than anything semantic about the document.
    fn try_from(e: BytesStart) -> Result<Self> {
        let name = String::from_utf8(e.name().into_inner().to_vec())?;
        let attrs: Result<AttrMap> = e
            .attributes()
            .map(|a| {
                let aa = a.map_err(Error::from_err)?;
                let key = String::from_utf8(aa.key.into_inner().to_vec())?;
                let value = aa.unescape_value().map_err(Error::from_err)?.into_owned();
                Ok((key, value))
            })
            .collect();
        Ok(Self::new(name, attrs?))
    }
}

impl From<RawElement> for BytesStart<'static> {
    fn from(e: RawElement) -> Self {
        let mut bs = BytesStart::new(e.name);
        for (k, v) in e.attrs {
            bs.push_attribute(Attribute::from((k.as_bytes(), v.as_bytes())));
        }
        bs
    }
}

impl std::str::FromStr for InputList {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::from_reader(&mut source.as_bytes())
    }
}

impl InputList {
    pub fn from_reader(reader: &mut dyn BufRead) -> Result<Self> {
        let mut reader = Reader::from_reader(reader);

        let mut events = Vec::new();
        let mut buf = Vec::new();

        // Stack of indices of open tags, for span matching
        let mut event_idx_stack: Vec<usize> = Vec::new();

        let mut src_line = 1;
        let mut index = 0;
        loop {
            let ev = reader.read_event_into(&mut buf);
            let event_lines = if let Ok(ok_ev) = ev.clone() {
                ok_ev.as_ref().iter().filter(|&c| *c == b'\n').count()
            } else {
                0
            };
            let ev =
                ev.map_err(|e| Error::Load(format!("XML error near line {src_line}: {e:?}")))?;
            let mut meta = EventMeta {
                index,
                line: src_line,
                alt_idx: None,
            };

            let e: EventKind = ev.try_into()?;
            if e.is_eof() {
                break;
            }

            match e {
                EventKind::Start(el) => {
                    events.push(InputEvent {
                        event: EventKind::Start(el),
                        meta,
                    });
                    event_idx_stack.push(index);
                }
                EventKind::End(name) => {
                    let start_idx = event_idx_stack.pop();
                    if let Some(start_idx) = start_idx {
                        events[start_idx].meta.alt_idx = Some(index);
                    }
                    meta.alt_idx = start_idx;
                    events.push(InputEvent {
                        event: EventKind::End(name),
                        meta,
                    });
                }
                e => {
                    events.push(InputEvent { event: e, meta });
                }
            }

            src_line += event_lines;
            index += 1;
            buf.clear();
        }

        if let Some(open_idx) = event_idx_stack.pop() {
            return Err(Error::Load(format!(
                "unclosed element at line {}",
                events[open_idx].meta.line
            )));
        }

        Ok(Self { events })
    }
}

impl OutputList {
    pub fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        let mut writer = Writer::new(writer);

        // Separate buffer for coalescing text events; removing subtrees
        // leaves runs of whitespace-only Text behind
        let mut text_buf = String::new();

        for input_event in &self.events {
            let event = input_event.event.clone();
            if let EventKind::Text(ref content) = event {
                text_buf.push_str(content);
                continue;
            } else if !text_buf.is_empty() {
                let text_event = EventKind::Text(trim_line_ends(&text_buf));
                text_buf.clear();
                writer
                    .write_event(text_event)
                    .map_err(|e| Error::Output(format!("{e}")))?;
            }
            writer
                .write_event(event)
                .map_err(|e| Error::Output(format!("{e}")))?;
        }
        // re-add any trailing text
        if !text_buf.is_empty() {
            let text_event = EventKind::Text(trim_line_ends(&text_buf));
            writer
                .write_event(text_event)
                .map_err(|e| Error::Output(format!("{e}")))?;
        }
        Ok(())
    }

    pub fn to_string(&self) -> Result<String> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        String::from_utf8(out).map_err(Error::from)
    }
}

/// Trim trailing whitespace from every complete line of a text run.
/// `trim_end()` alone won't do: a Text event may be followed by a
/// Start/Empty event on the same line.
fn trim_line_ends(s: &str) -> String {
    let mut content = String::new();
    let mut s = s;
    while !s.is_empty() {
        if let Some(idx) = s.find('\n') {
            let (line, remain) = s.split_at(idx);
            s = &remain[1..];
            content.push_str(line.trim_end());
            content.push('\n');
        } else {
            content.push_str(s);
            break;
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_inputlist_minimal() {
        let input = r#"<svg></svg>"#;
        let el = InputList::from_str(input).unwrap();
        assert_eq!(el.events.len(), 2);
        assert_eq!(
            el.events[0].event,
            EventKind::Start(RawElement::new("svg", AttrMap::new()))
        );
        assert_eq!(el.events[0].meta.alt_idx, Some(1));
        assert_eq!(el.events[1].event, EventKind::End("svg".into()));
        assert_eq!(el.events[1].meta.alt_idx, Some(0));
    }

    #[test]
    fn test_inputlist_spans() {
        let input = "<svg>\n  <g id=\"a\"><path d=\"z\"/></g>\n</svg>";
        let el = InputList::from_str(input).unwrap();
        // svg start, text, g start, path empty, g end, text, svg end
        assert_eq!(el.events.len(), 7);
        assert_eq!(el.events[0].meta.alt_idx, Some(6));
        assert_eq!(el.events[2].meta.alt_idx, Some(4));
        assert_eq!(el.events[2].subtree_end(), 5);
        assert_eq!(el.events[3].subtree_end(), 4);
        assert_eq!(el.events[2].meta.line, 2);

        let g = el.events[2].element().unwrap();
        assert_eq!(g.name, "g");
        assert_eq!(g.get_attr("id"), Some(&"a".to_string()));
    }

    #[test]
    fn test_inputlist_malformed() {
        assert!(InputList::from_str("<svg><g></svg>").is_err());
        assert!(InputList::from_str("<svg>").is_err());
        assert!(InputList::from_str(r#"<svg><rect x="y/></svg>"#).is_err());
    }

    #[test]
    fn test_outputlist_roundtrip() {
        let input = r#"<?xml version="1.0"?><svg><g inkscape:label="bg"><path d="m 0,0"/></g></svg>"#;
        let output: OutputList = InputList::from_str(input).unwrap().into();
        assert_eq!(output.to_string().unwrap(), input);
    }
}

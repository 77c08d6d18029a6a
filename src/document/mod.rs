mod events;
mod xml;

pub use events::{EventKind, EventMeta, InputEvent, InputList, OutputList, RawElement};
use xml::RawXmlEvent;

//! Layer extraction: one standalone document per labeled top-level group.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tempfile::NamedTempFile;

use crate::document::{InputList, OutputList, RawElement};
use crate::errors::{Error, Result};
use crate::geometry::{BoundingBox, BoundingBoxBuilder};
use crate::path::path_bbox;
use crate::types::fstr;

/// Style fragment removed from retained groups during annotation.
const STYLE_STRIP: &str = "fill-opacity:1;";
/// Attribute value recorded when a group's subtree has no path points.
const BBOX_UNSET: &str = "none";
/// Namespaced attributes recording the computed bounding box.
const BBOX_ATTRS: [&str; 4] = [
    "pantheon:bbox_minx",
    "pantheon:bbox_miny",
    "pantheon:bbox_maxx",
    "pantheon:bbox_maxy",
];

/// Per-extraction settings.
#[derive(Clone, Debug)]
pub struct SplitConfig {
    /// Annotate retained groups with id / style cleanup / bbox attributes
    pub annotate: bool,
    /// Attribute naming a group's layer label
    pub label_attr: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            annotate: true,
            label_attr: "inkscape:label".to_string(),
        }
    }
}

fn is_group(el: &RawElement) -> bool {
    el.local_name() == "g"
}

fn is_path(el: &RawElement) -> bool {
    el.local_name() == "path"
}

fn root_index(list: &InputList) -> Result<usize> {
    list.events
        .iter()
        .position(|ev| ev.element().is_some())
        .ok_or_else(|| Error::Load("document has no root element".to_string()))
}

/// Indices of the root element's direct children which are elements.
fn top_level_elements(list: &InputList) -> Result<Vec<usize>> {
    let root = root_index(list)?;
    let mut result = Vec::new();
    let mut idx = root + 1;
    // stop at the root's End event
    let end = list.events[root].subtree_end().saturating_sub(1);
    while idx < end {
        let ev = &list.events[idx];
        if ev.element().is_some() {
            result.push(idx);
        }
        idx = ev.subtree_end();
    }
    Ok(result)
}

/// Labels of the top-level groups, in document order.
pub fn group_labels(list: &InputList, label_attr: &str) -> Result<Vec<String>> {
    let mut labels = Vec::new();
    for idx in top_level_elements(list)? {
        let ev = &list.events[idx];
        let el = ev.element().expect("top-level indices are elements");
        if !is_group(el) {
            continue;
        }
        match el.get_attr(label_attr) {
            Some(label) if !label.is_empty() => labels.push(label.clone()),
            _ => tracing::warn!(
                "ignoring top-level group without '{label_attr}' at line {}",
                ev.meta.line
            ),
        }
    }
    Ok(labels)
}

/// Combined bounding box of every path element in the subtree rooted at
/// `start`, or `None` if no path contributes any points.
fn subtree_bbox(list: &InputList, start: usize) -> Result<Option<BoundingBox>> {
    let end = list.events[start].subtree_end();
    let mut bb = BoundingBoxBuilder::new();
    for ev in &list.events[start..end] {
        let Some(el) = ev.element() else { continue };
        if !is_path(el) {
            continue;
        }
        if let Some(d) = el.get_attr("d") {
            if let Some(pb) = path_bbox(d)? {
                bb.extend(pb);
            }
        }
    }
    Ok(bb.build())
}

fn annotate_group(el: &mut RawElement, label: &str, bbox: Option<BoundingBox>) {
    el.set_attr("id", label);
    if let Some(style) = el.get_attr("style").cloned() {
        el.set_attr("style", style.replace(STYLE_STRIP, ""));
    }
    let values = match bbox {
        Some(bb) => [fstr(bb.x1), fstr(bb.y1), fstr(bb.x2), fstr(bb.y2)],
        None => [BBOX_UNSET; 4].map(String::from),
    };
    for (key, value) in BBOX_ATTRS.iter().zip(values) {
        el.set_attr(*key, value);
    }
}

/// Copy of the document with every top-level group other than `label`'s
/// removed. Retained groups are annotated when the config asks for it.
pub fn extract_group(list: &InputList, label: &str, config: &SplitConfig) -> Result<OutputList> {
    let mut drop_spans: Vec<(usize, usize)> = Vec::new();
    let mut retained: Vec<usize> = Vec::new();
    for idx in top_level_elements(list)? {
        let el = list.events[idx]
            .element()
            .expect("top-level indices are elements");
        if !is_group(el) {
            continue;
        }
        if el.get_attr(&config.label_attr).map(String::as_str) == Some(label) {
            retained.push(idx);
        } else {
            drop_spans.push((idx, list.events[idx].subtree_end()));
        }
    }

    let mut events = Vec::with_capacity(list.events.len());
    let mut idx = 0;
    while idx < list.events.len() {
        if let Some(&(_, end)) = drop_spans.iter().find(|(start, _)| *start == idx) {
            idx = end;
            continue;
        }
        let mut ev = list.events[idx].clone();
        if config.annotate && retained.contains(&idx) {
            let bbox = subtree_bbox(list, idx)?;
            let el = ev.element_mut().expect("retained indices are elements");
            annotate_group(el, label, bbox);
        }
        events.push(ev);
        idx += 1;
    }
    Ok(OutputList::from(events))
}

/// Extract a single labeled group from `source` and serialize it.
pub fn extract_str(source: &str, label: &str, config: &SplitConfig) -> Result<String> {
    let list = InputList::from_str(source)?;
    extract_group(&list, label, config)?.to_string()
}

/// Labels of the top-level groups in `source`, in document order.
pub fn group_labels_str(source: &str, label_attr: &str) -> Result<Vec<String>> {
    group_labels(&InputList::from_str(source)?, label_attr)
}

/// Split `source` into `(label, document)` pairs, one per labeled
/// top-level group.
pub fn split_to_strings(source: &str, config: &SplitConfig) -> Result<Vec<(String, String)>> {
    let labels = group_labels_str(source, &config.label_attr)?;
    let mut result = Vec::with_capacity(labels.len());
    for label in labels {
        // each target re-parses its own copy of the document
        let doc = extract_str(source, &label, config)?;
        result.push((label, doc));
    }
    Ok(result)
}

/// Split the document at `input` into one file per labeled top-level
/// group, named `<label>.svg` under `output_dir` (created if needed).
/// Returns the paths written, in discovery order.
pub fn split_file(input: &str, output_dir: &Path, config: &SplitConfig) -> Result<Vec<PathBuf>> {
    let source = fs::read_to_string(input)?;
    let labels = group_labels_str(&source, &config.label_attr)?;
    if labels.is_empty() {
        tracing::warn!("no labeled top-level groups in {input}");
    }
    fs::create_dir_all(output_dir)
        .map_err(|e| Error::Output(format!("{}: {e}", output_dir.display())))?;

    // a failing target is skipped (no partial file) but the remaining
    // targets are still extracted; the first failure is reported at the end
    let mut written = Vec::with_capacity(labels.len());
    let mut first_err = None;
    for label in labels {
        let result = extract_str(&source, &label, config).and_then(|doc| {
            let target = output_dir.join(format!("{label}.svg"));
            write_result(doc.as_bytes(), &target)?;
            tracing::info!("wrote {}", target.display());
            written.push(target);
            Ok(())
        });
        if let Err(e) = result {
            tracing::error!("skipping layer '{label}': {e}");
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(written),
    }
}

/// Write via a temp file then copy into place, so a failed or interrupted
/// write never leaves a partial result at the target path.
fn write_result(content: &[u8], target: &Path) -> Result<()> {
    let out_err = |e: std::io::Error| Error::Output(format!("{}: {e}", target.display()));
    let mut tmp = NamedTempFile::new().map_err(out_err)?;
    tmp.write_all(content).map_err(out_err)?;
    // Copy content rather than rename (by .persist()) since this
    // could cross filesystems.
    fs::copy(tmp.path(), target).map_err(out_err)?;
    Ok(())
}

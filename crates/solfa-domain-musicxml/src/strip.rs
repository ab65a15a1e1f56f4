use crate::writer;
use roxmltree::Document;

/// Tag of the chord-symbol elements removed from recognized scores. These
/// are rendered above the staff and would otherwise sound during playback.
pub const HARMONY_TAG: &str = "harmony";

#[derive(Clone, Debug)]
pub struct StripResult {
    /// The document re-serialized with an XML declaration, indented.
    pub xml: String,
    /// Number of detached `<harmony>` subtrees.
    pub removed: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum StripError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Remove every `<harmony>` element below the root and re-serialize.
///
/// A root-tagged match has no parent to detach it from and is left in
/// place; MusicXML never uses `harmony` as the document root, so this
/// branch only exists for arbitrary input.
pub fn strip_harmony(xml: &str) -> Result<StripResult, StripError> {
    let doc = Document::parse(xml).map_err(|e| StripError::Parse(e.to_string()))?;
    let root = doc.root_element();

    let removed = root
        .descendants()
        .skip(1)
        .filter(|node| node.is_element() && node.has_tag_name(HARMONY_TAG))
        .filter(|node| {
            !node
                .ancestors()
                .skip(1)
                .any(|a| a.is_element() && a.has_tag_name(HARMONY_TAG))
        })
        .count();

    let xml = writer::serialize_document(root, HARMONY_TAG);
    Ok(StripResult { xml, removed })
}

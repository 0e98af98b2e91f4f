use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier of a downstream analysis stage ("1".."7" or "L1".."L4").
pub type StageId = String;

/// One page of extracted text. Pages are 1-based and ordered; a document is
/// an immutable sequence of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub number: usize,
    pub text: String,
}

/// A classifier-proposed pointer to where a section begins. Neither the page
/// estimate nor the marker snippet is guaranteed to be accurate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryHint {
    #[serde(default)]
    pub section_id: i64,
    #[serde(default)]
    pub section_name: String,
    /// 1-based page the marker is claimed to appear on.
    #[serde(default = "default_start_page")]
    pub start_page: i64,
    #[serde(default)]
    pub start_marker: String,
    /// Position within the original proposal, used as a sort tiebreaker.
    #[serde(skip)]
    pub sequence_index: usize,
}

fn default_start_page() -> i64 {
    1
}

/// How a segment's start anchor was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundarySource {
    /// Marker text located in the document.
    Marker,
    /// Marker not found; anchor inherited from the next located hint.
    FilledToNext,
    /// Marker not found and no later anchor; pinned to end of document.
    PageFallback,
    /// Section text supplied verbatim by the collaborator (direct mode).
    LlmDirect,
}

impl BoundarySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundarySource::Marker => "marker",
            BoundarySource::FilledToNext => "filled_to_next",
            BoundarySource::PageFallback => "page_fallback",
            BoundarySource::LlmDirect => "llm_direct",
        }
    }
}

/// A contiguous slice of the document attributed to one section. Segments for
/// one document are ordered and cover the whole text with no gaps or
/// overlaps; zero-length segments are legal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSegment {
    pub section_id: i64,
    pub section_name: String,
    pub start_page: i64,
    pub start_marker: String,
    pub boundary_source: BoundarySource,
    pub text: String,
}

/// A section heading with its location in the full document text. Offsets are
/// byte offsets; `end_offset` is the next heading's start or the document end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Markdown level: 1 = `#`, 2 = `##`, 3 = `###`.
    pub level: u8,
    pub title: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// A bounded piece of text produced by the chunker. Rejoining all chunks of a
/// document with `\n\n` reproduces the source modulo split points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based index within the source text.
    pub index: usize,
    pub text: String,
}

// ── Collaborator wire contracts ───────────────────────────────

/// Boundary-mode response: approximate section start markers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoundaryProposal {
    #[serde(default)]
    pub boundaries: Vec<BoundaryHint>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Heading-routing response: stage → titles, with optional multi-stage
/// assignments folded in by the router.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutingProposal {
    #[serde(default)]
    pub routing: IndexMap<StageId, Vec<String>>,
    #[serde(default)]
    pub multi_assign: IndexMap<String, Vec<StageId>>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Direct-segment response: the collaborator returns full section text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectProposal {
    #[serde(default)]
    pub sections: Vec<DirectSection>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectSection {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_start_page")]
    pub start_page: i64,
    #[serde(default)]
    pub text: String,
}

//! The segmentation collaborator: an LLM proposing either section boundary
//! markers or a heading → stage map.
//!
//! The collaborator is inherently non-deterministic and occasionally wrong —
//! it may return headings that are not present verbatim or omit whole
//! stages. Every parse failure, wrong shape, or empty payload becomes an
//! `OracleError`; the pipeline recovers locally and never surfaces it.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use deepread_core::config::{LlmConfig, OllamaConfig};
use deepread_core::{BoundaryProposal, DirectProposal, ReadingMode, RoutingProposal};

use crate::provider::{CompletionRequest, LlmError, LlmProvider, Message, Role};
use crate::providers::create_provider;

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("provider error: {0}")]
    Provider(#[from] LlmError),
    #[error("response is not valid JSON: {0}")]
    BadJson(String),
    #[error("response shape unusable: {0}")]
    BadShape(String),
    #[error("collaborator call timed out")]
    Timeout,
}

/// The external classifier this engine consults once per document.
#[async_trait]
pub trait SegmentationOracle: Send + Sync {
    /// Propose approximate (marker, page) boundary hints for the document.
    /// `is_skeleton` marks input reduced to headers and context lines.
    async fn propose_boundaries(
        &self,
        document: &str,
        is_skeleton: bool,
    ) -> Result<BoundaryProposal, OracleError>;

    /// Propose a stage → titles map for the extracted headings.
    async fn propose_routing(
        &self,
        mode: ReadingMode,
        headings: &[String],
    ) -> Result<RoutingProposal, OracleError>;

    /// Ask for full section text directly instead of boundary markers.
    async fn propose_direct(&self, document: &str) -> Result<DirectProposal, OracleError>;
}

/// `SegmentationOracle` over any `LlmProvider` backend.
pub struct LlmOracle {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmOracle {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(
        llm_config: &LlmConfig,
        ollama_config: &OllamaConfig,
    ) -> Result<Self, LlmError> {
        let provider = create_provider(llm_config, ollama_config)?;
        Ok(Self::new(
            provider,
            llm_config.temperature,
            llm_config.max_tokens,
        ))
    }

    async fn complete_json(&self, system: &str, user: String) -> Result<Value, OracleError> {
        let request = CompletionRequest {
            messages: vec![
                Message {
                    role: Role::System,
                    content: system.to_string(),
                },
                Message {
                    role: Role::User,
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_object: true,
        };

        let response = self.provider.complete(request).await?;
        debug!(chars = response.len(), "collaborator response received");

        let json_str = extract_json(&response);
        serde_json::from_str(json_str).map_err(|e| OracleError::BadJson(e.to_string()))
    }
}

#[async_trait]
impl SegmentationOracle for LlmOracle {
    async fn propose_boundaries(
        &self,
        document: &str,
        is_skeleton: bool,
    ) -> Result<BoundaryProposal, OracleError> {
        let context_desc = if is_skeleton {
            "summary skeleton (titles and key lines)"
        } else {
            "full raw text"
        };
        let user = format!(
            r#"You will receive the {context_desc} of an academic paper (with [PAGE N] tags).

Task:
1. Extract the actual top-level section structure.
   - Must include "Abstract" (if any).
   - Must include all main sections (e.g., "1 Introduction", "2 Data").
   - Must include "References" or "Bibliography" as the last section if present.
   - Must include "Appendices" (if any).
2. For each section, give the exact start marker and start page.
   - "start_marker": a unique short text snippet from the document that marks
     the beginning (usually the title line, <= 80 characters, no rewriting).
   - "start_page": the page number where this marker appears.

Output JSON only:
{{
  "boundaries": [
    {{"section_id": 1, "section_name": "Abstract", "start_page": 1, "start_marker": "Abstract"}},
    {{"section_id": 2, "section_name": "1. Introduction", "start_page": 2, "start_marker": "1 Introduction"}}
  ],
  "notes": ["..."]
}}

Input text:
{document}
"#
        );

        info!(chars = document.len(), skeleton = is_skeleton, "requesting boundary proposal");
        let value = self
            .complete_json(
                "You are a precise academic structure analyzer. Output strict JSON.",
                user,
            )
            .await?;

        let mut proposal: BoundaryProposal =
            serde_json::from_value(value).map_err(|e| OracleError::BadShape(e.to_string()))?;
        if proposal.boundaries.is_empty() {
            return Err(OracleError::BadShape("no boundaries returned".into()));
        }
        for (i, hint) in proposal.boundaries.iter_mut().enumerate() {
            hint.sequence_index = i;
        }
        Ok(proposal)
    }

    async fn propose_routing(
        &self,
        mode: ReadingMode,
        headings: &[String],
    ) -> Result<RoutingProposal, OracleError> {
        let plan = mode.plan();
        let stage_desc: Vec<String> = plan
            .stages
            .iter()
            .map(|s| format!("  {}: {}", s.id, s.description))
            .collect();
        let heading_list = serde_json::to_string_pretty(headings)
            .map_err(|e| OracleError::BadJson(e.to_string()))?;

        let user = format!(
            r#"Map each paper section title to the matching analysis stages.

Stage definitions:
{stages}

Section titles:
{headings}

Rules:
- Use the input titles verbatim. Do not rewrite, abbreviate, or translate.
- One section may belong to several stages. A "研究设计" / "Empirical
  Strategy" section usually covers data, variables and model at once; put
  such titles in "multi_assign".
- Unimportant sections (references, acknowledgements) go in "skip".

Output JSON only:
{{
  "routing": {{"<stage_id>": ["<title>", "..."]}},
  "multi_assign": {{"<title>": ["<stage_id>", "..."]}},
  "skip": ["<title>"],
  "notes": ["..."]
}}
"#,
            stages = stage_desc.join("\n"),
            headings = heading_list,
        );

        info!(count = headings.len(), mode = mode.as_str(), "requesting routing proposal");
        let value = self
            .complete_json(
                "You are an academic paper structure analysis expert. Output JSON only, no commentary.",
                user,
            )
            .await?;

        let proposal: RoutingProposal =
            serde_json::from_value(value).map_err(|e| OracleError::BadShape(e.to_string()))?;
        if proposal.routing.is_empty() && proposal.multi_assign.is_empty() {
            return Err(OracleError::BadShape("no routing returned".into()));
        }
        Ok(proposal)
    }

    async fn propose_direct(&self, document: &str) -> Result<DirectProposal, OracleError> {
        let user = format!(
            r#"Split the following paper into its standard top-level sections.

Task:
1. Identify every top-level section (Abstract, Introduction, Data, Model,
   Results, Conclusion, References, Appendix, ...).
2. For each section return its complete text, unabridged and unsummarized,
   preserving line breaks. The References section alone may be truncated to
   its first entries.
3. Record the start page of each section (infer from the [PAGE N] tags).

Output JSON only:
{{
  "sections": [
    {{"id": 1, "name": "Abstract", "start_page": 1, "text": "..."}}
  ],
  "notes": ["..."]
}}

Full text:
{document}
"#
        );

        info!(chars = document.len(), "requesting direct segmentation");
        let value = self
            .complete_json(
                "You are a meticulous academic editing assistant. Output JSON only, no commentary.",
                user,
            )
            .await?;

        let proposal: DirectProposal =
            serde_json::from_value(value).map_err(|e| OracleError::BadShape(e.to_string()))?;
        if proposal.sections.is_empty() {
            return Err(OracleError::BadShape("no sections returned".into()));
        }
        Ok(proposal)
    }
}

/// Extract JSON from an LLM response, handling markdown code blocks.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            return trimmed[json_start..json_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks
    if let Some(start) = trimmed.find("```") {
        let json_start = start + 3;
        // Skip past any language identifier on the same line
        let after_tick = &trimmed[json_start..];
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    // Try raw JSON (starts with {)
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

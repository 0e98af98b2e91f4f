//! The three-tier routing state machine.
//!
//! A document's headings move through LLM classification, keyword rules, and
//! a positional backstop. Each tier only fills stages the earlier tiers left
//! empty, so an assignment is promoted, never demoted. The classifier is the
//! most semantically accurate tier but can omit whole stages; the rule tier
//! recovers common cases; the positional tier guarantees coverage whenever
//! the document has at least one heading.

use deepread_core::config::RouterConfig;
use deepread_core::{Heading, PositionBand, ReadingMode, RoutingProposal, StagePlan};
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::fuzzy::match_title;
use crate::keywords::{stage_keywords, EXCLUDE_KEYWORDS, MULTI_STAGE_TITLES};

/// Which tier filled a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTier {
    Llm,
    Rule,
    Position,
}

impl RouteTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteTier::Llm => "llm",
            RouteTier::Rule => "rule",
            RouteTier::Position => "position",
        }
    }
}

/// The frozen routing decision for one document.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    pub mode: ReadingMode,
    /// Stage id → assigned heading titles, in stage order. A title may appear
    /// under several stages; no stage is empty when the document has headings.
    pub stages: IndexMap<String, Vec<String>>,
    /// Stage id → the tier that filled it.
    pub sources: IndexMap<String, RouteTier>,
    /// Collaborator notes, kept for the audit report.
    pub notes: Vec<String>,
}

pub struct HeadingRouter {
    config: RouterConfig,
}

impl HeadingRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Merge a collaborator proposal (when available) with the keyword rules
    /// and the positional backstop so that every stage ends non-empty.
    pub fn route(
        &self,
        mode: ReadingMode,
        headings: &[Heading],
        proposal: Option<RoutingProposal>,
    ) -> RoutingTable {
        let plan = mode.plan();
        let titles: Vec<String> = headings.iter().map(|h| h.title.clone()).collect();

        let mut stages: IndexMap<String, Vec<String>> = plan
            .stages
            .iter()
            .map(|s| (s.id.to_string(), Vec::new()))
            .collect();
        let mut sources: IndexMap<String, RouteTier> = IndexMap::new();
        let mut notes = Vec::new();

        if let Some(p) = proposal {
            notes = p.notes.clone();
            self.apply_proposal(p, &titles, &mut stages, &mut sources);
        }

        self.fill_by_rules(plan, mode, &titles, &mut stages, &mut sources);
        self.fill_by_position(plan, &titles, &mut stages, &mut sources);

        RoutingTable {
            mode,
            stages,
            sources,
            notes,
        }
    }

    /// LLM tier: fold multi-stage assignments into the main map, then resolve
    /// each proposed title against the real headings. Unresolvable titles are
    /// dropped with a warning, never fatal.
    fn apply_proposal(
        &self,
        proposal: RoutingProposal,
        titles: &[String],
        stages: &mut IndexMap<String, Vec<String>>,
        sources: &mut IndexMap<String, RouteTier>,
    ) {
        let mut routing = proposal.routing;
        for (title, stage_ids) in proposal.multi_assign {
            for stage_id in stage_ids {
                let slot = routing.entry(stage_id).or_default();
                if !slot.contains(&title) {
                    slot.push(title.clone());
                }
            }
        }

        for (stage_id, proposed) in routing {
            let Some(slot) = stages.get_mut(&stage_id) else {
                warn!(stage = %stage_id, "collaborator proposed unknown stage, ignored");
                continue;
            };
            for candidate in proposed {
                match match_title(&candidate, titles, self.config.fuzzy_threshold) {
                    Some(real) => {
                        if !slot.iter().any(|t| t == real) {
                            slot.push(real.to_string());
                        }
                    }
                    None => {
                        warn!(title = %candidate, "collaborator title matches no heading, dropped");
                    }
                }
            }
            if !slot.is_empty() {
                sources.insert(stage_id, RouteTier::Llm);
            }
        }
    }

    /// Rule tier: fill stages the classifier left empty from the bilingual
    /// keyword table, excluding references/appendix/acknowledgement headings.
    fn fill_by_rules(
        &self,
        plan: &StagePlan,
        mode: ReadingMode,
        titles: &[String],
        stages: &mut IndexMap<String, Vec<String>>,
        sources: &mut IndexMap<String, RouteTier>,
    ) {
        for stage in plan.stages {
            if !stages[stage.id].is_empty() {
                continue;
            }
            let assigned = rule_assign(stage.id, mode, titles);
            if !assigned.is_empty() {
                info!(stage = stage.id, count = assigned.len(), "stage filled by keyword rules");
                sources.insert(stage.id.to_string(), RouteTier::Rule);
                stages[stage.id] = assigned;
            }
        }
    }

    /// Positional tier: partition the heading sequence at the configured
    /// percentile indices and hand each still-empty stage its band's window.
    /// A correctness backstop, not a quality guarantee.
    fn fill_by_position(
        &self,
        plan: &StagePlan,
        titles: &[String],
        stages: &mut IndexMap<String, Vec<String>>,
        sources: &mut IndexMap<String, RouteTier>,
    ) {
        let total = titles.len();
        if total == 0 {
            return;
        }
        let idx_front = (total as f64 * self.config.front_percentile) as usize;
        let idx_middle = (total as f64 * self.config.middle_percentile) as usize;

        for stage in plan.stages {
            if !stages[stage.id].is_empty() {
                continue;
            }
            let assigned: Vec<String> = match stage.band {
                PositionBand::Front => titles[..(idx_front + 1).min(total)].to_vec(),
                PositionBand::Middle => {
                    let (start, end) = if idx_front >= idx_middle + 1 {
                        (0, total)
                    } else {
                        (idx_front, (idx_middle + 1).min(total))
                    };
                    titles[start..end].to_vec()
                }
                PositionBand::End => titles[idx_middle.min(total - 1)..].to_vec(),
            };
            warn!(stage = stage.id, "stage filled positionally");
            sources.insert(stage.id.to_string(), RouteTier::Position);
            stages[stage.id] = assigned;
        }
    }
}

fn rule_assign(stage_id: &str, mode: ReadingMode, titles: &[String]) -> Vec<String> {
    let keywords: &[&str] = stage_keywords(mode)
        .iter()
        .find(|(id, _)| *id == stage_id)
        .map(|(_, kws)| *kws)
        .unwrap_or(&[]);

    let mut assigned = Vec::new();
    for title in titles {
        let lower = title.to_lowercase();
        if EXCLUDE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            continue;
        }
        let multi = MULTI_STAGE_TITLES
            .iter()
            .any(|(t, ids)| lower.contains(t) && ids.contains(&stage_id));
        if multi || keywords.iter().any(|kw| lower.contains(kw)) {
            assigned.push(title.clone());
        }
    }
    assigned
}

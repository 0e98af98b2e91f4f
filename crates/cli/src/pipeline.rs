//! One document run: pages → boundaries or routing → artifacts on disk.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use deepread_core::{
    BoundarySource, Config, DeepreadError, Page, ReadingMode, ResolvedSegment,
};
use deepread_llm::{LlmOracle, OracleError, SegmentationOracle};
use deepread_router::{
    bundle_stages, detect_mode, extract_headings, render_routing_report, render_stage_bundles,
    HeadingRouter,
};
use deepread_segment::{
    extract_skeleton, full_text_with_page_tags, normalize_newlines, parse_raw_pages,
    render_segmented_md, resolve_segments,
};

use crate::cli::{CliArgs, StrategyArg};

pub struct RunOutput {
    pub mode: Option<ReadingMode>,
    pub artifacts: Vec<PathBuf>,
}

pub struct Pipeline {
    config: Config,
    oracle: Option<LlmOracle>,
}

impl Pipeline {
    /// Build the pipeline, creating the collaborator when one is configured.
    /// A missing or misconfigured collaborator is not an error; the local
    /// tiers carry the run.
    pub fn new(config: Config) -> Self {
        let oracle = if config.llm.is_configured() {
            match LlmOracle::from_config(&config.llm, &config.ollama) {
                Ok(o) => Some(o),
                Err(e) => {
                    warn!(error = %e, "collaborator unavailable, using local fallback only");
                    None
                }
            }
        } else {
            warn!("no LLM provider configured, using local fallback only");
            None
        };
        Self::with_oracle(config, oracle)
    }

    pub fn with_oracle(config: Config, oracle: Option<LlmOracle>) -> Self {
        Self { config, oracle }
    }

    pub async fn run(&self, args: &CliArgs) -> Result<RunOutput> {
        let raw = std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?;
        let pages = load_pages(&raw)?;
        info!(pages = pages.len(), "document loaded");

        std::fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("failed to create {}", args.out_dir.display()))?;
        let base = base_name(&args.input);

        match args.strategy {
            StrategyArg::Boundary => self.run_boundary(args, &pages, &base).await,
            StrategyArg::Routing => self.run_routing(args, &pages, &base).await,
        }
    }

    /// Boundary strategy: collaborator hints, local slicing. Collaborator
    /// unavailability falls back to the routing strategy, never fails the run.
    async fn run_boundary(
        &self,
        args: &CliArgs,
        pages: &[Page],
        base: &str,
    ) -> Result<RunOutput> {
        let segments = match self.propose_segments(pages, args.direct).await {
            Ok(segments) => segments,
            Err(e) => {
                warn!(error = %e, "collaborator unavailable, falling back to heading routing");
                return self.run_routing(args, pages, base).await;
            }
        };

        for seg in &segments {
            if seg.text.chars().count() < self.config.segmenter.short_segment_warn {
                warn!(
                    section = %seg.section_name,
                    chars = seg.text.chars().count(),
                    "very short segment, check the boundary"
                );
            }
        }
        info!(segments = segments.len(), "document segmented");

        let md = render_segmented_md(&args.input.display().to_string(), &segments, &[]);
        let out_path = args.out_dir.join(format!("{base}_segmented.md"));
        std::fs::write(&out_path, md)
            .with_context(|| format!("failed to write {}", out_path.display()))?;

        Ok(RunOutput {
            mode: None,
            artifacts: vec![out_path],
        })
    }

    async fn propose_segments(
        &self,
        pages: &[Page],
        direct: bool,
    ) -> Result<Vec<ResolvedSegment>, OracleError> {
        let oracle = self
            .oracle
            .as_ref()
            .ok_or(OracleError::BadShape("no collaborator configured".into()))?;

        let full = full_text_with_page_tags(pages);

        if direct {
            let proposal = self.with_timeout(oracle.propose_direct(&full)).await?;
            return Ok(proposal
                .sections
                .into_iter()
                .map(|s| ResolvedSegment {
                    section_id: s.id,
                    section_name: s.name.clone(),
                    start_page: s.start_page,
                    start_marker: s.name,
                    boundary_source: BoundarySource::LlmDirect,
                    text: normalize_newlines(&s.text),
                })
                .collect());
        }

        // Long documents send a skeleton so the boundary prompt stays within
        // context limits.
        let use_skeleton = full.chars().count() > self.config.segmenter.skeleton_threshold;
        let input = if use_skeleton {
            extract_skeleton(pages)
        } else {
            full
        };

        let proposal = self
            .with_timeout(oracle.propose_boundaries(&input, use_skeleton))
            .await?;
        Ok(resolve_segments(pages, &proposal.boundaries))
    }

    /// Routing strategy: extract headings, classify (collaborator when
    /// available, rules and position otherwise), slice locally, bundle per
    /// stage.
    async fn run_routing(&self, args: &CliArgs, pages: &[Page], base: &str) -> Result<RunOutput> {
        let content = if pages.len() == 1 {
            pages[0].text.clone()
        } else {
            pages
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let headings = extract_headings(&content);
        if headings.is_empty() {
            return Err(DeepreadError::EmptyDocument(
                "no section headings found".to_string(),
            )
            .into());
        }
        let titles: Vec<String> = headings.iter().map(|h| h.title.clone()).collect();

        let mode = args.mode.forced().unwrap_or_else(|| detect_mode(&titles));

        let proposal = match &self.oracle {
            Some(oracle) => match self
                .with_timeout(oracle.propose_routing(mode, &titles))
                .await
            {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(error = %e, "collaborator unavailable, continuing with local tiers");
                    None
                }
            },
            None => None,
        };

        let router = HeadingRouter::new(self.config.router.clone());
        let table = router.route(mode, &headings, proposal);
        let bundles = bundle_stages(&content, &headings, &table);

        for (stage, text) in &bundles {
            if text.chars().count() < self.config.segmenter.short_segment_warn {
                warn!(stage = %stage, chars = text.chars().count(), "very short stage bundle");
            }
        }

        let source = args.input.display().to_string();
        let segmented = render_stage_bundles(&source, &table, &bundles);
        let report = render_routing_report(&source, &table);

        let segmented_path = args.out_dir.join(format!("{base}_segmented.md"));
        let report_path = args.out_dir.join(format!("{base}_routing.md"));
        std::fs::write(&segmented_path, segmented)
            .with_context(|| format!("failed to write {}", segmented_path.display()))?;
        std::fs::write(&report_path, report)
            .with_context(|| format!("failed to write {}", report_path.display()))?;

        Ok(RunOutput {
            mode: Some(mode),
            artifacts: vec![segmented_path, report_path],
        })
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, OracleError>>,
    ) -> Result<T, OracleError> {
        let timeout = Duration::from_secs(self.config.llm.timeout_secs);
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout),
        }
    }
}

/// Try the per-page format first; a structured markdown document without page
/// markers becomes a single page when it carries headings to route on.
fn load_pages(raw: &str) -> Result<Vec<Page>, DeepreadError> {
    match parse_raw_pages(raw) {
        Ok(pages) => Ok(pages),
        Err(DeepreadError::EmptyDocument(_)) if !extract_headings(raw).is_empty() => {
            info!("no page markers found, treating input as one structured page");
            Ok(vec![Page {
                number: 1,
                text: raw.to_string(),
            }])
        }
        Err(e) => Err(e),
    }
}

/// Output base name: file stem minus the extractor suffix.
fn base_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    stem.strip_suffix("_raw")
        .or_else(|| stem.strip_suffix("_paddleocr"))
        .unwrap_or(&stem)
        .to_string()
}

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use deepread_core::ReadingMode;

/// Segment a paper's extracted text and route sections to analysis stages.
#[derive(Debug, Parser)]
#[command(name = "deepread")]
pub struct CliArgs {
    /// Path to the extracted markdown (per-page raw or structured).
    pub input: PathBuf,

    /// Output directory for the segmentation artifacts.
    #[arg(long = "out_dir", default_value = "pdf_segmented_md")]
    pub out_dir: PathBuf,

    /// Paper type: auto-detect, quantitative 7-step, or qualitative 4-layer.
    #[arg(long, value_enum, default_value = "auto")]
    pub mode: ModeArg,

    /// Segmentation strategy.
    #[arg(long, value_enum, default_value = "routing")]
    pub strategy: StrategyArg,

    /// With the boundary strategy, ask the collaborator for full section
    /// text instead of boundary markers.
    #[arg(long)]
    pub direct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Quant,
    Qual,
}

impl ModeArg {
    pub fn forced(&self) -> Option<ReadingMode> {
        match self {
            ModeArg::Auto => None,
            ModeArg::Quant => Some(ReadingMode::Quant),
            ModeArg::Qual => Some(ReadingMode::Qual),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Classify headings, slice locally, bundle per stage.
    Routing,
    /// Ask for boundary markers, slice between located anchors.
    Boundary,
}

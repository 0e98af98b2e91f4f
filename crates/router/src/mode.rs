//! Quant/qual paper-type detection from heading text.

use deepread_core::ReadingMode;
use tracing::info;

const QUANT_SIGNALS: &[&str] = &[
    "regression", "ols", "did", "iv", "rdd", "panel data", "robustness", "endogeneity", "系数",
    "回归", "稳健性", "实证分析", "计量模型", "内生性",
];

const QUAL_SIGNALS: &[&str] = &[
    "case study", "grounded theory", "qca", "qualitative", "interview", "案例研究", "扎根理论",
    "访谈", "质性研究",
];

/// Score heading text against both signal lists; ties go to quant.
pub fn detect_mode(headings: &[String]) -> ReadingMode {
    let joined = headings.join(" ").to_lowercase();
    let quant = QUANT_SIGNALS.iter().filter(|k| joined.contains(*k)).count();
    let qual = QUAL_SIGNALS.iter().filter(|k| joined.contains(*k)).count();
    let mode = if quant >= qual {
        ReadingMode::Quant
    } else {
        ReadingMode::Qual
    };
    info!(quant, qual, mode = mode.as_str(), "paper mode detected");
    mode
}

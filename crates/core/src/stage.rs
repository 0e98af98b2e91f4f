use serde::{Deserialize, Serialize};

/// Which reading plan a paper is routed through: the quantitative 7-step plan
/// or the qualitative 4-layer pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    Quant,
    Qual,
}

impl ReadingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingMode::Quant => "quant",
            ReadingMode::Qual => "qual",
        }
    }

    pub fn plan(&self) -> &'static StagePlan {
        match self {
            ReadingMode::Quant => &QUANT_PLAN,
            ReadingMode::Qual => &QUAL_PLAN,
        }
    }
}

/// Where a stage's content typically sits in a paper. Drives the positional
/// fallback: Front stages draw from the first quarter of headings, End stages
/// from the final third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionBand {
    Front,
    Middle,
    End,
}

/// One downstream analysis stage.
#[derive(Debug, Clone)]
pub struct Stage {
    pub id: &'static str,
    pub name: &'static str,
    /// Bilingual description shown to the classification collaborator.
    pub description: &'static str,
    pub band: PositionBand,
}

/// The ordered set of stages for one reading mode.
#[derive(Debug, Clone)]
pub struct StagePlan {
    pub mode: ReadingMode,
    pub stages: &'static [Stage],
}

impl StagePlan {
    pub fn stage_ids(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.id).collect()
    }

    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }
}

pub static QUANT_PLAN: StagePlan = StagePlan {
    mode: ReadingMode::Quant,
    stages: &[
        Stage {
            id: "1",
            name: "Overview",
            description: "Overview (全景扫描) - 摘要、引言、结论、研究背景、核心贡献",
            band: PositionBand::Front,
        },
        Stage {
            id: "2",
            name: "Theory",
            description: "Theory (理论与假说) - 文献综述、理论框架、研究假设",
            band: PositionBand::Front,
        },
        Stage {
            id: "3",
            name: "Data",
            description: "Data (数据考古) - 数据来源、样本选择、数据清洗",
            band: PositionBand::Middle,
        },
        Stage {
            id: "4",
            name: "Variables",
            description: "Variables (变量与测量) - 核心变量定义、测量方法、描述性统计",
            band: PositionBand::Middle,
        },
        Stage {
            id: "5",
            name: "Identification",
            description: "Identification (识别策略) - 计量模型、内生性讨论、IV/DID/RDD",
            band: PositionBand::Middle,
        },
        Stage {
            id: "6",
            name: "Results",
            description: "Results (结果解读) - 实证结果、回归分析、稳健性检验",
            band: PositionBand::End,
        },
        Stage {
            id: "7",
            name: "Critique",
            description: "Critique (专家批判) - 研究局限、未来展望、政策建议",
            band: PositionBand::End,
        },
    ],
};

pub static QUAL_PLAN: StagePlan = StagePlan {
    mode: ReadingMode::Qual,
    stages: &[
        Stage {
            id: "L1",
            name: "Context",
            description: "L1_Context (背景层) - 摘要、引言、政策背景、现状数据",
            band: PositionBand::Front,
        },
        Stage {
            id: "L2",
            name: "Theory",
            description: "L2_Theory (理论层) - 文献综述、理论框架、核心构念",
            band: PositionBand::Front,
        },
        Stage {
            id: "L3",
            name: "Logic",
            description: "L3_Logic (逻辑层) - 方法设计、案例分析、机制路径、实证结果",
            band: PositionBand::Middle,
        },
        Stage {
            id: "L4",
            name: "Value",
            description: "L4_Value (价值层) - 结论、讨论、研究缺口、理论贡献、实践启示",
            band: PositionBand::End,
        },
    ],
};

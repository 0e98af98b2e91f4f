//! Bilingual keyword tables for the rule tier of section routing.

use deepread_core::ReadingMode;

/// Headings that never route to an analysis stage.
pub const EXCLUDE_KEYWORDS: &[&str] = &[
    "reference",
    "参考文献",
    "appendix",
    "附录",
    "acknowledgement",
    "致谢",
    "text content",
];

/// Titles that legitimately span several stages at once: a "研究设计"
/// (research design) section usually covers data, variables and model.
/// Multi-label assignment here is deliberate, not an artifact.
pub const MULTI_STAGE_TITLES: &[(&str, &[&str])] = &[
    ("研究设计", &["3", "4", "5"]),
    ("实证设计", &["3", "4", "5"]),
    ("methodology", &["3", "4", "5"]),
    ("empirical strategy", &["3", "4", "5"]),
];

/// Per-stage keyword lists, matched as case-insensitive substrings.
pub fn stage_keywords(mode: ReadingMode) -> &'static [(&'static str, &'static [&'static str])] {
    match mode {
        ReadingMode::Quant => QUANT_KEYWORDS,
        ReadingMode::Qual => QUAL_KEYWORDS,
    }
}

const QUANT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "1",
        &[
            "abstract", "introduction", "overview", "preface", "摘要", "引言", "绪论",
            "问题的提出", "研究背景",
        ],
    ),
    (
        "2",
        &[
            "literature", "theory", "hypothesis", "background", "framework", "文献", "理论",
            "假说", "假设", "背景", "框架", "机理",
        ],
    ),
    (
        "3",
        &["data", "sample", "source", "material", "design", "数据", "样本", "来源", "资料", "设计"],
    ),
    (
        "4",
        &[
            "variable", "measure", "indicator", "descriptive", "definition", "design", "变量",
            "测度", "测量", "指标", "描述", "定义", "设计",
        ],
    ),
    (
        "5",
        &[
            "model", "method", "strategy", "identification", "equation", "design", "模型",
            "方法", "策略", "识别", "方程", "设计",
        ],
    ),
    (
        "6",
        &[
            "result", "finding", "empirical", "analysis", "discussion", "结果", "发现", "实证",
            "分析", "回归", "检验",
        ],
    ),
    (
        "7",
        &[
            "conclusion", "limitation", "policy", "implication", "future", "结论", "局限",
            "不足", "政策", "启示", "展望", "结语",
        ],
    ),
];

const QUAL_KEYWORDS: &[(&str, &[&str])] = &[
    ("L1", &["abstract", "introduction", "摘要", "引言", "背景"]),
    ("L2", &["literature", "theory", "文献", "理论", "综述"]),
    ("L3", &["method", "result", "case", "方法", "结果", "案例", "分析"]),
    ("L4", &["conclusion", "discussion", "结论", "讨论", "启示"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_quant_stage_has_keywords() {
        let table = stage_keywords(ReadingMode::Quant);
        assert_eq!(table.len(), 7);
        for (_, kws) in table {
            assert!(!kws.is_empty());
        }
    }

    #[test]
    fn every_qual_stage_has_keywords() {
        assert_eq!(stage_keywords(ReadingMode::Qual).len(), 4);
    }

    #[test]
    fn multi_stage_titles_target_existing_quant_stages() {
        let ids: Vec<&str> = ReadingMode::Quant.plan().stage_ids();
        for (_, stages) in MULTI_STAGE_TITLES {
            for s in *stages {
                assert!(ids.contains(s));
            }
        }
    }
}

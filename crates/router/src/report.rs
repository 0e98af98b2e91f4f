//! Human-readable routing artifacts for audit.

use indexmap::IndexMap;

use crate::router::RoutingTable;

/// Render the routing decision: which titles went to which stage, and which
/// tier made the call.
pub fn render_routing_report(source: &str, table: &RoutingTable) -> String {
    let now = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S");
    let plan = table.mode.plan();

    let mut out: Vec<String> = vec![
        "# Section routing report".to_string(),
        String::new(),
        format!("- Source: {source}"),
        format!("- Mode: {}", table.mode.as_str()),
        format!("- Generated At: {now}"),
        String::new(),
    ];

    if !table.notes.is_empty() {
        out.push("## Notes".to_string());
        for n in &table.notes {
            out.push(format!("- {n}"));
        }
        out.push(String::new());
    }

    for stage in plan.stages {
        let titles = table.stages.get(stage.id).map(Vec::as_slice).unwrap_or(&[]);
        let tier = table
            .sources
            .get(stage.id)
            .map(|t| t.as_str())
            .unwrap_or("unassigned");
        out.push(format!("## Stage {}: {}", stage.id, stage.name));
        out.push(String::new());
        out.push(format!("- assigned_by: {tier}"));
        if titles.is_empty() {
            out.push("- (no titles)".to_string());
        } else {
            for t in titles {
                out.push(format!("- {t}"));
            }
        }
        out.push(String::new());
    }

    finish(out)
}

/// Render per-stage text bundles as one markdown document, with the routing
/// map up front for debugging.
pub fn render_stage_bundles(
    source: &str,
    table: &RoutingTable,
    bundles: &IndexMap<String, String>,
) -> String {
    let now = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S");
    let plan = table.mode.plan();

    let mut out: Vec<String> = vec![
        "# Structured paper segmentation".to_string(),
        String::new(),
        format!("- Source: {source}"),
        format!("- Mode: {}", table.mode.as_str()),
        format!("- Generated At: {now}"),
        String::new(),
        "## Routing map".to_string(),
        String::new(),
    ];

    for stage in plan.stages {
        out.push(format!("- {}: {}", stage.id, stage.name));
    }
    out.push(String::new());

    for stage in plan.stages {
        let Some(text) = bundles.get(stage.id) else {
            continue;
        };
        out.push(format!("## {}. {}", stage.id, stage.name));
        out.push(String::new());
        out.push("```text".to_string());
        out.push(text.clone());
        out.push("```".to_string());
        out.push(String::new());
    }

    finish(out)
}

fn finish(lines: Vec<String>) -> String {
    let mut rendered = lines.join("\n");
    rendered.truncate(rendered.trim_end().len());
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use deepread_core::ReadingMode;

    use crate::router::RouteTier;

    use super::*;

    fn sample_table() -> RoutingTable {
        RoutingTable {
            mode: ReadingMode::Qual,
            stages: IndexMap::from_iter([
                ("L1".to_string(), vec!["摘要".to_string()]),
                ("L2".to_string(), vec!["2 文献综述".to_string()]),
                ("L3".to_string(), vec!["3 案例分析".to_string()]),
                ("L4".to_string(), vec!["4 结论".to_string()]),
            ]),
            sources: IndexMap::from_iter([
                ("L1".to_string(), RouteTier::Llm),
                ("L2".to_string(), RouteTier::Llm),
                ("L3".to_string(), RouteTier::Rule),
                ("L4".to_string(), RouteTier::Position),
            ]),
            notes: vec!["引言归入背景层".to_string()],
        }
    }

    #[test]
    fn report_lists_stages_and_tiers() {
        let report = render_routing_report("paper.md", &sample_table());
        assert!(report.contains("## Stage L1: Context"));
        assert!(report.contains("- assigned_by: llm"));
        assert!(report.contains("- assigned_by: rule"));
        assert!(report.contains("- assigned_by: position"));
        assert!(report.contains("- 摘要"));
        assert!(report.contains("- 引言归入背景层"));
    }

    #[test]
    fn bundles_render_in_stage_order() {
        let bundles: IndexMap<String, String> = IndexMap::from_iter([
            ("L1".to_string(), "context text".to_string()),
            ("L2".to_string(), "theory text".to_string()),
            ("L3".to_string(), "logic text".to_string()),
            ("L4".to_string(), "value text".to_string()),
        ]);
        let md = render_stage_bundles("paper.md", &sample_table(), &bundles);
        assert!(md.contains("## Routing map"));
        assert!(md.contains("## L1. Context"));
        let l1 = md.find("## L1. Context").unwrap();
        let l4 = md.find("## L4. Value").unwrap();
        assert!(l1 < l4);
        assert!(md.contains("```text\ncontext text\n```"));
    }
}

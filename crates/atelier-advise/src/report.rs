use atelier_core::tokens::{ContrastResult, DesignTokens};

use crate::response::{
    AuditResponse, ComponentArchitectureResponse, CritiqueResponse, DesignSystemResponse,
    UserFlowResponse, WireframeResponse,
};

fn heading(out: &mut String, level: usize, text: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&"#".repeat(level));
    out.push(' ');
    out.push_str(text);
    out.push_str("\n\n");
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
}

fn numbered(out: &mut String, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item));
    }
}

/// Escape a value for a markdown table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn table_header(out: &mut String, columns: &[&str]) {
    out.push('|');
    for c in columns {
        out.push(' ');
        out.push_str(c);
        out.push_str(" |");
    }
    out.push_str("\n|");
    for _ in columns {
        out.push_str("---|");
    }
    out.push('\n');
}

fn table_row(out: &mut String, cells: &[String]) {
    out.push('|');
    for c in cells {
        out.push(' ');
        out.push_str(&cell(c));
        out.push_str(" |");
    }
    out.push('\n');
}

fn summary(out: &mut String, title: &str, text: &str) {
    heading(out, 1, title);
    out.push_str(text.trim());
    out.push('\n');
}

pub fn contrast_table(out: &mut String, rows: &[(String, ContrastResult)]) {
    table_header(out, &["Pair", "Foreground", "Background", "Ratio", "Grade"]);
    for (label, r) in rows {
        table_row(
            out,
            &[
                label.clone(),
                r.foreground.clone(),
                r.background.clone(),
                format!("{:.2}:1", r.ratio),
                r.levels.grade().to_string(),
            ],
        );
    }
}

/// Markdown tables for a computed token set.
pub fn tokens_section(out: &mut String, tokens: &DesignTokens) {
    heading(out, 2, "Color scales");
    let mut columns = vec!["Scale"];
    let shades: Vec<String> = tokens
        .colors
        .first()
        .map(|s| s.stops().iter().map(|st| st.shade.to_string()).collect())
        .unwrap_or_default();
    columns.extend(shades.iter().map(String::as_str));
    table_header(out, &columns);
    for scale in &tokens.colors {
        let mut row = vec![scale.name.clone()];
        row.extend(scale.stops().iter().map(|st| format!("`{}`", st.hex)));
        table_row(out, &row);
    }

    heading(
        out,
        2,
        &format!("Type scale ({}, ratio {})", tokens.type_ratio.name(), tokens.type_ratio.value()),
    );
    table_header(out, &["Step", "Size", "rem", "Weight", "Line height"]);
    for step in &tokens.typography {
        table_row(
            out,
            &[
                step.name.to_string(),
                format!("{}px", step.px),
                step.rem.clone(),
                step.font_weight.to_string(),
                step.line_height.to_string(),
            ],
        );
    }

    heading(out, 2, "Spacing");
    table_header(out, &["Token", "px", "rem"]);
    for step in &tokens.spacing {
        table_row(
            out,
            &[
                format!("space-{}", step.name),
                step.px.to_string(),
                step.rem.clone(),
            ],
        );
    }

    heading(out, 2, "Text contrast");
    contrast_table(out, &tokens.contrast_checks());
}

pub fn design_system(
    title: &str,
    tokens: Option<&DesignTokens>,
    r: &DesignSystemResponse,
) -> String {
    let mut out = String::with_capacity(8192);
    summary(&mut out, title, &r.summary);

    if let Some(tokens) = tokens {
        tokens_section(&mut out, tokens);
    }

    if !r.principles.is_empty() {
        heading(&mut out, 2, "Principles");
        for p in &r.principles {
            out.push_str(&format!("- **{}**: {}\n", p.name, p.description));
        }
    }

    if !r.color_roles.is_empty() {
        heading(&mut out, 2, "Color roles");
        table_header(&mut out, &["Role", "Token", "Usage"]);
        for c in &r.color_roles {
            table_row(&mut out, &[c.role.clone(), format!("`{}`", c.token), c.usage.clone()]);
        }
    }

    if !r.typography.is_empty() {
        heading(&mut out, 2, "Typography roles");
        table_header(&mut out, &["Role", "Step", "Guidance"]);
        for t in &r.typography {
            table_row(&mut out, &[t.role.clone(), format!("`{}`", t.step), t.guidance.clone()]);
        }
    }

    if !r.components.is_empty() {
        heading(&mut out, 2, "Components");
        for c in &r.components {
            heading(&mut out, 3, &c.name);
            out.push_str(&c.guidance);
            out.push('\n');
        }
    }

    out
}

pub fn audit(title: &str, contrast: &[(String, ContrastResult)], r: &AuditResponse) -> String {
    let mut out = String::with_capacity(4096);
    summary(&mut out, title, &r.summary);
    if let Some(score) = r.score {
        out.push_str(&format!("\n**Score:** {score}/100\n"));
    }

    if !contrast.is_empty() {
        heading(&mut out, 2, "Measured contrast");
        contrast_table(&mut out, contrast);
    }

    heading(&mut out, 2, &format!("Issues ({})", r.issues.len()));
    if r.issues.is_empty() {
        out.push_str("No issues found.\n");
    } else {
        let mut issues: Vec<_> = r.issues.iter().collect();
        issues.sort_by_key(|i| i.severity);
        table_header(&mut out, &["Severity", "Criterion", "Element", "Problem", "Fix"]);
        for i in issues {
            table_row(
                &mut out,
                &[
                    i.severity.label().to_string(),
                    i.criterion.clone(),
                    i.element.clone(),
                    i.problem.clone(),
                    i.fix.clone(),
                ],
            );
        }
    }

    if !r.passes.is_empty() {
        heading(&mut out, 2, "Passing");
        bullets(&mut out, &r.passes);
    }
    out
}

pub fn user_flow(title: &str, r: &UserFlowResponse) -> String {
    let mut out = String::with_capacity(4096);
    summary(&mut out, title, &r.summary);

    heading(&mut out, 2, "Steps");
    for s in &r.steps {
        out.push_str(&format!("1. **[{}] {}**: {}", s.id, s.screen, s.action));
        if !s.outcome.is_empty() {
            out.push_str(&format!(" → {}", s.outcome));
        }
        if !s.next.is_empty() {
            out.push_str(&format!(" (next: {})", s.next.join(", ")));
        }
        out.push('\n');
    }

    if !r.decision_points.is_empty() {
        heading(&mut out, 2, "Decision points");
        for d in &r.decision_points {
            out.push_str(&format!("- **{}** at `{}`\n", d.question, d.at));
            for b in &d.branches {
                out.push_str("  - ");
                out.push_str(b);
                out.push('\n');
            }
        }
    }

    if !r.edge_cases.is_empty() {
        heading(&mut out, 2, "Edge cases");
        bullets(&mut out, &r.edge_cases);
    }
    out
}

pub fn component_architecture(title: &str, r: &ComponentArchitectureResponse) -> String {
    let mut out = String::with_capacity(4096);
    summary(&mut out, title, &r.summary);

    heading(&mut out, 2, "Components");
    table_header(&mut out, &["Component", "Level", "Responsibility", "Props", "Children"]);
    for c in &r.components {
        table_row(
            &mut out,
            &[
                c.name.clone(),
                c.level.label().to_string(),
                c.responsibility.clone(),
                c.props.join(", "),
                c.children.join(", "),
            ],
        );
    }

    if !r.state.is_empty() {
        heading(&mut out, 2, "State ownership");
        for s in &r.state {
            out.push_str(&format!("- `{}` owned by **{}**", s.name, s.owner));
            if !s.description.is_empty() {
                out.push_str(": ");
                out.push_str(&s.description);
            }
            out.push('\n');
        }
    }

    if !r.data_flow.is_empty() {
        heading(&mut out, 2, "Data flow");
        numbered(&mut out, &r.data_flow);
    }
    out
}

pub fn wireframe(title: &str, r: &WireframeResponse) -> String {
    let mut out = String::with_capacity(4096);
    summary(&mut out, title, &r.summary);

    if !r.layout.is_empty() {
        out.push_str(&format!("\n**Layout:** {}\n", r.layout));
    }

    if let Some(sketch) = r.ascii.as_deref().filter(|s| !s.trim().is_empty()) {
        heading(&mut out, 2, "Sketch");
        out.push_str("```\n");
        out.push_str(sketch.trim_end());
        out.push_str("\n```\n");
    }

    heading(&mut out, 2, "Regions");
    for region in &r.regions {
        if region.position.is_empty() {
            heading(&mut out, 3, &region.name);
        } else {
            heading(&mut out, 3, &format!("{} ({})", region.name, region.position));
        }
        bullets(&mut out, &region.elements);
        if let Some(notes) = region.notes.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!("\n_{}_\n", notes));
        }
    }

    if !r.interactions.is_empty() {
        heading(&mut out, 2, "Interactions");
        bullets(&mut out, &r.interactions);
    }
    out
}

pub fn critique(title: &str, r: &CritiqueResponse) -> String {
    let mut out = String::with_capacity(4096);
    summary(&mut out, title, &r.summary);

    if !r.strengths.is_empty() {
        heading(&mut out, 2, "Strengths");
        bullets(&mut out, &r.strengths);
    }

    heading(&mut out, 2, &format!("Findings ({})", r.findings.len()));
    let mut findings: Vec<_> = r.findings.iter().collect();
    findings.sort_by(|a, b| b.severity.cmp(&a.severity));
    for f in findings {
        let label = atelier_core::knowledge::SEVERITY_SCALE
            .get(f.severity as usize)
            .copied()
            .unwrap_or("unrated");
        heading(&mut out, 3, &format!("{} (severity {}: {})", f.heuristic, f.severity, label));
        out.push_str(&f.observation);
        out.push('\n');
        if !f.recommendation.is_empty() {
            out.push_str(&format!("\n**Recommendation:** {}\n", f.recommendation));
        }
    }

    if !r.priorities.is_empty() {
        heading(&mut out, 2, "Priorities");
        numbered(&mut out, &r.priorities);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{AuditIssue, AuditSeverity, Finding};
    use atelier_core::tokens::{evaluate_contrast, generate_tokens, TokenRequest};

    #[test]
    fn table_cells_escape_pipes_and_newlines() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn audit_sorts_issues_by_severity() {
        let r = AuditResponse {
            summary: "Two issues".into(),
            score: Some(70),
            issues: vec![
                AuditIssue {
                    criterion: "2.4.2".into(),
                    severity: AuditSeverity::Minor,
                    element: "title".into(),
                    problem: "generic title".into(),
                    fix: "name the page".into(),
                },
                AuditIssue {
                    criterion: "2.1.1".into(),
                    severity: AuditSeverity::Critical,
                    element: "menu".into(),
                    problem: "mouse only".into(),
                    fix: "add key handlers".into(),
                },
            ],
            passes: vec!["1.1.1 images have alt text".into()],
        };
        let contrast = vec![(
            "body text".to_string(),
            evaluate_contrast("#767676", "#ffffff").unwrap(),
        )];
        let md = audit("Accessibility Audit", &contrast, &r);
        assert!(md.starts_with("# Accessibility Audit\n\nTwo issues\n"));
        assert!(md.contains("**Score:** 70/100"));
        assert!(md.contains("| body text | #767676 | #ffffff | 4.54:1 | AA |"));
        let critical = md.find("| critical |").unwrap();
        let minor = md.find("| minor |").unwrap();
        assert!(critical < minor);
        assert!(md.contains("## Passing"));
    }

    #[test]
    fn critique_orders_findings_most_severe_first() {
        let r = CritiqueResponse {
            summary: "Mixed".into(),
            strengths: vec![],
            findings: vec![
                Finding {
                    heuristic: "Consistency and standards".into(),
                    severity: 1,
                    observation: "Two button styles".into(),
                    recommendation: String::new(),
                },
                Finding {
                    heuristic: "Error prevention".into(),
                    severity: 4,
                    observation: "Delete has no confirm".into(),
                    recommendation: "Add undo".into(),
                },
            ],
            priorities: vec!["Add undo".into()],
        };
        let md = critique("Design Critique", &r);
        let worst = md.find("Error prevention (severity 4: usability catastrophe)").unwrap();
        let mild = md.find("Consistency and standards (severity 1").unwrap();
        assert!(worst < mild);
        assert!(!md.contains("## Strengths"));
        assert!(md.contains("1. Add undo"));
    }

    #[test]
    fn design_system_report_leads_with_tokens() {
        let tokens = generate_tokens(&TokenRequest::new("#0f766e")).unwrap();
        let r = DesignSystemResponse {
            summary: "Calm and precise".into(),
            principles: vec![],
            color_roles: vec![],
            typography: vec![],
            components: vec![],
        };
        let md = design_system("Design System: Ledger", Some(&tokens), &r);
        assert!(md.contains("| Scale | 50 | 100 | 200 |"));
        assert!(md.contains("| primary | `#"));
        assert!(md.contains("| space-4 | 16 | 1rem |"));
        assert!(md.contains("## Text contrast"));
        assert!(!md.contains("## Principles"));
    }
}

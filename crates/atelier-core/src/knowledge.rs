//! Static reference data injected into prompts: WCAG success criteria,
//! Nielsen's usability heuristics, a UI pattern catalog and token templates.
//! Single source of truth for prompts, the MCP `get_knowledge` tool and the
//! `knowledge` CLI command.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WcagLevel {
    A,
    AA,
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WcagLevel::A => "A",
            WcagLevel::AA => "AA",
            WcagLevel::AAA => "AAA",
        })
    }
}

impl FromStr for WcagLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(WcagLevel::A),
            "AA" => Ok(WcagLevel::AA),
            "AAA" => Ok(WcagLevel::AAA),
            other => Err(format!("unknown WCAG level: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WcagCriterion {
    pub id: &'static str,
    pub title: &'static str,
    pub level: WcagLevel,
    pub principle: &'static str,
    pub summary: &'static str,
}

const fn sc(
    id: &'static str,
    title: &'static str,
    level: WcagLevel,
    principle: &'static str,
    summary: &'static str,
) -> WcagCriterion {
    WcagCriterion {
        id,
        title,
        level,
        principle,
        summary,
    }
}

#[rustfmt::skip]
pub const WCAG_CRITERIA: &[WcagCriterion] = &[
    sc("1.1.1", "Non-text Content", WcagLevel::A, "Perceivable",
        "Images, icons and controls have text alternatives; decorative images are hidden from assistive tech."),
    sc("1.2.2", "Captions (Prerecorded)", WcagLevel::A, "Perceivable",
        "Prerecorded video with audio has synchronized captions."),
    sc("1.3.1", "Info and Relationships", WcagLevel::A, "Perceivable",
        "Headings, lists, tables and form labels are conveyed in markup, not only visually."),
    sc("1.3.2", "Meaningful Sequence", WcagLevel::A, "Perceivable",
        "Reading and focus order preserve meaning."),
    sc("1.3.5", "Identify Input Purpose", WcagLevel::AA, "Perceivable",
        "Inputs collecting user data expose their purpose (autocomplete tokens)."),
    sc("1.4.1", "Use of Color", WcagLevel::A, "Perceivable",
        "Color is not the only means of conveying information, state or errors."),
    sc("1.4.3", "Contrast (Minimum)", WcagLevel::AA, "Perceivable",
        "Text has a contrast ratio of at least 4.5:1, large text at least 3:1."),
    sc("1.4.4", "Resize Text", WcagLevel::AA, "Perceivable",
        "Text can be resized to 200% without loss of content or function."),
    sc("1.4.6", "Contrast (Enhanced)", WcagLevel::AAA, "Perceivable",
        "Text has a contrast ratio of at least 7:1, large text at least 4.5:1."),
    sc("1.4.10", "Reflow", WcagLevel::AA, "Perceivable",
        "Content reflows at 320 CSS px width without two-dimensional scrolling."),
    sc("1.4.11", "Non-text Contrast", WcagLevel::AA, "Perceivable",
        "UI component boundaries, focus indicators and meaningful graphics reach 3:1 contrast."),
    sc("1.4.12", "Text Spacing", WcagLevel::AA, "Perceivable",
        "No loss of content when line height, paragraph, letter and word spacing are increased."),
    sc("1.4.13", "Content on Hover or Focus", WcagLevel::AA, "Perceivable",
        "Tooltips and popovers are dismissible, hoverable and persistent."),
    sc("2.1.1", "Keyboard", WcagLevel::A, "Operable",
        "All functionality is available from a keyboard."),
    sc("2.1.2", "No Keyboard Trap", WcagLevel::A, "Operable",
        "Focus can always be moved away from any component using the keyboard."),
    sc("2.2.1", "Timing Adjustable", WcagLevel::A, "Operable",
        "Users can turn off, adjust or extend time limits."),
    sc("2.3.1", "Three Flashes or Below Threshold", WcagLevel::A, "Operable",
        "Nothing flashes more than three times per second."),
    sc("2.4.1", "Bypass Blocks", WcagLevel::A, "Operable",
        "A skip link or landmarks let users bypass repeated content."),
    sc("2.4.2", "Page Titled", WcagLevel::A, "Operable",
        "Pages have titles that describe topic or purpose."),
    sc("2.4.3", "Focus Order", WcagLevel::A, "Operable",
        "Focus order preserves meaning and operability."),
    sc("2.4.4", "Link Purpose (In Context)", WcagLevel::A, "Operable",
        "The purpose of each link is clear from its text or context."),
    sc("2.4.6", "Headings and Labels", WcagLevel::AA, "Operable",
        "Headings and labels describe topic or purpose."),
    sc("2.4.7", "Focus Visible", WcagLevel::AA, "Operable",
        "Keyboard focus indicator is visible."),
    sc("2.5.3", "Label in Name", WcagLevel::A, "Operable",
        "The accessible name of a control contains its visible label text."),
    sc("2.5.5", "Target Size (Enhanced)", WcagLevel::AAA, "Operable",
        "Pointer targets are at least 44 by 44 CSS px."),
    sc("2.5.8", "Target Size (Minimum)", WcagLevel::AA, "Operable",
        "Pointer targets are at least 24 by 24 CSS px or adequately spaced."),
    sc("3.1.1", "Language of Page", WcagLevel::A, "Understandable",
        "The default human language of the page is programmatically set."),
    sc("3.2.1", "On Focus", WcagLevel::A, "Understandable",
        "Receiving focus does not trigger a change of context."),
    sc("3.2.2", "On Input", WcagLevel::A, "Understandable",
        "Changing a setting does not unexpectedly change context."),
    sc("3.3.1", "Error Identification", WcagLevel::A, "Understandable",
        "Input errors are identified and described in text."),
    sc("3.3.2", "Labels or Instructions", WcagLevel::A, "Understandable",
        "Inputs have labels or instructions."),
    sc("3.3.3", "Error Suggestion", WcagLevel::AA, "Understandable",
        "Known corrections for input errors are suggested."),
    sc("3.3.4", "Error Prevention (Legal, Financial, Data)", WcagLevel::AA, "Understandable",
        "Important submissions are reversible, checked or confirmed."),
    sc("4.1.2", "Name, Role, Value", WcagLevel::A, "Robust",
        "Custom controls expose name, role, state and value to assistive tech."),
    sc("4.1.3", "Status Messages", WcagLevel::AA, "Robust",
        "Status messages are announced without moving focus."),
];

/// Criteria that apply when targeting `level` (A ⊂ AA ⊂ AAA).
pub fn criteria_for_level(level: WcagLevel) -> impl Iterator<Item = &'static WcagCriterion> {
    WCAG_CRITERIA.iter().filter(move |c| c.level <= level)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Heuristic {
    pub number: u8,
    pub name: &'static str,
    pub summary: &'static str,
}

#[rustfmt::skip]
pub const HEURISTICS: &[Heuristic] = &[
    Heuristic { number: 1, name: "Visibility of system status",
        summary: "Keep users informed about what is going on through timely, appropriate feedback." },
    Heuristic { number: 2, name: "Match between system and the real world",
        summary: "Speak the users' language with familiar words, concepts and conventions." },
    Heuristic { number: 3, name: "User control and freedom",
        summary: "Provide clearly marked exits, undo and redo for actions taken by mistake." },
    Heuristic { number: 4, name: "Consistency and standards",
        summary: "Follow platform and industry conventions; the same thing should look and act the same." },
    Heuristic { number: 5, name: "Error prevention",
        summary: "Eliminate error-prone conditions or confirm before users commit to risky actions." },
    Heuristic { number: 6, name: "Recognition rather than recall",
        summary: "Make elements, actions and options visible so users need not remember information." },
    Heuristic { number: 7, name: "Flexibility and efficiency of use",
        summary: "Offer accelerators and customization for experienced users without hurting novices." },
    Heuristic { number: 8, name: "Aesthetic and minimalist design",
        summary: "Remove information that is irrelevant or rarely needed; every extra unit competes for attention." },
    Heuristic { number: 9, name: "Help users recognize, diagnose, and recover from errors",
        summary: "Express errors in plain language, state the problem precisely and suggest a solution." },
    Heuristic { number: 10, name: "Help and documentation",
        summary: "Provide searchable, task-focused help when the interface cannot explain itself." },
];

/// Nielsen severity ratings, indexed by score.
pub const SEVERITY_SCALE: [&str; 5] = [
    "not a usability problem",
    "cosmetic problem only",
    "minor usability problem",
    "major usability problem",
    "usability catastrophe",
];

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPattern {
    pub name: &'static str,
    pub category: &'static str,
    pub use_when: &'static str,
    pub parts: &'static [&'static str],
}

#[rustfmt::skip]
pub const UI_PATTERNS: &[UiPattern] = &[
    UiPattern { name: "Top navigation bar", category: "navigation",
        use_when: "Few top-level sections on wide screens",
        parts: &["logo", "primary links", "account menu"] },
    UiPattern { name: "Sidebar navigation", category: "navigation",
        use_when: "Many sections or deep hierarchies in productivity apps",
        parts: &["section list", "collapse toggle", "active indicator"] },
    UiPattern { name: "Bottom tab bar", category: "navigation",
        use_when: "3-5 primary destinations on mobile",
        parts: &["icon", "label", "badge"] },
    UiPattern { name: "Breadcrumbs", category: "navigation",
        use_when: "Users need to know and climb their location in a hierarchy",
        parts: &["ancestor links", "separator", "current page"] },
    UiPattern { name: "Card grid", category: "content",
        use_when: "Browsing heterogeneous items with an image and summary",
        parts: &["media", "title", "meta", "actions"] },
    UiPattern { name: "Data table", category: "content",
        use_when: "Comparing many records across the same attributes",
        parts: &["header row", "sort controls", "row actions", "pagination"] },
    UiPattern { name: "Master-detail", category: "content",
        use_when: "Selecting an item from a list and inspecting it in place",
        parts: &["list pane", "detail pane", "empty state"] },
    UiPattern { name: "Empty state", category: "content",
        use_when: "A view has no data yet",
        parts: &["illustration", "explanation", "primary action"] },
    UiPattern { name: "Single-column form", category: "input",
        use_when: "Collecting data with minimal errors",
        parts: &["labels above fields", "inline validation", "primary submit"] },
    UiPattern { name: "Multi-step wizard", category: "input",
        use_when: "Long or branching data entry that benefits from chunking",
        parts: &["progress indicator", "step content", "back/next controls"] },
    UiPattern { name: "Search with filters", category: "input",
        use_when: "Large collections users narrow down by attributes",
        parts: &["search field", "facet panel", "applied filter chips", "results count"] },
    UiPattern { name: "Modal dialog", category: "feedback",
        use_when: "Short, blocking decisions that need focus",
        parts: &["title", "body", "confirm", "cancel", "focus trap"] },
    UiPattern { name: "Toast notification", category: "feedback",
        use_when: "Non-blocking confirmation of a completed action",
        parts: &["message", "undo action", "auto-dismiss"] },
    UiPattern { name: "Inline validation", category: "feedback",
        use_when: "Catching input errors before submission",
        parts: &["error text", "icon", "field highlight"] },
    UiPattern { name: "Skeleton loading", category: "feedback",
        use_when: "Content loads in under a few seconds and layout is known",
        parts: &["placeholder blocks", "shimmer"] },
    UiPattern { name: "Dashboard", category: "layout",
        use_when: "Monitoring key metrics at a glance",
        parts: &["KPI tiles", "charts", "date range", "drill-down links"] },
    UiPattern { name: "Hero section", category: "layout",
        use_when: "Landing pages that need one clear call to action",
        parts: &["headline", "supporting copy", "primary CTA", "visual"] },
    UiPattern { name: "Settings page", category: "layout",
        use_when: "Grouping many preferences",
        parts: &["grouped sections", "toggles", "save feedback"] },
];

pub fn patterns_in(category: &str) -> impl Iterator<Item = &'static UiPattern> + '_ {
    UI_PATTERNS.iter().filter(move |p| p.category.eq_ignore_ascii_case(category))
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TokenTemplate {
    pub category: &'static str,
    pub entries: &'static [(&'static str, &'static str)],
}

pub const TOKEN_TEMPLATES: &[TokenTemplate] = &[
    TokenTemplate {
        category: "radius",
        entries: &[
            ("none", "0"),
            ("sm", "2px"),
            ("md", "6px"),
            ("lg", "12px"),
            ("full", "9999px"),
        ],
    },
    TokenTemplate {
        category: "shadow",
        entries: &[
            ("sm", "0 1px 2px rgba(0,0,0,0.05)"),
            ("md", "0 4px 6px -1px rgba(0,0,0,0.1)"),
            ("lg", "0 10px 15px -3px rgba(0,0,0,0.1)"),
            ("xl", "0 20px 25px -5px rgba(0,0,0,0.1)"),
        ],
    },
    TokenTemplate {
        category: "breakpoint",
        entries: &[
            ("sm", "640px"),
            ("md", "768px"),
            ("lg", "1024px"),
            ("xl", "1280px"),
            ("2xl", "1536px"),
        ],
    },
    TokenTemplate {
        category: "motion",
        entries: &[
            ("fast", "100ms"),
            ("normal", "200ms"),
            ("slow", "300ms"),
            ("easing", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ],
    },
];

// --- Rendering ---

/// Tables addressable by name from the MCP server and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Wcag,
    Heuristics,
    Patterns,
    Templates,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Wcag, Table::Heuristics, Table::Patterns, Table::Templates];

    pub fn name(self) -> &'static str {
        match self {
            Table::Wcag => "wcag",
            Table::Heuristics => "heuristics",
            Table::Patterns => "patterns",
            Table::Templates => "templates",
        }
    }

    pub fn render(self) -> String {
        match self {
            Table::Wcag => render_wcag(WcagLevel::AAA),
            Table::Heuristics => render_heuristics(),
            Table::Patterns => render_patterns(None),
            Table::Templates => render_templates(),
        }
    }

    /// Render with an optional filter: the highest WCAG level to include,
    /// or a pattern category. Other tables ignore the filter.
    pub fn render_filtered(self, filter: Option<&str>) -> Result<String, String> {
        match (self, filter) {
            (Table::Wcag, Some(level)) => Ok(render_wcag(level.parse()?)),
            (Table::Patterns, Some(category)) => {
                let text = render_patterns(Some(category));
                if text.is_empty() {
                    Err(format!("no patterns in category '{category}'"))
                } else {
                    Ok(text)
                }
            }
            (table, _) => Ok(table.render()),
        }
    }
}

impl FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Table::ALL.iter().map(|t| t.name()).collect();
                format!("unknown table '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

pub fn render_wcag(level: WcagLevel) -> String {
    let mut out = String::with_capacity(4096);
    for c in criteria_for_level(level) {
        out.push_str(&format!(
            "- {} {} ({}, {}): {}\n",
            c.id, c.title, c.level, c.principle, c.summary
        ));
    }
    out
}

pub fn render_heuristics() -> String {
    let mut out = String::with_capacity(2048);
    for h in HEURISTICS {
        out.push_str(&format!("{}. {}: {}\n", h.number, h.name, h.summary));
    }
    out.push_str("\nSeverity scale:\n");
    for (score, label) in SEVERITY_SCALE.iter().enumerate() {
        out.push_str(&format!("- {score}: {label}\n"));
    }
    out
}

pub fn render_patterns(category: Option<&str>) -> String {
    let mut out = String::with_capacity(2048);
    let patterns: Vec<&UiPattern> = match category {
        Some(c) => patterns_in(c).collect(),
        None => UI_PATTERNS.iter().collect(),
    };
    for p in patterns {
        out.push_str(&format!(
            "- {} [{}]: {}. Parts: {}\n",
            p.name,
            p.category,
            p.use_when,
            p.parts.join(", ")
        ));
    }
    out
}

pub fn render_templates() -> String {
    let mut out = String::new();
    for t in TOKEN_TEMPLATES {
        out.push_str(t.category);
        out.push_str(":\n");
        for (name, value) in t.entries {
            out.push_str(&format!("  {}-{}: {}\n", t.category, name, value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_cumulative() {
        let a = criteria_for_level(WcagLevel::A).count();
        let aa = criteria_for_level(WcagLevel::AA).count();
        let aaa = criteria_for_level(WcagLevel::AAA).count();
        assert!(a < aa && aa < aaa);
        assert_eq!(aaa, WCAG_CRITERIA.len());
        assert!(criteria_for_level(WcagLevel::AA).all(|c| c.level != WcagLevel::AAA));
    }

    #[test]
    fn ten_heuristics_in_order() {
        assert_eq!(HEURISTICS.len(), 10);
        for (i, h) in HEURISTICS.iter().enumerate() {
            assert_eq!(h.number as usize, i + 1);
        }
    }

    #[test]
    fn criterion_ids_are_unique() {
        let mut ids: Vec<&str> = WCAG_CRITERIA.iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), WCAG_CRITERIA.len());
    }

    #[test]
    fn pattern_filter_is_case_insensitive() {
        let nav: Vec<&str> = patterns_in("Navigation").map(|p| p.name).collect();
        assert!(nav.contains(&"Breadcrumbs"));
        assert!(nav.iter().all(|n| !n.contains("Toast")));
    }

    #[test]
    fn table_names_round_trip() {
        for t in Table::ALL {
            assert_eq!(t.name().parse::<Table>().unwrap(), t);
            assert!(!t.render().is_empty());
        }
        assert!("colors".parse::<Table>().is_err());
    }

    #[test]
    fn filtered_rendering() {
        let aa = Table::Wcag.render_filtered(Some("AA")).unwrap();
        assert!(aa.contains("1.4.3"));
        assert!(!aa.contains("1.4.6"));
        assert!(Table::Wcag.render_filtered(Some("Z")).is_err());

        let nav = Table::Patterns.render_filtered(Some("navigation")).unwrap();
        assert!(nav.contains("Breadcrumbs"));
        let err = Table::Patterns.render_filtered(Some("telepathy")).unwrap_err();
        assert!(err.contains("telepathy"));

        assert_eq!(
            Table::Heuristics.render_filtered(Some("ignored")).unwrap(),
            render_heuristics()
        );
    }

    #[test]
    fn wcag_level_parses_case_insensitively() {
        assert_eq!("aa".parse::<WcagLevel>().unwrap(), WcagLevel::AA);
        assert!("AAAA".parse::<WcagLevel>().is_err());
    }
}

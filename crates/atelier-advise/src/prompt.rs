use atelier_core::capability::{
    AccessibilityAuditInput, ComponentArchitectureInput, DesignCritiqueInput, DesignSystemInput,
    UserFlowInput, WireframeInput,
};
use atelier_core::knowledge::{self, WcagLevel};
use atelier_core::tokens::DesignTokens;
use atelier_core::CapabilityInput;

use crate::Precomputed;

pub struct Prompt {
    pub system: String,
    pub user: String,
}

const JSON_ONLY: &str = "Output ONLY the JSON object, nothing else. No markdown fences, no commentary.";

pub fn build(input: &CapabilityInput, pre: &Precomputed) -> Prompt {
    match input {
        CapabilityInput::DesignSystem(i) => Prompt {
            system: design_system_prompt(pre.tokens.as_ref()),
            user: design_system_message(i),
        },
        CapabilityInput::AccessibilityAudit(i) => Prompt {
            system: audit_prompt(i.level),
            user: audit_message(i, pre),
        },
        CapabilityInput::UserFlow(i) => Prompt {
            system: user_flow_prompt(),
            user: user_flow_message(i),
        },
        CapabilityInput::ComponentArchitecture(i) => Prompt {
            system: component_prompt(),
            user: component_message(i),
        },
        CapabilityInput::Wireframe(i) => Prompt {
            system: wireframe_prompt(),
            user: wireframe_message(i),
        },
        CapabilityInput::DesignCritique(i) => Prompt {
            system: critique_prompt(),
            user: critique_message(i),
        },
    }
}

// --- System prompts ---

fn design_system_prompt(tokens: Option<&DesignTokens>) -> String {
    let tokens = tokens.map(serialize_tokens).unwrap_or_default();
    format!(
        "You are a senior design-systems lead. Given a product brief and a computed token set, \
write guidance for applying the tokens. Do NOT invent new color values or sizes: refer to \
the tokens by name (e.g. \"primary-600\", \"text-lg\", \"space-4\").\n\n\
Focus on:\n\
- 3-5 design principles specific to this product, not generic platitudes\n\
- Semantic color roles (background, surface, text, border, action, focus, status) mapped to \
token names, keeping text pairings at WCAG AA or better per the contrast table\n\
- Typography roles (body, caption, headings, display) mapped to scale steps\n\
- Core component guidance (buttons, inputs, cards, navigation) in terms of the tokens\n\n\
## Computed tokens\n{tokens}\n\
Output a JSON object:\n\
{{\"summary\":\"<2-3 sentences>\",\
\"principles\":[{{\"name\":\"...\",\"description\":\"...\"}}],\
\"colorRoles\":[{{\"role\":\"...\",\"token\":\"<scale-shade>\",\"usage\":\"...\"}}],\
\"typography\":[{{\"role\":\"...\",\"step\":\"<step name>\",\"guidance\":\"...\"}}],\
\"components\":[{{\"name\":\"...\",\"guidance\":\"...\"}}]}}\n\n{json_only}",
        json_only = JSON_ONLY,
    )
}

fn audit_prompt(level: WcagLevel) -> String {
    format!(
        "You are an accessibility specialist auditing a user interface against WCAG 2.2 level {level}. \
Review the supplied markup or description and report concrete failures.\n\n\
Rules:\n\
- Cite the success criterion id for every issue (e.g. \"1.4.3\")\n\
- Only report issues you can point at in the supplied material; no generic checklists\n\
- Contrast results below are computed exactly; trust them over your own estimates\n\
- Severity: critical (blocks a task), serious (major barrier), moderate (workaround exists), \
minor (annoyance)\n\
- Each fix must be specific enough to implement\n\n\
## Success criteria in scope\n{criteria}\n\
Output a JSON object:\n\
{{\"summary\":\"...\",\"score\":<0-100>,\
\"issues\":[{{\"criterion\":\"<id>\",\"severity\":\"critical\"|\"serious\"|\"moderate\"|\"minor\",\
\"element\":\"...\",\"problem\":\"...\",\"fix\":\"...\"}}],\
\"passes\":[\"<criterion id and what passes>\"]}}\n\n{json_only}",
        json_only = JSON_ONLY,
        criteria = knowledge::render_wcag(level),
    )
}

fn user_flow_prompt() -> String {
    format!(
        "You are a UX architect mapping user flows. Given a user goal, produce the sequence of \
screens and actions from entry to success.\n\n\
Rules:\n\
- Steps are meaningful interactions (\"System validates card\"), not UI gestures (\"clicks button\")\n\
- Give every step a short id (\"s1\", \"s2\", ...); `next` lists the ids reachable from it\n\
- Model decision points explicitly with their branches\n\
- List edge cases: errors, empty states, interruptions, returning users\n\n\
Output a JSON object:\n\
{{\"summary\":\"...\",\
\"steps\":[{{\"id\":\"s1\",\"screen\":\"...\",\"action\":\"...\",\"outcome\":\"...\",\"next\":[\"s2\"]}}],\
\"decisionPoints\":[{{\"at\":\"<step id>\",\"question\":\"...\",\"branches\":[\"...\"]}}],\
\"edgeCases\":[\"...\"]}}\n\n{json_only}",
        json_only = JSON_ONLY,
    )
}

fn component_prompt() -> String {
    format!(
        "You are a front-end architect. Decompose the feature into a component hierarchy using \
atomic design levels (atom, molecule, organism, template, page).\n\n\
Rules:\n\
- Each component has one responsibility; name components by role, not by styling\n\
- Props are named with their type, e.g. \"onSubmit: () => void\"\n\
- `children` lists component names nested directly inside\n\
- State lives in the lowest common owner; name the owning component\n\
- Reuse established patterns from the catalog where they fit\n\n\
## UI pattern catalog\n{patterns}\n\
Output a JSON object:\n\
{{\"summary\":\"...\",\
\"components\":[{{\"name\":\"...\",\"level\":\"atom\"|\"molecule\"|\"organism\"|\"template\"|\"page\",\
\"responsibility\":\"...\",\"props\":[\"...\"],\"children\":[\"...\"]}}],\
\"state\":[{{\"name\":\"...\",\"owner\":\"<component>\",\"description\":\"...\"}}],\
\"dataFlow\":[\"...\"]}}\n\n{json_only}",
        json_only = JSON_ONLY,
        patterns = knowledge::render_patterns(None),
    )
}

fn wireframe_prompt() -> String {
    format!(
        "You are an interaction designer producing a low-fidelity wireframe description. \
Lay out the screen as regions, top to bottom and left to right.\n\n\
Rules:\n\
- Respect the target device's conventions and breakpoints\n\
- Every region lists its concrete elements in reading order\n\
- Prefer established patterns from the catalog and name them\n\
- Optionally include a monospace ASCII sketch no wider than 60 columns\n\n\
## UI pattern catalog\n{patterns}\n\
## Breakpoints\n{templates}\n\
Output a JSON object:\n\
{{\"summary\":\"...\",\"layout\":\"<grid/columns description>\",\
\"regions\":[{{\"name\":\"...\",\"position\":\"...\",\"elements\":[\"...\"],\"notes\":\"...\"}}],\
\"interactions\":[\"...\"],\"ascii\":\"<optional sketch>\"}}\n\n{json_only}",
        json_only = JSON_ONLY,
        patterns = knowledge::render_patterns(None),
        templates = knowledge::render_templates(),
    )
}

fn critique_prompt() -> String {
    format!(
        "You are a design critic performing a heuristic evaluation. Judge the design against \
Nielsen's usability heuristics and rate each finding on the severity scale.\n\n\
Rules:\n\
- Name the heuristic for every finding exactly as listed\n\
- Observations describe what the design does; recommendations say what to change\n\
- Note real strengths, not filler\n\
- Priorities are the 3 changes with the most impact, in order\n\n\
## Heuristics\n{heuristics}\n\
Output a JSON object:\n\
{{\"summary\":\"...\",\"strengths\":[\"...\"],\
\"findings\":[{{\"heuristic\":\"...\",\"severity\":<0-4>,\"observation\":\"...\",\"recommendation\":\"...\"}}],\
\"priorities\":[\"...\"]}}\n\n{json_only}",
        json_only = JSON_ONLY,
        heuristics = knowledge::render_heuristics(),
    )
}

// --- User messages ---

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(label);
    out.push_str(": ");
    out.push_str(value.trim());
    out.push('\n');
}

fn push_opt(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
        push_field(out, label, v);
    }
}

fn push_list(out: &mut String, label: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    out.push_str(label);
    out.push_str(":\n");
    for v in values {
        out.push_str("- ");
        out.push_str(v.trim());
        out.push('\n');
    }
}

fn push_block(out: &mut String, label: &str, body: &str) {
    out.push_str(label);
    out.push_str(":\n<<<\n");
    out.push_str(body.trim());
    out.push_str("\n>>>\n");
}

/// Compact text form of a token set for prompt injection.
pub fn serialize_tokens(tokens: &DesignTokens) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str("COLORS:\n");
    for scale in &tokens.colors {
        out.push_str("  ");
        out.push_str(&scale.name);
        out.push(':');
        for stop in scale.stops() {
            out.push(' ');
            out.push_str(&stop.shade.to_string());
            out.push('=');
            out.push_str(&stop.hex);
        }
        out.push('\n');
    }

    out.push_str("TYPE SCALE (");
    out.push_str(tokens.type_ratio.name());
    out.push_str("):\n");
    for step in &tokens.typography {
        out.push_str(&format!(
            "  text-{}: {}px / {} weight {} line-height {}\n",
            step.name, step.px, step.rem, step.font_weight, step.line_height
        ));
    }

    out.push_str("SPACING:");
    for step in &tokens.spacing {
        out.push_str(&format!(" space-{}={}px", step.name, step.px));
    }
    out.push('\n');

    out.push_str("CONTRAST:\n");
    for (label, result) in tokens.contrast_checks() {
        out.push_str(&format!(
            "  {}: {:.2}:1 ({})\n",
            label,
            result.ratio,
            result.levels.grade()
        ));
    }

    out.push_str("TEMPLATES:\n");
    out.push_str(&knowledge::render_templates());
    out
}

fn design_system_message(i: &DesignSystemInput) -> String {
    let mut out = String::with_capacity(1024);
    push_field(&mut out, "Product", &i.product);
    push_block(&mut out, "Brief", &i.description);
    push_field(&mut out, "Brand color", &i.brand_color);
    push_list(&mut out, "Platforms", &i.platforms);
    out
}

fn audit_message(i: &AccessibilityAuditInput, pre: &Precomputed) -> String {
    let mut out = String::with_capacity(i.target.len() + 512);
    push_field(&mut out, "Target level", &i.level.to_string());
    push_opt(&mut out, "Context", &i.context);
    if !pre.contrast.is_empty() {
        out.push_str("Measured contrast:\n");
        for (label, r) in &pre.contrast {
            out.push_str(&format!(
                "- {}: {:.2}:1 AA={} AAA={} AA-large={}\n",
                label, r.ratio, r.levels.aa, r.levels.aaa, r.levels.aa_large
            ));
        }
    }
    push_block(&mut out, "UI under audit", &i.target);
    out
}

fn user_flow_message(i: &UserFlowInput) -> String {
    let mut out = String::with_capacity(512);
    push_field(&mut out, "Goal", &i.goal);
    push_opt(&mut out, "Persona", &i.persona);
    push_opt(&mut out, "Platform", &i.platform);
    push_list(&mut out, "Entry points", &i.entry_points);
    out
}

fn component_message(i: &ComponentArchitectureInput) -> String {
    let mut out = String::with_capacity(512);
    push_block(&mut out, "Feature", &i.feature);
    push_opt(&mut out, "Framework", &i.framework);
    push_list(&mut out, "Requirements", &i.requirements);
    out
}

fn wireframe_message(i: &WireframeInput) -> String {
    let mut out = String::with_capacity(512);
    push_field(&mut out, "Screen", &i.screen);
    push_field(&mut out, "Device", i.device.name());
    push_block(&mut out, "Description", &i.description);
    out
}

fn critique_message(i: &DesignCritiqueInput) -> String {
    let mut out = String::with_capacity(i.design.len() + 256);
    push_list(&mut out, "Goals", &i.goals);
    push_list(&mut out, "Focus areas", &i.focus);
    push_block(&mut out, "Design", &i.design);
    out
}

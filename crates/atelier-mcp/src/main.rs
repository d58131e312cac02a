use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use atelier_advise::{AdviseError, LlmBackend};
use atelier_core::capability::{
    AccessibilityAuditInput, ColorPair, ComponentArchitectureInput, DesignCritiqueInput,
    DesignSystemInput, Device, UserFlowInput, WireframeInput,
};
use atelier_core::knowledge::{Table, WcagLevel};
use atelier_core::tokens::{self, TokenRequest};
use atelier_core::{Capability, CapabilityInput};

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct DesignSystemRequest {
    /// Product or brand name
    product: String,
    /// What the product does and who it is for
    description: String,
    /// Brand color as hex, e.g. "#2563eb". Seeds the primary and neutral scales.
    brand_color: String,
    /// Type scale ratio: minor-second, major-second, minor-third, major-third (default), perfect-fourth, augmented-fourth, perfect-fifth, golden-ratio
    type_ratio: Option<String>,
    /// Base font size in px. Default: 16
    base_font_size: Option<f64>,
    /// Spacing grid unit in px. Default: 4
    spacing_unit: Option<f64>,
    /// Target platforms, e.g. ["web", "ios"]
    platforms: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct AuditRequest {
    /// Markup, component code, or a description of the UI to audit
    target: String,
    /// WCAG conformance level: "A", "AA" (default), or "AAA"
    level: Option<String>,
    /// Extra context: audience, assistive tech in use, known constraints
    context: Option<String>,
    /// Foreground/background pairs to measure exactly before the audit
    color_pairs: Option<Vec<ColorPair>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct UserFlowRequest {
    /// What the user is trying to achieve, e.g. "Reset a forgotten password"
    goal: String,
    /// Who the user is
    persona: Option<String>,
    /// Where users start the flow, e.g. ["login page", "email link"]
    entry_points: Option<Vec<String>>,
    /// Platform, e.g. "iOS app"
    platform: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ComponentRequest {
    /// Feature to decompose, e.g. "Checkout with saved cards"
    feature: String,
    /// UI framework, e.g. "React", "SwiftUI"
    framework: Option<String>,
    /// Functional requirements the components must satisfy
    requirements: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct WireframeRequest {
    /// Screen name, e.g. "Order history"
    screen: String,
    /// What the screen must show and let the user do
    description: String,
    /// Target device: "mobile", "tablet", or "desktop" (default)
    device: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CritiqueRequest {
    /// The design under review: markup, a screen description, or a walkthrough
    design: String,
    /// What the design is meant to achieve
    goals: Option<Vec<String>>,
    /// Areas to concentrate on, e.g. ["navigation", "forms"]
    focus: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct TokensRequest {
    /// Brand color as hex, e.g. "#2563eb"
    brand_color: String,
    /// Type scale ratio name. Default: major-third
    type_ratio: Option<String>,
    /// Base font size in px. Default: 16
    base_font_size: Option<f64>,
    /// Spacing grid unit in px. Default: 4
    spacing_unit: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ContrastRequest {
    /// Foreground (text) color as hex
    foreground: String,
    /// Background color as hex
    background: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct KnowledgeRequest {
    /// Table to return: "wcag", "heuristics", "patterns", or "templates"
    table: String,
    /// For "wcag": highest level to include ("A", "AA", "AAA"). For "patterns": category filter (navigation, content, input, feedback, layout).
    filter: Option<String>,
}

// --- Request → input ---

impl From<DesignSystemRequest> for CapabilityInput {
    fn from(r: DesignSystemRequest) -> Self {
        CapabilityInput::DesignSystem(DesignSystemInput {
            product: r.product,
            description: r.description,
            brand_color: r.brand_color,
            type_ratio: r.type_ratio.unwrap_or_else(tokens::default_ratio),
            base_font_size: r.base_font_size.unwrap_or_else(tokens::default_base_font_size),
            spacing_unit: r.spacing_unit.unwrap_or_else(tokens::default_spacing_unit),
            platforms: r.platforms.unwrap_or_default(),
        })
    }
}

impl TryFrom<AuditRequest> for CapabilityInput {
    type Error = String;

    fn try_from(r: AuditRequest) -> Result<Self, Self::Error> {
        let level = match r.level.as_deref() {
            Some(l) => l.parse::<WcagLevel>()?,
            None => WcagLevel::AA,
        };
        Ok(CapabilityInput::AccessibilityAudit(AccessibilityAuditInput {
            target: r.target,
            level,
            context: r.context,
            color_pairs: r.color_pairs.unwrap_or_default(),
        }))
    }
}

impl From<UserFlowRequest> for CapabilityInput {
    fn from(r: UserFlowRequest) -> Self {
        CapabilityInput::UserFlow(UserFlowInput {
            goal: r.goal,
            persona: r.persona,
            entry_points: r.entry_points.unwrap_or_default(),
            platform: r.platform,
        })
    }
}

impl From<ComponentRequest> for CapabilityInput {
    fn from(r: ComponentRequest) -> Self {
        CapabilityInput::ComponentArchitecture(ComponentArchitectureInput {
            feature: r.feature,
            framework: r.framework,
            requirements: r.requirements.unwrap_or_default(),
        })
    }
}

impl TryFrom<WireframeRequest> for CapabilityInput {
    type Error = String;

    fn try_from(r: WireframeRequest) -> Result<Self, Self::Error> {
        let device = match r.device.as_deref() {
            Some(d) => d.parse::<Device>().map_err(|e| e.to_string())?,
            None => Device::Desktop,
        };
        Ok(CapabilityInput::Wireframe(WireframeInput {
            screen: r.screen,
            description: r.description,
            device,
        }))
    }
}

impl From<CritiqueRequest> for CapabilityInput {
    fn from(r: CritiqueRequest) -> Self {
        CapabilityInput::DesignCritique(DesignCritiqueInput {
            design: r.design,
            goals: r.goals.unwrap_or_default(),
            focus: r.focus.unwrap_or_default(),
        })
    }
}

fn text_result(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

fn error_result(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(text.into())]))
}

/// Run a model-backed capability and shape the outcome as a tool result.
async fn run_capability(input: CapabilityInput) -> Result<CallToolResult, McpError> {
    let settings = atelier_core::read_settings().with_env_overrides();
    let backend = match LlmBackend::new(settings) {
        Ok(b) => b,
        Err(e) => return error_result(e.to_string()),
    };

    match atelier_advise::advise(&input, &backend).await {
        Ok(report) => text_result(report.markdown),
        Err(e @ AdviseError::Input(_)) => error_result(format!("Invalid request: {e}")),
        Err(e) => {
            tracing::warn!(capability = %input.capability(), error = %e, "capability failed");
            error_result(format!("{} failed: {e}", input.capability().title()))
        }
    }
}

fn list_capabilities_text() -> String {
    let mut out = String::new();
    for c in Capability::ALL {
        out.push_str(&format!("- {} ({}): {}\n", c.title(), c.id(), c.summary()));
    }
    out
}

// --- Server ---

#[derive(Clone)]
pub struct AtelierServer {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AtelierServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List the design guidance capabilities this server offers")]
    fn list_capabilities(&self) -> Result<CallToolResult, McpError> {
        text_result(list_capabilities_text())
    }

    #[tool(
        description = "Generate a design system for a product: computes color scales (primary, neutral, success, warning, error, info), a modular type scale, a 4px spacing scale and contrast checks from the brand color, then asks the model for principles, semantic color roles, typography roles and component guidance. Returns a markdown report."
    )]
    async fn generate_design_system(
        &self,
        Parameters(req): Parameters<DesignSystemRequest>,
    ) -> Result<CallToolResult, McpError> {
        run_capability(req.into()).await
    }

    #[tool(
        description = "Audit UI markup or a UI description against WCAG 2.2 success criteria at level A, AA or AAA. Color pairs passed in color_pairs are measured exactly and included in the report. Returns issues with criterion, severity and fix."
    )]
    async fn audit_accessibility(
        &self,
        Parameters(req): Parameters<AuditRequest>,
    ) -> Result<CallToolResult, McpError> {
        match CapabilityInput::try_from(req) {
            Ok(input) => run_capability(input).await,
            Err(e) => error_result(format!("Invalid request: {e}")),
        }
    }

    #[tool(
        description = "Map a user flow for a goal: ordered steps (screen, action, outcome), decision points with branches, and edge cases."
    )]
    async fn map_user_flow(
        &self,
        Parameters(req): Parameters<UserFlowRequest>,
    ) -> Result<CallToolResult, McpError> {
        run_capability(req.into()).await
    }

    #[tool(
        description = "Plan a component architecture for a feature: atomic-design hierarchy with responsibilities, props and children, state ownership and data flow."
    )]
    async fn plan_component_architecture(
        &self,
        Parameters(req): Parameters<ComponentRequest>,
    ) -> Result<CallToolResult, McpError> {
        run_capability(req.into()).await
    }

    #[tool(
        description = "Create a low-fidelity wireframe description for a screen: layout, regions with elements, interactions and an optional ASCII sketch."
    )]
    async fn create_wireframe(
        &self,
        Parameters(req): Parameters<WireframeRequest>,
    ) -> Result<CallToolResult, McpError> {
        match CapabilityInput::try_from(req) {
            Ok(input) => run_capability(input).await,
            Err(e) => error_result(format!("Invalid request: {e}")),
        }
    }

    #[tool(
        description = "Critique a design against Nielsen's 10 usability heuristics. Findings are rated on the 0-4 severity scale and ordered most severe first."
    )]
    async fn critique_design(
        &self,
        Parameters(req): Parameters<CritiqueRequest>,
    ) -> Result<CallToolResult, McpError> {
        run_capability(req.into()).await
    }

    #[tool(
        description = "Compute design tokens without calling a model: color scales, type scale, spacing scale and token templates as JSON."
    )]
    fn generate_tokens(
        &self,
        Parameters(req): Parameters<TokensRequest>,
    ) -> Result<CallToolResult, McpError> {
        let token_req = TokenRequest {
            brand_color: req.brand_color,
            type_ratio: req.type_ratio.unwrap_or_else(tokens::default_ratio),
            base_font_size: req.base_font_size.unwrap_or_else(tokens::default_base_font_size),
            spacing_unit: req.spacing_unit.unwrap_or_else(tokens::default_spacing_unit),
        };
        match tokens::generate_tokens(&token_req) {
            Ok(set) => {
                let json = serde_json::to_string_pretty(&set)
                    .unwrap_or_else(|e| format!("Serialization error: {}", e));
                text_result(json)
            }
            Err(e) => error_result(e.to_string()),
        }
    }

    #[tool(
        description = "Compute the WCAG contrast ratio between two hex colors and whether it passes AA (4.5:1), AAA (7:1) and AA large text (3:1)."
    )]
    fn check_contrast(
        &self,
        Parameters(req): Parameters<ContrastRequest>,
    ) -> Result<CallToolResult, McpError> {
        match tokens::evaluate_contrast(&req.foreground, &req.background) {
            Ok(r) => text_result(format!(
                "{} on {}: {:.2}:1\nAA: {}\nAAA: {}\nAA large text: {}",
                r.foreground,
                r.background,
                r.ratio,
                pass(r.levels.aa),
                pass(r.levels.aaa),
                pass(r.levels.aa_large)
            )),
            Err(e) => error_result(e.to_string()),
        }
    }

    #[tool(
        description = "Get a reference table used by the design capabilities: WCAG success criteria, Nielsen heuristics with the severity scale, the UI pattern catalog, or token templates (radius, shadow, breakpoint, motion)."
    )]
    fn get_knowledge(
        &self,
        Parameters(req): Parameters<KnowledgeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let table: Table = match req.table.parse() {
            Ok(t) => t,
            Err(e) => return error_result(e),
        };
        match table.render_filtered(req.filter.as_deref()) {
            Ok(text) => text_result(text),
            Err(e) => error_result(e),
        }
    }
}

fn pass(ok: bool) -> &'static str {
    if ok {
        "pass"
    } else {
        "fail"
    }
}

#[tool_handler]
impl ServerHandler for AtelierServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = format!(
            "{}\n\n## Capabilities\n{}",
            INSTRUCTIONS,
            list_capabilities_text()
        );
        ServerInfo {
            instructions: Some(instructions.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

const INSTRUCTIONS: &str = r#"atelier gives design guidance for user interfaces.

## Deterministic tools (no model call)
- `generate_tokens`: color scales, type scale and spacing scale from a brand color.
- `check_contrast`: exact WCAG contrast ratio for a foreground/background pair.
- `get_knowledge`: the WCAG, heuristic, pattern and token-template tables the guidance tools use.

## Guidance tools (call the configured model)
Each returns a markdown report. They need a model configured in ~/.atelier/settings.json
or via ATELIER_PROVIDER / ATELIER_MODEL / ATELIER_API_KEY.

Prefer `check_contrast` over estimating contrast yourself, and pass any color pairs you know
about to `audit_accessibility` so they are measured exactly."#;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ATELIER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle `atelier-mcp init` subcommand
    if std::env::args().nth(1).as_deref() == Some("init") {
        return init_project();
    }

    init_tracing();
    tracing::info!("starting atelier MCP server on stdio");

    let service = AtelierServer::new()
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {}", e))?;
    service.waiting().await?;
    Ok(())
}

/// Coding agents that `atelier-mcp init` can register the server with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Agent {
    ClaudeCode,
    Codex,
}

impl Agent {
    const ALL: [Agent; 2] = [Agent::ClaudeCode, Agent::Codex];

    fn label(self) -> &'static str {
        match self {
            Agent::ClaudeCode => "Claude Code",
            Agent::Codex => "Codex",
        }
    }

    fn executable(self) -> &'static str {
        match self {
            Agent::ClaudeCode => "claude",
            Agent::Codex => "codex",
        }
    }

    /// Project-scoped config file the agent reads its MCP servers from.
    fn config_path(self, project: &Path) -> PathBuf {
        match self {
            Agent::ClaudeCode => project.join(".mcp.json"),
            Agent::Codex => project.join(".codex").join("config.toml"),
        }
    }

    fn merge(self, existing: Option<&str>, binary_path: &str) -> serde_json::Result<String> {
        match self {
            Agent::ClaudeCode => merge_mcp_json(existing, binary_path),
            Agent::Codex => Ok(merge_codex_toml(existing, binary_path)),
        }
    }
}

/// Whether `name` (or `name.exe`) is an executable file in one of `path`'s
/// directories.
fn on_path(name: &str, path: Option<&OsStr>) -> bool {
    let Some(path) = path else {
        return false;
    };
    std::env::split_paths(path).any(|dir| {
        dir.join(name).is_file() || dir.join(format!("{name}.exe")).is_file()
    })
}

fn installed_agents(path: Option<&OsStr>) -> Vec<Agent> {
    Agent::ALL
        .into_iter()
        .filter(|a| on_path(a.executable(), path))
        .collect()
}

/// Register atelier-mcp in the project config of every installed agent,
/// keeping whatever else those files already hold.
fn init_project() -> Result<(), Box<dyn std::error::Error>> {
    let binary_path = std::env::current_exe()?
        .canonicalize()?
        .to_string_lossy()
        .to_string();
    let project = std::env::current_dir()?;

    let agents = installed_agents(std::env::var_os("PATH").as_deref());
    if agents.is_empty() {
        return Err(
            "neither `claude` nor `codex` is on PATH; install one, then re-run `atelier-mcp init`"
                .into(),
        );
    }

    for agent in &agents {
        let path = agent.config_path(&project);
        let existing = std::fs::read_to_string(&path).ok();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, agent.merge(existing.as_deref(), &binary_path)?)?;
        eprintln!("Wrote {}", path.display());
    }

    let labels: Vec<&str> = agents.iter().map(|a| a.label()).collect();
    eprintln!("\nDone. {} will use atelier in this project.", labels.join(" and "));
    Ok(())
}

/// Add the atelier server to a Claude Code `.mcp.json`, keeping other servers.
fn merge_mcp_json(existing: Option<&str>, binary_path: &str) -> serde_json::Result<String> {
    let mut root: serde_json::Value = existing
        .and_then(|s| serde_json::from_str(s).ok())
        .filter(|v: &serde_json::Value| v.is_object())
        .unwrap_or_else(|| serde_json::json!({}));

    if !root.get("mcpServers").is_some_and(|v| v.is_object()) {
        root["mcpServers"] = serde_json::json!({});
    }
    root["mcpServers"]["atelier"] = serde_json::json!({
        "type": "stdio",
        "command": binary_path,
        "args": [],
    });

    serde_json::to_string_pretty(&root)
}

/// Add the atelier server to a Codex `config.toml`, keeping other settings.
fn merge_codex_toml(existing: Option<&str>, binary_path: &str) -> String {
    let mut doc: toml_edit::DocumentMut = existing
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    if !doc.contains_table("mcp_servers") {
        doc["mcp_servers"] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    let mut server = toml_edit::Table::new();
    server.insert("command", toml_edit::value(binary_path));
    server.insert("args", toml_edit::value(toml_edit::Array::new()));
    doc["mcp_servers"]["atelier"] = toml_edit::Item::Table(server);

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcp_json_keeps_other_servers() {
        let existing = r#"{"mcpServers":{"other":{"command":"x"}},"extra":1}"#;
        let merged = merge_mcp_json(Some(existing), "/bin/atelier-mcp").unwrap();
        let v: serde_json::Value = serde_json::from_str(&merged).unwrap();
        assert_eq!(v["mcpServers"]["other"]["command"], "x");
        assert_eq!(v["mcpServers"]["atelier"]["command"], "/bin/atelier-mcp");
        assert_eq!(v["extra"], 1);
    }

    #[test]
    fn mcp_json_recovers_from_garbage() {
        let merged = merge_mcp_json(Some("not json"), "/bin/a").unwrap();
        let v: serde_json::Value = serde_json::from_str(&merged).unwrap();
        assert_eq!(v["mcpServers"]["atelier"]["type"], "stdio");
    }

    #[test]
    fn codex_toml_adds_server_table() {
        let merged = merge_codex_toml(Some("model = \"o3\"\n"), "/bin/a");
        assert!(merged.contains("model = \"o3\""));
        assert!(merged.contains("[mcp_servers.atelier]"));
        assert!(merged.contains("command = \"/bin/a\""));
    }

    #[test]
    fn audit_request_parses_level() {
        let req = AuditRequest {
            target: "form".into(),
            level: Some("aaa".into()),
            context: None,
            color_pairs: None,
        };
        match CapabilityInput::try_from(req).unwrap() {
            CapabilityInput::AccessibilityAudit(a) => assert_eq!(a.level, WcagLevel::AAA),
            other => panic!("unexpected: {other:?}"),
        }

        let bad = AuditRequest {
            target: "form".into(),
            level: Some("gold".into()),
            context: None,
            color_pairs: None,
        };
        assert!(CapabilityInput::try_from(bad).is_err());
    }

    #[test]
    fn wireframe_request_rejects_unknown_device() {
        let req = WireframeRequest {
            screen: "Home".into(),
            description: "d".into(),
            device: Some("watch".into()),
        };
        let err = CapabilityInput::try_from(req).unwrap_err();
        assert!(err.contains("watch"));
    }

    #[test]
    fn design_system_request_fills_defaults() {
        let req = DesignSystemRequest {
            product: "P".into(),
            description: "D".into(),
            brand_color: "#000".into(),
            type_ratio: None,
            base_font_size: None,
            spacing_unit: None,
            platforms: None,
        };
        match CapabilityInput::from(req) {
            CapabilityInput::DesignSystem(d) => {
                assert_eq!(d.type_ratio, "major-third");
                assert_eq!(d.base_font_size, 16.0);
                assert_eq!(d.spacing_unit, 4.0);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn agents_are_found_on_path() {
        let dir = std::env::temp_dir().join(format!("atelier-mcp-path-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("codex"), "").unwrap();
        let path = std::env::join_paths([&dir]).unwrap();

        let found = installed_agents(Some(path.as_os_str()));
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(found, vec![Agent::Codex]);
        assert!(installed_agents(None).is_empty());
    }

    #[test]
    fn agent_config_paths() {
        let root = Path::new("/work/app");
        assert_eq!(Agent::ClaudeCode.config_path(root), root.join(".mcp.json"));
        assert_eq!(Agent::Codex.config_path(root), root.join(".codex/config.toml"));
        let toml = Agent::Codex.merge(None, "/bin/a").unwrap();
        assert!(toml.contains("[mcp_servers.atelier]"));
    }

    #[test]
    fn capability_listing_names_every_id() {
        let text = list_capabilities_text();
        for c in Capability::ALL {
            assert!(text.contains(c.id()));
        }
    }
}

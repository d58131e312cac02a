//! Expected shapes of the model's JSON replies, one per capability.
//! Unknown fields are ignored and lists default to empty; `summary` is
//! always required.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub trait Response: DeserializeOwned + Serialize {
    fn summary(&self) -> &str;

    /// Checks beyond what deserialization enforces.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

macro_rules! summary_response {
    ($($ty:ty),+ $(,)?) => {
        $(impl Response for $ty {
            fn summary(&self) -> &str {
                &self.summary
            }
        })+
    };
}

// --- design-system ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principle {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorRole {
    pub role: String,
    pub token: String,
    #[serde(default)]
    pub usage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRole {
    pub role: String,
    pub step: String,
    #[serde(default)]
    pub guidance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentGuideline {
    pub name: String,
    #[serde(default)]
    pub guidance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystemResponse {
    pub summary: String,
    #[serde(default)]
    pub principles: Vec<Principle>,
    #[serde(default)]
    pub color_roles: Vec<ColorRole>,
    #[serde(default)]
    pub typography: Vec<TypeRole>,
    #[serde(default)]
    pub components: Vec<ComponentGuideline>,
}

// --- accessibility-audit ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl AuditSeverity {
    pub fn label(self) -> &'static str {
        match self {
            AuditSeverity::Critical => "critical",
            AuditSeverity::Serious => "serious",
            AuditSeverity::Moderate => "moderate",
            AuditSeverity::Minor => "minor",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditIssue {
    pub criterion: String,
    pub severity: AuditSeverity,
    #[serde(default)]
    pub element: String,
    pub problem: String,
    #[serde(default)]
    pub fix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResponse {
    pub summary: String,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub issues: Vec<AuditIssue>,
    #[serde(default)]
    pub passes: Vec<String>,
}

// --- user-flow ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowStep {
    pub id: String,
    pub screen: String,
    pub action: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub next: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPoint {
    pub at: String,
    pub question: String,
    #[serde(default)]
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFlowResponse {
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<FlowStep>,
    #[serde(default)]
    pub decision_points: Vec<DecisionPoint>,
    #[serde(default)]
    pub edge_cases: Vec<String>,
}

// --- component-architecture ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentLevel {
    Atom,
    Molecule,
    Organism,
    Template,
    Page,
}

impl ComponentLevel {
    pub fn label(self) -> &'static str {
        match self {
            ComponentLevel::Atom => "atom",
            ComponentLevel::Molecule => "molecule",
            ComponentLevel::Organism => "organism",
            ComponentLevel::Template => "template",
            ComponentLevel::Page => "page",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub level: ComponentLevel,
    #[serde(default)]
    pub responsibility: String,
    #[serde(default)]
    pub props: Vec<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSpec {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentArchitectureResponse {
    pub summary: String,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
    #[serde(default)]
    pub state: Vec<StateSpec>,
    #[serde(default)]
    pub data_flow: Vec<String>,
}

// --- wireframe ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireframeResponse {
    pub summary: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub interactions: Vec<String>,
    #[serde(default)]
    pub ascii: Option<String>,
}

// --- design-critique ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub heuristic: String,
    pub severity: u8,
    pub observation: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritiqueResponse {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub priorities: Vec<String>,
}

summary_response!(
    DesignSystemResponse,
    UserFlowResponse,
    ComponentArchitectureResponse,
    WireframeResponse,
);

impl Response for AuditResponse {
    fn summary(&self) -> &str {
        &self.summary
    }

    fn check(&self) -> Result<(), String> {
        match self.score {
            Some(score) if score > 100 => Err(format!("score {score} is outside 0-100")),
            _ => Ok(()),
        }
    }
}

impl Response for CritiqueResponse {
    fn summary(&self) -> &str {
        &self.summary
    }

    fn check(&self) -> Result<(), String> {
        match self.findings.iter().find(|f| f.severity > 4) {
            Some(f) => Err(format!(
                "finding '{}' has severity {} (expected 0-4)",
                f.heuristic, f.severity
            )),
            None => Ok(()),
        }
    }
}

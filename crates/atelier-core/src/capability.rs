use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::knowledge::WcagLevel;
use crate::tokens::{self, Rgb, TokenRequest, TypeRatio};

/// Longest accepted free-text field, in characters.
pub const MAX_TEXT_LEN: usize = 20_000;

/// The six design-guidance requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    DesignSystem,
    AccessibilityAudit,
    UserFlow,
    ComponentArchitecture,
    Wireframe,
    DesignCritique,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::DesignSystem,
        Capability::AccessibilityAudit,
        Capability::UserFlow,
        Capability::ComponentArchitecture,
        Capability::Wireframe,
        Capability::DesignCritique,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Capability::DesignSystem => "design-system",
            Capability::AccessibilityAudit => "accessibility-audit",
            Capability::UserFlow => "user-flow",
            Capability::ComponentArchitecture => "component-architecture",
            Capability::Wireframe => "wireframe",
            Capability::DesignCritique => "design-critique",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Capability::DesignSystem => "Design System",
            Capability::AccessibilityAudit => "Accessibility Audit",
            Capability::UserFlow => "User Flow",
            Capability::ComponentArchitecture => "Component Architecture",
            Capability::Wireframe => "Wireframe",
            Capability::DesignCritique => "Design Critique",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Capability::DesignSystem => {
                "Generate color, type and spacing tokens plus usage guidance for a product"
            }
            Capability::AccessibilityAudit => {
                "Audit a UI description or markup against WCAG success criteria"
            }
            Capability::UserFlow => "Map the screens, actions and decisions for a user goal",
            Capability::ComponentArchitecture => {
                "Break a feature into a component hierarchy with props and state ownership"
            }
            Capability::Wireframe => "Lay out a screen as regions, elements and interactions",
            Capability::DesignCritique => {
                "Critique a design against Nielsen's heuristics with severity ratings"
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Capability {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| InputError::InvalidValue {
                field: "capability",
                value: s.to_string(),
                allowed: Capability::ALL.map(|c| c.id()).join(", "),
            })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("missing required field '{0}'")]
    Missing(&'static str),
    #[error("field '{field}' is too long ({len} characters, max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("invalid value '{value}' for '{field}' (expected one of: {allowed})")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: String,
    },
    #[error("invalid color in '{field}': {reason}")]
    InvalidColor { field: &'static str, reason: String },
}

fn require(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        return Err(InputError::Missing(field));
    }
    limit(field, value)
}

fn limit(field: &'static str, value: &str) -> Result<(), InputError> {
    let len = value.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(InputError::TooLong {
            field,
            len,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

fn limit_opt(field: &'static str, value: &Option<String>) -> Result<(), InputError> {
    value.as_deref().map_or(Ok(()), |v| limit(field, v))
}

fn limit_all(field: &'static str, values: &[String]) -> Result<(), InputError> {
    values.iter().try_for_each(|v| limit(field, v))
}

fn check_color(field: &'static str, value: &str) -> Result<(), InputError> {
    Rgb::from_hex(value)
        .map(|_| ())
        .map_err(|e| InputError::InvalidColor {
            field,
            reason: e.to_string(),
        })
}

// --- Inputs ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystemInput {
    pub product: String,
    pub description: String,
    pub brand_color: String,
    #[serde(default = "tokens::default_ratio")]
    pub type_ratio: String,
    #[serde(default = "tokens::default_base_font_size")]
    pub base_font_size: f64,
    #[serde(default = "tokens::default_spacing_unit")]
    pub spacing_unit: f64,
    #[serde(default)]
    pub platforms: Vec<String>,
}

impl DesignSystemInput {
    pub fn token_request(&self) -> TokenRequest {
        TokenRequest {
            brand_color: self.brand_color.clone(),
            type_ratio: self.type_ratio.clone(),
            base_font_size: self.base_font_size,
            spacing_unit: self.spacing_unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ColorPair {
    /// Text color as hex, e.g. "#1f2937"
    pub foreground: String,
    /// Background color as hex, e.g. "#ffffff"
    pub background: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityAuditInput {
    /// Markup, a screenshot description or written outline of the UI under audit.
    pub target: String,
    #[serde(default = "default_level")]
    pub level: WcagLevel,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub color_pairs: Vec<ColorPair>,
}

fn default_level() -> WcagLevel {
    WcagLevel::AA
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFlowInput {
    pub goal: String,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub entry_points: Vec<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentArchitectureInput {
    pub feature: String,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Mobile,
    Tablet,
    Desktop,
}

impl Device {
    pub fn name(self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
            Device::Desktop => "desktop",
        }
    }
}

impl FromStr for Device {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mobile" => Ok(Device::Mobile),
            "tablet" => Ok(Device::Tablet),
            "desktop" => Ok(Device::Desktop),
            _ => Err(InputError::InvalidValue {
                field: "device",
                value: s.to_string(),
                allowed: "mobile, tablet, desktop".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireframeInput {
    pub screen: String,
    pub description: String,
    #[serde(default = "default_device")]
    pub device: Device,
}

fn default_device() -> Device {
    Device::Desktop
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignCritiqueInput {
    /// Description, markup or link text of the design under review.
    pub design: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub focus: Vec<String>,
}

/// One request, tagged by capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "kebab-case")]
pub enum CapabilityInput {
    DesignSystem(DesignSystemInput),
    AccessibilityAudit(AccessibilityAuditInput),
    UserFlow(UserFlowInput),
    ComponentArchitecture(ComponentArchitectureInput),
    Wireframe(WireframeInput),
    DesignCritique(DesignCritiqueInput),
}

impl CapabilityInput {
    pub fn capability(&self) -> Capability {
        match self {
            CapabilityInput::DesignSystem(_) => Capability::DesignSystem,
            CapabilityInput::AccessibilityAudit(_) => Capability::AccessibilityAudit,
            CapabilityInput::UserFlow(_) => Capability::UserFlow,
            CapabilityInput::ComponentArchitecture(_) => Capability::ComponentArchitecture,
            CapabilityInput::Wireframe(_) => Capability::Wireframe,
            CapabilityInput::DesignCritique(_) => Capability::DesignCritique,
        }
    }

    /// Reject inputs that cannot produce a useful prompt. Runs before any
    /// model call.
    pub fn validate(&self) -> Result<(), InputError> {
        match self {
            CapabilityInput::DesignSystem(i) => {
                require("product", &i.product)?;
                require("description", &i.description)?;
                check_color("brandColor", &i.brand_color)?;
                i.type_ratio
                    .parse::<TypeRatio>()
                    .map_err(|_| InputError::InvalidValue {
                        field: "typeRatio",
                        value: i.type_ratio.clone(),
                        allowed: TypeRatio::names(),
                    })?;
                limit_all("platforms", &i.platforms)
            }
            CapabilityInput::AccessibilityAudit(i) => {
                require("target", &i.target)?;
                limit_opt("context", &i.context)?;
                for pair in &i.color_pairs {
                    check_color("colorPairs", &pair.foreground)?;
                    check_color("colorPairs", &pair.background)?;
                }
                Ok(())
            }
            CapabilityInput::UserFlow(i) => {
                require("goal", &i.goal)?;
                limit_opt("persona", &i.persona)?;
                limit_opt("platform", &i.platform)?;
                limit_all("entryPoints", &i.entry_points)
            }
            CapabilityInput::ComponentArchitecture(i) => {
                require("feature", &i.feature)?;
                limit_opt("framework", &i.framework)?;
                limit_all("requirements", &i.requirements)
            }
            CapabilityInput::Wireframe(i) => {
                require("screen", &i.screen)?;
                require("description", &i.description)
            }
            CapabilityInput::DesignCritique(i) => {
                require("design", &i.design)?;
                limit_all("goals", &i.goals)?;
                limit_all("focus", &i.focus)
            }
        }
    }
}

pub mod engine;
mod parse;
pub mod prompt;
pub mod report;
pub mod response;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use atelier_core::tokens::{self, ContrastResult, DesignTokens};
use atelier_core::{Capability, CapabilityInput, InputError, TokenError};

pub use engine::{Backend, LlmBackend};
pub use parse::parse_model_output;

#[derive(Debug, thiserror::Error)]
pub enum AdviseError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error("token generation failed: {0}")]
    Tokens(#[from] TokenError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("model backend error: {0}")]
    Backend(String),
    #[error("model call timed out after {0}s")]
    Timeout(u64),
    #[error("model returned no text")]
    EmptyResponse,
    #[error("model reply did not match the expected shape: {0}")]
    MalformedResponse(String),
}

/// Deterministic data computed before the model call. Injected into the
/// prompt and rendered ahead of the model's guidance.
#[derive(Debug, Default)]
pub struct Precomputed {
    pub tokens: Option<DesignTokens>,
    pub contrast: Vec<(String, ContrastResult)>,
}

impl Precomputed {
    pub fn for_input(input: &CapabilityInput) -> Result<Self, AdviseError> {
        match input {
            CapabilityInput::DesignSystem(i) => Ok(Self {
                tokens: Some(tokens::generate_tokens(&i.token_request())?),
                contrast: vec![],
            }),
            CapabilityInput::AccessibilityAudit(i) => {
                let contrast = i
                    .color_pairs
                    .iter()
                    .map(|p| {
                        let result = tokens::evaluate_contrast(&p.foreground, &p.background)?;
                        Ok((format!("{} on {}", p.foreground, p.background), result))
                    })
                    .collect::<Result<Vec<_>, TokenError>>()?;
                Ok(Self {
                    tokens: None,
                    contrast,
                })
            }
            _ => Ok(Self::default()),
        }
    }
}

/// A finished guidance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub capability: Capability,
    pub title: String,
    /// Human-readable rendering.
    pub markdown: String,
    /// Validated model reply, plus computed tokens/contrast where relevant.
    pub data: serde_json::Value,
}

fn report_title(input: &CapabilityInput) -> String {
    let capability = input.capability();
    let subject = match input {
        CapabilityInput::DesignSystem(i) => Some(i.product.as_str()),
        CapabilityInput::UserFlow(i) => Some(i.goal.as_str()),
        CapabilityInput::Wireframe(i) => Some(i.screen.as_str()),
        _ => None,
    };
    match subject.map(str::trim).filter(|s| !s.is_empty() && s.len() <= 80) {
        Some(s) => format!("{}: {}", capability.title(), s),
        None => capability.title().to_string(),
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, AdviseError> {
    serde_json::to_value(value).map_err(|e| AdviseError::MalformedResponse(e.to_string()))
}

/// Parse and render the raw model reply for `input`.
pub fn render(
    input: &CapabilityInput,
    pre: &Precomputed,
    raw: &str,
) -> Result<Report, AdviseError> {
    let title = report_title(input);
    let (markdown, mut data) = match input {
        CapabilityInput::DesignSystem(_) => {
            let r: response::DesignSystemResponse = parse_model_output(raw)?;
            (report::design_system(&title, pre.tokens.as_ref(), &r), to_value(&r)?)
        }
        CapabilityInput::AccessibilityAudit(_) => {
            let r: response::AuditResponse = parse_model_output(raw)?;
            (report::audit(&title, &pre.contrast, &r), to_value(&r)?)
        }
        CapabilityInput::UserFlow(_) => {
            let r: response::UserFlowResponse = parse_model_output(raw)?;
            (report::user_flow(&title, &r), to_value(&r)?)
        }
        CapabilityInput::ComponentArchitecture(_) => {
            let r: response::ComponentArchitectureResponse = parse_model_output(raw)?;
            (report::component_architecture(&title, &r), to_value(&r)?)
        }
        CapabilityInput::Wireframe(_) => {
            let r: response::WireframeResponse = parse_model_output(raw)?;
            (report::wireframe(&title, &r), to_value(&r)?)
        }
        CapabilityInput::DesignCritique(_) => {
            let r: response::CritiqueResponse = parse_model_output(raw)?;
            (report::critique(&title, &r), to_value(&r)?)
        }
    };

    if let Some(obj) = data.as_object_mut() {
        if let Some(tokens) = &pre.tokens {
            obj.insert("tokens".to_string(), to_value(tokens)?);
        }
        if !pre.contrast.is_empty() {
            let rows: Vec<&ContrastResult> = pre.contrast.iter().map(|(_, r)| r).collect();
            obj.insert("contrast".to_string(), to_value(&rows)?);
        }
    }

    Ok(Report {
        capability: input.capability(),
        title,
        markdown,
        data,
    })
}

/// Run one capability end to end: validate, build the prompt, call the
/// model, parse and render the reply.
pub async fn advise(
    input: &CapabilityInput,
    backend: &dyn Backend,
) -> Result<Report, AdviseError> {
    input.validate()?;
    let capability = input.capability();
    let pre = Precomputed::for_input(input)?;
    let prompt = prompt::build(input, &pre);

    info!(capability = %capability, backend = %backend.describe(), "requesting guidance");
    debug!(
        system_len = prompt.system.len(),
        user_len = prompt.user.len(),
        "prompt built"
    );

    let raw = backend.generate(&prompt.system, &prompt.user).await?;
    debug!(capability = %capability, raw = %raw, "raw model output");

    render(input, &pre, &raw).inspect_err(|e| {
        warn!(capability = %capability, error = %e, "discarding model reply");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use atelier_core::capability::{
        AccessibilityAuditInput, ColorPair, DesignSystemInput, UserFlowInput,
    };
    use atelier_core::knowledge::WcagLevel;
    use std::sync::Mutex;

    /// Replays a fixed reply and records the prompts it was given.
    struct Canned {
        reply: Result<String, AdviseError>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl Canned {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(vec![]),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Backend for Canned {
        async fn generate(&self, system: &str, user_msg: &str) -> Result<String, AdviseError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user_msg.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(AdviseError::EmptyResponse),
            }
        }

        fn describe(&self) -> String {
            "canned".to_string()
        }
    }

    fn design_system_input() -> CapabilityInput {
        CapabilityInput::DesignSystem(DesignSystemInput {
            product: "Ledger".into(),
            description: "Budgeting for freelancers".into(),
            brand_color: "#2563eb".into(),
            type_ratio: "perfect-fourth".into(),
            base_font_size: 16.0,
            spacing_unit: 4.0,
            platforms: vec![],
        })
    }

    #[tokio::test]
    async fn design_system_end_to_end() {
        let backend = Canned::ok(
            r#"Sure! {"summary":"Trustworthy and calm.","principles":[{"name":"Clarity","description":"Numbers first"}],
            "colorRoles":[{"role":"action","token":"primary-600","usage":"Primary buttons"}]}"#,
        );
        let report = advise(&design_system_input(), &backend).await.unwrap();

        assert_eq!(report.capability, Capability::DesignSystem);
        assert_eq!(report.title, "Design System: Ledger");
        assert!(report.markdown.starts_with("# Design System: Ledger"));
        assert!(report.markdown.contains("- **Clarity**: Numbers first"));
        assert!(report.markdown.contains("| action | `primary-600` | Primary buttons |"));
        assert_eq!(report.data["tokens"]["typeRatio"], "perfect-fourth");
        assert_eq!(report.data["tokens"]["colors"][0]["name"], "primary");

        let seen = backend.seen.lock().unwrap();
        assert!(seen[0].0.contains("TYPE SCALE (perfect-fourth)"));
        assert!(seen[0].0.contains("text-lg: 21.33px"));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_backend() {
        let backend = Canned::ok("{}");
        let input = CapabilityInput::UserFlow(UserFlowInput {
            goal: String::new(),
            persona: None,
            entry_points: vec![],
            platform: None,
        });
        let err = advise(&input, &backend).await.unwrap_err();
        assert!(matches!(err, AdviseError::Input(InputError::Missing("goal"))));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_reply_is_an_error_not_a_panic() {
        let backend = Canned::ok("I'd rather not answer in JSON.");
        let err = advise(&design_system_input(), &backend).await.unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(_)));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        let backend = Canned {
            reply: Err(AdviseError::EmptyResponse),
            seen: Mutex::new(vec![]),
        };
        let err = advise(&design_system_input(), &backend).await.unwrap_err();
        assert!(matches!(err, AdviseError::EmptyResponse));
    }

    #[tokio::test]
    async fn audit_includes_measured_contrast() {
        let backend = Canned::ok(r#"{"summary":"Mostly fine","issues":[]}"#);
        let input = CapabilityInput::AccessibilityAudit(AccessibilityAuditInput {
            target: "<p class=muted>Fine print</p>".into(),
            level: WcagLevel::AA,
            context: None,
            color_pairs: vec![ColorPair {
                foreground: "#999999".into(),
                background: "#ffffff".into(),
            }],
        });
        let report = advise(&input, &backend).await.unwrap();
        assert!(report.markdown.contains("## Measured contrast"));
        assert!(report.markdown.contains("No issues found."));
        assert_eq!(report.data["contrast"][0]["aa"], false);

        let seen = backend.seen.lock().unwrap();
        assert!(seen[0].1.contains("#999999 on #ffffff: 2.85:1 AA=false"));
    }

    #[test]
    fn every_capability_renders_a_minimal_reply() {
        let inputs: Vec<CapabilityInput> = vec![
            design_system_input(),
            serde_json::from_str(r#"{"capability":"accessibility-audit","target":"t"}"#).unwrap(),
            serde_json::from_str(r#"{"capability":"user-flow","goal":"Sign up"}"#).unwrap(),
            serde_json::from_str(r#"{"capability":"component-architecture","feature":"Cart"}"#)
                .unwrap(),
            serde_json::from_str(r#"{"capability":"wireframe","screen":"Home","description":"d"}"#)
                .unwrap(),
            serde_json::from_str(r#"{"capability":"design-critique","design":"d"}"#).unwrap(),
        ];
        for input in inputs {
            let pre = Precomputed::for_input(&input).unwrap();
            let report = render(&input, &pre, r#"{"summary":"ok"}"#).unwrap();
            assert_eq!(report.capability, input.capability());
            assert!(report.markdown.contains("\nok\n"), "{}", input.capability());
            assert_eq!(report.data["summary"], "ok");
        }
    }
}

use crate::response::Response;
use crate::AdviseError;

/// Parse raw model output into the typed reply for one capability.
///
/// The model is untrusted: anything that is not a JSON object matching the
/// expected shape is reported as `MalformedResponse`.
pub fn parse_model_output<T: Response>(raw: &str) -> Result<T, AdviseError> {
    let json_str = extract_json_object(raw)
        .ok_or_else(|| AdviseError::MalformedResponse("no JSON object in reply".to_string()))?;

    let parsed: T = serde_json::from_str(json_str)
        .map_err(|e| AdviseError::MalformedResponse(e.to_string()))?;

    if parsed.summary().trim().is_empty() {
        return Err(AdviseError::MalformedResponse("empty summary".to_string()));
    }
    parsed.check().map_err(AdviseError::MalformedResponse)?;

    Ok(parsed)
}

/// Extract the JSON object substring from raw model output, skipping any
/// prose or code fences around it.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{AuditResponse, AuditSeverity, CritiqueResponse, WireframeResponse};

    #[test]
    fn extracts_object_from_fenced_reply() {
        let raw = "Here you go:\n```json\n{\"summary\":\"ok\",\"issues\":[]}\n```\nThanks";
        let parsed: AuditResponse = parse_model_output(raw).unwrap();
        assert_eq!(parsed.summary, "ok");
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn reads_typed_severity() {
        let raw = r##"{"summary":"two problems","score":62,"issues":[
            {"criterion":"1.4.3","severity":"serious","element":"button","problem":"low contrast","fix":"darken"},
            {"criterion":"2.4.7","severity":"critical","problem":"no focus ring"}
        ],"extra":"ignored"}"##;
        let parsed: AuditResponse = parse_model_output(raw).unwrap();
        assert_eq!(parsed.score, Some(62));
        assert_eq!(parsed.issues[0].severity, AuditSeverity::Serious);
        assert_eq!(parsed.issues[1].element, "");
    }

    #[test]
    fn missing_object_is_malformed() {
        let err = parse_model_output::<WireframeResponse>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(_)));

        let err = parse_model_output::<WireframeResponse>("} backwards {").unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(_)));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = parse_model_output::<AuditResponse>(r#"{"summary":"x","issues":"none"}"#)
            .unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(_)));

        let err = parse_model_output::<AuditResponse>(
            r#"{"summary":"x","issues":[{"criterion":"1.1.1","severity":"apocalyptic","problem":"p"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(_)));
    }

    #[test]
    fn empty_summary_is_malformed() {
        let err = parse_model_output::<WireframeResponse>(r#"{"summary":"  "}"#).unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(_)));
    }

    #[test]
    fn out_of_range_values_are_malformed() {
        let err = parse_model_output::<CritiqueResponse>(
            r#"{"summary":"s","findings":[{"heuristic":"1","severity":7,"observation":"o"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(m) if m.contains("severity 7")));

        let err = parse_model_output::<AuditResponse>(r#"{"summary":"s","score":250}"#)
            .unwrap_err();
        assert!(matches!(err, AdviseError::MalformedResponse(_)));
    }
}

use serde_json::Value;

use aidagent_types::RawAlert;

use crate::error::ProviderError;

/// Parse a provider response into raw alert records.
///
/// The provider is asked for a bare JSON array but routinely wraps it in
/// markdown code fences; those are stripped first. A payload that is not a
/// JSON array at all is `MalformedResponse`. Individual elements that fail
/// to deserialize are dropped and logged rather than failing the batch.
pub fn parse_alert_batch(payload: &str) -> Result<Vec<RawAlert>, ProviderError> {
    let cleaned = strip_code_fences(payload);

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ProviderError::MalformedResponse(
            "expected a JSON array of alert objects".to_string(),
        ));
    };

    let mut alerts = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<RawAlert>(item) {
            Ok(alert) => alerts.push(alert),
            Err(e) => tracing::warn!(error = %e, "dropping unparseable alert record"),
        }
    }
    Ok(alerts)
}

/// Strip a leading/trailing markdown code fence (with optional `json` tag).
pub fn strip_code_fences(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

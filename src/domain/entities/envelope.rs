use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;

/// Uniform `{ success, data, message, error }` body returned by every API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,

    #[serde(default = "Option::default")]
    pub data: Option<T>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<Vec<ErrorDetail>>,

    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    #[serde(default)]
    pub path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(default)]
    pub total_page: u32,
}

impl<T> Envelope<T> {
    /// First structured error, then the top-level message, then `fallback`.
    pub fn failure_message(&self, fallback: &str) -> String {
        self.error
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.message.clone())
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.message.clone().filter(|m| !m.trim().is_empty()))
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn success_message(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Unwraps successful data; a `success:false` envelope becomes [`DashboardError::Rejected`].
    pub fn into_data(self, fallback: &str) -> Result<T, DashboardError> {
        if !self.success {
            return Err(DashboardError::Rejected(self.failure_message(fallback)));
        }
        self.data
            .ok_or_else(|| DashboardError::Decode("response envelope has no data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_message_prefers_first_structured_error() {
        let envelope: Envelope<()> = serde_json::from_value(json!({
            "success": false,
            "message": "Validation Error",
            "error": [{ "path": "title", "message": "Title is required" }, { "message": "second" }]
        }))
        .unwrap();

        assert_eq!(envelope.failure_message("Failed"), "Title is required");
    }

    #[test]
    fn failure_message_falls_back_in_order() {
        let with_message: Envelope<()> =
            serde_json::from_value(json!({ "success": false, "message": "Not allowed" })).unwrap();
        assert_eq!(with_message.failure_message("Failed"), "Not allowed");

        let bare: Envelope<()> = serde_json::from_value(json!({ "success": false, "error": [] })).unwrap();
        assert_eq!(bare.failure_message("Failed to delete project"), "Failed to delete project");
    }

    #[test]
    fn rejected_envelope_is_not_data() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_value(json!({ "success": false, "message": "Unauthorized" })).unwrap();
        match envelope.into_data("Failed") {
            Err(DashboardError::Rejected(msg)) => assert_eq!(msg, "Unauthorized"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn meta_is_optional() {
        let envelope: Envelope<Vec<u8>> = serde_json::from_value(json!({
            "success": true,
            "data": [1, 2],
            "meta": { "page": 1, "limit": 8, "total": 2, "totalPage": 1 }
        }))
        .unwrap();
        assert_eq!(envelope.meta.map(|m| m.total), Some(2));
        assert_eq!(envelope.data, Some(vec![1, 2]));
    }
}

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RatingResponse {
    pub rating: String,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Returned when the model replied but neither label could be found.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParseFailureResponse {
    pub error: String,
    pub raw_output: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub references_loaded: usize,
    pub reference_files: Vec<String>,
    pub ready: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_failure_uses_raw_output_key() {
        let body = ParseFailureResponse {
            error: "bad".into(),
            raw_output: "hello".into(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"error": "bad", "raw_output": "hello"}));
    }
}

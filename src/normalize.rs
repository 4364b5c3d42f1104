use serde::{Deserialize, Serialize};

/// Output of the schema-constrained variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAnswer {
    pub category: String,
    pub answer: String,
}

/// Strict parse of model output that was requested as JSON. Fields pass
/// through verbatim.
pub fn parse_structured(raw: &str) -> Result<ClassifiedAnswer, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

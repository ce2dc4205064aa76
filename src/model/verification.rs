use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A code handed out to a lecturer for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCode {
    #[schema(example = "5281")]
    pub code: String,
    #[schema(example = "CS101")]
    pub course_code: String,
    #[schema(value_type = String, format = "date-time")]
    pub issued_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub expires_at: DateTime<Utc>,
}

impl IssuedCode {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

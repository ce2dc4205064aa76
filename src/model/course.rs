use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static course reference data, seeded once and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "code": "CS101",
    "name": "Numerical Methods",
    "lecturer": "Dr. Smith"
}))]
pub struct Course {
    #[schema(example = "CS101")]
    pub code: String,
    #[schema(example = "Numerical Methods")]
    pub name: String,
    #[schema(example = "Dr. Smith")]
    pub lecturer: String,
}

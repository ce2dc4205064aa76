use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// One stored attendance submission.
///
/// `session_type` and `status` keep whatever string the client sent; the
/// enums below only describe the values the student form offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "1",
    "courseCode": "CS101",
    "courseName": "Numerical Methods",
    "timestamp": "2026-01-01T09:00:00Z",
    "sessionType": "Lecture",
    "status": "Present",
    "verificationCode": "5281",
    "studentId": "S12345"
}))]
pub struct AttendanceRecord {
    pub id: String,
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub session_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub verification_code: String,
    pub student_id: String,
}

/// Submission body for `POST /attendance`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    /// Server fills the current epoch milliseconds when absent
    #[schema(example = "1767258000000", nullable = true)]
    pub id: Option<String>,
    #[schema(example = "CS101")]
    pub course_code: String,
    #[serde(default)]
    #[schema(example = "Numerical Methods")]
    pub course_name: String,
    /// Server stamps the current instant when absent or blank
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(value_type = Option<String>, format = "date-time", example = "2026-01-01T09:00:00Z")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    #[schema(example = "Lecture")]
    pub session_type: String,
    #[serde(default)]
    #[schema(example = "Present")]
    pub status: String,
    #[serde(default)]
    #[schema(example = "5281")]
    pub verification_code: String,
    #[schema(example = "S12345")]
    pub student_id: String,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl NewAttendance {
    /// Turns the submission into a record, filling the server-side defaults.
    pub fn into_record(self, now: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| now.timestamp_millis().to_string()),
            course_code: self.course_code,
            course_name: self.course_name,
            timestamp: self.timestamp.unwrap_or(now),
            session_type: self.session_type,
            status: self.status,
            verification_code: self.verification_code,
            student_id: self.student_id,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, AsRefStr, EnumString, EnumIter, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    Present,
    Late,
    Excused,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, AsRefStr, EnumString, EnumIter, Serialize, Deserialize, ToSchema)]
pub enum SessionType {
    Lecture,
    Lab,
    Tutorial,
}

impl AttendanceRecord {
    /// `None` when the stored status is not one of the known values.
    pub fn known_status(&self) -> Option<AttendanceStatus> {
        self.status.parse().ok()
    }
}

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::config::VerificationMode;
use crate::error::ApiError;
use crate::service::verification::{CodeRegistry, generate_code};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    #[schema(example = "CS101")]
    pub course_code: String,
    /// Anything other than a string of four digits is invalid
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "5281")]
    pub verification_code: Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeRequest {
    /// Course the code is issued for; required in bound verification mode
    #[schema(example = "CS101")]
    pub course_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeResponse {
    #[schema(example = "5281")]
    pub verification_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "CS101")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Check a verification code
#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification outcome", body = VerifyResponse,
         example = json!({ "valid": true })),
        (status = 400, description = "Malformed body", body = crate::api::ErrorBody)
    ),
    tag = "Verification"
)]
pub async fn verify_code(
    codes: web::Data<CodeRegistry>,
    payload: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let valid = match payload.verification_code.as_str() {
        Some(code) => codes.verify(&payload.course_code, code, Utc::now()).await,
        None => false,
    };

    tracing::debug!(course_code = %payload.course_code, valid, "Verification checked");
    Ok(HttpResponse::Ok().json(VerifyResponse { valid }))
}

/// Generate a 4-digit verification code
#[utoipa::path(
    post,
    path = "/api/generate-code",
    request_body(
        content = Option<GenerateCodeRequest>,
        description = "Optional; naming a course registers the code for it",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Fresh code", body = GenerateCodeResponse,
         example = json!({ "verificationCode": "5281" })),
        (status = 400, description = "courseCode missing in bound mode", body = crate::api::ErrorBody)
    ),
    tag = "Verification"
)]
pub async fn generate_verification_code(
    codes: web::Data<CodeRegistry>,
    payload: Option<web::Json<GenerateCodeRequest>>,
) -> Result<HttpResponse, ApiError> {
    let course_code = payload
        .and_then(|p| p.into_inner().course_code)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let response = match course_code {
        Some(course_code) => {
            let issued = codes.issue(&course_code, Utc::now()).await;
            GenerateCodeResponse {
                verification_code: issued.code,
                course_code: Some(issued.course_code),
                issued_at: Some(issued.issued_at),
                expires_at: Some(issued.expires_at),
            }
        }
        None if codes.mode() == VerificationMode::Bound => {
            return Err(ApiError::BadRequest(
                "courseCode is required to issue a verification code".to_string(),
            ));
        }
        None => GenerateCodeResponse {
            verification_code: generate_code(),
            course_code: None,
            issued_at: None,
            expires_at: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

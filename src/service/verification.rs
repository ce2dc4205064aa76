use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use rand::Rng;

use crate::config::VerificationMode;
use crate::model::verification::IssuedCode;

/// True iff `code` is exactly four ASCII digits.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Uniformly random code in `1000..=9999`.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

/// Codes issued per course, forgotten once their TTL passes.
///
/// Keyed by `(course_code, code)` so issuing a new code leaves earlier
/// ones for the same course live.
#[derive(Clone)]
pub struct CodeRegistry {
    mode: VerificationMode,
    ttl: Duration,
    issued: Cache<(String, String), IssuedCode>,
}

impl CodeRegistry {
    pub fn new(mode: VerificationMode, ttl: Duration) -> Self {
        Self {
            mode,
            ttl,
            issued: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn mode(&self) -> VerificationMode {
        self.mode
    }

    /// Generates a code for `course_code` and remembers it until it expires.
    pub async fn issue(&self, course_code: &str, now: DateTime<Utc>) -> IssuedCode {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::zero());
        let issued = IssuedCode {
            code: generate_code(),
            course_code: course_code.to_string(),
            issued_at: now,
            expires_at: now + ttl,
        };

        self.issued
            .insert((issued.course_code.clone(), issued.code.clone()), issued.clone())
            .await;
        tracing::info!(
            course_code = %issued.course_code,
            expires_at = %issued.expires_at,
            "Verification code issued"
        );
        issued
    }

    async fn is_live(&self, course_code: &str, code: &str, now: DateTime<Utc>) -> bool {
        self.issued
            .get(&(course_code.to_string(), code.to_string()))
            .await
            .is_some_and(|issued| issued.is_live(now))
    }

    /// Shape check, plus the issued-code lookup in bound mode.
    pub async fn verify(&self, course_code: &str, code: &str, now: DateTime<Utc>) -> bool {
        if !is_well_formed(code) {
            return false;
        }
        match self.mode {
            VerificationMode::Shape => true,
            VerificationMode::Bound => self.is_live(course_code, code, now).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_four_ascii_digits_are_well_formed() {
        assert!(is_well_formed("1234"));
        assert!(is_well_formed("0000"));
        assert!(!is_well_formed("12a4"));
        assert!(!is_well_formed("123"));
        assert!(!is_well_formed("12345"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("١٢٣٤"));
    }

    #[test]
    fn generated_codes_are_in_range() {
        for _ in 0..500 {
            let code = generate_code();
            assert!(is_well_formed(&code));
            let n: u32 = code.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[actix_web::test]
    async fn shape_mode_accepts_any_well_formed_code() {
        let registry = CodeRegistry::new(VerificationMode::Shape, Duration::from_secs(60));
        let now = Utc::now();
        assert!(registry.verify("CS101", "4821", now).await);
        assert!(!registry.verify("CS101", "48a1", now).await);
    }

    #[actix_web::test]
    async fn bound_mode_requires_a_live_code_for_the_course() {
        let registry = CodeRegistry::new(VerificationMode::Bound, Duration::from_secs(60));
        let now = Utc::now();
        let issued = registry.issue("CS101", now).await;

        assert!(registry.verify("CS101", &issued.code, now).await);
        assert!(!registry.verify("CS102", &issued.code, now).await);
        assert!(!registry.verify("CS101", &issued.code, issued.expires_at).await);
    }

    #[actix_web::test]
    async fn issuing_again_keeps_earlier_codes_live() {
        let registry = CodeRegistry::new(VerificationMode::Bound, Duration::from_secs(60));
        let now = Utc::now();
        let first = registry.issue("CS101", now).await;
        let _second = registry.issue("CS101", now).await;

        assert!(registry.verify("CS101", &first.code, now).await);
    }
}

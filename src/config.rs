use std::{env, fmt::Display, ops::RangeInclusive, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

const SECS_PER_YEAR: i64 = 365 * 24 * 60 * 60;

/// How `POST /verify` decides whether a code is acceptable.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VerificationMode {
    /// Any 4-digit code passes
    Shape,
    /// The code must have been issued for the course and not yet expired
    Bound,
}

impl FromStr for VerificationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "shape" => Ok(VerificationMode::Shape),
            "bound" => Ok(VerificationMode::Bound),
            other => Err(anyhow!("expected `shape` or `bound`, got `{}`", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub data_dir: PathBuf,
    pub log_dir: String,
    pub log_level: tracing::Level,

    pub duplicate_window_secs: i64,
    pub verification_mode: VerificationMode,
    pub code_ttl_secs: u64,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_api_per_min: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:3000".to_string(),
            api_prefix: "/api".to_string(),
            data_dir: PathBuf::from("data"),
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
            duplicate_window_secs: 300,
            verification_mode: VerificationMode::Shape,
            code_ttl_secs: 600,
            rate_submit_per_min: 120,
            rate_api_per_min: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: parse_or("LOG_LEVEL", defaults.log_level)?,

            duplicate_window_secs: parse_or("DUPLICATE_WINDOW_SECS", defaults.duplicate_window_secs)?,
            verification_mode: parse_or("VERIFICATION_MODE", defaults.verification_mode)?,
            code_ttl_secs: parse_or("CODE_TTL_SECS", defaults.code_ttl_secs)?,

            rate_submit_per_min: parse_or("RATE_SUBMIT_PER_MIN", defaults.rate_submit_per_min)?,
            rate_api_per_min: parse_or("RATE_API_PER_MIN", defaults.rate_api_per_min)?,
        }
        .validate()
    }

    /// Rejects window and TTL values the clock types cannot represent.
    pub fn validate(self) -> Result<Self> {
        in_range("DUPLICATE_WINDOW_SECS", self.duplicate_window_secs, 1..=SECS_PER_YEAR)?;
        in_range("CODE_TTL_SECS", self.code_ttl_secs, 1..=SECS_PER_YEAR as u64)?;
        Ok(self)
    }

    /// Defaults with the data files under `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn attendance_file(&self) -> PathBuf {
        self.data_dir.join("attendance.json")
    }

    pub fn courses_file(&self) -> PathBuf {
        self.data_dir.join("courses.json")
    }
}

/// Parses `key` when set, falls back to `default` when it is absent.
fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

fn in_range<T>(key: &str, value: T, range: RangeInclusive<T>) -> Result<T>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(anyhow!(
            "invalid value for {}: {} (expected {}..={})",
            key,
            value,
            range.start(),
            range.end()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_mode_parses_case_insensitively() {
        assert_eq!("Bound".parse::<VerificationMode>().unwrap(), VerificationMode::Bound);
        assert_eq!("shape".parse::<VerificationMode>().unwrap(), VerificationMode::Shape);
        assert!("strict".parse::<VerificationMode>().is_err());
    }

    #[test]
    fn data_files_live_under_data_dir() {
        let config = Config::with_data_dir("/tmp/attendance");
        assert_eq!(config.attendance_file(), PathBuf::from("/tmp/attendance/attendance.json"));
        assert_eq!(config.courses_file(), PathBuf::from("/tmp/attendance/courses.json"));
        assert_eq!(config.duplicate_window_secs, 300);
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_window_and_ttl_are_rejected() {
        let mut config = Config::default();
        config.duplicate_window_secs = i64::MAX;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.starts_with("invalid value for DUPLICATE_WINDOW_SECS"), "{err}");

        let mut config = Config::default();
        config.duplicate_window_secs = -5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.code_ttl_secs = u64::MAX;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.starts_with("invalid value for CODE_TTL_SECS"), "{err}");

        let mut config = Config::default();
        config.code_ttl_secs = 0;
        assert!(config.validate().is_err());
    }
}

//! Expiry-based license gate.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Locations searched when no license path is configured.
pub const DEFAULT_LICENSE_PATHS: &[&str] = &["license.json", "../license.json"];

/// Answers whether automation may run.
pub trait License: Send {
    fn is_valid(&self) -> bool;

    /// Whole days until expiry; negative once expired.
    fn days_remaining(&self) -> i64;

    fn holder(&self) -> Option<&str> {
        None
    }
}

/// Point-in-time view of a [`License`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LicenseStatus {
    pub valid: bool,
    pub days_remaining: i64,
    pub holder: Option<String>,
}

impl LicenseStatus {
    pub fn check(license: &dyn License) -> Self {
        Self {
            valid: license.is_valid(),
            days_remaining: license.days_remaining(),
            holder: license.holder().map(str::to_string),
        }
    }

    pub fn permits_running(&self) -> bool {
        self.valid && self.days_remaining >= 0
    }

    pub fn describe(&self) -> String {
        match (self.valid, self.days_remaining) {
            (false, _) => "invalid".to_string(),
            (true, days) if days < 0 => format!("expired {} day(s) ago", -days),
            (true, days) => format!("valid, {days} day(s) remaining"),
        }
    }
}

/// JSON license file: `{ "holder": "...", "expires": "YYYY-MM-DD" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFile {
    pub holder: String,
    pub expires: NaiveDate,
}

impl LicenseFile {
    pub fn new(holder: impl Into<String>, expires: NaiveDate) -> Self {
        Self {
            holder: holder.into(),
            expires,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let license: LicenseFile = serde_json::from_str(&content)?;
        debug!(
            "License for {} expires {} ({})",
            license.holder,
            license.expires,
            path.display()
        );
        Ok(license)
    }

    /// Load the first candidate that exists and parses.
    pub fn discover<P: AsRef<Path>>(candidates: &[P]) -> Result<(Self, PathBuf)> {
        let mut tried = Vec::new();
        for candidate in candidates {
            let path = candidate.as_ref();
            match Self::load(path) {
                Ok(license) => {
                    info!("Using license {}", path.display());
                    return Ok((license, path.to_path_buf()));
                }
                Err(e) => {
                    debug!("License candidate {} rejected: {}", path.display(), e);
                    tried.push(path.display().to_string());
                }
            }
        }
        Err(Error::LicenseInvalid(format!(
            "no usable license file (tried {})",
            tried.join(", ")
        )))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn days_remaining_on(&self, today: NaiveDate) -> i64 {
        (self.expires - today).num_days()
    }
}

impl License for LicenseFile {
    fn is_valid(&self) -> bool {
        !self.holder.trim().is_empty()
    }

    fn days_remaining(&self) -> i64 {
        self.days_remaining_on(Local::now().date_naive())
    }

    fn holder(&self) -> Option<&str> {
        Some(self.holder.as_str())
    }
}

/// Fixed answers; also stands in when no license file could be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticLicense {
    pub valid: bool,
    pub days_remaining: i64,
}

impl StaticLicense {
    pub fn new(valid: bool, days_remaining: i64) -> Self {
        Self {
            valid,
            days_remaining,
        }
    }

    pub fn missing() -> Self {
        Self::new(false, 0)
    }
}

impl License for StaticLicense {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn days_remaining(&self) -> i64 {
        self.days_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_remaining_counts_whole_days() {
        let license = LicenseFile::new("player", date(2026, 3, 10));
        assert_eq!(license.days_remaining_on(date(2026, 3, 1)), 9);
        assert_eq!(license.days_remaining_on(date(2026, 3, 10)), 0);
        assert_eq!(license.days_remaining_on(date(2026, 3, 12)), -2);
    }

    #[test]
    fn status_gate() {
        assert!(LicenseStatus::check(&StaticLicense::new(true, 0)).permits_running());
        assert!(!LicenseStatus::check(&StaticLicense::new(true, -1)).permits_running());
        assert!(!LicenseStatus::check(&StaticLicense::new(false, 30)).permits_running());
        assert!(!LicenseStatus::check(&StaticLicense::missing()).permits_running());
    }

    #[test]
    fn describe_states() {
        assert_eq!(
            LicenseStatus::check(&StaticLicense::new(true, 12)).describe(),
            "valid, 12 day(s) remaining"
        );
        assert_eq!(
            LicenseStatus::check(&StaticLicense::new(true, -3)).describe(),
            "expired 3 day(s) ago"
        );
        assert_eq!(LicenseStatus::check(&StaticLicense::missing()).describe(), "invalid");
    }

    #[test]
    fn file_round_trip_and_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("license.json");
        let license = LicenseFile::new("player", date(2027, 1, 31));

        license.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"expires\": \"2027-01-31\""));
        assert_eq!(LicenseFile::load(&path).unwrap(), license);
    }

    #[test]
    fn discover_skips_missing_and_broken_candidates() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        let good = dir.path().join("good.json");
        fs::write(&broken, "{ not json").unwrap();
        LicenseFile::new("player", date(2030, 1, 1)).save(&good).unwrap();

        let candidates = [dir.path().join("absent.json"), broken, good.clone()];
        let (license, path) = LicenseFile::discover(&candidates).unwrap();
        assert_eq!(license.holder, "player");
        assert_eq!(path, good);
    }

    #[test]
    fn discover_without_candidates_is_license_invalid() {
        let dir = tempdir().unwrap();
        let err = LicenseFile::discover(&[dir.path().join("none.json")]).unwrap_err();
        assert!(matches!(err, Error::LicenseInvalid(_)));
    }

    #[test]
    fn blank_holder_is_invalid() {
        assert!(!LicenseFile::new("  ", date(2030, 1, 1)).is_valid());
    }
}

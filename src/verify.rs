//! Catalog Verification Module
//!
//! Checks every reserve record for data that would render badly or mislead
//! visitors, and optionally probes the guide endpoint with one question to
//! confirm the configured key and model answer.
//!
//! Run this after editing a catalog file, before shipping it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::guide::prompt;
use crate::guide::{GuideBackend, GuideRequest};
use crate::model::Reserve;

/// Rough bounding box of the Kingdom: (min, max) latitude and longitude.
pub const SAUDI_LATITUDE: (f64, f64) = (16.0, 32.5);
pub const SAUDI_LONGITUDE: (f64, f64) = (34.5, 55.7);

pub const PROBE_QUESTION: &str = "ما هي أفضل محمية للتخييم؟";

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub reserve_results: Vec<ReserveVerification>,
    pub guide_probe: Option<GuideProbe>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub reserves_total: usize,
    pub reserves_clean: usize,
    pub reserves_with_warnings: usize,
    pub reserves_failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveVerification {
    pub id: String,
    pub name: String,
    pub status: VerificationStatus,
    /// Problems that break a screen: bad coordinates, rating, or contact.
    pub errors: Vec<String>,
    /// Cosmetic problems: inconsistent stats, empty gallery.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideProbe {
    pub status: VerificationStatus,
    pub reply_chars: usize,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Reserve Checks
// ============================================================================

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    (min..=max).contains(&value)
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

pub fn verify_reserve(reserve: &Reserve) -> ReserveVerification {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !in_range(reserve.latitude(), SAUDI_LATITUDE) || !in_range(reserve.longitude(), SAUDI_LONGITUDE) {
        errors.push(format!(
            "coordinates ({}, {}) fall outside the Kingdom",
            reserve.latitude(),
            reserve.longitude()
        ));
    }

    if !in_range(reserve.stats.rating, (0.0, 5.0)) {
        errors.push(format!("rating {} is outside 0-5", reserve.stats.rating));
    }

    if reserve.contact.phone.trim().is_empty() {
        errors.push("contact phone is empty".to_string());
    }
    if reserve.contact.email.trim().is_empty() {
        errors.push("contact email is empty".to_string());
    }

    if !is_http_url(&reserve.image_url) {
        errors.push(format!("image url '{}' is not http(s)", reserve.image_url));
    }

    let expected_yearly = u64::from(reserve.stats.monthly_visitors) * 12;
    if u64::from(reserve.stats.yearly_visitors) != expected_yearly {
        warnings.push(format!(
            "yearly visitors {} != monthly {} x 12",
            reserve.stats.yearly_visitors, reserve.stats.monthly_visitors
        ));
    }

    if reserve.gallery.is_empty() {
        warnings.push("gallery is empty".to_string());
    }
    for url in reserve.gallery.iter().filter(|u| !is_http_url(u)) {
        warnings.push(format!("gallery url '{}' is not http(s)", url));
    }

    let status = if !errors.is_empty() {
        VerificationStatus::Failed
    } else if !warnings.is_empty() {
        VerificationStatus::PartialSuccess
    } else {
        VerificationStatus::Success
    };

    ReserveVerification {
        id: reserve.id.clone(),
        name: reserve.name.clone(),
        status,
        errors,
        warnings,
    }
}

// ============================================================================
// Guide Probe
// ============================================================================

/// Sends one fixed question through `backend`. An empty reply counts as
/// partial: the endpoint is reachable but said nothing.
pub fn probe_guide(backend: &dyn GuideBackend, catalog: &Catalog) -> GuideProbe {
    let request = GuideRequest {
        system_instruction: prompt::system_instruction(catalog),
        prompt: prompt::compose_prompt(PROBE_QUESTION, None),
        context: None,
    };

    match backend.generate(&request) {
        Ok(reply) => GuideProbe {
            status: VerificationStatus::Success,
            reply_chars: reply.chars().count(),
            error_message: None,
        },
        Err(crate::model::GuideError::EmptyResponse) => GuideProbe {
            status: VerificationStatus::PartialSuccess,
            reply_chars: 0,
            error_message: Some("endpoint returned no text".to_string()),
        },
        Err(e) => GuideProbe {
            status: VerificationStatus::Failed,
            reply_chars: 0,
            error_message: Some(e.to_string()),
        },
    }
}

// ============================================================================
// Full Verification Runner
// ============================================================================

/// Checks every reserve, and probes `backend` when one is given.
pub fn run_verification(catalog: &Catalog, backend: Option<&dyn GuideBackend>) -> VerificationReport {
    let reserve_results: Vec<ReserveVerification> = catalog.reserves().iter().map(verify_reserve).collect();

    let count = |status: VerificationStatus| reserve_results.iter().filter(|r| r.status == status).count();
    let summary = VerificationSummary {
        reserves_total: reserve_results.len(),
        reserves_clean: count(VerificationStatus::Success),
        reserves_with_warnings: count(VerificationStatus::PartialSuccess),
        reserves_failed: count(VerificationStatus::Failed),
    };

    VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        guide_probe: backend.map(|b| probe_guide(b, catalog)),
        reserve_results,
        summary,
    }
}

impl VerificationReport {
    /// Any failed reserve or failed probe.
    pub fn has_failures(&self) -> bool {
        self.summary.reserves_failed > 0
            || self
                .guide_probe
                .as_ref()
                .is_some_and(|p| p.status == VerificationStatus::Failed)
    }
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for result in &report.reserve_results {
        let mark = match result.status {
            VerificationStatus::Success => "✓",
            VerificationStatus::PartialSuccess => "⚠",
            VerificationStatus::Failed => "✗",
        };
        println!("  {} [{}] {}", mark, result.id, result.name);
        for e in &result.errors {
            println!("      error: {}", e);
        }
        for w in &result.warnings {
            println!("      warning: {}", w);
        }
    }
    println!();

    println!(
        "Reserves:   {}/{} clean  ({} with warnings, {} failed)",
        report.summary.reserves_clean,
        report.summary.reserves_total,
        report.summary.reserves_with_warnings,
        report.summary.reserves_failed
    );

    match &report.guide_probe {
        Some(probe) => match probe.status {
            VerificationStatus::Success => println!("Guide:      ✓ OK ({} chars)", probe.reply_chars),
            _ => println!(
                "Guide:      ✗ {}",
                probe.error_message.as_deref().unwrap_or("Unknown")
            ),
        },
        None => println!("Guide:      not probed"),
    }
    println!("═══════════════════════════════════════════════════════════");
}

// ============================================================================
// Tests
// ============================================================================

//! Risk tiers derived from the class-1 probability.

use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of the `Medium` tier.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.30;

/// Lower bound (inclusive) of the `High` tier.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Categorical risk tier.
///
/// - `Low`: `p < 0.30`
/// - `Medium`: `0.30 <= p < 0.70`
/// - `High`: `p >= 0.70`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_probability(p: f64) -> Self {
        if p < MEDIUM_RISK_THRESHOLD {
            RiskLevel::Low
        } else if p < HIGH_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Static action items for this tier. No personalization beyond the tier itself.
    pub fn recommendations(&self) -> [&'static str; 4] {
        match self {
            RiskLevel::High => [
                "Consult a cardiologist immediately",
                "Consider stress tests and echocardiograms",
                "Review lifestyle factors (diet, exercise, smoking)",
                "Monitor blood pressure and cholesterol regularly",
            ],
            RiskLevel::Medium => [
                "Schedule a checkup with your doctor",
                "Consider lifestyle modifications",
                "Monitor symptoms and risk factors",
                "Regular exercise and healthy diet",
            ],
            RiskLevel::Low => [
                "Maintain healthy lifestyle habits",
                "Regular checkups as recommended by your doctor",
                "Continue current exercise regimen",
                "Monitor risk factors periodically",
            ],
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// Hotspot risk threshold: scores at or above this are `High`.
pub const RISK_HIGH: f64 = 8.0;
/// Hotspot risk threshold: scores at or above this (and below high) are `Medium`.
pub const RISK_MEDIUM: f64 = 4.0;

/// Urgency thresholds for the triage queue badges.
pub const URGENCY_CRITICAL: f64 = 80.0;
pub const URGENCY_HIGH: f64 = 50.0;
pub const URGENCY_MED: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    Low,
    Med,
    High,
    Critical,
}

/// Classify a server-computed hotspot risk score into a display tier.
///
/// Total over all inputs: scores are untrusted external data, so NaN and
/// negative values resolve to `Low` rather than erroring. The same score
/// must classify identically on a list row and a map pin, so this takes
/// nothing but the score.
pub fn risk_tier(score: f64) -> RiskTier {
    if score >= RISK_HIGH {
        RiskTier::High
    } else if score >= RISK_MEDIUM {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Classify a server-computed urgency score into a queue badge tier.
/// Same totality policy as [`risk_tier`].
pub fn urgency_tier(score: f64) -> UrgencyTier {
    if score >= URGENCY_CRITICAL {
        UrgencyTier::Critical
    } else if score >= URGENCY_HIGH {
        UrgencyTier::High
    } else if score >= URGENCY_MED {
        UrgencyTier::Med
    } else {
        UrgencyTier::Low
    }
}

/// RGBA fill/border pair for a map marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerColor {
    pub fill: &'static str,
    pub border: &'static str,
}

impl RiskTier {
    /// Marker diameter in display points. Monotone in tier; display-only,
    /// not a contract with any persisted data.
    pub fn marker_size(self) -> u32 {
        match self {
            RiskTier::Low => 20,
            RiskTier::Medium => 32,
            RiskTier::High => 44,
        }
    }

    pub fn marker_color(self) -> MarkerColor {
        match self {
            RiskTier::Low => MarkerColor {
                fill: "rgba(59, 130, 246, 0.4)",
                border: "rgba(37, 99, 235, 0.9)",
            },
            RiskTier::Medium => MarkerColor {
                fill: "rgba(251, 146, 60, 0.4)",
                border: "rgba(234, 88, 12, 0.9)",
            },
            RiskTier::High => MarkerColor {
                fill: "rgba(239, 68, 68, 0.4)",
                border: "rgba(220, 38, 38, 0.9)",
            },
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

impl UrgencyTier {
    /// Badge label shown on queue rows.
    pub fn label(self) -> &'static str {
        match self {
            UrgencyTier::Low => "LOW",
            UrgencyTier::Med => "MED",
            UrgencyTier::High => "HIGH",
            UrgencyTier::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

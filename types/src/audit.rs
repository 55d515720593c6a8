//! Identity audit domain types.

use serde::{Deserialize, Serialize};

/// Which kind of personal identifier an audit targets.
///
/// Selects both the step script shown while scanning and the finding catalog
/// published when the run resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    #[default]
    Email,
    Phone,
}

impl IdentifierType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            IdentifierType::Email => "email",
            IdentifierType::Phone => "phone",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            IdentifierType::Email => "Email",
            IdentifierType::Phone => "Phone",
        }
    }

    /// Example value shown in an empty input field.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            IdentifierType::Email => "email@domain.com",
            IdentifierType::Phone => "+1 000 000 0000",
        }
    }

    /// Parse an identifier type from user or config input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" | "mail" | "e-mail" => Some(IdentifierType::Email),
            "phone" | "sms" | "tel" | "mobile" => Some(IdentifierType::Phone),
            _ => None,
        }
    }

    #[must_use]
    pub const fn all() -> &'static [IdentifierType] {
        &[IdentifierType::Email, IdentifierType::Phone]
    }
}

impl std::fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Risk {
    High,
    Medium,
    Low,
}

impl Risk {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Risk::High => "High",
            Risk::Medium => "Medium",
            Risk::Low => "Low",
        }
    }

    /// Uppercase badge label, e.g. `HIGH RISK`.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Risk::High => "HIGH RISK",
            Risk::Medium => "MEDIUM RISK",
            Risk::Low => "LOW RISK",
        }
    }
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Privacy,
    Security,
    Network,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Privacy => "Privacy",
            Category::Security => "Security",
            Category::Network => "Network",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single simulated exposure reported by an audit.
///
/// Findings are static catalog records: every field borrows from constant
/// data, so a resolved run is a cheap copy of its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub id: u32,
    /// Short heading, e.g. "Carrier Vulnerability".
    pub label: &'static str,
    /// Headline describing what was "found".
    pub finding: &'static str,
    pub risk: Risk,
    pub category: Category,
    pub recommendation: &'static str,
}

impl Finding {
    /// The finding's descriptive text.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.finding
    }
}

/// Lifecycle phase of the active audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuditPhase {
    #[default]
    Idle,
    Scanning,
    Results,
}

impl AuditPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditPhase::Idle => "idle",
            AuditPhase::Scanning => "scanning",
            AuditPhase::Results => "results",
        }
    }
}

impl std::fmt::Display for AuditPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation number of an audit run.
///
/// Every accepted start allocates a fresh id; ticks are tagged with the id of
/// the run that scheduled them so ticks belonging to an abandoned run can be
/// recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RunId(u64);

impl RunId {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

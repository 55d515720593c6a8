//! Static dashboard copy: overview cards, recent events and learn modules.
//!
//! None of this is computed. The overview shows a fixed device posture and
//! the knowledge tab a fixed reading list.

use shieldguard_types::Risk;

/// Headline privacy score shown on the overview, in percent.
pub const PRIVACY_SCORE: u16 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCard {
    pub title: &'static str,
    pub status: &'static str,
    pub detail: &'static str,
    /// Highlighted as needing attention.
    pub alert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityEvent {
    pub when: &'static str,
    pub event: &'static str,
    pub severity: Risk,
    pub location: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Essential,
    Advanced,
    Expert,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Essential => "Essential",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    /// Advanced material is badged differently from introductory material.
    #[must_use]
    pub const fn is_advanced(self) -> bool {
        matches!(self, Difficulty::Advanced | Difficulty::Expert)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnCard {
    pub title: &'static str,
    pub summary: &'static str,
    pub difficulty: Difficulty,
    pub read_time: &'static str,
}

pub const STATUS_CARDS: &[StatusCard] = &[
    StatusCard {
        title: "Biometric Integrity",
        status: "Verified",
        detail: "FaceID & TouchID configurations are optimal.",
        alert: false,
    },
    StatusCard {
        title: "Encryption Level",
        status: "AES-256 Active",
        detail: "Device storage and backup data are fully encrypted.",
        alert: false,
    },
    StatusCard {
        title: "Proximity Guard",
        status: "Exposed",
        detail: "Unrecognized NFC attempts detected in last 24h.",
        alert: true,
    },
    StatusCard {
        title: "Kernel Security",
        status: "Hardened",
        detail: "System integrity protection (SIP) is enabled.",
        alert: false,
    },
];

pub const RECENT_EVENTS: &[SecurityEvent] = &[
    SecurityEvent {
        when: "2 minutes ago",
        event: "Unauthorized NFC Connection Attempt",
        severity: Risk::Medium,
        location: "Nearby Proximity",
    },
    SecurityEvent {
        when: "1 hour ago",
        event: "App 'TrackerX' requested Location",
        severity: Risk::Low,
        location: "Internal",
    },
    SecurityEvent {
        when: "3 hours ago",
        event: "SIM Card Status Change Detected",
        severity: Risk::High,
        location: "Network Level",
    },
];

/// Areas the identity audit claims to cover.
pub const AUDIT_SCOPE: &[&str] = &[
    "Dark Web Monitoring",
    "OSINT Profile Mapping",
    "Carrier Risk Evaluation",
];

pub const LEARN_CARDS: &[LearnCard] = &[
    LearnCard {
        title: "SIM Swapping",
        summary: "Learn how attackers hijack your phone number by tricking carriers, and how to set up a 'Port Freeze'.",
        difficulty: Difficulty::Advanced,
        read_time: "5 min read",
    },
    LearnCard {
        title: "NFC Sniffing",
        summary: "Proximity attacks use NFC to steal contact data or payment tokens. Use a signal-blocking wallet.",
        difficulty: Difficulty::Intermediate,
        read_time: "3 min read",
    },
    LearnCard {
        title: "Zero-Knowledge MFA",
        summary: "Why SMS 2FA is vulnerable and how to move to hardware security keys or authenticator apps.",
        difficulty: Difficulty::Essential,
        read_time: "4 min read",
    },
    LearnCard {
        title: "OSINT & Privacy",
        summary: "How much of your life is public? Limit social media footprints that lead to identity theft.",
        difficulty: Difficulty::Beginner,
        read_time: "6 min read",
    },
    LearnCard {
        title: "Bluebugging Explained",
        summary: "Bluetooth-based proximity exploits that can take control of older device firmware.",
        difficulty: Difficulty::Expert,
        read_time: "7 min read",
    },
    LearnCard {
        title: "Encryption 101",
        summary: "The difference between E2EE and 'Encryption at Rest' for your messages and files.",
        difficulty: Difficulty::Essential,
        read_time: "5 min read",
    },
];

pub const ONE_METER_TITLE: &str = "The \"One Meter\" Risk";

pub const ONE_METER_BODY: &str = "Most modern \"proximity attacks\" rely on physical closeness (NFC, Bluetooth, or Rogue Wi-Fi). To protect yourself from someone placing their phone near yours to \"hack\" it, ensure that NFC is disabled when not in use, and always use Bluetooth 'Hidden' mode.";

pub const ONE_METER_TAGS: &[&str] = &["#ProximityDefense", "#PrivacyFirst", "#MobileHardening"];

/// Shown under an audit report.
pub const WHY_IT_MATTERS: &str = "Attackers don't always \"hack\" accounts directly; they \"exploit\" identities. By knowing your {kind}, a threat actor can use OSINT to craft social engineering scripts or perform SIM swap fraud. Fixing these vulnerabilities now hardens your digital perimeter.";

/// Shown while the identity audit is idle.
pub const STANDBY_TEXT: &str = "Provide an identifier to begin a non-intrusive security audit. We will simulate how an attacker gathers intelligence using your {kind}.";

/// Shown above the advisor transcript.
pub const ADVISOR_NOTICE: &str =
    "This AI will not provide instructions for illegal activities or hacking others.";

/// Fill the `{kind}` slot of a template with the identifier type noun.
#[must_use]
pub fn with_kind(template: &str, kind: &str) -> String {
    template.replace("{kind}", kind)
}

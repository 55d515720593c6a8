//! Step scripts and finding catalogs for the simulated identity audit.
//!
//! Everything here is literal data. The audit never inspects the identifier
//! it was given: the script and the catalog are chosen by [`IdentifierType`]
//! alone, so every run of the same type looks exactly the same.

use shieldguard_types::{Category, Finding, IdentifierType, Risk};

const PHONE_SCAN_STEPS: &[&str] = &[
    "Querying Home Location Register (HLR) metadata...",
    "Checking carrier port-out protection status...",
    "Scanning SS7 network exposure indices...",
    "Analyzing proximity sniffing vulnerability (NFC/BT)...",
    "Cross-referencing known 'SIM-Swap' target databases...",
];

const EMAIL_SCAN_STEPS: &[&str] = &[
    "Searching HaveIBeenPwned API for credential leaks...",
    "Analyzing dark web dump records for domain matches...",
    "Checking associated social media metadata...",
    "Verifying DMARC/SPF sender reputation status...",
    "Scanning for linked identity-theft attack vectors...",
];

const PHONE_FINDINGS: &[Finding] = &[
    Finding {
        id: 1,
        label: "Carrier Vulnerability",
        finding: "Carrier 'SIM-Port' API Exposure Detected",
        risk: Risk::High,
        category: Category::Network,
        recommendation: "Request your carrier to add a 'Port Freeze' and a verbal password requirement for all account changes.",
    },
    Finding {
        id: 2,
        label: "SS7 Network Risk",
        finding: "Legacy Roaming Protocol Active",
        risk: Risk::Medium,
        category: Category::Security,
        recommendation: "Disable legacy 2G/3G connectivity in phone settings to prevent IMSI catching and SS7 intercept attacks.",
    },
    Finding {
        id: 3,
        label: "Proximity Awareness",
        finding: "NFC Handshake History Exposed",
        risk: Risk::Low,
        category: Category::Privacy,
        recommendation: "Turn off NFC when in high-density public areas to avoid unauthorized wallet token sniffing.",
    },
];

const EMAIL_FINDINGS: &[Finding] = &[
    Finding {
        id: 1,
        label: "Credential Exposure",
        finding: "Leaked in 'Canva' and 'Dropbox' Breaches",
        risk: Risk::High,
        category: Category::Security,
        recommendation: "Immediately rotate your email password and use a unique, complex key. Enable TOTP-based 2FA.",
    },
    Finding {
        id: 2,
        label: "Digital Footprint",
        finding: "4 Associated Social Media Profiles Found",
        risk: Risk::Medium,
        category: Category::Privacy,
        recommendation: "Update privacy settings on LinkedIn and Instagram to hide your email address from public search engines.",
    },
    Finding {
        id: 3,
        label: "Phishing Sensitivity",
        finding: "Target of Recent Financial Malspam",
        risk: Risk::Medium,
        category: Category::Security,
        recommendation: "Be cautious of 'Password Reset' emails. Never click links directly; always navigate to the official site.",
    },
];

/// Status lines shown one per tick while a run of `kind` is scanning.
#[must_use]
pub const fn scan_steps(kind: IdentifierType) -> &'static [&'static str] {
    match kind {
        IdentifierType::Phone => PHONE_SCAN_STEPS,
        IdentifierType::Email => EMAIL_SCAN_STEPS,
    }
}

/// Findings published when a run of `kind` resolves.
#[must_use]
pub const fn findings_for(kind: IdentifierType) -> &'static [Finding] {
    match kind {
        IdentifierType::Phone => PHONE_FINDINGS,
        IdentifierType::Email => EMAIL_FINDINGS,
    }
}

//! Core engine for ShieldGuard: audit state machine, advisor session and the
//! dashboard shell state.
//!
//! This crate has no terminal dependencies. Rendering and key handling live
//! in `shieldguard-tui`.

mod advisor;
mod app;
mod audit;
mod config;
mod operation;
mod script;
mod state;
mod ticker;

pub use advisor::{AdvisorSession, EMPTY_ADVICE_PLACEHOLDER, GREETING};
pub use app::content;
pub use app::{App, LineInput, Tab};
pub use audit::{AuditConfig, AuditEngine, AuditEvent, DEFAULT_TICK_INTERVAL};
pub use config::{
    API_KEY_ENV_VARS, AdvisorSection, ApiKeys, AuditSection, ConfigError, ShieldConfig, UiSection,
    config_path, expand_env_vars, expand_env_vars_with,
};
pub use script::{findings_for, scan_steps};
pub use state::{AuditEdge, AuditState};
pub use ticker::{MIN_TICK_PERIOD, ManualTicker, Ticker, TokioTicker};

pub use shieldguard_providers::{self, AdvisoryService, FALLBACK_ADVICE, GeminiAdvisor, GeminiConfig};
pub use shieldguard_types::{
    self, AuditPhase, Category, ChatMessage, ChatRole, Finding, IdentifierType, Risk, RunId,
    UiOptions,
};

//! Dashboard shell state.
//!
//! [`App`] is everything the renderer reads and the key handler mutates: the
//! active tab, both text inputs, the audit engine and the advisor session.
//! The engine and the session never see each other.

pub mod content;
mod line_input;


pub use line_input::LineInput;

use shieldguard_providers::{AdvisoryService, GeminiAdvisor};
use shieldguard_types::{AuditPhase, IdentifierType, UiOptions};

use crate::advisor::AdvisorSession;
use crate::audit::AuditEngine;
use crate::config::ShieldConfig;
use crate::ticker::{Ticker, TokioTicker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    IdentityAudit,
    Advisor,
    Learn,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::IdentityAudit, Tab::Advisor, Tab::Learn];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::IdentityAudit => "Identity Audit",
            Tab::Advisor => "AI Advisor",
            Tab::Learn => "Knowledge",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::IdentityAudit => 1,
            Tab::Advisor => 2,
            Tab::Learn => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Tabs with a text prompt that consumes typed characters.
    #[must_use]
    pub const fn has_text_input(self) -> bool {
        matches!(self, Tab::IdentityAudit | Tab::Advisor)
    }
}

#[derive(Debug)]
pub struct App<T: Ticker = TokioTicker, S: AdvisoryService = GeminiAdvisor> {
    tab: Tab,
    audit: AuditEngine<T>,
    audit_input: LineInput,
    advisor: AdvisorSession<S>,
    chat_input: LineInput,
    ui_options: UiOptions,
    frame: usize,
    should_quit: bool,
}

impl App {
    /// Build the production shell from loaded configuration.
    #[must_use]
    pub fn new(config: &ShieldConfig) -> Self {
        let audit = AuditEngine::with_tokio(config.audit_config());
        let advisor = AdvisorSession::new(GeminiAdvisor::new(config.gemini_config()));
        tracing::info!(
            tick = ?audit.config().tick_interval,
            has_api_key = advisor.service().has_api_key(),
            "ShieldGuard started"
        );
        Self::with_parts(audit, advisor, config.ui_options())
    }
}

impl<T: Ticker, S: AdvisoryService> App<T, S> {
    #[must_use]
    pub fn with_parts(
        audit: AuditEngine<T>,
        advisor: AdvisorSession<S>,
        ui_options: UiOptions,
    ) -> Self {
        Self {
            tab: Tab::default(),
            audit,
            audit_input: LineInput::default(),
            advisor,
            chat_input: LineInput::default(),
            ui_options,
            frame: 0,
            should_quit: false,
        }
    }

    /// Advance one frame: apply fired audit ticks and collect advisor answers.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.audit.poll();
        self.advisor.poll();
    }

    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    /// Overview call to action: jump to the identity audit.
    pub fn open_audit(&mut self) {
        self.tab = Tab::IdentityAudit;
    }

    #[must_use]
    pub fn audit(&self) -> &AuditEngine<T> {
        &self.audit
    }

    pub fn audit_mut(&mut self) -> &mut AuditEngine<T> {
        &mut self.audit
    }

    #[must_use]
    pub fn audit_input(&self) -> &LineInput {
        &self.audit_input
    }

    pub fn audit_input_mut(&mut self) -> &mut LineInput {
        &mut self.audit_input
    }

    #[must_use]
    pub fn identifier_type(&self) -> IdentifierType {
        self.audit.identifier_type()
    }

    pub fn select_identifier_type(&mut self, kind: IdentifierType) {
        self.audit.set_identifier_type(kind);
    }

    /// Start is offered only when not scanning and the identifier is not blank.
    #[must_use]
    pub fn can_start_audit(&self) -> bool {
        self.audit.phase() != AuditPhase::Scanning && !self.audit_input.is_blank()
    }

    pub fn start_audit(&mut self) -> bool {
        if self.audit.phase() == AuditPhase::Scanning {
            return false;
        }
        let kind = self.audit.identifier_type();
        self.audit.start_audit(self.audit_input.text(), kind)
    }

    /// "New scan": back to standby, keeping the typed identifier.
    pub fn reset_audit(&mut self) -> bool {
        self.audit.reset()
    }

    #[must_use]
    pub fn advisor(&self) -> &AdvisorSession<S> {
        &self.advisor
    }

    pub fn advisor_mut(&mut self) -> &mut AdvisorSession<S> {
        &mut self.advisor
    }

    #[must_use]
    pub fn chat_input(&self) -> &LineInput {
        &self.chat_input
    }

    pub fn chat_input_mut(&mut self) -> &mut LineInput {
        &mut self.chat_input
    }

    /// Send the chat prompt. The input is cleared only when the session
    /// accepted it.
    pub fn submit_chat(&mut self) -> bool {
        if self.advisor.submit(self.chat_input.text()) {
            self.chat_input.clear();
            true
        } else {
            false
        }
    }

    /// The text input that typed characters go to on the current tab.
    pub fn active_input_mut(&mut self) -> Option<&mut LineInput> {
        match self.tab {
            Tab::IdentityAudit => Some(&mut self.audit_input),
            Tab::Advisor => Some(&mut self.chat_input),
            Tab::Overview | Tab::Learn => None,
        }
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    /// Frames rendered so far; drives spinners.
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

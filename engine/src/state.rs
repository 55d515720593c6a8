//! Audit state machine types.

use shieldguard_types::{AuditPhase, Finding, RunId};

/// State of the single audit run.
///
/// Transitions: Idle -> Scanning -> Results -> Idle, with Scanning/Results
/// able to restart into a fresh Scanning and any state able to fall back to
/// Idle when the identifier type changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuditState {
    #[default]
    Idle,
    Scanning {
        run: RunId,
        /// Index of the next script line to show.
        step_index: usize,
        /// Line shown by the most recent tick; `None` until the first tick.
        current_step: Option<&'static str>,
    },
    Results {
        run: RunId,
        findings: Vec<Finding>,
    },
}

impl AuditState {
    #[must_use]
    pub const fn phase(&self) -> AuditPhase {
        match self {
            AuditState::Idle => AuditPhase::Idle,
            AuditState::Scanning { .. } => AuditPhase::Scanning,
            AuditState::Results { .. } => AuditPhase::Results,
        }
    }

    /// Run that owns this state, if any.
    #[must_use]
    pub const fn run(&self) -> Option<RunId> {
        match self {
            AuditState::Idle => None,
            AuditState::Scanning { run, .. } | AuditState::Results { run, .. } => Some(*run),
        }
    }

    #[must_use]
    pub const fn current_step(&self) -> Option<&'static str> {
        match self {
            AuditState::Scanning { current_step, .. } => *current_step,
            _ => None,
        }
    }

    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        match self {
            AuditState::Results { findings, .. } => findings,
            _ => &[],
        }
    }
}

/// Named edges of the audit transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEdge {
    StartScan,
    /// Start requested while a run already exists; the old run is discarded.
    Restart,
    AdvanceStep,
    Resolve,
    Reset,
    SwitchIdentifier,
}

impl AuditEdge {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditEdge::StartScan => "start_scan",
            AuditEdge::Restart => "restart",
            AuditEdge::AdvanceStep => "advance_step",
            AuditEdge::Resolve => "resolve",
            AuditEdge::Reset => "reset",
            AuditEdge::SwitchIdentifier => "switch_identifier",
        }
    }
}

/// What the engine must do to its ticker after applying a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickerEffect {
    None,
    Start(RunId),
    /// Stop the running schedule, then start a new one.
    Restart(RunId),
    Stop,
}

/// External stimulus fed to the pure transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuditInput {
    Start { run: RunId },
    Tick { run: RunId },
    Reset,
    SwitchIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) next: AuditState,
    pub(crate) edge: AuditEdge,
    pub(crate) effect: TickerEffect,
}

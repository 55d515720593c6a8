//! Audit simulation engine.
//!
//! [`AuditEngine`] owns the single audit run. Callers request transitions
//! (`start_audit`, `reset`, `set_identifier_type`) and feed it ticks, either
//! directly through [`AuditEngine::tick`] or by calling [`AuditEngine::poll`]
//! to drain whatever the injected [`Ticker`] fired since the last frame.
//!
//! Every state change goes through a single apply step, which checks the
//! edge against the transition graph, runs the ticker side effect, swaps the
//! state and notifies subscribers.

use std::panic::Location;
use std::time::Duration;

use tokio::sync::mpsc;

use shieldguard_types::{AuditPhase, Finding, IdentifierType, NonEmptyString, RunId};

use crate::operation::{is_legal_transition, transition};
use crate::state::{AuditEdge, AuditInput, AuditState, TickerEffect, Transition};
use crate::ticker::{MIN_TICK_PERIOD, Ticker, TokioTicker};

/// Tick period used when no configuration overrides it.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditConfig {
    /// Time between scan steps.
    pub tick_interval: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl AuditConfig {
    #[must_use]
    pub fn with_tick_interval(interval: Duration) -> Self {
        Self {
            tick_interval: interval.max(MIN_TICK_PERIOD),
        }
    }
}

/// Observable change emitted after a transition is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// Phase changed, or a run was replaced by a fresh one (`from == to`).
    PhaseChanged { from: AuditPhase, to: AuditPhase },
    /// A scan step became current. `index` is zero-based.
    StepAdvanced { index: usize, text: &'static str },
    FindingsPublished { count: usize },
}

#[derive(Debug)]
pub struct AuditEngine<T: Ticker = TokioTicker> {
    config: AuditConfig,
    ticker: T,
    identifier: String,
    identifier_type: IdentifierType,
    state: AuditState,
    last_run: RunId,
    subscribers: Vec<mpsc::UnboundedSender<AuditEvent>>,
}

impl AuditEngine<TokioTicker> {
    #[must_use]
    pub fn with_tokio(config: AuditConfig) -> Self {
        Self::new(config, TokioTicker::new())
    }
}

impl<T: Ticker> AuditEngine<T> {
    #[must_use]
    pub fn new(config: AuditConfig, ticker: T) -> Self {
        Self {
            config,
            ticker,
            identifier: String::new(),
            identifier_type: IdentifierType::default(),
            state: AuditState::Idle,
            last_run: RunId::default(),
            subscribers: Vec::new(),
        }
    }

    /// Begin a new run for `identifier`.
    ///
    /// A blank identifier is ignored and `false` is returned; nothing changes
    /// and no ticker is scheduled. Otherwise any existing run is discarded
    /// (its ticker stopped first) and a fresh run enters `Scanning`.
    pub fn start_audit(&mut self, identifier: &str, kind: IdentifierType) -> bool {
        let Ok(identifier) = NonEmptyString::new(identifier) else {
            tracing::debug!("Ignoring audit start with blank identifier");
            return false;
        };

        let run = self.last_run.next();
        self.last_run = run;
        self.identifier = identifier.into_inner();
        self.identifier_type = kind;

        tracing::info!(%run, kind = kind.as_str(), "Audit started");
        self.apply(AuditInput::Start { run })
    }

    /// Select the identifier type. Always lands in `Idle`, cancelling any
    /// scan in progress and discarding published findings.
    pub fn set_identifier_type(&mut self, kind: IdentifierType) {
        self.identifier_type = kind;
        self.apply(AuditInput::SwitchIdentifier);
    }

    /// Return to `Idle`. No-op when already idle.
    pub fn reset(&mut self) -> bool {
        self.apply(AuditInput::Reset)
    }

    /// Apply one tick scheduled for `run`. Returns `false` if the tick was
    /// stale or arrived outside `Scanning`.
    pub fn tick(&mut self, run: RunId) -> bool {
        self.apply(AuditInput::Tick { run })
    }

    /// Drain fired ticks from the ticker and apply them in order.
    ///
    /// Returns the number of ticks that changed state.
    pub fn poll(&mut self) -> usize {
        let fired = self.ticker.drain_fired();
        let mut applied = 0;
        for run in fired {
            if self.tick(run) {
                applied += 1;
            }
        }
        applied
    }

    /// Register a listener for transitions applied from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<AuditEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    #[must_use]
    pub fn phase(&self) -> AuditPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn state(&self) -> &AuditState {
        &self.state
    }

    /// Status line of the current scan step. `None` outside `Scanning` and
    /// before the first tick of a run.
    #[must_use]
    pub fn current_step_text(&self) -> Option<&'static str> {
        self.state.current_step()
    }

    /// Number of scan steps shown so far in the current run.
    #[must_use]
    pub fn steps_completed(&self) -> usize {
        match self.state {
            AuditState::Scanning { step_index, .. } => step_index,
            _ => 0,
        }
    }

    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        self.state.findings()
    }

    /// Identifier of the most recently accepted run.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn identifier_type(&self) -> IdentifierType {
        self.identifier_type
    }

    #[must_use]
    pub fn run_id(&self) -> Option<RunId> {
        self.state.run()
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    #[must_use]
    pub fn config(&self) -> AuditConfig {
        self.config
    }

    #[must_use]
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    /// Authoritative transition point.
    #[track_caller]
    fn apply(&mut self, input: AuditInput) -> bool {
        let Some(Transition { next, edge, effect }) =
            transition(&self.state, self.identifier_type, input)
        else {
            if let AuditInput::Tick { run } = input {
                tracing::debug!(%run, current = ?self.state.run(), "Dropping tick");
            }
            return false;
        };

        let from = self.state.phase();
        let to = next.phase();
        let legal = is_legal_transition(from, edge, to);
        if !legal {
            let loc = Location::caller();
            tracing::warn!(
                from = ?from,
                to = ?to,
                edge = edge.as_str(),
                file = loc.file(),
                line = loc.line(),
                "Illegal audit transition",
            );
            debug_assert!(
                legal,
                "Illegal audit transition: {from:?} --{edge:?}--> {to:?}"
            );
        }

        match effect {
            TickerEffect::None => {}
            TickerEffect::Start(run) => self.ticker.start(run, self.config.tick_interval),
            TickerEffect::Restart(run) => {
                self.ticker.stop();
                self.ticker.start(run, self.config.tick_interval);
            }
            TickerEffect::Stop => self.ticker.stop(),
        }

        self.state = next;
        tracing::debug!(from = ?from, to = ?to, edge = edge.as_str(), "Audit transition");

        match edge {
            AuditEdge::AdvanceStep => {
                if let AuditState::Scanning {
                    step_index,
                    current_step: Some(text),
                    ..
                } = self.state
                {
                    self.emit(AuditEvent::StepAdvanced {
                        index: step_index - 1,
                        text,
                    });
                }
            }
            AuditEdge::Resolve => {
                let count = self.state.findings().len();
                tracing::info!(run = ?self.state.run(), count, "Audit resolved");
                self.emit(AuditEvent::PhaseChanged { from, to });
                self.emit(AuditEvent::FindingsPublished { count });
            }
            AuditEdge::Restart => self.emit(AuditEvent::PhaseChanged { from, to }),
            AuditEdge::StartScan | AuditEdge::Reset | AuditEdge::SwitchIdentifier => {
                if from != to {
                    self.emit(AuditEvent::PhaseChanged { from, to });
                }
            }
        }
        true
    }

    fn emit(&mut self, event: AuditEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

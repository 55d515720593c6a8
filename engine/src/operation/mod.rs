//! Audit transition graph authority.
//!
//! This module is the single encoding point for the audit state machine: the
//! pure [`transition`] function decides the next state and ticker effect for
//! an input, and [`is_legal_transition`] is the graph every applied
//! transition is checked against. The engine owns side effects; nothing here
//! touches a ticker or a channel.

use shieldguard_types::{AuditPhase, IdentifierType, RunId};

use crate::script::{findings_for, scan_steps};
use crate::state::{AuditEdge, AuditInput, AuditState, TickerEffect, Transition};

#[must_use]
pub(crate) fn is_legal_transition(from: AuditPhase, edge: AuditEdge, to: AuditPhase) -> bool {
    use AuditEdge::{AdvanceStep, Reset, Resolve, Restart, StartScan, SwitchIdentifier};
    use AuditPhase::{Idle, Results, Scanning};

    matches!(
        (from, edge, to),
        (Idle, StartScan, Scanning)
            | (Scanning | Results, Restart, Scanning)
            | (Scanning, AdvanceStep, Scanning)
            | (Scanning, Resolve, Results)
            | (Scanning | Results, Reset, Idle)
            | (_, SwitchIdentifier, Idle)
    )
}

/// Compute the transition for `input` from `state`.
///
/// Returns `None` when the input is ignored: resetting an idle engine, or a
/// tick that does not belong to the scanning run (stale or foreign).
#[must_use]
pub(crate) fn transition(
    state: &AuditState,
    kind: IdentifierType,
    input: AuditInput,
) -> Option<Transition> {
    match (state, input) {
        (AuditState::Idle, AuditInput::Start { run }) => Some(Transition {
            next: scanning(run),
            edge: AuditEdge::StartScan,
            effect: TickerEffect::Start(run),
        }),
        (AuditState::Scanning { .. } | AuditState::Results { .. }, AuditInput::Start { run }) => {
            Some(Transition {
                next: scanning(run),
                edge: AuditEdge::Restart,
                effect: TickerEffect::Restart(run),
            })
        }

        (
            AuditState::Scanning {
                run,
                step_index,
                ..
            },
            AuditInput::Tick { run: tick_run },
        ) if *run == tick_run => {
            let steps = scan_steps(kind);
            if let Some(step) = steps.get(*step_index) {
                Some(Transition {
                    next: AuditState::Scanning {
                        run: *run,
                        step_index: step_index + 1,
                        current_step: Some(*step),
                    },
                    edge: AuditEdge::AdvanceStep,
                    effect: TickerEffect::None,
                })
            } else {
                Some(Transition {
                    next: AuditState::Results {
                        run: *run,
                        findings: findings_for(kind).to_vec(),
                    },
                    edge: AuditEdge::Resolve,
                    effect: TickerEffect::Stop,
                })
            }
        }
        (_, AuditInput::Tick { .. }) => None,

        (AuditState::Idle, AuditInput::Reset) => None,
        (AuditState::Scanning { .. }, AuditInput::Reset) => Some(Transition {
            next: AuditState::Idle,
            edge: AuditEdge::Reset,
            effect: TickerEffect::Stop,
        }),
        (AuditState::Results { .. }, AuditInput::Reset) => Some(Transition {
            next: AuditState::Idle,
            edge: AuditEdge::Reset,
            effect: TickerEffect::None,
        }),

        (AuditState::Scanning { .. }, AuditInput::SwitchIdentifier) => Some(Transition {
            next: AuditState::Idle,
            edge: AuditEdge::SwitchIdentifier,
            effect: TickerEffect::Stop,
        }),
        (AuditState::Idle | AuditState::Results { .. }, AuditInput::SwitchIdentifier) => {
            Some(Transition {
                next: AuditState::Idle,
                edge: AuditEdge::SwitchIdentifier,
                effect: TickerEffect::None,
            })
        }
    }
}

fn scanning(run: RunId) -> AuditState {
    AuditState::Scanning {
        run,
        step_index: 0,
        current_step: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN: RunId = RunId::new(1);

    fn drive_ticks(mut state: AuditState, kind: IdentifierType, ticks: usize) -> AuditState {
        for _ in 0..ticks {
            let t = transition(&state, kind, AuditInput::Tick { run: RUN })
                .expect("tick applies while scanning");
            state = t.next;
        }
        state
    }

    #[test]
    fn start_from_idle_enters_scanning_at_step_zero() {
        let t = transition(
            &AuditState::Idle,
            IdentifierType::Email,
            AuditInput::Start { run: RUN },
        )
        .unwrap();

        assert_eq!(t.edge, AuditEdge::StartScan);
        assert_eq!(t.effect, TickerEffect::Start(RUN));
        assert_eq!(
            t.next,
            AuditState::Scanning {
                run: RUN,
                step_index: 0,
                current_step: None
            }
        );
    }

    #[test]
    fn ticks_walk_the_script_in_order() {
        let kind = IdentifierType::Phone;
        let mut state = scanning(RUN);
        for (i, expected) in scan_steps(kind).iter().enumerate() {
            let t = transition(&state, kind, AuditInput::Tick { run: RUN }).unwrap();
            assert_eq!(t.edge, AuditEdge::AdvanceStep);
            assert_eq!(t.effect, TickerEffect::None);
            assert_eq!(t.next.current_step(), Some(*expected), "step {i}");
            state = t.next;
        }
    }

    #[test]
    fn tick_after_last_step_resolves_and_stops_ticker() {
        let kind = IdentifierType::Email;
        let state = drive_ticks(scanning(RUN), kind, scan_steps(kind).len());

        let t = transition(&state, kind, AuditInput::Tick { run: RUN }).unwrap();
        assert_eq!(t.edge, AuditEdge::Resolve);
        assert_eq!(t.effect, TickerEffect::Stop);
        assert_eq!(t.next.findings(), findings_for(kind));
    }

    #[test]
    fn stale_tick_is_ignored() {
        let state = scanning(RUN);
        assert!(
            transition(
                &state,
                IdentifierType::Email,
                AuditInput::Tick {
                    run: RunId::new(99)
                }
            )
            .is_none()
        );
    }

    #[test]
    fn ticks_outside_scanning_are_ignored() {
        let results = AuditState::Results {
            run: RUN,
            findings: findings_for(IdentifierType::Email).to_vec(),
        };
        for state in [AuditState::Idle, results] {
            assert!(
                transition(&state, IdentifierType::Email, AuditInput::Tick { run: RUN }).is_none()
            );
        }
    }

    #[test]
    fn reset_when_idle_is_a_no_op() {
        assert!(transition(&AuditState::Idle, IdentifierType::Email, AuditInput::Reset).is_none());
    }

    #[test]
    fn reset_while_scanning_stops_ticker() {
        let t = transition(&scanning(RUN), IdentifierType::Email, AuditInput::Reset).unwrap();
        assert_eq!(t.next, AuditState::Idle);
        assert_eq!(t.effect, TickerEffect::Stop);
    }

    #[test]
    fn switch_identifier_always_returns_to_idle() {
        let results = AuditState::Results {
            run: RUN,
            findings: findings_for(IdentifierType::Phone).to_vec(),
        };
        for (state, effect) in [
            (AuditState::Idle, TickerEffect::None),
            (scanning(RUN), TickerEffect::Stop),
            (results, TickerEffect::None),
        ] {
            let t = transition(&state, IdentifierType::Phone, AuditInput::SwitchIdentifier)
                .unwrap();
            assert_eq!(t.next, AuditState::Idle);
            assert_eq!(t.effect, effect);
        }
    }

    #[test]
    fn start_over_existing_run_restarts_ticker() {
        let next = RunId::new(2);
        let t = transition(
            &scanning(RUN),
            IdentifierType::Email,
            AuditInput::Start { run: next },
        )
        .unwrap();
        assert_eq!(t.edge, AuditEdge::Restart);
        assert_eq!(t.effect, TickerEffect::Restart(next));
        assert_eq!(t.next.run(), Some(next));
    }

    #[test]
    fn every_produced_transition_is_legal() {
        let kind = IdentifierType::Phone;
        let results = AuditState::Results {
            run: RUN,
            findings: findings_for(kind).to_vec(),
        };
        let states = [
            AuditState::Idle,
            scanning(RUN),
            drive_ticks(scanning(RUN), kind, 5),
            results,
        ];
        let inputs = [
            AuditInput::Start {
                run: RunId::new(2),
            },
            AuditInput::Tick { run: RUN },
            AuditInput::Reset,
            AuditInput::SwitchIdentifier,
        ];

        for state in &states {
            for input in inputs {
                if let Some(t) = transition(state, kind, input) {
                    assert!(
                        is_legal_transition(state.phase(), t.edge, t.next.phase()),
                        "{:?} --{:?}--> {:?}",
                        state.phase(),
                        t.edge,
                        t.next.phase()
                    );
                }
            }
        }
    }

    #[test]
    fn graph_rejects_shortcuts() {
        assert!(!is_legal_transition(
            AuditPhase::Idle,
            AuditEdge::Resolve,
            AuditPhase::Results
        ));
        assert!(!is_legal_transition(
            AuditPhase::Results,
            AuditEdge::AdvanceStep,
            AuditPhase::Scanning
        ));
        assert!(!is_legal_transition(
            AuditPhase::Idle,
            AuditEdge::Reset,
            AuditPhase::Idle
        ));
    }
}

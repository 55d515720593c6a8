//! Identity audit runs driven through the public engine API.

use std::time::Duration;

use shieldguard_engine::{
    AuditConfig, AuditEngine, AuditEvent, AuditPhase, DEFAULT_TICK_INTERVAL, IdentifierType,
    ManualTicker, Risk, findings_for, scan_steps,
};
use tokio::time::sleep;

fn manual_engine() -> AuditEngine<ManualTicker> {
    AuditEngine::new(AuditConfig::default(), ManualTicker::new())
}

fn advance(engine: &mut AuditEngine<ManualTicker>, periods: u32) -> usize {
    engine.ticker_mut().advance(DEFAULT_TICK_INTERVAL * periods);
    engine.poll()
}

#[test]
fn email_run_walks_every_step_then_reports() {
    let mut engine = manual_engine();
    assert!(engine.start_audit("alice@example.com", IdentifierType::Email));

    let steps = scan_steps(IdentifierType::Email);
    for (index, expected) in steps.iter().enumerate() {
        assert_eq!(advance(&mut engine, 1), 1);
        assert_eq!(engine.phase(), AuditPhase::Scanning);
        assert_eq!(engine.current_step_text(), Some(*expected));
        assert_eq!(engine.steps_completed(), index + 1);
    }

    assert_eq!(advance(&mut engine, 1), 1);
    assert_eq!(engine.phase(), AuditPhase::Results);
    assert_eq!(engine.findings(), findings_for(IdentifierType::Email));
    assert_eq!(engine.findings()[0].label, "Credential Exposure");
    assert!(!engine.is_ticking());
}

#[test]
fn phone_report_ranks_carrier_risk_highest() {
    let mut engine = manual_engine();
    engine.start_audit("+1 555 0100", IdentifierType::Phone);
    advance(&mut engine, 6);

    let findings = engine.findings();
    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0].label, "Carrier Vulnerability");
    assert_eq!(findings[0].risk, Risk::High);
    assert_eq!(engine.identifier(), "+1 555 0100");
}

#[test]
fn findings_do_not_depend_on_the_identifier() {
    let mut first = manual_engine();
    first.start_audit("a@example.com", IdentifierType::Email);
    advance(&mut first, 6);

    let mut second = manual_engine();
    second.start_audit("someone.else@example.org", IdentifierType::Email);
    advance(&mut second, 6);

    assert_eq!(first.findings(), second.findings());
}

#[test]
fn restart_mid_scan_discards_the_old_run() {
    let mut engine = manual_engine();
    engine.start_audit("a@example.com", IdentifierType::Email);
    advance(&mut engine, 3);
    let old_run = engine.run_id().expect("scanning");

    engine.start_audit("b@example.com", IdentifierType::Email);
    assert_eq!(engine.steps_completed(), 0);
    assert!(!engine.tick(old_run), "stale tick must be ignored");

    advance(&mut engine, 6);
    assert_eq!(engine.phase(), AuditPhase::Results);
    assert_eq!(engine.identifier(), "b@example.com");
}

#[test]
fn switching_type_cancels_scan() {
    let mut engine = manual_engine();
    engine.start_audit("a@example.com", IdentifierType::Email);
    advance(&mut engine, 2);

    engine.set_identifier_type(IdentifierType::Phone);
    assert_eq!(engine.phase(), AuditPhase::Idle);
    assert!(!engine.is_ticking());
    assert_eq!(advance(&mut engine, 10), 0);
}

#[test]
fn subscribers_see_the_whole_run() {
    let mut engine = manual_engine();
    let mut rx = engine.subscribe();
    engine.start_audit("a@example.com", IdentifierType::Phone);
    advance(&mut engine, 6);
    engine.reset();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    let steps = scan_steps(IdentifierType::Phone);
    let mut expected = vec![AuditEvent::PhaseChanged {
        from: AuditPhase::Idle,
        to: AuditPhase::Scanning,
    }];
    expected.extend(
        steps
            .iter()
            .enumerate()
            .map(|(index, &text)| AuditEvent::StepAdvanced { index, text }),
    );
    expected.extend([
        AuditEvent::PhaseChanged {
            from: AuditPhase::Scanning,
            to: AuditPhase::Results,
        },
        AuditEvent::FindingsPublished { count: 3 },
        AuditEvent::PhaseChanged {
            from: AuditPhase::Results,
            to: AuditPhase::Idle,
        },
    ]);
    assert_eq!(events, expected);
}

#[tokio::test(start_paused = true)]
async fn tokio_ticker_resolves_on_schedule() {
    let period = Duration::from_millis(100);
    let mut engine = AuditEngine::with_tokio(AuditConfig::with_tick_interval(period));
    assert!(engine.start_audit("a@example.com", IdentifierType::Email));

    let mut applied = 0;
    for _ in 0..6 {
        sleep(period).await;
        applied += engine.poll();
    }
    sleep(Duration::from_millis(10)).await;
    applied += engine.poll();

    assert_eq!(applied, 6);
    assert_eq!(engine.phase(), AuditPhase::Results);
    assert!(!engine.is_ticking());
}

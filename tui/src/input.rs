//! Input handling for the ShieldGuard TUI.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::{self, JoinHandle};
use tokio::time::timeout;

use shieldguard_engine::{AdvisoryService, App, IdentifierType, Tab, Ticker};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024;
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame
/// loop through a bounded channel.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl InputPump {
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_reader = Arc::clone(&stop);
        let join = task::spawn_blocking(move || input_loop(&stop_reader, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Closing first unblocks a reader stuck on a full channel.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take()
            && timeout(SHUTDOWN_TIMEOUT, join).await.is_err()
        {
            tracing::warn!("Input thread did not stop within {SHUTDOWN_TIMEOUT:?}");
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued terminal events into `app`. Returns `Ok(true)` once the app
/// asked to quit.
pub fn handle_events<T: Ticker, S: AdvisoryService>(
    app: &mut App<T, S>,
    input: &mut InputPump,
) -> Result<bool> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return Err(anyhow!("input pump disconnected")),
        };
        apply_event(app, ev);
        if app.should_quit() {
            break;
        }
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` when the event was consumed.
pub fn apply_event<T: Ticker, S: AdvisoryService>(app: &mut App<T, S>, ev: Event) -> bool {
    match ev {
        Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            handle_key(app, key)
        }
        Event::Paste(text) => match app.active_input_mut() {
            Some(input) => {
                input.enter_text(&text);
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn handle_key<T: Ticker, S: AdvisoryService>(app: &mut App<T, S>, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            app.request_quit();
            return true;
        }
        KeyCode::Char('c') if ctrl => {
            app.request_quit();
            return true;
        }
        KeyCode::Tab => {
            app.next_tab();
            return true;
        }
        KeyCode::BackTab => {
            app.prev_tab();
            return true;
        }
        KeyCode::F(n @ 1..=4) => {
            if let Some(tab) = Tab::from_index(usize::from(n - 1)) {
                app.set_tab(tab);
            }
            return true;
        }
        _ => {}
    }

    match app.tab() {
        Tab::Overview => {
            if key.code == KeyCode::Enter {
                app.open_audit();
                return true;
            }
            false
        }
        Tab::IdentityAudit => match key.code {
            KeyCode::Char('e') if ctrl => {
                app.select_identifier_type(IdentifierType::Email);
                true
            }
            KeyCode::Char('p') if ctrl => {
                app.select_identifier_type(IdentifierType::Phone);
                true
            }
            KeyCode::Char('r') if ctrl => {
                app.reset_audit();
                true
            }
            KeyCode::Enter => {
                if app.can_start_audit() {
                    app.start_audit();
                }
                true
            }
            _ => edit_active_input(app, key),
        },
        Tab::Advisor => match key.code {
            KeyCode::Enter => {
                app.submit_chat();
                true
            }
            _ => edit_active_input(app, key),
        },
        Tab::Learn => false,
    }
}

fn edit_active_input<T: Ticker, S: AdvisoryService>(app: &mut App<T, S>, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(input) = app.active_input_mut() else {
        return false;
    };
    match key.code {
        KeyCode::Char('w') if ctrl => input.delete_word_backwards(),
        KeyCode::Char('u') if ctrl => input.clear(),
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => return false,
        KeyCode::Char(c) => input.enter_char(c),
        KeyCode::Backspace => input.delete_char(),
        KeyCode::Delete => input.delete_char_forward(),
        KeyCode::Left => input.move_cursor_left(),
        KeyCode::Right => input.move_cursor_right(),
        KeyCode::Home => input.move_cursor_home(),
        KeyCode::End => input.move_cursor_end(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use shieldguard_engine::{
        AdvisorSession, AuditConfig, AuditEngine, AuditPhase, ManualTicker, UiOptions,
    };

    struct QuietAdvisor;

    impl AdvisoryService for QuietAdvisor {
        async fn get_advice(&self, _prompt: &str) -> String {
            "Use a carrier port-out PIN.".to_owned()
        }
    }

    type TestApp = App<ManualTicker, QuietAdvisor>;

    fn app() -> TestApp {
        App::with_parts(
            AuditEngine::new(AuditConfig::default(), ManualTicker::new()),
            AdvisorSession::new(QuietAdvisor),
            UiOptions::default(),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_str(app: &mut TestApp, text: &str) {
        for c in text.chars() {
            apply_event(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn tab_keys_switch_views() {
        let mut app = app();
        apply_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.tab(), Tab::IdentityAudit);
        apply_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.tab(), Tab::Overview);
        apply_event(&mut app, key(KeyCode::F(4)));
        assert_eq!(app.tab(), Tab::Learn);
        assert!(!apply_event(&mut app, key(KeyCode::F(5))));
        assert_eq!(app.tab(), Tab::Learn);
    }

    #[test]
    fn esc_and_ctrl_c_quit() {
        let mut a = app();
        apply_event(&mut a, key(KeyCode::Esc));
        assert!(a.should_quit());

        let mut b = app();
        apply_event(&mut b, ctrl('c'));
        assert!(b.should_quit());
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!apply_event(&mut app, Event::Key(release)));
        assert_eq!(app.tab(), Tab::Overview);
    }

    #[test]
    fn enter_on_overview_opens_audit() {
        let mut app = app();
        apply_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.tab(), Tab::IdentityAudit);
    }

    #[test]
    fn typing_and_enter_starts_audit() {
        let mut app = app();
        app.set_tab(Tab::IdentityAudit);
        type_str(&mut app, "me@example.com");
        assert_eq!(app.audit_input().text(), "me@example.com");

        apply_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.audit().phase(), AuditPhase::Scanning);
        assert_eq!(app.audit().identifier(), "me@example.com");
    }

    #[test]
    fn enter_with_blank_identifier_stays_idle() {
        let mut app = app();
        app.set_tab(Tab::IdentityAudit);
        type_str(&mut app, "  ");
        apply_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.audit().phase(), AuditPhase::Idle);
    }

    #[test]
    fn ctrl_keys_pick_identifier_type_and_reset() {
        let mut app = app();
        app.set_tab(Tab::IdentityAudit);
        apply_event(&mut app, ctrl('p'));
        assert_eq!(app.identifier_type(), IdentifierType::Phone);

        type_str(&mut app, "+15550100");
        apply_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.audit().phase(), AuditPhase::Scanning);

        apply_event(&mut app, ctrl('r'));
        assert_eq!(app.audit().phase(), AuditPhase::Idle);

        apply_event(&mut app, ctrl('e'));
        assert_eq!(app.identifier_type(), IdentifierType::Email);
        assert_eq!(app.audit_input().text(), "+15550100");
    }

    #[test]
    fn editing_keys_reach_the_input() {
        let mut app = app();
        app.set_tab(Tab::IdentityAudit);
        type_str(&mut app, "abc");
        apply_event(&mut app, key(KeyCode::Left));
        apply_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.audit_input().text(), "ac");
        apply_event(&mut app, key(KeyCode::Home));
        apply_event(&mut app, key(KeyCode::Delete));
        assert_eq!(app.audit_input().text(), "c");
    }

    #[test]
    fn paste_goes_to_the_active_input() {
        let mut app = app();
        app.set_tab(Tab::Advisor);
        assert!(apply_event(&mut app, Event::Paste("line one\nline two".to_owned())));
        assert_eq!(app.chat_input().text(), "line one line two");

        app.set_tab(Tab::Learn);
        assert!(!apply_event(&mut app, Event::Paste("ignored".to_owned())));
    }

    #[tokio::test]
    async fn enter_on_advisor_submits() {
        let mut app = app();
        app.set_tab(Tab::Advisor);
        type_str(&mut app, "How do I stop SIM swaps?");
        apply_event(&mut app, key(KeyCode::Enter));

        assert!(app.chat_input().text().is_empty());
        app.advisor_mut().wait_pending().await;
        let last = app.advisor().messages().last().expect("answer");
        assert_eq!(last.text, "Use a carrier port-out PIN.");
    }
}

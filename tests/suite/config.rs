//! Config file to running components.

use std::time::Duration;

use shieldguard_engine::{
    AdvisorSession, App, AuditEngine, IdentifierType, ManualTicker, ShieldConfig, Tab,
};
use shieldguard_types::ApiKey;
use tempfile::tempdir;

use crate::common::{TEST_API_KEY, advisor_with, mount_answer, start_gemini_mock, write_config};

fn lookup(name: &str) -> Option<String> {
    (name == "SHIELDGUARD_TEST_KEY").then(|| TEST_API_KEY.to_owned())
}

#[tokio::test]
async fn config_file_drives_audit_advisor_and_ui() {
    let server = start_gemini_mock().await;
    mount_answer(&server, "Turn off NFC in crowded places.").await;

    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        &format!(
            r#"
[audit]
tick_ms = 50

[advisor]
base_url = "{}/"
timeout_secs = 5

[api_keys]
google = "${{SHIELDGUARD_TEST_KEY}}"

[ui]
ascii_only = true
reduced_motion = true
"#,
            server.uri()
        ),
    );

    let config = ShieldConfig::load_from(&path).unwrap().expect("config present");
    assert_eq!(config.audit_config().tick_interval, Duration::from_millis(50));

    let gemini = config.gemini_config_with(lookup);
    assert_eq!(gemini.base_url, server.uri());
    assert_eq!(gemini.timeout, Duration::from_secs(5));
    assert_eq!(gemini.api_key.as_ref().map(ApiKey::as_str), Some(TEST_API_KEY));

    let mut app = App::with_parts(
        AuditEngine::new(config.audit_config(), ManualTicker::new()),
        AdvisorSession::new(advisor_with(gemini)),
        config.ui_options(),
    );
    assert!(app.ui_options().ascii_only);
    assert!(app.ui_options().reduced_motion);
    assert!(!app.ui_options().high_contrast);

    app.set_tab(Tab::IdentityAudit);
    app.select_identifier_type(IdentifierType::Phone);
    app.audit_input_mut().enter_text("+1 555 0100");
    assert!(app.start_audit());
    assert_eq!(
        app.audit().ticker().period(),
        Some(Duration::from_millis(50))
    );

    app.set_tab(Tab::Advisor);
    app.chat_input_mut().enter_text("Is NFC risky?");
    assert!(app.submit_chat());
    app.advisor_mut().wait_pending().await;
    assert_eq!(
        app.advisor().messages().last().map(|m| m.text.as_str()),
        Some("Turn off NFC in crowded places.")
    );
}

#[test]
fn broken_config_reports_its_path() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "[audit\ntick_ms = ");

    let err = ShieldConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), &path);
}

#[test]
fn missing_config_is_not_an_error() {
    let dir = tempdir().unwrap();
    let loaded = ShieldConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn production_app_builds_from_defaults() {
    let app = App::new(&ShieldConfig::default());
    assert_eq!(app.tab(), Tab::Overview);
    assert!(!app.should_quit());
    assert_eq!(app.advisor().messages().len(), 1);
}

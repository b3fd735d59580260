use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::common::*;
use crate::security::events;
use crate::security::GateError;

const EMAIL: &str = "owner@practice.example.com";
const PASSWORD: &str = "secure1password";

#[test]
fn sign_up_rejects_malformed_credentials_before_the_provider() {
    let (gate, _, _, sink) = memory_gate();

    let report = match gate.sign_up("not-an-email", "short", None) {
        Err(GateError::ValidationFailed(report)) => report,
        other => panic!("expected validation failure, got {other:?}"),
    };

    // Both field failures accumulate in one pass.
    assert_eq!(report.errors().len(), 2);
    assert!(report.joined().contains("email"));
    assert!(sink.events().is_empty());
}

#[test]
fn sign_up_registers_and_emits_event() {
    let (gate, _, _, sink) = memory_gate();

    let outcome = gate
        .sign_up(EMAIL, PASSWORD, Some("https://app.example.com/welcome"))
        .expect("sign up passes the gate");

    assert!(outcome.session.is_some());
    assert_eq!(sink.names(), vec![events::USER_SIGNUP.to_string()]);
}

#[test]
fn fourth_sign_up_attempt_is_rate_limited() {
    let (gate, _, _, sink) = memory_gate();

    gate.sign_up(EMAIL, PASSWORD, None).expect("first attempt");
    for _ in 0..2 {
        // Duplicate registrations fail at the provider but still consume
        // attempts.
        let result = gate.sign_up(EMAIL, PASSWORD, None);
        assert!(matches!(result, Err(GateError::Backend { .. })));
    }

    match gate.sign_up(EMAIL, PASSWORD, None) {
        Err(GateError::RateLimited {
            retry_after_minutes,
        }) => assert_eq!(retry_after_minutes, 15),
        other => panic!("expected rate limit, got {other:?}"),
    }
    assert!(sink
        .names()
        .contains(&events::RATE_LIMIT_EXCEEDED.to_string()));
}

#[test]
fn sixth_sign_in_attempt_is_cut_off_locally() {
    let provider = Arc::new(RejectingProvider::default());
    let (gate, _, sink) = build_gate(provider.clone());

    for attempt in 1..=5 {
        match gate.sign_in(EMAIL, "wrong1password") {
            Err(GateError::Backend { user_message }) => {
                // Auth-provider messages pass through the redactor verbatim.
                assert_eq!(user_message, "Invalid login credentials", "attempt {attempt}");
            }
            other => panic!("attempt {attempt}: expected provider rejection, got {other:?}"),
        }
    }
    assert_eq!(provider.sign_in_calls.load(Ordering::Relaxed), 5);

    match gate.sign_in(EMAIL, "wrong1password") {
        Err(GateError::RateLimited {
            retry_after_minutes,
        }) => assert_eq!(retry_after_minutes, 15),
        other => panic!("expected rate limit, got {other:?}"),
    }

    // The sixth attempt never reached the collaborator.
    assert_eq!(provider.sign_in_calls.load(Ordering::Relaxed), 5);
    assert!(sink
        .names()
        .contains(&events::RATE_LIMIT_EXCEEDED.to_string()));
}

#[test]
fn rate_limit_key_ignores_email_case_and_padding() {
    let provider = Arc::new(RejectingProvider::default());
    let (gate, _, _) = build_gate(provider.clone());

    for _ in 0..5 {
        let _ = gate.sign_in("  Owner@Practice.Example.Com ", "wrong1password");
    }
    assert!(matches!(
        gate.sign_in(EMAIL, "wrong1password"),
        Err(GateError::RateLimited { .. })
    ));
}

#[test]
fn successful_sign_in_emits_event_with_user_id() {
    let (gate, _, _, sink) = memory_gate();
    gate.sign_up(EMAIL, PASSWORD, None).expect("sign up");

    let session = gate.sign_in(EMAIL, PASSWORD).expect("sign in");

    let recorded = sink.events();
    let signin = recorded
        .iter()
        .find(|event| event.name == events::USER_SIGNIN)
        .expect("sign-in event recorded");
    assert_eq!(signin.details["user_id"], session.user_id.as_str());
}

#[test]
fn password_reset_validates_email_and_notifies() {
    let (gate, _, notifier, sink) = memory_gate();
    gate.sign_up(EMAIL, PASSWORD, None).expect("sign up");

    assert!(matches!(
        gate.request_password_reset("", "https://app.example.com/reset"),
        Err(GateError::ValidationFailed(_))
    ));

    gate.request_password_reset(EMAIL, "https://app.example.com/reset")
        .expect("reset request passes");

    assert!(sink
        .names()
        .contains(&events::PASSWORD_RESET_REQUEST.to_string()));
    assert!(notifier
        .notifications()
        .iter()
        .any(|notification| notification.title == "Check your email"));
}

#[test]
fn fourth_password_reset_in_the_window_is_rate_limited() {
    let (gate, _, _, _) = memory_gate();

    for _ in 0..3 {
        gate.request_password_reset(EMAIL, "https://app.example.com/reset")
            .expect("within budget");
    }

    match gate.request_password_reset(EMAIL, "https://app.example.com/reset") {
        Err(GateError::RateLimited {
            retry_after_minutes,
        }) => assert_eq!(retry_after_minutes, 60),
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[test]
fn update_password_checks_shape_before_the_provider() {
    let provider = Arc::new(RejectingProvider::default());
    let (gate, _, _) = build_gate(provider);

    assert!(matches!(
        gate.update_password("reset-token", "weak"),
        Err(GateError::ValidationFailed(_))
    ));
}

#[test]
fn provider_infrastructure_failures_are_redacted() {
    let provider = Arc::new(RejectingProvider::default());
    let (gate, _, _) = build_gate(provider);

    // "connection reset by peer" matches the network category before the
    // auth passthrough is considered.
    match gate.request_password_reset(EMAIL, "https://app.example.com/reset") {
        Err(GateError::Backend { user_message }) => {
            assert_eq!(user_message, "Network connection error. Please try again");
        }
        other => panic!("expected backend failure, got {other:?}"),
    }
}

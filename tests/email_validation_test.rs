use contact_relay::core::ContactSubmission;
use contact_relay::utils::email::EMAIL_REGEX;
use contact_relay::{is_valid_email, ContactError, ContactService};
use std::sync::Arc;

mod common;
use common::RecordingRelay;

#[test]
fn test_reference_cases() {
    let cases = [
        ("user@domain.com", true),
        ("user.name@domain.com", true),
        ("user@domain.co.uk", true),
        (".user@domain.com", false),
        ("user.@domain.com", false),
        ("user@.domain.com", false),
        ("user@domain..com", false),
        ("user@domain.c", false),
        ("user@domain.123", false),
        ("user@-domain.com", false),
        ("user@domain-.com", false),
        ("@domain.com", false),
        ("user@.com", false),
        ("user.domain.com", false),
        ("user@@domain.com", false),
        ("user@domain", false),
        ("", false),
    ];

    for (input, expected) in cases {
        assert_eq!(
            is_valid_email(input),
            expected,
            "is_valid_email({:?}) should be {}",
            input,
            expected
        );
    }
}

#[test]
fn test_exported_pattern_matches_predicate() {
    for input in ["user@domain.com", "user@domain", "a..b@domain.com"] {
        assert_eq!(EMAIL_REGEX.is_match(input), is_valid_email(input));
    }
}

/// local part 允許連續的點，鎖定目前行為
#[test]
fn test_local_part_consecutive_dots_regression() {
    assert!(is_valid_email("a..b@domain.com"));
    assert!(!is_valid_email("a@domain..com"));
}

#[test]
fn test_validator_is_safe_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let valid = format!("user{}@domain.com", i);
                let invalid = format!("user{}@domain", i);
                (is_valid_email(&valid), is_valid_email(&invalid))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (true, false));
    }
}

#[test]
fn test_end_to_end_gate() {
    let relay = Arc::new(RecordingRelay::default());
    let service = ContactService::new(relay.clone());

    let accepted = ContactSubmission {
        name: Some("Test User".to_string()),
        email: Some("test@example.com".to_string()),
        subject: None,
        message: Some("hi".to_string()),
    };
    tokio_test::block_on(service.submit(accepted.clone())).unwrap();
    assert_eq!(relay.calls(), 1);

    let rejected = ContactSubmission {
        email: Some("invalid-email".to_string()),
        ..accepted
    };
    let result = tokio_test::block_on(service.submit(rejected));
    assert!(matches!(result, Err(ContactError::InvalidEmail { .. })));
    assert_eq!(relay.calls(), 1);
}

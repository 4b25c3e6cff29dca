use super::*;

#[test]
fn exit_codes_follow_failure_kind() {
    assert_eq!(CliError::Validation("Website name is required").exit_code(), 2);
    assert_eq!(CliError::LoginRequired.exit_code(), 3);
    assert_eq!(CliError::Auth(AuthError::NotSignedIn).exit_code(), 3);
    assert_eq!(CliError::Api(ApiError::Timeout).exit_code(), 1);
    assert_eq!(CliError::Stale(Route::Login).exit_code(), 1);
}

#[test]
fn only_notified_failures_skip_the_fallback_message() {
    assert!(CliError::Auth(AuthError::NotSignedIn).notified());
    assert!(CliError::LoginRequired.notified());
    assert!(!CliError::Stale(Route::Login).notified());
}

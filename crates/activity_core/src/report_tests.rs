use super::*;

#[test]
fn test_recording_reporter_starts_empty() {
    let reporter = RecordingReporter::new();

    assert!(!reporter.has_failed());
    assert!(reporter.failures().is_empty());
}

#[test]
fn test_recording_reporter_keeps_order() {
    let reporter = RecordingReporter::new();

    reporter.report(&ActivityError::MissingActivityContext);
    reporter.report(&ActivityError::AuthorResolution(
        github_client::Error::NotFound,
    ));

    assert_eq!(
        reporter.failures(),
        vec![
            "Error retrieving issue number".to_string(),
            "Failed to resolve the issue author: Resource not found".to_string(),
        ]
    );
}

#[test]
fn test_tracing_reporter_does_not_panic() {
    TracingReporter.report(&ActivityError::MissingActivityContext);
}

use super::*;

#[test]
fn test_descriptor_error_display() {
    let err = Error::Descriptor {
        path: "vert.x/rest-http/broken.yaml".to_string(),
        reason: "missing field `repo`".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Failed to parse descriptor vert.x/rest-http/broken.yaml: missing field `repo`"
    );
}

#[test]
fn test_invalid_argument_display() {
    let err = Error::InvalidArgument("mission must not be empty".to_string());
    assert_eq!(err.to_string(), "Invalid argument: mission must not be empty");
}

#[test]
fn test_fetch_error_converts_from_git_fetcher() {
    let source = git_fetcher::Error::RefNotFound {
        url: "https://example.com/catalog.git".to_string(),
        reference: "next".to_string(),
    };
    let err: Error = source.into();
    assert!(matches!(err, Error::Fetch(_)));
    assert!(err.to_string().contains("next"));
}

#[test]
fn test_io_error_converts() {
    let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(err, Error::Io(_)));
}

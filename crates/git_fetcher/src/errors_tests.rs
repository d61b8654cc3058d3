use super::*;

#[test]
fn test_ref_not_found_display_includes_url_and_ref() {
    let err = Error::RefNotFound {
        url: "https://example.com/repo.git".to_string(),
        reference: "v1.0".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Ref 'v1.0' not found in https://example.com/repo.git"
    );
}

#[test]
fn test_clone_error_preserves_source() {
    let err = Error::Clone {
        url: "https://example.com/repo.git".to_string(),
        source: git2::Error::from_str("network unreachable"),
    };
    assert!(err.to_string().contains("network unreachable"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_fetch_error_display_includes_reference() {
    let err = Error::Fetch {
        url: "https://example.com/repo.git".to_string(),
        reference: "master".to_string(),
        source: git2::Error::from_str("timed out"),
    };
    assert!(err.to_string().contains("'master'"));
    assert!(err.to_string().contains("https://example.com/repo.git"));
}

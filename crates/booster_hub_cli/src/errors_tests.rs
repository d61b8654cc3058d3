use super::*;

#[test]
fn test_no_such_booster_display() {
    let err = Error::NoSuchBooster {
        mission: "rest-http".to_string(),
        runtime: "vert.x".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "No booster found for mission 'rest-http' and runtime 'vert.x'"
    );
}

#[test]
fn test_catalog_errors_pass_through() {
    let err: Error = booster_catalog::Error::InvalidArgument("mission must not be empty".into()).into();
    assert_eq!(err.to_string(), "Invalid argument: mission must not be empty");
}

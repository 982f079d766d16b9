use std::io;
use std::path::PathBuf;

use pyskel::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::UnknownOption { option: "use_pytest".to_string() };
    assert_eq!(err.to_string(), "Unknown option 'use_pytest'.");

    let err = Error::InvalidOptionValue {
        option: "have_tests".to_string(),
        value: "maybe".to_string(),
        allowed: "y, n".to_string(),
    };
    assert_eq!(err.to_string(), "Invalid value 'maybe' for option 'have_tests' (allowed: y, n).");

    let err = Error::MissingExpectedPath {
        rule: "remove-license".to_string(),
        path: PathBuf::from("LICENSE"),
    };
    assert_eq!(err.to_string(), "Rule 'remove-license' expected 'LICENSE' to exist.");
}

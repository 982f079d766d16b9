use pyskel::{
    answers::{load_answers_file, merge, parse_answers, parse_assignment},
    error::Error,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_empty_answers() {
    assert!(parse_answers("").unwrap().is_empty());
    assert!(parse_answers("  \n").unwrap().is_empty());
}

#[test]
fn test_json_answers_keep_order() {
    let answers = parse_answers(r#"{"license": "Other", "command_line_interface": "None"}"#).unwrap();
    let keys: Vec<&str> = answers.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["license", "command_line_interface"]);
}

#[test]
fn test_yaml_answers_with_booleans() {
    let answers = parse_answers("have_tests: false\ncreate_author_file: true\nfull_name: 'name \"quote\" name'\n").unwrap();
    assert_eq!(answers["have_tests"], "n");
    assert_eq!(answers["create_author_file"], "y");
    assert_eq!(answers["full_name"], r#"name "quote" name"#);
}

#[test]
fn test_invalid_answers() {
    let result = parse_answers(r#"{"license": "Other""#);
    assert!(matches!(result, Err(Error::AnswersError(_))));

    let result = parse_answers(r#"{"license": ["MIT License"]}"#);
    assert!(matches!(result, Err(Error::AnswersError(msg)) if msg.contains("license")));
}

#[test]
fn test_load_answers_from_directory() {
    let temp_dir = TempDir::new().unwrap();
    assert!(load_answers_file(temp_dir.path()).is_err());

    fs::write(temp_dir.path().join("answers.yml"), "license: Other\n").unwrap();
    let answers = load_answers_file(temp_dir.path()).unwrap();
    assert_eq!(answers["license"], "Other");
}

#[test]
fn test_parse_assignment() {
    assert_eq!(
        parse_assignment("full_name=A=B").unwrap(),
        ("full_name".to_string(), "A=B".to_string())
    );
    assert_eq!(parse_assignment("have_tests=").unwrap(), ("have_tests".to_string(), String::new()));
    assert!(parse_assignment("have_tests").is_err());
    assert!(parse_assignment("=y").is_err());
}

#[test]
fn test_merge_overlay_wins() {
    let base = parse_answers(r#"{"license": "Other", "have_tests": "y"}"#).unwrap();
    let overlay = parse_answers(r#"{"have_tests": "n"}"#).unwrap();
    let merged = merge(base, overlay);
    assert_eq!(merged["have_tests"], "n");
    assert_eq!(merged["license"], "Other");
}

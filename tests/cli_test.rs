use clap::Parser;
use pyskel::cli::{Args, Commands};
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("pyskel")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_generate_args() {
    let args = make_args(&["generate", "./skeleton", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(!parsed.verbose);
    match parsed.command {
        Commands::Generate { template, output_dir, force, answers } => {
            assert_eq!(template, PathBuf::from("./skeleton"));
            assert_eq!(output_dir, PathBuf::from("./output"));
            assert!(!force);
            assert!(answers.set.is_empty());
            assert!(!answers.interactive);
        }
        other => panic!("Expected Generate, got {other:?}"),
    }
}

#[test]
fn test_all_answer_flags() {
    let args = make_args(&[
        "materialize",
        "--again",
        "--answers",
        "answers.yml",
        "--stdin",
        "--set",
        "license=Other",
        "--set",
        "have_tests=n",
        "--verbose",
        "./project",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Commands::Materialize { project_dir, again, answers } => {
            assert_eq!(project_dir, PathBuf::from("./project"));
            assert!(again);
            assert!(answers.stdin);
            assert_eq!(answers.answers, Some(PathBuf::from("answers.yml")));
            assert_eq!(answers.set, vec!["license=Other", "have_tests=n"]);
        }
        other => panic!("Expected Materialize, got {other:?}"),
    }
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-v", "generate", "-f", "-i", "./skeleton", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Commands::Generate { force, answers, .. } => {
            assert!(force);
            assert!(answers.interactive);
        }
        other => panic!("Expected Generate, got {other:?}"),
    }
}

#[test]
fn test_matrix_trailing_command() {
    let args = make_args(&[
        "matrix",
        "./skeleton",
        "--vary",
        "documentation_framework=Sphinx,MkDocs",
        "--parallel",
        "--",
        "nox",
        "-s",
        "docs",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    match parsed.command {
        Commands::Matrix { template, vary, parallel, command } => {
            assert_eq!(template, PathBuf::from("./skeleton"));
            assert_eq!(vary, vec!["documentation_framework=Sphinx,MkDocs"]);
            assert!(parallel);
            assert_eq!(command, vec!["nox", "-s", "docs"]);
        }
        other => panic!("Expected Matrix, got {other:?}"),
    }
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&["generate", "./skeleton"])).is_err());
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["materialize", "./project", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}

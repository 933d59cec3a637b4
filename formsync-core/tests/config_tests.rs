//! Config loader error-message and validation integration tests.

use assert_fs::prelude::*;
use formsync_core::{config, ConfigError, FormId, QuestionKind, SyncPaths};
use predicates::prelude::predicate;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_config_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("questions.yml");
    let err = config::load_at(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("questions.yml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("questions.yml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("questions.yml"), "must contain file path, got: {msg}");
}

#[test]
fn load_form_without_title_returns_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("questions.yml");
    file.write_str("forms:\n  - id: a\n    description: no title\n")
        .expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    let ConfigError::Parse { source, .. } = &err else {
        panic!("expected parse error, got: {err}");
    };
    assert!(source.to_string().contains("title"), "got: {source}");
}

// ---------------------------------------------------------------------------
// 2. Document-level validation
// ---------------------------------------------------------------------------

#[test]
fn duplicate_ids_are_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("questions.yml");
    file.write_str(
        "forms:\n\
         \x20 - {id: dup, title: One, description: ''}\n\
         \x20 - {id: dup, title: Two, description: ''}\n",
    )
    .expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateId { ref id } if id == "dup"), "got: {err}");
}

#[rstest]
#[case("''")]
#[case("'   '")]
fn empty_ids_are_rejected(#[case] id: &str) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("questions.yml");
    file.write_str(&format!(
        "forms:\n  - {{id: ok, title: A, description: ''}}\n  - {{id: {id}, title: B, description: ''}}\n"
    ))
    .expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyId { index: 1 }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 3. Happy path
// ---------------------------------------------------------------------------

#[rstest]
#[case("short_answer", QuestionKind::ShortAnswer)]
#[case("paragraph", QuestionKind::Paragraph)]
#[case("multiple_choice", QuestionKind::MultipleChoice)]
#[case("ranking", QuestionKind::Unsupported("ranking".to_string()))]
fn question_types_are_carried_through(#[case] raw: &str, #[case] expected: QuestionKind) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("questions.yml");
    file.write_str(&format!(
        "forms:\n  - id: f\n    title: F\n    description: d\n    questions:\n      - text: Q\n        type: {raw}\n        options: [x]\n"
    ))
    .expect("write");

    let forms = config::load_at(file.path()).expect("load");
    assert_eq!(forms[0].id, FormId::from("f"));
    assert_eq!(forms[0].questions[0].kind, expected);
}

#[test]
fn state_files_sit_next_to_the_config() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("team.yaml");
    file.write_str("forms: []\n").expect("write");

    let paths = SyncPaths::for_config(file.path());
    dir.child("team_state.json")
        .assert(predicate::path::missing());
    assert_eq!(paths.state_file, dir.path().join("team_state.json"));
    assert_eq!(paths.token_file, dir.path().join("team_token.json"));
}

//! # CLI Scenario Tests
//!
//! Source of truth for the REPL's output contract. Each test pipes a
//! script into the compiled binary and compares stdout line-for-line,
//! including the prompt that precedes every command and the bare trailing
//! prompt at exit.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::tempdir;

fn run_script(db_path: &Path, commands: &[&str]) -> Vec<String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_unodb"))
        .arg(db_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn unodb");

    {
        let stdin = child.stdin.as_mut().expect("child stdin");
        for command in commands {
            writeln!(stdin, "{}", command).expect("failed to write command");
        }
    }

    let output = child.wait_with_output().expect("failed to wait for unodb");
    assert!(output.status.success(), "unodb exited with {}", output.status);

    String::from_utf8(output.stdout)
        .expect("stdout is not UTF-8")
        .split('\n')
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn inserts_and_retrieves_a_row() {
    let dir = tempdir().unwrap();
    let result = run_script(
        &dir.path().join("test.db"),
        &["insert 1 user1 person1@example.com", "select", ".exit"],
    );

    assert_eq!(
        result,
        vec![
            "db > Executed.",
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
    );
}

#[test]
fn allows_strings_of_maximum_length() {
    let dir = tempdir().unwrap();
    let long_username = "a".repeat(32);
    let long_email = "a".repeat(255);

    let result = run_script(
        &dir.path().join("test.db"),
        &[
            &format!("insert 1 {} {}", long_username, long_email),
            "select",
            ".exit",
        ],
    );

    assert_eq!(
        result,
        vec![
            "db > Executed.".to_string(),
            format!("db > (1, {}, {})", long_username, long_email),
            "Executed.".to_string(),
            "db > ".to_string(),
        ]
    );
}

#[test]
fn rejects_strings_that_are_too_long() {
    let dir = tempdir().unwrap();
    let long_username = "a".repeat(33);
    let long_email = "a".repeat(256);

    let result = run_script(
        &dir.path().join("test.db"),
        &[
            &format!("insert 1 {} {}", long_username, long_email),
            "select",
            ".exit",
        ],
    );

    assert_eq!(
        result,
        vec!["db > String is too long.", "db > Executed.", "db > "]
    );
}

#[test]
fn rejects_negative_ids() {
    let dir = tempdir().unwrap();
    let result = run_script(
        &dir.path().join("test.db"),
        &["insert -1 cstack foo@bar.com", "select", ".exit"],
    );

    assert_eq!(
        result,
        vec!["db > ID must be positive.", "db > Executed.", "db > "]
    );
}

#[test]
fn keeps_data_after_closing_connection() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let result = run_script(&db_path, &["insert 1 user1 person1@example.com", ".exit"]);
    assert_eq!(result, vec!["db > Executed.", "db > "]);

    let result = run_script(&db_path, &["select", ".exit"]);
    assert_eq!(
        result,
        vec![
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
    );
}

#[test]
fn prints_constants() {
    let dir = tempdir().unwrap();
    let result = run_script(&dir.path().join("test.db"), &[".constants", ".exit"]);

    assert_eq!(
        result,
        vec![
            "db > Constants:",
            "ROW_SIZE: 293",
            "COMMON_NODE_HEADER_SIZE: 6",
            "LEAF_NODE_HEADER_SIZE: 10",
            "LEAF_NODE_CELL_SIZE: 297",
            "LEAF_NODE_SPACE_FOR_CELLS: 4086",
            "LEAF_NODE_MAX_CELLS: 13",
            "db > ",
        ]
    );
}

#[test]
fn prints_one_node_btree_structure() {
    let dir = tempdir().unwrap();
    let result = run_script(
        &dir.path().join("test.db"),
        &[
            "insert 3 user3 person3@example.com",
            "insert 1 user1 person1@example.com",
            "insert 2 user2 person2@example.com",
            ".btree",
            ".exit",
        ],
    );

    assert_eq!(
        result,
        vec![
            "db > Executed.",
            "db > Executed.",
            "db > Executed.",
            "db > Tree:",
            "leaf (size 3)",
            "  - 0 : 1",
            "  - 1 : 2",
            "  - 2 : 3",
            "db > ",
        ]
    );
}

#[test]
fn prints_error_for_duplicate_id() {
    let dir = tempdir().unwrap();
    let result = run_script(
        &dir.path().join("test.db"),
        &[
            "insert 1 user1 person1@example.com",
            "insert 1 user1 person1@example.com",
            "select",
            ".exit",
        ],
    );

    assert_eq!(
        result,
        vec![
            "db > Executed.",
            "db > Error: Duplicate key.",
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
    );
}

#[test]
fn prints_two_leaf_btree_structure_after_split() {
    let dir = tempdir().unwrap();
    let mut script: Vec<String> = (1..=14)
        .map(|i| format!("insert {} user{} person{}@example.com", i, i, i))
        .collect();
    script.push(".btree".to_string());
    script.push(".exit".to_string());
    let script_refs: Vec<&str> = script.iter().map(|s| s.as_str()).collect();

    let result = run_script(&dir.path().join("test.db"), &script_refs);

    let mut expected: Vec<String> = vec!["db > Executed.".to_string(); 14];
    expected.push("db > Tree:".to_string());
    expected.push("internal (size 1)".to_string());
    expected.push("  leaf (size 7)".to_string());
    for i in 0..7 {
        expected.push(format!("    - {} : {}", i, i + 1));
    }
    expected.push("  key 7".to_string());
    expected.push("  leaf (size 7)".to_string());
    for i in 0..7 {
        expected.push(format!("    - {} : {}", i, i + 8));
    }
    expected.push("db > ".to_string());

    assert_eq!(result, expected);
}

#[test]
fn select_on_empty_table_prints_only_executed() {
    let dir = tempdir().unwrap();
    let result = run_script(&dir.path().join("test.db"), &["select", ".exit"]);

    assert_eq!(result, vec!["db > Executed.", "db > "]);
}

#[test]
fn missing_database_path_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_unodb"))
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run unodb");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing database file path"));
}

#[test]
fn corrupt_file_length_is_a_startup_error() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    std::fs::write(&db_path, vec![0u8; 100]).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_unodb"))
        .arg(&db_path)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run unodb");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open database"));
}

//! Integration tests for the `prep` CLI.
//!
//! Each test works in a temp directory, runs `prep` as a subprocess
//! against a deck file there, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `prep` binary.
fn prep_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("prep");
    path
}

/// Run `prep` with the given args in the given directory, returning (stdout, stderr, success).
fn run_prep(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(prep_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run prep");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `prep` expecting success, return stdout.
fn run_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_prep(dir, args);
    if !success {
        panic!(
            "prep {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Seed a deck with four cards A..D in manual order.
fn seed_abcd(dir: &Path) {
    for q in ["A", "B", "C", "D"] {
        run_ok(dir, &["add", q]);
    }
}

/// The questions in listed order.
fn listed_questions(dir: &Path) -> Vec<String> {
    run_ok(dir, &["list", "--questions-only"])
        .lines()
        .skip(1) // header line
        .map(|l| {
            l.splitn(2, ". ")
                .nth(1)
                .unwrap_or("")
                .trim_start_matches("[*] ")
                .to_string()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Basics
// ---------------------------------------------------------------------------

#[test]
fn first_run_lists_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["list"]);
    assert!(out.contains("no cards in this view"));
}

#[test]
fn add_and_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "What is Rust?", "--answer", "A language"]);
    let out = run_ok(tmp.path(), &["list"]);
    assert!(out.contains("1. What is Rust?"));
    assert!(out.contains("> A language"));
}

#[test]
fn add_reports_position() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "first"]);
    let out = run_ok(tmp.path(), &["add", "second"]);
    assert!(out.contains("position 2"));
}

#[test]
fn batch_adds_one_card_per_line() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("qs.txt"), "one\n\n  two  \nthree\n").unwrap();
    let out = run_ok(tmp.path(), &["batch", "qs.txt"]);
    assert!(out.contains("added 3 cards"));
    assert_eq!(listed_questions(tmp.path()), vec!["one", "two", "three"]);
}

#[test]
fn batch_rejects_blank_input() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("qs.txt"), "  \n\n").unwrap();
    let (_, stderr, success) = run_prep(tmp.path(), &["batch", "qs.txt"]);
    assert!(!success);
    assert!(stderr.contains("no questions"));
}

#[test]
fn edit_changes_question_and_answer() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "typo"]);
    run_ok(
        tmp.path(),
        &["edit", "1", "--question", "fixed", "--answer", "ans"],
    );
    let out = run_ok(tmp.path(), &["list"]);
    assert!(out.contains("fixed"));
    assert!(out.contains("> ans"));
}

#[test]
fn edit_out_of_range_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_prep(tmp.path(), &["edit", "3", "--question", "x"]);
    assert!(!success);
    assert!(stderr.contains("no card at position 3"));
}

#[test]
fn list_json_has_positions_and_fields() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "q1", "--answer", "a1"]);
    let out = run_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["position"], 1);
    assert_eq!(arr[0]["question"], "q1");
    assert_eq!(arr[0]["company"], "Company 1");
}

// ---------------------------------------------------------------------------
// Pinning and sort modes
// ---------------------------------------------------------------------------

#[test]
fn pinned_cards_float_to_the_top() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    run_ok(tmp.path(), &["pin", "3"]);
    assert_eq!(listed_questions(tmp.path()), vec!["C", "A", "B", "D"]);

    // Toggling again restores manual order.
    run_ok(tmp.path(), &["pin", "1"]);
    assert_eq!(listed_questions(tmp.path()), vec!["A", "B", "C", "D"]);
}

#[test]
fn alphabetical_sort_is_a_view_not_an_edit() {
    let tmp = tempfile::TempDir::new().unwrap();
    for q in ["banana", "apple", "cherry"] {
        run_ok(tmp.path(), &["add", q]);
    }
    run_ok(tmp.path(), &["sort", "alphabetical"]);
    assert_eq!(
        listed_questions(tmp.path()),
        vec!["apple", "banana", "cherry"]
    );
    run_ok(tmp.path(), &["sort", "default"]);
    assert_eq!(
        listed_questions(tmp.path()),
        vec!["banana", "apple", "cherry"]
    );
}

#[test]
fn unknown_sort_mode_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_prep(tmp.path(), &["sort", "upside-down"]);
    assert!(!success);
    assert!(stderr.contains("unknown sort mode"));
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

#[test]
fn mv_single_card_after() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    // Drag B past D.
    run_ok(tmp.path(), &["mv", "2", "--after", "4"]);
    assert_eq!(listed_questions(tmp.path()), vec!["A", "C", "D", "B"]);
}

#[test]
fn mv_block_before() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    // A and C dropped before D land as a contiguous block.
    run_ok(tmp.path(), &["mv", "1", "3", "--before", "4"]);
    assert_eq!(listed_questions(tmp.path()), vec!["B", "A", "C", "D"]);
}

#[test]
fn mv_to_end() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    run_ok(tmp.path(), &["mv", "1", "--end"]);
    assert_eq!(listed_questions(tmp.path()), vec!["B", "C", "D", "A"]);
}

#[test]
fn mv_onto_itself_is_a_no_op() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    let out = run_ok(tmp.path(), &["mv", "2", "--before", "3"]);
    assert!(out.contains("no change"));
    assert_eq!(listed_questions(tmp.path()), vec!["A", "B", "C", "D"]);
}

#[test]
fn mv_requires_default_sort() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    run_ok(tmp.path(), &["sort", "alphabetical"]);
    let (_, stderr, success) = run_prep(tmp.path(), &["mv", "1", "--end"]);
    assert!(!success);
    assert!(stderr.contains("default sort"));
}

#[test]
fn mv_requires_a_target() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    let (_, stderr, success) = run_prep(tmp.path(), &["mv", "1"]);
    assert!(!success);
    assert!(stderr.contains("--before"));
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

#[test]
fn rm_moves_to_trash_and_restore_brings_back() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    run_ok(tmp.path(), &["rm", "1", "3"]);
    assert_eq!(listed_questions(tmp.path()), vec!["B", "D"]);

    let trash = run_ok(tmp.path(), &["trash", "list"]);
    assert!(trash.contains("A"));
    assert!(trash.contains("C"));

    run_ok(tmp.path(), &["trash", "restore", "1"]);
    assert_eq!(listed_questions(tmp.path()), vec!["A", "B", "D"]);
}

#[test]
fn trash_empty_is_permanent() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    run_ok(tmp.path(), &["rm", "1"]);
    run_ok(tmp.path(), &["trash", "empty"]);
    let trash = run_ok(tmp.path(), &["trash", "list"]);
    assert!(trash.contains("trash is empty"));
    // And undo cannot resurrect it: trash is outside history.
    run_ok(tmp.path(), &["undo"]);
    let listed = listed_questions(tmp.path());
    assert!(!listed.contains(&"A".to_string()));
}

// ---------------------------------------------------------------------------
// Companies and folders
// ---------------------------------------------------------------------------

#[test]
fn company_add_rename_and_switch() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["company", "add", "Initech"]);
    run_ok(tmp.path(), &["use", "--company", "Initech"]);
    run_ok(tmp.path(), &["add", "only here"]);

    run_ok(tmp.path(), &["use", "--company", "all"]);
    assert_eq!(listed_questions(tmp.path()), vec!["only here"]);

    run_ok(tmp.path(), &["company", "rename", "Initech", "Globex"]);
    let out = run_ok(tmp.path(), &["company", "list"]);
    assert!(out.contains("Globex"));
    assert!(!out.contains("Initech"));
}

#[test]
fn deleting_a_company_cascades_its_cards_to_the_trash() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["use", "--company", "Company 1"]);
    for q in ["x", "y", "z"] {
        run_ok(tmp.path(), &["add", q]);
    }
    run_ok(tmp.path(), &["company", "rm", "Company 1"]);

    let companies = run_ok(tmp.path(), &["company", "list"]);
    assert!(!companies.contains("Company 1"));
    let trash = run_ok(tmp.path(), &["trash", "list"]);
    for q in ["x", "y", "z"] {
        assert!(trash.contains(q));
    }
    // Filter fell back to the all-companies view.
    let out = run_ok(tmp.path(), &["list"]);
    assert!(out.contains("company: all"));
}

#[test]
fn duplicating_a_company_copies_its_cards() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["use", "--company", "Company 1"]);
    seed_abcd(tmp.path());
    run_ok(tmp.path(), &["company", "dup", "Company 1"]);

    let companies = run_ok(tmp.path(), &["company", "list"]);
    assert!(companies.contains("Company 1 (copy)"));
    // The dup switches the view to the copy, same cards in the same order.
    assert_eq!(listed_questions(tmp.path()), vec!["A", "B", "C", "D"]);
}

#[test]
fn folder_scoping() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["use", "--company", "Company 1"]);
    run_ok(tmp.path(), &["folder", "add", "Graphs"]);
    run_ok(tmp.path(), &["add", "unfiled"]);
    run_ok(tmp.path(), &["use", "--folder", "Graphs"]);
    run_ok(tmp.path(), &["add", "filed"]);

    assert_eq!(listed_questions(tmp.path()), vec!["filed"]);
    run_ok(tmp.path(), &["use", "--folder", "all"]);
    assert_eq!(listed_questions(tmp.path()), vec!["unfiled", "filed"]);
}

// ---------------------------------------------------------------------------
// Undo / redo
// ---------------------------------------------------------------------------

#[test]
fn undo_and_redo_across_invocations() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "first"]);
    run_ok(tmp.path(), &["add", "second"]);

    run_ok(tmp.path(), &["undo"]);
    assert_eq!(listed_questions(tmp.path()), vec!["first"]);

    run_ok(tmp.path(), &["redo"]);
    assert_eq!(listed_questions(tmp.path()), vec!["first", "second"]);
}

#[test]
fn undo_at_the_bottom_says_so() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "only"]);
    // One snapshot exists; there is nothing older to restore.
    let out = run_ok(tmp.path(), &["undo"]);
    assert!(out.contains("nothing to undo"));
    assert_eq!(listed_questions(tmp.path()), vec!["only"]);
}

#[test]
fn new_edit_truncates_the_redo_future() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "a"]);
    run_ok(tmp.path(), &["add", "b"]);
    run_ok(tmp.path(), &["undo"]);
    run_ok(tmp.path(), &["add", "c"]);

    let out = run_ok(tmp.path(), &["redo"]);
    assert!(out.contains("nothing to redo"));
    assert_eq!(listed_questions(tmp.path()), vec!["a", "c"]);
}

// ---------------------------------------------------------------------------
// Export and practice
// ---------------------------------------------------------------------------

#[test]
fn export_questions_only() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "q1", "--answer", "a1"]);
    run_ok(tmp.path(), &["add", "q2"]);
    run_ok(tmp.path(), &["export", "out.txt", "--questions-only"]);
    let text = fs::read_to_string(tmp.path().join("out.txt")).unwrap();
    assert_eq!(text, "q1\n\nq2\n\n");
}

#[test]
fn export_full_interleaves_answers() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "q1", "--answer", "a1"]);
    run_ok(tmp.path(), &["export", "out.txt"]);
    let text = fs::read_to_string(tmp.path().join("out.txt")).unwrap();
    assert_eq!(text, "q1\na1\n\n");
}

#[test]
fn practice_prints_each_question_once() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed_abcd(tmp.path());
    let out = run_ok(tmp.path(), &["practice"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    for q in ["A", "B", "C", "D"] {
        assert!(out.contains(q));
    }
}

#[test]
fn practice_with_no_questions_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_prep(tmp.path(), &["practice"]);
    assert!(!success);
    assert!(stderr.contains("no cards with a question"));
}

// ---------------------------------------------------------------------------
// Deck file flag
// ---------------------------------------------------------------------------

#[test]
fn file_flag_picks_the_deck() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["-C", "work.json", "add", "work question"]);
    run_ok(tmp.path(), &["add", "default question"]);

    assert!(tmp.path().join("work.json").exists());
    assert!(tmp.path().join("prepdeck.json").exists());

    let out = run_ok(tmp.path(), &["-C", "work.json", "list"]);
    assert!(out.contains("work question"));
    assert!(!out.contains("default question"));
}

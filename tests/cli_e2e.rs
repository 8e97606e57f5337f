//! End-to-end CLI tests for the passvet binary.
//!
//! All runs use `--offline` with a temp cache directory so no network is
//! touched; the dictionary comes only from seeded files.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn passvet() -> Command {
    Command::cargo_bin("passvet").expect("binary should build")
}

fn seed_wordlist(cache_dir: &TempDir, contents: &str) {
    let subdir = cache_dir.path().join("wordlists");
    std::fs::create_dir_all(&subdir).expect("failed to create subdir");
    std::fs::write(subdir.join("seeded.txt"), contents).expect("failed to seed wordlist");
}

#[test]
fn test_strong_password_accepted_with_empty_cache() {
    let cache_dir = TempDir::new().expect("failed to create temp dir");

    passvet()
        .args(["--offline", "-q", "-d"])
        .arg(cache_dir.path())
        .arg("Vs@2Jdnw@i1oxna*@X")
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted"));
}

#[test]
fn test_short_password_rejected_at_length_gate() {
    let cache_dir = TempDir::new().expect("failed to create temp dir");

    passvet()
        .args(["--offline", "-q", "-d"])
        .arg(cache_dir.path())
        .arg("Vs@2J")
        .assert()
        .failure()
        .stdout(predicate::str::contains("rejected: length"));
}

#[test]
fn test_sequential_run_rejected() {
    let cache_dir = TempDir::new().expect("failed to create temp dir");

    passvet()
        .args(["--offline", "-q", "-d"])
        .arg(cache_dir.path())
        .arg("VWX@2Jdnw@i1oxna*@X")
        .assert()
        .failure()
        .stdout(predicate::str::contains("rejected: sequential-run"));
}

#[test]
fn test_low_diversity_rejected() {
    let cache_dir = TempDir::new().expect("failed to create temp dir");

    passvet()
        .args(["--offline", "-q", "-d"])
        .arg(cache_dir.path())
        .arg("VsJdnwioxnaX")
        .assert()
        .failure()
        .stdout(predicate::str::contains("rejected: character-diversity"));
}

#[test]
fn test_seeded_dictionary_word_rejected_offline() {
    let cache_dir = TempDir::new().expect("failed to create temp dir");
    seed_wordlist(&cache_dir, "monkey\ndragon\n");

    passvet()
        .args(["--offline", "-q", "-d"])
        .arg(cache_dir.path())
        .arg("V@2monkey*X1T@q*")
        .assert()
        .failure()
        .stdout(predicate::str::contains("rejected: dictionary-word"));
}

#[test]
fn test_missing_password_argument_is_usage_error() {
    passvet().arg("--offline").assert().failure().code(2);
}

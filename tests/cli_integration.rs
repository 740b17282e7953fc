//! Integration tests for the Lockbox CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`. The
//! master password comes from `LOCKBOX_PASSWORD` so nothing prompts.
//! `init` derives with the full Argon2id costs, so each test creates at
//! most one vault.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "correct-horse";

/// Helper: get a Command pointing at the lockbox binary.
fn lockbox() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lockbox").expect("binary should exist")
}

/// Helper: a command running inside `dir` with the master password set.
fn lockbox_in(dir: &TempDir, password: &str) -> Command {
    let mut cmd = lockbox();
    cmd.current_dir(dir.path())
        .env("LOCKBOX_PASSWORD", password)
        .env_remove("LOCKBOX_LOG");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    lockbox()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn version_flag_shows_version() {
    lockbox()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lockbox"));
}

#[test]
fn no_args_shows_help() {
    lockbox()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn list_on_missing_vault_fails() {
    let tmp = TempDir::new().unwrap();
    lockbox_in(&tmp, PASSWORD)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not been initialized"));
}

#[test]
fn init_rejects_short_password() {
    let tmp = TempDir::new().unwrap();
    lockbox_in(&tmp, "short")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[test]
fn init_rejects_unknown_cipher() {
    let tmp = TempDir::new().unwrap();
    lockbox_in(&tmp, PASSWORD)
        .args(["init", "--cipher", "rot13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown cipher"));
}

#[test]
fn edit_without_fields_fails_before_unlocking() {
    let tmp = TempDir::new().unwrap();
    lockbox_in(&tmp, PASSWORD)
        .args(["edit", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn full_entry_lifecycle() {
    let tmp = TempDir::new().unwrap();

    lockbox_in(&tmp, PASSWORD)
        .args(["init", "--cipher", "xchacha20-poly1305"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault created"))
        .stdout(predicate::str::contains("xchacha20-poly1305"));
    assert!(tmp.path().join("vault.db").exists());

    // A second init must not overwrite the key material.
    lockbox_in(&tmp, PASSWORD)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    lockbox_in(&tmp, PASSWORD)
        .args(["add", "Email", "--username", "me@x.com"])
        .write_stdin("s3cr3t\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added entry 1"));

    lockbox_in(&tmp, PASSWORD)
        .args(["add", "Bank", "-u", "acct1", "-p", "p@ss"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added entry 2"));

    lockbox_in(&tmp, PASSWORD)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Email"))
        .stdout(predicate::str::contains("Bank"))
        .stdout(predicate::str::contains("s3cr3t").not());

    lockbox_in(&tmp, PASSWORD)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("me@x.com"))
        .stdout(predicate::str::contains("s3cr3t"));

    lockbox_in(&tmp, "wrong-password")
        .args(["show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"))
        .stdout(predicate::str::contains("s3cr3t").not());

    lockbox_in(&tmp, PASSWORD)
        .args(["edit", "2", "--password", "n3w"])
        .assert()
        .success()
        .stderr(predicate::str::contains("shell history"));

    lockbox_in(&tmp, PASSWORD)
        .args(["show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acct1"))
        .stdout(predicate::str::contains("n3w"));

    lockbox_in(&tmp, PASSWORD)
        .args(["edit", "2", "--password-prompt"])
        .write_stdin("piped-pass\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated entry 2"));

    lockbox_in(&tmp, PASSWORD)
        .args(["show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acct1"))
        .stdout(predicate::str::contains("piped-pass"));

    lockbox_in(&tmp, PASSWORD)
        .args(["edit", "9", "--title", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry 9 not found"));

    lockbox_in(&tmp, PASSWORD)
        .args(["delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry 1"));

    lockbox_in(&tmp, PASSWORD)
        .args(["delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to delete"));

    lockbox_in(&tmp, PASSWORD)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Email").not())
        .stdout(predicate::str::contains("Bank"));
}

#[test]
fn config_file_selects_vault_path() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".lockbox.toml"),
        "vault_path = \"nested/personal.db\"\n",
    )
    .unwrap();

    lockbox_in(&tmp, PASSWORD)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("aes-256-gcm"));
    assert!(tmp.path().join("nested/personal.db").exists());
}

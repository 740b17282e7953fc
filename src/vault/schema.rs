//! On-disk layout of a vault file.
//!
//! A vault is a SQLite database with two tables:
//!
//! - `meta`: key/value pairs. `salt` (16 bytes) and `keycheck` (64 bytes)
//!   exist iff the vault is initialized. `cipher` is optional; when absent
//!   the vault uses AES-256-GCM. Argon2id costs are fixed, never stored.
//! - `entries`: one row per record, every field an AEAD blob.
//!
//! `AUTOINCREMENT` keeps SQLite from ever handing out a deleted id again.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS meta (
    k TEXT PRIMARY KEY,
    v BLOB
);

CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title BLOB NOT NULL,
    username BLOB NOT NULL,
    password BLOB NOT NULL
);
";

pub const META_SALT: &str = "salt";
pub const META_KEYCHECK: &str = "keycheck";
pub const META_CIPHER: &str = "cipher";

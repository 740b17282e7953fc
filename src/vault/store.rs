//! The vault engine: an SQLite file holding ciphertext only.
//!
//! `Vault` owns the database connection. Unlocking yields a `Session`,
//! which every encrypting or decrypting operation takes explicitly, so
//! entry plaintext can only flow through a verified key.
//!
//! Every mutating call is its own SQLite transaction and is committed
//! before the call returns.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto::{
    constant_time_eq, derive_key_with_params, digest, generate_salt, Argon2Params, Cipher,
    CipherKind, DIGEST_LEN, KEY_LEN,
};
use crate::errors::{LockboxError, Result};

use super::entry::{EncryptedEntry, Entry};
use super::schema::{META_CIPHER, META_KEYCHECK, META_SALT, SCHEMA};
use super::session::Session;

/// Argon2id costs for every vault key. Never read from the file.
#[cfg(not(test))]
const VAULT_KDF: Argon2Params = Argon2Params::VAULT;

/// Unit tests run at the Argon2id floor.
#[cfg(test)]
const VAULT_KDF: Argon2Params = Argon2Params {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
};

/// An open vault file.
///
/// Open one with `Vault::open`, then either `initialize` it (new file)
/// or `unlock` it (existing file) to get a `Session`.
pub struct Vault {
    /// Path to the database file on disk.
    path: PathBuf,

    conn: Connection,

    /// Stored keycheck, cached so sessions can be matched to this file.
    keycheck: Option<Vec<u8>>,
}

impl Vault {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open (or create) the vault file at `path`.
    ///
    /// Creates the `meta` and `entries` tables if they are missing. No
    /// key material is touched.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        // Set restrictive permissions on the vault file (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        let mut vault = Self {
            path: path.to_path_buf(),
            conn,
            keycheck: None,
        };
        vault.keycheck = vault.meta(META_KEYCHECK)?;

        debug!(
            path = %vault.path.display(),
            initialized = vault.is_initialized(),
            "opened vault"
        );
        Ok(vault)
    }

    /// Initialize a fresh vault with AES-256-GCM.
    pub fn initialize(&mut self, password: &[u8]) -> Result<Session> {
        self.initialize_with(password, CipherKind::default())
    }

    /// Initialize a fresh vault with an explicit cipher.
    ///
    /// Generates a salt, derives the vault key with the fixed Argon2id
    /// costs, and writes `salt`, `keycheck` and `cipher` in one
    /// transaction. Fails with `AlreadyInitialized` if the file already
    /// has key material.
    pub fn initialize_with(&mut self, password: &[u8], kind: CipherKind) -> Result<Session> {
        if self.has_key_material()? {
            return Err(LockboxError::AlreadyInitialized(self.path.clone()));
        }

        let salt = generate_salt()?;
        let key = derive_key_with_params(password, &salt, KEY_LEN, &VAULT_KDF)?;
        let keycheck = digest(&key);
        let cipher = Cipher::new(kind, &key)?;
        // Wipe the raw key as soon as the cipher owns its copy.
        drop(key);

        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare("INSERT INTO meta (k, v) VALUES (?1, ?2)")?;
            insert.execute(params![META_SALT, salt])?;
            insert.execute(params![META_KEYCHECK, keycheck.as_slice()])?;
            insert.execute(params![META_CIPHER, kind.tag().as_bytes()])?;
        }
        tx.commit()?;

        self.keycheck = Some(keycheck.to_vec());
        debug!(path = %self.path.display(), cipher = %kind, "initialized vault");

        Ok(Session::new(cipher, keycheck))
    }

    /// Verify `password` against the stored keycheck.
    ///
    /// Returns `Ok(None)` for a wrong password; nothing about the vault
    /// changes. Errors are reserved for I/O, a missing or malformed meta
    /// table, and KDF failures. Entries are never decrypted to test the
    /// password.
    pub fn unlock(&self, password: &[u8]) -> Result<Option<Session>> {
        let salt = self
            .meta(META_SALT)?
            .ok_or_else(|| LockboxError::NotInitialized(self.path.clone()))?;
        let stored = self
            .meta(META_KEYCHECK)?
            .ok_or_else(|| LockboxError::NotInitialized(self.path.clone()))?;
        let kind = self.cipher()?;

        let key = derive_key_with_params(password, &salt, KEY_LEN, &VAULT_KDF)?;
        let candidate: [u8; DIGEST_LEN] = digest(&key);

        if !constant_time_eq(&candidate, &stored) {
            warn!(path = %self.path.display(), "unlock rejected");
            return Ok(None);
        }

        let cipher = Cipher::new(kind, &key)?;
        drop(key);

        debug!(path = %self.path.display(), cipher = %kind, "unlocked vault");
        Ok(Some(Session::new(cipher, candidate)))
    }

    /// Close the underlying database connection.
    ///
    /// Sessions are independent values; drop them to wipe the key.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| LockboxError::Database(e))?;
        debug!(path = %path.display(), "closed vault");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Encrypt the three fields independently and insert a new row.
    ///
    /// Returns the new entry id.
    pub fn add_entry(
        &mut self,
        session: &Session,
        title: &str,
        username: &str,
        password: &str,
    ) -> Result<i64> {
        self.check_session(session)?;

        let enc_title = session.encrypt_field(title)?;
        let enc_username = session.encrypt_field(username)?;
        let enc_password = session.encrypt_field(password)?;

        self.conn.execute(
            "INSERT INTO entries (title, username, password) VALUES (?1, ?2, ?3)",
            params![enc_title, enc_username, enc_password],
        )?;
        let id = self.conn.last_insert_rowid();

        debug!(id, "added entry");
        Ok(id)
    }

    /// All rows as stored, in insertion order.
    ///
    /// Needs no session: the result is ciphertext.
    pub fn list_entries(&self) -> Result<Vec<EncryptedEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, username, password FROM entries ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(EncryptedEntry {
                id: row.get(0)?,
                title: row.get(1)?,
                username: row.get(2)?,
                password: row.get(3)?,
            })
        })?;

        let entries = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), "listed entries");
        Ok(entries)
    }

    /// A single stored row, if present.
    pub fn get_entry(&self, id: i64) -> Result<Option<EncryptedEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT id, title, username, password FROM entries WHERE id = ?1",
                params![id],
                |row| {
                    Ok(EncryptedEntry {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        username: row.get(2)?,
                        password: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    /// Decrypt one field blob from `list_entries`.
    ///
    /// `Format` and `Integrity` failures are returned as-is; see
    /// `decrypt_record` for the listing policy.
    pub fn decrypt_entry(&self, session: &Session, ciphertext: &[u8]) -> Result<String> {
        self.check_session(session)?;
        session.decrypt_field(ciphertext)
    }

    /// Decrypt a whole row.
    ///
    /// A row whose ciphertext is malformed or fails authentication comes
    /// back as `Entry::corrupted` so the rest of a listing stays usable.
    /// Any other failure is returned.
    pub fn decrypt_record(&self, session: &Session, record: &EncryptedEntry) -> Result<Entry> {
        self.check_session(session)?;

        match decrypt_fields(session, record) {
            Ok(entry) => Ok(entry),
            Err(e) if e.is_corrupt_record() => {
                warn!(id = record.id, error = %e, "failed to decrypt entry");
                Ok(Entry::corrupted(record.id))
            }
            Err(e) => Err(e),
        }
    }

    /// Every row, decrypted, in insertion order.
    pub fn decrypted_entries(&self, session: &Session) -> Result<Vec<Entry>> {
        self.list_entries()?
            .iter()
            .map(|record| self.decrypt_record(session, record))
            .collect()
    }

    /// Re-encrypt all three fields of an existing row.
    ///
    /// Fails with `EntryNotFound` if no row has this id.
    pub fn edit_entry(
        &mut self,
        session: &Session,
        id: i64,
        title: &str,
        username: &str,
        password: &str,
    ) -> Result<()> {
        self.check_session(session)?;

        let enc_title = session.encrypt_field(title)?;
        let enc_username = session.encrypt_field(username)?;
        let enc_password = session.encrypt_field(password)?;

        let changed = self.conn.execute(
            "UPDATE entries SET title = ?1, username = ?2, password = ?3 WHERE id = ?4",
            params![enc_title, enc_username, enc_password, id],
        )?;
        if changed == 0 {
            return Err(LockboxError::EntryNotFound(id));
        }

        debug!(id, "edited entry");
        Ok(())
    }

    /// Remove a row. Deleting a missing id is not an error.
    ///
    /// Returns `true` if a row was removed.
    pub fn delete_entry(&mut self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        debug!(id, removed, "deleted entry");
        Ok(removed > 0)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once `salt` and `keycheck` have been written.
    pub fn is_initialized(&self) -> bool {
        self.keycheck.is_some()
    }

    /// AEAD scheme recorded for this vault. Files without a `cipher` row
    /// use AES-256-GCM.
    pub fn cipher(&self) -> Result<CipherKind> {
        match self.meta(META_CIPHER)? {
            None => Ok(CipherKind::default()),
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(CipherKind::from_tag)
                .ok_or_else(|| {
                    LockboxError::Format(format!(
                        "unknown cipher '{}' in vault meta",
                        String::from_utf8_lossy(&raw)
                    ))
                }),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn meta(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT v FROM meta WHERE k = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn has_key_material(&self) -> Result<bool> {
        Ok(self.meta(META_SALT)?.is_some() || self.meta(META_KEYCHECK)?.is_some())
    }

    /// Refuse sessions that were unlocked against a different key.
    fn check_session(&self, session: &Session) -> Result<()> {
        match &self.keycheck {
            Some(stored) if constant_time_eq(stored, session.keycheck()) => Ok(()),
            _ => Err(LockboxError::Precondition(
                "session does not belong to this vault".into(),
            )),
        }
    }
}

/// Decrypt all three fields of a row. Fields already decrypted are wiped
/// if a later one fails.
fn decrypt_fields(session: &Session, record: &EncryptedEntry) -> Result<Entry> {
    let mut title = Zeroizing::new(session.decrypt_field(&record.title)?);
    let mut username = Zeroizing::new(session.decrypt_field(&record.username)?);
    let password = session.decrypt_field(&record.password)?;
    Ok(Entry::new(
        record.id,
        std::mem::take(&mut *title),
        std::mem::take(&mut *username),
        password,
    ))
}

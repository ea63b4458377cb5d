//! # File I/O Module
//!
//! Reading batch requests and writing outputs with safety features:
//! - **Atomic writes**: Write to .tmp, sync, rename so a reader never sees a
//!   half-written workbook
//! - **File locking**: Refuse to overwrite an output another user is writing
//! - **Version validation**: Requests carrying a `version` are checked
//!
//! Lock files sit next to the output with a `.lock` suffix and record who
//! holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rc_core::file_io::{load_request, save_bytes};
//! use rc_core::report::workbook::build_workbook;
//! use std::path::Path;
//!
//! let request = load_request(Path::new("beams.json"))?;
//! let workbook = build_workbook(&request);
//! save_bytes(&workbook.to_xlsx()?, Path::new("beams.xlsx"))?;
//! # Ok::<(), rc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::batch::BatchRequest;
use crate::errors::{CalcError, CalcResult};

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (login name)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Login name of the current user, for lock metadata
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "rc_check".to_string())
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both an OS-level lock (via fs2) and a `.lock` file with metadata
/// that other users can read.
pub struct FileLock {
    /// Path to the guarded file
    target_path: PathBuf,
    /// Path to the lock file
    lock_path: PathBuf,
    /// The underlying file handle (keeps OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a file.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(CalcError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(CalcError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                debug!(path = %lock_path.display(), "taking over stale lock");
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info)?;

        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file
            .sync_all()
            .map_err(|e| CalcError::file_error("sync lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(FileLock {
            target_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Path of the guarded file
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        // OS lock is released when _lock_file is dropped
    }
}

/// Path with `suffix` appended to its extension (`out.json` → `out.json.lock`)
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut target = path.to_path_buf();
    let extension = target
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    target.set_extension(extension);
    target
}

fn lock_path_for(path: &Path) -> PathBuf {
    with_suffix(path, "lock")
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    Ok(serde_json::from_str(&contents)?)
}

/// A lock is stale when its process is gone or it is more than a day old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

fn read_to_string(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write bytes with atomic replace semantics.
///
/// 1. Write to a temporary sibling (`<name>.tmp`)
/// 2. Sync to disk (fsync)
/// 3. Rename over the target (atomic on most filesystems)
pub fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = with_suffix(path, "tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents)
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Serialize `value` as pretty JSON and write it atomically under a lock.
///
/// # Returns
///
/// * `Err(CalcError::FileLocked)` - Another user is writing the same file
/// * `Err(CalcError::FileError)` - I/O error
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    save_bytes(json.as_bytes(), path)
}

/// Write `contents` atomically under a lock.
pub fn save_bytes(contents: &[u8], path: &Path) -> CalcResult<()> {
    let _lock = FileLock::acquire(path, current_user())?;
    write_atomic(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "wrote output file");
    Ok(())
}

/// Load and validate a batch request from a file.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - Request version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_request(path: &Path) -> CalcResult<BatchRequest> {
    let contents = read_to_string(path, "open")?;
    let request: BatchRequest = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;
    request.validate()?;
    debug!(path = %path.display(), rows = request.rows.len(), "loaded request");
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("rc_check_test_{}.json", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/path/to/out.json"));
        assert_eq!(lock_path, Path::new("/path/to/out.json.lock"));
        let bare = lock_path_for(Path::new("/path/to/out"));
        assert_eq!(bare, Path::new("/path/to/out.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("engineer");
        assert_eq!(info.user_id, "engineer");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_request() {
        let path = temp_path("request_roundtrip");
        let request = BatchRequest {
            rows: vec![json!({"Mu": 450, "H": 600, "B": 400, "Dc": 60, "as_num": 6})],
            ..Default::default()
        };
        save_json(&request, &path).unwrap();

        let loaded = load_request(&path).unwrap();
        assert_eq!(loaded.rows.len(), 1);
        assert_eq!(loaded.material.fck, 35.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let path = temp_path("atomic");
        write_atomic(&path, b"{}").unwrap();
        assert!(!with_suffix(&path, "tmp").exists());
        assert!(path.exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_path("lock");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "engineer").unwrap();
        assert_eq!(lock.info.user_id, "engineer");
        assert_eq!(lock.target_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_bytes_respects_lock() {
        let path = temp_path("save_bytes");
        save_bytes(b"PK", &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"PK");

        let held = FileLock::acquire(&path, "someone-else").unwrap();
        let err = save_bytes(b"PK2", &path).unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        drop(held);

        save_bytes(b"PK3", &path).unwrap();
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_path("newer_schema");
        write_atomic(&path, br#"{"version": "0.9.0", "rows": []}"#).unwrap();
        let err = load_request(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_request(Path::new("/nonexistent/rc_check/request.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}

//! Persistence of the todo list in a key-value storage surface.
//!
//! The whole list lives under a single key as a JSON array of
//! `{"id": number, "text": string, "completed": bool}` objects. It is read
//! once at startup and overwritten wholesale after every mutation.

use crate::types::Todo;
use composable_todo_core::environment::{KeyValueStorage, StorageError};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Storage key holding the serialized list
pub const STORAGE_KEY: &str = "todos";

/// Errors raised while writing the list
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The storage backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The list could not be serialized
    #[error("Failed to serialize todos: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Load the stored list
///
/// A missing key, a JSON `null`, or an unparseable value all yield an empty
/// list; the latter is logged. Records repeating an earlier id are dropped so
/// ids stay unique.
///
/// # Errors
///
/// Returns [`StorageError`] if the backend cannot be read.
pub fn load_todos(storage: &dyn KeyValueStorage) -> Result<Vec<Todo>, StorageError> {
    let Some(raw) = storage.get_item(STORAGE_KEY)? else {
        tracing::debug!("No stored todos, starting empty");
        return Ok(Vec::new());
    };

    let todos = match serde_json::from_str::<Option<Vec<Todo>>>(&raw) {
        Ok(todos) => todos.unwrap_or_default(),
        Err(error) => {
            tracing::warn!(%error, "Stored todos are corrupted, starting empty");
            return Ok(Vec::new());
        },
    };

    let mut seen = HashSet::with_capacity(todos.len());
    let total = todos.len();
    let todos: Vec<Todo> = todos.into_iter().filter(|t| seen.insert(t.id)).collect();
    if todos.len() < total {
        tracing::warn!(
            dropped = total - todos.len(),
            "Dropped stored todos with duplicate ids"
        );
    }

    Ok(todos)
}

/// Overwrite the stored list with `todos`
///
/// # Errors
///
/// Returns [`PersistenceError`] if serialization or the storage write fails.
pub fn save_todos(storage: &dyn KeyValueStorage, todos: &[Todo]) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(todos)?;
    storage.set_item(STORAGE_KEY, &raw)?;
    tracing::trace!(count = todos.len(), "Saved todos");
    Ok(())
}

/// Orders list writes so an older snapshot never replaces a newer one
///
/// A ticket is drawn when the snapshot is taken, which happens under the
/// store's write lock, so tickets follow mutation order. Writes run one at a
/// time and a write holding an older ticket than the last landed one is
/// skipped.
#[derive(Debug, Default)]
pub struct WriteSequencer {
    issued: AtomicU64,
    landed: Mutex<u64>,
}

impl WriteSequencer {
    /// Creates a sequencer with nothing written yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the position of the next snapshot
    pub fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Write `todos` unless a newer snapshot already landed
    ///
    /// Returns whether the write happened. Blocks while another write runs.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the write fails; the ticket then does
    /// not count as landed.
    pub fn save(
        &self,
        ticket: u64,
        storage: &dyn KeyValueStorage,
        todos: &[Todo],
    ) -> Result<bool, PersistenceError> {
        let mut landed = self.landed.lock().unwrap_or_else(PoisonError::into_inner);
        if *landed > ticket {
            tracing::debug!(ticket, landed = *landed, "Skipping stale todo snapshot");
            return Ok(false);
        }

        save_todos(storage, todos)?;
        *landed = ticket;
        Ok(true)
    }
}

/// Key-value storage backed by one file per key
///
/// A key `k` lives in `<dir>/k.json`. Keys are limited to ASCII letters,
/// digits, `-` and `_`. Writes go to a temporary file that is then renamed
/// over the target, so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// Directory holding the stored values
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use composable_todo_testing::mocks::{FailingStorage, InMemoryStorage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn todo(id: u64, text: &str, completed: bool) -> Todo {
        Todo {
            id: TodoId::new(id),
            text: text.to_string(),
            completed,
        }
    }

    fn scratch_dir() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        std::env::temp_dir().join(format!(
            "todo-storage-test-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ))
    }

    #[test]
    fn missing_key_loads_empty() {
        let storage = InMemoryStorage::new();
        assert!(load_todos(&storage).unwrap().is_empty());
    }

    #[test]
    fn null_loads_empty() {
        let storage = InMemoryStorage::with_item(STORAGE_KEY, "null");
        assert!(load_todos(&storage).unwrap().is_empty());
    }

    #[test]
    fn corrupted_value_loads_empty() {
        let storage = InMemoryStorage::with_item(STORAGE_KEY, "{not json");
        assert!(load_todos(&storage).unwrap().is_empty());
    }

    #[test]
    fn loads_browser_written_list() {
        let raw = r#"[{"id":1700000000000,"text":"Buy milk","completed":false},
                      {"id":1700000000500,"text":"Walk dog","completed":true}]"#;
        let storage = InMemoryStorage::with_item(STORAGE_KEY, raw);

        let todos = load_todos(&storage).unwrap();

        assert_eq!(
            todos,
            vec![
                todo(1_700_000_000_000, "Buy milk", false),
                todo(1_700_000_000_500, "Walk dog", true),
            ]
        );
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let raw = r#"[{"id":1,"text":"A","completed":false},
                      {"id":1,"text":"B","completed":true},
                      {"id":2,"text":"C","completed":false}]"#;
        let storage = InMemoryStorage::with_item(STORAGE_KEY, raw);

        let todos = load_todos(&storage).unwrap();

        assert_eq!(todos, vec![todo(1, "A", false), todo(2, "C", false)]);
    }

    #[test]
    fn read_failure_propagates() {
        let storage = FailingStorage::new("locked");
        assert!(matches!(
            load_todos(&storage),
            Err(StorageError::Unavailable(_))
        ));
    }

    #[test]
    fn save_then_load_reproduces_list() {
        let storage = InMemoryStorage::new();
        let todos = vec![todo(3, "C", true), todo(1, "A", false)];

        save_todos(&storage, &todos).unwrap();

        assert_eq!(load_todos(&storage).unwrap(), todos);
        assert_eq!(
            storage.item(STORAGE_KEY).as_deref(),
            Some(r#"[{"id":3,"text":"C","completed":true},{"id":1,"text":"A","completed":false}]"#)
        );
    }

    #[test]
    fn save_failure_is_reported() {
        let storage = FailingStorage::new("quota exceeded");
        let err = save_todos(&storage, &[todo(1, "A", false)]).unwrap_err();
        assert!(matches!(err, PersistenceError::Storage(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = scratch_dir();
        let storage = FileStorage::open(&dir).unwrap();

        assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);

        storage.set_item(STORAGE_KEY, "[]").unwrap();
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert!(dir.join("todos.json").exists());

        storage.set_item(STORAGE_KEY, "[1]").unwrap();
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("[1]"));

        assert!(!dir.join(".todos.json.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn sequencer_skips_stale_snapshot() {
        let storage = InMemoryStorage::new();
        let writes = WriteSequencer::new();
        let older = writes.ticket();
        let newer = writes.ticket();

        assert!(writes.save(newer, &storage, &[todo(1, "new", false)]).unwrap());
        assert!(!writes.save(older, &storage, &[todo(1, "old", false)]).unwrap());

        assert_eq!(load_todos(&storage).unwrap(), vec![todo(1, "new", false)]);
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn sequencer_retries_after_failed_write() {
        let writes = WriteSequencer::new();
        let first = writes.ticket();
        let second = writes.ticket();

        assert!(writes.save(second, &FailingStorage::new("disk full"), &[]).is_err());

        // The failed ticket never landed, so the earlier ticket still can
        let storage = InMemoryStorage::new();
        assert!(writes.save(first, &storage, &[]).unwrap());
        assert_eq!(storage.item(STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = scratch_dir();
        let storage = FileStorage::open(&dir).unwrap();

        for key in ["", "../etc", "a/b", "todos.json"] {
            assert!(matches!(
                storage.set_item(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = scratch_dir();
        let todos = vec![todo(1, "A", false)];

        save_todos(&FileStorage::open(&dir).unwrap(), &todos).unwrap();
        let reopened = FileStorage::open(&dir).unwrap();

        assert_eq!(load_todos(&reopened).unwrap(), todos);
        assert_eq!(reopened.dir(), dir.as_path());

        fs::remove_dir_all(&dir).unwrap();
    }
}

use std::{
    fmt::Debug,
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::*;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};

use crate::db::traits::StoreError;

/// What to do when a table file exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptionPolicy {
    /// Treat the table as empty. The next write replaces the malformed file. This keeps the service available after
    /// someone hand-edits a table badly.
    #[default]
    ResetToDefault,
    /// Surface [`StoreError::Corrupt`] to the caller.
    Fail,
}

/// The result of a read-modify-write closure passed to [`JsonTable::modify`].
pub enum Change<R> {
    /// The snapshot was changed and must be saved.
    Write(R),
    /// The snapshot was not changed. Nothing is written.
    Keep(R),
}

/// A whole-file JSON table.
///
/// The entire table is loaded into memory for every operation and written back in full. A per-table async mutex
/// serialises every load/save, so a [`modify`](Self::modify) cycle cannot interleave with any other access to the same
/// table. Saves go to a temporary sibling file that is then renamed over the table.
pub struct JsonTable<T> {
    name: &'static str,
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
    policy: CorruptionPolicy,
    _snapshot: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonTable<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            path: Arc::clone(&self.path),
            lock: Arc::clone(&self.lock),
            policy: self.policy,
            _snapshot: PhantomData,
        }
    }
}

impl<T> Debug for JsonTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonTable({}, {})", self.name, self.path.display())
    }
}

impl<T> JsonTable<T>
where T: Serialize + DeserializeOwned + Default
{
    /// Opens the table at `path`, creating the file with an empty snapshot if it does not exist yet.
    pub async fn open<P: AsRef<Path>>(
        name: &'static str,
        path: P,
        policy: CorruptionPolicy,
    ) -> Result<Self, StoreError> {
        let table = Self {
            name,
            path: Arc::new(path.as_ref().to_path_buf()),
            lock: Arc::new(Mutex::new(())),
            policy,
            _snapshot: PhantomData,
        };
        if fs::metadata(table.path.as_path()).await.is_err() {
            debug!("🗃️ Creating empty {name} table at {}", table.path.display());
            table.write_snapshot(&T::default()).await?;
        }
        Ok(table)
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Loads a full snapshot of the table.
    pub async fn load(&self) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_snapshot().await
    }

    /// Replaces the table with `snapshot`.
    pub async fn save(&self, snapshot: &T) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write_snapshot(snapshot).await
    }

    /// Runs one load-modify-save cycle while holding the table lock. The snapshot is only written back if `f` returns
    /// `Ok(Change::Write(_))`.
    pub async fn modify<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<Change<R>, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.read_snapshot().await?;
        match f(&mut snapshot)? {
            Change::Write(result) => {
                self.write_snapshot(&snapshot).await?;
                Ok(result)
            },
            Change::Keep(result) => Ok(result),
        }
    }

    async fn read_snapshot(&self) -> Result<T, StoreError> {
        let data = match fs::read(self.path.as_path()).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("🗃️ {} table file is missing. Using an empty table.", self.name);
                return Ok(T::default());
            },
            Err(e) => return Err(StoreError::Io { table: self.name.to_string(), reason: e.to_string() }),
        };
        match serde_json::from_slice::<T>(&data) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => match self.policy {
                CorruptionPolicy::ResetToDefault => {
                    warn!(
                        "🗃️ The {} table at {} is malformed ({e}). Continuing with an empty table; it will be \
                         overwritten on the next write.",
                        self.name,
                        self.path.display()
                    );
                    Ok(T::default())
                },
                CorruptionPolicy::Fail => {
                    Err(StoreError::Corrupt { table: self.name.to_string(), reason: e.to_string() })
                },
            },
        }
    }

    async fn write_snapshot(&self, snapshot: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::Serialization { table: self.name.to_string(), reason: e.to_string() })?;
        let tmp_path = self.path.with_extension("json.tmp");
        let io_err = |e: std::io::Error| StoreError::Io { table: self.name.to_string(), reason: e.to_string() };
        fs::write(&tmp_path, data).await.map_err(io_err)?;
        fs::rename(&tmp_path, self.path.as_path()).await.map_err(io_err)?;
        trace!("🗃️ {} table saved", self.name);
        Ok(())
    }
}

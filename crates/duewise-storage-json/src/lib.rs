use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use duewise_core::{CoreError, PayablesStore, PreferenceStore};
use duewise_domain::{Payable, PayableId, ReminderPreference};

const SNAPSHOT_SCHEMA_VERSION: u32 = 1;
const SNAPSHOT_FILE_NAME: &str = "payables.json";
const APP_DIR_NAME: &str = "duewise";
const TMP_SUFFIX: &str = "tmp";

/// On-disk shape of the whole payables snapshot. Every field defaults so
/// partial files from older builds still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    schema_version: u32,
    #[serde(default = "Utc::now")]
    saved_at: DateTime<Utc>,
    #[serde(default)]
    payables: Vec<Payable>,
    #[serde(default)]
    preference: ReminderPreference,
    #[serde(default)]
    enrolled: HashSet<PayableId>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            payables: Vec::new(),
            preference: ReminderPreference::default(),
            enrolled: HashSet::new(),
        }
    }
}

/// Filesystem-backed JSON persistence for payables, the reminder
/// preference, and the enrolled set. The whole snapshot lives in a single
/// file and is rewritten atomically on every change.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

impl JsonStore {
    /// Opens the snapshot at `path`, starting empty when the file does not
    /// exist yet. Rejects snapshots written by a newer schema.
    pub fn open(path: PathBuf) -> Result<Self, CoreError> {
        let state = match fs::read_to_string(&path) {
            Ok(data) => {
                let snapshot: Snapshot = serde_json::from_str(&data)
                    .map_err(|err| CoreError::Serde(err.to_string()))?;
                if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
                    return Err(CoreError::Storage(format!(
                        "snapshot `{}` uses schema version {}, newest supported is {}",
                        path.display(),
                        snapshot.schema_version,
                        SNAPSHOT_SCHEMA_VERSION
                    )));
                }
                snapshot
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Snapshot::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Opens the snapshot at the platform default location.
    pub fn open_default() -> Result<Self, CoreError> {
        Self::open(default_snapshot_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts or replaces a payable and persists the snapshot.
    pub fn upsert(&self, payable: Payable) -> Result<(), CoreError> {
        let mut state = self.lock_state();
        let mut next = state.clone();
        match next
            .payables
            .iter_mut()
            .find(|existing| existing.id == payable.id)
        {
            Some(slot) => *slot = payable,
            None => next.payables.push(payable),
        }
        self.commit(&mut state, next)
    }

    /// Removes a payable along with its enrollment.
    pub fn remove(&self, id: &PayableId) -> Result<(), CoreError> {
        let mut state = self.lock_state();
        let mut next = state.clone();
        next.payables.retain(|payable| &payable.id != id);
        next.enrolled.remove(id);
        self.commit(&mut state, next)
    }

    pub fn set_preference(&self, preference: ReminderPreference) -> Result<(), CoreError> {
        let mut state = self.lock_state();
        let mut next = state.clone();
        next.preference = preference;
        self.commit(&mut state, next)
    }

    pub fn enroll(&self, id: &PayableId) -> Result<(), CoreError> {
        let mut state = self.lock_state();
        let mut next = state.clone();
        next.enrolled.insert(id.clone());
        self.commit(&mut state, next)
    }

    pub fn disenroll(&self, id: &PayableId) -> Result<(), CoreError> {
        let mut state = self.lock_state();
        let mut next = state.clone();
        next.enrolled.remove(id);
        self.commit(&mut state, next)
    }

    fn lock_state(&self) -> MutexGuard<'_, Snapshot> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Writes `next` to disk and only then makes it the served snapshot. A
    /// failed write leaves the file and every subsequent read unchanged, so
    /// retrying the same mutation later still finds the old state.
    fn commit(&self, state: &mut Snapshot, mut next: Snapshot) -> Result<(), CoreError> {
        persist(&self.path, &mut next)?;
        *state = next;
        Ok(())
    }
}

impl PayablesStore for JsonStore {
    fn list_all(&self) -> Result<Vec<Payable>, CoreError> {
        Ok(self.lock_state().payables.clone())
    }

    fn get_by_id(&self, id: &PayableId) -> Result<Option<Payable>, CoreError> {
        let state = self.lock_state();
        Ok(state
            .payables
            .iter()
            .find(|payable| &payable.id == id)
            .cloned())
    }

    fn update(&self, payable: &Payable) -> Result<(), CoreError> {
        let mut state = self.lock_state();
        let mut next = state.clone();
        match next
            .payables
            .iter_mut()
            .find(|existing| existing.id == payable.id)
        {
            Some(slot) => {
                *slot = payable.clone();
                self.commit(&mut state, next)
            }
            None => Err(CoreError::PayableNotFound(payable.id.clone())),
        }
    }
}

impl PreferenceStore for JsonStore {
    fn reminder_preference(&self) -> Result<ReminderPreference, CoreError> {
        Ok(self.lock_state().preference)
    }

    fn enrolled_ids(&self) -> Result<HashSet<PayableId>, CoreError> {
        Ok(self.lock_state().enrolled.clone())
    }
}

/// Resolves the default snapshot location under the platform data
/// directory, falling back to the home directory and then the working
/// directory.
pub fn default_snapshot_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(SNAPSHOT_FILE_NAME)
}

fn persist(path: &Path, state: &mut Snapshot) -> Result<(), CoreError> {
    state.schema_version = SNAPSHOT_SCHEMA_VERSION;
    state.saved_at = Utc::now();
    let data =
        serde_json::to_string_pretty(state).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use railctl_core::{Decision, DecisionId, NewDecision, Station};

use crate::error::StoreError;
use crate::lockfile::Lockfile;
use crate::store::DecisionStore;

pub const STORE_DIR: &str = ".railctl";
const DECISIONS_DIR: &str = "decisions";
const CONFIG_FILE: &str = "config.json";
const STORE_VERSION: u32 = 1;

const LOCK_ATTEMPTS: u32 = 200;
const LOCK_DELAY: Duration = Duration::from_millis(5);
/// Lock files older than this were left by a writer that crashed.
const LOCK_STALE_AFTER: Duration = Duration::from_secs(30);

/// Document store: one JSON file per decision.
///
/// Layout is `<root>/.railctl/decisions/<id>.json`. New documents are
/// written through a temp file and renamed into place. Acknowledgement and
/// deletion take a per-document lock and re-read the document under it, so
/// concurrent acks on different stations are never lost.
pub struct FileStore {
    root: PathBuf,
    decisions_dir: PathBuf,
}

impl FileStore {
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let store_dir = root.join(STORE_DIR);

        if store_dir.exists() {
            return Err(StoreError::StoreExists(store_dir.display().to_string()));
        }

        fs::create_dir_all(store_dir.join(DECISIONS_DIR))?;

        let config = serde_json::json!({
            "version": STORE_VERSION,
            "created_at": Utc::now().to_rfc3339(),
        });
        fs::write(
            store_dir.join(CONFIG_FILE),
            serde_json::to_string_pretty(&config)?,
        )?;

        Ok(Self::at(root))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        if !root.join(STORE_DIR).is_dir() {
            return Err(StoreError::StoreNotFound(root.display().to_string()));
        }
        let store = Self::at(root);
        fs::create_dir_all(&store.decisions_dir)?;
        Ok(store)
    }

    pub fn open_or_init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path.join(STORE_DIR).is_dir() {
            Self::open(path)
        } else {
            fs::create_dir_all(path)?;
            Self::init(path)
        }
    }

    /// Search upward from `start` for a `.railctl/` directory.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut current = start.as_ref().to_path_buf();
        loop {
            if current.join(STORE_DIR).is_dir() {
                return Self::open(&current);
            }
            if !current.pop() {
                return Err(StoreError::StoreNotFound(
                    start.as_ref().display().to_string(),
                ));
            }
        }
    }

    fn at(root: PathBuf) -> Self {
        let decisions_dir = root.join(STORE_DIR).join(DECISIONS_DIR);
        Self {
            root,
            decisions_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a decision's document. Ids that could escape the
    /// decisions directory have no path.
    fn document_path(&self, id: &DecisionId) -> Option<PathBuf> {
        let raw = id.as_str();
        let safe = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.decisions_dir.join(format!("{}.json", raw)))
    }

    fn read_document(&self, id: &DecisionId, path: &Path) -> Result<Decision, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_new(&self, decision: &Decision) -> Result<(), StoreError> {
        let path = self
            .document_path(&decision.id)
            .ok_or_else(|| StoreError::Validation(format!("unusable id {}", decision.id)))?;
        let bytes = serde_json::to_vec_pretty(decision)?;

        fs::create_dir_all(&self.decisions_dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.decisions_dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn lock(&self, path: &Path) -> Result<Lockfile, StoreError> {
        Lockfile::acquire_with_retry(path, LOCK_ATTEMPTS, LOCK_DELAY, LOCK_STALE_AFTER)
    }
}

impl DecisionStore for FileStore {
    fn list(&self) -> Result<Vec<Decision>, StoreError> {
        let entries = match fs::read_dir(&self.decisions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut decisions = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read(&path)
                .map_err(StoreError::from)
                .and_then(|bytes| Ok(serde_json::from_slice::<Decision>(&bytes)?));
            match parsed {
                Ok(decision) => decisions.push(decision),
                // a document deleted between read_dir and read is simply gone
                Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable decision document");
                }
            }
        }
        decisions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(decisions)
    }

    fn get(&self, id: &DecisionId) -> Result<Decision, StoreError> {
        let path = self
            .document_path(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.read_document(id, &path)
    }

    fn create(&self, new: NewDecision) -> Result<Decision, StoreError> {
        let decision = Decision::issue(new, Utc::now())?;
        self.write_new(&decision)?;
        tracing::debug!(id = %decision.id, "decision written");
        Ok(decision)
    }

    fn acknowledge(&self, id: &DecisionId, station: Station) -> Result<Decision, StoreError> {
        let path = self
            .document_path(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut lock = self.lock(&path)?;
        // re-read under the lock; another writer may have acked meanwhile
        let mut decision = self.read_document(id, &path)?;
        decision.acknowledge(station, Utc::now())?;
        lock.write_all(&serde_json::to_vec_pretty(&decision)?)?;
        lock.commit()?;
        Ok(decision)
    }

    fn delete(&self, id: &DecisionId) -> Result<(), StoreError> {
        let path = self
            .document_path(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let _lock = self.lock(&path)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railctl_core::{Category, Priority};
    use std::sync::Arc;

    fn new_decision(message: &str, targets: Vec<Station>) -> NewDecision {
        NewDecision {
            message: Some(message.into()),
            category: Some(Category::Safety),
            priority: Some(Priority::Critical),
            targets,
            ..Default::default()
        }
    }

    fn make_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::init(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn init_creates_layout() {
        let (dir, _store) = make_store();
        let store_dir = dir.path().join(STORE_DIR);
        assert!(store_dir.join(DECISIONS_DIR).is_dir());
        let config: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store_dir.join(CONFIG_FILE)).unwrap())
                .unwrap();
        assert_eq!(config["version"], 1);
    }

    #[test]
    fn init_twice_fails() {
        let (dir, _store) = make_store();
        assert!(matches!(
            FileStore::init(dir.path()),
            Err(StoreError::StoreExists(_))
        ));
    }

    #[test]
    fn open_missing_fails_and_open_or_init_creates() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileStore::open(dir.path()),
            Err(StoreError::StoreNotFound(_))
        ));
        let nested = dir.path().join("data");
        FileStore::open_or_init(&nested).unwrap();
        assert!(nested.join(STORE_DIR).is_dir());
        FileStore::open_or_init(&nested).unwrap();
    }

    #[test]
    fn discover_walks_upward() {
        let (dir, _store) = make_store();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let found = FileStore::discover(&nested).unwrap();
        assert_eq!(found.root(), dir.path());
    }

    #[test]
    fn create_then_get_and_list() {
        let (_dir, store) = make_store();
        let a = store
            .create(new_decision("Caution at Gurap", vec![Station::Gurap]))
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let b = store
            .create(new_decision("Halt at Masagram", vec![Station::Masagram]))
            .unwrap();

        assert_eq!(store.get(&a.id).unwrap(), a);
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn unsafe_id_is_not_found() {
        let (_dir, store) = make_store();
        let err = store.get(&DecisionId::from("../config")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn corrupt_document_is_skipped_in_list() {
        let (dir, store) = make_store();
        store
            .create(new_decision("good", vec![Station::Belmuri]))
            .unwrap();
        fs::write(
            dir.path().join(STORE_DIR).join(DECISIONS_DIR).join("bad.json"),
            "not json",
        )
        .unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn acknowledge_persists() {
        let (dir, store) = make_store();
        let d = store
            .create(new_decision("x", vec![Station::Gurap, Station::Belmuri]))
            .unwrap();
        store.acknowledge(&d.id, Station::Gurap).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        let after = reopened.get(&d.id).unwrap();
        assert!(after.acknowledgements[&Station::Gurap].acknowledged);
        assert!(after.acknowledgements[&Station::Gurap].at.is_some());
        assert!(!after.acknowledgements[&Station::Belmuri].acknowledged);
    }

    #[test]
    fn acknowledge_non_target_leaves_document() {
        let (_dir, store) = make_store();
        let d = store.create(new_decision("x", vec![Station::Gurap])).unwrap();
        let err = store.acknowledge(&d.id, Station::Saktigarh).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTarget(_)));
        assert_eq!(store.get(&d.id).unwrap(), d);
    }

    #[test]
    fn acknowledge_held_lock_conflicts_eventually() {
        let (_dir, store) = make_store();
        let d = store.create(new_decision("x", vec![Station::Gurap])).unwrap();
        let path = store.document_path(&d.id).unwrap();
        let _held = Lockfile::acquire(&path).unwrap();
        let err = store.acknowledge(&d.id, Station::Gurap).unwrap_err();
        assert!(matches!(err, StoreError::LockConflict(_)));
    }

    #[test]
    fn concurrent_acks_are_not_lost() {
        let (_dir, store) = make_store();
        let store = Arc::new(store);
        let d = store
            .create(new_decision("all", Station::ALL.to_vec()))
            .unwrap();

        let handles: Vec<_> = Station::ALL
            .iter()
            .copied()
            .map(|station| {
                let store = Arc::clone(&store);
                let id = d.id.clone();
                std::thread::spawn(move || store.acknowledge(&id, station).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let after = store.get(&d.id).unwrap();
        assert_eq!(after.ack_progress(), (Station::ALL.len(), Station::ALL.len()));
    }

    #[test]
    fn delete_removes_document() {
        let (_dir, store) = make_store();
        let d = store.create(new_decision("x", vec![Station::Gurap])).unwrap();
        store.delete(&d.id).unwrap();
        assert!(matches!(store.get(&d.id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(&d.id), Err(StoreError::NotFound(_))));
        assert!(store.list().unwrap().is_empty());
    }
}

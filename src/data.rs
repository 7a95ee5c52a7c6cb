use crate::colors::ColorMap;
use crate::config::DataPaths;
use crate::error::LoadError;
use crate::types::{StampRecord, VisitRecord, VisitRow};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tracing::{debug, info};

pub fn load_stamps(path: &Path) -> Result<Vec<StampRecord>, LoadError> {
    let stamps: Vec<StampRecord> = read_csv(path)?;
    info!("Loaded {} stamp records from {:?}", stamps.len(), path);
    Ok(stamps)
}

/// Load the visited records and attach each park's status.
pub fn load_visits(path: &Path) -> Result<Vec<VisitRecord>, LoadError> {
    let rows: Vec<VisitRow> = read_csv(path)?;
    let visits: Vec<VisitRecord> = rows.into_iter().map(VisitRecord::from).collect();
    info!("Loaded {} visit records from {:?}", visits.len(), path);
    Ok(visits)
}

pub fn load_color_map(path: &Path) -> Result<ColorMap, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::from_io(path.to_path_buf(), e))?;
    let colors: ColorMap = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| LoadError::Json { path: path.to_path_buf(), source })?;
    info!("Loaded {} colors from {:?}", colors.len(), path);
    Ok(colors)
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::from_io(path.to_path_buf(), e))?;
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.map_err(|source| LoadError::Csv { path: path.to_path_buf(), source })?;
        records.push(record);
    }
    Ok(records)
}

type Loader<T> = fn(&Path) -> Result<T, LoadError>;

/// A file-backed value that is parsed once and re-read only after the
/// file's modification time changes.
pub struct Cached<T> {
    path: PathBuf,
    load: Loader<T>,
    slot: Mutex<Option<(SystemTime, Arc<T>)>>,
}

impl<T> Cached<T> {
    pub fn new(path: PathBuf, load: Loader<T>) -> Self {
        Cached { path, load, slot: Mutex::new(None) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blocking: stats and possibly re-reads the file while holding the lock.
    /// Async callers go through `spawn_blocking`.
    pub fn get(&self) -> Result<Arc<T>, LoadError> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let (Some(modified), Some((stamp, value))) = (modified, slot.as_ref()) {
            if *stamp == modified {
                return Ok(Arc::clone(value));
            }
        }

        debug!("Reading {:?}", self.path);
        let value = Arc::new((self.load)(&self.path)?);
        // Without a modification time there is nothing to validate against.
        *slot = modified.map(|stamp| (stamp, Arc::clone(&value)));
        Ok(value)
    }
}

/// Every input the dashboard reads, each memoized independently.
pub struct DataStore {
    pub stamps: Cached<Vec<StampRecord>>,
    pub visits: Cached<Vec<VisitRecord>>,
    pub region_colors: Cached<ColorMap>,
    pub visit_colors: Cached<ColorMap>,
}

impl DataStore {
    pub fn new(paths: &DataPaths) -> Self {
        DataStore {
            stamps: Cached::new(paths.stamps_csv.clone(), load_stamps),
            visits: Cached::new(paths.visits_csv.clone(), load_visits),
            region_colors: Cached::new(paths.region_colors.clone(), load_color_map),
            visit_colors: Cached::new(paths.visit_colors.clone(), load_color_map),
        }
    }
}

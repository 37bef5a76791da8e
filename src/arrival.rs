//! Job arrival records and per-granularity bucket maps
//!
//! A bucket map counts arrivals per scaled timestamp. Keys are `f64` (true
//! division), so the map is kept as a key-sorted vector of `(key, count)`
//! runs instead of a `BTreeMap`.

use crate::granularity::Granularity;
use serde::{Deserialize, Serialize};

/// A single job arrival, as read from a workload trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    /// Submission time in seconds since trace start (or epoch)
    pub submit_time: u64,
}

impl ArrivalRecord {
    pub fn new(submit_time: u64) -> Self {
        Self { submit_time }
    }
}

impl From<u64> for ArrivalRecord {
    fn from(submit_time: u64) -> Self {
        Self::new(submit_time)
    }
}

/// How a panel is drawn for a given bucket map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Line plot of counts over keys
    Line,
    /// "Trace too small" notice, no axes or grid
    Placeholder,
}

/// Ordered mapping from scaled timestamp to arrival count
#[derive(Debug, Clone, PartialEq)]
pub struct BucketMap {
    granularity: Granularity,
    /// Sorted by key, keys unique
    entries: Vec<(f64, u64)>,
}

impl BucketMap {
    /// Count arrivals of `records` at the given granularity
    pub fn from_records(records: &[ArrivalRecord], granularity: Granularity) -> Self {
        let mut keys: Vec<f64> = records
            .iter()
            .map(|r| granularity.scale(r.submit_time))
            .collect();
        keys.sort_by(f64::total_cmp);

        let mut entries: Vec<(f64, u64)> = Vec::new();
        for key in keys {
            match entries.last_mut() {
                Some((last, count)) if *last == key => *count += 1,
                _ => entries.push((key, 1)),
            }
        }

        Self {
            granularity,
            entries,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Number of distinct buckets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count stored at exactly `key`, if present
    pub fn get(&self, key: f64) -> Option<u64> {
        self.entries
            .binary_search_by(|(k, _)| k.total_cmp(&key))
            .ok()
            .map(|idx| self.entries[idx].1)
    }

    /// Iterate `(key, count)` pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Sum of all counts; equals the number of input records
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn max_key(&self) -> Option<f64> {
        self.entries.last().map(|(k, _)| *k)
    }

    pub fn max_count(&self) -> Option<u64> {
        self.entries.iter().map(|(_, c)| *c).max()
    }

    /// Line plot only when there is a bucket at or beyond one unit
    pub fn panel_kind(&self) -> PanelKind {
        match self.max_key() {
            Some(max) if max >= 1.0 => PanelKind::Line,
            _ => PanelKind::Placeholder,
        }
    }
}

/// Build one bucket map per granularity, in rendering order
pub fn aggregate_all(records: &[ArrivalRecord]) -> Vec<BucketMap> {
    Granularity::ALL
        .iter()
        .map(|g| BucketMap::from_records(records, *g))
        .collect()
}

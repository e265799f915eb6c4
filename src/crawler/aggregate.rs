//! Month bucketing and final ordering of harvested records

use crate::extract::{DetailRecord, ListEntry};
use std::collections::HashMap;

/// Listing entries that share a `YYYYMM` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: String,
    pub entries: Vec<ListEntry>,
}

impl Bucket {
    /// Thread URIs of the bucket, in discovery order
    pub fn uris(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.uri.clone()).collect()
    }
}

/// Partitions entries by bucket key
///
/// Buckets are ordered by the first appearance of their key; entries keep
/// their relative order inside a bucket.
pub fn group_by_bucket(entries: Vec<ListEntry>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        match index.get(&entry.bucket_key) {
            Some(&i) => buckets[i].entries.push(entry),
            None => {
                index.insert(entry.bucket_key.clone(), buckets.len());
                buckets.push(Bucket {
                    key: entry.bucket_key.clone(),
                    entries: vec![entry],
                });
            }
        }
    }

    buckets
}

/// Flattens per-bucket records and orders them newest first
///
/// Publish times are compared as strings, which orders the forum's
/// `YYYY-MM-DD hh:mm` format chronologically. The sort is stable and no
/// deduplication happens across buckets.
pub fn aggregate(groups: Vec<Vec<DetailRecord>>) -> Vec<DetailRecord> {
    let mut records: Vec<DetailRecord> = groups.into_iter().flatten().collect();
    records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    records
}

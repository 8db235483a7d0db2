//! Canonical record list and the record ↔ marker index.

use std::collections::HashMap;

use serde_json::Value;

use crate::record::LocationRecord;
use crate::view::{MapView, MarkerHandle, MarkerKind};

/// One admitted record and the marker created for it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEntry {
    pub record: LocationRecord,
    pub marker: MarkerHandle,
}

/// Row of the browse list shown next to the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub city: String,
    pub zipcode: String,
    pub machine_count: u32,
    pub marker: MarkerHandle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub admitted: usize,
    pub rejected: usize,
}

/// Owns every admitted [`LocationRecord`] and the only mapping from marker
/// handles back to records. Records are never removed.
#[derive(Debug, Default)]
pub struct LocationStore {
    entries: Vec<StoreEntry>,
    by_marker: HashMap<MarkerHandle, usize>,
    directory: Vec<DirectoryEntry>,
    rejected: usize,
}

impl LocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw records, create one marker per admitted record and
    /// rebuild the directory.
    ///
    /// Rejected records are logged and skipped. New markers are created
    /// detached; making them visible is the synchronizer's job.
    pub fn ingest<V>(&mut self, raw_records: &[Value], view: &mut V) -> IngestReport
    where
        V: MapView + ?Sized,
    {
        let mut report = IngestReport::default();

        for (index, raw) in raw_records.iter().enumerate() {
            let record = match LocationRecord::from_raw(raw) {
                Ok(record) => record,
                Err(reason) => {
                    let name = raw.get("name").and_then(Value::as_str).unwrap_or("?");
                    tracing::warn!(index, name, %reason, "skipping location record");
                    report.rejected += 1;
                    continue;
                }
            };

            let marker = view.create_marker(record.coordinate, MarkerKind::Location);
            self.by_marker.insert(marker, self.entries.len());
            self.entries.push(StoreEntry { record, marker });
            report.admitted += 1;
        }

        self.rejected += report.rejected;
        self.rebuild_directory();
        report
    }

    fn rebuild_directory(&mut self) {
        self.directory = self
            .entries
            .iter()
            .map(|e| DirectoryEntry {
                name: e.record.name.clone(),
                city: e.record.city.clone(),
                zipcode: e.record.zipcode.clone(),
                machine_count: e.record.machine_count,
                marker: e.marker,
            })
            .collect();
        // stable: equal keys keep ingestion order
        self.directory
            .sort_by_cached_key(|d| (d.city.to_lowercase(), d.name.to_lowercase()));
    }

    /// All entries in ingestion order.
    #[must_use]
    pub fn all(&self) -> &[StoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, marker: MarkerHandle) -> Option<&LocationRecord> {
        self.by_marker
            .get(&marker)
            .and_then(|&i| self.entries.get(i))
            .map(|e| &e.record)
    }

    #[must_use]
    pub fn contains(&self, marker: MarkerHandle) -> bool {
        self.by_marker.contains_key(&marker)
    }

    pub fn markers(&self) -> impl Iterator<Item = MarkerHandle> + '_ {
        self.entries.iter().map(|e| e.marker)
    }

    /// Entries sorted by city, then name, both case-insensitive.
    #[must_use]
    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// Raw records skipped across every ingest so far.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::headless::HeadlessMap;
    use vendmap_core::MapConfig;

    fn view() -> HeadlessMap {
        HeadlessMap::new(&MapConfig::default())
    }

    #[test]
    fn admits_iff_both_coordinates_are_finite() {
        let raw = vec![
            json!({"name": "ok", "city": "Berlin", "lat": 52.5, "lon": 13.4}),
            json!({"name": "no lat", "city": "Berlin", "lon": 13.4}),
            json!({"name": "bad lon", "city": "Berlin", "lat": 52.5, "lon": "east"}),
            json!({"name": "string ok", "city": "Bonn", "lat": "50.7", "lon": "7.1"}),
            json!("not even an object"),
        ];
        let mut map = view();
        let mut store = LocationStore::new();
        let report = store.ingest(&raw, &mut map);

        assert_eq!(report, IngestReport { admitted: 2, rejected: 3 });
        assert_eq!(store.rejected(), 3);
        let names: Vec<&str> = store.all().iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(names, ["ok", "string ok"]);
    }

    #[test]
    fn one_distinct_marker_per_record() {
        let raw = vec![
            json!({"name": "a", "lat": 1.0, "lon": 1.0}),
            json!({"name": "b", "lat": 2.0, "lon": 2.0}),
        ];
        let mut map = view();
        let mut store = LocationStore::new();
        store.ingest(&raw, &mut map);

        let markers: Vec<MarkerHandle> = store.markers().collect();
        assert_eq!(markers.len(), 2);
        assert_ne!(markers[0], markers[1]);
        assert_eq!(store.get(markers[1]).unwrap().name, "b");
        assert!(store.get(MarkerHandle(999)).is_none());
    }

    #[test]
    fn ingest_does_not_attach_markers() {
        let raw = vec![json!({"name": "a", "lat": 1.0, "lon": 1.0})];
        let mut map = view();
        let mut store = LocationStore::new();
        store.ingest(&raw, &mut map);
        assert!(!map.is_attached(store.all()[0].marker));
    }

    #[test]
    fn directory_sorted_by_city_then_name_case_insensitively() {
        let raw = vec![
            json!({"name": "zeta", "city": "munich", "lat": 1.0, "lon": 1.0}),
            json!({"name": "Beta", "city": "Berlin", "lat": 1.0, "lon": 1.0}),
            json!({"name": "alpha", "city": "BERLIN", "lat": 1.0, "lon": 1.0}),
            json!({"name": "Alpha", "city": "Aachen", "lat": 1.0, "lon": 1.0}),
        ];
        let mut map = view();
        let mut store = LocationStore::new();
        store.ingest(&raw, &mut map);

        let order: Vec<(&str, &str)> = store
            .directory()
            .iter()
            .map(|d| (d.city.as_str(), d.name.as_str()))
            .collect();
        assert_eq!(
            order,
            [
                ("Aachen", "Alpha"),
                ("BERLIN", "alpha"),
                ("Berlin", "Beta"),
                ("munich", "zeta"),
            ]
        );
    }

    #[test]
    fn directory_ties_keep_input_order() {
        let raw = vec![
            json!({"name": "Shop", "city": "Kiel", "zipcode": "24103", "lat": 1.0, "lon": 1.0}),
            json!({"name": "shop", "city": "kiel", "zipcode": "24105", "lat": 1.0, "lon": 1.0}),
        ];
        let mut map = view();
        let mut store = LocationStore::new();
        store.ingest(&raw, &mut map);

        let zips: Vec<&str> = store.directory().iter().map(|d| d.zipcode.as_str()).collect();
        assert_eq!(zips, ["24103", "24105"]);
    }

    #[test]
    fn second_ingest_appends_and_resorts() {
        let mut map = view();
        let mut store = LocationStore::new();
        store.ingest(&[json!({"name": "b", "city": "Essen", "lat": 1.0, "lon": 1.0})], &mut map);
        store.ingest(&[json!({"name": "a", "city": "Dresden", "lat": 1.0, "lon": 1.0})], &mut map);
        assert_eq!(store.len(), 2);
        assert_eq!(store.directory()[0].city, "Dresden");
        assert_eq!(store.all()[0].record.city, "Essen");
    }
}

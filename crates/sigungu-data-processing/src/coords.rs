//! Local district coordinate table: the artifact written by the offline
//! precompute job and read back as the resolver's first lookup tier.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCoordinate {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Which provider produced the entry, e.g. `open-meteo`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl LocalCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            name: None,
            source: None,
        }
    }
}

/// District name → coordinate, kept in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalCoordinateTable {
    entries: BTreeMap<String, LocalCoordinate>,
}

impl LocalCoordinateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, district: &str) -> Option<&LocalCoordinate> {
        self.entries.get(district)
    }

    pub fn insert(&mut self, district: impl Into<String>, coordinate: LocalCoordinate) {
        self.entries.insert(district.into(), coordinate);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocalCoordinate)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let table: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(entries = table.len(), "Loaded local coordinate table");
        Ok(table)
    }

    /// Write the table as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl FromIterator<(String, LocalCoordinate)> for LocalCoordinateTable {
    fn from_iter<T: IntoIterator<Item = (String, LocalCoordinate)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_fields() {
        let table = LocalCoordinateTable::from_json(
            r#"{
                "서울특별시-종로구": {"lat": 37.5735, "lon": 126.979, "name": "종로구", "source": "open-meteo"},
                "Seoul-Gangnam": {"lat": 37.5172, "lon": 127.0473}
            }"#,
        )
        .unwrap();

        let jongno = table.get("서울특별시-종로구").unwrap();
        assert_eq!(jongno.name.as_deref(), Some("종로구"));
        assert_eq!(jongno.source.as_deref(), Some("open-meteo"));

        let gangnam = table.get("Seoul-Gangnam").unwrap();
        assert_eq!(gangnam, &LocalCoordinate::new(37.5172, 127.0473));
        assert!(table.get("Busan").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coords.json");

        let table: LocalCoordinateTable = [
            ("B".to_string(), LocalCoordinate::new(1.0, 2.0)),
            ("A".to_string(), LocalCoordinate::new(3.0, 4.0)),
        ]
        .into_iter()
        .collect();
        table.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.find("\"A\"").unwrap() < written.find("\"B\"").unwrap());
        assert!(!written.contains("source"));

        assert_eq!(LocalCoordinateTable::load(&path).unwrap(), table);
    }

    #[test]
    fn test_serialization_is_stable() {
        let entries = || {
            ["Seoul-Jongno", "Busan-Haeundae", "Daegu-Jung", "Incheon-Jung", "Jeju"]
                .into_iter()
                .enumerate()
                .map(|(i, d)| (d.to_string(), LocalCoordinate::new(i as f64, 0.0)))
        };
        let first: LocalCoordinateTable = entries().collect();
        let second: LocalCoordinateTable = entries().rev().collect();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

use std::path::PathBuf;

use tempfile::TempDir;
use tracing::info;

use crate::{
    coords::{LocalCoordinate, LocalCoordinateTable},
    error::Result,
    write_artifacts,
};

/// Configuration for test data generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Use the small romanized corpus instead of the Korean sample
    pub romanized: bool,
    /// Also write a token index next to the corpus
    pub with_index: bool,
    /// Also write a local coordinate table
    pub with_coords: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self::sample()
    }
}

impl TestDataConfig {
    /// Three romanized districts, no index, no coordinates
    pub fn minimal() -> Self {
        Self {
            romanized: true,
            with_index: false,
            with_coords: false,
        }
    }

    /// Korean sample corpus with index and seed coordinates
    pub fn sample() -> Self {
        Self {
            romanized: false,
            with_index: true,
            with_coords: true,
        }
    }
}

/// Romanized corpus used across unit tests.
pub fn minimal_corpus() -> Vec<String> {
    ["Seoul-Jongno", "Seoul-Gangnam", "Busan-Haeundae"]
        .map(String::from)
        .to_vec()
}

/// Korean sample corpus, including one duplicate as real corpora do.
pub fn sample_corpus() -> Vec<String> {
    [
        "서울특별시",
        "서울특별시-종로구",
        "서울특별시-종로구-청운동",
        "서울특별시-종로구-사직동",
        "서울특별시-중구",
        "서울특별시-중구-명동",
        "서울특별시-강남구",
        "서울특별시-강남구-역삼동",
        "서울특별시-강남구-삼성동",
        "부산광역시",
        "부산광역시-중구",
        "부산광역시-해운대구",
        "부산광역시-해운대구-우동",
        "대구광역시-중구",
        "경기도-수원시 장안구",
        "경기도-수원시 장안구-파장동",
        "경기도-성남시 분당구-정자동",
        "경기도-가평군-가평읍",
        "강원특별자치도-춘천시",
        "제주특별자치도-제주시-애월읍",
        "서울특별시-종로구",
    ]
    .map(String::from)
    .to_vec()
}

/// Seed coordinates for the sample corpus.
pub fn sample_coords() -> LocalCoordinateTable {
    [
        ("서울특별시", 37.5665, 126.978),
        ("부산광역시", 35.1796, 129.0756),
    ]
    .into_iter()
    .map(|(district, lat, lon)| {
        (
            district.to_string(),
            LocalCoordinate {
                lat,
                lon,
                name: Some(district.to_string()),
                source: Some("seed".to_string()),
            },
        )
    })
    .collect()
}

/// Paths of a generated test data set. The directory is removed on drop.
#[derive(Debug)]
pub struct TestData {
    pub dir: TempDir,
    pub corpus: PathBuf,
    pub index: Option<PathBuf>,
    pub coords: Option<PathBuf>,
}

/// Write a corpus (and optionally index and coordinate table) to a temporary
/// directory laid out like a real data directory.
pub fn create_test_data(config: &TestDataConfig) -> Result<TestData> {
    info!(?config, "Creating test data");
    let dir = TempDir::new()?;

    let corpus = if config.romanized {
        minimal_corpus()
    } else {
        sample_corpus()
    };

    let corpus_path = dir.path().join(crate::CORPUS_FILE);
    std::fs::write(&corpus_path, serde_json::to_string(&corpus)?)?;

    let index = if config.with_index {
        write_artifacts(corpus, dir.path())?;
        Some(dir.path().join(crate::INDEX_FILE))
    } else {
        None
    };

    let coords = if config.with_coords {
        let path = dir.path().join(crate::COORDS_FILE);
        sample_coords().save(&path)?;
        Some(path)
    } else {
        None
    };

    Ok(TestData {
        dir,
        corpus: corpus_path,
        index,
        coords,
    })
}

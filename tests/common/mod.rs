//! Shared fixtures: a small catalog database and config files.

#![allow(dead_code)]

use async_trait::async_trait;
use lux_search::config::Config;
use lux_search::media::ImageProbe;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

const SCHEMA: &[&str] = &[
    "CREATE TABLE objects (id INTEGER PRIMARY KEY, accession_no TEXT, label TEXT, date TEXT)",
    "CREATE TABLE places (id INTEGER PRIMARY KEY, label TEXT)",
    "CREATE TABLE objects_places (obj_id INTEGER, pl_id INTEGER)",
    "CREATE TABLE departments (id INTEGER PRIMARY KEY, name TEXT)",
    "CREATE TABLE objects_departments (obj_id INTEGER, dep_id INTEGER)",
    "CREATE TABLE agents (id INTEGER PRIMARY KEY, name TEXT, begin_date TEXT, end_date TEXT)",
    "CREATE TABLE productions (obj_id INTEGER, agt_id INTEGER, part TEXT)",
    "CREATE TABLE nationalities (id INTEGER PRIMARY KEY, descriptor TEXT)",
    "CREATE TABLE agents_nationalities (agt_id INTEGER, nat_id INTEGER)",
    "CREATE TABLE classifiers (id INTEGER PRIMARY KEY, name TEXT)",
    "CREATE TABLE objects_classifiers (obj_id INTEGER, cls_id INTEGER)",
    r#"CREATE TABLE "references" (id INTEGER PRIMARY KEY, obj_id INTEGER, "type" TEXT, "content" TEXT)"#,
];

/// Objects:
///
/// | id | label | date | notes |
/// |----|-------|------|-------|
/// | 1 | Harbor at Dusk | 1850 | three agents, three classifiers, places, refs |
/// | 2 | Portrait of a Lady | ca. 1800 | |
/// | 3 | Anonymous Study | 1800-1805 | |
/// | 4 | Orphan Vase | 1900 | no productions: hidden from search |
/// | 5 | Unclassified Sketch | 1800 | no classifiers: hidden from search |
/// | 6 | Harbor at Dusk | 1800 | same label as 1, earlier date |
const DATA: &[&str] = &[
    "INSERT INTO objects VALUES
        (1, '1961.18.1', 'Harbor at Dusk', '1850'),
        (2, '1970.2.2', 'Portrait of a Lady', 'ca. 1800'),
        (3, '1980.3.3', 'Anonymous Study', '1800-1805'),
        (4, '1990.4.4', 'Orphan Vase', '1900'),
        (5, '2000.5.5', 'Unclassified Sketch', '1800'),
        (6, '2001.6.6', 'Harbor at Dusk', '1800')",
    "INSERT INTO agents VALUES
        (1, 'Smith', '1950-01-01', '1975-06-01'),
        (2, 'Jones', '1950-01-01', NULL),
        (3, 'Anonymous', NULL, NULL),
        (4, 'adams', '1801-03-02', '1880-01-01')",
    "INSERT INTO productions VALUES
        (1, 1, 'painter'),
        (1, 2, 'printer'),
        (1, 4, 'engraver'),
        (2, 2, 'painter'),
        (3, 3, 'artist'),
        (5, 1, 'draftsman'),
        (6, 1, 'painter')",
    "INSERT INTO classifiers VALUES
        (1, 'Etching'),
        (2, 'engraving'),
        (3, 'Drawing'),
        (4, 'woodcut'),
        (5, 'prints')",
    "INSERT INTO objects_classifiers VALUES
        (1, 1), (1, 2), (1, 5),
        (2, 3),
        (3, 3), (3, 4),
        (4, 2),
        (6, 1)",
    "INSERT INTO nationalities VALUES (1, 'American'), (2, 'British')",
    "INSERT INTO agents_nationalities VALUES (1, 1), (1, 2), (2, 2)",
    "INSERT INTO places VALUES (1, 'New Haven'), (2, 'London')",
    "INSERT INTO objects_places VALUES (1, 1), (1, 2)",
    "INSERT INTO departments VALUES (1, 'Prints and Drawings')",
    "INSERT INTO objects_departments VALUES (1, 1)",
    r#"INSERT INTO "references" VALUES
        (5, 1, 'Exhibition', 'Harbor show, 1999'),
        (2, 1, 'Bibliography', 'Smith catalogue, no. 4')"#,
];

async fn execute_all(path: &Path, statements: &[&str]) {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    for sql in statements {
        sqlx::query(sql).execute(&pool).await.unwrap();
    }
    pool.close().await;
}

/// Creates the fixture catalog at `path`.
pub async fn create_fixture_db(path: &Path) {
    execute_all(path, SCHEMA).await;
    execute_all(path, DATA).await;
}

/// Runs extra statements against an existing fixture.
pub async fn seed(path: &Path, statements: &[&str]) {
    execute_all(path, statements).await;
}

/// Creates a database file with no tables.
pub async fn create_empty_db(path: &Path) {
    execute_all(path, &["CREATE TABLE unrelated (id INTEGER)"]).await;
}

fn config_toml(db_path: &Path, bind: &str) -> String {
    format!(
        r#"[db]
path = "{}"

[server]
bind = "{}"

[media]
enabled = false
"#,
        db_path.display(),
        bind
    )
}

pub fn test_config(db_path: &Path) -> Config {
    toml::from_str(&config_toml(db_path, "127.0.0.1:0")).unwrap()
}

/// Writes `lux.toml` into `dir` and returns its path.
pub fn write_config(dir: &Path, db_path: &Path) -> PathBuf {
    let path = dir.join("lux.toml");
    fs::write(&path, config_toml(db_path, "127.0.0.1:0")).unwrap();
    path
}

/// Probe with a fixed answer that counts how often it was asked.
pub struct CountingProbe {
    exists: bool,
    calls: AtomicUsize,
}

impl CountingProbe {
    pub fn new(exists: bool) -> Self {
        Self {
            exists,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProbe for CountingProbe {
    fn thumbnail_url(&self, object_id: i64) -> String {
        format!("https://media.test/thumbnail/yuag/obj/{}", object_id)
    }

    async fn has_image(&self, _object_id: i64) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.exists
    }
}

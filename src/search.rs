//! Catalog search and result decoding.
//!
//! Executes the composite query from [`crate::query`] and turns each row's
//! `|`-delimited aggregates back into ordered lists.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error;
use crate::filter::build_predicate;
use crate::models::{CatalogObject, SearchParams, NONE_SENTINEL};
use crate::query::{compose, AGGREGATE_DELIMITER};

/// Runs a search and returns at most `limit` objects, ordered by label then date.
pub async fn search_objects(
    pool: &SqlitePool,
    params: &SearchParams,
    limit: u32,
) -> error::Result<Vec<CatalogObject>> {
    let predicate = build_predicate(params);
    let sql = compose(&predicate);

    let mut query = sqlx::query(&sql);
    for value in &predicate.params {
        query = query.bind(value.as_str());
    }
    let rows = query.bind(i64::from(limit)).fetch_all(pool).await?;

    let objects = rows
        .iter()
        .map(decode_sqlite_row)
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    tracing::debug!(
        terms = predicate.term_count(),
        rows = objects.len(),
        "catalog search complete"
    );

    Ok(objects)
}

/// Raw columns of one search row, in query order.
#[derive(Debug, Clone, Default)]
pub struct AggregateRow {
    pub object_id: i64,
    pub label: Option<String>,
    pub agent_info: Option<String>,
    pub date: Option<String>,
    pub classifiers: Option<String>,
}

fn decode_sqlite_row(row: &SqliteRow) -> Result<CatalogObject, sqlx::Error> {
    Ok(decode_row(AggregateRow {
        object_id: row.try_get("object_id")?,
        label: row.try_get("label")?,
        agent_info: row.try_get("agent_info")?,
        date: row.try_get("date")?,
        classifiers: row.try_get("classifiers")?,
    }))
}

pub fn decode_row(row: AggregateRow) -> CatalogObject {
    CatalogObject {
        id: row.object_id,
        label: row.label.unwrap_or_default(),
        date: row.date.unwrap_or_default(),
        agents: split_aggregate(row.agent_info.as_deref()),
        classifiers: split_aggregate(row.classifiers.as_deref()),
    }
}

/// Splits a `|`-terminated aggregate into its elements.
///
/// A null or empty aggregate decodes to `["None"]`.
pub fn split_aggregate(aggregate: Option<&str>) -> Vec<String> {
    let raw = match aggregate {
        Some(s) if !s.is_empty() => s,
        _ => NONE_SENTINEL,
    };
    raw.trim_end_matches(AGGREGATE_DELIMITER)
        .split(AGGREGATE_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// CLI entry point: runs the search and prints a table or JSON.
pub async fn run_search(config: &Config, params: &SearchParams, json: bool) -> Result<()> {
    let catalog = Catalog::open(config).await?;
    let objects = catalog.search(params).await?;
    catalog.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&objects)?);
        return Ok(());
    }

    if objects.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("Search produced {} objects.", objects.len());
    println!();
    for obj in &objects {
        println!("{}. {}", obj.id, obj.label);
        println!("    date:        {}", obj.date);
        println!("    agents:      {}", obj.agents.join(", "));
        println!("    classifiers: {}", obj.classifiers.join(", "));
        println!();
    }

    Ok(())
}

//! Object detail retrieval.
//!
//! Gathers everything shown on an object's page: summary, label, production
//! history, classifications, and references. All lookups share one read
//! transaction. An object without a summary row does not exist, and no
//! further lookups (or image checks) are made for it.
//! Used by both the `lux show` CLI command and the `/obj/{id}` routes.

use anyhow::{bail, Result};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error;
use crate::media::ImageProbe;
use crate::models::{ObjectDetail, Production, Reference, References};

struct Summary {
    accession_no: Option<String>,
    date: Option<String>,
    places: Option<String>,
    department: Option<String>,
}

/// Core detail function returning structured data (used by CLI and server).
///
/// Returns `Ok(None)` when the object does not exist.
pub async fn get_object_detail(
    pool: &SqlitePool,
    probe: &dyn ImageProbe,
    object_id: i64,
) -> error::Result<Option<ObjectDetail>> {
    let mut tx = pool.begin().await?;

    let summary = match fetch_summary(&mut tx, object_id).await? {
        Some(s) => s,
        None => {
            tx.rollback().await?;
            tracing::debug!(object_id, "object not found");
            return Ok(None);
        }
    };

    let label = fetch_label(&mut tx, object_id).await?;
    let productions = fetch_productions(&mut tx, object_id).await?;
    let classifications = fetch_classifications(&mut tx, object_id).await?;
    let references = fetch_references(&mut tx, object_id).await?;

    tx.commit().await?;

    let has_image = probe.has_image(object_id).await;

    Ok(Some(ObjectDetail {
        id: object_id,
        accession_no: summary.accession_no.unwrap_or_default(),
        date: summary.date.unwrap_or_default(),
        places: summary.places,
        department: summary.department,
        label: label.unwrap_or_default(),
        productions,
        classifications,
        references,
        has_image,
        image_url: has_image.then(|| probe.thumbnail_url(object_id)),
    }))
}

async fn fetch_summary(
    tx: &mut Transaction<'_, Sqlite>,
    object_id: i64,
) -> Result<Option<Summary>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            objects.accession_no AS accession_no,
            objects.date AS date,
            GROUP_CONCAT(object_places.label, ', ') AS places,
            (SELECT departments.name
             FROM objects_departments
             JOIN departments ON objects_departments.dep_id = departments.id
             WHERE objects_departments.obj_id = objects.id
             ORDER BY departments.name
             LIMIT 1) AS department
        FROM objects
        LEFT JOIN (
            SELECT DISTINCT objects_places.obj_id AS obj_id, places.label AS label
            FROM objects_places
            JOIN places ON objects_places.pl_id = places.id
        ) AS object_places ON objects.id = object_places.obj_id
        WHERE objects.id = ?
        GROUP BY objects.id
        "#,
    )
    .bind(object_id)
    .fetch_optional(&mut **tx)
    .await?;

    row.map(|row| -> Result<Summary, sqlx::Error> {
        Ok(Summary {
            accession_no: row.try_get("accession_no")?,
            date: row.try_get("date")?,
            places: row.try_get("places")?,
            department: row.try_get("department")?,
        })
    })
    .transpose()
}

async fn fetch_label(
    tx: &mut Transaction<'_, Sqlite>,
    object_id: i64,
) -> Result<Option<String>, sqlx::Error> {
    let label: Option<Option<String>> =
        sqlx::query_scalar("SELECT label FROM objects WHERE objects.id = ?")
            .bind(object_id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(label.flatten())
}

async fn fetch_productions(
    tx: &mut Transaction<'_, Sqlite>,
    object_id: i64,
) -> Result<Vec<Production>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            productions.part AS part,
            agents.name AS name,
            agents.begin_date AS begin_date,
            agents.end_date AS end_date,
            GROUP_CONCAT(nationalities.descriptor, char(10)
                         ORDER BY nationalities.descriptor) AS nationalities
        FROM productions
        JOIN agents ON productions.agt_id = agents.id
        LEFT JOIN agents_nationalities ON agents.id = agents_nationalities.agt_id
        LEFT JOIN nationalities ON agents_nationalities.nat_id = nationalities.id
        WHERE productions.obj_id = ?
        GROUP BY productions.part, agents.name, agents.begin_date, agents.end_date
        ORDER BY agents.name ASC, productions.part ASC, nationalities ASC
        "#,
    )
    .bind(object_id)
    .fetch_all(&mut **tx)
    .await?;

    rows.iter()
        .map(|row| -> Result<Production, sqlx::Error> {
            let begin: Option<String> = row.try_get("begin_date")?;
            let end: Option<String> = row.try_get("end_date")?;
            Ok(Production {
                part: row.try_get::<Option<String>, _>("part")?.unwrap_or_default(),
                name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
                nationalities: row
                    .try_get::<Option<String>, _>("nationalities")?
                    .unwrap_or_default(),
                timespan: timespan(begin.as_deref(), end.as_deref()),
            })
        })
        .collect()
}

async fn fetch_classifications(
    tx: &mut Transaction<'_, Sqlite>,
    object_id: i64,
) -> Result<Vec<String>, sqlx::Error> {
    let names: Vec<Option<String>> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT classifiers.name
        FROM objects_classifiers
        JOIN classifiers ON objects_classifiers.cls_id = classifiers.id
        WHERE objects_classifiers.obj_id = ?
        "#,
    )
    .bind(object_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(capitalize_sorted(names.iter().flatten().map(String::as_str)))
}

async fn fetch_references(
    tx: &mut Transaction<'_, Sqlite>,
    object_id: i64,
) -> Result<References, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT "type" AS ref_type, "content" AS content
        FROM "references"
        WHERE obj_id = ?
        ORDER BY id
        "#,
    )
    .bind(object_id)
    .fetch_all(&mut **tx)
    .await?;

    let refs = rows
        .iter()
        .map(|row| -> Result<Reference, sqlx::Error> {
            Ok(Reference {
                ref_type: row
                    .try_get::<Option<String>, _>("ref_type")?
                    .unwrap_or_default(),
                content: row
                    .try_get::<Option<String>, _>("content")?
                    .unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    Ok(References::from_rows(refs))
}

/// Concatenates the leading year of each date, e.g. `1950-01-01` and
/// `1975-06-01` give `"19501975"`. A missing date contributes nothing.
pub fn timespan(begin_date: Option<&str>, end_date: Option<&str>) -> String {
    format!("{}{}", leading_year(begin_date), leading_year(end_date))
}

fn leading_year(date: Option<&str>) -> &str {
    date.and_then(|d| d.split('-').next()).unwrap_or("")
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Capitalizes each name, then sorts the result.
pub fn capitalize_sorted<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = names.into_iter().map(capitalize).collect();
    out.sort();
    out
}

/// CLI entry point: prints the object's detail to stdout.
pub async fn run_show(config: &Config, object_id: i64, json: bool) -> Result<()> {
    let catalog = Catalog::open(config).await?;
    let detail = catalog.object_detail(object_id).await?;
    catalog.close().await;

    let detail = match detail {
        Some(d) => d,
        None => bail!("object with id {} does not exist", object_id),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("--- Summary ---");
    println!("accession no: {}", detail.accession_no);
    println!("date:         {}", detail.date);
    println!("places:       {}", detail.places.as_deref().unwrap_or(""));
    println!("department:   {}", detail.department.as_deref().unwrap_or(""));
    println!(
        "image:        {}",
        detail.image_url.as_deref().unwrap_or("(none)")
    );
    println!();

    println!("--- Label ---");
    println!("{}", detail.label);
    println!();

    println!("--- Produced By ({}) ---", detail.productions.len());
    for p in &detail.productions {
        println!(
            "{} | {} | {} | {}",
            p.part,
            p.name,
            p.nationalities.replace('\n', ", "),
            p.timespan
        );
    }
    println!();

    println!("--- Classified As ---");
    for c in &detail.classifications {
        println!("{}", c);
    }
    println!();

    println!("--- Information ---");
    if detail.references.is_no_data() {
        println!("No data found");
    }
    for r in detail.references.entries() {
        println!("{}: {}", r.ref_type, r.content);
    }

    Ok(())
}

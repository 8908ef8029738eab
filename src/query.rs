//! Composite search query.
//!
//! A single statement produces one row per matching object:
//! `(object_id, label, agent_info, date, classifiers)`.
//!
//! ```text
//! matched ──┬──▶ agent_credits ──▶ agent_agg ───────┐
//!           │                                       ├──▶ join, sort, limit
//!           └──▶ classifier_names ──▶ classifier_agg┘
//! ```
//!
//! Each one-to-many relation is aggregated on its own before the final join,
//! so an object with several agents and several classifiers still yields a
//! single row. Aggregates are `|`-terminated lists, e.g. `"a (x)|b (y)|"`.
//!
//! Only objects with at least one production and one classifier can match.

use crate::filter::Predicate;

/// Separator terminating every element of an aggregate string.
pub const AGGREGATE_DELIMITER: char = '|';

/// Builds the search statement for `predicate`.
///
/// Bind `predicate.params` in order, then the row limit.
pub fn compose(predicate: &Predicate) -> String {
    format!(
        r#"
        WITH matched AS (
            {matched}
        ),
        agent_credits AS (
            SELECT DISTINCT matched.object_id AS object_id,
                   agents.name AS name,
                   productions.part AS part
            FROM matched
            LEFT JOIN productions ON matched.object_id = productions.obj_id
            LEFT JOIN agents ON productions.agt_id = agents.id
        ),
        agent_agg AS (
            SELECT object_id,
                   GROUP_CONCAT(name || ' (' || part || ')' || '|', ''
                                ORDER BY LOWER(name), LOWER(part)) AS agent_info
            FROM agent_credits
            GROUP BY object_id
        ),
        classifier_names AS (
            SELECT DISTINCT matched.object_id AS object_id,
                   LOWER(classifiers.name) AS class
            FROM matched
            JOIN objects_classifiers ON matched.object_id = objects_classifiers.obj_id
            JOIN classifiers ON objects_classifiers.cls_id = classifiers.id
        ),
        classifier_agg AS (
            SELECT object_id,
                   GROUP_CONCAT(class || '|', '' ORDER BY class) AS classifiers
            FROM classifier_names
            GROUP BY object_id
        )
        SELECT matched.object_id AS object_id,
               matched.label AS label,
               agent_agg.agent_info AS agent_info,
               matched.date AS date,
               classifier_agg.classifiers AS classifiers
        FROM matched
        JOIN agent_agg ON matched.object_id = agent_agg.object_id
        JOIN classifier_agg ON matched.object_id = classifier_agg.object_id
        ORDER BY matched.label, matched.date, matched.object_id
        LIMIT ?
        "#,
        matched = matched_objects(predicate)
    )
}

/// Distinct objects passing the filter, joined through productions and classifiers.
fn matched_objects(predicate: &Predicate) -> String {
    format!(
        "SELECT DISTINCT objects.id AS object_id, objects.label AS label, objects.date AS date \
         FROM objects \
         JOIN productions ON objects.id = productions.obj_id \
         JOIN agents ON productions.agt_id = agents.id \
         JOIN objects_classifiers ON objects.id = objects_classifiers.obj_id \
         JOIN classifiers ON objects_classifiers.cls_id = classifiers.id \
         {}",
        predicate.clause
    )
}

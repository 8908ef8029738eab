//! Search filter construction.
//!
//! Turns the optional label, classifier, agent, and date filters into a SQL
//! predicate fragment plus the values to bind. The fragment is assembled from
//! fixed strings only; user input travels exclusively through bind values.
//!
//! Case folding is ASCII-only on both sides, matching SQLite's `LOWER()` and
//! `LIKE`. Non-ASCII letters therefore match only in their stored case.

use crate::models::SearchParams;

/// A `WHERE` clause and its positional bind values, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub clause: String,
    pub params: Vec<String>,
}

impl Predicate {
    /// Number of filter terms beyond the always-true default.
    pub fn term_count(&self) -> usize {
        self.params.len()
    }
}

pub fn build_predicate(params: &SearchParams) -> Predicate {
    let mut clause = String::from("WHERE 1=1");
    let mut values = Vec::new();

    if let Some(agent) = non_empty(&params.agent) {
        clause.push_str(" AND LOWER(agents.name) LIKE ? ESCAPE '\\'");
        values.push(contains_pattern(&agent.to_ascii_lowercase()));
    }

    if let Some(classifier) = non_empty(&params.classifier) {
        clause.push_str(" AND LOWER(classifiers.name) LIKE ? ESCAPE '\\'");
        values.push(contains_pattern(&classifier.to_ascii_lowercase()));
    }

    // Dates are matched case-sensitively.
    if let Some(date) = non_empty(&params.date) {
        clause.push_str(" AND INSTR(objects.date, ?) > 0");
        values.push(date.to_string());
    }

    if let Some(label) = non_empty(&params.label) {
        clause.push_str(" AND LOWER(objects.label) LIKE ? ESCAPE '\\'");
        values.push(contains_pattern(&label.to_ascii_lowercase()));
    }

    Predicate {
        clause,
        params: values,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// `%value%` with LIKE wildcards in `value` escaped.
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(label: &str, classifier: &str, agent: &str, date: &str) -> SearchParams {
        let opt = |s: &str| Some(s.to_string());
        SearchParams::new(opt(label), opt(classifier), opt(agent), opt(date))
    }

    #[test]
    fn test_empty_input_matches_everything() {
        let p = build_predicate(&SearchParams::default());
        assert_eq!(p.clause, "WHERE 1=1");
        assert!(p.params.is_empty());

        let p = build_predicate(&params("", "", "", ""));
        assert_eq!(p.clause, "WHERE 1=1");
        assert_eq!(p.term_count(), 0);
    }

    #[test]
    fn test_all_filters_in_bind_order() {
        let p = build_predicate(&params("Harbor", "Etching", "SMITH", "1850"));
        assert_eq!(p.term_count(), 4);
        assert_eq!(
            p.params,
            vec!["%smith%", "%etching%", "1850", "%harbor%"]
        );
        let agent_pos = p.clause.find("agents.name").unwrap();
        let class_pos = p.clause.find("classifiers.name").unwrap();
        let date_pos = p.clause.find("objects.date").unwrap();
        let label_pos = p.clause.find("objects.label").unwrap();
        assert!(agent_pos < class_pos && class_pos < date_pos && date_pos < label_pos);
    }

    #[test]
    fn test_date_is_not_lowercased() {
        let p = build_predicate(&SearchParams::new(None, None, None, Some("ca. 18th C".into())));
        assert_eq!(p.params, vec!["ca. 18th C"]);
        assert!(p.clause.contains("INSTR(objects.date, ?)"));
    }

    #[test]
    fn test_user_input_never_in_clause() {
        let hostile = "x' OR 1=1 --";
        let p = build_predicate(&params(hostile, hostile, hostile, hostile));
        assert!(!p.clause.contains(hostile));
        assert_eq!(p.clause.matches('?').count(), 4);
    }

    #[test]
    fn test_non_ascii_letters_keep_their_case() {
        let p = build_predicate(&params("ÉCLAIR", "Étude", "ÉMILE", ""));
        assert_eq!(p.params, vec!["%Émile%", "%Étude%", "%Éclair%"]);
    }

    #[test]
    fn test_wildcards_escaped() {
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c\\d"), "%c\\\\d%");
    }
}

//! HTML rendering for the browser-facing routes.
//!
//! Pages are small enough to build with `format!`; every piece of catalog
//! or user text passes through [`escape`] first.

use crate::models::{CatalogObject, ObjectDetail, References, SearchParams};

const TITLE: &str = "YUAG Collection Search";

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; vertical-align: top; }}
.error {{ color: #a00; }}
</style>
</head>
<body>
<h1><a href="/">{site}</a></h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        site = TITLE,
        body = body
    )
}

/// The search page. `results` is a pre-rendered fragment (possibly empty).
pub fn index_page(params: &SearchParams, results: &str) -> String {
    let value = |v: &Option<String>| escape(v.as_deref().unwrap_or(""));
    let body = format!(
        r#"<form id="search" action="/search" method="get">
<input name="l" placeholder="Label" value="{l}">
<input name="c" placeholder="Classifier" value="{c}">
<input name="a" placeholder="Agent" value="{a}">
<input name="d" placeholder="Date" value="{d}">
</form>
<div id="results">{results}</div>
<script>
const form = document.getElementById("search");
let pending = null;
function runSearch() {{
  const query = new URLSearchParams(new FormData(form)).toString();
  if (pending) {{ pending.abort(); }}
  pending = new AbortController();
  fetch("/search?" + query, {{ signal: pending.signal }})
    .then((resp) => resp.text())
    .then((html) => {{ document.getElementById("results").innerHTML = html; }})
    .catch(() => {{}});
}}
form.addEventListener("input", runSearch);
form.addEventListener("submit", (e) => {{ e.preventDefault(); runSearch(); }});
</script>"#,
        l = value(&params.label),
        c = value(&params.classifier),
        a = value(&params.agent),
        d = value(&params.date),
        results = results
    );
    layout(TITLE, &body)
}

/// A single status or error line inside the results area.
pub fn message(text: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, escape(text))
}

/// Result table fragment returned by `/search`.
pub fn search_results(objects: &[CatalogObject]) -> String {
    if objects.is_empty() {
        return message("No results found.");
    }

    let mut rows = String::new();
    for obj in objects {
        rows.push_str(&format!(
            "<tr><td><a href=\"/obj/{id}\" target=\"_blank\">{label}</a></td><td>{date}</td><td>{agents}</td><td>{classifiers}</td></tr>\n",
            id = obj.id,
            label = escape(&obj.label),
            date = escape(&obj.date),
            agents = join_lines(&obj.agents),
            classifiers = escape(&obj.classifiers.join(", ")),
        ));
    }

    format!(
        "<p>{count} objects found.</p>\n<table>\n<tr><th>Label</th><th>Date</th><th>Agents</th><th>Classified As</th></tr>\n{rows}</table>",
        count = objects.len(),
        rows = rows
    )
}

pub fn object_page(detail: &ObjectDetail) -> String {
    let mut body = String::new();

    if let Some(url) = &detail.image_url {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape(url),
            escape(&detail.label)
        ));
    }

    body.push_str(&format!(
        "<h2>Summary</h2>\n<table>\n<tr><th>Accession Number</th><th>Date</th><th>Place</th><th>Department</th></tr>\n<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n</table>\n",
        escape(&detail.accession_no),
        escape(&detail.date),
        escape(detail.places.as_deref().unwrap_or("")),
        escape(detail.department.as_deref().unwrap_or("")),
    ));

    body.push_str(&format!("<h2>Label</h2>\n<p>{}</p>\n", escape(&detail.label)));

    body.push_str("<h2>Produced By</h2>\n<table>\n<tr><th>Part</th><th>Name</th><th>Nationalities</th><th>Timespan</th></tr>\n");
    for p in &detail.productions {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&p.part),
            escape(&p.name),
            join_lines(&p.nationalities.lines().map(str::to_string).collect::<Vec<_>>()),
            escape(&p.timespan),
        ));
    }
    body.push_str("</table>\n");

    body.push_str("<h2>Classified As</h2>\n<ul>\n");
    for c in &detail.classifications {
        body.push_str(&format!("<li>{}</li>\n", escape(c)));
    }
    body.push_str("</ul>\n");

    body.push_str("<h2>Information</h2>\n");
    match &detail.references {
        References::NoData => body.push_str("<p>No data found</p>\n"),
        References::Entries(rows) => {
            body.push_str("<table>\n<tr><th>Type</th><th>Content</th></tr>\n");
            for r in rows {
                body.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    escape(&r.ref_type),
                    escape(&r.content)
                ));
            }
            body.push_str("</table>\n");
        }
    }

    layout(&detail.label, &body)
}

pub fn error_page(text: &str) -> String {
    layout("Error", &message(text))
}

fn join_lines(items: &[String]) -> String {
    items
        .iter()
        .map(|s| escape(s))
        .collect::<Vec<_>>()
        .join("<br>")
}

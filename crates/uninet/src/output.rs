//! Output formatting: table, JSON, YAML, CSV, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, CSV serializes the table rows, plain emits
//! one identifier per line.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact` / `yaml`: serializes the original data via serde
/// - `csv`: serializes the table rows, headers from the field names
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled + serde::Serialize,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Csv => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_csv(&rows)
        }
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// key/value view; CSV falls back to the one-row form via `to_row`.
pub fn render_single<T, R>(
    format: &OutputFormat,
    data: &T,
    to_row: impl Fn(&T) -> R,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled + serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Csv => render_csv(&[to_row(data)]),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub(crate) fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(data).expect("serialization should not fail")
    } else {
        serde_json::to_string_pretty(data).expect("serialization should not fail")
    }
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

fn render_csv<R: serde::Serialize>(rows: &[R]) -> String {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row).expect("serialization should not fail");
    }
    let bytes = wtr.into_inner().expect("flushing an in-memory writer");
    String::from_utf8(bytes)
        .expect("CSV output is UTF-8")
        .trim_end()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Item {
        name: String,
        count: u32,
    }

    #[derive(Tabled, Serialize)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Count")]
        count: u32,
    }

    fn sample() -> Vec<Item> {
        vec![
            Item {
                name: "lan".into(),
                count: 12,
            },
            Item {
                name: "iot".into(),
                count: 3,
            },
        ]
    }

    fn to_row(item: &Item) -> Row {
        Row {
            name: item.name.clone(),
            count: item.count,
        }
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &sample(), to_row, |i| i.name.clone());
        assert_eq!(out, "lan\niot");
    }

    #[test]
    fn json_round_trips_the_original_data() {
        let out = render_list(&OutputFormat::Json, &sample(), to_row, |i| i.name.clone());
        let back: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0]["name"], "lan");
        assert_eq!(back[0]["count"], 12);
    }

    #[test]
    fn csv_has_a_header_row() {
        let out = render_list(&OutputFormat::Csv, &sample(), to_row, |i| i.name.clone());
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("name,count"));
        assert_eq!(lines.next(), Some("lan,12"));
        assert_eq!(lines.next(), Some("iot,3"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn table_renders_headers_from_tabled() {
        let out = render_list(&OutputFormat::Table, &sample(), to_row, |i| i.name.clone());
        assert!(out.contains("Name"));
        assert!(out.contains("Count"));
        assert!(out.contains("lan"));
    }

    #[test]
    fn single_csv_is_one_row() {
        let item = Item {
            name: "lan".into(),
            count: 12,
        };
        let out = render_single(
            &OutputFormat::Csv,
            &item,
            to_row,
            |i| format!("Name: {}", i.name),
            |i| i.name.clone(),
        );
        assert_eq!(out, "name,count\nlan,12");
    }
}

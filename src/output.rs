//! # Report Rendering
//!
//! Plain-text rendering for the collated report: a left-justified column
//! table with a header and dashes separator, and the connector-row layout
//! used when one repository's output value spans several lines.
//!
//! Column widths are measured in characters, columns are joined with a
//! two-space gutter, and the final column is never padded so lines do not
//! carry trailing whitespace.

/// Render rows as a text table.
///
/// When a `header` is given it is emitted first, followed by a separator
/// row of dashes sized to each column. Rows may be ragged; width bookkeeping
/// grows to the longest row seen.
pub fn text_table(header: Option<&[String]>, rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = Vec::new();

    if let Some(header) = header {
        for column in header {
            widths.push(display_width(column));
        }
    }
    for row in rows {
        if widths.len() < row.len() {
            widths.resize(row.len(), 0);
        }
        for (idx, column) in row.iter().enumerate() {
            let width = display_width(column);
            if width > widths[idx] {
                widths[idx] = width;
            }
        }
    }

    let mut table: Vec<&[String]> = Vec::with_capacity(rows.len() + 2);
    let separator: Vec<String>;
    if let Some(header) = header {
        separator = widths.iter().map(|w| "-".repeat(*w)).collect();
        table.push(header);
        table.push(&separator);
    }
    table.extend(rows.iter().map(|row| row.as_slice()));

    let columns = widths.len();
    let mut out = String::new();
    for row in table {
        for (idx, column) in row.iter().enumerate() {
            if idx > 0 {
                out.push_str("  ");
            }
            out.push_str(column);

            let width = display_width(column);
            if idx + 1 < columns && width < widths[idx] {
                out.push_str(&" ".repeat(widths[idx] - width));
            }
        }
        out.push('\n');
    }

    out
}

/// Lay out one name/value pair as table rows.
///
/// A single-line value yields one plain row. A multi-line value yields one
/// row per line with connector prefixes marking the first, middle and last
/// lines; only the first row carries the name.
pub fn format_row(name: &str, value: &str) -> Vec<Vec<String>> {
    let lines: Vec<&str> = value.lines().collect();

    if lines.len() <= 1 {
        return vec![vec![
            name.to_string(),
            lines.first().unwrap_or(&"").to_string(),
        ]];
    }

    let last = lines.len() - 1;
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let (label, connector) = match idx {
                0 => (name, "┌ "),
                _ if idx == last => ("", "└ "),
                _ => ("", "│ "),
            };
            vec![label.to_string(), format!("{connector}{line}")]
        })
        .collect()
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

//! Rendered tables and their text encodings.

use serde_json::{Map, Value as Json};

/// One formatted cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Already rounded.
    Number(f64),
    Text(String),
    /// Stand-in for an undefined value; holds the fill text.
    Fill(String),
}

impl Cell {
    pub fn text(&self) -> String {
        match self {
            Cell::Number(v) => format!("{v}"),
            Cell::Text(s) | Cell::Fill(s) => s.clone(),
        }
    }

    fn to_json(&self) -> Json {
        match self {
            Cell::Number(v) => serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Cell::Text(s) => Json::String(s.clone()),
            Cell::Fill(s) if s.is_empty() => Json::Null,
            Cell::Fill(s) => Json::String(s.clone()),
        }
    }
}

/// A table ready to be written: final column names, formatted cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// RFC 4180 CSV with a header row and no index column.
    #[default]
    Csv,
    /// One JSON object per row.
    Jsonl,
    /// GitHub-flavoured Markdown table.
    Markdown,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "jsonl" => Some(OutputFormat::Jsonl),
            "md" | "markdown" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Markdown => "md",
        }
    }
}

impl RenderedTable {
    pub fn write(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Csv => Ok(self.to_csv()),
            OutputFormat::Jsonl => self.to_jsonl(),
            OutputFormat::Markdown => Ok(self.to_markdown()),
        }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, self.columns.iter().map(String::as_str));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(Cell::text).collect();
            push_csv_line(&mut out, cells.iter().map(String::as_str));
        }
        out
    }

    pub fn to_jsonl(&self) -> anyhow::Result<String> {
        let mut out = String::new();
        for row in &self.rows {
            let obj: Map<String, Json> = self
                .columns
                .iter()
                .cloned()
                .zip(row.iter().map(Cell::to_json))
                .collect();
            out.push_str(&serde_json::to_string(&obj)?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push('|');
        for c in &self.columns {
            out.push_str(&format!(" {} |", md_escape(c)));
        }
        out.push_str("\n|");
        for _ in &self.columns {
            out.push_str("---|");
        }
        out.push('\n');
        for row in &self.rows {
            out.push('|');
            for cell in row {
                out.push_str(&format!(" {} |", md_escape(&cell.text())));
            }
            out.push('\n');
        }
        out
    }
}

fn push_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, f) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_escape(f));
    }
    out.push('\n');
}

/// Escape a string for CSV per RFC 4180.
/// If the string contains comma, double quote, or newline, wrap in quotes and escape quotes.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Round half away from zero to `decimals` places.
///
/// Values that cannot be scaled without overflow are returned unchanged;
/// `-0.0` becomes `0.0`.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = v * scale;
    let r = if scaled.is_finite() {
        scaled.round() / scale
    } else {
        v
    };
    if r == 0.0 { 0.0 } else { r }
}

/// Cell for a statistic: rounded when `decimals` is set, fill when undefined.
pub fn number_cell(v: f64, decimals: Option<u32>, fill: &str) -> Cell {
    if !v.is_finite() {
        return Cell::Fill(fill.to_string());
    }
    match decimals {
        Some(d) => Cell::Number(round_to(v, d)),
        None => Cell::Number(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RenderedTable {
        RenderedTable {
            columns: vec!["NAME".into(), "VALUE".into()],
            rows: vec![
                vec![Cell::Text("Test Result".into()), Cell::Text("PASS".into())],
                vec![Cell::Text("a, \"b\"".into()), Cell::Number(1.5)],
                vec![Cell::Text("x|y".into()), Cell::Fill(String::new())],
            ],
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        assert_eq!(
            sample().to_csv(),
            "NAME,VALUE\nTest Result,PASS\n\"a, \"\"b\"\"\",1.5\nx|y,\n"
        );
    }

    #[test]
    fn jsonl_keeps_numbers_and_nulls() {
        let out = sample().to_jsonl().unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"NAME":"Test Result","VALUE":"PASS"}"#);
        assert_eq!(lines[1], r#"{"NAME":"a, \"b\"","VALUE":1.5}"#);
        assert_eq!(lines[2], r#"{"NAME":"x|y","VALUE":null}"#);
    }

    #[test]
    fn markdown_escapes_pipes() {
        let md = sample().to_markdown();
        assert!(md.starts_with("| NAME | VALUE |\n|---|---|\n"));
        assert!(md.contains("| x\\|y |  |"));
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(20.004, 2), 20.0);
        assert_eq!(round_to(-0.001, 2), 0.0);
        assert!(round_to(-0.001, 2).is_sign_positive());
        assert_eq!(round_to(1234.5, 0), 1235.0);
        assert_eq!(round_to(f64::MAX, 15), f64::MAX);
    }

    #[test]
    fn undefined_values_are_filled() {
        assert_eq!(number_cell(f64::NAN, Some(2), "NaN"), Cell::Fill("NaN".into()));
        assert_eq!(number_cell(3.14159, Some(2), ""), Cell::Number(3.14));
        assert_eq!(number_cell(3.14159, None, ""), Cell::Number(3.14159));
    }

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(Cell::Number(1000.0).text(), "1000");
        assert_eq!(Cell::Number(-7.25).text(), "-7.25");
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::parse("MD"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::parse("html"), None);
        assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
    }
}

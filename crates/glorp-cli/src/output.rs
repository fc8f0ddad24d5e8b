//! Output formatting for CLI

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "table" => OutputFormat::Table,
            _ => OutputFormat::Text,
        }
    }
}

/// Render rows as JSON, a table, or one `text` line per row
pub fn format_rows<T, F>(rows: &[T], format: OutputFormat, text: F) -> String
where
    T: Serialize + Tabled,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string()),
        OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        OutputFormat::Text => rows.iter().map(text).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one value as JSON or through its text form
pub fn format_value<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Table | OutputFormat::Text => text(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: &'static str,
        score: u32,
    }

    #[test]
    fn test_formats() {
        let rows = [Row { name: "glorp", score: 7 }];
        let text = |r: &Row| format!("{} {}", r.name, r.score);

        assert_eq!(format_rows(&rows, OutputFormat::Text, text), "glorp 7");
        assert!(format_rows(&rows, OutputFormat::Json, text).contains("\"score\": 7"));
        let table = format_rows(&rows, OutputFormat::Table, text);
        assert!(table.contains("name") && table.contains("glorp"));
        assert_eq!(OutputFormat::from("TABLE"), OutputFormat::Table);
    }
}

pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use clap::ValueEnum;
use serde_json::Value;

/// Rendering chosen with the global `--output` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed envelope
    #[default]
    Json,
    /// Headline figures, or one row per month for schedules
    Table,
    /// Schedule rows or per-strategy summaries as CSV
    Csv,
    /// The single most useful number
    Minimal,
}

impl OutputFormat {
    /// Print an engine envelope to stdout.
    pub fn render(self, envelope: &Value) {
        match self {
            OutputFormat::Json => json::print_json(envelope),
            OutputFormat::Table => table::print_table(envelope),
            OutputFormat::Csv => csv_out::print_csv(envelope),
            OutputFormat::Minimal => minimal::print_minimal(envelope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_flag_values() {
        assert_eq!(OutputFormat::from_str("csv", true).unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str("MINIMAL", true).unwrap(), OutputFormat::Minimal);
        assert!(OutputFormat::from_str("yaml", true).is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}

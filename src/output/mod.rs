mod chart;
mod cli;
mod json;

pub use chart::downloads_chart;
pub use cli::{
    print_author_detail, print_author_table, print_categories, print_extension_detail,
    print_extension_table, print_stale_notice, print_updates,
};
pub use json::print_json;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

/// Formats an install count, abbreviated (1.2K, 15K, 2.5M) when compact
/// output is enabled.
pub fn compact_number(value: u64, compact: bool) -> String {
    if !compact {
        return value.to_string();
    }
    match value {
        0..=999 => value.to_string(),
        1_000..=999_999 => scaled(value as f64 / 1_000.0, "K"),
        1_000_000..=999_999_999 => scaled(value as f64 / 1_000_000.0, "M"),
        _ => scaled(value as f64 / 1_000_000_000.0, "B"),
    }
}

fn scaled(value: f64, suffix: &str) -> String {
    if value < 10.0 {
        let formatted = format!("{:.1}", value);
        format!("{}{}", formatted.trim_end_matches(".0"), suffix)
    } else {
        format!("{:.0}{}", value, suffix)
    }
}

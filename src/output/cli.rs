use anyhow::Result;
use chrono::{DateTime, Utc};
use tabled::{settings::Style, Table, Tabled};

use super::chart::downloads_chart;
use super::compact_number;
use crate::aggregate::AuthorStats;
use crate::growth::Growth;
use crate::model::Extension;
use crate::view::UpdatesReport;

#[derive(Tabled)]
struct ExtensionRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Extension")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Installs")]
    installs: String,
    #[tabled(rename = "Last Day")]
    last_day: String,
    #[tabled(rename = "Last Week")]
    last_week: String,
}

#[derive(Tabled)]
struct AuthorRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Author")]
    name: String,
    #[tabled(rename = "Handle")]
    handle: String,
    #[tabled(rename = "Installs")]
    installs: String,
    #[tabled(rename = "Last Day")]
    last_day: String,
    #[tabled(rename = "Last Week")]
    last_week: String,
    #[tabled(rename = "Extensions")]
    extensions: usize,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Extensions")]
    extensions: usize,
}

pub fn print_extension_table(extensions: &[Extension], limit: usize, compact: bool) -> Result<()> {
    // Totals cover the whole set, not just the printed rows.
    let total_installs: u64 = extensions.iter().map(|e| e.download_count).sum();
    let installs_last_day: i64 = extensions
        .iter()
        .filter_map(|e| e.growth_last_day.map(|g| g.download_count))
        .sum();

    println!();
    println!(
        "Extensions: {} ({} installs, yesterday {:+})",
        extensions.len(),
        compact_number(total_installs, compact),
        installs_last_day
    );
    println!();

    let rows = extension_rows(extensions, limit, compact);
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    Ok(())
}

pub fn print_author_table(authors: &[AuthorStats], limit: usize, compact: bool) -> Result<()> {
    println!();
    println!("Authors: {}", authors.len());
    println!();

    let limit = effective_limit(limit, authors.len());
    let rows: Vec<AuthorRow> = authors
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, a)| AuthorRow {
            rank: i + 1,
            name: truncate(&a.author.name, 25),
            handle: a.author.handle.clone(),
            installs: compact_number(a.download_count, compact),
            last_day: growth_cell(Some(&a.growth_last_day)),
            last_week: growth_cell(Some(&a.growth_last_week)),
            extensions: a.extensions.len(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    Ok(())
}

pub fn print_updates(report: &UpdatesReport, limit: usize, compact: bool) -> Result<()> {
    print_update_section("New", &report.new, limit, compact);
    print_update_section("Updated", &report.updated, limit, compact);
    Ok(())
}

fn print_update_section(heading: &str, extensions: &[Extension], limit: usize, compact: bool) {
    println!();
    println!("{} ({})", heading, extensions.len());

    if extensions.is_empty() {
        return;
    }

    println!();
    let rows = extension_rows(extensions, limit, compact);
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_extension_detail(extension: &Extension, compact: bool) -> Result<()> {
    println!();
    println!("{}", extension.display_title());
    if !extension.description.is_empty() {
        println!();
        println!("{}", extension.description);
    }

    if let Some(chart) = extension
        .previous_days_downloads
        .as_deref()
        .and_then(downloads_chart)
    {
        println!();
        println!("{}", chart);
    }

    println!();
    print_field(
        "Author",
        &format!(
            "{} ({})",
            extension.author.name,
            extension.author.raycast_page_url()
        ),
    );
    print_field(
        "Total Installs",
        &compact_number(extension.download_count, compact),
    );
    print_field(
        "Installs Previous Day",
        &detail_growth(extension.growth_last_day.as_ref()),
    );
    print_field(
        "Installs last 7 days",
        &detail_growth(extension.growth_last_week.as_ref()),
    );
    if let Some(categories) = &extension.categories {
        if !categories.is_empty() {
            print_field("Categories", &categories.join(", "));
        }
    }
    if let Some(contributors) = &extension.contributors {
        if !contributors.is_empty() {
            let names: Vec<&str> = contributors.iter().map(|c| c.name.as_str()).collect();
            print_field("Contributors", &names.join(", "));
        }
    }
    print_field("Readme", &extension.readme_url);
    print_field("Source Code", &extension.source_url);
    print_field("Store Page", &extension.store_url);
    print_field("Install", &extension.install_deeplink());

    if !extension.commands.is_empty() {
        println!();
        println!("Commands ({}):", extension.commands.len());
        for command in &extension.commands {
            match command.description.as_deref() {
                Some(description) if !description.is_empty() => {
                    println!("  {:<24} {}", command.title, description);
                }
                _ => println!("  {}", command.title),
            }
        }
    }

    Ok(())
}

pub fn print_author_detail(stats: &AuthorStats, compact: bool) -> Result<()> {
    let author = &stats.author;

    println!();
    println!("{}", author.name);
    if let Some(bio) = &author.bio {
        println!();
        println!("{}", bio);
    }

    println!();
    print_field(
        "Username",
        &format!("{} ({})", author.handle, author.raycast_page_url()),
    );
    if let Some(location) = &author.location {
        print_field("Location", location);
    }
    if let Some(website) = &author.website {
        print_field("Website", website);
    }
    if let Some(twitter) = &author.twitter_handle {
        print_field("Twitter", &format!("https://twitter.com/{}", twitter));
    }
    if let Some(github) = &author.github_handle {
        print_field("GitHub", &format!("https://github.com/{}", github));
    }
    print_field(
        "Total Installs",
        &compact_number(stats.download_count, compact),
    );
    print_field(
        "Installs Previous Day",
        &detail_growth(Some(&stats.growth_last_day)),
    );
    print_field(
        "Installs last 7 days",
        &detail_growth(Some(&stats.growth_last_week)),
    );

    println!();
    println!("Extensions ({}):", stats.extensions.len());
    for extension in &stats.extensions {
        println!(
            "  {:<40} {}",
            truncate(extension.display_title(), 40),
            compact_number(extension.download_count, compact)
        );
    }

    Ok(())
}

pub fn print_categories(counts: &[(String, usize)]) -> Result<()> {
    println!();
    println!("Categories: {}", counts.len());
    println!();

    let rows: Vec<CategoryRow> = counts
        .iter()
        .map(|(name, count)| CategoryRow {
            name: name.clone(),
            extensions: *count,
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    Ok(())
}

pub fn print_stale_notice(fetched_at: DateTime<Utc>) {
    println!(
        "Refresh failed; showing cached data from {}",
        fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

fn extension_rows(extensions: &[Extension], limit: usize, compact: bool) -> Vec<ExtensionRow> {
    let limit = effective_limit(limit, extensions.len());
    extensions
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, e)| ExtensionRow {
            rank: i + 1,
            title: truncate(e.display_title(), 40),
            author: truncate(&e.author.name, 25),
            installs: compact_number(e.download_count, compact),
            last_day: growth_cell(e.growth_last_day.as_ref()),
            last_week: growth_cell(e.growth_last_week.as_ref()),
        })
        .collect()
}

/// A limit of 0 means all rows.
fn effective_limit(limit: usize, len: usize) -> usize {
    if limit == 0 {
        len
    } else {
        limit
    }
}

fn growth_cell(growth: Option<&Growth>) -> String {
    match growth {
        Some(g) => format!("{:+} ({:+.2}%)", g.download_count, g.percentage()),
        None => "-".to_string(),
    }
}

fn detail_growth(growth: Option<&Growth>) -> String {
    match growth {
        Some(g) => format!("{:+} ({:+.3}%)", g.download_count, g.percentage()),
        None => "no data".to_string(),
    }
}

fn print_field(label: &str, value: &str) {
    println!("  {:<22} {}", label, value);
}

// Titles are not always ASCII, so count and cut by characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_cell_formats_signed_values() {
        let growth = Growth {
            download_count: 20,
            download_change_percentage: 1.2,
        };
        assert_eq!(growth_cell(Some(&growth)), "+20 (+20.00%)");

        let shrinking = Growth {
            download_count: -5,
            download_change_percentage: 0.95,
        };
        assert_eq!(growth_cell(Some(&shrinking)), "-5 (-5.00%)");

        assert_eq!(growth_cell(None), "-");
    }

    #[test]
    fn test_detail_growth_uses_three_decimals() {
        let growth = Growth {
            download_count: 7,
            download_change_percentage: 1.0125,
        };
        assert_eq!(detail_growth(Some(&growth)), "+7 (+1.250%)");
        assert_eq!(detail_growth(None), "no data");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
        assert_eq!(truncate("a-rather-long-title", 10), "a-rathe...");
    }

    #[test]
    fn test_truncate_multibyte_title() {
        assert_eq!(truncate("émoji 🚀 timer", 13), "émoji 🚀 timer");
        assert_eq!(truncate("émoji 🚀 timer tracker deluxe", 10), "émoji 🚀...");
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(0, 42), 42);
        assert_eq!(effective_limit(10, 42), 10);
        assert_eq!(effective_limit(100, 42), 100);
    }
}

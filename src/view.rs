//! Sorting, filtering and lookup projections over listings and authors.

use std::cmp::Reverse;

use chrono::{DateTime, Days, Local};
use clap::ValueEnum;
use serde::Serialize;

use crate::aggregate::AuthorStats;
use crate::model::Extension;

/// Sort orders for the extension list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtensionSort {
    Newest,
    Oldest,
    Downloads,
    LeastDownloads,
    Updated,
    DayInstalls,
    DayGrowth,
    WeekInstalls,
    WeekGrowth,
}

/// Sort orders for the author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthorSort {
    Downloads,
    DayInstalls,
    DayGrowth,
    WeekInstalls,
    WeekGrowth,
}

/// Time windows for the updates listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpdateWindow {
    Today,
    #[value(name = "1d")]
    OneDay,
    #[value(name = "2d")]
    TwoDays,
    #[value(name = "3d")]
    ThreeDays,
    #[value(name = "7d")]
    SevenDays,
}

impl UpdateWindow {
    fn days(self) -> u64 {
        match self {
            UpdateWindow::Today => 0,
            UpdateWindow::OneDay => 1,
            UpdateWindow::TwoDays => 2,
            UpdateWindow::ThreeDays => 3,
            UpdateWindow::SevenDays => 7,
        }
    }
}

pub fn sort_extensions(extensions: &mut [Extension], sort: ExtensionSort) {
    match sort {
        ExtensionSort::Newest => extensions.sort_by_key(|e| Reverse(e.created_at)),
        ExtensionSort::Oldest => extensions.sort_by_key(|e| e.created_at),
        ExtensionSort::Downloads => extensions.sort_by_key(|e| Reverse(e.download_count)),
        ExtensionSort::LeastDownloads => extensions.sort_by_key(|e| e.download_count),
        ExtensionSort::Updated => extensions.sort_by_key(|e| Reverse(e.updated_at)),
        ExtensionSort::DayInstalls => extensions.sort_by_key(|e| Reverse(day_installs(e))),
        ExtensionSort::DayGrowth => {
            extensions.sort_by(|a, b| day_ratio(b).total_cmp(&day_ratio(a)))
        }
        ExtensionSort::WeekInstalls => extensions.sort_by_key(|e| Reverse(week_installs(e))),
        ExtensionSort::WeekGrowth => {
            extensions.sort_by(|a, b| week_ratio(b).total_cmp(&week_ratio(a)))
        }
    }
}

// Listings without growth data sort as zero, which places them below
// flat (ratio 1.0) listings in the growth orders.
fn day_installs(extension: &Extension) -> i64 {
    extension
        .growth_last_day
        .map(|g| g.download_count)
        .unwrap_or(0)
}

fn day_ratio(extension: &Extension) -> f64 {
    extension
        .growth_last_day
        .map(|g| g.download_change_percentage)
        .unwrap_or(0.0)
}

fn week_installs(extension: &Extension) -> i64 {
    extension
        .growth_last_week
        .map(|g| g.download_count)
        .unwrap_or(0)
}

fn week_ratio(extension: &Extension) -> f64 {
    extension
        .growth_last_week
        .map(|g| g.download_change_percentage)
        .unwrap_or(0.0)
}

pub fn sort_authors(authors: &mut [AuthorStats], sort: AuthorSort) {
    match sort {
        AuthorSort::Downloads => authors.sort_by_key(|a| Reverse(a.download_count)),
        AuthorSort::DayInstalls => {
            authors.sort_by_key(|a| Reverse(a.growth_last_day.download_count))
        }
        AuthorSort::DayGrowth => authors.sort_by(|a, b| {
            b.growth_last_day
                .download_change_percentage
                .total_cmp(&a.growth_last_day.download_change_percentage)
        }),
        AuthorSort::WeekInstalls => {
            authors.sort_by_key(|a| Reverse(a.growth_last_week.download_count))
        }
        AuthorSort::WeekGrowth => authors.sort_by(|a, b| {
            b.growth_last_week
                .download_change_percentage
                .total_cmp(&a.growth_last_week.download_change_percentage)
        }),
    }
}

/// Listings created and updated within one window.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatesReport {
    pub new: Vec<Extension>,
    pub updated: Vec<Extension>,
}

/// Splits the listing set into new and updated entries for the window.
///
/// `Today` matches the calendar date of `now`; the day windows compare
/// full timestamps against `now` stepped back that many calendar days.
/// Both sections are ordered by descending install count.
pub fn updates(extensions: &[Extension], window: UpdateWindow, now: DateTime<Local>) -> UpdatesReport {
    let (new, updated): (Vec<Extension>, Vec<Extension>) = match window {
        UpdateWindow::Today => {
            let today = now.date_naive();
            (
                extensions
                    .iter()
                    .filter(|e| e.created().date_naive() == today)
                    .cloned()
                    .collect(),
                extensions
                    .iter()
                    .filter(|e| e.updated().date_naive() == today)
                    .cloned()
                    .collect(),
            )
        }
        _ => {
            let since = now - Days::new(window.days());
            (
                extensions
                    .iter()
                    .filter(|e| e.created() >= since)
                    .cloned()
                    .collect(),
                extensions
                    .iter()
                    .filter(|e| e.updated() >= since)
                    .cloned()
                    .collect(),
            )
        }
    };

    let mut report = UpdatesReport { new, updated };
    sort_extensions(&mut report.new, ExtensionSort::Downloads);
    sort_extensions(&mut report.updated, ExtensionSort::Downloads);
    report
}

/// All category names across the listing set, alphabetically.
pub fn all_categories(extensions: &[Extension]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for extension in extensions {
        for category in extension.categories.iter().flatten() {
            if !result.contains(category) {
                result.push(category.clone());
            }
        }
    }
    result.sort();
    result
}

/// Category names with the number of listings tagged with each.
pub fn category_counts(extensions: &[Extension]) -> Vec<(String, usize)> {
    all_categories(extensions)
        .into_iter()
        .map(|category| {
            let count = extensions
                .iter()
                .filter(|e| has_category(e, &category))
                .count();
            (category, count)
        })
        .collect()
}

/// Listings tagged with the given category, exact match.
pub fn filter_category(extensions: &[Extension], category: &str) -> Vec<Extension> {
    extensions
        .iter()
        .filter(|e| has_category(e, category))
        .cloned()
        .collect()
}

fn has_category(extension: &Extension, category: &str) -> bool {
    extension
        .categories
        .as_ref()
        .map(|categories| categories.iter().any(|c| c == category))
        .unwrap_or(false)
}

/// Looks up one listing by exact name, falling back to a
/// case-insensitive title match.
pub fn find_extension<'a>(extensions: &'a [Extension], name: &str) -> Option<&'a Extension> {
    extensions.iter().find(|e| e.name == name).or_else(|| {
        extensions
            .iter()
            .find(|e| e.display_title().eq_ignore_ascii_case(name))
    })
}

pub fn find_author<'a>(authors: &'a [AuthorStats], handle: &str) -> Option<&'a AuthorStats> {
    authors.iter().find(|a| a.author.handle == handle)
}

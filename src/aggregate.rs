//! Author-level rollups over the enriched listing set.

use std::collections::HashMap;

use serde::Serialize;

use crate::growth::Growth;
use crate::model::{Extension, User};

/// Combined statistics for one author handle.
///
/// Unlike per-listing growth these fields are always present; authors
/// whose listings carry no history data end up at the neutral values.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorStats {
    pub author: User,
    pub download_count: u64,
    pub growth_last_day: Growth,
    pub growth_last_week: Growth,
    pub extensions: Vec<Extension>,
}

/// Groups listings by author handle, one entry per handle in order of
/// first occurrence.
///
/// Download counts and growth deltas sum across the handle's listings;
/// growth ratios multiply, seeded at 1.0. A listing without growth data
/// for a window contributes the neutral elements (delta 0, ratio 1.0),
/// so partial data still participates. The first listing seen for a
/// handle supplies the author profile; divergent profiles on later
/// listings are ignored.
pub fn aggregate_by_author(extensions: &[Extension]) -> Vec<AuthorStats> {
    let mut stats: Vec<AuthorStats> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for extension in extensions {
        let handle = &extension.author.handle;
        let slot = match slots.get(handle) {
            Some(&slot) => slot,
            None => {
                slots.insert(handle.clone(), stats.len());
                stats.push(AuthorStats {
                    author: extension.author.clone(),
                    download_count: 0,
                    growth_last_day: Growth::neutral(),
                    growth_last_week: Growth::neutral(),
                    extensions: Vec::new(),
                });
                stats.len() - 1
            }
        };

        let entry = &mut stats[slot];
        entry.download_count += extension.download_count;
        accumulate(&mut entry.growth_last_day, extension.growth_last_day);
        accumulate(&mut entry.growth_last_week, extension.growth_last_week);
        entry.extensions.push(extension.clone());
    }

    stats
}

fn accumulate(total: &mut Growth, growth: Option<Growth>) {
    if let Some(growth) = growth {
        total.download_count += growth.download_count;
        total.download_change_percentage *= growth.download_change_percentage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Icons;

    fn user(name: &str, handle: &str) -> User {
        User {
            name: name.to_string(),
            handle: handle.to_string(),
            avatar: None,
            twitter_handle: None,
            github_handle: None,
            location: None,
            website: None,
            bio: None,
        }
    }

    fn ext(name: &str, handle: &str, download_count: u64) -> Extension {
        Extension {
            id: format!("id-{}", name),
            name: name.to_string(),
            title: name.to_string(),
            download_count,
            author: user("Some Author", handle),
            owner: None,
            store_url: format!("https://www.raycast.com/{}/{}", handle, name),
            icons: Icons::default(),
            description: String::new(),
            categories: None,
            commands: Vec::new(),
            contributors: None,
            source_url: String::new(),
            readme_url: String::new(),
            created_at: 0,
            updated_at: 0,
            growth_last_day: None,
            growth_last_week: None,
            previous_days_downloads: None,
        }
    }

    fn growth(download_count: i64, ratio: f64) -> Option<Growth> {
        Some(Growth {
            download_count,
            download_change_percentage: ratio,
        })
    }

    #[test]
    fn test_aggregate_sums_download_counts() {
        let listings = vec![ext("one", "alice", 100), ext("two", "alice", 250)];
        let stats = aggregate_by_author(&listings);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].download_count, 350);
        assert_eq!(stats[0].extensions.len(), 2);
    }

    #[test]
    fn test_aggregate_absent_growth_is_neutral() {
        let mut with_growth = ext("one", "alice", 100);
        with_growth.growth_last_day = growth(10, 1.1);
        let without_growth = ext("two", "alice", 50);

        let stats = aggregate_by_author(&[with_growth, without_growth]);

        assert_eq!(stats[0].growth_last_day.download_count, 10);
        assert_eq!(stats[0].growth_last_day.download_change_percentage, 1.1);
    }

    #[test]
    fn test_aggregate_multiplies_ratios() {
        let mut first = ext("one", "alice", 100);
        first.growth_last_day = growth(10, 1.1);
        let mut second = ext("two", "alice", 50);
        second.growth_last_day = growth(5, 1.2);

        let stats = aggregate_by_author(&[first, second]);

        assert_eq!(stats[0].growth_last_day.download_count, 15);
        // Ratios compound by multiplication, without normalization.
        assert_eq!(stats[0].growth_last_day.download_change_percentage, 1.1 * 1.2);
    }

    #[test]
    fn test_aggregate_first_occurrence_order() {
        let listings = vec![
            ext("one", "alice", 10),
            ext("two", "bob", 20),
            ext("three", "alice", 30),
        ];

        let stats = aggregate_by_author(&listings);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].author.handle, "alice");
        assert_eq!(stats[0].download_count, 40);
        assert_eq!(stats[1].author.handle, "bob");
        assert_eq!(stats[1].download_count, 20);
    }

    #[test]
    fn test_aggregate_first_profile_wins() {
        let mut first = ext("one", "alice", 10);
        first.author = User {
            bio: Some("original bio".to_string()),
            ..user("Alice", "alice")
        };
        let mut second = ext("two", "alice", 20);
        second.author = User {
            bio: Some("changed bio".to_string()),
            ..user("Alice Renamed", "alice")
        };

        let stats = aggregate_by_author(&[first, second]);

        assert_eq!(stats[0].author.name, "Alice");
        assert_eq!(stats[0].author.bio.as_deref(), Some("original bio"));
    }

    #[test]
    fn test_aggregate_tracks_both_windows_independently() {
        let mut first = ext("one", "alice", 100);
        first.growth_last_day = growth(10, 1.1);
        first.growth_last_week = growth(30, 1.5);
        let mut second = ext("two", "alice", 50);
        second.growth_last_week = growth(20, 1.25);

        let stats = aggregate_by_author(&[first, second]);

        assert_eq!(stats[0].growth_last_day.download_count, 10);
        assert_eq!(stats[0].growth_last_day.download_change_percentage, 1.1);
        assert_eq!(stats[0].growth_last_week.download_count, 50);
        assert_eq!(stats[0].growth_last_week.download_change_percentage, 1.5 * 1.25);
    }

    #[test]
    fn test_aggregate_empty_input() {
        let stats = aggregate_by_author(&[]);
        assert!(stats.is_empty());
    }
}

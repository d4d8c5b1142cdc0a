use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::growth::Growth;

/// A store author or contributor profile, always embedded in listing data
/// and never fetched on its own. `handle` is the unique identity; display
/// names may collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl User {
    /// Profile page on raycast.com.
    pub fn raycast_page_url(&self) -> String {
        format!("https://www.raycast.com/{}", self.handle)
    }
}

/// A single command contributed by an extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Icons {
    pub light: Option<String>,
    pub dark: Option<String>,
}

/// One marketplace listing from the store API.
///
/// The three trailing fields are not part of the API document; the
/// enrichment pass derives them from the history snapshots and they stay
/// `None` when no matching history exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub download_count: u64,
    pub author: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    pub store_url: String,
    #[serde(default)]
    pub icons: Icons,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<User>>,
    pub source_url: String,
    pub readme_url: String,
    /// Seconds since epoch.
    pub created_at: i64,
    /// Seconds since epoch.
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_last_day: Option<Growth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_last_week: Option<Growth>,
    /// Oldest day first, current count appended last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_days_downloads: Option<Vec<u64>>,
}

impl Extension {
    /// Some listings ship without a title; fall back to the name.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    /// `raycast://` deeplink that installs the extension from the web store.
    pub fn install_deeplink(&self) -> String {
        format!(
            "raycast://extensions/{}/{}?source=webstore",
            self.author.handle, self.name
        )
    }

    pub fn created(&self) -> DateTime<Local> {
        local_datetime(self.created_at)
    }

    pub fn updated(&self) -> DateTime<Local> {
        local_datetime(self.updated_at)
    }
}

fn local_datetime(secs: i64) -> DateTime<Local> {
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "id": "aBcD123",
        "name": "pomodoro",
        "title": "Pomodoro Timer",
        "download_count": 4210,
        "author": {
            "name": "Jane Doe",
            "handle": "janedoe",
            "avatar": "https://files.raycast.com/avatar.png",
            "twitter_handle": null,
            "github_handle": "janedoe",
            "location": null,
            "website": null,
            "bio": null
        },
        "owner": {
            "name": "Jane Doe",
            "handle": "janedoe"
        },
        "store_url": "https://www.raycast.com/janedoe/pomodoro",
        "icons": {"light": "https://files.raycast.com/icon.png", "dark": null},
        "description": "Simple pomodoro timer",
        "categories": ["Productivity"],
        "commands": [
            {
                "id": "cmd1",
                "name": "start",
                "title": "Start Timer",
                "subtitle": "Pomodoro",
                "description": "Starts a session"
            }
        ],
        "source_url": "https://github.com/janedoe/pomodoro",
        "readme_url": "https://github.com/janedoe/pomodoro/blob/main/README.md",
        "created_at": 1636012800,
        "updated_at": 1678838400
    }"#;

    #[test]
    fn test_listing_parses_api_document() {
        let ext: Extension = serde_json::from_str(LISTING).unwrap();

        assert_eq!(ext.name, "pomodoro");
        assert_eq!(ext.display_title(), "Pomodoro Timer");
        assert_eq!(ext.download_count, 4210);
        assert_eq!(ext.author.handle, "janedoe");
        assert_eq!(ext.author.twitter_handle, None);
        assert_eq!(ext.commands.len(), 1);
        assert_eq!(ext.categories.as_deref(), Some(&["Productivity".to_string()][..]));
        assert_eq!(ext.contributors, None);

        // Derived fields are absent until the enrichment pass runs.
        assert_eq!(ext.growth_last_day, None);
        assert_eq!(ext.growth_last_week, None);
        assert_eq!(ext.previous_days_downloads, None);
    }

    #[test]
    fn test_display_title_falls_back_to_name() {
        let mut ext: Extension = serde_json::from_str(LISTING).unwrap();
        ext.title = String::new();
        assert_eq!(ext.display_title(), "pomodoro");
    }

    #[test]
    fn test_urls() {
        let ext: Extension = serde_json::from_str(LISTING).unwrap();
        assert_eq!(
            ext.author.raycast_page_url(),
            "https://www.raycast.com/janedoe"
        );
        assert_eq!(
            ext.install_deeplink(),
            "raycast://extensions/janedoe/pomodoro?source=webstore"
        );
    }

    #[test]
    fn test_derived_fields_survive_a_cache_round_trip() {
        let mut ext: Extension = serde_json::from_str(LISTING).unwrap();
        ext.growth_last_day = Some(Growth {
            download_count: 20,
            download_change_percentage: 1.2,
        });
        ext.previous_days_downloads = Some(vec![10, 20, 30]);

        let json = serde_json::to_string(&ext).unwrap();
        let back: Extension = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ext);
    }
}

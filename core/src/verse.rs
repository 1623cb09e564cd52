use core::future::Future;
use serde::{Deserialize, Serialize};

use crate::{Day, FetchError, StorageKey, VerseQuery};

/// Highest sequence number accepted from the API as a day.
pub const MAX_VERSE_DAY: Day = 31;

/// One record of the verse-listing response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVerse {
    pub sequence: i64,
    #[serde(default)]
    pub book_name: String,
    #[serde(default)]
    pub book_display_name: String,
    #[serde(default)]
    pub chapter: u32,
    #[serde(default)]
    pub verse: u32,
    pub content: String,
    pub reference: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseListResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub temple: String,
    #[serde(default)]
    pub batch: u32,
    pub verses: Vec<ApiVerse>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseEntry {
    pub day: Day,
    pub reference: String,
    pub text: String,
}

impl VerseEntry {
    fn from_api(verse: ApiVerse) -> Option<Self> {
        let day = Day::try_from(verse.sequence)
            .ok()
            .filter(|day| (1..=MAX_VERSE_DAY).contains(day))?;
        Some(Self {
            day,
            reference: verse.reference,
            text: verse.content,
        })
    }
}

/// Verses for one identity, at most one per day.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerseList(Vec<VerseEntry>);

impl VerseList {
    pub fn from_response(response: VerseListResponse) -> Self {
        let mut entries: Vec<VerseEntry> = Vec::with_capacity(response.verses.len());
        for verse in response.verses {
            let sequence = verse.sequence;
            match VerseEntry::from_api(verse) {
                Some(entry) if entries.iter().any(|e| e.day == entry.day) => {
                    log::warn!("dropping duplicate verse for day {}", entry.day);
                }
                Some(entry) => entries.push(entry),
                None => log::warn!("dropping verse with out-of-range sequence {}", sequence),
            }
        }
        Self(entries)
    }

    pub fn get(&self, day: Day) -> Option<&VerseEntry> {
        self.0.iter().find(|entry| entry.day == day)
    }

    pub fn entries(&self) -> &[VerseEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl StorageKey for VerseList {
    const KEY: &'static str = "advent:verses";
}

/// Remote collaborator that lists verses for an identity.
pub trait VerseSource {
    fn fetch_verses(
        &self,
        query: &VerseQuery,
    ) -> impl Future<Output = Result<VerseListResponse, FetchError>>;
}

//! Listening-stats source for the analytics tools
//!
//! The analytics built-ins read from this trait rather than a concrete
//! database. `MemoryStats` is the default in-process source, seeded with
//! fixture data; a SQL-backed source plugs in behind the same seam.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One ranked song row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongRow {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub plays: u64,
}

/// One ranked artist row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistRow {
    pub name: String,
    pub plays: u64,
    pub trend: i32,
}

/// One ranked album row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumRow {
    pub title: String,
    pub artist: String,
    pub plays: u64,
}

/// Read-only source of listening statistics
pub trait StatsSource: Send + Sync {
    fn top_songs(&self, period: &str, limit: usize) -> Vec<SongRow>;
    fn top_artists(&self, period: &str, limit: usize) -> Vec<ArtistRow>;
    fn top_albums(&self, period: &str, limit: usize) -> Vec<AlbumRow>;
    fn listening_minutes(&self, period: &str) -> u64;
    fn charts(&self, period: &str) -> Vec<SongRow>;
    fn recent_plays(&self, limit: usize) -> Vec<SongRow>;
    fn search_tracks(&self, query: &str, limit: usize) -> Vec<SongRow>;
}

/// In-memory stats source seeded with fixture data
#[derive(Debug)]
pub struct MemoryStats {
    songs: Vec<SongRow>,
    artists: Vec<ArtistRow>,
    albums: Vec<AlbumRow>,
    weekly_minutes: u64,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self {
            songs: vec![
                song("Anti-Hero", "Taylor Swift", "Midnights", 12_500_000),
                song("Kill Bill", "SZA", "SOS", 11_200_000),
                song("As It Was", "Harry Styles", "Harry's House", 9_800_000),
                song("Creepin'", "Metro Boomin", "Heroes & Villains", 8_400_000),
                song("Die For You", "The Weeknd", "Starboy", 15_600_000),
            ],
            artists: vec![
                artist("Taylor Swift", 102_300_000, 5),
                artist("The Weeknd", 84_500_000, 12),
                artist("Bad Bunny", 67_200_000, -2),
                artist("Drake", 55_100_000, 1),
                artist("SZA", 42_000_000, 15),
            ],
            albums: vec![
                album("Midnights", "Taylor Swift", 45_000_000),
                album("SOS", "SZA", 38_000_000),
                album("Un Verano Sin Ti", "Bad Bunny", 62_000_000),
                album("Starboy", "The Weeknd", 29_000_000),
            ],
            weekly_minutes: 46_100,
        }
    }

    /// Replaces the seeded rows, for tests and custom harnesses
    pub fn with_songs(mut self, songs: Vec<SongRow>) -> Self {
        self.songs = songs;
        self
    }
}

impl Default for MemoryStats {
    fn default() -> Self {
        Self::new()
    }
}

fn song(title: &str, artist: &str, album: &str, plays: u64) -> SongRow {
    SongRow {
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        plays,
    }
}

fn artist(name: &str, plays: u64, trend: i32) -> ArtistRow {
    ArtistRow {
        name: name.to_string(),
        plays,
        trend,
    }
}

fn album(title: &str, artist: &str, plays: u64) -> AlbumRow {
    AlbumRow {
        title: title.to_string(),
        artist: artist.to_string(),
        plays,
    }
}

impl StatsSource for MemoryStats {
    fn top_songs(&self, _period: &str, limit: usize) -> Vec<SongRow> {
        let mut rows = self.songs.clone();
        rows.sort_by(|a, b| b.plays.cmp(&a.plays));
        rows.truncate(limit);
        rows
    }

    fn top_artists(&self, _period: &str, limit: usize) -> Vec<ArtistRow> {
        let mut rows = self.artists.clone();
        rows.sort_by(|a, b| b.plays.cmp(&a.plays));
        rows.truncate(limit);
        rows
    }

    fn top_albums(&self, _period: &str, limit: usize) -> Vec<AlbumRow> {
        let mut rows = self.albums.clone();
        rows.sort_by(|a, b| b.plays.cmp(&a.plays));
        rows.truncate(limit);
        rows
    }

    fn listening_minutes(&self, period: &str) -> u64 {
        match period {
            "Daily" => self.weekly_minutes / 7,
            "Monthly" => self.weekly_minutes * 4,
            "All Time" => self.weekly_minutes * 52,
            _ => self.weekly_minutes,
        }
    }

    fn charts(&self, period: &str) -> Vec<SongRow> {
        self.top_songs(period, 10)
    }

    fn recent_plays(&self, limit: usize) -> Vec<SongRow> {
        self.songs.iter().take(limit).cloned().collect()
    }

    fn search_tracks(&self, query: &str, limit: usize) -> Vec<SongRow> {
        let needle = query.to_lowercase();
        self.songs
            .iter()
            .filter(|s| {
                s.title.to_lowercase().contains(&needle)
                    || s.artist.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Serializes ranked rows with 1-based ranks, the shape tool results use
pub fn ranked_json<T: Serialize>(rows: &[T]) -> Value {
    json!(
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let mut obj = serde_json::to_value(row).unwrap_or(Value::Null);
                if let Some(map) = obj.as_object_mut() {
                    map.insert("rank".to_string(), json!(i + 1));
                }
                obj
            })
            .collect::<Vec<_>>()
    )
}

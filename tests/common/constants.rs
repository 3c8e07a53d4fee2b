//! Shared constants for end-to-end tests
//!
//! When the seeded test data changes (artists, songs, users, pools),
//! update only this file.

// ============================================================================
// Tracked Artists
// ============================================================================

/// Display name of the first tracked artist, as the provider spells it
pub const ARTIST_1_NAME: &str = "The Test Band";

/// Catalog slug of [`ARTIST_1_NAME`]
pub const ARTIST_1_SLUG: &str = "the_test_band";

/// Display name of the second tracked artist
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

pub const ARTIST_2_SLUG: &str = "jazz_ensemble";

/// Tracked, but the provider has never heard of it
pub const UNKNOWN_ARTIST_NAME: &str = "Nobody Knows Me";

// ============================================================================
// Songs
// ============================================================================

/// Song by The Test Band on "First Album"
pub const SONG_1_TITLE: &str = "Opening Track";
pub const SONG_1_SLUG: &str = "opening_track";

/// Song by The Test Band with no album, stored as a single
pub const SONG_2_TITLE: &str = "Lonely Single";
pub const SONG_2_SLUG: &str = "lonely_single";

/// Song by Jazz Ensemble on "Jazz Collection"
pub const SONG_3_TITLE: &str = "Blue Night";
pub const SONG_3_SLUG: &str = "blue_night";

pub const ALBUM_1_NAME: &str = "First Album";
pub const ALBUM_2_NAME: &str = "Jazz Collection";

/// Song IDs as they appear in search hits and pools
pub const SONG_1_ID: &str = "the_test_band/opening_track";
pub const SONG_2_ID: &str = "the_test_band/lonely_single";
pub const SONG_3_ID: &str = "jazz_ensemble/blue_night";

/// Total songs the provider lists across all tracked artists
pub const SEEDED_SONGS: usize = 3;

// ============================================================================
// Media
// ============================================================================

/// Bytes every fake media URL serves
pub const AUDIO_BYTES: &[u8] = b"ID3-fake-audio-0123456789-abcdefghijklmnopqrstuvwxyz";

pub const AUDIO_CONTENT_TYPE: &str = "audio/webm";

// ============================================================================
// Users and Pools
// ============================================================================

/// Has listened to SONG_1 and liked SONG_3
pub const LISTENER_USER: &str = "listener";

/// Has no activity files at all
pub const NEW_USER: &str = "newcomer";

/// IDs in Popular.json, includes SONG_1 and SONG_3
pub const POPULAR_IDS: &[&str] = &[SONG_1_ID, SONG_3_ID, "other/popular_one", "other/popular_two"];

/// IDs in Tab50.json, overlaps with Popular.json on SONG_3
pub const CHART_IDS: &[&str] = &[SONG_3_ID, "other/chart_one", SONG_2_ID];

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Default timeout for HTTP requests in tests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum time for the server to let go of an upstream after the client left (milliseconds)
pub const UPSTREAM_RELEASE_TIMEOUT_MS: u64 = 5000;

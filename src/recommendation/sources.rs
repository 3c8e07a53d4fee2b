//! Readers for the documents the recommendation engine works from.
//!
//! None of these files belong to this service: user activity is written by
//! the session service and the pools by whatever refreshes the charts. They
//! are read on every request and anything missing or broken counts as empty.

use super::models::{
    entry_ids, CandidatePools, CandidateSong, HistoryDocument, LikesDocument, PoolDocument,
    UserActivity,
};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct RecommendationSources {
    users_dir: PathBuf,
    popular_file: PathBuf,
    chart_file: PathBuf,
}

impl RecommendationSources {
    pub fn new(users_dir: PathBuf, popular_file: PathBuf, chart_file: PathBuf) -> Self {
        Self {
            users_dir,
            popular_file,
            chart_file,
        }
    }

    pub fn users_dir(&self) -> &Path {
        &self.users_dir
    }

    /// History and likes of `user`. The caller validates the name.
    pub fn load_activity(&self, user: &str) -> UserActivity {
        let user_dir = self.users_dir.join(user);
        let history: HistoryDocument =
            read_document_or_default(&user_dir.join(format!("{}.json", user)));
        let likes: LikesDocument =
            read_document_or_default(&user_dir.join(format!("{}likedandplaylist.json", user)));

        UserActivity {
            history: entry_ids(history.history),
            liked: entry_ids(likes.liked),
        }
    }

    pub fn load_pools(&self) -> CandidatePools {
        CandidatePools {
            popular: read_pool(&self.popular_file),
            chart: read_pool(&self.chart_file),
        }
    }
}

/// User names become path components, so only plain names are accepted.
pub fn is_valid_user_name(user: &str) -> bool {
    !user.is_empty()
        && user != "."
        && user != ".."
        && !user.contains(['/', '\\', '\0'])
}

fn read_pool(path: &Path) -> Vec<CandidateSong> {
    let document: PoolDocument = read_document_or_default(path);
    document
        .songs
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(song) => Some(song),
            Err(err) => {
                warn!("Skipping pool entry in {:?}: {}", path, err);
                None
            }
        })
        .collect()
}

fn read_document_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!("No document at {:?}: {}", path, err);
            return T::default();
        }
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(document) => document,
        Err(err) => {
            warn!("Ignoring unreadable document {:?}: {}", path, err);
            T::default()
        }
    }
}

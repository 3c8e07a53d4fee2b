use super::models::{CandidatePools, CandidateSong, UserActivity};
use super::sources::{is_valid_user_name, RecommendationSources};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Invalid user name: {0:?}")]
    InvalidUser(String),
}

/// Suggests pool songs a user has neither played nor liked.
///
/// 1. Exclude every id in the user's history and likes
/// 2. Concatenate the popular and chart pools and shuffle them
/// 3. Take candidates in shuffled order, skipping excluded ids and ids
///    already taken, until `count` songs are picked or the pool runs out
pub fn recommend<R: Rng + ?Sized>(
    activity: &UserActivity,
    pools: CandidatePools,
    count: usize,
    rng: &mut R,
) -> Vec<CandidateSong> {
    let mut excluded: HashSet<String> = activity
        .history
        .iter()
        .chain(activity.liked.iter())
        .cloned()
        .collect();

    let mut pool = pools.popular;
    pool.extend(pools.chart);
    pool.shuffle(rng);

    let mut picked = Vec::with_capacity(count.min(pool.len()));
    for song in pool {
        if picked.len() >= count {
            break;
        }
        if excluded.insert(song.id.clone()) {
            picked.push(song);
        }
    }
    picked
}

pub struct RecommendationEngine {
    sources: RecommendationSources,
    default_count: usize,
}

impl RecommendationEngine {
    pub fn new(sources: RecommendationSources, default_count: usize) -> Self {
        Self {
            sources,
            default_count,
        }
    }

    pub fn default_count(&self) -> usize {
        self.default_count
    }

    /// Reads the user's activity and the current pools, then recommends.
    pub fn recommend_for(
        &self,
        user: &str,
        count: Option<usize>,
    ) -> Result<Vec<CandidateSong>, RecommendationError> {
        if !is_valid_user_name(user) {
            return Err(RecommendationError::InvalidUser(user.to_string()));
        }
        let count = count.unwrap_or(self.default_count);
        let activity = self.sources.load_activity(user);
        let pools = self.sources.load_pools();
        debug!(
            "Recommending up to {} of {} candidates for {} ({} known songs)",
            count,
            pools.len(),
            user,
            activity.history.len() + activity.liked.len()
        );
        Ok(recommend(&activity, pools, count, &mut rand::rng()))
    }
}

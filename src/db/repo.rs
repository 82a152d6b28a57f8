use async_trait::async_trait;

use super::model::*;

#[async_trait]
pub trait VoteRepo: Send + Sync {
    /// Append one vote. No uniqueness constraint and no deduplication: a
    /// movie may accumulate any number of identical submissions.
    async fn insert_vote(&self, vote: &Vote) -> DbResult<()>;

    /// Count votes for one movie, grouped by vote type. An id with no
    /// stored votes yields an empty map.
    async fn vote_tally(&self, imdb_id: &str) -> DbResult<VoteTally>;
}

use serde::Deserialize;

/// Body of `POST /votes`. Unknown fields are rejected so a typoed field
/// name fails loudly instead of recording a half-empty vote.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteBody {
    #[serde(rename = "imdbId")]
    pub imdb_id: String,
    #[serde(rename = "voteType")]
    pub vote_type: String,
}

#[derive(Debug, Deserialize)]
pub struct TallyParams {
    #[serde(rename = "imdbId")]
    pub imdb_id: Option<String>,
}

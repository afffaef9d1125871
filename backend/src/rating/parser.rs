use shared::RatingResponse;

pub const RATING_PREFIX: &str = "Rating:";
pub const REASON_PREFIX: &str = "Reason:";
pub const DEFAULT_RATING: &str = "N/A";
pub const DEFAULT_REASON: &str = "Could not parse reason.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingResult {
    pub rating: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(
        "Failed to parse rating and reason from model output. Model output might be malformed."
    )]
    Unparseable { raw: String },
}

impl From<RatingResult> for RatingResponse {
    fn from(result: RatingResult) -> Self {
        RatingResponse {
            rating: result.rating,
            reason: result.reason,
        }
    }
}

/// Picks the first `Rating:` and first `Reason:` line out of a model reply.
///
/// Prefixes are matched case-sensitively at the very start of a line. A reply with
/// neither label is an error, as is one that only yields the two default texts;
/// otherwise a missing label falls back to its default text.
pub fn parse_reply(reply: &str) -> Result<RatingResult, ParseError> {
    let mut rating: Option<&str> = None;
    let mut reason: Option<&str> = None;

    for line in reply.trim().lines() {
        if rating.is_none() {
            if let Some(rest) = line.strip_prefix(RATING_PREFIX) {
                rating = Some(rest.trim());
                continue;
            }
        }
        if reason.is_none() {
            if let Some(rest) = line.strip_prefix(REASON_PREFIX) {
                reason = Some(rest.trim());
            }
        }
    }

    let rating = rating.unwrap_or(DEFAULT_RATING);
    let reason = reason.unwrap_or(DEFAULT_REASON);
    // A pair of default texts is unparsed, even when a label was present.
    if rating == DEFAULT_RATING && reason == DEFAULT_REASON {
        return Err(ParseError::Unparseable {
            raw: reply.to_string(),
        });
    }
    Ok(RatingResult {
        rating: rating.to_string(),
        reason: reason.to_string(),
    })
}

/// Chirp body validation and profanity filtering
///
/// A chirp body may be at most 140 characters. Before storage the body is
/// split on whitespace, any word matching a banned word (ignoring case) is
/// replaced with `****`, and the words are joined back with single spaces.

/// Longest accepted chirp body, in characters
pub const MAX_CHIRP_LENGTH: usize = 140;

const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const REPLACEMENT: &str = "****";

/// Error type for chirp validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChirpError {
    #[error("Chirp is too long")]
    TooLong,
}

/// Replaces banned words with `****`
///
/// ```
/// use chirpy_shared::moderation::clean_chirp_body;
///
/// assert_eq!(clean_chirp_body("What a  Kerfuffle today"), "What a **** today");
/// assert_eq!(clean_chirp_body("Sharbert!"), "Sharbert!");
/// ```
pub fn clean_chirp_body(body: &str) -> String {
    body.split_whitespace()
        .map(|word| {
            let lowered = word.to_lowercase();
            if BANNED_WORDS.contains(&lowered.as_str()) {
                REPLACEMENT
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks the length limit and returns the cleaned body
pub fn validate_chirp(body: &str) -> Result<String, ChirpError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpError::TooLong);
    }

    Ok(clean_chirp_body(body))
}

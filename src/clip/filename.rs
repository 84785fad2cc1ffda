use super::ClipConfig;
use uuid::Uuid;

/// Source of the suffix that keeps clip filenames apart.
///
/// Wall-clock seconds collide when many lines are cut in the same second,
/// so the suffix is either a random UUID or a counter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UniqueToken {
    /// 128-bit random token, 32 lowercase hex digits.
    #[default]
    Random,
    /// Monotonic counter, zero-padded to six digits.
    Sequential { next: u64 },
}

impl UniqueToken {
    pub fn sequential(start: u64) -> Self {
        UniqueToken::Sequential { next: start }
    }

    pub fn next_token(&mut self) -> String {
        match self {
            UniqueToken::Random => Uuid::new_v4().simple().to_string(),
            UniqueToken::Sequential { next } => {
                let token = format!("{:06}", next);
                *next += 1;
                token
            }
        }
    }
}

/// Build a clip filename from the line text and a uniqueness token.
///
/// The text is lower-cased, cut to `max_filename_length` characters,
/// stripped of the configured punctuation and has whitespace replaced by
/// the separator. Then the separator, the token and the extension are
/// appended. The same text and token always give the same name.
pub fn make_filename(text: &str, token: &str, config: &ClipConfig) -> String {
    let separator = config.filename_separator;
    let stem: String = text
        .to_lowercase()
        .chars()
        .take(config.max_filename_length)
        .filter(|c| !config.stripped_characters.contains(c))
        .map(|c| if c.is_whitespace() { separator } else { c })
        .collect();

    format!("{stem}{separator}{token}.{}", config.extension)
}

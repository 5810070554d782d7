//! Chat filter phrase lists, loaded from a TOML or JSON file

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Phrases that trigger automatic moderation, per chat channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatFilterPhrases {
    /// In-character chat
    #[serde(default)]
    pub in_character: Vec<String>,
    /// Out-of-character chat
    #[serde(default)]
    pub out_of_character: Vec<String>,
}

impl ChatFilterPhrases {
    /// Load phrase lists from `path`; the format follows the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| {
                ConfigError::InvalidValue(
                    "CHAT_FILTER_PHRASES_PATH",
                    format!("{}: {e}", path.display()),
                )
            })
    }
}

use crate::error::TokenFormatError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{32}$").expect("token pattern is valid"));

/// OpenWeather API key.
///
/// Construction only checks the format. Whether the provider accepts the key
/// is checked with [`crate::apis::Geocoder::validate_credential`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    pub fn parse(value: &str) -> Result<Self, TokenFormatError> {
        if TOKEN_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(TokenFormatError)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First and last four characters, for display.
    pub fn masked(&self) -> String {
        format!("{}…{}", &self.0[..4], &self.0[self.0.len() - 4..])
    }
}

impl TryFrom<String> for Token {
    type Error = TokenFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

// Keep the key out of debug logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.masked()).finish()
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// Suffix appended to the label of a provider whose credential is missing.
pub const UNAVAILABLE_SUFFIX: &str = " (API key missing)";

/// A backend service that can answer chat messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    /// OpenAI's chat models.
    #[default]
    OpenAi,
    /// Google's Gemini models.
    Gemini,
    /// A provider the server reports that this client does not know.
    Other(String),
}

impl Provider {
    /// Providers offered before the server has reported anything.
    pub const KNOWN: [Provider; 2] = [Provider::OpenAi, Provider::Gemini];

    /// The identifier sent as `ai_provider`.
    pub fn id(&self) -> &str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::Other(id) => id,
        }
    }

    /// The human-readable selector label.
    pub fn label(&self) -> String {
        match self {
            Provider::OpenAi => "OpenAI GPT".to_string(),
            Provider::Gemini => "Google Gemini".to_string(),
            Provider::Other(id) => id.clone(),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::validation(
                "provider name must not be empty",
                Some("provider".to_string()),
            ));
        }
        Ok(match s.to_lowercase().as_str() {
            "openai" => Provider::OpenAi,
            "gemini" => Provider::Gemini,
            other => Provider::Other(other.to_string()),
        })
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of the provider selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOption {
    /// The provider this option selects.
    pub provider: Provider,
    /// Whether the server has a credential for it.
    pub available: bool,
}

impl ProviderOption {
    /// Create an option that is available until the server says otherwise.
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            available: true,
        }
    }

    /// Create an option with explicit availability.
    pub fn with_availability(provider: Provider, available: bool) -> Self {
        Self {
            provider,
            available,
        }
    }

    /// The selector label, marked when the provider is unavailable.
    pub fn label(&self) -> String {
        if self.available {
            self.provider.label()
        } else {
            format!("{}{UNAVAILABLE_SUFFIX}", self.provider.label())
        }
    }

    /// The default selector: every known provider, all available.
    pub fn defaults() -> Vec<ProviderOption> {
        Provider::KNOWN.iter().cloned().map(Self::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" gemini ".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(
            "claude".parse::<Provider>().unwrap(),
            Provider::Other("claude".to_string())
        );
    }

    #[test]
    fn empty_provider_is_rejected() {
        assert!("  ".parse::<Provider>().unwrap_err().is_validation());
    }

    #[test]
    fn unavailable_label() {
        let option = ProviderOption::with_availability(Provider::Gemini, false);
        assert_eq!(option.label(), "Google Gemini (API key missing)");
        assert_eq!(ProviderOption::new(Provider::OpenAi).label(), "OpenAI GPT");
    }

    #[test]
    fn serde_uses_identifier() {
        assert_eq!(
            serde_json::to_value(Provider::OpenAi).unwrap(),
            serde_json::json!("openai")
        );
        let provider: Provider = serde_json::from_value(serde_json::json!("gemini")).unwrap();
        assert_eq!(provider, Provider::Gemini);
    }
}

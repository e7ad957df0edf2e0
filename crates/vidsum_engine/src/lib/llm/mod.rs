//! Uniform generation abstraction over the configured LLM backends.
//!
//! Every backend is a thin HTTP client exposing the same capability:
//! turn a prompt into sanitized summary text. Adapters are cheap to
//! construct; the credential is read from the environment at call time so
//! an unconfigured backend fails fast with guidance instead of panicking
//! at startup.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use std::{collections::BTreeMap, fmt, future::Future, str::FromStr};

use crate::Error;

/// Shared system instruction for all backends: content only, no
/// meta-commentary, keep markdown structure.
pub(crate) const SYSTEM_PROMPT: &str = include_str!("./prompts/system_0.txt");

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} is not configured: set {env_var} or try another provider (e.g. `--provider {alternative}`)")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
        alternative: &'static str,
    },
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("no content generated")]
    Empty,
}

pub trait Provider {
    const NAME: &'static str;
    const MODEL: &'static str;

    /// Fails fast when the backend credential is absent.
    fn ensure_configured(&self) -> Result<(), ProviderError>;

    /// Generates sanitized summary text for `prompt`.
    fn generate(&self, prompt: &str)
        -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// The configured backends a request may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    Gemini,
    OpenAi,
    Anthropic,
}

impl ProviderChoice {
    pub const ALL: [ProviderChoice; 3] = [
        ProviderChoice::Gemini,
        ProviderChoice::OpenAi,
        ProviderChoice::Anthropic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderChoice::Gemini => "gemini",
            ProviderChoice::OpenAi => "openai",
            ProviderChoice::Anthropic => "anthropic",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderChoice::Gemini => "GEMINI_API_KEY",
            ProviderChoice::OpenAi => "OPENAI_API_KEY",
            ProviderChoice::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Whether this backend's credential is present in the environment.
    pub fn is_configured(&self) -> bool {
        api_key_from_env(self.api_key_env()).is_some()
    }

    /// Another backend worth suggesting in a "not configured" message;
    /// prefers one that actually has a credential.
    pub fn suggested_alternative(&self) -> ProviderChoice {
        let mut fallback = None;
        for candidate in Self::ALL {
            if candidate == *self {
                continue;
            }
            if candidate.is_configured() {
                return candidate;
            }
            fallback.get_or_insert(candidate);
        }
        fallback.unwrap_or(*self)
    }
}

impl fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderChoice::Gemini),
            "openai" => Ok(ProviderChoice::OpenAi),
            "anthropic" | "claude" => Ok(ProviderChoice::Anthropic),
            other => Err(Error::InvalidRequest(format!(
                "unrecognized provider '{other}' (expected gemini, openai or anthropic)"
            ))),
        }
    }
}

/// Per-backend credential presence, keyed by provider name. Side-effect
/// free; backs the capability query surface.
pub fn availability() -> BTreeMap<&'static str, bool> {
    ProviderChoice::ALL
        .iter()
        .map(|choice| (choice.name(), choice.is_configured()))
        .collect()
}

pub(crate) fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn missing_credential(choice: ProviderChoice) -> ProviderError {
    ProviderError::MissingCredential {
        provider: choice.name(),
        env_var: choice.api_key_env(),
        alternative: choice.suggested_alternative().name(),
    }
}

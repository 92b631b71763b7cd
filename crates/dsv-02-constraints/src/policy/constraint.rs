//! Single constraint options and value matching.

use crate::domain::errors::PolicyError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_crypto::{DigestAlgorithm, EncryptionAlgorithm};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Wildcard accepting any non-empty value.
pub const ANY_VALUE: &str = "*";

/// How strictly a condition must hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    /// Not evaluated.
    Ignore,
    /// Failure is reported as information.
    Inform,
    /// Failure is reported as a warning.
    Warn,
    /// Failure determines the block conclusion.
    #[default]
    Fail,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Ignore => "IGNORE",
            Level::Inform => "INFORM",
            Level::Warn => "WARN",
            Level::Fail => "FAIL",
        };
        f.write_str(name)
    }
}

/// Policy options for one check.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip)]
    compiled: Option<Regex>,
}

impl Constraint {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn fail() -> Self {
        Self::new(Level::Fail)
    }

    pub fn warn() -> Self {
        Self::new(Level::Warn)
    }

    pub fn inform() -> Self {
        Self::new(Level::Inform)
    }

    pub fn ignore() -> Self {
        Self::new(Level::Ignore)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.expected_value = Some(value.into());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set a pattern; invalid patterns are reported by [`compile`](Self::compile).
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self.compiled = None;
        self
    }

    /// Compile the pattern once. `name` identifies the constraint in errors.
    pub fn compile(&mut self, name: &str) -> Result<(), PolicyError> {
        let Some(pattern) = &self.pattern else {
            return Ok(());
        };
        let regex = anchored(pattern).map_err(|err| PolicyError::InvalidPattern {
            constraint: name.to_string(),
            pattern: pattern.clone(),
            reason: err.to_string(),
        })?;
        self.compiled = Some(regex);
        Ok(())
    }

    fn has_expectations(&self) -> bool {
        self.expected_value.is_some() || !self.expected_values.is_empty() || self.pattern.is_some()
    }

    fn matches_pattern(&self, value: &str) -> bool {
        if let Some(regex) = &self.compiled {
            return regex.is_match(value);
        }
        match self.pattern.as_deref().map(anchored) {
            Some(Ok(regex)) => regex.is_match(value),
            Some(Err(err)) => {
                warn!(error = %err, "Constraint pattern does not compile, value rejected");
                false
            }
            None => false,
        }
    }

    /// Whether `value` satisfies the expected value(s) or pattern.
    ///
    /// Empty values are never accepted. `*` accepts any non-empty value.
    /// With no expectation configured only presence is required.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        if !self.has_expectations() {
            return true;
        }
        let listed = self
            .expected_value
            .iter()
            .chain(self.expected_values.iter())
            .any(|expected| expected == ANY_VALUE || expected == value);
        listed || (self.pattern.is_some() && self.matches_pattern(value))
    }

    /// Whether any of `values` is accepted.
    pub fn accepts_any<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> bool {
        values.into_iter().any(|value| self.accepts(value))
    }

    /// Expected values and pattern, rendered for diagnostics.
    pub fn describe_expectation(&self) -> String {
        let mut parts: Vec<String> = self
            .expected_value
            .iter()
            .chain(self.expected_values.iter())
            .cloned()
            .collect();
        if let Some(pattern) = &self.pattern {
            parts.push(format!("/{}/", pattern));
        }
        if parts.is_empty() {
            "any value".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level
            && self.expected_value == other.expected_value
            && self.expected_values == other.expected_values
            && self.pattern == other.pattern
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("level", &self.level)
            .field("expected_value", &self.expected_value)
            .field("expected_values", &self.expected_values)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Algorithm acceptance rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptographicConstraint {
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub acceptable_digest_algorithms: Vec<DigestAlgorithm>,
    #[serde(default)]
    pub acceptable_encryption_algorithms: Vec<EncryptionAlgorithm>,
    /// Minimum public key size in bits per algorithm.
    #[serde(default)]
    pub min_public_key_sizes: BTreeMap<EncryptionAlgorithm, u32>,
}

impl Default for CryptographicConstraint {
    fn default() -> Self {
        Self {
            level: Level::Ignore,
            acceptable_digest_algorithms: Vec::new(),
            acceptable_encryption_algorithms: Vec::new(),
            min_public_key_sizes: BTreeMap::new(),
        }
    }
}

impl CryptographicConstraint {
    /// First rule broken by the given algorithms, if any. Unknown inputs
    /// are not judged.
    pub fn violation(
        &self,
        digest: Option<DigestAlgorithm>,
        encryption: Option<EncryptionAlgorithm>,
        key_size_bits: Option<u32>,
    ) -> Option<String> {
        if let Some(digest) = digest {
            if !self.acceptable_digest_algorithms.contains(&digest) {
                return Some(format!("digest algorithm {} is not acceptable", digest));
            }
        }
        if let Some(encryption) = encryption {
            if !self.acceptable_encryption_algorithms.contains(&encryption) {
                return Some(format!("encryption algorithm {} is not acceptable", encryption));
            }
            if let (Some(bits), Some(min)) = (key_size_bits, self.min_public_key_sizes.get(&encryption)) {
                if bits < *min {
                    return Some(format!(
                        "{} key size {} is below the minimum {}",
                        encryption, bits, min
                    ));
                }
            }
        }
        None
    }
}

use crate::error::ModelError;

/// Opaque identifier of a playable unit (a movie or a single episode).
///
/// The catalog backend owns the format; the player only requires that it is
/// non-empty and free of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidContentId(
                "content id cannot be empty".to_string(),
            ));
        }
        if trimmed.len() != id.len() {
            return Ok(ContentId(trimmed.to_string()));
        }
        Ok(ContentId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContentId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_ids() {
        assert!(ContentId::new("").is_err());
        assert!(ContentId::new("   ").is_err());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = ContentId::new("  ep-42 ").unwrap();
        assert_eq!(id.as_str(), "ep-42");
        assert_eq!(id.to_string(), "ep-42");
    }
}

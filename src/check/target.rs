//! Probe targets.

use serde::Serialize;
use url::Url;

/// One endpoint to be health-checked. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    id: String,
    destination: Url,
}

impl Target {
    pub fn new(id: impl Into<String>, destination: Url) -> Self {
        Self {
            id: id.into(),
            destination,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn destination(&self) -> &Url {
        &self.destination
    }
}

/// Build `count` targets named `target-1..=count`, all pointing at
/// `<base_url><path>`.
///
/// The path is appended textually so a base URL with its own path prefix
/// keeps it.
pub fn generate_targets(base_url: &str, path: &str, count: usize) -> Result<Vec<Target>, url::ParseError> {
    let destination = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), path))?;

    Ok((1..=count)
        .map(|i| Target::new(format!("target-{}", i), destination.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_targets() {
        let targets = generate_targets("http://localhost:8080", "/health", 3).unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].id(), "target-1");
        assert_eq!(targets[2].id(), "target-3");
        assert_eq!(targets[1].destination().as_str(), "http://localhost:8080/health");
    }

    #[test]
    fn test_base_path_is_kept() {
        let targets = generate_targets("https://example.com/api/", "/health", 1).unwrap();
        assert_eq!(targets[0].destination().as_str(), "https://example.com/api/health");
    }

    #[test]
    fn test_zero_targets() {
        assert!(generate_targets("http://localhost:8080", "/health", 0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_base() {
        assert!(generate_targets("not a url", "/health", 1).is_err());
    }
}

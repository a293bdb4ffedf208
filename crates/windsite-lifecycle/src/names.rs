//! Project name normalization and uniqueness-checked generation.

use windsite_core::config::LayeredConfig;
use windsite_core::{Result, WindsiteError};
use windsite_store::ports::DocumentStore;
use windsite_store::project::ProjectStore;

/// Normalize a raw name into the canonical storage slug.
///
/// Lowercases the input, collapses runs of non-alphanumeric characters into
/// single hyphens, and trims leading and trailing hyphens. Deterministic and
/// pure; an input with no alphanumeric characters normalizes to the empty
/// string.
pub fn normalize(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Suggests unique project names by probing the store for collisions.
///
/// Probing is capped so a pathological store state cannot loop forever.
#[derive(Debug, Clone)]
pub struct ProjectNameGenerator {
    attempt_limit: u32,
}

impl ProjectNameGenerator {
    pub fn new(config: &LayeredConfig) -> Self {
        Self {
            attempt_limit: config.name_attempt_limit.value,
        }
    }

    /// First free name derived from `base`: the normalized base itself when
    /// unused, otherwise `base-2`, `base-3`, and so on.
    pub async fn unique_name<D: DocumentStore>(
        &self,
        store: &ProjectStore<D>,
        base: &str,
    ) -> Result<String> {
        let slug = normalize(base);
        if slug.is_empty() {
            return Err(WindsiteError::InvalidProjectName {
                name: base.to_string(),
                reason: "name must contain at least one alphanumeric character".to_string(),
            });
        }

        if store.load(&slug).await?.is_none() {
            return Ok(slug);
        }

        for attempt in 2..=self.attempt_limit {
            let candidate = format!("{}-{}", slug, attempt);
            if store.load(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(WindsiteError::NameGenerationExhausted {
            base: slug,
            attempts: self.attempt_limit,
        })
    }
}

//! Opaque artifact names: a random hex stem plus a fixed extension.

use std::fmt;
use std::path::{Component, Path};

use uuid::Uuid;

/// File name of one artifact inside the scratch directory.
///
/// Minted names are `<32 hex chars>.<ext>`. Names parsed from an untrusted
/// path segment are restricted to a conservative charset and a single normal
/// path component, so a crafted segment can never reach outside the
/// directory the store joins it onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Mint a fresh random name with the given extension (without the dot).
    pub fn mint(ext: &str) -> Self {
        ArtifactName(format!("{}.{}", Uuid::new_v4().simple(), ext))
    }

    /// Accept an untrusted path segment as an artifact name.
    ///
    /// Allowed: ASCII alphanumerics, `.`, `_`, `-`, not starting with a dot.
    /// Everything else (separators, parent components, dotfiles, control
    /// bytes) is rejected. Dotfiles are never artifacts; minted stems are hex.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        if segment.is_empty() || segment.starts_with('.') {
            return None;
        }
        let charset_ok = segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
        if !charset_ok {
            return None;
        }
        // The charset leaves no way to spell a separator, but keep the
        // containment property explicit: exactly one normal component.
        let mut parts = Path::new(segment).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(_)), None) => Some(ArtifactName(segment.to_owned())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

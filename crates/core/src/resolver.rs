//! Artifact reference resolution
//!
//! A small standalone utility, unrelated to the tree core: classifies
//! slash-separated artifact references against a base directory by probing
//! path segments, then testing the final segment against a configurable
//! pair of file extensions. Resolution probes progressively longer prefixes
//! and keeps the deepest directory that exists.

use std::path::{Path, PathBuf};

/// Classification of one resolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A file with the primary extension exists
    Primary(PathBuf),
    /// A file with the secondary extension exists
    Secondary(PathBuf),
    /// Neither candidate file exists; carries the deepest path probed and
    /// the segment that broke the chain
    Missing { checked: PathBuf, missing: String },
}

impl Resolved {
    pub fn kind(&self) -> &'static str {
        match self {
            Resolved::Primary(_) => "primary",
            Resolved::Secondary(_) => "secondary",
            Resolved::Missing { .. } => "missing",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Resolved::Primary(path) | Resolved::Secondary(path) => path,
            Resolved::Missing { checked, .. } => checked,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Resolved::Missing { .. })
    }
}

/// Resolves references against a base directory and an extension pair.
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    base: PathBuf,
    primary_ext: String,
    secondary_ext: String,
}

impl ArtifactResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            primary_ext: "gts".to_string(),
            secondary_ext: "tsq".to_string(),
        }
    }

    pub fn with_extensions(mut self, primary: &str, secondary: &str) -> Self {
        self.primary_ext = primary.to_string();
        self.secondary_ext = secondary.to_string();
        self
    }

    /// Resolve one reference. Directory segments are probed shallow-to-deep
    /// and the deepest existing prefix becomes the anchor for the final
    /// segment's candidate files.
    pub fn resolve(&self, reference: &str) -> Resolved {
        let parts: Vec<&str> = reference.split('/').filter(|p| !p.is_empty()).collect();
        let Some((last, dir_parts)) = parts.split_last() else {
            return Resolved::Missing {
                checked: self.base.clone(),
                missing: String::new(),
            };
        };

        let mut anchor = self.base.clone();
        let mut probe = self.base.clone();
        for part in dir_parts {
            probe = probe.join(part);
            if probe.exists() {
                anchor = probe.clone();
            }
        }

        let primary = anchor.join(format!("{}.{}", last, self.primary_ext));
        if primary.exists() {
            return Resolved::Primary(primary);
        }
        let secondary = anchor.join(format!("{}.{}", last, self.secondary_ext));
        if secondary.exists() {
            return Resolved::Secondary(secondary);
        }
        Resolved::Missing {
            checked: anchor.join(last),
            missing: (*last).to_string(),
        }
    }

    /// Resolve a batch of references in order.
    pub fn resolve_all<'a, I>(&self, references: I) -> Vec<(String, Resolved)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        references
            .into_iter()
            .map(|reference| (reference.to_string(), self.resolve(reference)))
            .collect()
    }
}

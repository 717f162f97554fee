use std::path::Path;

use url::Url;

use crate::error::{Result, WallError};

/// Turns stored source references into fully qualified URLs.
///
/// Root-relative and relative references are both joined onto the media
/// root, so `/audio/a.mp3` and `audio/a.mp3` land on the same file however
/// deep the root sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResolver {
    root: Url,
}

impl SourceResolver {
    pub fn new(mut root: Url) -> Result<Self> {
        if root.cannot_be_a_base() {
            return Err(WallError::MediaRoot {
                root: root.to_string(),
                reason: "not a hierarchical URL".into(),
            });
        }
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(Self { root })
    }

    /// Accepts a URL (`https://cdn.example.com/media/`) or a directory path.
    pub fn parse(root: &str) -> Result<Self> {
        match Url::parse(root) {
            Ok(url) => Self::new(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Self::for_directory(Path::new(root)),
            Err(e) => Err(WallError::MediaRoot {
                root: root.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn for_directory(dir: &Path) -> Result<Self> {
        let abs = std::path::absolute(dir)?;
        let url = Url::from_directory_path(&abs).map_err(|()| WallError::MediaRoot {
            root: dir.display().to_string(),
            reason: "cannot be expressed as a file URL".into(),
        })?;
        Self::new(url)
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn resolve(&self, reference: &str) -> Result<Url> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(WallError::EmptySource);
        }

        match Url::parse(reference) {
            Ok(url) => return Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {}
            Err(source) => {
                return Err(WallError::Resolve {
                    reference: reference.to_string(),
                    source,
                });
            }
        }

        let relative = if reference.starts_with("//") {
            reference
        } else {
            reference.trim_start_matches('/')
        };

        self.root
            .join(relative)
            .map_err(|source| WallError::Resolve {
                reference: reference.to_string(),
                source,
            })
    }
}

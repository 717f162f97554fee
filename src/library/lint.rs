use super::model::Track;

/// A catalog source that will probably not play once deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceWarning {
    /// The stored reference already carries the deployment path prefix, so it
    /// would be prefixed twice.
    BasePathPrefixed { id: String, source: String },
    /// Not an mp3 reference.
    NotMp3 { id: String, source: String },
}

/// Check every source once after loading and log what looks wrong.
pub fn lint_sources(tracks: &[Track], base_path: &str) -> Vec<SourceWarning> {
    let prefix = normalized_prefix(base_path);
    let mut warnings = Vec::new();

    for t in tracks {
        if let Some(p) = prefix.as_deref() {
            if t.source.starts_with(p) {
                tracing::warn!(id = %t.id, source = %t.source, "source carries the base path prefix");
                warnings.push(SourceWarning::BasePathPrefixed {
                    id: t.id.clone(),
                    source: t.source.clone(),
                });
            }
        }
        if !t.source.to_ascii_lowercase().contains(".mp3") {
            tracing::warn!(id = %t.id, source = %t.source, "source is not an mp3");
            warnings.push(SourceWarning::NotMp3 {
                id: t.id.clone(),
                source: t.source.clone(),
            });
        }
    }

    warnings
}

/// `eastwick-bully` and `/eastwick-bully/` both become `/eastwick-bully/`.
fn normalized_prefix(base_path: &str) -> Option<String> {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}/"))
    }
}

use crate::error::{StorageError, StorageErrorExt};
use std::path::{Component, Path, PathBuf};

/// Collapses `.` / `..` lexically and rejects anything that would climb
/// above the sandbox root or smuggle in an absolute path.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StorageError::PathTraversalAttempt {
                        message: path.display().to_string().into(),
                        context: Some("Path climbs above the sandbox root".into()),
                    });
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("Absolute paths are not allowed in the sandbox".into()),
                });
            },
        }
    }

    Ok(out)
}

/// Joins `path` (optionally under a namespace directory) onto `root` and
/// verifies the result stays inside the sandbox, following symlinks where
/// the target already exists.
pub(crate) fn resolve_path(
    root: &Path,
    namespace: Option<&str>,
    path: impl AsRef<Path>,
) -> Result<PathBuf, StorageError> {
    let mut relative = PathBuf::new();
    if let Some(ns) = namespace {
        relative.push(ns);
    }
    relative.push(normalize_relative(path.as_ref())?);

    let joined = root.join(relative);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(StorageError::PathTraversalAttempt {
            message: canonical.display().to_string().into(),
            context: Some("Resolved path escapes the sandbox".into()),
        }),
        // The target does not exist yet (fresh write): verify the nearest
        // existing ancestor instead, so a symlinked parent cannot redirect
        // the write outside the root.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            verify_ancestors(root, &joined)?;
            Ok(joined)
        },
        Err(e) => Err(StorageError::Io { source: e, context: None }),
    }
}

fn verify_ancestors(root: &Path, joined: &Path) -> Result<(), StorageError> {
    let mut current = joined.parent();

    while let Some(ancestor) = current {
        if ancestor == root {
            return Ok(());
        }
        if ancestor.exists() {
            let canonical = ancestor
                .canonicalize()
                .context(format!("Failed to verify ancestor {}", ancestor.display()))?;
            if canonical.starts_with(root) {
                return Ok(());
            }
            return Err(StorageError::PathTraversalAttempt {
                message: canonical.display().to_string().into(),
                context: Some("Existing ancestor is a symlink outside the sandbox".into()),
            });
        }
        current = ancestor.parent();
    }

    Err(StorageError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("Path has no ancestor inside the sandbox".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rejects_escape() {
        assert!(normalize_relative(Path::new("../etc/passwd")).is_err());
        assert!(normalize_relative(Path::new("a/../../b")).is_err());
        assert!(normalize_relative(Path::new("/abs")).is_err());
    }

    #[test]
    fn normalize_collapses_inner_segments() {
        let out = normalize_relative(Path::new("a/./b/../c")).unwrap();
        assert_eq!(out, PathBuf::from("a/c"));
    }
}

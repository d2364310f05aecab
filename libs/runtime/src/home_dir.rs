use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// Platform base directory: `%APPDATA%` on Windows, `$HOME` elsewhere.
fn platform_base_dir() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("environment variable {var} is not set"))
}

/// Expand a leading `~` (alone or followed by a separator) into the platform base dir.
fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_base_dir();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_base_dir()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Resolve the server home directory into an absolute path.
///
/// - `None` resolves to `<platform base>/<default_subdir>`.
/// - `~` is expanded; relative paths are joined onto the current directory.
/// - With `create`, the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let mut path = match configured {
        Some(raw) => expand_tilde(raw.trim())?,
        None => platform_base_dir()?.join(default_subdir),
    };

    if path.is_relative() {
        path = std::env::current_dir()
            .context("cannot read current directory")?
            .join(path);
    }

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested/home");

        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".x", true).unwrap();

        assert_eq!(resolved, target);
        assert!(target.exists());
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let resolved = resolve_home_dir(Some("some/relative".into()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative"));
    }
}

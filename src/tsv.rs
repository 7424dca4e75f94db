//! Extension Normalizer: copy or rename a file so it carries a `.tsv`
//! suffix. Content is never inspected or altered.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Overwrite policy for an existing destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Fail if the destination already exists.
    Refuse,
    /// Replace an existing destination.
    Force,
}

/// Ensure `output` carries a `.tsv` suffix (case-insensitive), appending one
/// when it does not. Returns the path actually used and whether it changed.
pub fn normalize_destination(output: &Path) -> (PathBuf, bool) {
    let has_tsv = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false);
    if has_tsv {
        return (output.to_path_buf(), false);
    }
    let mut name = output
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".tsv");
    (output.with_file_name(name), true)
}

/// Copy (or, with `rename`, move) `input` to a `.tsv` destination.
///
/// Returns the final destination path. The destination's parent directories
/// are created as needed.
pub fn run_force_tsv(
    input: &Path,
    output: &Path,
    rename: bool,
    overwrite: Overwrite,
) -> Result<PathBuf> {
    if !input.is_file() {
        anyhow::bail!("input file not found: {}", input.display());
    }
    let (dst, appended) = normalize_destination(output);
    if appended {
        eprintln!(
            "tsv: output {} does not end in .tsv; writing {}",
            output.display(),
            dst.display()
        );
    }
    if overwrite == Overwrite::Refuse && dst.exists() {
        anyhow::bail!(
            "destination {} already exists (use --force to overwrite)",
            dst.display()
        );
    }
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    if rename {
        std::fs::rename(input, &dst)
            .with_context(|| format!("renaming {} -> {}", input.display(), dst.display()))?;
    } else {
        std::fs::copy(input, &dst)
            .with_context(|| format!("copying {} -> {}", input.display(), dst.display()))?;
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn destination_suffix_normalization() {
        let (p, changed) = normalize_destination(Path::new("out.tsv"));
        assert_eq!(p, Path::new("out.tsv"));
        assert!(!changed);
        let (p, changed) = normalize_destination(Path::new("out.TSV"));
        assert!(!changed);
        assert_eq!(p, Path::new("out.TSV"));
        let (p, changed) = normalize_destination(Path::new("out.txt"));
        assert!(changed);
        assert_eq!(p, Path::new("out.txt.tsv"));
        let (p, changed) = normalize_destination(Path::new("out"));
        assert!(changed);
        assert_eq!(p, Path::new("out.tsv"));
    }

    #[test]
    fn copy_preserves_bytes_and_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("data.txt");
        fs::write(&src, "a\tb\n1\t2\n").unwrap();
        let dst = run_force_tsv(&src, &dir.path().join("data.txt"), false, Overwrite::Force)
            .unwrap();
        assert_eq!(dst, dir.path().join("data.txt.tsv"));
        assert_eq!(fs::read_to_string(&dst).unwrap(), "a\tb\n1\t2\n");
        assert!(src.exists());
    }

    #[test]
    fn rename_moves_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("data.txt");
        fs::write(&src, "x").unwrap();
        let dst = run_force_tsv(&src, &dir.path().join("moved.tsv"), true, Overwrite::Refuse)
            .unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "x");
    }

    #[test]
    fn refuses_existing_destination_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("data.txt");
        fs::write(&src, "new").unwrap();
        let dst = dir.path().join("out.tsv");
        fs::write(&dst, "old").unwrap();
        let err = run_force_tsv(&src, &dst, false, Overwrite::Refuse).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&dst).unwrap(), "old");
        run_force_tsv(&src, &dst, false, Overwrite::Force).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_force_tsv(
            &dir.path().join("absent.txt"),
            &dir.path().join("out.tsv"),
            false,
            Overwrite::Refuse,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}

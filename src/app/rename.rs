// logtools - app/rename.rs
//
// Normalise rotated log file names. Size-rotating writers leave
// `app.log`, `app.log.1`, `app.log.2`, ...; renaming them to
// `base_0.log`, `base_1.log`, ... keeps the `.log` extension last.

use crate::util::constants::LOG_FILE_GLOB;
use crate::util::error::RenameError;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// `<stem>.log` optionally followed by a rotation number, with or without
/// one of `.`, `#`, `_`, `-` in between.
fn rotated_name() -> &'static Regex {
    static ROTATED: OnceLock<Regex> = OnceLock::new();
    ROTATED.get_or_init(|| {
        Regex::new(r"^(?P<stem>.*?)\.log(?:[.#_-]?(?P<num>\d+))?$")
            .expect("rotated_name: invalid regex")
    })
}

/// Normalised name for `name`, or `None` when it is not a log file name.
///
/// The live file is rotation 0; rotation `N` keeps `N`.
pub fn new_log_file_name(name: &str, base: &str) -> Option<String> {
    let caps = rotated_name().captures(name)?;
    let num = caps
        .name("num")
        .map(|m| m.as_str().trim_start_matches('0'))
        .map(|n| if n.is_empty() { "0" } else { n })
        .unwrap_or("0");
    Some(format!("{base}_{num}.log"))
}

/// True for names already in `base_N.log` form.
pub fn is_normalized(name: &str, base: &str) -> bool {
    name.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(".log"))
        .is_some_and(|num| !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()))
}

/// Rename every log file in `dir` to `base_N.log`.
///
/// Files already in that form are left alone, so a second run changes
/// nothing. The whole plan is checked before the first rename: two
/// sources sharing a target, or a target taken by an unrelated file,
/// abort with nothing renamed. Returns every resulting path, sorted.
pub fn rename_files(dir: &Path, base: &str) -> Result<Vec<PathBuf>, RenameError> {
    if !dir.is_dir() {
        return Err(RenameError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        LOG_FILE_GLOB
    );
    let entries = glob::glob(&pattern).map_err(|e| RenameError::Pattern {
        pattern: pattern.clone(),
        source: e,
    })?;

    // target -> source
    let mut plan: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    for entry in entries {
        let source = entry.map_err(|e| RenameError::Listing { source: e })?;
        if !source.is_file() {
            continue;
        }
        let name = match source.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let target_name = if is_normalized(&name, base) {
            name.clone()
        } else {
            match new_log_file_name(&name, base) {
                Some(target) => target,
                None => {
                    tracing::debug!(file = %name, "Skipping file without a log name");
                    continue;
                }
            }
        };
        let target = dir.join(target_name);
        if let Some(first) = plan.get(&target) {
            return Err(RenameError::Collision {
                target,
                first: first.clone(),
                second: source,
            });
        }
        plan.insert(target, source);
    }

    for (target, source) in &plan {
        if target != source && target.exists() {
            return Err(RenameError::TargetExists {
                target: target.clone(),
            });
        }
    }

    let mut renamed = 0;
    for (target, source) in &plan {
        if target == source {
            continue;
        }
        std::fs::rename(source, target).map_err(|e| RenameError::Io {
            from: source.clone(),
            to: target.clone(),
            source: e,
        })?;
        tracing::debug!(from = %source.display(), to = %target.display(), "Renamed log file");
        renamed += 1;
    }

    tracing::info!(dir = %dir.display(), renamed, total = plan.len(), "Log files normalised");
    Ok(plan.into_keys().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_new_log_file_name() {
        assert_eq!(new_log_file_name("abc.log", "after").as_deref(), Some("after_0.log"));
        for name in ["abc.log.3", "abc.log#3", "abc.log3", "abc.log_3", "abc.log-3"] {
            assert_eq!(
                new_log_file_name(name, "after").as_deref(),
                Some("after_3.log"),
                "{name}"
            );
        }
        assert_eq!(new_log_file_name("a.log.log.12", "b").as_deref(), Some("b_12.log"));
        assert_eq!(new_log_file_name("notes.txt", "b"), None);
        assert_eq!(new_log_file_name("abc.log.bak", "b"), None);
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized("after_0.log", "after"));
        assert!(is_normalized("after_12.log", "after"));
        assert!(!is_normalized("after.log", "after"));
        assert!(!is_normalized("after_x.log", "after"));
        assert!(!is_normalized("other_1.log", "after"));
    }

    #[test]
    fn test_rename_files_numbering_and_idempotence() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["abc.log", "abc.log.1", "abc.log.2", "readme.txt"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }

        let first = rename_files(dir.path(), "after").unwrap();
        assert_eq!(names(&first), vec!["after_0.log", "after_1.log", "after_2.log"]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("after_1.log")).unwrap(),
            "abc.log.1"
        );
        assert!(dir.path().join("readme.txt").exists());

        let second = rename_files(dir.path(), "after").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rename_files_collision_renames_nothing() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.log.1", "b.log.1"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let err = rename_files(dir.path(), "after").unwrap_err();
        assert!(matches!(err, RenameError::Collision { .. }));
        assert!(dir.path().join("a.log.1").exists());
        assert!(dir.path().join("b.log.1").exists());
    }

    #[test]
    fn test_rename_files_requires_directory() {
        let err = rename_files(Path::new("/no/such/dir"), "after").unwrap_err();
        assert!(matches!(err, RenameError::NotADirectory { .. }));
    }
}

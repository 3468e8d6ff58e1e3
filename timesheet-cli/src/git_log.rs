use std::path::{Path, PathBuf};

use git2::{Repository, Sort};
use thiserror::Error;
use timesheet_core::RawCommit;

use crate::settings::ProjectSettings;

#[derive(Error, Debug)]
pub enum GitLogError {
    #[error("failed to open repository at {path}: {source}")]
    Open { path: PathBuf, source: git2::Error },
    #[error("failed to walk history of {project}: {source}")]
    Walk { project: String, source: git2::Error },
}

/// Reads every commit reachable from `HEAD`, newest first.
///
/// Months are filtered later, so the whole history is returned.
pub fn read_commits(
    project: &ProjectSettings,
    skip_merges: bool,
) -> Result<Vec<RawCommit>, GitLogError> {
    let path = expand_home(&project.path);
    let repo = Repository::open(&path).map_err(|source| GitLogError::Open {
        path: path.clone(),
        source,
    })?;
    let walk_error = |source| GitLogError::Walk {
        project: project.name.clone(),
        source,
    };

    let mut revwalk = repo.revwalk().map_err(walk_error)?;
    revwalk.set_sorting(Sort::TIME).map_err(walk_error)?;
    revwalk.push_head().map_err(walk_error)?;

    let mut commits = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid.map_err(walk_error)?).map_err(walk_error)?;
        if skip_merges && commit.parent_count() > 1 {
            continue;
        }

        let author = commit.author();
        let identity = if project.match_email {
            author.email_bytes()
        } else {
            author.name_bytes()
        };
        let when = author.when();

        commits.push(RawCommit {
            project: project.name.clone(),
            seconds: when.seconds(),
            offset_minutes: when.offset_minutes(),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            author: String::from_utf8_lossy(identity).into_owned(),
        });
    }

    Ok(commits)
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use git2::{Oid, Signature, Time};
    use tempfile::TempDir;

    use super::*;

    fn commit(repo: &Repository, name: &str, seconds: i64, message: &str, parents: &[Oid]) -> Oid {
        let signature = Signature::new(name, &format!("{}@example.com", name.to_lowercase()), &Time::new(seconds, 60)).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<_> = parents.iter().map(|id| repo.find_commit(*id).unwrap()).collect();
        let parent_refs: Vec<_> = parents.iter().collect();

        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .unwrap()
    }

    fn project(dir: &TempDir, match_email: bool) -> ProjectSettings {
        ProjectSettings {
            name: "toki".to_string(),
            path: dir.path().to_path_buf(),
            match_email,
        }
    }

    #[test]
    fn test_reads_history_newest_first() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit(&repo, "Alice", 1_709_629_200, "fix: login\n\nDetails", &[]);
        commit(&repo, "Bob", 1_710_950_400, "feat: stats", &[first]);

        let commits = read_commits(&project(&dir, false), true).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].author, "Bob");
        assert_eq!(commits[1].author, "Alice");
        assert_eq!(commits[1].seconds, 1_709_629_200);
        assert_eq!(commits[1].offset_minutes, 60);
        assert_eq!(commits[1].message, "fix: login\n\nDetails");
        assert!(commits.iter().all(|c| c.project == "toki"));
    }

    #[test]
    fn test_match_email_uses_author_email() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Alice", 1_709_629_200, "init", &[]);

        let commits = read_commits(&project(&dir, true), true).unwrap();

        assert_eq!(commits[0].author, "alice@example.com");
    }

    #[test]
    fn test_merge_commits_can_be_skipped() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let base = commit(&repo, "Alice", 1_709_629_200, "base", &[]);
        let side = commit(&repo, "Alice", 1_709_632_800, "side", &[base]);
        commit(&repo, "Alice", 1_709_636_400, "Merge branch 'side'", &[side, base]);

        let without_merges = read_commits(&project(&dir, false), true).unwrap();
        let with_merges = read_commits(&project(&dir, false), false).unwrap();

        assert_eq!(without_merges.len(), 2);
        assert_eq!(with_merges.len(), 3);
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = ProjectSettings {
            name: "ghost".to_string(),
            path: dir.path().join("nope"),
            match_email: false,
        };

        assert!(matches!(
            read_commits(&missing, true),
            Err(GitLogError::Open { .. })
        ));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/srv/toki")), PathBuf::from("/srv/toki"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/code/toki")), home.join("code/toki"));
        }
    }
}

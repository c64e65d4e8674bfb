//! Confirmation of the selected row.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::host::HostFs;
use crate::nav::filter::Row;
use crate::nav::query::{FetchRequest, QueryState};
use crate::nav::resolve::containing_directory;

/// What confirming the selected row will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Create `dir` (recursively) and hand `file` to the host.
    CreateFile { dir: String, file: PathBuf },
    /// Create `dir` (recursively) and navigate into it.
    CreateDirectory { dir: String },
    EnterDirectory(PathBuf),
    OpenFile(PathBuf),
    /// Empty row set, or an entry whose metadata could not be read.
    Nothing,
}

/// The result of carrying out a [`Confirmation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed {
    /// A file was chosen and should be reported to the host.
    File(PathBuf),
    /// The state moved to another directory whose listing must be fetched.
    Navigate(FetchRequest),
    Nothing,
}

/// Decides what confirming the current selection means. Pure.
pub fn plan(state: &QueryState) -> Confirmation {
    let resolved = state.resolved_path();
    match state.selected_row() {
        None | Some(Row::Error(_)) => Confirmation::Nothing,
        Some(Row::CreateFile { .. }) => Confirmation::CreateFile {
            dir: containing_directory(resolved),
            file: PathBuf::from(resolved),
        },
        Some(Row::CreateDirectory { .. }) => Confirmation::CreateDirectory {
            dir: resolved.to_string(),
        },
        Some(Row::Real(entry)) if entry.kind().is_dir() => {
            Confirmation::EnterDirectory(entry.full().to_path_buf())
        }
        Some(Row::Real(entry)) if entry.kind().is_file() => {
            Confirmation::OpenFile(entry.full().to_path_buf())
        }
        Some(Row::Real(_)) => Confirmation::Nothing,
    }
}

/// Plans and carries out the confirmation of the current selection.
///
/// Directory creation goes through `host`. On failure the state is left
/// untouched and the error is returned.
///
/// # Errors
///
/// - [`CoreError::CreateDirectory`]: the directory could not be created.
pub fn confirm(state: &mut QueryState, host: &dyn HostFs) -> CoreResult<Confirmed> {
    match plan(state) {
        Confirmation::CreateFile { dir, file } => {
            create_dir(host, &dir)?;
            Ok(Confirmed::File(file))
        }
        Confirmation::CreateDirectory { dir } => {
            create_dir(host, &dir)?;
            Ok(Confirmed::Navigate(state.move_directory(&dir)))
        }
        Confirmation::EnterDirectory(path) => Ok(Confirmed::Navigate(
            state.move_directory(&path.to_string_lossy()),
        )),
        Confirmation::OpenFile(path) => Ok(Confirmed::File(path)),
        Confirmation::Nothing => Ok(Confirmed::Nothing),
    }
}

/// The directory a root add/remove request would target: the selected row,
/// if it is a real directory.
pub fn root_target(state: &QueryState) -> Option<PathBuf> {
    match state.selected_row() {
        Some(Row::Real(entry)) if entry.kind().is_dir() => Some(entry.full().to_path_buf()),
        _ => None,
    }
}

fn create_dir(host: &dyn HostFs, dir: &str) -> CoreResult<()> {
    let path = Path::new(dir);
    tracing::debug!("creating {dir}");
    host.create_dir_all(path)
        .map_err(|source| CoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::fs::host::fake::{FakeFs, Node};
    use crate::nav::query::tests::{home_fixture, new_state, open, settle};
    use std::ffi::OsString;
    use std::io;

    fn select(state: &mut QueryState, fragment: &str) {
        let index = state
            .rows()
            .iter()
            .position(|r| r.fragment() == fragment)
            .unwrap();
        state.select_index(index);
    }

    #[test]
    fn empty_rows_plan_nothing() {
        let state = new_state();
        assert_eq!(plan(&state), Confirmation::Nothing);
    }

    #[test]
    fn directory_row_enters_directory() {
        let host = home_fixture();
        let mut state = new_state();
        open(&mut state, &host, "/home/u/");
        select(&mut state, "proj");

        assert_eq!(
            plan(&state),
            Confirmation::EnterDirectory(PathBuf::from("/home/u/proj"))
        );
        let Confirmed::Navigate(request) = confirm(&mut state, &host).unwrap() else {
            panic!("expected navigation");
        };
        assert_eq!(request.dir, "/home/u/proj/");
        assert_eq!(state.raw_query(), "/home/u/proj/");
    }

    #[test]
    fn parent_row_enters_parent() {
        let host = home_fixture();
        let mut state = new_state();
        open(&mut state, &host, "/home/u/");
        select(&mut state, "..");

        let Confirmed::Navigate(request) = confirm(&mut state, &host).unwrap() else {
            panic!("expected navigation");
        };
        assert_eq!(request.dir, "/home/");
    }

    #[test]
    fn file_row_is_confirmed() {
        let host = home_fixture();
        let mut state = new_state();
        open(&mut state, &host, "/home/u/");
        select(&mut state, "notes.md");

        assert_eq!(
            confirm(&mut state, &host).unwrap(),
            Confirmed::File(PathBuf::from("/home/u/notes.md"))
        );
        assert!(host.created().is_empty());
    }

    #[test]
    fn typed_file_name_opens_that_file() {
        let host = home_fixture();
        host.add("/home/u/notes.md.d", Node::Dir);
        let mut state = new_state();
        open(&mut state, &host, "/home/u/");
        state.set_query("/home/u/notes.md", &host);

        assert_eq!(
            plan(&state),
            Confirmation::OpenFile(PathBuf::from("/home/u/notes.md"))
        );
    }

    #[test]
    fn symlinked_directory_is_entered() {
        let host = home_fixture();
        host.add("/home/u/link", Node::SymlinkDir);
        let mut state = new_state();
        open(&mut state, &host, "/home/u/");
        select(&mut state, "link");

        assert!(matches!(plan(&state), Confirmation::EnterDirectory(_)));
    }

    #[test]
    fn create_file_creates_containing_directory() {
        let host = home_fixture();
        let mut state = new_state();
        open(&mut state, &host, "/home/u/");
        let request = state.set_query("/home/u/deep/new.txt", &host);
        settle(&mut state, &host, request);
        assert_eq!(state.rows().len(), 1);

        assert_eq!(
            plan(&state),
            Confirmation::CreateFile {
                dir: "/home/u/deep/".to_string(),
                file: PathBuf::from("/home/u/deep/new.txt"),
            }
        );
        assert_eq!(
            confirm(&mut state, &host).unwrap(),
            Confirmed::File(PathBuf::from("/home/u/deep/new.txt"))
        );
        assert_eq!(host.created(), vec![PathBuf::from("/home/u/deep/")]);
    }

    #[test]
    fn create_directory_then_navigates() {
        let host = home_fixture();
        let mut state = new_state();
        open(&mut state, &host, "/home/u/newdir/");

        let Confirmed::Navigate(request) = confirm(&mut state, &host).unwrap() else {
            panic!("expected navigation");
        };
        assert_eq!(host.created(), vec![PathBuf::from("/home/u/newdir/")]);
        assert_eq!(request.dir, "/home/u/newdir/");

        settle(&mut state, &host, Some(request));
        let fragments: Vec<&str> = state.rows().iter().map(Row::fragment).collect();
        assert_eq!(fragments, vec![".."]);
    }

    #[test]
    fn unreadable_entry_confirms_nothing() {
        let host = home_fixture();
        host.add("/home/u/broken", Node::Dangling);
        let mut state = QueryState::new(
            Some(PathBuf::from("/home/u")),
            crate::nav::filter::FilterOptions {
                show_unreadable: true,
                ..Default::default()
            },
        );
        state.set_base_path("/home/u", "/");
        open(&mut state, &host, "/home/u/");
        select(&mut state, "broken");

        assert_eq!(plan(&state), Confirmation::Nothing);
        assert_eq!(confirm(&mut state, &host).unwrap(), Confirmed::Nothing);
    }

    #[test]
    fn root_target_only_for_directories() {
        let host = home_fixture();
        let mut state = new_state();
        open(&mut state, &host, "/home/u/");

        select(&mut state, "proj");
        assert_eq!(root_target(&state), Some(PathBuf::from("/home/u/proj")));
        select(&mut state, "notes.md");
        assert_eq!(root_target(&state), None);

        state.set_query("/home/u/zz", &host);
        select(&mut state, "Create a file");
        assert_eq!(root_target(&state), None);
    }

    struct ReadOnlyFs(FakeFs);

    impl HostFs for ReadOnlyFs {
        fn home_dir(&self) -> Option<PathBuf> {
            self.0.home_dir()
        }
        fn exists(&self, path: &Path) -> bool {
            self.0.exists(path)
        }
        fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
            self.0.list_dir(path)
        }
        fn stat_target(&self, path: &Path) -> io::Result<crate::fs::host::TargetStat> {
            self.0.stat_target(path)
        }
        fn stat_link(&self, path: &Path) -> io::Result<crate::fs::host::LinkStat> {
            self.0.stat_link(path)
        }
        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn create_failure_is_propagated() {
        let host = ReadOnlyFs(home_fixture());
        let mut state = new_state();
        open(&mut state, &host.0, "/home/u/newdir/");

        let err = confirm(&mut state, &host).unwrap_err();
        assert!(matches!(err, CoreError::CreateDirectory { .. }));
        assert_eq!(state.raw_query(), "/home/u/newdir/");
        assert!(!state.is_fetching());
    }
}

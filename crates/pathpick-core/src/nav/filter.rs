//! Row classification: fuzzy filtering, display ordering and the synthetic
//! "create" rows.

use std::cmp::Ordering;
use std::path::Path;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::fs::entry::{Entry, EntryKind};
use crate::fs::fetch::DirectoryListing;
use crate::nav::resolve::{base_name, is_directory_path};

/// One selectable row of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// A listed file system entry with readable metadata.
    Real(Entry),
    /// An entry whose metadata could not be read. Only produced when
    /// [`FilterOptions::show_unreadable`] is set; confirming it does nothing.
    Error(Entry),
    /// Create the file named by the current query.
    CreateFile { label: String },
    /// Create the directory named by the current query.
    CreateDirectory { label: String },
}

impl Row {
    /// Display text of the row.
    pub fn fragment(&self) -> &str {
        match self {
            Self::Real(entry) | Self::Error(entry) => entry.fragment(),
            Self::CreateFile { label } | Self::CreateDirectory { label } => label,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Real(entry) | Self::Error(entry) => entry.kind(),
            Self::CreateFile { .. } => EntryKind::CreateFileAffordance,
            Self::CreateDirectory { .. } => EntryKind::CreateDirectoryAffordance,
        }
    }

    /// The backing entry, absent for affordances.
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Real(entry) | Self::Error(entry) => Some(entry),
            _ => None,
        }
    }

    /// Absolute path of the row. Affordances act on the query path instead.
    pub fn full(&self) -> Option<&Path> {
        self.entry().map(Entry::full)
    }

    pub fn is_affordance(&self) -> bool {
        self.kind().is_affordance()
    }
}

/// Classifier settings, usually derived from
/// [`Config`](crate::config::settings::Config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub create_file_label: String,
    pub create_directory_label: String,
    pub show_unreadable: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            create_file_label: "Create a file".to_string(),
            create_directory_label: "Create a directory".to_string(),
            show_unreadable: false,
        }
    }
}

/// Rows in display order plus the row a fresh query should select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    pub rows: Vec<Row>,
    /// Display index of the best match: the entry named exactly like the
    /// query, else the highest fuzzy score. `0` for directory queries and
    /// when nothing matched.
    pub best: usize,
}

/// Builds the row set for `query` from `listing`.
///
/// `listing` is `None` while a directory is unlisted (not fetched yet, or
/// listing failed), and then no rows are produced. Otherwise:
///
/// - a directory-shaped query keeps every readable entry, and offers
///   [`Row::CreateDirectory`] only when the directory has no entries at all
///   (it does not exist);
/// - any other query keeps the entries whose name fuzzy-matches the query's
///   base name, and offers [`Row::CreateFile`] unless one of them has exactly
///   that name.
///
/// Fuzzy rank decides membership and [`Filtered::best`]; the rows themselves
/// are in display order (see [`display_order`]).
pub fn filter(listing: Option<&DirectoryListing>, query: &str, options: &FilterOptions) -> Filtered {
    let Some(listing) = listing else {
        return Filtered::default();
    };

    let (readable, unreadable): (Vec<&Entry>, Vec<&Entry>) =
        listing.entries().iter().partition(|e| !e.is_error());
    let unreadable = if options.show_unreadable {
        unreadable
    } else {
        Vec::new()
    };

    if is_directory_path(query) {
        let mut rows: Vec<Row> = readable.into_iter().cloned().map(Row::Real).collect();
        rows.extend(unreadable.into_iter().cloned().map(Row::Error));
        if listing.is_empty() {
            rows.push(Row::CreateDirectory {
                label: options.create_directory_label.clone(),
            });
        }
        display_order(&mut rows);
        return Filtered { rows, best: 0 };
    }

    let name = base_name(query);
    let matched = fuzzy_rank(&readable, name);
    let exact = matched.iter().find(|(entry, _)| entry.fragment() == name);
    let best_full = exact
        .or_else(|| matched.first())
        .map(|(entry, _)| entry.full().to_path_buf());

    let mut rows: Vec<Row> = matched
        .iter()
        .map(|(entry, _)| Row::Real((*entry).clone()))
        .collect();
    rows.extend(
        fuzzy_rank(&unreadable, name)
            .into_iter()
            .map(|(entry, _)| Row::Error(entry.clone())),
    );
    if exact.is_none() {
        rows.push(Row::CreateFile {
            label: options.create_file_label.clone(),
        });
    }
    display_order(&mut rows);

    let best = best_full
        .and_then(|full| {
            rows.iter()
                .position(|r| matches!(r, Row::Real(e) if e.full() == full.as_path()))
        })
        .unwrap_or(0);
    Filtered { rows, best }
}

/// Fuzzy-matches `name` against each entry's fragment.
///
/// Scoring is skim's V2 algorithm (subsequence match with bonuses for
/// consecutive runs, word starts and prefix hits; smart case). Results are
/// sorted by score, highest first; equal scores keep listing order. An empty
/// `name` matches everything with a score of `0`.
pub fn fuzzy_rank<'a>(entries: &[&'a Entry], name: &str) -> Vec<(&'a Entry, i64)> {
    if name.is_empty() {
        return entries.iter().map(|e| (*e, 0)).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked: Vec<(&Entry, i64)> = entries
        .iter()
        .filter_map(|e| matcher.fuzzy_match(e.fragment(), name).map(|s| (*e, s)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Sorts rows for display: affordances last, directories before everything
/// else, then by fragment (byte order). The sort is stable.
pub fn display_order(rows: &mut [Row]) {
    rows.sort_by(compare_rows);
}

fn compare_rows(a: &Row, b: &Row) -> Ordering {
    a.is_affordance()
        .cmp(&b.is_affordance())
        .then_with(|| b.kind().is_dir().cmp(&a.kind().is_dir()))
        .then_with(|| a.fragment().cmp(b.fragment()))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::fs::fetch::fetch_directory;
    use crate::fs::host::fake::{FakeFs, Node};

    fn listing(children: &[(&str, Node)]) -> DirectoryListing {
        let host = FakeFs::new("/home/u");
        for (name, node) in children {
            host.add(&format!("/home/u/{name}"), *node);
        }
        fetch_directory(&host, "/home/u/").unwrap()
    }

    fn fragments(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(Row::fragment).collect()
    }

    #[test]
    fn unlisted_directory_has_no_rows() {
        assert!(filter(None, "/home/u/x", &FilterOptions::default()).rows.is_empty());
        assert!(filter(None, "/home/u/", &FilterOptions::default()).rows.is_empty());
    }

    #[test]
    fn directory_query_lists_dirs_then_files() {
        let listing = listing(&[
            ("zeta.txt", Node::File),
            ("alpha", Node::Dir),
            ("beta.rs", Node::File),
            ("Docs", Node::Dir),
        ]);
        let rows = filter(Some(&listing), "/home/u/", &FilterOptions::default()).rows;
        assert_eq!(
            fragments(&rows),
            vec!["..", "Docs", "alpha", "beta.rs", "zeta.txt"]
        );
    }

    #[test]
    fn directory_query_hides_stat_errors() {
        let listing = listing(&[("ok", Node::File), ("broken", Node::Dangling)]);
        let rows = filter(Some(&listing), "/home/u/", &FilterOptions::default()).rows;
        assert_eq!(fragments(&rows), vec!["..", "ok"]);
    }

    #[test]
    fn stat_errors_shown_when_enabled() {
        let listing = listing(&[("ok", Node::File), ("broken", Node::Dangling)]);
        let options = FilterOptions {
            show_unreadable: true,
            ..FilterOptions::default()
        };
        let rows = filter(Some(&listing), "/home/u/", &options).rows;
        assert_eq!(fragments(&rows), vec!["..", "broken", "ok"]);
        assert!(matches!(rows[1], Row::Error(_)));
    }

    #[test]
    fn existing_directory_never_offers_create_directory() {
        let listing = listing(&[]);
        let rows = filter(Some(&listing), "/home/u/", &FilterOptions::default()).rows;
        assert_eq!(fragments(&rows), vec![".."]);
    }

    #[test]
    fn missing_directory_offers_create_directory() {
        let listing = DirectoryListing::empty("/home/u/new/");
        let rows = filter(Some(&listing), "/home/u/new/", &FilterOptions::default()).rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind(), EntryKind::CreateDirectoryAffordance);
        assert_eq!(rows[0].fragment(), "Create a directory");
        assert!(rows[0].full().is_none());
    }

    #[test]
    fn leaf_query_in_missing_directory_offers_create_file() {
        let listing = DirectoryListing::empty("/home/u/new/");
        let rows = filter(Some(&listing), "/home/u/new/a.txt", &FilterOptions::default()).rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind(), EntryKind::CreateFileAffordance);
    }

    #[test]
    fn exact_match_suppresses_create_file() {
        let listing = listing(&[("foo.txt", Node::File)]);
        let rows = filter(Some(&listing), "/home/u/foo.txt", &FilterOptions::default()).rows;
        assert_eq!(fragments(&rows), vec!["foo.txt"]);
        assert!(rows.iter().all(|r| !r.is_affordance()));
    }

    #[test]
    fn partial_match_offers_create_file_last() {
        let listing = listing(&[("foo.txt", Node::File)]);
        let rows = filter(Some(&listing), "/home/u/foo", &FilterOptions::default()).rows;
        assert_eq!(fragments(&rows), vec!["foo.txt", "Create a file"]);
        assert_eq!(rows.last().unwrap().kind(), EntryKind::CreateFileAffordance);
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let listing = listing(&[("Readme", Node::File)]);
        let rows = filter(Some(&listing), "/home/u/readme", &FilterOptions::default()).rows;
        assert_eq!(fragments(&rows), vec!["Readme", "Create a file"]);
    }

    #[test]
    fn fuzzy_filter_drops_non_matches() {
        let listing = listing(&[
            ("project", Node::Dir),
            ("prj-notes.md", Node::File),
            ("other.txt", Node::File),
        ]);
        let rows = filter(Some(&listing), "/home/u/prj", &FilterOptions::default()).rows;
        assert_eq!(
            fragments(&rows),
            vec!["project", "prj-notes.md", "Create a file"]
        );
    }

    #[test]
    fn parent_entry_matches_dot_dot_query() {
        let listing = listing(&[("src", Node::Dir)]);
        let rows = filter(Some(&listing), "/home/u/..", &FilterOptions::default()).rows;
        assert_eq!(rows[0].fragment(), "..");
        assert!(rows.iter().all(|r| !r.is_affordance()));
    }

    #[test]
    fn fuzzy_rank_prefers_contiguous_prefix() {
        let listing = listing(&[("a_b_c_x.txt", Node::File), ("abc.txt", Node::File)]);
        let readable: Vec<&Entry> = listing.entries().iter().collect();
        let ranked = fuzzy_rank(&readable, "abc");
        assert_eq!(ranked[0].0.fragment(), "abc.txt");
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn fuzzy_rank_empty_name_keeps_everything() {
        let listing = listing(&[("a", Node::File), ("b", Node::File)]);
        let readable: Vec<&Entry> = listing.entries().iter().collect();
        let ranked = fuzzy_rank(&readable, "");
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|(_, score)| *score == 0));
    }

    #[test]
    fn custom_labels_are_used() {
        let options = FilterOptions {
            create_file_label: "New file".to_string(),
            ..FilterOptions::default()
        };
        let listing = DirectoryListing::empty("/home/u/");
        let rows = filter(Some(&listing), "/home/u/x", &options).rows;
        assert_eq!(rows[0].fragment(), "New file");
    }

    #[test]
    fn exact_file_is_best_even_when_listed_after_directory() {
        let listing = listing(&[("notes.md", Node::File), ("notes.md.d", Node::Dir)]);
        let filtered = filter(Some(&listing), "/home/u/notes.md", &FilterOptions::default());
        assert_eq!(fragments(&filtered.rows), vec!["notes.md.d", "notes.md"]);
        assert_eq!(filtered.best, 1);
    }

    #[test]
    fn best_is_highest_score_not_first_row() {
        let listing = listing(&[("abc.txt", Node::File), ("xaxbxc", Node::Dir)]);
        let filtered = filter(Some(&listing), "/home/u/abc", &FilterOptions::default());
        assert_eq!(
            fragments(&filtered.rows),
            vec!["xaxbxc", "abc.txt", "Create a file"]
        );
        assert_eq!(filtered.best, 1);
    }

    #[test]
    fn best_defaults_to_first_row() {
        let listing = listing(&[("src", Node::Dir)]);
        assert_eq!(filter(Some(&listing), "/home/u/", &FilterOptions::default()).best, 0);
        assert_eq!(filter(Some(&listing), "/home/u/zzz", &FilterOptions::default()).best, 0);
        assert_eq!(filter(None, "/home/u/s", &FilterOptions::default()).best, 0);
    }

    #[test]
    fn display_order_puts_affordances_last() {
        let mut rows = vec![
            Row::CreateFile {
                label: "Create a file".to_string(),
            },
            Row::Real(Entry::stat_error("/z".into(), "z")),
        ];
        display_order(&mut rows);
        assert_eq!(rows[0].fragment(), "z");
    }
}

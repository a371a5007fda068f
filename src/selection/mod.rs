//! Strategic file selection
//!
//! Picks up to five representative files from a repository tree in a
//! fixed priority order:
//!
//! 1. Documentation (README variants)
//! 2. Language entry point (`main.py`, `src/index.ts`, ...)
//! 3. Core implementation file under `src/`, `lib/`, `app/`, ...
//! 4. Test file
//! 5. Dependency manifest
//!
//! Steps 2, 3 and 5 need a known primary language and are skipped otherwise.
//! Where several files qualify equally (steps 3 and 4), a [`TieBreak`]
//! strategy chooses among them.

mod tables;

use crate::models::Language;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tracing::debug;

pub use tables::{
    config_files, entry_points, CORE_DIRECTORIES, EXCLUDE_PATTERNS, README_NAMES, TEST_DIRECTORIES,
    TEST_PATTERNS,
};

/// Maximum number of files returned by [`FileSelector::select`]
pub const MAX_SELECTED_FILES: usize = 5;

/// How to choose among equally-ranked candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Lexicographically-first path; reproducible across runs
    #[default]
    Lexicographic,
    /// Uniformly random; varies the sample across repeated runs
    Random,
}

impl TieBreak {
    fn pick<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        match self {
            TieBreak::Lexicographic => candidates.iter().min().copied(),
            TieBreak::Random => candidates.choose(&mut rand::rng()).copied(),
        }
    }
}

/// Fixed-priority file sampler
#[derive(Debug, Clone, Default)]
pub struct FileSelector {
    tie_break: TieBreak,
}

impl FileSelector {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Select up to [`MAX_SELECTED_FILES`] distinct paths from `file_tree`.
    pub fn select(&self, file_tree: &[String], language: Option<&str>) -> Vec<String> {
        if file_tree.is_empty() {
            return Vec::new();
        }

        let language = language.map(Language::from_name).unwrap_or_default();
        let tree: Vec<&str> = file_tree.iter().map(String::as_str).collect();

        let steps: [(&str, Option<&str>); 5] = [
            ("documentation", find_readme(&tree)),
            ("entry point", find_entry_point(&tree, language)),
            ("core", self.find_core_file(&tree, language)),
            ("test", self.find_test_file(&tree)),
            ("manifest", find_config_file(&tree, language)),
        ];

        let mut selected: Vec<String> = Vec::with_capacity(MAX_SELECTED_FILES);
        for (step, found) in steps {
            if selected.len() >= MAX_SELECTED_FILES {
                break;
            }
            if let Some(path) = found {
                if !selected.iter().any(|s| s == path) {
                    debug!("Selected {} file: {}", step, path);
                    selected.push(path.to_string());
                }
            }
        }

        selected
    }

    fn find_core_file<'a>(&self, tree: &[&'a str], language: Language) -> Option<&'a str> {
        if !language.is_known() {
            return None;
        }

        let eligible = |path: &&str| {
            has_extension(path, language)
                && !is_test_named(path)
                && !is_excluded(path)
        };

        let in_core: Vec<&str> = tree
            .iter()
            .copied()
            .filter(|p| CORE_DIRECTORIES.iter().any(|dir| p.starts_with(dir)))
            .filter(&eligible)
            .collect();

        if !in_core.is_empty() {
            return self.tie_break.pick(&in_core);
        }

        let at_root: Vec<&str> = tree
            .iter()
            .copied()
            .filter(|p| !p.contains('/'))
            .filter(&eligible)
            .collect();

        self.tie_break.pick(&at_root)
    }

    fn find_test_file<'a>(&self, tree: &[&'a str]) -> Option<&'a str> {
        let tests: Vec<&str> = tree
            .iter()
            .copied()
            .filter(|p| !is_excluded(p) && (in_test_directory(p) || is_test_named(p)))
            .collect();

        self.tie_break.pick(&tests)
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// `path` equals `pattern` or ends with it at a directory boundary
fn matches_suffix(path: &str, pattern: &str) -> bool {
    path == pattern
        || path
            .strip_suffix(pattern)
            .is_some_and(|prefix| prefix.ends_with('/'))
}

fn has_extension(path: &str, language: Language) -> bool {
    language.extensions().iter().any(|ext| path.ends_with(ext))
}

fn is_test_named(path: &str) -> bool {
    let name = file_name(path);
    TEST_PATTERNS.iter().any(|pattern| name.contains(pattern))
}

fn in_test_directory(path: &str) -> bool {
    TEST_DIRECTORIES
        .iter()
        .any(|dir| path.starts_with(dir) || path.contains(&format!("/{}", dir)))
}

fn is_excluded(path: &str) -> bool {
    EXCLUDE_PATTERNS.iter().any(|pattern| {
        if pattern.ends_with('/') {
            path.starts_with(pattern) || path.contains(&format!("/{}", pattern))
        } else {
            path.ends_with(pattern)
        }
    })
}

fn find_readme<'a>(tree: &[&'a str]) -> Option<&'a str> {
    README_NAMES.iter().find_map(|name| {
        tree.iter()
            .find(|path| file_name(path).eq_ignore_ascii_case(name))
            .copied()
    })
}

fn find_entry_point<'a>(tree: &[&'a str], language: Language) -> Option<&'a str> {
    entry_points(language).iter().find_map(|pattern| {
        tree.iter()
            .find(|path| !is_excluded(path) && matches_suffix(path, pattern))
            .copied()
    })
}

fn find_config_file<'a>(tree: &[&'a str], language: Language) -> Option<&'a str> {
    config_files(language).iter().find_map(|pattern| {
        tree.iter()
            .find(|path| !is_excluded(path) && matches_suffix(path, pattern))
            .copied()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_python_repository() {
        let files = tree(&["README.md", "main.py", "src/utils.py", "tests/test_main.py"]);
        let selected = FileSelector::default().select(&files, Some("Python"));

        assert!(selected.contains(&"README.md".to_string()));
        assert!(selected.contains(&"main.py".to_string()));
        assert_eq!(
            selected,
            vec!["README.md", "main.py", "src/utils.py", "tests/test_main.py"]
        );
    }

    #[test]
    fn test_empty_tree() {
        assert!(FileSelector::default().select(&[], Some("Python")).is_empty());
        assert!(FileSelector::default().select(&[], None).is_empty());
    }

    #[test]
    fn test_unknown_language_only_docs_and_tests() {
        let files = tree(&[
            "readme.rst",
            "main.kt",
            "src/App.kt",
            "build.gradle.kts",
            "src/test/AppTest.kt",
        ]);
        let selected = FileSelector::default().select(&files, Some("Kotlin"));
        assert_eq!(selected, vec!["readme.rst", "src/test/AppTest.kt"]);

        let selected = FileSelector::default().select(&files, None);
        assert_eq!(selected, vec!["readme.rst", "src/test/AppTest.kt"]);
    }

    #[test]
    fn test_full_five_slot_selection() {
        let files = tree(&[
            "Cargo.lock",
            "Cargo.toml",
            "README.md",
            "src/main.rs",
            "src/parser.rs",
            "src/lexer.rs",
            "tests/parse_test.rs",
        ]);
        let selected = FileSelector::default().select(&files, Some("Rust"));

        assert_eq!(selected.len(), MAX_SELECTED_FILES);
        assert_eq!(selected[0], "README.md");
        assert_eq!(selected[1], "src/main.rs");
        assert_eq!(selected[2], "src/lexer.rs");
        assert_eq!(selected[3], "tests/parse_test.rs");
        assert_eq!(selected[4], "Cargo.toml");
    }

    #[test]
    fn test_no_duplicates_when_entry_point_is_also_core() {
        let files = tree(&["src/main.rs"]);
        let selected = FileSelector::default().select(&files, Some("Rust"));
        assert_eq!(selected, vec!["src/main.rs"]);
    }

    #[test]
    fn test_core_excludes_vendored_tests_and_minified() {
        let files = tree(&[
            "src/node_modules/lodash/index.js",
            "src/app.test.js",
            "src/vendor.min.js",
            "lib/dist/bundle.js",
            "lib/widget.js",
        ]);
        let selected = FileSelector::default().select(&files, Some("JavaScript"));
        assert!(selected.contains(&"lib/widget.js".to_string()));
        assert!(!selected.contains(&"src/vendor.min.js".to_string()));
        assert!(!selected.contains(&"src/node_modules/lodash/index.js".to_string()));
    }

    #[test]
    fn test_core_falls_back_to_root_files() {
        let files = tree(&["docs/guide.go", "server.go", "handler.go", "handler_test.go"]);
        let selected = FileSelector::default().select(&files, Some("Go"));
        // No entry point, no core dirs: lexicographically-first root file
        assert_eq!(selected[0], "handler.go");
        assert!(selected.contains(&"handler_test.go".to_string()));
    }

    #[test]
    fn test_entry_point_matches_on_directory_boundary() {
        let files = tree(&["cmd/tool/main.go", "domain.go"]);
        let selected = FileSelector::default().select(&files, Some("Go"));
        assert_eq!(selected[0], "cmd/tool/main.go");

        // "remain.go" must not match the "main.go" pattern
        let files = tree(&["remain.go"]);
        assert!(find_entry_point(&["remain.go"], Language::Go).is_none());
        let selected = FileSelector::default().select(&files, Some("Go"));
        assert_eq!(selected, vec!["remain.go"]);
    }

    #[test]
    fn test_test_directory_is_component_based() {
        assert!(in_test_directory("tests/unit/test_x.py"));
        assert!(in_test_directory("pkg/__tests__/x.js"));
        assert!(!in_test_directory("latest/notes.txt"));
    }

    #[test]
    fn test_lexicographic_tie_break_is_reproducible() {
        let files = tree(&["src/zeta.py", "src/alpha.py", "src/mid.py"]);
        let selector = FileSelector::new(TieBreak::Lexicographic);
        let first = selector.select(&files, Some("Python"));
        for _ in 0..10 {
            assert_eq!(selector.select(&files, Some("Python")), first);
        }
        assert_eq!(first, vec!["src/alpha.py"]);
    }

    #[test]
    fn test_random_tie_break_picks_a_candidate() {
        let files = tree(&["src/zeta.py", "src/alpha.py", "src/mid.py"]);
        let selected = FileSelector::new(TieBreak::Random).select(&files, Some("Python"));
        assert_eq!(selected.len(), 1);
        assert!(files.contains(&selected[0]));
    }
}

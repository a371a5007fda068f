//! Pattern tables for strategic file selection

use crate::models::Language;

/// Documentation file names, compared case-insensitively, in priority order
pub const README_NAMES: &[&str] = &["README.md", "README.rst", "README.txt", "README"];

pub const CORE_DIRECTORIES: &[&str] = &["src/", "lib/", "app/", "core/", "pkg/", "internal/"];

pub const TEST_DIRECTORIES: &[&str] = &["tests/", "test/", "__tests__/", "spec/"];

/// File-name fragments that mark a test file
pub const TEST_PATTERNS: &[&str] = &["test_", "_test.", ".test.", ".spec."];

/// Directory prefixes (trailing `/`) and file suffixes never sampled
pub const EXCLUDE_PATTERNS: &[&str] = &[
    "node_modules/",
    "vendor/",
    "dist/",
    "build/",
    ".min.js",
    ".bundle.js",
];

/// Entry-point candidates, matched by exact path or directory-boundary suffix
pub fn entry_points(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &[
            "main.py",
            "app.py",
            "__main__.py",
            "run.py",
            "manage.py",
            "wsgi.py",
            "src/main.py",
            "app/main.py",
        ],
        Language::JavaScript => &["index.js", "app.js", "main.js", "server.js", "src/index.js"],
        Language::TypeScript => &[
            "index.ts",
            "app.ts",
            "main.ts",
            "server.ts",
            "src/index.ts",
            "src/index.tsx",
            "src/app.ts",
        ],
        Language::Go => &["main.go", "cmd/main.go"],
        Language::Rust => &["src/main.rs", "src/lib.rs", "main.rs"],
        Language::Java => &["Main.java", "Application.java"],
        Language::C => &["main.c", "src/main.c"],
        Language::Cpp => &["main.cpp", "src/main.cpp"],
        Language::Ruby => &["main.rb", "app.rb", "config.ru"],
        Language::Php => &["index.php", "app.php", "public/index.php"],
        Language::Unknown => &[],
    }
}

/// Dependency manifests and lockfiles
pub fn config_files(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &[
            "requirements.txt",
            "Pipfile",
            "pyproject.toml",
            "setup.py",
            "poetry.lock",
        ],
        Language::JavaScript => &["package.json", "package-lock.json", "yarn.lock"],
        Language::TypeScript => &["package.json", "tsconfig.json"],
        Language::Go => &["go.mod", "go.sum"],
        Language::Rust => &["Cargo.toml", "Cargo.lock"],
        Language::Java => &["pom.xml", "build.gradle"],
        Language::C | Language::Cpp => &["CMakeLists.txt", "Makefile"],
        Language::Ruby => &["Gemfile", "Gemfile.lock"],
        Language::Php => &["composer.json", "composer.lock"],
        Language::Unknown => &[],
    }
}

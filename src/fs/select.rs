//! which files of an application directory get staged
//!
//! patterns follow the `.cfignore` rules: gitignore-like lines where `*`
//! stays within one path component, `**` spans components, a leading `/`
//! anchors at the app root and `!` re-includes. the last matching pattern
//! decides.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{IoResultExt, Result};

/// always excluded, before any `.cfignore` lines
pub const DEFAULT_IGNORES: &[&str] = &[
    ".cfignore",
    "/manifest.yml",
    ".gitignore",
    ".git",
    ".hg",
    ".svn",
    "_darcs",
    ".DS_Store",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct Rule {
    exclude: bool,
    anchored: bool,
    glob: Pattern,
}

/// compiled ignore rules for one application directory
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    rules: Vec<Rule>,
}

impl IgnoreRules {
    /// default rules followed by the given `.cfignore` text
    pub fn parse(text: &str) -> Self {
        let mut rules = Vec::new();
        let lines = DEFAULT_IGNORES.iter().copied().chain(text.lines());

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (exclude, pattern) = match line.strip_prefix('!') {
                Some(rest) => (false, rest),
                None => (true, line),
            };
            let pattern = clean(pattern);
            if pattern.is_empty() {
                continue;
            }

            for expanded in expand(&pattern) {
                match Pattern::new(&expanded) {
                    Ok(glob) => rules.push(Rule {
                        exclude,
                        anchored: expanded.starts_with('/'),
                        glob,
                    }),
                    Err(e) => {
                        warn!("ignoring invalid pattern {:?}: {}", line, e);
                        break;
                    }
                }
            }
        }

        Self { rules }
    }

    /// rules for `dir`, reading its `.cfignore` if present
    pub fn for_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(".cfignore");
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::parse("")),
            Err(e) => Err(e).with_path(path),
        }
    }

    /// whether a `/`-separated path relative to the app root is excluded
    pub fn is_ignored(&self, relative: &str) -> bool {
        let rooted = format!("/{}", relative);
        let mut ignored = false;
        for rule in &self.rules {
            let candidate = if rule.anchored { &rooted } else { relative };
            if rule.glob.matches_with(candidate, MATCH_OPTIONS) {
                ignored = rule.exclude;
            }
        }
        ignored
    }
}

/// a file or directory selected for staging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFile {
    /// path relative to the app root
    pub path: PathBuf,
    pub is_dir: bool,
}

/// list the application files under `dir`, parents before children
pub fn app_files_in_dir(dir: &Path) -> Result<Vec<AppFile>> {
    let rules = IgnoreRules::for_dir(dir)?;
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from).with_path(dir)?;
        let relative = match entry.path().strip_prefix(dir) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => continue,
        };

        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if rules.is_ignored(&key) {
            continue;
        }

        files.push(AppFile {
            path: relative,
            is_dir: entry.file_type().is_dir(),
        });
    }

    Ok(files)
}

/// normalize a pattern like path.Clean would, minus `..` handling
fn clean(pattern: &str) -> String {
    let mut p = pattern;
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    let anchored = p.starts_with('/');
    let parts: Vec<&str> = p
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    let joined = parts.join("/");
    if anchored {
        format!("/{}", joined)
    } else {
        joined
    }
}

fn expand(pattern: &str) -> Vec<String> {
    let mut globs = vec![
        pattern.to_string(),
        format!("{}/*", pattern),
        format!("{}/**/*", pattern),
    ];
    if !pattern.starts_with('/') {
        globs.push(format!("**/{}", pattern));
        globs.push(format!("**/{}/*", pattern));
        globs.push(format!("**/{}/**/*", pattern));
    }
    globs
}

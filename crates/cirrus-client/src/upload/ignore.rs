//! Ignore-pattern matching for folder uploads and source bundles.
//!
//! Rules follow gitignore conventions: `#` comments, blank lines, `!`
//! negation, and last-match-wins ordering. Patterns without an anchor
//! match at any depth; a leading `/` anchors a pattern to the root.

use std::fs;
use std::path::Path;

use cirrus_core::constants::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE_NAME};
use cirrus_core::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: String,
    negated: bool,
}

/// An ordered, compiled set of ignore rules.
#[derive(Debug)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
    set: GlobSet,
    /// Maps glob indices in `set` back to rule indices. Each rule compiles
    /// to two globs: the pattern itself and `pattern/**` for its contents.
    glob_to_rule: Vec<usize>,
}

impl IgnoreRuleSet {
    /// A set that ignores nothing.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            set: GlobSet::empty(),
            glob_to_rule: Vec::new(),
        }
    }

    /// Read the ignore file under `root` (when present) and append the
    /// built-in exclusions. A missing ignore file is not an error.
    pub fn load(root: &Path) -> Result<Self> {
        let mut lines: Vec<String> = Vec::new();

        let ignore_file = root.join(IGNORE_FILE_NAME);
        if ignore_file.is_file() {
            let text = fs::read_to_string(&ignore_file)
                .map_err(|e| Error::filesystem(&ignore_file, e))?;
            lines.extend(text.lines().map(str::to_owned));
        }
        lines.extend(DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()));

        Self::from_patterns(lines)
    }

    /// Build a rule set from raw pattern lines.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for line in patterns {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (pattern, negated) = match line.strip_prefix('!') {
                Some(rest) => (rest, true),
                None => (line, false),
            };
            let normalized = normalize_pattern(pattern);
            if normalized.is_empty() {
                continue;
            }
            rules.push(IgnoreRule {
                pattern: normalized,
                negated,
            });
        }

        Self::compile(rules)
    }

    fn compile(rules: Vec<IgnoreRule>) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut glob_to_rule = Vec::with_capacity(rules.len() * 2);

        for (index, rule) in rules.iter().enumerate() {
            for pattern in [rule.pattern.clone(), format!("{}/**", rule.pattern)] {
                let glob = GlobBuilder::new(&pattern)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| {
                        Error::validation(format!(
                            "invalid ignore pattern '{}': {}",
                            rule.pattern, e
                        ))
                    })?;
                builder.add(glob);
                glob_to_rule.push(index);
            }
        }

        let set = builder
            .build()
            .map_err(|e| Error::validation(format!("invalid ignore rules: {}", e)))?;

        Ok(Self {
            rules,
            set,
            glob_to_rule,
        })
    }

    /// Whether `candidate`, a `/`-separated path relative to the root, is
    /// ignored. The last matching rule decides.
    pub fn ignores(&self, candidate: &str) -> bool {
        let candidate = candidate.trim_start_matches("./").trim_matches('/');
        if candidate.is_empty() || self.rules.is_empty() {
            return false;
        }

        let mut last_rule: Option<usize> = None;
        for glob_index in self.set.matches(candidate) {
            let rule_index = self.glob_to_rule[glob_index];
            last_rule = Some(last_rule.map_or(rule_index, |current| current.max(rule_index)));
        }

        match last_rule {
            Some(index) => !self.rules[index].negated,
            None => false,
        }
    }

    /// Apply the rules to both the relative path and the bare file name,
    /// so `node_modules` matches the directory wherever it appears.
    pub fn is_ignored(&self, relative_path: &str, file_name: &str) -> bool {
        self.ignores(relative_path) || self.ignores(file_name)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Normalize one pattern: strip trailing `/` (directory markers match the
/// path itself), strip a leading `/` (the match input is already
/// root-relative), and prefix unanchored patterns with `**/` so they
/// match at any depth.
fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.trim().trim_end_matches('/');
    if let Some(anchored) = pattern.strip_prefix('/') {
        anchored.to_string()
    } else if pattern.starts_with("*/") || pattern.starts_with("**/") {
        pattern.to_string()
    } else if pattern.is_empty() {
        String::new()
    } else {
        format!("**/{}", pattern)
    }
}

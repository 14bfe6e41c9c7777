//! Domain entities: core data structures

use crate::domain::seed::ResolvedSeed;
use crate::domain::totals::Totals;
use crate::domain::tree::DrawTree;

/// Competition the draw is made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    /// Name as given on the command line
    pub name: String,
}

impl Competition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Display name: first letter of every word upper-case, the rest lower-case.
    ///
    /// A word is any run of alphabetic characters, so `o'neil trophy`
    /// becomes `O'Neil Trophy`.
    pub fn title(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut in_word = false;
        for c in self.name.chars() {
            if c.is_alphabetic() {
                if in_word {
                    out.extend(c.to_lowercase());
                } else {
                    out.extend(c.to_uppercase());
                }
                in_word = true;
            } else {
                out.push(c);
                in_word = false;
            }
        }
        out
    }

    /// Name made safe for use in a file name.
    ///
    /// Whitespace and path separators become `_`.
    pub fn file_slug(&self) -> String {
        self.name
            .chars()
            .map(|c| {
                if c.is_whitespace() || c == '/' || c == '\\' {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    }

    /// Output file stem: `{prefix}_{slug}_seed_{seed}`.
    ///
    /// Two runs only share a stem when they share both name and seed.
    pub fn file_stem(&self, prefix: &str, seed: u64) -> String {
        format!("{}_{}_seed_{}", prefix, self.file_slug(), seed)
    }
}

/// Complete, validated outcome of one run.
#[derive(Debug, Clone)]
pub struct Draw {
    pub competition: Competition,
    pub seed: ResolvedSeed,
    pub totals: Totals,
    pub drawn: DrawTree,
}

/// Expand environment variables in a path string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

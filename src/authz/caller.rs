//! Call-site identity used for diagnostics and for the entry-point gate.

use std::fmt;
use std::panic::Location;
use std::path::{Component, Path};

/// Source location of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Caller {
    /// Location of whoever called the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }

    /// True if the call site is a binary crate root: `src/main.rs`,
    /// `src/bin/<name>.rs` or `src/bin/<name>/main.rs`.
    ///
    /// A library module that happens to live in a file called `main.rs` does
    /// not count.
    pub fn is_entry_point(&self) -> bool {
        let parts: Vec<&str> = Path::new(self.file)
            .components()
            .filter_map(|c| match c {
                Component::Normal(p) => p.to_str(),
                _ => None,
            })
            .collect();

        match parts.as_slice() {
            [.., "src", "main.rs"] => true,
            [.., "src", "bin", name] => name.ends_with(".rs"),
            [.., "src", "bin", _, "main.rs"] => true,
            _ => false,
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(loc: &'static Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
            column: loc.column(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

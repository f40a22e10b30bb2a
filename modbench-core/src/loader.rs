//! Loader
//!
//! Validates candidate modules and assembles the suite. A rejected candidate
//! becomes a [`LoadError`]; the remaining candidates still load.

use crate::error::LoadError;
use crate::module::{Module, ModuleSource};

/// A loaded module and its position in the source list
pub struct SuiteEntry {
    /// Index of the source this module came from
    pub position: usize,
    /// The runnable module
    pub module: Box<dyn Module>,
}

impl std::fmt::Debug for SuiteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteEntry")
            .field("position", &self.position)
            .field("module", &self.module.name())
            .finish()
    }
}

/// Modules to execute, in discovery order
#[derive(Debug, Default)]
pub struct Suite {
    entries: Vec<SuiteEntry>,
}

impl Suite {
    /// Number of modules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the suite is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Module names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.module.name()).collect()
    }

    /// Iterate over entries in execution order
    pub fn iter(&self) -> impl Iterator<Item = &SuiteEntry> {
        self.entries.iter()
    }
}

impl IntoIterator for Suite {
    type Item = SuiteEntry;
    type IntoIter = std::vec::IntoIter<SuiteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Result of [`discover`]
#[derive(Debug, Default)]
pub struct Discovery {
    /// Modules that loaded
    pub suite: Suite,
    /// Candidates that were rejected, in source order
    pub errors: Vec<LoadError>,
}

impl Discovery {
    /// Total number of sources examined
    pub fn sources(&self) -> usize {
        self.suite.len() + self.errors.len()
    }
}

/// Load every source in order. One bad source does not stop the others.
pub fn discover<I>(sources: I) -> Discovery
where
    I: IntoIterator<Item = Box<dyn ModuleSource>>,
{
    let mut discovery = Discovery::default();

    for (position, source) in sources.into_iter().enumerate() {
        let identity = source.identity().to_string();
        match source.load() {
            Ok(module) => {
                tracing::debug!(module = %identity, position, "module loaded");
                discovery.suite.entries.push(SuiteEntry { position, module });
            }
            Err(reason) => {
                tracing::warn!(module = %identity, %reason, "module rejected");
                discovery.errors.push(LoadError {
                    module: identity,
                    position,
                    reason,
                });
            }
        }
    }

    discovery
}

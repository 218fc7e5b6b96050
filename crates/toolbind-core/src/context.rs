// crates/toolbind-core/src/context.rs
// ============================================================================
// Module: Run Context
// Description: Run-scoped bookkeeping for tool-name uniqueness.
// Purpose: Thread claimed names explicitly through extraction.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`RunContext`] lives for exactly one generation run. It records which
//! operation claimed each tool name. The [`NameScope`] decides whether claims
//! survive from one file to the next.

use std::collections::BTreeMap;

use crate::AnnotationError;

/// Scope in which tool names must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameScope {
    /// Names must be unique within each output file.
    File,
    /// Names must be unique across every file of the run.
    #[default]
    Run,
}

impl NameScope {
    /// Returns the configuration spelling of the scope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Run => "run",
        }
    }
}

/// Explicit per-run naming context.
///
/// # Invariants
/// - `claimed` maps each tool name to the qualified operation that owns it.
/// - In [`NameScope::File`] scope claims are dropped by [`RunContext::begin_file`].
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Uniqueness scope.
    scope: NameScope,
    /// Claimed tool names and their owners.
    claimed: BTreeMap<String, String>,
}

impl RunContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new(scope: NameScope) -> Self {
        Self {
            scope,
            claimed: BTreeMap::new(),
        }
    }

    /// Returns the uniqueness scope.
    #[must_use]
    pub const fn scope(&self) -> NameScope {
        self.scope
    }

    /// Marks the start of a new output file.
    pub fn begin_file(&mut self) {
        if self.scope == NameScope::File {
            self.claimed.clear();
        }
    }

    /// Claims `name` for `owner`.
    ///
    /// # Errors
    /// Returns [`AnnotationError::NameConflict`] naming both operations when
    /// the name is already claimed in the active scope.
    pub fn claim(&mut self, name: &str, owner: &str) -> Result<(), AnnotationError> {
        if let Some(first) = self.claimed.get(name) {
            return Err(AnnotationError::NameConflict {
                name: name.to_string(),
                first: first.clone(),
                second: owner.to_string(),
            });
        }
        self.claimed.insert(name.to_string(), owner.to_string());
        Ok(())
    }

    /// Returns the owner of a claimed name.
    #[must_use]
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.claimed.get(name).map(String::as_str)
    }
}

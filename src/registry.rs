//! Keeps track of which paths are open, and how.
//!
//! Any number of sessions can read a path at once, but a session that writes or appends to a
//! path has it to itself. Sessions that share a `Registry` respect each other's claims:
//!
//! ```no_run
//! use lasfile::{File, Registry};
//! let registry = Registry::new();
//! let reader = File::open_read(&registry, "points.las").unwrap();
//! assert!(File::open_write(&registry, "points.las", None).is_err());
//! ```
//!
//! A registry is cheap to clone, and clones share their claims.

use crate::{Error, Result, file::Mode};
use log::debug;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    Read(usize),
    Write,
}

/// A shared set of open paths.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    paths: Arc<Mutex<HashMap<PathBuf, Access>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Claims a path for a mode.
    ///
    /// Fails without claiming anything if the claim conflicts with one that is already held.
    pub(crate) fn register(&self, path: &Path, mode: Mode) -> Result<()> {
        let mut paths = self.lock();
        let access = paths.get(path).copied();
        let access = match (mode, access) {
            (_, Some(Access::Write)) => return Err(Error::AlreadyOpenForWrite(path.to_path_buf())),
            (Mode::Read, Some(Access::Read(n))) => Access::Read(n + 1),
            (Mode::Read, None) => Access::Read(1),
            (Mode::Write | Mode::Append, Some(Access::Read(_))) => {
                return Err(Error::AlreadyOpenForRead(path.to_path_buf()));
            }
            (Mode::Write | Mode::Append, None) => Access::Write,
        };
        debug!("registering {} for {mode}", path.display());
        let _ = paths.insert(path.to_path_buf(), access);
        Ok(())
    }

    /// Gives up a claim on a path.
    pub(crate) fn release(&self, path: &Path, mode: Mode) {
        let mut paths = self.lock();
        match (mode, paths.get(path).copied()) {
            (Mode::Read, Some(Access::Read(n))) if n > 1 => {
                let _ = paths.insert(path.to_path_buf(), Access::Read(n - 1));
            }
            (Mode::Read, Some(Access::Read(_))) | (Mode::Write | Mode::Append, Some(Access::Write)) => {
                let _ = paths.remove(path);
            }
            (_, access) => {
                debug!(
                    "{} was not registered for {mode} (found {access:?})",
                    path.display()
                );
                return;
            }
        }
        debug!("released {} from {mode}", path.display());
    }

    /// Returns the number of sessions reading this path.
    pub fn readers<P: AsRef<Path>>(&self, path: P) -> usize {
        let Ok(path) = resolve(path.as_ref()) else {
            return 0;
        };
        match self.lock().get(&path) {
            Some(Access::Read(n)) => *n,
            _ => 0,
        }
    }

    /// Returns true if a session is writing or appending to this path.
    pub fn is_open_for_write<P: AsRef<Path>>(&self, path: P) -> bool {
        resolve(path.as_ref())
            .map(|path| matches!(self.lock().get(&path), Some(Access::Write)))
            .unwrap_or(false)
    }

    /// Returns true if no paths are open.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Access>> {
        // Updates are single inserts or removes, so the map is whole even if a holder panicked.
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resolves a path to the absolute form that claims are keyed by.
pub(crate) fn resolve(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(Error::from)
}

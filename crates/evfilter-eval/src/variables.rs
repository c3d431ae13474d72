//! Versioned variable store
//!
//! Every write publishes a new value at a new global version. Evaluation passes pin the
//! global version once and then read, for each variable, the value committed at the
//! greatest version not newer than the pin.
//!
//! Each variable keeps a copy-on-write history: a writer builds the next history off to
//! the side and swaps the `Arc` in, readers clone the `Arc` and search it without holding
//! any lock. Writers are serialized among themselves; the global counter is bumped only
//! after all slots of a write are swapped in, so a pin never observes half a write.

use crate::error::{EvalError, EvalResult};
use evfilter_types::{Value, ValueType};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global version number
pub type Version = u64;

/// Default number of versions retained per variable.
///
/// A pin only sees its own snapshot while every variable it reads still retains the entry
/// current at that pin. A pin that outlives `max_versions` later writes to a variable
/// reads that variable's oldest retained value instead, and a warning is logged.
pub const DEFAULT_MAX_VERSIONS: usize = 1024;

/// Snapshot token fixing the variable versions visible to one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionPin(Version);

impl VersionPin {
    pub const fn version(&self) -> Version {
        self.0
    }
}

impl fmt::Display for VersionPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Default)]
struct History {
    entries: VecDeque<(Version, Value)>,
    trimmed: bool,
}

impl History {
    fn value_at(&self, pin: Version) -> Option<&Value> {
        // Entries are ordered by version; find the last one not newer than the pin
        let idx = self.entries.partition_point(|(version, _)| *version <= pin);
        idx.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|(_, value)| value)
    }

    /// Copy of this history with one more entry. Each write copies up to `max_versions`
    /// entries; readers holding the previous `Arc` keep it unchanged.
    fn with(&self, version: Version, value: Value, max_versions: usize) -> Self {
        let mut entries = self.entries.clone();
        let mut trimmed = self.trimmed;
        entries.push_back((version, value));
        while entries.len() > max_versions {
            entries.pop_front();
            trimmed = true;
        }
        Self { entries, trimmed }
    }
}

#[derive(Debug)]
struct Slot {
    value_type: ValueType,
    history: RwLock<Arc<History>>,
}

impl Slot {
    fn snapshot(&self) -> Arc<History> {
        Arc::clone(&self.history.read())
    }
}

/// Engine-wide store of named, versioned variables.
#[derive(Debug)]
pub struct VariableStore {
    slots: RwLock<HashMap<String, Arc<Slot>>>,
    version: AtomicU64,
    writer: Mutex<()>,
    max_versions: usize,
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableStore {
    pub fn new() -> Self {
        Self::with_max_versions(DEFAULT_MAX_VERSIONS)
    }

    /// Store retaining at most `max_versions` entries per variable (at least one)
    pub fn with_max_versions(max_versions: usize) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            version: AtomicU64::new(0),
            writer: Mutex::new(()),
            max_versions: max_versions.max(1),
        }
    }

    pub fn max_versions(&self) -> usize {
        self.max_versions
    }

    /// Latest committed global version
    pub fn current_version(&self) -> Version {
        self.version.load(Ordering::Acquire)
    }

    /// Capture the current global version as the pin for one evaluation pass
    pub fn set_local_version(&self) -> VersionPin {
        VersionPin(self.current_version())
    }

    /// Register a variable with its type and initial value.
    ///
    /// The initial value is visible to every pin, including pins taken before the
    /// declaration.
    pub fn declare(
        &self,
        name: impl Into<String>,
        value_type: ValueType,
        initial: Value,
    ) -> EvalResult<()> {
        let name = name.into();
        let initial = coerce(&name, value_type, initial)?;
        let _guard = self.writer.lock();
        let mut slots = self.slots.write();
        if slots.contains_key(&name) {
            return Err(EvalError::DuplicateVariable { name });
        }
        let mut entries = VecDeque::new();
        entries.push_back((self.current_version(), initial));
        log::debug!("Declared variable {} of type {}", name, value_type);
        slots.insert(
            name,
            Arc::new(Slot {
                value_type,
                history: RwLock::new(Arc::new(History {
                    entries,
                    trimmed: false,
                })),
            }),
        );
        Ok(())
    }

    /// Value of `name` as of `pin`.
    ///
    /// When retention has dropped the entry `pin` needs, the oldest retained value is
    /// returned (see [`DEFAULT_MAX_VERSIONS`]).
    pub fn read(&self, name: &str, pin: VersionPin) -> EvalResult<Value> {
        let slot = self.slot(name)?;
        let history = slot.snapshot();
        if let Some(value) = history.value_at(pin.version()) {
            return Ok(value.clone());
        }
        if history.trimmed {
            log::warn!(
                "Pin {} predates retained history of variable {}; reading oldest retained value",
                pin,
                name
            );
        }
        history
            .entries
            .front()
            .map(|(_, value)| value.clone())
            .ok_or_else(|| EvalError::internal(format!("variable {} has no history", name)))
    }

    /// Publish a new value for `name` and return the version it was committed at
    pub fn write(&self, name: &str, value: Value) -> EvalResult<Version> {
        self.write_all([(name, value)])
    }

    /// Publish several values atomically at one new version.
    ///
    /// All names and values are validated before anything is published.
    pub fn write_all<'a, I>(&self, writes: I) -> EvalResult<Version>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let _guard = self.writer.lock();
        let staged = writes
            .into_iter()
            .map(|(name, value)| {
                let slot = self.slot(name)?;
                let value = coerce(name, slot.value_type, value)?;
                Ok((name, slot, value))
            })
            .collect::<EvalResult<Vec<_>>>()?;

        let version = self.current_version() + 1;
        for (name, slot, value) in staged {
            log::trace!("Publishing {} = {} at version {}", name, value, version);
            let next = slot.snapshot().with(version, value, self.max_versions);
            *slot.history.write() = Arc::new(next);
        }
        self.version.store(version, Ordering::Release);
        Ok(version)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.read().contains_key(name)
    }

    /// Declared type of `name`
    pub fn value_type(&self, name: &str) -> Option<ValueType> {
        self.slots.read().get(name).map(|slot| slot.value_type)
    }

    /// Declared variable names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.slots.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn slot(&self, name: &str) -> EvalResult<Arc<Slot>> {
        self.slots
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::unknown_variable(name))
    }
}

fn coerce(name: &str, value_type: ValueType, value: Value) -> EvalResult<Value> {
    let found = value.type_name();
    value_type.coerce(value).ok_or_else(|| {
        EvalError::type_mismatch(value_type.name(), format!("{} for variable {}", found, name))
    })
}

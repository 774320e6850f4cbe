use super::LoadError;
use std::{
    fmt,
    sync::{Mutex, OnceLock, PoisonError},
};

type Loader<T> = Box<dyn Fn() -> Result<T, LoadError> + Send + Sync>;

///
/// Deferred
///
/// A value produced at most once by a loader. Initialization is guarded so
/// concurrent callers never run the loader twice; a failed load leaves the
/// value uninitialized and may be retried.
///

pub struct Deferred<T> {
    cell: OnceLock<T>,
    loader: Mutex<Option<Loader<T>>>,
}

impl<T> Deferred<T> {
    pub fn new(loader: impl Fn() -> Result<T, LoadError> + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceLock::new(),
            loader: Mutex::new(Some(Box::new(loader))),
        }
    }

    #[must_use]
    pub fn loaded(value: T) -> Self {
        Self {
            cell: OnceLock::from(value),
            loader: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The value, if it has been loaded. Never triggers a load.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Load the value if needed and return it.
    pub fn initialize(&self) -> Result<&T, LoadError> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let mut loader = self.loader.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let Some(load) = loader.as_ref() else {
            return Err(LoadError::msg("deferred value has no loader"));
        };
        let value = load()?;

        // the loader is no longer needed once the cell is set
        *loader = None;

        Ok(self.cell.get_or_init(|| value))
    }

    /// Set the value without loading. Returns false if already set.
    pub(crate) fn fill(&self, value: T) -> bool {
        let mut loader = self.loader.lock().unwrap_or_else(PoisonError::into_inner);
        let filled = self.cell.set(value).is_ok();
        if filled {
            *loader = None;
        }

        filled
    }
}

// Shallow: an initialized value may cycle back to this one.
impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

// Time-boxed memoization for fetched inputs. One value per memo, no per-key
// invalidation: a value is replaced when it expires or when the memo is cleared.
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct TtlMemo<T> {
    ttl: Duration,
    entry: Option<(Instant, Arc<T>)>,
}

impl<T> TtlMemo<T> {
    pub fn new(ttl: Duration) -> Self {
        TtlMemo { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The memoized value, if it is still younger than the TTL.
    pub fn get(&self) -> Option<Arc<T>> {
        self.entry
            .as_ref()
            .filter(|(loaded_at, _)| loaded_at.elapsed() < self.ttl)
            .map(|(_, value)| Arc::clone(value))
    }

    pub fn store(&mut self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.entry = Some((Instant::now(), Arc::clone(&value)));
        value
    }

    /// Returns the fresh value or runs `load`. Failed loads are not memoized.
    pub fn get_or_try_load<E, F>(&mut self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        let value = load()?;
        Ok(self.store(value))
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

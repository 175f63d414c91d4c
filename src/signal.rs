//! Observable values
//!
//! Every store keeps its state in a [`Signal`]: a current value with exactly one
//! writer (the owning store) and any number of subscribers that are woken after
//! each change. Derived state is computed from the current value on read.

use tokio::sync::watch;

/// A single-writer observable value.
#[derive(Debug)]
pub struct Signal<T> {
    sender: watch::Sender<T>,
}

impl<T> Signal<T> {
    /// Create a signal holding `value`.
    pub fn new(value: T) -> Self {
        let (sender, _receiver) = watch::channel(value);

        Self { sender }
    }

    /// Read the current value through a closure.
    ///
    /// The closure must not write to the same signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Clone the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.sender.borrow().clone()
    }

    /// Replace the value and notify subscribers, returning the previous value.
    pub fn set(&self, value: T) -> T {
        self.sender.send_replace(value)
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Mutate a copy of the value, publish it and return what `f` produced.
    ///
    /// Stores call this from their single writer; concurrent writers would
    /// overwrite each other's copies.
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R
    where
        T: Clone,
    {
        let mut value = self.get();
        let result = f(&mut value);

        self.sender.send_replace(value);

        result
    }

    /// Mutate the value in place, notifying subscribers only when `f` returns `true`.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(f)
    }

    /// Subscribe to changes. The receiver starts with the current value marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

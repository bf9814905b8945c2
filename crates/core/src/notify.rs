//! Change notification. Every mutable model entity (game, board, cell) owns
//! a [Subscribers] registry, and fires a synchronous notification through it
//! whenever its observable state changes.

use derive_more::Display;
use std::{cell::RefCell, fmt, rc::Rc};

/// Handle returned by [Subscribers::subscribe], used to unsubscribe later
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display(fmt = "subscription#{}", "self.0")]
pub struct SubscriptionId(u64);

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
}

/// A set of callbacks listening for events of type `E`.
///
/// This is a cheaply cloneable handle; all clones share the same set of
/// subscribers. That means a callback can capture a clone of the registry
/// that's notifying it, and unsubscribe itself (or others) mid-notification.
/// [Self::notify] delivers to the subscriber set as it was when the
/// notification started, so changes made during a notification only apply
/// to the next one.
pub struct Subscribers<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }

    /// Add a callback. It'll be called for every notification after this
    /// point, until unsubscribed.
    pub fn subscribe(
        &self,
        callback: impl FnMut(&E) + 'static,
    ) -> SubscriptionId {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        let callback: Callback<E> = Rc::new(RefCell::new(callback));
        registry.callbacks.push((id, callback));
        id
    }

    /// Remove a callback. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let len_before = registry.callbacks.len();
        registry.callbacks.retain(|(other_id, _)| *other_id != id);
        registry.callbacks.len() != len_before
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronously call every current subscriber with the event
    pub fn notify(&self, event: &E) {
        // Copy out the current set so callbacks are free to modify the
        // registry while we're dispatching
        let callbacks: Vec<Callback<E>> = self
            .registry
            .borrow()
            .callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            // A callback that triggers a notification to itself would need
            // a second mutable borrow. Skip the nested call instead of
            // panicking.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (*callback)(event);
            }
        }
    }
}

impl<E> Clone for Subscribers<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}

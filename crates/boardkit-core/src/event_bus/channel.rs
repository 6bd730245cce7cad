//! Typed event channels.
//!
//! One [`EventChannel`] exists per event name. Listeners are invoked
//! synchronously on the emitting thread over a snapshot of the subscriber
//! list, so a listener may subscribe or unsubscribe while being notified.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

type Listener<T> = Rc<dyn Fn(&T)>;
type ListenerList<T> = RefCell<Vec<(SubscriptionId, Listener<T>)>>;

/// A single-threaded publish/subscribe channel for values of type `T`.
///
/// Cloning the channel yields another handle to the same subscriber list.
pub struct EventChannel<T: ?Sized + 'static> {
    name: &'static str,
    listeners: Rc<ListenerList<T>>,
}

impl<T: ?Sized + 'static> EventChannel<T> {
    /// Create an empty channel; `name` is used in log output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a listener and return the handle that removes it again.
    pub fn on<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = SubscriptionId::new();
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        tracing::debug!("Subscription {} added to '{}'", id, self.name);

        let weak: Weak<ListenerList<T>> = Rc::downgrade(&self.listeners);
        Subscription {
            id,
            detach: Some(Box::new(move |id| match weak.upgrade() {
                Some(list) => remove_listener(&list, id),
                None => false,
            })),
        }
    }

    /// Remove a listener by id.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let removed = remove_listener(&self.listeners, id);
        if removed {
            tracing::debug!("Subscription {} removed from '{}'", id, self.name);
        }
        removed
    }

    /// Notify every listener registered at the time of the call.
    ///
    /// A panicking listener is logged and skipped; the remaining listeners
    /// still run.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(value)));
            if outcome.is_err() {
                tracing::error!("Listener for '{}' panicked", self.name);
            }
        }
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

fn remove_listener<T: ?Sized>(list: &ListenerList<T>, id: SubscriptionId) -> bool {
    let mut listeners = list.borrow_mut();
    let before = listeners.len();
    listeners.retain(|(existing, _)| *existing != id);
    listeners.len() != before
}

impl<T: ?Sized + 'static> Clone for EventChannel<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("name", &self.name)
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

/// Handle returned by [`EventChannel::on`].
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    id: SubscriptionId,
    detach: Option<Box<dyn FnOnce(SubscriptionId) -> bool>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the listener. Returns false if the channel is gone or the
    /// listener was already removed.
    pub fn unsubscribe(mut self) -> bool {
        self.detach_now()
    }

    fn detach_now(&mut self) -> bool {
        match self.detach.take() {
            Some(detach) => detach(self.id),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Collects subscriptions so that they can all be torn down at once.
#[derive(Debug, Default)]
pub struct SubscriptionGroup {
    subscriptions: Vec<Subscription>,
    aborted: bool,
}

impl SubscriptionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a subscription. If the group was already aborted the
    /// subscription is removed immediately.
    pub fn add(&mut self, mut subscription: Subscription) {
        if self.aborted {
            subscription.detach_now();
            return;
        }
        self.subscriptions.push(subscription);
    }

    /// Unsubscribe everything tracked so far and refuse future additions.
    pub fn abort(&mut self) -> usize {
        self.aborted = true;
        let count = self.subscriptions.len();
        for mut subscription in self.subscriptions.drain(..) {
            subscription.detach_now();
        }
        tracing::debug!("Aborted {} subscriptions", count);
        count
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

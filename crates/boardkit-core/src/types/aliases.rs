//! Type aliases for commonly used complex types.
//!
//! The editor runs on a single UI thread, so shared state is
//! `Rc<RefCell<T>>` and callbacks are `Rc<dyn Fn>` rather than their
//! thread-safe counterparts.
//!
//! ## Usage
//!
//! ```rust
//! use boardkit_core::types::{shared, Shared};
//!
//! let counter: Shared<u32> = shared(0);
//! *counter.borrow_mut() += 1;
//! assert_eq!(*counter.borrow(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// A callback with no parameters or return value.
pub type Callback = Rc<dyn Fn()>;

/// A callback that receives a single parameter.
pub type DataCallback<T> = Rc<dyn Fn(T)>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

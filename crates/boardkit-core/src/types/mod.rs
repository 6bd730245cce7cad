//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for `Rc<RefCell<T>>`, callbacks, etc.

pub mod aliases;

pub use aliases::*;

//! # Event Channels
//!
//! Typed publish/subscribe used for decoupled notification between the
//! editor core and its host.
//!
//! ## Overview
//!
//! - One [`EventChannel`] per event name, typed by its payload
//! - `on` returns an explicit [`Subscription`] handle
//! - Emission iterates a snapshot of listeners, so listeners may
//!   subscribe or unsubscribe while being notified
//! - A [`SubscriptionGroup`] tears down many subscriptions in one call
//!
//! ## Usage
//!
//! ```rust
//! use boardkit_core::event_bus::EventChannel;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let zoom_change: EventChannel<f64> = EventChannel::new("zoom:change");
//! let last = Rc::new(Cell::new(0.0));
//! let sub = {
//!     let last = Rc::clone(&last);
//!     zoom_change.on(move |zoom| last.set(*zoom))
//! };
//!
//! zoom_change.emit(&2.0);
//! assert_eq!(last.get(), 2.0);
//! sub.unsubscribe();
//! ```

mod channel;

pub use channel::*;

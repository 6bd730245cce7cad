use boardkit_core::{EventChannel, Subscription, SubscriptionGroup};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn test_clones_share_listeners() {
    let channel: EventChannel<i32> = EventChannel::new("value");
    let copy = channel.clone();
    let seen = Rc::new(Cell::new(0));
    let _sub = {
        let seen = Rc::clone(&seen);
        copy.on(move |v| seen.set(*v))
    };

    channel.emit(&7);
    assert_eq!(seen.get(), 7);
    assert_eq!(channel.listener_count(), 1);
}

#[test]
fn test_listener_may_unsubscribe_during_emit() {
    let channel: EventChannel<()> = EventChannel::new("once");
    let calls = Rc::new(Cell::new(0));
    let slot = Rc::new(RefCell::new(None::<Subscription>));
    let sub = {
        let calls = Rc::clone(&calls);
        let slot = Rc::clone(&slot);
        channel.on(move |_| {
            calls.set(calls.get() + 1);
            if let Some(sub) = slot.borrow_mut().take() {
                sub.unsubscribe();
            }
        })
    };
    *slot.borrow_mut() = Some(sub);

    channel.emit(&());
    channel.emit(&());
    assert_eq!(calls.get(), 1);
    assert_eq!(channel.listener_count(), 0);
}

#[test]
fn test_group_abort_detaches_and_rejects_later_adds() {
    let channel: EventChannel<str> = EventChannel::new("name");
    let mut group = SubscriptionGroup::new();
    group.add(channel.on(|_| {}));
    group.add(channel.on(|_| {}));
    assert_eq!(channel.listener_count(), 2);

    assert_eq!(group.abort(), 2);
    assert_eq!(channel.listener_count(), 0);
    assert!(group.is_aborted());

    group.add(channel.on(|_| {}));
    assert_eq!(channel.listener_count(), 0);
    assert!(group.is_empty());
}

#[test]
fn test_unsubscribe_after_clear_reports_false() {
    let channel: EventChannel<u8> = EventChannel::new("byte");
    let sub = channel.on(|_| {});
    channel.clear();
    assert!(!sub.unsubscribe());
}

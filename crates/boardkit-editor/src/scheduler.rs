//! Cooperative frame scheduler.
//!
//! The host drives time: every call to [`FrameScheduler::run_frame`] runs the
//! tasks that are due at the given timestamp (milliseconds). Next-frame tasks
//! run on the first frame after they were requested, delayed tasks once their
//! deadline has passed, and interval tasks on every period until canceled.
//!
//! Tasks run after the scheduler borrow has been released, so a task may
//! schedule or cancel work through the same shared handle.

use boardkit_core::Shared;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Cancelation handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}

enum TaskFn {
    Once(Box<dyn FnOnce(f64)>),
    Repeat(Rc<dyn Fn(f64)>),
}

struct Scheduled {
    handle: FrameHandle,
    /// `None` runs on the next frame.
    due: Option<f64>,
    period: Option<f64>,
    task: TaskFn,
}

#[derive(Default)]
pub struct FrameScheduler {
    next_id: u64,
    now: f64,
    tasks: Vec<Scheduled>,
    in_flight: HashSet<FrameHandle>,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("now", &self.now)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the most recent frame.
    pub fn now(&self) -> f64 {
        self.now
    }

    fn next_handle(&mut self) -> FrameHandle {
        self.next_id += 1;
        FrameHandle(self.next_id)
    }

    /// Run `task` on the next frame.
    pub fn request_frame(&mut self, task: impl FnOnce(f64) + 'static) -> FrameHandle {
        let handle = self.next_handle();
        self.tasks.push(Scheduled {
            handle,
            due: None,
            period: None,
            task: TaskFn::Once(Box::new(task)),
        });
        handle
    }

    /// Run `task` on the first frame at least `delay_ms` after the last one.
    pub fn request_after(&mut self, delay_ms: f64, task: impl FnOnce(f64) + 'static) -> FrameHandle {
        let handle = self.next_handle();
        self.tasks.push(Scheduled {
            handle,
            due: Some(self.now + delay_ms.max(0.0)),
            period: None,
            task: TaskFn::Once(Box::new(task)),
        });
        handle
    }

    /// Run `task` every `period_ms` until canceled.
    pub fn request_interval(&mut self, period_ms: f64, task: impl Fn(f64) + 'static) -> FrameHandle {
        let period = period_ms.max(1.0);
        let handle = self.next_handle();
        self.tasks.push(Scheduled {
            handle,
            due: Some(self.now + period),
            period: Some(period),
            task: TaskFn::Repeat(Rc::new(task)),
        });
        handle
    }

    /// Returns true if the task was still pending.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        let in_flight = self.in_flight.remove(&handle);
        before != self.tasks.len() || in_flight
    }

    pub fn cancel_all(&mut self) {
        let count = self.tasks.len();
        self.tasks.clear();
        self.in_flight.clear();
        if count > 0 {
            tracing::debug!("Canceled {} scheduled tasks", count);
        }
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    fn take_due(&mut self, now: f64) -> Vec<(FrameHandle, TaskFn)> {
        self.now = now;
        let mut due = Vec::new();
        let mut remaining = Vec::with_capacity(self.tasks.len());

        for mut scheduled in self.tasks.drain(..) {
            let ready = scheduled.due.map_or(true, |at| at <= now);
            if !ready {
                remaining.push(scheduled);
                continue;
            }
            let repeat = match &scheduled.task {
                TaskFn::Repeat(task) => scheduled.period.map(|p| (Rc::clone(task), p)),
                TaskFn::Once(_) => None,
            };
            match repeat {
                Some((task, period)) => {
                    due.push((scheduled.handle, TaskFn::Repeat(task)));
                    scheduled.due = Some(now + period);
                    remaining.push(scheduled);
                }
                None => due.push((scheduled.handle, scheduled.task)),
            }
        }

        self.tasks = remaining;
        self.in_flight = due.iter().map(|(handle, _)| *handle).collect();
        due
    }

    /// Run everything due at `now`. Returns the number of tasks executed.
    pub fn run_frame(scheduler: &Shared<FrameScheduler>, now: f64) -> usize {
        let due = scheduler.borrow_mut().take_due(now);
        let mut ran = 0;

        for (handle, task) in due {
            if !scheduler.borrow_mut().in_flight.remove(&handle) {
                continue;
            }
            match task {
                TaskFn::Once(task) => task(now),
                TaskFn::Repeat(task) => task(now),
            }
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardkit_core::shared;
    use std::cell::Cell;

    #[test]
    fn test_next_frame_task_runs_once() {
        let scheduler = shared(FrameScheduler::new());
        let hits = Rc::new(Cell::new(0));
        {
            let hits = Rc::clone(&hits);
            scheduler
                .borrow_mut()
                .request_frame(move |_| hits.set(hits.get() + 1));
        }
        assert_eq!(FrameScheduler::run_frame(&scheduler, 16.0), 1);
        assert_eq!(FrameScheduler::run_frame(&scheduler, 32.0), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_task_scheduled_from_task_waits_for_next_frame() {
        let scheduler = shared(FrameScheduler::new());
        let hits = Rc::new(Cell::new(0));
        {
            let inner = Rc::clone(&scheduler);
            let hits = Rc::clone(&hits);
            scheduler.borrow_mut().request_frame(move |_| {
                let hits = Rc::clone(&hits);
                inner
                    .borrow_mut()
                    .request_frame(move |_| hits.set(hits.get() + 1));
            });
        }
        FrameScheduler::run_frame(&scheduler, 0.0);
        assert_eq!(hits.get(), 0);
        FrameScheduler::run_frame(&scheduler, 16.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_delayed_and_interval_tasks() {
        let scheduler = shared(FrameScheduler::new());
        let delayed = Rc::new(Cell::new(false));
        let ticks = Rc::new(Cell::new(0));
        {
            let delayed = Rc::clone(&delayed);
            scheduler
                .borrow_mut()
                .request_after(150.0, move |_| delayed.set(true));
            let ticks = Rc::clone(&ticks);
            scheduler
                .borrow_mut()
                .request_interval(100.0, move |_| ticks.set(ticks.get() + 1));
        }

        FrameScheduler::run_frame(&scheduler, 100.0);
        assert!(!delayed.get());
        assert_eq!(ticks.get(), 1);

        FrameScheduler::run_frame(&scheduler, 200.0);
        assert!(delayed.get());
        assert_eq!(ticks.get(), 2);
        assert_eq!(scheduler.borrow().pending_count(), 1);
    }

    #[test]
    fn test_cancel_from_earlier_task_in_same_frame() {
        let scheduler = shared(FrameScheduler::new());
        let hits = Rc::new(Cell::new(0));
        let victim: Rc<Cell<Option<FrameHandle>>> = Rc::new(Cell::new(None));
        {
            let inner = Rc::clone(&scheduler);
            let victim_in = Rc::clone(&victim);
            scheduler.borrow_mut().request_frame(move |_| {
                if let Some(h) = victim_in.get() {
                    inner.borrow_mut().cancel(h);
                }
            });
            let hits = Rc::clone(&hits);
            let h = scheduler
                .borrow_mut()
                .request_frame(move |_| hits.set(hits.get() + 1));
            victim.set(Some(h));
        }
        assert_eq!(FrameScheduler::run_frame(&scheduler, 0.0), 1);
        assert_eq!(hits.get(), 0);
    }
}

//! Deferred callbacks: "run this after N, then every M until cancelled".
//!
//! The core never blocks or schedules on its own. Widgets needing delayed
//! behavior (auto-repeat, tooltip delay) go through a [`TimerService`],
//! whose callbacks re-enter the same synchronous dispatch path as host
//! input.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

use crate::error::{Error, Result};

pub type TimerCallback<D> = Box<dyn FnMut(&mut D)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

pub trait TimerService<D> {
    /// Run `callback` once after `delay`, then every `repeat` until
    /// cancelled. A zero repeat period means one-shot.
    fn schedule(
        &mut self,
        delay: Duration,
        repeat: Option<Duration>,
        callback: TimerCallback<D>,
    ) -> Result<TimerId>;

    /// Returns false when the timer already fired for the last time or was
    /// never scheduled here.
    fn cancel(&mut self, id: TimerId) -> bool;
}

fn period(repeat: Option<Duration>) -> Option<Duration> {
    repeat.filter(|p| !p.is_zero())
}

/// Timers registered as sources of a calloop event loop.
pub struct CalloopTimers<'l, D> {
    handle: LoopHandle<'l, D>,
    next_id: u64,
    tokens: Rc<RefCell<HashMap<TimerId, RegistrationToken>>>,
}

impl<'l, D> CalloopTimers<'l, D> {
    pub fn new(handle: LoopHandle<'l, D>) -> Self {
        Self {
            handle,
            next_id: 0,
            tokens: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Number of timers still registered with the loop.
    pub fn active(&self) -> usize {
        self.tokens.borrow().len()
    }
}

impl<'l, D: 'l> TimerService<D> for CalloopTimers<'l, D> {
    fn schedule(
        &mut self,
        delay: Duration,
        repeat: Option<Duration>,
        mut callback: TimerCallback<D>,
    ) -> Result<TimerId> {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let repeat = period(repeat);
        let tokens = Rc::clone(&self.tokens);

        let token = self
            .handle
            .insert_source(Timer::from_duration(delay), move |_deadline, _, data| {
                callback(data);
                let alive = tokens.borrow().contains_key(&id);
                match repeat {
                    Some(period) if alive => TimeoutAction::ToDuration(period),
                    _ => {
                        tokens.borrow_mut().remove(&id);
                        TimeoutAction::Drop
                    }
                }
            })
            .map_err(|e| Error::Timer(e.error.to_string()))?;

        self.tokens.borrow_mut().insert(id, token);
        log::trace!("timer {:?} scheduled in {:?}, repeat {:?}", id, delay, repeat);
        Ok(id)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let token = self.tokens.borrow_mut().remove(&id);
        match token {
            Some(token) => {
                self.handle.remove(token);
                log::trace!("timer {:?} cancelled", id);
                true
            }
            None => false,
        }
    }
}

impl<D> fmt::Debug for CalloopTimers<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalloopTimers")
            .field("active", &self.active())
            .finish()
    }
}

struct Pending<D> {
    id: TimerId,
    due: Duration,
    repeat: Option<Duration>,
    callback: TimerCallback<D>,
}

/// Virtual clock. Nothing fires until [`ManualTimers::advance`] is called.
pub struct ManualTimers<D> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<D>>,
}

impl<D> ManualTimers<D> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward, firing due timers in deadline order. Returns
    /// the number of callbacks run.
    pub fn advance(&mut self, elapsed: Duration, data: &mut D) -> usize {
        let target = self.now + elapsed;
        let mut fired = 0;
        loop {
            let next = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, p)| p.due <= target)
                .min_by_key(|(_, p)| (p.due, p.id))
                .map(|(index, _)| index);
            let Some(index) = next else {
                break;
            };

            let mut timer = self.pending.remove(index);
            self.now = timer.due;
            (timer.callback)(data);
            fired += 1;
            if let Some(period) = timer.repeat {
                timer.due += period;
                self.pending.push(timer);
            }
        }
        self.now = target;
        fired
    }
}

impl<D> Default for ManualTimers<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> TimerService<D> for ManualTimers<D> {
    fn schedule(
        &mut self,
        delay: Duration,
        repeat: Option<Duration>,
        callback: TimerCallback<D>,
    ) -> Result<TimerId> {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            repeat: period(repeat),
            callback,
        });
        Ok(id)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }
}

impl<D> fmt::Debug for ManualTimers<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTimers")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calloop::EventLoop;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_manual_one_shot_fires_once() {
        let mut timers: ManualTimers<Vec<u32>> = ManualTimers::new();
        let mut log = Vec::new();
        timers
            .schedule(10 * MS, None, Box::new(|log: &mut Vec<u32>| log.push(1)))
            .unwrap();

        assert_eq!(timers.advance(9 * MS, &mut log), 0);
        assert_eq!(timers.advance(MS, &mut log), 1);
        assert_eq!(timers.advance(100 * MS, &mut log), 0);
        assert_eq!(log, vec![1]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_manual_repeat_until_cancelled() {
        let mut timers: ManualTimers<Vec<u32>> = ManualTimers::new();
        let mut log = Vec::new();
        let id = timers
            .schedule(
                5 * MS,
                Some(10 * MS),
                Box::new(|log: &mut Vec<u32>| log.push(7)),
            )
            .unwrap();

        // Fires at 5, 15 and 25.
        assert_eq!(timers.advance(30 * MS, &mut log), 3);
        assert_eq!(timers.now(), 30 * MS);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.advance(100 * MS, &mut log), 0);
        assert_eq!(log, vec![7, 7, 7]);
    }

    #[test]
    fn test_manual_fires_in_deadline_order() {
        let mut timers: ManualTimers<Vec<u32>> = ManualTimers::new();
        let mut log = Vec::new();
        timers
            .schedule(20 * MS, None, Box::new(|log: &mut Vec<u32>| log.push(2)))
            .unwrap();
        timers
            .schedule(10 * MS, None, Box::new(|log: &mut Vec<u32>| log.push(1)))
            .unwrap();
        timers
            .schedule(15 * MS, Some(Duration::ZERO), Box::new(|log: &mut Vec<u32>| log.push(3)))
            .unwrap();

        timers.advance(50 * MS, &mut log);
        assert_eq!(log, vec![1, 3, 2]);
    }

    #[test]
    fn test_calloop_timer_fires_and_drops() {
        let mut event_loop: EventLoop<Vec<u32>> = EventLoop::try_new().unwrap();
        let mut timers = CalloopTimers::new(event_loop.handle());
        let mut log = Vec::new();
        timers
            .schedule(Duration::ZERO, None, Box::new(|log: &mut Vec<u32>| log.push(1)))
            .unwrap();
        assert_eq!(timers.active(), 1);

        for _ in 0..10 {
            if !log.is_empty() {
                break;
            }
            event_loop
                .dispatch(Some(50 * MS), &mut log)
                .unwrap();
        }
        assert_eq!(log, vec![1]);
        assert_eq!(timers.active(), 0);
    }

    #[test]
    fn test_calloop_cancelled_timer_never_fires() {
        let mut event_loop: EventLoop<Vec<u32>> = EventLoop::try_new().unwrap();
        let mut timers = CalloopTimers::new(event_loop.handle());
        let mut log = Vec::new();
        let id = timers
            .schedule(5 * MS, None, Box::new(|log: &mut Vec<u32>| log.push(1)))
            .unwrap();

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        event_loop.dispatch(Some(20 * MS), &mut log).unwrap();
        assert!(log.is_empty());
    }
}

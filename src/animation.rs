use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Source of animation frames (display refresh, timer, or a test clock)
///
/// A scheduler only hands out handles. Whoever drives it passes due handles back to
/// [`AnimationController::on_frame`].
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    Stopped,
    Running,
}

/// What subscribers see on every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationState {
    /// In [0, 1); wraps around instead of stopping
    pub progress: f64,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type TickCallback = Box<dyn FnMut(AnimationState)>;

/// Looping edit-progress animation
///
/// At most one frame is ever outstanding: `start` on a running controller is a no-op, and `stop`
/// and `reset` cancel the outstanding frame before anything else happens. Dropping the controller
/// stops it, so no callback outlives its owner.
pub struct AnimationController<S: FrameScheduler> {
    scheduler: S,
    state: PlaybackState,
    increment: f64,
    ticks: u64,
    pending: Option<FrameHandle>,
    subscribers: Vec<(SubscriptionId, TickCallback)>,
    next_subscription: u64,
}

impl<S: FrameScheduler> AnimationController<S> {
    pub fn new(scheduler: S, increment: f64) -> Self {
        Self {
            scheduler,
            state: PlaybackState::Stopped,
            increment,
            ticks: 0,
            pending: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn progress(&self) -> f64 {
        // derived from the tick count so that N ticks give exactly (N * increment) mod 1
        (self.ticks as f64 * self.increment) % 1.0
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn state(&self) -> AnimationState {
        AnimationState {
            progress: self.progress(),
            is_playing: self.is_playing(),
        }
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn start(&mut self) {
        if self.state == PlaybackState::Running {
            debug!("Animation already running; not scheduling another frame");
            return;
        }
        self.state = PlaybackState::Running;
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Stop ticking; progress keeps its value
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.state = PlaybackState::Stopped;
    }

    /// Stop and rewind to zero. Safe to call in any state.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.state = PlaybackState::Stopped;
        self.ticks = 0;
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(AnimationState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(other, _)| *other != id);
        self.subscribers.len() != before
    }

    /// Deliver a due frame
    ///
    /// Advances progress, notifies every subscriber and schedules the next frame. Returns `false`
    /// and does nothing for handles that are not the outstanding frame (stale or cancelled).
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.state != PlaybackState::Running || self.pending != Some(handle) {
            debug!("Ignoring stale animation frame {:?}", handle);
            return false;
        }
        self.pending = None;
        self.ticks += 1;
        let state = self.state();
        for (_, callback) in self.subscribers.iter_mut() {
            callback(state);
        }
        self.pending = Some(self.scheduler.request_frame());
        true
    }
}

impl<S: FrameScheduler> Drop for AnimationController<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Default)]
struct ManualQueue {
    next_id: u64,
    queued: Vec<FrameHandle>,
    cancelled: usize,
}

/// Frame source driven by hand, one frame per [`AnimationController::advance_frame`]
///
/// Clones share the same queue, so a test can keep a handle to inspect what the controller
/// left behind.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().queued.len()
    }

    pub fn cancelled_frames(&self) -> usize {
        self.queue.borrow().cancelled
    }

    fn take_due(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queue.borrow_mut().queued)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut queue = self.queue.borrow_mut();
        let handle = FrameHandle(queue.next_id);
        queue.next_id += 1;
        queue.queued.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.queued.len();
        queue.queued.retain(|h| *h != handle);
        if queue.queued.len() != before {
            queue.cancelled += 1;
        }
    }
}

impl AnimationController<ManualScheduler> {
    /// Fire every frame that is currently queued. Returns whether the animation ticked.
    pub fn advance_frame(&mut self) -> bool {
        let mut ticked = false;
        for handle in self.scheduler.take_due() {
            ticked |= self.on_frame(handle);
        }
        ticked
    }
}

/// Frame source with a fixed frame interval, polled by the caller's event loop
#[derive(Debug, Clone)]
pub struct TimerScheduler {
    interval: Duration,
    next_id: u64,
    due: Option<(FrameHandle, Instant)>,
}

impl TimerScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
            due: None,
        }
    }

    /// About 60 frames per second
    pub fn display_rate() -> Self {
        Self::new(Duration::from_micros(16_667))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.due.map(|(_, at)| at)
    }

    fn take_due(&mut self, now: Instant) -> Option<FrameHandle> {
        match self.due {
            Some((handle, at)) if at <= now => {
                self.due = None;
                Some(handle)
            }
            _ => None,
        }
    }
}

impl FrameScheduler for TimerScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.due = Some((handle, Instant::now() + self.interval));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if matches!(self.due, Some((h, _)) if h == handle) {
            self.due = None;
        }
    }
}

impl AnimationController<TimerScheduler> {
    /// Tick if the outstanding frame is due at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.scheduler.take_due(now) {
            Some(handle) => self.on_frame(handle),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn controller() -> (AnimationController<ManualScheduler>, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        (AnimationController::new(scheduler.clone(), 0.01), scheduler)
    }

    #[test]
    fn test_progress_loops() {
        let (mut animation, _) = controller();
        animation.start();
        for n in 1..=250u64 {
            assert!(animation.advance_frame());
            let expected = (n as f64 * 0.01) % 1.0;
            assert_approx_eq!(animation.progress(), expected, 1e-9);
            assert!(animation.progress() < 1.0);
        }
        assert_approx_eq!(animation.progress(), 0.5, 1e-9);
    }

    #[test]
    fn test_wraps_to_zero_after_full_loop() {
        let (mut animation, _) = controller();
        animation.start();
        for _ in 0..100 {
            animation.advance_frame();
        }
        assert_eq!(animation.progress(), 0.0);
        assert!(animation.is_playing());
    }

    #[test]
    fn test_stop_keeps_progress() {
        let (mut animation, scheduler) = controller();
        animation.start();
        for _ in 0..30 {
            animation.advance_frame();
        }
        animation.stop();
        assert!(!animation.is_playing());
        assert_eq!(scheduler.pending_frames(), 0);
        assert!(!animation.advance_frame());
        assert_approx_eq!(animation.progress(), 0.3, 1e-9);

        animation.start();
        animation.advance_frame();
        assert_approx_eq!(animation.progress(), 0.31, 1e-9);
    }

    #[test]
    fn test_reset_in_any_state() {
        let (mut animation, scheduler) = controller();
        animation.reset();
        assert_eq!(animation.state(), AnimationState { progress: 0.0, is_playing: false });

        animation.start();
        for _ in 0..42 {
            animation.advance_frame();
        }
        animation.reset();
        assert_eq!(animation.state(), AnimationState { progress: 0.0, is_playing: false });
        assert_eq!(scheduler.pending_frames(), 0);
        assert!(!animation.has_pending_frame());

        animation.reset();
        assert_eq!(animation.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_double_start_schedules_once() {
        let (mut animation, scheduler) = controller();
        animation.start();
        animation.start();
        assert_eq!(scheduler.pending_frames(), 1);
        animation.advance_frame();
        animation.start();
        assert_eq!(scheduler.pending_frames(), 1);
        assert_approx_eq!(animation.progress(), 0.01, 1e-9);
    }

    #[test]
    fn test_stale_frames_are_ignored() {
        let (mut animation, mut scheduler) = controller();
        animation.start();
        let stray = scheduler.request_frame();
        assert!(!animation.on_frame(stray));
        assert_eq!(animation.progress(), 0.0);
    }

    #[test]
    fn test_dropping_a_running_controller_cancels_its_frame() {
        let (mut animation, scheduler) = controller();
        animation.start();
        animation.advance_frame();
        assert_eq!(scheduler.pending_frames(), 1);
        drop(animation);
        assert_eq!(scheduler.pending_frames(), 0);
        assert_eq!(scheduler.cancelled_frames(), 1);
    }

    #[test]
    fn test_subscribers_tick_in_lockstep() {
        let (mut animation, _) = controller();
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));
        let sink = seen_a.clone();
        animation.subscribe(move |state| sink.borrow_mut().push(state.progress));
        let sink = seen_b.clone();
        let id = animation.subscribe(move |state| sink.borrow_mut().push(state.progress));

        animation.start();
        animation.advance_frame();
        animation.advance_frame();
        assert_eq!(*seen_a.borrow(), *seen_b.borrow());
        assert_eq!(seen_a.borrow().len(), 2);

        assert!(animation.unsubscribe(id));
        assert!(!animation.unsubscribe(id));
        animation.advance_frame();
        assert_eq!(seen_a.borrow().len(), 3);
        assert_eq!(seen_b.borrow().len(), 2);
    }

    #[test]
    fn test_timer_scheduler() {
        let mut animation = AnimationController::new(TimerScheduler::new(Duration::from_millis(10)), 0.25);
        assert!(!animation.poll(Instant::now()));
        animation.start();
        let deadline = animation.scheduler().next_deadline().unwrap();
        assert!(animation.poll(deadline + Duration::from_millis(1)));
        assert_approx_eq!(animation.progress(), 0.25, 1e-9);
        // the next frame is only due one interval later
        assert!(animation.scheduler().next_deadline().is_some());
        animation.stop();
        assert!(animation.scheduler().next_deadline().is_none());
        assert!(!animation.poll(Instant::now() + Duration::from_secs(1)));
    }
}

use std::time::{Duration, Instant};

/// A single-shot deadline. Scheduling replaces any earlier deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Instant>,
}

impl TimerSlot {
    pub fn schedule(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and report true if the deadline has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Every timer owned by a session
#[derive(Debug, Clone, Default)]
pub struct PlayerTimers {
    pub controls_hide: TimerSlot,
    pub progress_heartbeat: TimerSlot,
    pub seek_indicator: TimerSlot,
    pub volume_indicator: TimerSlot,
    pub track_notification: TimerSlot,
}

impl PlayerTimers {
    pub fn cancel_all(&mut self) {
        self.controls_hide.cancel();
        self.progress_heartbeat.cancel();
        self.seek_indicator.cancel();
        self.volume_indicator.cancel();
        self.track_notification.cancel();
    }

    /// Earliest pending deadline, used by drivers to sleep until the next tick
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.controls_hide,
            self.progress_heartbeat,
            self.seek_indicator,
            self.volume_indicator,
            self.track_notification,
        ]
        .iter()
        .filter_map(TimerSlot::deadline)
        .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescheduling_replaces_prior_deadline() {
        let start = Instant::now();
        let mut slot = TimerSlot::default();
        slot.schedule(start, Duration::from_secs(3));
        slot.schedule(start + Duration::from_secs(2), Duration::from_secs(3));

        assert!(!slot.fire(start + Duration::from_secs(3)));
        assert!(slot.fire(start + Duration::from_secs(5)));
        assert!(!slot.is_armed());
        assert!(!slot.fire(start + Duration::from_secs(60)));
    }

    #[test]
    fn next_deadline_is_the_earliest() {
        let start = Instant::now();
        let mut timers = PlayerTimers::default();
        assert_eq!(timers.next_deadline(), None);

        timers.progress_heartbeat.schedule(start, Duration::from_secs(10));
        timers.controls_hide.schedule(start, Duration::from_secs(3));
        assert_eq!(
            timers.next_deadline(),
            Some(start + Duration::from_secs(3))
        );

        timers.cancel_all();
        assert_eq!(timers.next_deadline(), None);
    }
}

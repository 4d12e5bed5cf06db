//! One-shot delayed actions
//!
//! Timers live inside the session state, so replacing the session on restart
//! drops every pending timer with it.

/// What happens when a timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    /// Announce the level's target word
    SpeakWord(String),
    /// Start fading out a smashed word block
    FadeBlock(u32),
    /// Tear down and rebuild the session from level 0
    Restart,
}

#[derive(Debug, Clone)]
struct Timer {
    due: f64,
    seq: u64,
    action: TimerAction,
}

/// Pending timers ordered by due time, then scheduling order
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    /// Session clock in seconds; f64 so long sessions keep sub-tick precision
    now: f64,
    next_seq: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `action` once, `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, action: TimerAction) {
        let timer = Timer {
            due: self.now + f64::from(delay.max(0.0)),
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;
        self.timers.push(timer);
    }

    /// Advance the clock and return every action that came due, in order
    pub fn advance(&mut self, dt: f32) -> Vec<TimerAction> {
        self.now += f64::from(dt);
        let now = self.now;

        let mut fired: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.due <= now {
                fired.push(t.clone());
                false
            } else {
                true
            }
        });
        fired.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        fired.into_iter().map(|t| t.action).collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Whether an action is still waiting to fire
    pub fn is_pending(&self, action: &TimerAction) -> bool {
        self.timers.iter().any(|t| t.action == *action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timers = TimerQueue::new();
        timers.schedule(1.0, TimerAction::Restart);

        assert!(timers.advance(0.5).is_empty());
        assert_eq!(timers.advance(0.5), vec![TimerAction::Restart]);
        assert!(timers.advance(1.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(2.0, TimerAction::FadeBlock(1));
        timers.schedule(0.1, TimerAction::SpeakWord("CAT".into()));
        timers.schedule(2.0, TimerAction::FadeBlock(2));

        let fired = timers.advance(3.0);
        assert_eq!(
            fired,
            vec![
                TimerAction::SpeakWord("CAT".into()),
                TimerAction::FadeBlock(1),
                TimerAction::FadeBlock(2),
            ]
        );
    }

    #[test]
    fn test_delay_holds_after_a_long_session() {
        let step = 1.0 / 120.0;
        let mut timers = TimerQueue::new();
        // 20 hours in
        timers.advance(72_000.0);
        timers.schedule(0.1, TimerAction::FadeBlock(9));

        for _ in 0..11 {
            assert!(timers.advance(step).is_empty());
        }
        assert_eq!(timers.advance(step), vec![TimerAction::FadeBlock(9)]);
    }
}

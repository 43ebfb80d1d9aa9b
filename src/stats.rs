use std::collections::VecDeque;

use rand::Rng;

/// Demo counters shown above the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub items: u32,
    pub actions: u32,
    pub total: u32,
}

impl Stats {
    /// Primary action: a random 1..=5 items and one action.
    pub fn record_action<R: Rng>(&mut self, rng: &mut R) -> u32 {
        let added = rng.gen_range(1..=5);
        self.items += added;
        self.actions += 1;
        self.total = self.items + self.actions;
        added
    }

    /// Background tick: three times in ten adds 0..=2 items.
    pub fn auto_tick<R: Rng>(&mut self, rng: &mut R) -> Option<u32> {
        if rng.gen::<f32>() <= 0.7 {
            return None;
        }
        let added = rng.gen_range(0..=2);
        self.items += added;
        self.total = self.items + self.actions;
        Some(added)
    }
}

/// Milliseconds between auto-update ticks.
pub const AUTO_UPDATE_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Action,
    Model,
    View,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivityEntry {
    pub id: uuid::Uuid,
    pub kind: ActivityKind,
    pub message: String,
    /// Page time in milliseconds.
    pub at_ms: f64,
}

/// Newest-first log of what happened, capped at [`ActivityFeed::CAPACITY`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityFeed {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityFeed {
    pub const CAPACITY: usize = 20;

    pub fn push(&mut self, kind: ActivityKind, message: impl Into<String>, at_ms: f64) {
        self.entries.push_front(ActivityEntry {
            id: uuid::Uuid::new_v4(),
            kind,
            message: message.into(),
            at_ms,
        });
        self.entries.truncate(Self::CAPACITY);
    }

    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

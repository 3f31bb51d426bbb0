use std::time::Duration;

use serde::Serialize;

use crate::api::types::EntityId;

/// Lifecycle phase of a swarm member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum Phase {
    /// Live and interactive.
    Floating,
    /// Hit; playing its exit animation until `remaining` runs out.
    Popped {
        #[serde(skip)]
        remaining: Duration,
    },
}

/// A member of a swarm: generated id, phase and the caller's payload.
#[derive(Debug, Clone, Serialize)]
pub struct Member<T> {
    pub id: EntityId,
    #[serde(flatten)]
    pub phase: Phase,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Member<T> {
    pub fn is_floating(&self) -> bool {
        self.phase == Phase::Floating
    }
}

/// Set of short-lived generated entities (balloons, sparkles, ...).
/// Flat Vec storage: counts are in the tens, not thousands.
/// Members are `floating → popped → removed`; nothing comes back.
#[derive(Debug, Clone)]
pub struct Swarm<T> {
    members: Vec<Member<T>>,
    next_id: u32,
}

impl<T> Swarm<T> {
    pub fn new() -> Self {
        Self::starting_at(EntityId(1))
    }

    /// A swarm whose first spawned member gets `first`. Lets a replacement
    /// swarm carry on the id sequence of the one it replaces.
    pub fn starting_at(first: EntityId) -> Self {
        Self {
            members: Vec::with_capacity(96),
            next_id: first.0,
        }
    }

    /// Id the next spawned member will get.
    pub fn next_id(&self) -> EntityId {
        EntityId(self.next_id)
    }

    /// Add a floating member and return its generated id.
    pub fn spawn(&mut self, data: T) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.members.push(Member { id, phase: Phase::Floating, data });
        id
    }

    /// Drop every member (popped ones included) and spawn a fresh batch.
    /// Ids keep increasing across batches, so a stale id never aliases a new member.
    pub fn replace_all(&mut self, batch: impl IntoIterator<Item = T>) {
        self.members.clear();
        for data in batch {
            self.spawn(data);
        }
    }

    /// Pop a floating member. It stays visible for `linger`, then is removed.
    /// Returns None when the id is unknown or already popped.
    pub fn pop(&mut self, id: EntityId, linger: Duration) -> Option<&mut T> {
        let member = self.members.iter_mut().find(|m| m.id == id)?;
        if !member.is_floating() {
            return None;
        }
        member.phase = Phase::Popped { remaining: linger };
        Some(&mut member.data)
    }

    /// Advance pop timers; returns the ids removed during this tick.
    pub fn tick(&mut self, dt: Duration) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.members.retain_mut(|m| match &mut m.phase {
            Phase::Floating => true,
            Phase::Popped { remaining } => {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    removed.push(m.id);
                    false
                } else {
                    true
                }
            }
        });
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Member<T>> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member<T>> {
        self.members.iter()
    }

    /// Members still floating (interactive).
    pub fn floating_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_floating()).count()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> Default for Swarm<T> {
    fn default() -> Self {
        Self::new()
    }
}

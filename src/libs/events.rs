//! In-process change notification bus.
//!
//! Every mutating database operation publishes a [`ChangeEvent`] describing
//! which entity kind changed, how, and (when known) the affected row id.
//! Interested callers subscribe per entity kind and refetch on notification.
//!
//! Delivery is synchronous and fire-and-forget: publishing walks the current
//! subscriber list on the caller's thread, there is no replay for late
//! subscribers and no guaranteed delivery. A [`Subscription`] removes its
//! listener when dropped, so holding the guard for the lifetime of a screen
//! (or test) is the whole teardown protocol.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Entity kinds that can report changes, one per domain table group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Users,
    Tasks,
    Notes,
    Decks,
    Transactions,
    Budgets,
    Messages,
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Created,
    Updated,
    Deleted,
}

/// A single change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub entity: Entity,
    pub op: ChangeOp,
    /// Affected row id; `None` for bulk operations such as tag-set replacement.
    pub id: Option<i64>,
}

impl ChangeEvent {
    pub fn created(entity: Entity, id: i64) -> Self {
        Self {
            entity,
            op: ChangeOp::Created,
            id: Some(id),
        }
    }

    pub fn updated(entity: Entity, id: i64) -> Self {
        Self {
            entity,
            op: ChangeOp::Updated,
            id: Some(id),
        }
    }

    pub fn deleted(entity: Entity, id: i64) -> Self {
        Self {
            entity,
            op: ChangeOp::Deleted,
            id: Some(id),
        }
    }

    pub fn bulk(entity: Entity, op: ChangeOp) -> Self {
        Self { entity, op, id: None }
    }
}

type Callback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Listener {
    id: u64,
    entity: Entity,
    callback: Callback,
}

/// Process-wide publish/subscribe hub for [`ChangeEvent`]s.
pub struct EventBus {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl EventBus {
    fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn subscribe_inner(&'static self, entity: Entity, callback: Callback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push(Listener { id, entity, callback });
        Subscription { bus: self, id }
    }

    fn publish_inner(&self, event: &ChangeEvent) {
        // Clone the matching callbacks out of the lock so a subscriber may
        // itself subscribe or unsubscribe without deadlocking.
        let callbacks: Vec<Callback> = self
            .listeners
            .lock()
            .iter()
            .filter(|l| l.entity == event.entity)
            .map(|l| Arc::clone(&l.callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    fn remove(&self, id: u64) {
        self.listeners.lock().retain(|l| l.id != id);
    }
}

/// Handle to an active subscription; dropping it unsubscribes.
pub struct Subscription {
    bus: &'static EventBus,
    id: u64,
}

impl Subscription {
    /// Explicit teardown, equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.remove(self.id);
    }
}

fn bus() -> &'static EventBus {
    static BUS: OnceLock<EventBus> = OnceLock::new();
    BUS.get_or_init(EventBus::new)
}

/// Registers `callback` for changes to `entity` until the returned guard drops.
pub fn subscribe<F>(entity: Entity, callback: F) -> Subscription
where
    F: Fn(&ChangeEvent) + Send + Sync + 'static,
{
    bus().subscribe_inner(entity, Arc::new(callback))
}

/// Notifies all current subscribers of `event.entity` synchronously.
pub fn publish(event: ChangeEvent) {
    tracing::debug!(?event, "change published");
    bus().publish_inner(&event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn subscriber_fires_once_per_publish() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let sub = subscribe(Entity::Notes, move |event| {
            assert_eq!(event.entity, Entity::Notes);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        publish(ChangeEvent::created(Entity::Notes, 1));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Other entities do not reach this subscriber.
        publish(ChangeEvent::created(Entity::Decks, 2));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sub.unsubscribe();
        publish(ChangeEvent::created(Entity::Notes, 3));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_unsubscribes() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        {
            let _sub = subscribe(Entity::Budgets, move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
            publish(ChangeEvent::bulk(Entity::Budgets, ChangeOp::Updated));
        }
        publish(ChangeEvent::bulk(Entity::Budgets, ChangeOp::Updated));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}

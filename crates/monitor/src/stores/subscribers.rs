#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::error;

pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

pub type Callback<T> = Arc<dyn Fn(&T) -> Result<(), SubscriberError> + Send + Sync>;

/// Identifies one registration. Registering the same callback twice yields
/// two distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct SubscriberList<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Default for SubscriberList<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for SubscriberList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberList")
            .field("next_id", &self.next_id)
            .field(
                "ids",
                &self.entries.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> SubscriberList<T> {
    pub fn add(&mut self, callback: Callback<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, callback));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cheap copy of the current registrations, in registration order.
    pub fn snapshot(&self) -> Vec<(SubscriptionId, Callback<T>)> {
        self.entries.clone()
    }
}

/// Invoke every subscriber with `value`. Failures (an `Err` or a panic) are
/// logged and do not stop delivery to the rest. Returns the failure count.
pub fn notify_all<T>(subscribers: &[(SubscriptionId, Callback<T>)], value: &T) -> usize {
    let mut failures = 0;
    for (id, callback) in subscribers {
        match catch_unwind(AssertUnwindSafe(|| callback(value))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                failures += 1;
                error!(subscriber = %id, %err, "subscriber failed");
            }
            Err(payload) => {
                failures += 1;
                error!(
                    subscriber = %id,
                    panic = panic_message(payload.as_ref()),
                    "subscriber panicked"
                );
            }
        }
    }
    failures
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(hits: &Arc<AtomicUsize>) -> Callback<u32> {
        let hits = hits.clone();
        Arc::new(move |_: &u32| -> Result<(), SubscriberError> {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn same_callback_registered_twice_is_told_apart() {
        let hits = Arc::new(AtomicUsize::new(0));
        let callback = counter(&hits);
        let mut list = SubscriberList::default();
        let first = list.add(callback.clone());
        let second = list.add(callback);
        assert_ne!(first, second);

        assert!(list.remove(first));
        assert!(!list.remove(first));
        assert_eq!(list.len(), 1);

        notify_all(&list.snapshot(), &7);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_subscribers_do_not_block_the_rest() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut list: SubscriberList<u32> = SubscriberList::default();
        list.add(Arc::new(|_: &u32| -> Result<(), SubscriberError> {
            Err("boom".into())
        }));
        list.add(Arc::new(|_: &u32| -> Result<(), SubscriberError> {
            panic!("subscriber bug")
        }));
        list.add(counter(&hits));

        let failures = notify_all(&list.snapshot(), &1);
        assert_eq!(failures, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

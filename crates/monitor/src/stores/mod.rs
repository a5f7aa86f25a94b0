#![forbid(unsafe_code)]

mod bounded;
mod subscribers;

pub use bounded::BoundedQueue;
pub use subscribers::{Callback, SubscriberError, SubscriberList, SubscriptionId, notify_all};

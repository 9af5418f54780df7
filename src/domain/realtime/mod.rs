pub mod hub;

pub use hub::{CounterView, RealtimeEvent, RealtimeHub, Subscription, Topic};

//! Topic preference selection.
//!
//! - [`selector`] - `TopicSelector`, the open/filter/toggle/submit state machine
//! - [`store`] - async `TopicStore` sink for submitted selections

mod selector;
mod store;

pub use selector::{
    Deferred, Phase, Scheduled, SelectorConfig, SubmitTicket, Toggled, TopicError, TopicEvent,
    TopicSelector,
};
pub use store::{SimulatedStore, StoreError, TopicStore};

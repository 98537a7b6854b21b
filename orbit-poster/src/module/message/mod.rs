//! Post text composition

mod templates;
pub use templates::DayFlourish;

mod composer;
pub use composer::{MessageComposer, PostMessage, MAX_MESSAGE_CHARS};

pub mod format;
pub mod slack;

pub use slack::{NotificationSink, SlackNotifier};

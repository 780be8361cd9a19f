pub mod event;
pub mod format;
pub mod handler;
pub mod slack;

pub use event::AlarmNotification;
pub use handler::{notify_alarms, NotifierResponse};

use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatroom.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("chatroom.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatroom.client.request_duration_seconds");

pub(crate) static SESSION_MESSAGES_SENT: Counter = Counter::new("chatroom.session.messages_sent");
pub(crate) static SESSION_REPLIES: Counter = Counter::new("chatroom.session.replies");
pub(crate) static SESSION_SEND_FAILURES: Counter = Counter::new("chatroom.session.send_failures");
pub(crate) static SESSION_UPLOADS: Counter = Counter::new("chatroom.session.uploads");
pub(crate) static SESSION_CLEARS: Counter = Counter::new("chatroom.session.clears");
pub(crate) static SESSION_NOTIFICATIONS: Counter =
    Counter::new("chatroom.session.notifications");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_MESSAGES_SENT);
    collector.register_counter(&SESSION_REPLIES);
    collector.register_counter(&SESSION_SEND_FAILURES);
    collector.register_counter(&SESSION_UPLOADS);
    collector.register_counter(&SESSION_CLEARS);
    collector.register_counter(&SESSION_NOTIFICATIONS);
}

//! Core chat session management.
//!
//! This module provides the [`ChatController`], which owns the session state
//! (messages, loading flag, notification slot, provider selection) and runs
//! every user-initiated operation against the backend.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::chat::config::ChatConfig;
use crate::client::RoomClient;
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_CLEARS, SESSION_MESSAGES_SENT, SESSION_NOTIFICATIONS, SESSION_REPLIES,
    SESSION_SEND_FAILURES, SESSION_UPLOADS,
};
use crate::render::View;
use crate::types::{
    ApiStatus, ChatRequest, Message, Notification, Provider, ProviderOption, Role,
};

/// Question asked before the conversation is cleared.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the conversation?";

/// Banner shown at the top of a fresh session.
pub const WELCOME_MESSAGE: &str =
    "Welcome to AI Room! Ask anything, or upload a file to talk about it.";

const NO_PROVIDERS_MESSAGE: &str = "No AI providers are configured. Add an API key on the server.";

/// How a call to [`ChatController::send_message`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The text was empty after trimming; nothing was sent.
    Ignored,
    /// The assistant's reply was appended.
    Replied,
    /// The server answered 2xx with an `error` field.
    ApplicationError,
    /// The server answered with a non-2xx status.
    HttpError,
    /// No usable response arrived.
    NetworkError,
}

/// How a call to [`ChatController::clear_conversation`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The user declined; nothing happened.
    Declined,
    /// The server reset the conversation and the view was cleared.
    Cleared,
    /// The request failed; the view is unchanged.
    Failed,
}

/// How a call to [`ChatController::handle_file_upload`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No file was selected; nothing happened.
    NoFile,
    /// The file was uploaded and announced.
    Uploaded,
    /// The upload failed.
    Failed,
}

/// The notification currently in the slot, tagged for its dismiss timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    /// Identifies this notification instance.
    pub id: u64,
    /// What is shown.
    pub notification: Notification,
}

#[derive(Debug)]
struct SessionState {
    messages: Vec<Message>,
    loading: bool,
    notification: Option<ActiveNotification>,
    next_notification_id: u64,
    provider: Provider,
    provider_options: Vec<ProviderOption>,
    // Set once the server has told us which providers it serves.
    status_known: bool,
}

impl SessionState {
    fn new(provider: Provider) -> Self {
        let mut provider_options = ProviderOption::defaults();
        if !provider_options.iter().any(|o| o.provider == provider) {
            provider_options.push(ProviderOption::new(provider.clone()));
        }
        Self {
            messages: Vec::new(),
            loading: false,
            notification: None,
            next_notification_id: 0,
            provider,
            provider_options,
            status_known: false,
        }
    }

    fn option(&self, provider: &Provider) -> Option<&ProviderOption> {
        self.provider_options
            .iter()
            .find(|option| &option.provider == provider)
    }
}

/// Drives a chat session: every user action goes through here.
///
/// All operations take `&self`.  State sits behind a mutex that is never held
/// across an await, so several operations may be in flight at once; each send
/// is independent and nothing serializes them.
pub struct ChatController<V: View> {
    client: RoomClient,
    view: Arc<V>,
    state: Arc<Mutex<SessionState>>,
    notification_delay: Duration,
}

impl<V: View> ChatController<V> {
    /// Creates a controller for the given client and view.
    pub fn new(client: RoomClient, view: Arc<V>, config: &ChatConfig) -> Self {
        Self {
            client,
            view,
            state: Arc::new(Mutex::new(SessionState::new(config.provider.clone()))),
            notification_delay: config.notification_delay,
        }
    }

    /// Creates a controller, building the client from the configuration.
    pub fn from_config(config: &ChatConfig, view: Arc<V>) -> Result<Self> {
        let client = RoomClient::with_options(config.base_url.clone(), Some(config.timeout))?;
        Ok(Self::new(client, view, config))
    }

    /// The HTTP client used for every request.
    pub fn client(&self) -> &RoomClient {
        &self.client
    }

    /// Appends the welcome banner.  It is the one message a clear keeps.
    pub fn show_welcome(&self) {
        let mut state = self.lock();
        let banner = Message::system(WELCOME_MESSAGE);
        self.view.append_message(&banner);
        state.messages.push(banner);
    }

    /// Sends `text` to the currently selected provider.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let provider = self.provider();
        self.send_message_with(text, provider).await
    }

    /// Sends `text` to an explicit provider.
    ///
    /// The user message is appended before the request goes out.  Exactly one
    /// of an assistant message or an error notification follows, and the
    /// loading indicator is cleared on every path.
    pub async fn send_message_with(&self, text: &str, provider: Provider) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }
        SESSION_MESSAGES_SENT.click();

        {
            let mut state = self.lock();
            let message = Message::user(text);
            self.view.append_message(&message);
            state.messages.push(message);
            self.set_loading(&mut state, true);
        }

        tracing::info!(provider = provider.id(), "sending chat message");
        let result = self.client.chat(&ChatRequest::new(text, &provider)).await;

        let mut state = self.lock();
        self.set_loading(&mut state, false);
        match result {
            Ok(reply) => {
                SESSION_REPLIES.click();
                let message = Message::assistant(reply.response, reply.provider);
                self.view.append_message(&message);
                state.messages.push(message);
                SendOutcome::Replied
            }
            Err(err) => {
                SESSION_SEND_FAILURES.click();
                tracing::error!(error = %err, "chat request failed");
                self.notify_locked(&mut state, Notification::error(send_failure_message(&err)));
                if err.is_application() {
                    SendOutcome::ApplicationError
                } else if err.is_http_status() {
                    SendOutcome::HttpError
                } else {
                    SendOutcome::NetworkError
                }
            }
        }
    }

    /// Clears the conversation after the user confirms.
    ///
    /// On success every message except the system banner is removed.  On
    /// failure the displayed conversation is left as it was.
    pub async fn clear_conversation(&self) -> ClearOutcome {
        if !self.view.confirm(CLEAR_PROMPT) {
            return ClearOutcome::Declined;
        }

        let result = self.client.clear_conversation().await;
        let mut state = self.lock();
        match result {
            Ok(_) => {
                SESSION_CLEARS.click();
                state.messages.retain(Message::is_system);
                self.view.render_messages(&state.messages);
                self.notify_locked(&mut state, Notification::success("Conversation cleared"));
                ClearOutcome::Cleared
            }
            Err(err) => {
                tracing::error!(error = %err, "clearing conversation failed");
                self.notify_locked(&mut state, Notification::error("Error clearing conversation"));
                ClearOutcome::Failed
            }
        }
    }

    /// Uploads the selected file, if any.
    ///
    /// The file selection is reset afterwards whether or not the upload
    /// succeeded.
    pub async fn handle_file_upload(&self, file: Option<&Path>) -> UploadOutcome {
        let Some(path) = file else {
            return UploadOutcome::NoFile;
        };

        {
            let mut state = self.lock();
            self.set_loading(&mut state, true);
        }

        tracing::info!(path = %path.display(), "uploading file");
        let result = self.client.upload_file(path).await;

        let outcome = {
            let mut state = self.lock();
            self.set_loading(&mut state, false);
            match result {
                Ok(upload) => {
                    SESSION_UPLOADS.click();
                    self.notify_locked(
                        &mut state,
                        Notification::success(format!("File uploaded: {}", upload.filename)),
                    );
                    let message = Message::user(upload.announcement());
                    self.view.append_message(&message);
                    state.messages.push(message);
                    UploadOutcome::Uploaded
                }
                Err(err) => {
                    tracing::error!(error = %err, "upload failed");
                    self.notify_locked(
                        &mut state,
                        Notification::error(upload_failure_message(&err)),
                    );
                    UploadOutcome::Failed
                }
            }
        };
        self.view.reset_file_input();
        outcome
    }

    /// Asks the server which providers are usable and updates the selector.
    ///
    /// Returns false if the check itself failed; the failure is only logged.
    pub async fn check_provider_availability(&self) -> bool {
        let status = match self.client.api_status().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(error = %err, "provider availability check failed");
                return false;
            }
        };
        self.apply_status(&status);
        true
    }

    fn apply_status(&self, status: &ApiStatus) {
        let mut options: Vec<ProviderOption> = Provider::KNOWN
            .iter()
            .map(|p| ProviderOption::with_availability(p.clone(), status.is_available(p.id())))
            .collect();
        for (id, available) in &status.apis {
            let Ok(provider) = id.parse::<Provider>() else {
                continue;
            };
            if !options.iter().any(|o| o.provider == provider) {
                options.push(ProviderOption::with_availability(provider, *available));
            }
        }

        let mut state = self.lock();
        state.provider_options = options;
        state.status_known = true;
        self.view.set_provider_options(&state.provider_options);

        let current_available = state
            .option(&state.provider)
            .map(|o| o.available)
            .unwrap_or(false);
        if current_available {
            return;
        }
        let fallback = state
            .provider_options
            .iter()
            .find(|o| o.available)
            .map(|o| o.provider.clone());
        match fallback {
            Some(provider) => {
                tracing::info!(
                    from = state.provider.id(),
                    to = provider.id(),
                    "selected provider is unavailable; switching"
                );
                self.view.select_provider(&provider);
                state.provider = provider;
            }
            None => {
                tracing::warn!("no provider is available");
                self.notify_locked(
                    &mut state,
                    Notification::error(NO_PROVIDERS_MESSAGE).persistent(),
                );
            }
        }
    }

    /// Switches provider.  Providers known to be unavailable are refused.
    pub fn select_provider(&self, provider: Provider) -> bool {
        let mut state = self.lock();
        let option = state.option(&provider).cloned();
        let label = option
            .as_ref()
            .map(|o| o.provider.label())
            .unwrap_or_else(|| provider.label());
        if option.as_ref().is_some_and(|o| !o.available) {
            self.notify_locked(
                &mut state,
                Notification::error(format!("{label} is not available")),
            );
            return false;
        }
        if option.is_none() && state.status_known {
            self.notify_locked(
                &mut state,
                Notification::error(format!("{label} is not offered by this server")),
            );
            return false;
        }
        if option.is_none() {
            state
                .provider_options
                .push(ProviderOption::new(provider.clone()));
        }
        self.view.select_provider(&provider);
        state.provider = provider;
        self.notify_locked(&mut state, Notification::info(format!("Switched to {label}")));
        true
    }

    /// Copies the raw text of the message at `index` to the clipboard.
    pub fn copy_message(&self, index: usize) -> bool {
        let mut state = self.lock();
        let Some(content) = state.messages.get(index).map(|m| m.content.clone()) else {
            self.notify_locked(&mut state, Notification::error("Nothing to copy"));
            return false;
        };
        match self.view.copy_to_clipboard(&content) {
            Ok(()) => {
                self.notify_locked(&mut state, Notification::success("Copied to clipboard"));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "copy to clipboard failed");
                self.notify_locked(&mut state, Notification::error("Copy failed"));
                false
            }
        }
    }

    /// Index of the most recent assistant message.
    pub fn last_reply_index(&self) -> Option<usize> {
        self.lock()
            .messages
            .iter()
            .rposition(|m| m.role == Role::Assistant)
    }

    /// Checks server health and reports the result as a notification.
    pub async fn report_health(&self) -> bool {
        match self.client.health().await {
            Ok(health) if health.is_healthy() => {
                let text = match &health.version {
                    Some(version) => format!("Server is healthy (version {version})"),
                    None => "Server is healthy".to_string(),
                };
                self.notify(Notification::success(text));
                true
            }
            Ok(health) => {
                self.notify(Notification::error(format!(
                    "Server reports status: {}",
                    health.status
                )));
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "health check failed");
                self.notify(Notification::error("Health check failed"));
                false
            }
        }
    }

    /// Shows a notification, replacing whatever is in the slot.
    pub fn notify(&self, notification: Notification) {
        let mut state = self.lock();
        self.notify_locked(&mut state, notification);
    }

    /// A snapshot of the visible messages.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Whether the loading indicator is showing.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The notification in the slot, if any.
    pub fn notification(&self) -> Option<ActiveNotification> {
        self.lock().notification.clone()
    }

    /// The selected provider.
    pub fn provider(&self) -> Provider {
        self.lock().provider.clone()
    }

    /// The provider selector's options.
    pub fn provider_options(&self) -> Vec<ProviderOption> {
        self.lock().provider_options.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }

    fn set_loading(&self, state: &mut SessionState, loading: bool) {
        state.loading = loading;
        self.view.set_loading(loading);
    }

    fn notify_locked(&self, state: &mut SessionState, notification: Notification) {
        SESSION_NOTIFICATIONS.click();
        state.next_notification_id += 1;
        let id = state.next_notification_id;
        self.view.show_notification(&notification);
        let persistent = notification.persistent;
        state.notification = Some(ActiveNotification { id, notification });
        if !persistent {
            self.schedule_dismiss(id);
        }
    }

    /// Hide notification `id` after the delay, unless it was replaced.
    fn schedule_dismiss(&self, id: u64) {
        let Ok(handle) = Handle::try_current() else {
            tracing::debug!(id, "no runtime; notification will not auto-dismiss");
            return;
        };
        let state = Arc::clone(&self.state);
        let view = Arc::clone(&self.view);
        let delay = self.notification_delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock_state(&state);
            if state.notification.as_ref().is_some_and(|n| n.id == id) {
                state.notification = None;
                view.hide_notification();
            }
        });
    }
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The notification text for a failed send.
///
/// Server faults (5xx) and other HTTP statuses are reported with their code;
/// anything that produced no usable response is a network error.
pub fn send_failure_message(err: &Error) -> String {
    if let Error::Application { message } = err {
        return format!("Error: {message}");
    }
    match err.status_code() {
        Some(code) if err.is_server_error() => {
            format!("Server error (HTTP {code}): {}", err.message())
        }
        Some(code) => format!("Request failed (HTTP {code}): {}", err.message()),
        None => "Network error occurred".to_string(),
    }
}

/// The notification text for a failed upload.
pub fn upload_failure_message(err: &Error) -> String {
    match err {
        Error::Application { message } => format!("Upload error: {message}"),
        _ => "Upload failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Severity, UNAVAILABLE_SUFFIX};

    #[derive(Default)]
    struct NullView {
        hidden: Mutex<usize>,
    }

    impl View for NullView {
        fn append_message(&self, _: &Message) {}
        fn render_messages(&self, _: &[Message]) {}
        fn set_loading(&self, _: bool) {}
        fn show_notification(&self, _: &Notification) {}
        fn hide_notification(&self) {
            *self.hidden.lock().unwrap() += 1;
        }
        fn confirm(&self, _: &str) -> bool {
            true
        }
        fn set_provider_options(&self, _: &[ProviderOption]) {}
        fn select_provider(&self, _: &Provider) {}
        fn copy_to_clipboard(&self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn controller(delay: Duration) -> (ChatController<NullView>, Arc<NullView>) {
        let client = RoomClient::new(Some("http://localhost:5000".to_string())).unwrap();
        let view = Arc::new(NullView::default());
        let config = ChatConfig::new().with_notification_delay(delay);
        (ChatController::new(client, Arc::clone(&view), &config), view)
    }

    #[tokio::test(start_paused = true)]
    async fn notification_auto_dismisses() {
        let (controller, view) = controller(Duration::from_secs(5));
        controller.notify(Notification::info("hello"));
        assert!(controller.notification().is_some());

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(controller.notification().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(controller.notification().is_none());
        assert_eq!(*view.hidden.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_does_not_hide_newer_notification() {
        let (controller, view) = controller(Duration::from_secs(5));
        controller.notify(Notification::info("first"));
        tokio::time::sleep(Duration::from_secs(3)).await;
        controller.notify(Notification::success("second"));

        // The first timer fires here; the second notification must survive it.
        tokio::time::sleep(Duration::from_secs(3)).await;
        let active = controller.notification().unwrap();
        assert_eq!(active.notification.message, "second");
        assert_eq!(*view.hidden.lock().unwrap(), 0);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(controller.notification().is_none());
        assert_eq!(*view.hidden.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_notification_stays() {
        let (controller, _) = controller(Duration::from_secs(5));
        controller.notify(Notification::error("stuck").persistent());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(
            controller.notification().unwrap().notification.severity,
            Severity::Error
        );
    }

    #[test]
    fn notification_without_runtime_is_shown() {
        let (controller, _) = controller(Duration::from_secs(5));
        controller.notify(Notification::info("no runtime"));
        assert_eq!(controller.notification().unwrap().id, 1);
    }

    #[test]
    fn status_disables_and_switches() {
        let (controller, _) = controller(Duration::from_secs(5));
        let status: ApiStatus = serde_json::from_value(serde_json::json!({
            "apis": {"openai": false, "gemini": true}
        }))
        .unwrap();
        controller.apply_status(&status);

        assert_eq!(controller.provider(), Provider::Gemini);
        let options = controller.provider_options();
        assert!(!options[0].available);
        assert!(options[0].label().ends_with(UNAVAILABLE_SUFFIX));
        assert!(options[1].available);
        assert!(controller.notification().is_none());
    }

    #[test]
    fn status_with_no_providers_warns_persistently() {
        let (controller, _) = controller(Duration::from_secs(5));
        let status: ApiStatus = serde_json::from_value(serde_json::json!({
            "apis": {"openai": false, "gemini": false}
        }))
        .unwrap();
        controller.apply_status(&status);

        assert_eq!(controller.provider(), Provider::OpenAi);
        let active = controller.notification().unwrap();
        assert!(active.notification.persistent);
        assert_eq!(active.notification.message, NO_PROVIDERS_MESSAGE);
    }

    #[test]
    fn status_adds_unknown_providers() {
        let (controller, _) = controller(Duration::from_secs(5));
        let status: ApiStatus = serde_json::from_value(serde_json::json!({
            "apis": {"openai": true, "claude": true}
        }))
        .unwrap();
        controller.apply_status(&status);
        let options = controller.provider_options();
        assert_eq!(options.len(), 3);
        assert_eq!(options[2].provider, Provider::Other("claude".to_string()));
    }

    #[test]
    fn selecting_unavailable_provider_is_refused() {
        let (controller, _) = controller(Duration::from_secs(5));
        let status: ApiStatus =
            serde_json::from_value(serde_json::json!({"apis": {"gemini": false}})).unwrap();
        controller.apply_status(&status);

        assert!(!controller.select_provider(Provider::Gemini));
        assert_eq!(controller.provider(), Provider::OpenAi);
        assert_eq!(
            controller.notification().unwrap().notification.message,
            "Google Gemini is not available"
        );

        assert!(controller.select_provider(Provider::OpenAi));
        assert_eq!(
            controller.notification().unwrap().notification.message,
            "Switched to OpenAI GPT"
        );
    }

    #[test]
    fn copy_reports_bad_index() {
        let (controller, _) = controller(Duration::from_secs(5));
        controller.show_welcome();
        assert!(controller.copy_message(0));
        assert!(!controller.copy_message(1));
        assert_eq!(
            controller.notification().unwrap().notification.message,
            "Nothing to copy"
        );
        assert_eq!(controller.last_reply_index(), None);
    }

    #[test]
    fn failure_messages() {
        assert_eq!(
            send_failure_message(&Error::application("OpenAI API error")),
            "Error: OpenAI API error"
        );
        assert_eq!(
            send_failure_message(&Error::internal_server("Internal server error")),
            "Server error (HTTP 500): Internal server error"
        );
        assert_eq!(
            send_failure_message(&Error::service_unavailable(502, "Bad Gateway")),
            "Server error (HTTP 502): Bad Gateway"
        );
        assert_eq!(
            send_failure_message(&Error::bad_request("Invalid AI provider")),
            "Request failed (HTTP 400): Invalid AI provider"
        );
        assert_eq!(
            send_failure_message(&Error::connection("refused", None)),
            "Network error occurred"
        );
        assert_eq!(
            upload_failure_message(&Error::application("File type not allowed")),
            "Upload error: File type not allowed"
        );
        // Statuses without an `{error}` body carry no message worth showing.
        assert_eq!(
            upload_failure_message(&Error::bad_request("<html>Bad Request</html>")),
            "Upload failed"
        );
        assert_eq!(
            upload_failure_message(&Error::internal_server("Internal Server Error")),
            "Upload failed"
        );
    }

    #[test]
    fn unreported_provider_is_refused_after_status() {
        let (controller, _) = controller(Duration::from_secs(5));
        let foo = Provider::Other("foo".to_string());

        // Before the server has answered, any name is taken on trust.
        assert!(controller.select_provider(foo.clone()));
        assert_eq!(controller.provider(), foo);

        let status: ApiStatus = serde_json::from_value(serde_json::json!({
            "apis": {"openai": true, "gemini": true}
        }))
        .unwrap();
        controller.apply_status(&status);
        assert_eq!(controller.provider(), Provider::OpenAi);
        assert_eq!(controller.provider_options().len(), 2);

        assert!(!controller.select_provider(foo));
        assert_eq!(controller.provider(), Provider::OpenAi);
        assert_eq!(controller.provider_options().len(), 2);
        assert_eq!(
            controller.notification().unwrap().notification.message,
            "foo is not offered by this server"
        );
    }
}

//! Notifications
//!
//! At most one toast and one modal are visible at a time. Opening either
//! replaces the current one; nothing is queued.

use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::AbortHandle};
use tracing::debug;

use crate::signal::Signal;

/// How long a toast stays up when it does not ask for a specific duration.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Toast kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Positive confirmation
    Success,

    /// Something failed
    Error,

    /// Needs attention
    Warning,

    /// Neutral information
    Info,
}

/// Link shown inside a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    /// Link label
    pub label: String,

    /// Link target
    pub href: String,
}

/// Identifies one opened toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

/// Toast contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Kind
    pub kind: ToastKind,

    /// Message text
    pub message: String,

    /// Optional action link
    pub action: Option<ToastAction>,

    /// Display duration, `None` for the view's default
    pub duration: Option<Duration>,
}

impl Toast {
    /// A toast of `kind` with `message`.
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            duration: None,
        }
    }

    /// An error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }

    /// A success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    /// Attach an action link.
    #[must_use]
    pub fn with_action(mut self, label: impl Into<String>, href: impl Into<String>) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            href: href.into(),
        });
        self
    }

    /// Set the display duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// The visible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveToast {
    /// Id assigned when opened
    pub id: ToastId,

    /// Contents
    pub toast: Toast,
}

/// Modal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Error report
    Error,

    /// Asks the user to confirm an action
    Confirmation,
}

/// Modal buttons
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalButtons {
    /// Dismiss only
    #[default]
    None,

    /// A single acknowledging button
    Single {
        /// Button label
        label: String,
    },

    /// Confirm and cancel buttons
    Double {
        /// Confirm label
        confirm: String,
        /// Cancel label
        cancel: String,
    },
}

/// Text input requested by a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalInput {
    /// Placeholder text
    pub placeholder: String,

    /// Whether the input is masked
    pub masked: bool,
}

/// Modal contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    /// Kind
    pub kind: ModalKind,

    /// Translation key of the message, e.g. `notifications.clear_list_message`
    pub message_key: String,

    /// Buttons
    pub buttons: ModalButtons,

    /// Optional text input
    pub input: Option<ModalInput>,
}

impl Modal {
    /// A modal of `kind` showing `message_key`.
    pub fn new(kind: ModalKind, message_key: impl Into<String>) -> Self {
        Self {
            kind,
            message_key: message_key.into(),
            buttons: ModalButtons::None,
            input: None,
        }
    }

    /// Set the buttons.
    #[must_use]
    pub fn with_buttons(mut self, buttons: ModalButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Request a text input.
    #[must_use]
    pub fn with_input(mut self, placeholder: impl Into<String>, masked: bool) -> Self {
        self.input = Some(ModalInput {
            placeholder: placeholder.into(),
            masked,
        });
        self
    }
}

/// The outcome of a confirmed modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalConfirmation {
    /// Kind of the confirmed modal
    pub kind: ModalKind,

    /// Captured input, if the modal requested one
    pub input: Option<String>,
}

/// Timer that will close toast `id`.
#[derive(Debug)]
struct PendingDismissal {
    id: ToastId,
    handle: AbortHandle,
}

/// Toast and modal state.
#[derive(Debug, Default)]
pub struct NotificationStore {
    toast: Signal<Option<ActiveToast>>,
    modal: Signal<Option<Modal>>,
    confirmation: Signal<Option<ModalConfirmation>>,
    next_toast_id: AtomicU64,
    dismissal: Mutex<Option<PendingDismissal>>,
}

impl NotificationStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `toast`, replacing any visible toast and cancelling its pending dismissal.
    pub fn open_toast(&self, toast: Toast) -> ToastId {
        let mut dismissal = self.lock_dismissal();

        self.show(&mut dismissal, toast)
    }

    /// Hide the visible toast.
    pub fn close_toast(&self) {
        let mut dismissal = self.lock_dismissal();

        abort(&mut dismissal);
        self.toast.set(None);
    }

    /// Hide the toast only if `id` is still the visible one.
    ///
    /// Returns whether a toast was closed.
    pub fn dismiss_toast(&self, id: ToastId) -> bool {
        let mut dismissal = self.lock_dismissal();

        let closed = self.toast.update_if(|current| {
            if current.as_ref().is_some_and(|active| active.id == id) {
                *current = None;
                true
            } else {
                false
            }
        });

        if closed {
            abort(&mut dismissal);
        }

        closed
    }

    /// Close toast `id` after `after` has elapsed.
    ///
    /// Does nothing if `id` is no longer the visible toast. The timer is
    /// cancelled when another toast is opened or the toast is closed, and it
    /// only ever closes the toast it was scheduled for. Rescheduling the
    /// visible toast replaces its timer.
    /// Must be called within a tokio runtime.
    ///
    /// Returns whether a timer was scheduled.
    pub fn schedule_toast_dismissal(self: &Arc<Self>, id: ToastId, after: Duration) -> bool {
        let mut dismissal = self.lock_dismissal();

        self.arm(&mut dismissal, id, after)
    }

    /// Show `toast` and schedule its dismissal after its own or the default duration.
    pub fn open_timed_toast(self: &Arc<Self>, toast: Toast) -> ToastId {
        let after = toast.duration.unwrap_or(DEFAULT_TOAST_DURATION);
        let mut dismissal = self.lock_dismissal();

        let id = self.show(&mut dismissal, toast);
        self.arm(&mut dismissal, id, after);

        id
    }

    /// The visible toast.
    pub fn toast(&self) -> Option<ActiveToast> {
        self.toast.get()
    }

    /// Subscribe to toast changes.
    pub fn subscribe_toast(&self) -> watch::Receiver<Option<ActiveToast>> {
        self.toast.subscribe()
    }

    /// Show `modal`, replacing any visible modal.
    pub fn open_modal(&self, modal: Modal) {
        debug!(kind = ?modal.kind, message_key = %modal.message_key, "opening modal");

        self.modal.set(Some(modal));
    }

    /// Hide the visible modal.
    pub fn close_modal(&self) {
        self.modal.set(None);
    }

    /// Record a confirmation of `kind` with the captured input, then close the modal.
    ///
    /// Only the latest confirmation is kept.
    pub fn confirm_modal(&self, kind: ModalKind, input: Option<String>) {
        debug!(?kind, has_input = input.is_some(), "modal confirmed");

        self.confirmation.set(Some(ModalConfirmation { kind, input }));
        self.close_modal();
    }

    /// The visible modal.
    pub fn modal(&self) -> Option<Modal> {
        self.modal.get()
    }

    /// Subscribe to modal changes.
    pub fn subscribe_modal(&self) -> watch::Receiver<Option<Modal>> {
        self.modal.subscribe()
    }

    /// The latest confirmation.
    pub fn last_confirmation(&self) -> Option<ModalConfirmation> {
        self.confirmation.get()
    }

    /// Subscribe to confirmations.
    pub fn subscribe_confirmations(&self) -> watch::Receiver<Option<ModalConfirmation>> {
        self.confirmation.subscribe()
    }

    // Toast changes happen under this lock so a timer is never attached to a
    // toast that has already been replaced.
    fn lock_dismissal(&self) -> MutexGuard<'_, Option<PendingDismissal>> {
        self.dismissal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show(&self, dismissal: &mut Option<PendingDismissal>, toast: Toast) -> ToastId {
        let id = ToastId(self.next_toast_id.fetch_add(1, Ordering::Relaxed));

        abort(dismissal);

        debug!(?id, kind = ?toast.kind, message = %toast.message, "opening toast");

        self.toast.set(Some(ActiveToast { id, toast }));

        id
    }

    fn arm(
        self: &Arc<Self>,
        dismissal: &mut Option<PendingDismissal>,
        id: ToastId,
        after: Duration,
    ) -> bool {
        let visible = self
            .toast
            .with(|current| current.as_ref().is_some_and(|active| active.id == id));

        if !visible {
            debug!(?id, "toast no longer visible, not scheduling dismissal");

            return false;
        }

        let store = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;

            if let Some(store) = store.upgrade() {
                store.dismiss_toast(id);
            }
        });

        abort(dismissal);

        *dismissal = Some(PendingDismissal {
            id,
            handle: task.abort_handle(),
        });

        true
    }
}

fn abort(dismissal: &mut Option<PendingDismissal>) {
    if let Some(pending) = dismissal.take() {
        debug!(id = ?pending.id, "cancelling toast dismissal");

        pending.handle.abort();
    }
}

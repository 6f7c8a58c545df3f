//! Toast notifications raised by workflow actions.

use leavedesk_workflow::WorkflowError;
use leptos::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Most recent toasts last. Older ones are dropped past the limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationState {
    pub toasts: Vec<Toast>,
    next_id: u64,
}

const MAX_TOASTS: usize = 5;

impl NotificationState {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            kind,
            message: message.into(),
        });
        if self.toasts.len() > MAX_TOASTS {
            let overflow = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..overflow);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }
}

type NotificationContext = (
    ReadSignal<NotificationState>,
    WriteSignal<NotificationState>,
);

pub fn use_notifications() -> NotificationContext {
    match use_context::<NotificationContext>() {
        Some(ctx) => ctx,
        None => {
            let ctx = create_signal(NotificationState::default());
            provide_context(ctx);
            ctx
        }
    }
}

pub fn notify_success(set_state: WriteSignal<NotificationState>, message: impl Into<String>) {
    let message = message.into();
    set_state.update(|state| {
        state.push(ToastKind::Success, message);
    });
}

pub fn notify_error(set_state: WriteSignal<NotificationState>, error: &WorkflowError) {
    log::warn!("{}", error);
    let message = error.user_message();
    set_state.update(|state| {
        state.push(ToastKind::Error, message);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::create_runtime;

    fn with_runtime<T>(test: impl FnOnce() -> T) -> T {
        let runtime = create_runtime();
        let result = test();
        runtime.dispose();
        result
    }

    #[test]
    fn queue_keeps_the_latest_toasts() {
        let mut state = NotificationState::default();
        for n in 0..7 {
            state.push(ToastKind::Success, format!("toast {}", n));
        }
        assert_eq!(state.toasts.len(), MAX_TOASTS);
        assert_eq!(state.toasts[0].message, "toast 2");

        let last = state.toasts[4].id;
        state.dismiss(last);
        assert!(state.toasts.iter().all(|t| t.id != last));
    }

    #[test]
    fn errors_surface_their_user_message() {
        with_runtime(|| {
            let (state, set_state) = use_notifications();
            notify_error(
                set_state,
                &WorkflowError::validation("end_date", "End date must be on or after the start date"),
            );
            notify_success(set_state, "Leave request submitted successfully");

            let toasts = state.get().toasts;
            assert_eq!(toasts[0].kind, ToastKind::Error);
            assert_eq!(toasts[0].message, "End date must be on or after the start date");
            assert_eq!(toasts[1].kind, ToastKind::Success);
        });
    }

    #[test]
    fn context_is_shared_once_provided() {
        with_runtime(|| {
            let (_, set_state) = use_notifications();
            notify_success(set_state, "saved");
            let (state, _) = use_notifications();
            assert_eq!(state.get().toasts.len(), 1);
        });
    }
}

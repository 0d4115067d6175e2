use forkful::DispatchResult;

use crate::action::NotificationAction;
use crate::effect::Effect;
use crate::state::NotificationState;

/// Local inbox; newest first. Never talks to the server.
pub(super) fn reduce(
    state: &mut NotificationState,
    action: NotificationAction,
) -> DispatchResult<Effect> {
    match action {
        NotificationAction::Receive { notification } => {
            state.items.retain(|n| n.id != notification.id);
            state.items.insert(0, notification);
            DispatchResult::changed()
        }
        NotificationAction::MarkRead { id } => {
            let unread = state.items.iter_mut().find(|n| n.id == id && !n.read);
            match unread {
                Some(notification) => {
                    notification.read = true;
                    DispatchResult::changed()
                }
                None => DispatchResult::unchanged(),
            }
        }
        NotificationAction::MarkAllRead => {
            let mut changed = false;
            for notification in state.items.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                changed = true;
            }
            DispatchResult::from_changed(changed)
        }
        NotificationAction::Clear => {
            let cleared = std::mem::take(&mut state.items);
            DispatchResult::from_changed(!cleared.is_empty())
        }
    }
}

//! Inbox channel types.
//!
//! Every spawned task sends exactly one `UiEvent` here; the runtime drains
//! the receiver once per loop iteration.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

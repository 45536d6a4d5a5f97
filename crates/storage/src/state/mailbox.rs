// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Mailbox and cursor projection handlers (§4.4 "Mailbox & Cursor").

use super::MaterializedState;
use ft_core::event::{Event, StoredEvent};
use ft_core::{Cursor, Message, MessageId, MessageStatus};

/// The composite key a `(stream_type, stream_id, consumer_id)` cursor is
/// stored under. Exposed so [`MaterializedState::cursor_position`] can look
/// one up without duplicating the join format.
pub(crate) fn cursor_key(stream_type: &str, stream_id: &str, consumer_id: &str) -> String {
    format!("{stream_type}:{stream_id}:{consumer_id}")
}

pub(crate) fn apply(state: &mut MaterializedState, stored: &StoredEvent) {
    match &stored.data {
        Event::SquawkSent(e) => {
            let message_id = MessageId::from_string(&e.message_id);
            if state.messages.contains_key(&message_id) {
                return;
            }
            let message = Message {
                id: message_id,
                mailbox_id: e.mailbox_id.clone(),
                sender_id: e.sender_id,
                thread_id: e.thread_id.clone(),
                message_type: e.message_type.clone(),
                content: e.content.clone(),
                priority: e.priority,
                status: MessageStatus::Pending,
                created_at: stored.occurred_at,
                read_at: None,
                read_by: None,
                acked_at: None,
                acked_by: None,
                response: None,
            };
            state.mailboxes.entry(e.mailbox_id.clone()).or_default().push(message_id);
            state.messages.insert(message_id, message);
        }
        Event::SquawkRead(e) => {
            let message_id = MessageId::from_string(&e.message_id);
            if let Some(m) = state.messages.get_mut(&message_id) {
                if m.status == MessageStatus::Pending {
                    m.status = MessageStatus::Read;
                    m.read_at = Some(stored.occurred_at);
                    m.read_by = Some(e.reader_id);
                }
            }
        }
        Event::SquawkAcked(e) => {
            let message_id = MessageId::from_string(&e.message_id);
            if let Some(m) = state.messages.get_mut(&message_id) {
                if m.status != MessageStatus::Acked {
                    m.status = MessageStatus::Acked;
                    m.acked_at = Some(stored.occurred_at);
                    m.acked_by = Some(e.acker_id);
                    m.response = e.response.clone();
                }
            }
        }
        Event::CursorAdvanced(e) => {
            let key = cursor_key(&e.stream_type, &e.stream_id, &e.consumer_id);
            let cursor = state.cursors.entry(key).or_insert_with(|| {
                Cursor::new(e.stream_type.clone(), e.stream_id.clone(), e.consumer_id.clone())
            });
            if !cursor.would_regress(e.position) {
                cursor.position = e.position;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Mailbox & Cursor service (C4, §4.4): per-stream ordered message delivery
//! with consumer cursors. Reads never mutate the log; every write is an
//! appended event.

use crate::error::MailboxError;
use ft_core::event::{CursorAdvanced, Event, SquawkAcked, SquawkRead, SquawkSent};
use ft_core::{Clock, Message, MessageId, Priority, SpecialistId};
use ft_storage::{EventStore, NewEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub struct Mailbox<C: Clock> {
    store: Arc<EventStore<C>>,
}

/// One message to append via [`Mailbox::append`].
pub struct NewMessage {
    pub message_type: String,
    pub content: Value,
    pub sender_id: Option<SpecialistId>,
    pub thread_id: Option<String>,
    pub priority: Priority,
}

impl<C: Clock> Mailbox<C> {
    pub fn new(store: Arc<EventStore<C>>) -> Self {
        Self { store }
    }

    /// Append `messages` to `mailbox_id`, each becoming a `squawk_sent` event
    /// and a projection row. Returns the count actually inserted.
    pub fn append(&self, mailbox_id: &str, messages: Vec<NewMessage>) -> Result<u32, MailboxError> {
        let mut inserted = 0u32;
        for msg in messages {
            let message_id = MessageId::new();
            self.store.append(NewEvent::root(
                "mailbox",
                mailbox_id.to_string(),
                Event::SquawkSent(SquawkSent {
                    message_id: message_id.to_string(),
                    mailbox_id: mailbox_id.to_string(),
                    sender_id: msg.sender_id,
                    thread_id: msg.thread_id,
                    message_type: msg.message_type,
                    content: msg.content,
                    priority: msg.priority,
                }),
            ))?;
            inserted += 1;
        }
        info!(mailbox_id, inserted, "mailbox append");
        Ok(inserted)
    }

    /// Read messages for `mailbox_id` in FIFO order (§4.4 "Ordering
    /// guarantee"). `after_position` skips the first N messages, matching a
    /// consumer cursor's `position` (§4.4 "Cursor operations"). Never
    /// mutates state.
    pub fn read(&self, mailbox_id: &str, after_position: Option<u64>, limit: Option<usize>) -> Vec<Message> {
        self.store.with_state(|s| {
            let ids = s.mailboxes.get(mailbox_id).cloned().unwrap_or_default();
            let skip = after_position.unwrap_or(0) as usize;
            let mut messages: Vec<Message> =
                ids.into_iter().skip(skip).filter_map(|id| s.messages.get(&id).cloned()).collect();
            if let Some(limit) = limit {
                messages.truncate(limit);
            }
            messages
        })
    }

    pub fn mark_read(&self, message_id: &str, reader_id: SpecialistId) -> Result<Message, MailboxError> {
        self.get(message_id)?;
        self.store.append(NewEvent::root(
            "mailbox",
            message_id.to_string(),
            Event::SquawkRead(SquawkRead { message_id: message_id.to_string(), reader_id }),
        ))?;
        self.get(message_id)
    }

    pub fn ack(&self, message_id: &str, acker_id: SpecialistId, response: Option<Value>) -> Result<Message, MailboxError> {
        self.get(message_id)?;
        self.store.append(NewEvent::root(
            "mailbox",
            message_id.to_string(),
            Event::SquawkAcked(SquawkAcked { message_id: message_id.to_string(), acker_id, response }),
        ))?;
        self.get(message_id)
    }

    pub fn get(&self, message_id: &str) -> Result<Message, MailboxError> {
        self.store
            .with_state(|s| s.messages.get(&MessageId::from_string(message_id)).cloned())
            .ok_or_else(|| MailboxError::NotFound(message_id.to_string()))
    }

    /// Advance a consumer's cursor. Rejects any position below the current
    /// one (§4.4 "Cursor operations", §8 invariant 7).
    pub fn advance_cursor(
        &self,
        stream_type: &str,
        stream_id: &str,
        consumer_id: &str,
        position: u64,
    ) -> Result<u64, MailboxError> {
        let current = self.store.with_state(|s| s.cursor_position(stream_type, stream_id, consumer_id));
        if position < current {
            return Err(MailboxError::NonMonotonicCursor { current, requested: position });
        }
        self.store.append(NewEvent::root(
            "cursor",
            format!("{stream_type}:{stream_id}:{consumer_id}"),
            Event::CursorAdvanced(CursorAdvanced {
                stream_type: stream_type.to_string(),
                stream_id: stream_id.to_string(),
                consumer_id: consumer_id.to_string(),
                position,
            }),
        ))?;
        Ok(position)
    }

    pub fn cursor(&self, stream_type: &str, stream_id: &str, consumer_id: &str) -> u64 {
        self.store.with_state(|s| s.cursor_position(stream_type, stream_id, consumer_id))
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;

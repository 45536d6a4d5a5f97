// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Message: an ordered entry in a mailbox stream (§3 "Message",
//! §4.4 "Mailbox & Cursor").

use crate::priority::Priority;
use crate::specialist::SpecialistId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Opaque identifier for a [`Message`].
    pub struct MessageId("msg-");
}

/// Delivery status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Read,
    Acked,
}

crate::simple_display! {
    MessageStatus {
        Pending => "pending",
        Read => "read",
        Acked => "acked",
    }
}

/// A message delivered through a mailbox; ordering within a mailbox is
/// insertion order, which equals the sequence order of the `squawk_sent`
/// events that produced each row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub mailbox_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<SpecialistId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: serde_json::Value,
    #[serde(default)]
    pub priority: Priority,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_by: Option<SpecialistId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acked_by: Option<SpecialistId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl Message {
    pub fn new(
        mailbox_id: impl Into<String>,
        message_type: impl Into<String>,
        content: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            mailbox_id: mailbox_id.into(),
            sender_id: None,
            thread_id: None,
            message_type: message_type.into(),
            content,
            priority: Priority::default(),
            status: MessageStatus::Pending,
            created_at: now,
            read_at: None,
            read_by: None,
            acked_at: None,
            acked_by: None,
            response: None,
        }
    }

    pub fn is_delivered(&self) -> bool {
        !matches!(self.status, MessageStatus::Pending)
    }
}

crate::builder! {
    pub struct MessageBuilder => Message {
        into { mailbox_id: String = "spc-test" }
        into { message_type: String = "notice" }
        set { content: serde_json::Value = serde_json::Value::Null }
        set { status: MessageStatus = MessageStatus::Pending }
        set { priority: Priority = Priority::Normal }
        option { sender_id: SpecialistId = None }
        option { thread_id: String = None }
        computed { id: MessageId = MessageId::new() }
        computed { created_at: DateTime<Utc> = Utc::now() }
        computed { read_at: Option<DateTime<Utc>> = None }
        computed { read_by: Option<SpecialistId> = None }
        computed { acked_at: Option<DateTime<Utc>> = None }
        computed { acked_by: Option<SpecialistId> = None }
        computed { response: Option<serde_json::Value> = None }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

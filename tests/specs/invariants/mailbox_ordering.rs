// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! §4.4 "Ordering guarantee": messages delivered to one mailbox are read
//! back in the order they were appended, and `after_position` skips exactly
//! that many from the front.

use crate::prelude::Fixture;
use ft_api::{Query, Request, Response};
use serde_json::json;

#[test]
fn messages_are_read_back_in_append_order_and_after_position_skips_correctly() {
    let fx = Fixture::new();
    let envelope = fx.core.call(Request::AppendMessages {
        mailbox_id: "spc-consumer".into(),
        messages: vec![
            ft_api::NewMessageItem {
                message_type: "note".into(),
                content: json!({ "seq": 1 }),
                sender_id: None,
                thread_id: None,
                priority: ft_core::Priority::Normal,
            },
            ft_api::NewMessageItem {
                message_type: "note".into(),
                content: json!({ "seq": 2 }),
                sender_id: None,
                thread_id: None,
                priority: ft_core::Priority::Normal,
            },
            ft_api::NewMessageItem {
                message_type: "note".into(),
                content: json!({ "seq": 3 }),
                sender_id: None,
                thread_id: None,
                priority: ft_core::Priority::Normal,
            },
        ],
    });
    assert!(envelope.error.is_none(), "append failed: {:?}", envelope.error);

    let all = match fx.core.query(Query::ReadMailbox { mailbox_id: "spc-consumer".into(), after_position: None, limit: None }).data
    {
        Some(Response::Messages { messages }) => messages,
        other => panic!("expected Messages, got {other:?}"),
    };
    assert_eq!(all.len(), 3);
    let seqs: Vec<i64> = all.iter().map(|m| m.content["seq"].as_i64().unwrap()).collect();
    assert_eq!(seqs, vec![1, 2, 3], "messages read back in append order");

    let after_one = match fx
        .core
        .query(Query::ReadMailbox { mailbox_id: "spc-consumer".into(), after_position: Some(1), limit: None })
        .data
    {
        Some(Response::Messages { messages }) => messages,
        other => panic!("expected Messages, got {other:?}"),
    };
    assert_eq!(after_one.len(), 2);
    assert_eq!(after_one[0].content["seq"], 2);
}

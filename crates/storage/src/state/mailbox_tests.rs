// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;
use ft_core::event::{Event, CursorAdvanced, SquawkAcked, SquawkRead};
use ft_core::test_support::{squawk_sent_event, stored_event};
use ft_core::{MessageId, MessageStatus, SpecialistId};

#[test]
fn sent_inserts_message_and_mailbox_order() {
    let mut state = MaterializedState::default();
    apply(&mut state, &squawk_sent_event("msg-1", "mbx-a", "note"));
    apply(&mut state, &squawk_sent_event("msg-2", "mbx-a", "note"));

    assert_eq!(state.messages.len(), 2);
    assert_eq!(
        state.mailboxes["mbx-a"],
        vec![MessageId::from_string("msg-1"), MessageId::from_string("msg-2")]
    );
}

#[test]
fn sent_is_idempotent() {
    let mut state = MaterializedState::default();
    let event = squawk_sent_event("msg-1", "mbx-a", "note");
    apply(&mut state, &event);
    apply(&mut state, &event);
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.mailboxes["mbx-a"].len(), 1);
}

#[test]
fn read_then_acked_transitions() {
    let mut state = MaterializedState::default();
    let reader = SpecialistId::new();
    apply(&mut state, &squawk_sent_event("msg-1", "mbx-a", "note"));
    apply(
        &mut state,
        &stored_event(
            "mailbox",
            "mbx-a",
            Event::SquawkRead(SquawkRead { message_id: "msg-1".to_string(), reader_id: reader }),
        ),
    );
    let message_id = MessageId::from_string("msg-1");
    assert_eq!(state.messages[&message_id].status, MessageStatus::Read);
    assert_eq!(state.messages[&message_id].read_by, Some(reader));

    apply(
        &mut state,
        &stored_event(
            "mailbox",
            "mbx-a",
            Event::SquawkAcked(SquawkAcked { message_id: "msg-1".to_string(), acker_id: reader, response: None }),
        ),
    );
    assert_eq!(state.messages[&message_id].status, MessageStatus::Acked);
}

#[test]
fn acked_without_read_is_allowed() {
    let mut state = MaterializedState::default();
    let acker = SpecialistId::new();
    apply(&mut state, &squawk_sent_event("msg-1", "mbx-a", "note"));
    apply(
        &mut state,
        &stored_event(
            "mailbox",
            "mbx-a",
            Event::SquawkAcked(SquawkAcked { message_id: "msg-1".to_string(), acker_id: acker, response: None }),
        ),
    );
    assert_eq!(state.messages[&MessageId::from_string("msg-1")].status, MessageStatus::Acked);
}

#[test]
fn cursor_advances_and_rejects_regression() {
    let mut state = MaterializedState::default();
    apply(
        &mut state,
        &stored_event(
            "cursor",
            "c1",
            Event::CursorAdvanced(CursorAdvanced {
                stream_type: "sortie".to_string(),
                stream_id: "srt-1".to_string(),
                consumer_id: "spc-1".to_string(),
                position: 5,
            }),
        ),
    );
    assert_eq!(state.cursor_position("sortie", "srt-1", "spc-1"), 5);

    apply(
        &mut state,
        &stored_event(
            "cursor",
            "c1",
            Event::CursorAdvanced(CursorAdvanced {
                stream_type: "sortie".to_string(),
                stream_id: "srt-1".to_string(),
                consumer_id: "spc-1".to_string(),
                position: 2,
            }),
        ),
    );
    assert_eq!(state.cursor_position("sortie", "srt-1", "spc-1"), 5);

    apply(
        &mut state,
        &stored_event(
            "cursor",
            "c1",
            Event::CursorAdvanced(CursorAdvanced {
                stream_type: "sortie".to_string(),
                stream_id: "srt-1".to_string(),
                consumer_id: "spc-1".to_string(),
                position: 9,
            }),
        ),
    );
    assert_eq!(state.cursor_position("sortie", "srt-1", "spc-1"), 9);
}

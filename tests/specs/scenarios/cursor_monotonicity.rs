// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! S6 (spec.md §8): a cursor may never move backwards; a regressive advance
//! is rejected and the projected cursor position is left untouched.

use crate::prelude::Fixture;
use ft_api::{Query, Request, Response};

#[test]
fn regressive_cursor_advance_is_rejected_and_position_is_unchanged() {
    let fx = Fixture::new();

    let envelope = fx.core.call(Request::AdvanceCursor {
        stream_type: "mailbox".into(),
        stream_id: "spc-consumer".into(),
        consumer_id: "spc-consumer".into(),
        position: 42,
    });
    assert!(envelope.error.is_none(), "initial advance failed: {:?}", envelope.error);

    let envelope = fx.core.call(Request::AdvanceCursor {
        stream_type: "mailbox".into(),
        stream_id: "spc-consumer".into(),
        consumer_id: "spc-consumer".into(),
        position: 40,
    });
    let error = envelope.error.expect("regressive advance must be rejected");
    assert_eq!(error.status, 412, "PRECONDITION_FAILED maps to HTTP 412");

    let cursor = match fx
        .core
        .query(Query::GetCursor {
            stream_type: "mailbox".into(),
            stream_id: "spc-consumer".into(),
            consumer_id: "spc-consumer".into(),
        })
        .data
    {
        Some(Response::Cursor { cursor }) => cursor,
        other => panic!("expected Cursor, got {other:?}"),
    };
    assert_eq!(cursor.position, 42, "projection cursor is unchanged by the rejected advance");
}

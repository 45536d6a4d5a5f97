// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

use super::*;
use ft_core::{LockPurpose, MissionId, Priority, SortieId};

#[test]
fn create_mission_defaults_priority_and_strategy() {
    let json = r#"{"type":"CreateMission","title":"m1"}"#;
    let request: Request = serde_json::from_str(json).unwrap();
    assert_eq!(
        request,
        Request::CreateMission {
            title: "m1".into(),
            description: None,
            priority: Priority::default(),
            strategy: None,
        }
    );
}

#[test]
fn create_sortie_defaults_mission_id_and_dependencies() {
    let json = r#"{"type":"CreateSortie","title":"s1"}"#;
    let request: Request = serde_json::from_str(json).unwrap();
    assert_eq!(
        request,
        Request::CreateSortie {
            mission_id: None,
            title: "s1".into(),
            priority: Priority::default(),
            dependencies: vec![],
            files: vec![],
        }
    );
}

#[test]
fn complete_sortie_carries_full_result_payload() {
    let sortie_id = SortieId::new();
    let specialist_id = ft_core::SpecialistId::new();
    let request = Request::CompleteSortie {
        sortie_id,
        specialist_id,
        result: ft_core::SortieResult {
            summary: "done".into(),
            files: vec!["/a.rs".into()],
            tests_passed: true,
        },
    };
    let json = serde_json::to_string(&request).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(request, back);
}

#[test]
fn acquire_lock_round_trips_with_optional_checksum() {
    let request = Request::AcquireLock {
        file: "/x".into(),
        specialist_id: ft_core::SpecialistId::new(),
        timeout_ms: 30_000,
        purpose: LockPurpose::Edit,
        checksum: Some("abc123".into()),
    };
    let json = serde_json::to_string(&request).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(request, back);
}

#[test]
fn append_messages_defaults_sender_and_thread() {
    let json = r#"{"type":"AppendMessages","mailbox_id":"spc-1","messages":[{"message_type":"note","content":{"n":1}}]}"#;
    let request: Request = serde_json::from_str(json).unwrap();
    match request {
        Request::AppendMessages { mailbox_id, messages } => {
            assert_eq!(mailbox_id, "spc-1");
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].sender_id, None);
            assert_eq!(messages[0].thread_id, None);
            assert_eq!(messages[0].priority, Priority::default());
        }
        other => panic!("expected AppendMessages, got {other:?}"),
    }
}

#[test]
fn recover_checkpoint_defaults_dry_run_to_false() {
    let json = r#"{"type":"RecoverCheckpoint","checkpoint_id":"chk-1"}"#;
    let request: Request = serde_json::from_str(json).unwrap();
    assert_eq!(request, Request::RecoverCheckpoint { checkpoint_id: "chk-1".into(), dry_run: false });
}

#[test]
fn tick_round_trips_mission_id() {
    let mission_id = MissionId::new();
    let request = Request::Tick { mission_id };
    let json = serde_json::to_string(&request).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(request, back);
}

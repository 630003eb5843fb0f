//! End-to-end tests for the NPC tool surface
//!
//! Every call goes through `ToolRegistry::execute`, the same path the
//! agent runtime uses: registered tool, validated input, one
//! read-modify-write cycle against the shared registry block.

use chrono::TimeZone;
use retinue_group::{EntityId, GroupRegistryConfig, MemberPatch, Timestamp};
use retinue_storage::{BlockStore, GroupBlockGateway, MemoryBlockStore};
use retinue_tools::{register_npc_tools, ActionState, ToolError, ToolInput, ToolRegistry};
use std::sync::Arc;
use tokio::sync::RwLock;

struct Harness {
    registry: ToolRegistry,
    state: Arc<RwLock<ActionState>>,
    gateway: Arc<GroupBlockGateway>,
    store: Arc<MemoryBlockStore>,
}

async fn harness() -> Harness {
    let store = Arc::new(MemoryBlockStore::new());
    let gateway = Arc::new(GroupBlockGateway::new(
        Arc::clone(&store) as Arc<dyn BlockStore>
    ));
    let state = Arc::new(RwLock::new(ActionState::default()));
    let registry = ToolRegistry::new();
    register_npc_tools(&registry, Arc::clone(&state), Arc::clone(&gateway))
        .await
        .unwrap();

    Harness {
        registry,
        state,
        gateway,
        store,
    }
}

fn upsert_input(entity_id: &str, name: &str, is_present: bool) -> ToolInput {
    ToolInput::new("group_member_upsert")
        .with_param("entity_id", entity_id)
        .with_param("name", name)
        .with_param("is_present", is_present)
}

fn ts(secs: i64) -> Timestamp {
    chrono::Utc.timestamp_opt(secs, 0).unwrap()
}

#[tokio::test]
async fn test_full_session_flow() {
    let h = harness().await;

    // The backend announces Bob
    let output = h
        .registry
        .execute(
            "group_member_upsert",
            upsert_input("player_1", "Bob", true).with_param("last_location", "market"),
        )
        .await
        .unwrap();
    assert!(output.is_success());

    // A later push fills in appearance without touching the rest
    let output = h
        .registry
        .execute(
            "group_member_upsert",
            ToolInput::new("group_member_upsert")
                .with_param("entity_id", "player_1")
                .with_param("appearance", "red hat"),
        )
        .await
        .unwrap();
    assert!(output.is_success());

    // The agent reacts
    let output = h
        .registry
        .execute(
            "perform_action",
            ToolInput::new("perform_action")
                .with_param("action", "emote")
                .with_param("type", "wave")
                .with_param("target", "Bob"),
        )
        .await
        .unwrap();
    assert!(output.is_success());

    let output = h
        .registry
        .execute(
            "perform_action",
            ToolInput::new("perform_action")
                .with_param("action", "follow")
                .with_param("target", "Bob"),
        )
        .await
        .unwrap();
    assert!(output.is_success());
    assert_eq!(h.state.read().await.following.as_deref(), Some("Bob"));

    // The agent records an observation by display name
    let output = h
        .registry
        .execute(
            "group_memory_append",
            ToolInput::new("group_memory_append")
                .with_param("target", "Bob")
                .with_param("note", "interested in the fountain"),
        )
        .await
        .unwrap();
    assert!(output.is_success());

    // A stale replacement is refused; the exact text goes through
    let output = h
        .registry
        .execute(
            "group_memory_replace",
            ToolInput::new("group_memory_replace")
                .with_param("target", "Bob")
                .with_param("old_note", "interested in the Fountain")
                .with_param("new_note", "bought a lantern"),
        )
        .await
        .unwrap();
    assert!(!output.is_success());

    let output = h
        .registry
        .execute(
            "group_memory_replace",
            ToolInput::new("group_memory_replace")
                .with_param("target", "Bob")
                .with_param("old_note", "interested in the fountain")
                .with_param("new_note", "bought a lantern"),
        )
        .await
        .unwrap();
    assert!(output.is_success());

    // Bob leaves; presence bookkeeping is automatic
    h.registry
        .execute(
            "group_member_upsert",
            ToolInput::new("group_member_upsert")
                .with_param("entity_id", "player_1")
                .with_param("is_present", false),
        )
        .await
        .unwrap();

    let registry = h.gateway.load().await.unwrap().value;
    let record = registry.get_by_str("player_1").unwrap();
    assert!(!record.is_present);
    assert!(record.last_seen.is_some());
    assert_eq!(record.appearance, "red hat");
    assert_eq!(record.notes, "bought a lantern");
    assert_eq!(registry.summary(), "No players currently in range (1 seen earlier)");
    assert!(registry.updates()[0].contains("Bob left"));

    // The agent stops following and walks off
    h.registry
        .execute(
            "perform_action",
            ToolInput::new("perform_action").with_param("action", "unfollow"),
        )
        .await
        .unwrap();
    assert!(h.state.read().await.following.is_none());

    let output = h
        .registry
        .execute(
            "navigate_to",
            ToolInput::new("navigate_to").with_param("destination_slug", "market_district"),
        )
        .await
        .unwrap();
    assert!(output.is_success());
    assert!(h.state.read().await.navigating);
}

#[tokio::test]
async fn test_update_log_stays_bounded_through_tools() {
    let h = harness().await;

    for i in 0..15 {
        h.registry
            .execute(
                "group_member_upsert",
                ToolInput::new("group_member_upsert")
                    .with_param("entity_id", "player_1")
                    .with_param("appearance", format!("outfit {}", i)),
            )
            .await
            .unwrap();
    }

    let registry = h.gateway.load().await.unwrap().value;
    assert_eq!(registry.updates().len(), 10);
}

#[tokio::test]
async fn test_over_budget_upsert_evicts_stalest_absentee() {
    let h = harness().await;

    // Three absent members recorded with distinct departure times, fat
    // enough that they cannot all fit a 512-byte block
    h.gateway
        .update(|registry| {
            let filler = "x".repeat(300);
            for (raw, seen_at) in [("player_a", 300), ("player_b", 100), ("player_c", 200)] {
                registry.upsert(
                    &EntityId::new(raw).unwrap(),
                    MemberPatch::new()
                        .with_name(raw)
                        .with_presence(false)
                        .with_last_seen(ts(seen_at))
                        .with_notes(filler.clone()),
                )?;
            }
            Ok(())
        })
        .await
        .unwrap();

    // The same block seen through a tight budget
    let tight = Arc::new(GroupBlockGateway::with_config(
        Arc::clone(&h.store) as Arc<dyn BlockStore>,
        GroupRegistryConfig::with_max_bytes(512),
    ));
    let registry = ToolRegistry::new();
    let state = Arc::new(RwLock::new(ActionState::default()));
    register_npc_tools(&registry, state, Arc::clone(&tight))
        .await
        .unwrap();

    let output = registry
        .execute("group_member_upsert", upsert_input("guide", "Guide", true))
        .await
        .unwrap();

    assert!(output.is_success());
    // player_b departed first, so it is the one evicted
    assert_eq!(output.result.unwrap()["evicted"], "player_b");

    let after = tight.load().await.unwrap().value;
    assert!(after.get_by_str("player_b").is_none());
    assert!(after.get_by_str("player_a").is_some());
    assert!(after.get_by_str("player_c").is_some());
    assert!(after.get_by_str("guide").is_some());
}

#[tokio::test]
async fn test_provisional_identity_reconciled_through_tools() {
    let h = harness().await;

    // Someone approaches before the backend knows who they are
    h.registry
        .execute("group_member_upsert", upsert_input("unnamed_1", "Alice", true))
        .await
        .unwrap();
    h.registry
        .execute(
            "group_memory_append",
            ToolInput::new("group_memory_append")
                .with_param("target", "Alice")
                .with_param("note", "likes gardens"),
        )
        .await
        .unwrap();

    // The permanent identity arrives
    let output = h
        .registry
        .execute("group_member_upsert", upsert_input("player_42", "Alice", true))
        .await
        .unwrap();
    assert!(output.is_success());
    assert_eq!(output.result.unwrap()["group_size"], 1);

    let registry = h.gateway.load().await.unwrap().value;
    assert!(registry.get_by_str("unnamed_1").is_none());
    assert_eq!(registry.get_by_str("player_42").unwrap().notes, "likes gardens");
}

#[tokio::test]
async fn test_validation_failures_surface_in_band() {
    let h = harness().await;

    let cases = [
        ToolInput::new("perform_action").with_param("action", "teleport"),
        ToolInput::new("perform_action").with_param("action", "emote"),
        ToolInput::new("perform_action")
            .with_param("action", "emote")
            .with_param("type", "backflip"),
        ToolInput::new("perform_action").with_param("action", "follow"),
    ];
    for input in cases {
        let output = h.registry.execute("perform_action", input).await.unwrap();
        assert!(!output.is_success());
        assert!(output.error.is_some());
    }

    let output = h
        .registry
        .execute(
            "navigate_to",
            ToolInput::new("navigate_to").with_param("destination_slug", "Market District"),
        )
        .await
        .unwrap();
    assert!(!output.is_success());
}

#[tokio::test]
async fn test_unknown_tool_and_missing_params_are_call_errors() {
    let h = harness().await;

    let result = h
        .registry
        .execute("group_memory_update", ToolInput::new("group_memory_update"))
        .await;
    assert!(matches!(result, Err(ToolError::UnknownTool { .. })));

    let result = h
        .registry
        .execute("navigate_to", ToolInput::new("navigate_to"))
        .await;
    assert!(matches!(result, Err(ToolError::MissingParameter { .. })));
}

//! Integration tests for the schedule store: atomic version writes, workflow
//! guards, publish-and-supersede, baseline exclusivity, and the uniqueness
//! constraints that back concurrent approval and subscription writes.

mod test_utils;

use axum::http::StatusCode;
use scheduling::models::schedule::ScheduleStatus;
use scheduling::models::schedule_snapshot::SnapshotType;
use scheduling::repositories::{
    ApprovalRepository, ComparisonRepository, DiscussionRepository, ScheduleRepository,
    SnapshotRepository, SubscriptionPreferences, SubscriptionRepository,
};
use scheduling::repositories::discussion::NewDiscussion;
use test_utils::{sample_version, test_db, ts};

#[tokio::test]
async fn create_version_writes_schedule_and_assignments_together() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    let (schedule, assignments) = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    assert_eq!(schedule.version, 1);
    assert_eq!(schedule.status, "draft");
    assert_eq!(schedule.approval_status, "pending");
    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].assignment_id, "OP-100");

    let stored = repository
        .list_assignments(schedule.id)
        .await
        .expect("assignments list");
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn child_version_increments_from_parent() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    let (parent, _) = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("parent creates");
    let (child, _) = repository
        .create_version(sample_version("SCH-0002", Some(parent.id)))
        .await
        .expect("child creates");

    assert_eq!(child.version, 2);
    assert_eq!(child.parent_schedule_id, Some(parent.id));
}

#[tokio::test]
async fn duplicate_schedule_code_conflicts() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("first insert succeeds");
    let error = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect_err("duplicate code must fail");

    assert_eq!(error.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn workflow_guard_rejects_skipping_stages() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    let (schedule, _) = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    // draft cannot jump straight to approved
    let error = repository
        .transition_status(schedule.id, ScheduleStatus::Approved, "planner")
        .await
        .expect_err("skipping in_review must fail");
    assert_eq!(error.status, StatusCode::CONFLICT);

    let in_review = repository
        .transition_status(schedule.id, ScheduleStatus::InReview, "planner")
        .await
        .expect("draft -> in_review is allowed");
    assert_eq!(in_review.status, "in_review");

    let approved = repository
        .transition_status(schedule.id, ScheduleStatus::Approved, "manager")
        .await
        .expect("in_review -> approved is allowed");
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.approved_by.as_deref(), Some("manager"));
}

#[tokio::test]
async fn publish_supersedes_live_siblings_of_the_same_scope() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    let (old, _) = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("old version creates");
    let (new, _) = repository
        .create_version(sample_version("SCH-0002", Some(old.id)))
        .await
        .expect("new version creates");

    // Walk the new version to approved, then publish it.
    repository
        .transition_status(new.id, ScheduleStatus::InReview, "planner")
        .await
        .expect("to in_review");
    repository
        .transition_status(new.id, ScheduleStatus::Approved, "manager")
        .await
        .expect("to approved");
    let published = repository
        .publish(new.id, "manager")
        .await
        .expect("publish succeeds");

    assert_eq!(published.status, "published");
    assert!(published.published_at.is_some());

    let old_after = repository
        .get(old.id)
        .await
        .expect("old version still exists");
    assert_eq!(old_after.status, "superseded");
}

#[tokio::test]
async fn publish_requires_approved_status() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    let (draft, _) = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    let error = repository
        .publish(draft.id, "manager")
        .await
        .expect_err("publishing a draft must fail");
    assert_eq!(error.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn at_most_one_baseline_per_scope() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    let (first, _) = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("first creates");
    let (second, _) = repository
        .create_version(sample_version("SCH-0002", Some(first.id)))
        .await
        .expect("second creates");

    repository.set_baseline(first.id).await.expect("first baseline");
    repository.set_baseline(second.id).await.expect("second baseline");

    let first_after = repository.get(first.id).await.expect("first loads");
    let second_after = repository.get(second.id).await.expect("second loads");
    assert!(!first_after.is_baseline, "baseline flag moved off the old version");
    assert!(second_after.is_baseline);
}

#[tokio::test]
async fn deleting_a_schedule_cascades_to_assignments() {
    let db = test_db().await;
    let repository = ScheduleRepository::new(&db);

    let (schedule, assignments) = repository
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");
    assert_eq!(assignments.len(), 2);

    repository.delete(schedule.id).await.expect("delete succeeds");

    assert!(repository
        .find_by_id(schedule.id)
        .await
        .expect("query runs")
        .is_none());
    let orphans = repository
        .list_assignments(schedule.id)
        .await
        .expect("query runs");
    assert!(orphans.is_empty(), "assignments cascade with the schedule");
}

#[tokio::test]
async fn duplicate_approval_slot_fails_one_writer() {
    let db = test_db().await;
    let schedules = ScheduleRepository::new(&db);
    let approvals = ApprovalRepository::new(&db);

    let (schedule, _) = schedules
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    approvals
        .create_slot(schedule.id, "alice", None, None, 1, None, None)
        .await
        .expect("first slot creates");
    let error = approvals
        .create_slot(schedule.id, "alice", None, None, 1, None, None)
        .await
        .expect_err("duplicate slot must conflict");
    assert_eq!(error.status, StatusCode::CONFLICT);

    // Same approver at a different level is a separate slot.
    approvals
        .create_slot(schedule.id, "alice", None, None, 2, None, None)
        .await
        .expect("different level is allowed");
}

#[tokio::test]
async fn approval_decisions_roll_up_to_the_schedule() {
    let db = test_db().await;
    let schedules = ScheduleRepository::new(&db);
    let approvals = ApprovalRepository::new(&db);

    let (schedule, _) = schedules
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    approvals
        .create_slot(schedule.id, "alice", None, None, 1, Some(1), None)
        .await
        .expect("slot for alice");
    approvals
        .create_slot(schedule.id, "bob", None, None, 2, Some(2), None)
        .await
        .expect("slot for bob");

    approvals
        .record_decision(schedule.id, "alice", 1, "approve", None)
        .await
        .expect("alice approves");
    let after_first = schedules.get(schedule.id).await.expect("schedule loads");
    assert_eq!(after_first.approval_status, "pending", "bob is still pending");

    approvals
        .record_decision(schedule.id, "bob", 2, "approve", Some("ok".to_string()))
        .await
        .expect("bob approves");
    let after_all = schedules.get(schedule.id).await.expect("schedule loads");
    assert_eq!(after_all.approval_status, "approved");

    // A rejection anywhere wins over earlier approvals.
    approvals
        .record_decision(schedule.id, "alice", 1, "reject", None)
        .await
        .expect("alice rejects");
    let after_reject = schedules.get(schedule.id).await.expect("schedule loads");
    assert_eq!(after_reject.approval_status, "rejected");
}

#[tokio::test]
async fn subscriptions_are_unique_per_user_and_update_in_place() {
    let db = test_db().await;
    let schedules = ScheduleRepository::new(&db);
    let subscriptions = SubscriptionRepository::new(&db);

    let (schedule, _) = schedules
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    let first = subscriptions
        .subscribe(schedule.id, "alice", SubscriptionPreferences::default())
        .await
        .expect("subscribe succeeds");
    assert!(first.notify_on_changes);

    let updated = subscriptions
        .subscribe(
            schedule.id,
            "alice",
            SubscriptionPreferences {
                notify_on_changes: false,
                digest_frequency: Some("daily".to_string()),
                ..SubscriptionPreferences::default()
            },
        )
        .await
        .expect("resubscribe updates");
    assert_eq!(updated.id, first.id, "same row, not a duplicate");
    assert!(!updated.notify_on_changes);
    assert_eq!(updated.digest_frequency.as_deref(), Some("daily"));

    let all = subscriptions
        .list_for_schedule(schedule.id)
        .await
        .expect("list runs");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn discussion_replies_join_their_parent_thread() {
    let db = test_db().await;
    let schedules = ScheduleRepository::new(&db);
    let discussions = DiscussionRepository::new(&db);

    let (schedule, _) = schedules
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    let root = discussions
        .post(NewDiscussion {
            schedule_id: schedule.id,
            parent_discussion_id: None,
            user_id: "alice".to_string(),
            user_name: None,
            user_role: None,
            message: "Mill 1 looks overloaded on Tuesday".to_string(),
            context_type: None,
            context_id: None,
            mentions: vec!["bob".to_string()],
            is_announcement: false,
        })
        .await
        .expect("root posts");
    let thread_id = root.thread_id.clone().expect("root opens a thread");

    let reply = discussions
        .post(NewDiscussion {
            schedule_id: schedule.id,
            parent_discussion_id: Some(root.id),
            user_id: "bob".to_string(),
            user_name: None,
            user_role: None,
            message: "Moved OP-200 to Wednesday".to_string(),
            context_type: None,
            context_id: None,
            mentions: Vec::new(),
            is_announcement: false,
        })
        .await
        .expect("reply posts");
    assert_eq!(reply.thread_id.as_deref(), Some(thread_id.as_str()));

    let thread = discussions
        .list_thread(schedule.id, &thread_id)
        .await
        .expect("thread lists");
    assert_eq!(thread.len(), 2);

    let resolved = discussions
        .resolve(root.id, "alice")
        .await
        .expect("resolve succeeds");
    assert!(resolved.is_resolved);
    assert_eq!(resolved.resolved_by.as_deref(), Some("alice"));
}

#[tokio::test]
async fn reply_to_a_foreign_schedule_is_rejected() {
    let db = test_db().await;
    let schedules = ScheduleRepository::new(&db);
    let discussions = DiscussionRepository::new(&db);

    let (first, _) = schedules
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("first creates");
    let (second, _) = schedules
        .create_version(sample_version("SCH-0002", None))
        .await
        .expect("second creates");

    let root = discussions
        .post(NewDiscussion {
            schedule_id: first.id,
            parent_discussion_id: None,
            user_id: "alice".to_string(),
            user_name: None,
            user_role: None,
            message: "root".to_string(),
            context_type: None,
            context_id: None,
            mentions: Vec::new(),
            is_announcement: false,
        })
        .await
        .expect("root posts");

    let error = discussions
        .post(NewDiscussion {
            schedule_id: second.id,
            parent_discussion_id: Some(root.id),
            user_id: "bob".to_string(),
            user_name: None,
            user_role: None,
            message: "cross-schedule reply".to_string(),
            context_type: None,
            context_id: None,
            mentions: Vec::new(),
            is_announcement: false,
        })
        .await
        .expect_err("cross-schedule reply must fail");
    assert_eq!(error.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn snapshots_capture_full_schedule_state() {
    let db = test_db().await;
    let schedules = ScheduleRepository::new(&db);
    let snapshots = SnapshotRepository::new(&db);

    let (schedule, _) = schedules
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("version creates");

    let snapshot = snapshots
        .capture(schedule.id, SnapshotType::Manual, "planner", Some("before rerun".to_string()))
        .await
        .expect("snapshot captures");

    assert_eq!(snapshot.snapshot_type, "manual");
    assert_eq!(snapshot.version, Some(1));
    assert_eq!(snapshot.schedule_data["schedule_code"], "SCH-0001");
    let assignments = snapshot
        .assignments_data
        .as_array()
        .expect("assignments serialize as an array");
    assert_eq!(assignments.len(), 2);

    let listed = snapshots
        .list_for_schedule(schedule.id)
        .await
        .expect("snapshots list");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn comparison_counts_changes_between_versions() {
    let db = test_db().await;
    let schedules = ScheduleRepository::new(&db);
    let comparisons = ComparisonRepository::new(&db);

    let (base, _) = schedules
        .create_version(sample_version("SCH-0001", None))
        .await
        .expect("base creates");

    // The compare version moves OP-200 to another machine and shifts OP-100.
    let mut compare_input = sample_version("SCH-0002", Some(base.id));
    compare_input.utilization_rate = Some(0.9);
    compare_input.assignments[0].planned_start_time = ts("2024-01-01T09:00:00Z");
    compare_input.assignments[0].planned_end_time = ts("2024-01-01T11:00:00Z");
    compare_input.assignments[1].resource_id = Some("M2".to_string());
    let (compare, _) = schedules
        .create_version(compare_input)
        .await
        .expect("compare creates");

    let comparison = comparisons
        .compute(base.id, compare.id, "v1 vs v2".to_string(), "planner")
        .await
        .expect("comparison computes");

    assert_eq!(comparison.resource_changes, Some(1));
    assert_eq!(comparison.timing_changes, Some(1));
    assert_eq!(comparison.total_changes, Some(2));
    let utilization_delta = comparison.utilization_delta.expect("delta present");
    assert!((utilization_delta - 0.1).abs() < 1e-6);

    // Recomputing replaces the stored row instead of stacking duplicates.
    let recomputed = comparisons
        .compute(base.id, compare.id, "v1 vs v2".to_string(), "planner")
        .await
        .expect("recompute succeeds");
    assert_ne!(recomputed.id, comparison.id);
    let stored = comparisons
        .find_for_pair(base.id, compare.id)
        .await
        .expect("lookup runs")
        .expect("one row stored");
    assert_eq!(stored.id, recomputed.id);
}

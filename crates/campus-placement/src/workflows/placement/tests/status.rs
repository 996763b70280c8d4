use super::common::*;

use crate::workflows::placement::status::{
    status_color, ApplicationStatus, ApplicationTracker, StatusBadge, StatusColor,
};

const ALL: [ApplicationStatus; 4] = [
    ApplicationStatus::Applied,
    ApplicationStatus::Shortlisted,
    ApplicationStatus::Selected,
    ApplicationStatus::Rejected,
];

#[test]
fn colors_follow_status() {
    assert_eq!(status_color(Some(ApplicationStatus::Applied)), StatusColor::Blue);
    assert_eq!(
        status_color(Some(ApplicationStatus::Shortlisted)),
        StatusColor::Orange
    );
    assert_eq!(status_color(Some(ApplicationStatus::Selected)), StatusColor::Green);
    assert_eq!(status_color(Some(ApplicationStatus::Rejected)), StatusColor::Red);
    assert_eq!(status_color(None), StatusColor::Accent);
}

#[test]
fn badge_without_status_reads_not_applied() {
    let badge = StatusBadge::for_status(None);

    assert_eq!(badge.label, "Not Applied");
    assert_eq!(badge.color, StatusColor::Accent);
}

#[test]
fn terminal_statuses_accept_no_transitions() {
    for from in [ApplicationStatus::Selected, ApplicationStatus::Rejected] {
        assert!(from.is_terminal());
        for to in ALL {
            assert!(!from.can_transition_to(to), "{from:?} -> {to:?}");
        }
    }
}

#[test]
fn applied_cannot_jump_straight_to_selected() {
    assert!(ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Shortlisted));
    assert!(ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Rejected));
    assert!(!ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Selected));
    assert!(ApplicationStatus::Shortlisted.can_transition_to(ApplicationStatus::Selected));
    assert!(!ApplicationStatus::Shortlisted.can_transition_to(ApplicationStatus::Applied));
}

#[test]
fn tracker_marks_applied_once() {
    let mut tracker = ApplicationTracker::new();
    let candidate = candidate_id();
    let posting = opportunity_id(INTERNSHIP);

    assert_eq!(tracker.status(&candidate, &posting), None);
    assert!(tracker.mark_applied(&candidate, &posting));
    assert_eq!(
        tracker.status(&candidate, &posting),
        Some(ApplicationStatus::Applied)
    );

    tracker.record(&candidate, &posting, ApplicationStatus::Shortlisted);
    assert!(!tracker.mark_applied(&candidate, &posting));
    assert_eq!(
        tracker.badge(&candidate, &posting),
        StatusBadge {
            label: "Shortlisted",
            color: StatusColor::Orange,
        }
    );
}

#[test]
fn tracker_keys_by_candidate_and_opportunity() {
    let mut tracker = ApplicationTracker::new();
    let candidate = candidate_id();

    tracker.record(
        &candidate,
        &opportunity_id(FULL_TIME),
        ApplicationStatus::Selected,
    );

    assert_eq!(
        tracker.badge(&candidate, &opportunity_id(INTERNSHIP)).label,
        "Not Applied"
    );
    assert_eq!(
        tracker.badge(&candidate, &opportunity_id(FULL_TIME)).color,
        StatusColor::Green
    );
}

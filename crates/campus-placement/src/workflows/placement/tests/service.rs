use super::common::*;
use std::sync::Arc;

use crate::workflows::placement::domain::CandidateId;
use crate::workflows::placement::intake::{CandidatePayload, IntakeViolation, OpportunityPayload};
use crate::workflows::placement::repository::{PlacementRepository, RepositoryError};
use crate::workflows::placement::status::{ApplicationStatus, StatusColor};
use crate::workflows::placement::{
    IneligibilityReason, PlacementService, PlacementServiceError,
};

#[test]
fn apply_records_application_and_notifies() {
    let (service, repository, notifications) = seeded_service(candidate_payload());

    let record = service
        .apply(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("application accepted");

    assert_eq!(record.status, ApplicationStatus::Applied);
    assert_eq!(record.applied_at, record.updated_at);
    let stored = repository
        .application(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("repository read")
        .expect("stored application");
    assert_eq!(stored, record);

    let events = notifications.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].template, "application_received");
    assert_eq!(events[0].details.get("status").map(String::as_str), Some("Applied"));
}

#[test]
fn apply_refuses_ineligible_candidates() {
    let (service, repository, notifications) = seeded_service(placed_candidate_payload());
    service
        .publish_opportunity(opportunity_id("initech-analyst"), &full_time_payload("10 LPA"))
        .expect("published");

    let error = service
        .apply(&candidate_id(), &opportunity_id("initech-analyst"))
        .expect_err("ineligible");

    match error {
        PlacementServiceError::Ineligible { reasons, summary, .. } => {
            assert!(matches!(
                reasons.as_slice(),
                [IneligibilityReason::FullTimeNotPermitted { .. }]
            ));
            assert!(summary.starts_with("not eligible"), "{summary}");
        }
        other => panic!("expected ineligible error, got {other:?}"),
    }
    assert!(repository
        .applications_for(&candidate_id())
        .expect("read")
        .is_empty());
    assert!(notifications.events().is_empty());
}

#[test]
fn apply_twice_surfaces_conflict() {
    let (service, _, _) = seeded_service(candidate_payload());
    service
        .apply(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("first application");

    let error = service
        .apply(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect_err("duplicate");

    assert!(matches!(
        error,
        PlacementServiceError::Repository(RepositoryError::Conflict)
    ));
}

#[test]
fn apply_reports_unknown_records() {
    let (service, _, _) = seeded_service(candidate_payload());

    let missing_candidate = service
        .apply(&CandidateId("ghost".to_string()), &opportunity_id(INTERNSHIP))
        .expect_err("unknown candidate");
    let missing_posting = service
        .apply(&candidate_id(), &opportunity_id("closed"))
        .expect_err("unknown opportunity");

    assert!(matches!(
        missing_candidate,
        PlacementServiceError::UnknownCandidate(_)
    ));
    assert!(matches!(
        missing_posting,
        PlacementServiceError::UnknownOpportunity(_)
    ));
}

#[test]
fn status_walks_through_shortlist_to_selection() {
    let (service, _, notifications) = seeded_service(candidate_payload());
    service
        .apply(&candidate_id(), &opportunity_id(FULL_TIME))
        .expect("applied");

    service
        .update_status(
            &candidate_id(),
            &opportunity_id(FULL_TIME),
            ApplicationStatus::Shortlisted,
        )
        .expect("shortlisted");
    let selected = service
        .update_status(
            &candidate_id(),
            &opportunity_id(FULL_TIME),
            ApplicationStatus::Selected,
        )
        .expect("selected");

    assert_eq!(selected.status, ApplicationStatus::Selected);
    assert!(selected.updated_at >= selected.applied_at);

    let view = service
        .status(&candidate_id(), &opportunity_id(FULL_TIME))
        .expect("status");
    assert_eq!(view.label, "Selected");
    assert_eq!(view.color, StatusColor::Green);

    let templates: Vec<String> = notifications
        .events()
        .into_iter()
        .map(|event| event.template)
        .collect();
    assert_eq!(
        templates,
        vec![
            "application_received",
            "application_status_changed",
            "application_status_changed"
        ]
    );
}

#[test]
fn invalid_transitions_are_rejected() {
    let (service, _, _) = seeded_service(candidate_payload());
    service
        .apply(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("applied");

    let error = service
        .update_status(
            &candidate_id(),
            &opportunity_id(INTERNSHIP),
            ApplicationStatus::Selected,
        )
        .expect_err("skip shortlist");

    assert!(matches!(
        error,
        PlacementServiceError::InvalidTransition {
            from: ApplicationStatus::Applied,
            to: ApplicationStatus::Selected,
        }
    ));
}

#[test]
fn update_without_application_is_not_applied() {
    let (service, _, _) = seeded_service(candidate_payload());

    let error = service
        .update_status(
            &candidate_id(),
            &opportunity_id(INTERNSHIP),
            ApplicationStatus::Shortlisted,
        )
        .expect_err("no application");

    assert!(matches!(error, PlacementServiceError::NotApplied { .. }));
}

#[test]
fn status_without_application_is_not_applied_view() {
    let (service, _, _) = seeded_service(candidate_payload());

    let view = service
        .status(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("status");

    assert_eq!(view.status, None);
    assert_eq!(view.label, "Not Applied");
    assert_eq!(view.color, StatusColor::Accent);
    assert!(view.applied_at.is_none());
}

#[test]
fn listings_pair_eligibility_with_badges() {
    let (service, _, _) = seeded_service(placed_candidate_payload());
    service
        .apply(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("applied");

    let listings = service.listings(&candidate_id()).expect("listings");

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].opportunity_id, opportunity_id(INTERNSHIP));
    assert_eq!(listings[0].badge.label, "Applied");
    assert_eq!(listings[0].stipend, "40000 / month");
    assert_eq!(listings[1].opportunity_id, opportunity_id(FULL_TIME));
    assert!(listings[1].eligible, "{}", listings[1].eligibility);
    assert_eq!(listings[1].badge.label, "Not Applied");
    assert_eq!(listings[1].ctc, "60 LPA");
}

#[test]
fn register_candidate_rejects_invalid_payload() {
    let (service, repository, _) = build_service();
    let payload = CandidatePayload {
        cgpa: None,
        ..candidate_payload()
    };

    let error = service
        .register_candidate(candidate_id(), &payload)
        .expect_err("invalid");

    assert!(matches!(
        error,
        PlacementServiceError::Intake(IntakeViolation::MissingField("cgpa"))
    ));
    assert!(repository.candidate(&candidate_id()).expect("read").is_none());
}

#[test]
fn publish_replaces_previous_version() {
    let (service, repository, _) = seeded_service(candidate_payload());
    let revised = OpportunityPayload {
        cgpa_criteria: serde_json::from_value(serde_json::json!(9)).expect("cgpa"),
        ..internship_payload()
    };

    service
        .publish_opportunity(opportunity_id(INTERNSHIP), &revised)
        .expect("republished");

    let stored = repository
        .opportunity(&opportunity_id(INTERNSHIP))
        .expect("read")
        .expect("stored");
    assert_eq!(stored.cgpa_criteria, 9.0);
    assert!(!service
        .eligibility(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("evaluated")
        .is_eligible());
}

#[test]
fn load_opportunities_counts_records() {
    let (service, repository, _) = build_service();
    let records = vec![
        opportunity(INTERNSHIP, &internship_payload()),
        opportunity(FULL_TIME, &full_time_payload("20 LPA")),
    ];

    let loaded = service.load_opportunities(records).expect("loaded");

    assert_eq!(loaded, 2);
    assert_eq!(repository.opportunities().expect("read").len(), 2);
}

#[test]
fn notification_failures_keep_the_stored_application() {
    let repository = Arc::new(MemoryRepository::default());
    let service = PlacementService::new(repository.clone(), Arc::new(OfflineNotifications));
    service
        .register_candidate(candidate_id(), &candidate_payload())
        .expect("registered");
    service
        .publish_opportunity(opportunity_id(INTERNSHIP), &internship_payload())
        .expect("published");

    let record = service
        .apply(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("application kept despite offline gateway");
    assert_eq!(record.status, ApplicationStatus::Applied);

    let stored = repository
        .application(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("repository read")
        .expect("stored application");
    assert_eq!(stored, record);

    let shortlisted = service
        .update_status(
            &candidate_id(),
            &opportunity_id(INTERNSHIP),
            ApplicationStatus::Shortlisted,
        )
        .expect("status change kept despite offline gateway");
    let view = service
        .status(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect("status");
    assert_eq!(view.status, Some(shortlisted.status));
    assert_eq!(view.label, "Shortlisted");
}

#[test]
fn repository_outage_propagates() {
    let service = PlacementService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifications::default()),
    );

    let error = service
        .eligibility(&candidate_id(), &opportunity_id(INTERNSHIP))
        .expect_err("outage");

    assert!(matches!(
        error,
        PlacementServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

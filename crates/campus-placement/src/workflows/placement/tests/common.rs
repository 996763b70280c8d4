use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::placement::domain::{
    CandidateId, CandidateProfile, OpportunityId, OpportunityRecord,
};
use crate::workflows::placement::intake::{
    candidate_from_payload, opportunity_from_payload, CandidatePayload, NumericValue,
    OpportunityPayload,
};
use crate::workflows::placement::repository::{
    ApplicationRecord, NotificationError, NotificationPublisher, PlacementNotification,
    PlacementRepository, RepositoryError,
};
use crate::workflows::placement::{placement_router, PlacementService};

pub(super) const CANDIDATE: &str = "stu-1";
pub(super) const INTERNSHIP: &str = "acme-intern";
pub(super) const FULL_TIME: &str = "globex-sde";

pub(super) fn candidate_payload() -> CandidatePayload {
    serde_json::from_value(json!({
        "branch": "CSE",
        "batch": 2026,
        "cgpa": 8.5,
        "internshipEligible": true,
        "fullTimeEligible": true,
        "slab": 2
    }))
    .expect("candidate payload")
}

pub(super) fn placed_candidate_payload() -> CandidatePayload {
    CandidatePayload {
        full_time_eligible: Some(false),
        slab: Some(NumericValue::Number(3.0)),
        ..candidate_payload()
    }
}

pub(super) fn internship_payload() -> OpportunityPayload {
    serde_json::from_value(json!({
        "companyName": "Acme",
        "role": "Summer Intern",
        "eligibleBranches": ["CSE"],
        "eligibleBatch": [2026],
        "cgpaCriteria": 7,
        "opportunityType": "Internship",
        "ctc": "-",
        "stipend": "40000 / month"
    }))
    .expect("internship payload")
}

pub(super) fn full_time_payload(ctc: &str) -> OpportunityPayload {
    OpportunityPayload {
        company_name: Some("Globex".to_string()),
        role: Some("Software Engineer".to_string()),
        opportunity_type: Some("Full Time".to_string()),
        ctc: serde_json::from_value(json!(ctc)).expect("ctc"),
        stipend: None,
        ..internship_payload()
    }
}

pub(super) fn candidate(payload: &CandidatePayload) -> CandidateProfile {
    candidate_from_payload(CandidateId(CANDIDATE.to_string()), payload).expect("valid candidate")
}

pub(super) fn opportunity(id: &str, payload: &OpportunityPayload) -> OpportunityRecord {
    opportunity_from_payload(OpportunityId(id.to_string()), payload).expect("valid opportunity")
}

pub(super) fn candidate_id() -> CandidateId {
    CandidateId(CANDIDATE.to_string())
}

pub(super) fn opportunity_id(id: &str) -> OpportunityId {
    OpportunityId(id.to_string())
}

pub(super) fn build_service() -> (
    PlacementService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = PlacementService::new(repository.clone(), notifications.clone());
    (service, repository, notifications)
}

/// Service holding the default candidate plus one internship and one 60 LPA full-time posting.
pub(super) fn seeded_service(
    candidate: CandidatePayload,
) -> (
    PlacementService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let (service, repository, notifications) = build_service();
    service
        .register_candidate(candidate_id(), &candidate)
        .expect("candidate registered");
    service
        .publish_opportunity(opportunity_id(INTERNSHIP), &internship_payload())
        .expect("internship published");
    service
        .publish_opportunity(opportunity_id(FULL_TIME), &full_time_payload("60 LPA"))
        .expect("full-time published");
    (service, repository, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    candidates: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
    opportunities: Arc<Mutex<HashMap<OpportunityId, OpportunityRecord>>>,
    pub(super) applications: Arc<Mutex<HashMap<(CandidateId, OpportunityId), ApplicationRecord>>>,
}

impl PlacementRepository for MemoryRepository {
    fn upsert_candidate(&self, profile: CandidateProfile) -> Result<(), RepositoryError> {
        let mut guard = self.candidates.lock().expect("repository mutex poisoned");
        guard.insert(profile.candidate_id.clone(), profile);
        Ok(())
    }

    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        let guard = self.candidates.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert_opportunity(&self, record: OpportunityRecord) -> Result<(), RepositoryError> {
        let mut guard = self.opportunities.lock().expect("repository mutex poisoned");
        guard.insert(record.opportunity_id.clone(), record);
        Ok(())
    }

    fn opportunity(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<OpportunityRecord>, RepositoryError> {
        let guard = self.opportunities.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn opportunities(&self) -> Result<Vec<OpportunityRecord>, RepositoryError> {
        let guard = self.opportunities.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_application(
        &self,
        record: ApplicationRecord,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        let key = (record.candidate_id.clone(), record.opportunity_id.clone());
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record.clone());
        Ok(record)
    }

    fn update_application(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        let key = (record.candidate_id.clone(), record.opportunity_id.clone());
        if !guard.contains_key(&key) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(key, record);
        Ok(())
    }

    fn application(
        &self,
        candidate_id: &CandidateId,
        opportunity_id: &OpportunityId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard
            .get(&(candidate_id.clone(), opportunity_id.clone()))
            .cloned())
    }

    fn applications_for(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.candidate_id == candidate_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<PlacementNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<PlacementNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: PlacementNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifications;

impl NotificationPublisher for OfflineNotifications {
    fn publish(&self, _notification: PlacementNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("gateway offline".to_string()))
    }
}

/// Serves reads from memory but refuses every new application as a duplicate.
#[derive(Default, Clone)]
pub(super) struct ConflictRepository {
    inner: MemoryRepository,
}

impl PlacementRepository for ConflictRepository {
    fn upsert_candidate(&self, profile: CandidateProfile) -> Result<(), RepositoryError> {
        self.inner.upsert_candidate(profile)
    }

    fn candidate(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        self.inner.candidate(id)
    }

    fn upsert_opportunity(&self, record: OpportunityRecord) -> Result<(), RepositoryError> {
        self.inner.upsert_opportunity(record)
    }

    fn opportunity(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<OpportunityRecord>, RepositoryError> {
        self.inner.opportunity(id)
    }

    fn opportunities(&self) -> Result<Vec<OpportunityRecord>, RepositoryError> {
        self.inner.opportunities()
    }

    fn insert_application(
        &self,
        _record: ApplicationRecord,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_application(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn application(
        &self,
        _candidate_id: &CandidateId,
        _opportunity_id: &OpportunityId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(None)
    }

    fn applications_for(
        &self,
        _candidate_id: &CandidateId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl PlacementRepository for UnavailableRepository {
    fn upsert_candidate(&self, _profile: CandidateProfile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn candidate(&self, _id: &CandidateId) -> Result<Option<CandidateProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_opportunity(&self, _record: OpportunityRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn opportunity(
        &self,
        _id: &OpportunityId,
    ) -> Result<Option<OpportunityRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn opportunities(&self) -> Result<Vec<OpportunityRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_application(
        &self,
        _record: ApplicationRecord,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_application(&self, _record: ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn application(
        &self,
        _candidate_id: &CandidateId,
        _opportunity_id: &OpportunityId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications_for(
        &self,
        _candidate_id: &CandidateId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn placement_router_with_service(
    service: PlacementService<MemoryRepository, MemoryNotifications>,
) -> axum::Router {
    placement_router(Arc::new(service))
}

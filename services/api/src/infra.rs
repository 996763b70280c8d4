use campus_placement::workflows::placement::{
    ApplicationRecord, CandidateId, CandidatePayload, CandidateProfile, NotificationError,
    NotificationPublisher, OpportunityId, OpportunityPayload, OpportunityRecord,
    PlacementNotification, PlacementRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPlacementRepository {
    candidates: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
    opportunities: Arc<Mutex<HashMap<OpportunityId, OpportunityRecord>>>,
    applications: Arc<Mutex<HashMap<(CandidateId, OpportunityId), ApplicationRecord>>>,
}

impl PlacementRepository for InMemoryPlacementRepository {
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
        if guard.contains_key(&key) {
            guard.insert(key, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Keeps every notification and logs it in place of a push gateway.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<PlacementNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: PlacementNotification) -> Result<(), NotificationError> {
        info!(
            template = %notification.template,
            candidate_id = %notification.candidate_id,
            opportunity_id = %notification.opportunity_id,
            "placement notification queued"
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<PlacementNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Parse a JSON argument given inline or as `@path/to/file.json`.
fn parse_json_arg<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let raw = raw.trim();
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read '{path}' ({err})"))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).map_err(|err| format!("invalid JSON payload ({err})"))
}

pub(crate) fn parse_candidate(raw: &str) -> Result<CandidatePayload, String> {
    parse_json_arg(raw)
}

pub(crate) fn parse_opportunity(raw: &str) -> Result<OpportunityPayload, String> {
    parse_json_arg(raw)
}

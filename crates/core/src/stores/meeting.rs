//! Meeting state container
//!
//! Alongside the usual collection refresh, the backend exposes filtered
//! views (upcoming, past, date range). Filtered fetches do not replace
//! local state; they are projections for a single screen.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use pavilion_domain::{Meeting, MeetingDraft, MeetingPatch, RequestDescriptor, Result};

use super::{decode, to_payload};
use crate::fallback::{absorb_not_found, FallbackPolicy, WriteOutcome};
use crate::ports::Gateway;

/// Local state container for meetings
pub struct MeetingStore {
    gateway: Arc<dyn Gateway>,
    fallback: FallbackPolicy,
    meetings: RwLock<Vec<Meeting>>,
}

impl MeetingStore {
    /// Create an empty store.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway, fallback: FallbackPolicy::new(), meetings: RwLock::new(Vec::new()) }
    }

    /// Snapshot of the local state.
    pub fn meetings(&self) -> Vec<Meeting> {
        self.meetings.read().clone()
    }

    /// Reload the full collection from the backend.
    pub async fn refresh(&self) -> Result<Vec<Meeting>> {
        let response = self.gateway.send(RequestDescriptor::get("/meetings")).await?;
        let meetings: Vec<Meeting> = decode(response.body())?;
        *self.meetings.write() = meetings.clone();
        Ok(meetings)
    }

    /// Meetings scheduled from now on.
    pub async fn upcoming(&self) -> Result<Vec<Meeting>> {
        let response =
            self.gateway.send(RequestDescriptor::get("/meetings/filter/upcoming")).await?;
        decode(response.body())
    }

    /// Meetings that already took place.
    pub async fn past(&self) -> Result<Vec<Meeting>> {
        let response = self.gateway.send(RequestDescriptor::get("/meetings/filter/past")).await?;
        decode(response.body())
    }

    /// Meetings scheduled between two dates, inclusive.
    pub async fn date_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Meeting>> {
        let response = self
            .gateway
            .send(RequestDescriptor::get(format!(
                "/meetings/filter/date-range?from={from}&to={to}"
            )))
            .await?;
        decode(response.body())
    }

    /// Create a meeting; absorbs a missing endpoint with a local write.
    pub async fn create(&self, draft: &MeetingDraft) -> Result<WriteOutcome<Meeting>> {
        let payload = to_payload(draft)?;
        let result = self
            .gateway
            .send(RequestDescriptor::post("/meetings").json(payload))
            .await
            .and_then(|response| decode::<Meeting>(response.body()));

        let outcome = absorb_not_found(result, || Meeting {
            id: self.fallback.synthesize_id("meeting"),
            title: draft.title.clone(),
            scheduled_at: draft.scheduled_at,
            location: draft.location.clone(),
            notes: None,
        })?;

        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Update a meeting; absorbs a missing endpoint with a local write.
    pub async fn update(&self, id: &str, patch: &MeetingPatch) -> Result<WriteOutcome<Meeting>> {
        let payload = to_payload(patch)?;
        let result = self
            .gateway
            .send(RequestDescriptor::put(format!("/meetings/{id}")).json(payload))
            .await
            .and_then(|response| decode::<Meeting>(response.body()));

        let outcome = absorb_not_found(result, || self.patched_local(id, patch))?;
        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Delete a meeting; absorbs a missing endpoint with a local removal.
    pub async fn delete(&self, id: &str) -> Result<WriteOutcome<()>> {
        let result = self
            .gateway
            .send(RequestDescriptor::delete(format!("/meetings/{id}")))
            .await
            .map(|_| ());

        let outcome = absorb_not_found(result, || ())?;
        self.meetings.write().retain(|meeting| meeting.id != id);
        Ok(outcome)
    }

    fn replace_local(&self, meeting: Meeting) {
        let mut meetings = self.meetings.write();
        match meetings.iter_mut().find(|m| m.id == meeting.id) {
            Some(slot) => *slot = meeting,
            None => meetings.push(meeting),
        }
    }

    fn patched_local(&self, id: &str, patch: &MeetingPatch) -> Meeting {
        let mut meeting = self.local_or_placeholder(id);
        if let Some(title) = &patch.title {
            meeting.title = title.clone();
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            meeting.scheduled_at = scheduled_at;
        }
        if let Some(location) = &patch.location {
            meeting.location = Some(location.clone());
        }
        if let Some(notes) = &patch.notes {
            meeting.notes = Some(notes.clone());
        }
        meeting
    }

    fn local_or_placeholder(&self, id: &str) -> Meeting {
        self.meetings.read().iter().find(|m| m.id == id).cloned().unwrap_or_else(|| Meeting {
            id: self.fallback.synthesize_id("meeting"),
            title: String::new(),
            scheduled_at: chrono::Utc::now(),
            location: None,
            notes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use pavilion_domain::ApiError;
    use serde_json::json;

    use super::*;
    use crate::testing::FakeGateway;

    fn store() -> (Arc<FakeGateway>, MeetingStore) {
        let gateway = Arc::new(FakeGateway::new());
        let store = MeetingStore::new(gateway.clone());
        (gateway, store)
    }

    fn standup(id: &str) -> serde_json::Value {
        json!({ "id": id, "title": "Standup", "scheduledAt": "2026-03-02T09:00:00Z" })
    }

    #[tokio::test]
    async fn date_range_formats_the_query_string() {
        let (gateway, store) = store();
        gateway.push_ok(json!([standup("1")]));

        let from = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let meetings = store.date_range(from, to).await.unwrap();

        assert_eq!(meetings.len(), 1);
        assert_eq!(gateway.sent()[0].url, "/meetings/filter/date-range?from=2026-03-01&to=2026-03-31");
    }

    #[tokio::test]
    async fn filtered_fetches_do_not_replace_local_state() {
        let (gateway, store) = store();
        gateway.push_ok(json!([standup("1"), standup("2")]));
        store.refresh().await.unwrap();

        gateway.push_ok(json!([standup("1")]));
        let upcoming = store.upcoming().await.unwrap();

        assert_eq!(upcoming.len(), 1);
        assert_eq!(store.meetings().len(), 2);
        assert_eq!(gateway.sent()[1].url, "/meetings/filter/upcoming");
    }

    #[tokio::test]
    async fn fallback_create_carries_the_draft_schedule() {
        let (gateway, store) = store();
        gateway.push_err(ApiError::NotFound("meetings endpoint not deployed".into()));

        let draft = MeetingDraft {
            title: "Kickoff".into(),
            scheduled_at: "2026-04-01T10:00:00Z".parse().unwrap(),
            location: Some("Room 3".into()),
        };
        let outcome = store.create(&draft).await.unwrap();

        assert!(outcome.is_fallback());
        assert!(outcome.value.id.starts_with("meeting-"));
        assert_eq!(outcome.value.location.as_deref(), Some("Room 3"));
        assert_eq!(store.meetings().len(), 1);
    }

    #[tokio::test]
    async fn fallback_delete_removes_the_local_entry() {
        let (gateway, store) = store();
        gateway.push_ok(json!([standup("1")]));
        store.refresh().await.unwrap();

        gateway.push_err(ApiError::NotFound("missing".into()));
        store.delete("1").await.unwrap();

        assert!(store.meetings().is_empty());
    }

    #[tokio::test]
    async fn validation_errors_are_not_absorbed() {
        let (gateway, store) = store();
        gateway.push_err(ApiError::Validation("title is required".into()));

        let draft = MeetingDraft {
            title: String::new(),
            scheduled_at: chrono::Utc::now(),
            location: None,
        };
        let err = store.create(&draft).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

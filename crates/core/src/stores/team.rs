//! Team member state container
//!
//! Team members are the canonical "soft" resource: the backend surface for
//! them landed last, so every mutation here runs through the fallback
//! policy.

use std::sync::Arc;

use parking_lot::RwLock;
use pavilion_domain::{RequestDescriptor, Result, TeamMember, TeamMemberDraft, TeamMemberPatch};

use super::{decode, to_payload};
use crate::fallback::{absorb_not_found, FallbackPolicy, WriteOutcome};
use crate::ports::Gateway;

/// Local state container for team members
pub struct TeamStore {
    gateway: Arc<dyn Gateway>,
    fallback: FallbackPolicy,
    members: RwLock<Vec<TeamMember>>,
}

impl TeamStore {
    /// Create an empty store.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway, fallback: FallbackPolicy::new(), members: RwLock::new(Vec::new()) }
    }

    /// Snapshot of the local state.
    pub fn members(&self) -> Vec<TeamMember> {
        self.members.read().clone()
    }

    /// Reload the full collection from the backend.
    pub async fn refresh(&self) -> Result<Vec<TeamMember>> {
        let response = self.gateway.send(RequestDescriptor::get("/team")).await?;
        let members: Vec<TeamMember> = decode(response.body())?;
        *self.members.write() = members.clone();
        Ok(members)
    }

    /// Create a team member; absorbs a missing endpoint with a local write.
    pub async fn create(&self, draft: &TeamMemberDraft) -> Result<WriteOutcome<TeamMember>> {
        let payload = to_payload(draft)?;
        let result = self
            .gateway
            .send(RequestDescriptor::post("/team").json(payload))
            .await
            .and_then(|response| decode::<TeamMember>(response.body()));

        let outcome = absorb_not_found(result, || TeamMember {
            id: self.fallback.synthesize_id("team"),
            name: draft.name.clone(),
            email: draft.email.clone(),
            role: draft.role.clone(),
            active: true,
        })?;

        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Update a team member; absorbs a missing endpoint with a local write.
    pub async fn update(
        &self,
        id: &str,
        patch: &TeamMemberPatch,
    ) -> Result<WriteOutcome<TeamMember>> {
        let payload = to_payload(patch)?;
        let result = self
            .gateway
            .send(RequestDescriptor::put(format!("/team/{id}")).json(payload))
            .await
            .and_then(|response| decode::<TeamMember>(response.body()));

        let outcome = absorb_not_found(result, || self.patched_local(id, patch))?;
        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    /// Delete a team member; absorbs a missing endpoint with a local removal.
    pub async fn delete(&self, id: &str) -> Result<WriteOutcome<()>> {
        let result = self
            .gateway
            .send(RequestDescriptor::delete(format!("/team/{id}")))
            .await
            .map(|_| ());

        let outcome = absorb_not_found(result, || ())?;
        self.members.write().retain(|member| member.id != id);
        Ok(outcome)
    }

    /// Flip the active flag; absorbs a missing endpoint with a local flip.
    pub async fn toggle_status(&self, id: &str) -> Result<WriteOutcome<TeamMember>> {
        let result = self
            .gateway
            .send(RequestDescriptor::patch(format!("/team/{id}/toggle-status")))
            .await
            .and_then(|response| decode::<TeamMember>(response.body()));

        let outcome = absorb_not_found(result, || self.toggled_local(id))?;
        self.replace_local(outcome.value.clone());
        Ok(outcome)
    }

    fn replace_local(&self, member: TeamMember) {
        let mut members = self.members.write();
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(slot) => *slot = member,
            None => members.push(member),
        }
    }

    fn patched_local(&self, id: &str, patch: &TeamMemberPatch) -> TeamMember {
        let mut member = self.local_or_placeholder(id);
        if let Some(name) = &patch.name {
            member.name = name.clone();
        }
        if let Some(email) = &patch.email {
            member.email = email.clone();
        }
        if let Some(role) = &patch.role {
            member.role = role.clone();
        }
        member
    }

    fn toggled_local(&self, id: &str) -> TeamMember {
        let mut member = self.local_or_placeholder(id);
        member.active = !member.active;
        member
    }

    fn local_or_placeholder(&self, id: &str) -> TeamMember {
        self.members.read().iter().find(|m| m.id == id).cloned().unwrap_or_else(|| TeamMember {
            id: self.fallback.synthesize_id("team"),
            name: String::new(),
            email: String::new(),
            role: String::new(),
            active: true,
        })
    }
}

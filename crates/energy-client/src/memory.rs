//! In-process backend with the same observable contract as the HTTP one.
//!
//! State sits behind a single async mutex, so calls are serialized the way
//! a single-user session would issue them. Every call is recorded. Failures
//! can be scheduled per operation, and an operation can be stalled so that
//! it never completes.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::convert::Infallible;

use async_trait::async_trait;
use chrono::Utc;
use energy_core::{
    audit_totals, utility_names, ClientRequest, ClientRequestPatch, Event, EventDraft,
    IdGenerator, NewClientRequest, Project, ProjectDraft, ProjectPatch, ReportData, YearStore,
};
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::backend::Backend;
use crate::ClientError;

/// Backend operations, used to schedule failures and inspect call order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    ListProjects,
    CreateProject,
    PatchProject,
    DeleteProject,
    GetEnergy,
    SaveEnergy,
    ImportFromAudit,
    SaveAudit,
    GetReport,
    SaveReport,
    ListEvents,
    CreateEvent,
    DeleteEvent,
    ListRequests,
    CreateRequest,
    PatchRequest,
    DeleteRequest,
}

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    energy: BTreeMap<String, YearStore>,
    audits: BTreeMap<String, Value>,
    reports: BTreeMap<String, ReportData>,
    events: Vec<Event>,
    requests: Vec<ClientRequest>,
    failures: HashMap<Op, VecDeque<ClientError>>,
    stalled: HashSet<Op>,
    calls: Vec<Op>,
}

impl State {
    /// Record the call and pop a scheduled failure, if any.
    fn enter(&mut self, op: Op) -> Result<(), ClientError> {
        self.calls.push(op);
        match self.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => {
                debug!(?op, %err, "injected failure");
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn project_exists(&self, id: &str) -> Result<(), ClientError> {
        if self.projects.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(ClientError::NotFound(format!("project {id}")))
        }
    }
}

pub struct MemoryBackend {
    state: Mutex<State>,
    ids: Mutex<Box<dyn IdGenerator>>,
}

impl MemoryBackend {
    pub fn new(ids: impl IdGenerator + 'static) -> Self {
        Self {
            state: Mutex::new(State::default()),
            ids: Mutex::new(Box::new(ids)),
        }
    }

    /// Lock the state for `op`, applying scheduled failures and stalls.
    async fn begin(&self, op: Op) -> Result<MutexGuard<'_, State>, ClientError> {
        let mut st = self.state.lock().await;
        st.enter(op)?;
        if st.stalled.contains(&op) {
            drop(st);
            debug!(?op, "stalled");
            let never: Infallible = std::future::pending().await;
            match never {}
        }
        Ok(st)
    }

    async fn next_id(&self, prefix: &str) -> String {
        self.ids.lock().await.next_id(prefix)
    }

    pub async fn seed_project(&self, project: Project) {
        self.state.lock().await.projects.push(project);
    }

    pub async fn seed_energy(&self, project_id: &str, store: YearStore) {
        self.state
            .lock()
            .await
            .energy
            .insert(project_id.to_string(), store);
    }

    pub async fn seed_audit(&self, project_id: &str, audit: Value) {
        self.state
            .lock()
            .await
            .audits
            .insert(project_id.to_string(), audit);
    }

    pub async fn seed_event(&self, event: Event) {
        self.state.lock().await.events.push(event);
    }

    pub async fn seed_request(&self, request: ClientRequest) {
        self.state.lock().await.requests.push(request);
    }

    /// Make the next call to `op` fail with `err`. Repeated calls queue up.
    pub async fn fail_next(&self, op: Op, err: ClientError) {
        self.state
            .lock()
            .await
            .failures
            .entry(op)
            .or_default()
            .push_back(err);
    }

    /// Make every later call to `op` hang forever.
    pub async fn stall(&self, op: Op) {
        self.state.lock().await.stalled.insert(op);
    }

    /// Every operation called so far, in order (failed ones included).
    pub async fn calls(&self) -> Vec<Op> {
        self.state.lock().await.calls.clone()
    }

    /// Stored energy document, as the backend would return it.
    pub async fn stored_energy(&self, project_id: &str) -> Option<YearStore> {
        self.state.lock().await.energy.get(project_id).cloned()
    }

    pub async fn stored_audit(&self, project_id: &str) -> Option<Value> {
        self.state.lock().await.audits.get(project_id).cloned()
    }
}

fn not_found(what: &str, id: &str) -> ClientError {
    ClientError::NotFound(format!("{what} {id}"))
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let st = self.begin(Op::ListProjects).await?;
        Ok(st.projects.clone())
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ClientError> {
        drop(self.begin(Op::CreateProject).await?);
        let id = self.next_id("").await;
        let project = Project {
            id,
            created_at: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            details: draft.clone(),
        };
        info!(id = %project.id, name = project.name(), "project created");
        self.state.lock().await.projects.push(project.clone());
        Ok(project)
    }

    async fn patch_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project, ClientError> {
        let mut st = self.begin(Op::PatchProject).await?;
        let project = st
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("project", id))?;
        patch.apply(project);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: &str) -> Result<(), ClientError> {
        let mut st = self.begin(Op::DeleteProject).await?;
        st.project_exists(id)?;
        st.projects.retain(|p| p.id != id);
        st.energy.remove(id);
        st.audits.remove(id);
        st.reports.remove(id);
        Ok(())
    }

    async fn energy_accounting(&self, project_id: &str) -> Result<YearStore, ClientError> {
        let st = self.begin(Op::GetEnergy).await?;
        st.project_exists(project_id)?;
        Ok(st.energy.get(project_id).cloned().unwrap_or_default())
    }

    async fn save_energy_accounting(
        &self,
        project_id: &str,
        store: &YearStore,
    ) -> Result<(), ClientError> {
        let mut st = self.begin(Op::SaveEnergy).await?;
        st.project_exists(project_id)?;
        st.energy.insert(project_id.to_string(), store.clone());
        Ok(())
    }

    /// Copy the audit totals of `year` into the energy document, creating
    /// the year if needed and keeping its notes.
    async fn import_from_audit(&self, project_id: &str, year: &str) -> Result<(), ClientError> {
        let mut st = self.begin(Op::ImportFromAudit).await?;
        st.project_exists(project_id)?;
        let audit = st
            .audits
            .get(project_id)
            .ok_or_else(|| not_found("audit data for project", project_id))?;
        let totals = audit_totals(audit, year)
            .ok_or_else(|| not_found("audit year", year))?;
        let (util1, util2) = utility_names(audit, year);

        let current = st.energy.get(project_id).cloned().unwrap_or_default();
        let mut next = current.replace_totals(year, totals);
        if util1.is_some() {
            next.util1_name = util1;
        }
        if util2.is_some() {
            next.util2_name = util2;
        }
        info!(project_id, year, "imported totals from audit");
        st.energy.insert(project_id.to_string(), next);
        Ok(())
    }

    async fn save_audit(&self, project_id: &str, audit: &Value) -> Result<(), ClientError> {
        let mut st = self.begin(Op::SaveAudit).await?;
        st.project_exists(project_id)?;
        st.audits.insert(project_id.to_string(), audit.clone());
        Ok(())
    }

    async fn report(&self, project_id: &str) -> Result<ReportData, ClientError> {
        let st = self.begin(Op::GetReport).await?;
        st.project_exists(project_id)?;
        Ok(st.reports.get(project_id).cloned().unwrap_or_default())
    }

    async fn save_report(&self, project_id: &str, report: &ReportData) -> Result<(), ClientError> {
        let mut st = self.begin(Op::SaveReport).await?;
        st.project_exists(project_id)?;
        st.reports.insert(project_id.to_string(), report.clone());
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        let st = self.begin(Op::ListEvents).await?;
        Ok(st.events.clone())
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, ClientError> {
        drop(self.begin(Op::CreateEvent).await?);
        let event = Event {
            id: self.next_id("evt").await,
            details: draft.cleaned(),
        };
        self.state.lock().await.events.push(event.clone());
        Ok(event)
    }

    async fn delete_event(&self, id: &str) -> Result<(), ClientError> {
        let mut st = self.begin(Op::DeleteEvent).await?;
        let before = st.events.len();
        st.events.retain(|e| e.id != id);
        if st.events.len() == before {
            return Err(not_found("event", id));
        }
        Ok(())
    }

    async fn list_client_requests(&self) -> Result<Vec<ClientRequest>, ClientError> {
        let st = self.begin(Op::ListRequests).await?;
        Ok(st.requests.clone())
    }

    async fn create_client_request(
        &self,
        body: &NewClientRequest,
    ) -> Result<ClientRequest, ClientError> {
        drop(self.begin(Op::CreateRequest).await?);
        let request = ClientRequest {
            id: self.next_id("req").await,
            body: body.clone(),
        };
        self.state.lock().await.requests.push(request.clone());
        Ok(request)
    }

    async fn patch_client_request(
        &self,
        id: &str,
        patch: &ClientRequestPatch,
    ) -> Result<ClientRequest, ClientError> {
        let mut st = self.begin(Op::PatchRequest).await?;
        let request = st
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("client request", id))?;
        patch.apply(request);
        Ok(request.clone())
    }

    async fn delete_client_request(&self, id: &str) -> Result<(), ClientError> {
        let mut st = self.begin(Op::DeleteRequest).await?;
        let before = st.requests.len();
        st.requests.retain(|r| r.id != id);
        if st.requests.len() == before {
            return Err(not_found("client request", id));
        }
        Ok(())
    }
}

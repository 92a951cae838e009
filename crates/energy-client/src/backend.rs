//! The backend contract and its request bodies.

use async_trait::async_trait;
use energy_core::{
    ClientRequest, ClientRequestPatch, Event, EventDraft, NewClientRequest, Project, ProjectDraft,
    ProjectPatch, ReportData, YearStore,
};
use serde::Serialize;
use serde_json::Value;

use crate::ClientError;

/// `PATCH /projects/{id}/energy-accounting`
#[derive(Debug, Serialize)]
pub struct EnergyAccountingBody<'a> {
    pub energy_accounting: &'a YearStore,
}

/// `POST /projects/{id}/energy-accounting/import-from-audit`
#[derive(Debug, Serialize)]
pub struct ImportBody<'a> {
    pub year: &'a str,
}

/// `PATCH /projects/{id}/audit`
#[derive(Debug, Serialize)]
pub struct AuditBody<'a> {
    pub audit_data: &'a Value,
}

/// `PATCH /projects/{id}/report`
#[derive(Debug, Serialize)]
pub struct ReportBody<'a> {
    pub report_data: &'a ReportData,
}

/// Everything the desk reads from and writes to the audit API. Documents
/// are sent whole; only projects and client requests take partial patches.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ClientError>;
    async fn patch_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project, ClientError>;
    async fn delete_project(&self, id: &str) -> Result<(), ClientError>;

    /// The year-store document; a null body is an empty store.
    async fn energy_accounting(&self, project_id: &str) -> Result<YearStore, ClientError>;
    async fn save_energy_accounting(
        &self,
        project_id: &str,
        store: &YearStore,
    ) -> Result<(), ClientError>;
    /// Ask the backend to fill `year` from the project's audit data. The
    /// caller reloads the document afterwards.
    async fn import_from_audit(&self, project_id: &str, year: &str) -> Result<(), ClientError>;

    async fn save_audit(&self, project_id: &str, audit: &Value) -> Result<(), ClientError>;

    async fn report(&self, project_id: &str) -> Result<ReportData, ClientError>;
    async fn save_report(&self, project_id: &str, report: &ReportData) -> Result<(), ClientError>;

    async fn list_events(&self) -> Result<Vec<Event>, ClientError>;
    async fn create_event(&self, draft: &EventDraft) -> Result<Event, ClientError>;
    async fn delete_event(&self, id: &str) -> Result<(), ClientError>;

    async fn list_client_requests(&self) -> Result<Vec<ClientRequest>, ClientError>;
    async fn create_client_request(
        &self,
        body: &NewClientRequest,
    ) -> Result<ClientRequest, ClientError>;
    async fn patch_client_request(
        &self,
        id: &str,
        patch: &ClientRequestPatch,
    ) -> Result<ClientRequest, ClientError>;
    async fn delete_client_request(&self, id: &str) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_core::Vector;
    use serde_json::json;

    #[test]
    fn bodies_wrap_their_payload() {
        let store = YearStore::new().update_total("2023", Vector::Gas, "12,5");
        let body = serde_json::to_value(EnergyAccountingBody {
            energy_accounting: &store,
        })
        .unwrap();
        assert_eq!(
            body["energy_accounting"]["years"]["2023"]["totals"]["gas"],
            json!("12,5")
        );
        assert_eq!(
            serde_json::to_value(ImportBody { year: "2023" }).unwrap(),
            json!({ "year": "2023" })
        );
        let audit = json!({ "year2023": {} });
        assert_eq!(
            serde_json::to_value(AuditBody { audit_data: &audit }).unwrap(),
            json!({ "audit_data": { "year2023": {} } })
        );
    }

    #[test]
    fn saved_document_reparses_equal() {
        let store = YearStore::new()
            .update_total("2022", Vector::Electricity, "1000")
            .update_notes("2022", "compteur remplacé");
        let body = serde_json::to_value(EnergyAccountingBody {
            energy_accounting: &store,
        })
        .unwrap();
        let back = YearStore::from_document(body["energy_accounting"].clone()).unwrap();
        assert_eq!(back, store);
    }
}

//! JSON-over-HTTP backend.

use async_trait::async_trait;
use energy_core::{
    ClientRequest, ClientRequestPatch, Event, EventDraft, NewClientRequest, Project, ProjectDraft,
    ProjectPatch, ReportData, YearStore,
};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{AuditBody, Backend, EnergyAccountingBody, ImportBody, ReportBody};
use crate::config::ClientConfig;
use crate::ClientError;

/// Talks to the audit API. No timeout and no retries are configured: a
/// request either completes or keeps the caller waiting.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!(%method, path, "backend request");
        let mut req = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "backend request failed");
            return Err(ClientError::Status {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }

    async fn json<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let res = self.send::<()>(Method::GET, path, None).await?;
        Self::json(res).await
    }

    /// Like [`Self::get`], but an empty body reads as JSON null.
    async fn get_document(&self, path: &str) -> Result<Value, ClientError> {
        let res = self.send::<()>(Method::GET, path, None).await?;
        let bytes = res.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn call<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let res = self.send(method, path, Some(body)).await?;
        Self::json(res).await
    }

    /// Send and ignore whatever the backend answers.
    async fn fire<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(method, path, body).await.map(|_| ())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.get("/projects").await
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ClientError> {
        self.call(Method::POST, "/projects", draft).await
    }

    async fn patch_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project, ClientError> {
        self.call(Method::PATCH, &format!("/projects/{id}"), patch).await
    }

    async fn delete_project(&self, id: &str) -> Result<(), ClientError> {
        self.fire::<()>(Method::DELETE, &format!("/projects/{id}"), None)
            .await
    }

    async fn energy_accounting(&self, project_id: &str) -> Result<YearStore, ClientError> {
        let doc = self
            .get_document(&format!("/projects/{project_id}/energy-accounting"))
            .await?;
        Ok(YearStore::from_document(doc)?)
    }

    async fn save_energy_accounting(
        &self,
        project_id: &str,
        store: &YearStore,
    ) -> Result<(), ClientError> {
        let body = EnergyAccountingBody {
            energy_accounting: store,
        };
        self.fire(
            Method::PATCH,
            &format!("/projects/{project_id}/energy-accounting"),
            Some(&body),
        )
        .await
    }

    async fn import_from_audit(&self, project_id: &str, year: &str) -> Result<(), ClientError> {
        self.fire(
            Method::POST,
            &format!("/projects/{project_id}/energy-accounting/import-from-audit"),
            Some(&ImportBody { year }),
        )
        .await
    }

    async fn save_audit(&self, project_id: &str, audit: &Value) -> Result<(), ClientError> {
        self.fire(
            Method::PATCH,
            &format!("/projects/{project_id}/audit"),
            Some(&AuditBody { audit_data: audit }),
        )
        .await
    }

    async fn report(&self, project_id: &str) -> Result<ReportData, ClientError> {
        let doc = self
            .get_document(&format!("/projects/{project_id}/report"))
            .await?;
        Ok(ReportData::from_document(doc)?)
    }

    async fn save_report(&self, project_id: &str, report: &ReportData) -> Result<(), ClientError> {
        self.fire(
            Method::PATCH,
            &format!("/projects/{project_id}/report"),
            Some(&ReportBody {
                report_data: report,
            }),
        )
        .await
    }

    async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        self.get("/events").await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, ClientError> {
        self.call(Method::POST, "/events", draft).await
    }

    async fn delete_event(&self, id: &str) -> Result<(), ClientError> {
        self.fire::<()>(Method::DELETE, &format!("/events/{id}"), None)
            .await
    }

    async fn list_client_requests(&self) -> Result<Vec<ClientRequest>, ClientError> {
        self.get("/client-requests").await
    }

    async fn create_client_request(
        &self,
        body: &NewClientRequest,
    ) -> Result<ClientRequest, ClientError> {
        self.call(Method::POST, "/client-requests", body).await
    }

    async fn patch_client_request(
        &self,
        id: &str,
        patch: &ClientRequestPatch,
    ) -> Result<ClientRequest, ClientError> {
        self.call(Method::PATCH, &format!("/client-requests/{id}"), patch)
            .await
    }

    async fn delete_client_request(&self, id: &str) -> Result<(), ClientError> {
        self.fire::<()>(Method::DELETE, &format!("/client-requests/{id}"), None)
            .await
    }
}

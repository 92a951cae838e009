//! The energy-accounting page: load, edit, save, import.
//!
//! Edits are applied to the in-memory store only. `save` sends the whole
//! document; `import_from_audit` asks the backend to fill a year. Both set
//! a saving flag for the duration of the request and refuse to start while
//! it is set. The flag is cleared when the request completes, so a request
//! that is dropped mid-flight leaves the page busy.

use energy_client::{Backend, ClientConfig};
use energy_core::{Locale, PricedVector, Project, RawValue, Vector, YearStore};
use energy_econ::PriceTable;
use tracing::{info, warn};

use crate::view::{build_view, EnergyView};
use crate::PageError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageStatus {
    Loading,
    Ready,
    /// The project id is not in the project list.
    NotFound,
    /// Loading failed with this message.
    Failed(String),
}

pub struct EnergyPage<B> {
    backend: B,
    project_id: String,
    locale: Locale,
    status: PageStatus,
    project: Option<Project>,
    store: YearStore,
    prices: PriceTable,
    active_year: String,
    saving: bool,
    error: Option<String>,
}

impl<B: Backend> EnergyPage<B> {
    pub fn new(backend: B, project_id: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            backend,
            project_id: project_id.into(),
            locale: config.locale,
            status: PageStatus::Loading,
            project: None,
            store: YearStore::new(),
            prices: PriceTable::default(),
            active_year: config.default_year.clone(),
            saving: false,
            error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn store(&self) -> &YearStore {
        &self.store
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn active_year(&self) -> &str {
        &self.active_year
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Message of the last failed action, until dismissed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the project and its document. The active year is added to the
    /// document when missing.
    pub async fn load(&mut self) -> Result<(), PageError> {
        self.status = PageStatus::Loading;
        self.error = None;
        match self.fetch().await {
            Ok((project, store)) => {
                self.store = store.normalize(&self.active_year);
                info!(
                    project_id = %self.project_id,
                    years = self.store.len(),
                    "energy accounting loaded"
                );
                self.project = Some(project);
                self.status = PageStatus::Ready;
                Ok(())
            }
            Err(PageError::ProjectNotFound(id)) => {
                warn!(project_id = %id, "project not found");
                self.project = None;
                self.status = PageStatus::NotFound;
                Err(PageError::ProjectNotFound(id))
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(project_id = %self.project_id, error = %msg, "load failed");
                self.project = None;
                self.error = Some(msg.clone());
                self.status = PageStatus::Failed(msg);
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<(Project, YearStore), PageError> {
        let projects = self.backend.list_projects().await?;
        let project = projects
            .into_iter()
            .find(|p| p.id == self.project_id)
            .ok_or_else(|| PageError::ProjectNotFound(self.project_id.clone()))?;
        let store = self.backend.energy_accounting(&self.project_id).await?;
        Ok((project, store))
    }

    /// Switch data entry to `year`. The year is created lazily by the first
    /// edit.
    pub fn select_year(&mut self, year: &str) {
        self.active_year = year.to_string();
    }

    /// Add `label` to the document and select it. Blank labels are ignored.
    pub fn add_year(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        self.store = self.store.ensure_year(label);
        self.active_year = label.to_string();
        true
    }

    /// Store the raw input for one vector of the active year.
    pub fn update_total(&mut self, vector: Vector, raw: impl Into<RawValue>) {
        self.store = self.store.update_total(&self.active_year, vector, raw);
    }

    pub fn update_notes(&mut self, text: impl Into<String>) {
        self.store = self.store.update_notes(&self.active_year, text);
    }

    pub fn set_price(&mut self, vector: PricedVector, raw: impl Into<RawValue>) {
        self.prices.set(vector, raw);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn begin_request(&mut self) -> Result<(), PageError> {
        if self.saving {
            return Err(PageError::Busy);
        }
        if self.status != PageStatus::Ready {
            return Err(PageError::NotReady);
        }
        self.saving = true;
        self.error = None;
        Ok(())
    }

    fn finish_request(
        &mut self,
        outcome: Result<(), PageError>,
        action: &str,
    ) -> Result<(), PageError> {
        self.saving = false;
        if let Err(e) = &outcome {
            let msg = e.to_string();
            warn!(project_id = %self.project_id, action, error = %msg, "request failed");
            self.error = Some(msg);
        }
        outcome
    }

    /// Reload after a successful write. A failure here only sets the error
    /// message; the page stays ready with its project and current store.
    async fn refresh(&mut self) {
        match self.fetch().await {
            Ok((project, store)) => {
                self.store = store.normalize(&self.active_year);
                self.project = Some(project);
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(project_id = %self.project_id, error = %msg, "reload failed");
                self.error = Some(msg);
            }
        }
    }

    /// Persist the whole document, then reload it. On failure the edits
    /// stay in memory and the message is kept in [`Self::error`].
    pub async fn save(&mut self) -> Result<(), PageError> {
        self.begin_request()?;
        let sent = self
            .backend
            .save_energy_accounting(&self.project_id, &self.store)
            .await;
        let outcome = match sent {
            Ok(()) => {
                info!(project_id = %self.project_id, "energy accounting saved");
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(e.into()),
        };
        self.finish_request(outcome, "save")
    }

    /// Ask the backend to fill `year` from the audit data, then reload. The
    /// in-memory store is untouched when the request fails.
    pub async fn import_from_audit(&mut self, year: &str) -> Result<(), PageError> {
        self.begin_request()?;
        let sent = self.backend.import_from_audit(&self.project_id, year).await;
        let outcome = match sent {
            Ok(()) => {
                info!(project_id = %self.project_id, year, "imported from audit");
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(e.into()),
        };
        self.finish_request(outcome, "import")
    }

    /// Derived tables and charts for the current state.
    pub fn view(&self) -> EnergyView {
        build_view(
            &self.store,
            &self.prices,
            &self.active_year,
            self.project.as_ref().map(Project::name),
            self.locale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_client::{ClientError, MemoryBackend, Op};
    use energy_core::{BuildingType, ProjectDraft, ProjectStatus, SequentialIds};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn project(id: &str) -> Project {
        Project {
            id: id.into(),
            created_at: "2026-01-05T09:00:00".into(),
            details: ProjectDraft {
                project_name: "Brasserie Dupont".into(),
                client_name: "M. Dupont".into(),
                client_email: "contact@dupont.be".into(),
                client_phone: None,
                building_address: "Rue de la Station 4, Leuze".into(),
                building_type: BuildingType::Industrial,
                audit_type: "AMUREBA".into(),
                status: ProjectStatus::InProgress,
            },
        }
    }

    fn status_error(status: u16, body: &str) -> ClientError {
        ClientError::Status {
            method: "PATCH".into(),
            path: "/projects/p1/energy-accounting".into(),
            status,
            body: body.into(),
        }
    }

    async fn page_with(store: YearStore) -> EnergyPage<MemoryBackend> {
        let backend = MemoryBackend::new(SequentialIds::default());
        backend.seed_project(project("p1")).await;
        backend.seed_energy("p1", store).await;
        EnergyPage::new(backend, "p1", &ClientConfig::default())
    }

    #[tokio::test]
    async fn load_adds_the_active_year() {
        let mut page = page_with(YearStore::new().update_total("2022", Vector::Gas, "10")).await;
        page.load().await.unwrap();
        assert_eq!(page.status(), &PageStatus::Ready);
        assert_eq!(page.store().list_years(), vec!["2022", "2023"]);
        assert_eq!(page.project().map(Project::name), Some("Brasserie Dupont"));
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let backend = MemoryBackend::new(SequentialIds::default());
        let mut page = EnergyPage::new(backend, "p9", &ClientConfig::default());
        let err = page.load().await.unwrap_err();
        assert_eq!(err, PageError::ProjectNotFound("p9".into()));
        assert_eq!(page.status(), &PageStatus::NotFound);
        assert_eq!(page.backend().calls().await, vec![Op::ListProjects]);
    }

    #[tokio::test]
    async fn load_failure_shows_an_error_state() {
        let mut page = page_with(YearStore::new()).await;
        page.backend()
            .fail_next(
                Op::ListProjects,
                ClientError::Status {
                    method: "GET".into(),
                    path: "/projects".into(),
                    status: 503,
                    body: String::new(),
                },
            )
            .await;
        assert!(page.load().await.is_err());
        let msg = "GET /projects failed (503)".to_string();
        assert_eq!(page.status(), &PageStatus::Failed(msg.clone()));
        assert_eq!(page.error(), Some(msg.as_str()));
    }

    #[tokio::test]
    async fn save_persists_and_reloads() {
        let mut page = page_with(YearStore::new()).await;
        page.load().await.unwrap();
        page.update_total(Vector::Electricity, "1 200,5");
        page.update_notes("relevé de janvier");
        page.save().await.unwrap();

        let stored = page.backend().stored_energy("p1").await.unwrap();
        assert_eq!(stored.total("2023", Vector::Electricity), 1200.5);
        assert_eq!(page.store(), &stored);
        assert!(!page.is_saving());
        assert_eq!(
            page.backend().calls().await,
            vec![
                Op::ListProjects,
                Op::GetEnergy,
                Op::SaveEnergy,
                Op::ListProjects,
                Op::GetEnergy
            ]
        );
    }

    #[tokio::test]
    async fn save_failure_keeps_edits() {
        let mut page = page_with(YearStore::new()).await;
        page.load().await.unwrap();
        page.update_total(Vector::Gas, "450");
        let before = page.store().clone();
        page.backend()
            .fail_next(Op::SaveEnergy, status_error(500, "database locked"))
            .await;

        let err = page.save().await.unwrap_err();
        assert_eq!(err.to_string(), "database locked");
        assert_eq!(page.error(), Some("database locked"));
        assert_eq!(page.store(), &before);
        assert_eq!(page.status(), &PageStatus::Ready);
        assert!(!page.is_saving());

        page.dismiss_error();
        assert_eq!(page.error(), None);
    }

    #[tokio::test]
    async fn import_failure_leaves_store_unchanged() {
        let mut page = page_with(YearStore::new().update_total("2023", Vector::Fuel, "12")).await;
        page.load().await.unwrap();
        let before = page.store().clone();
        page.backend()
            .fail_next(Op::ImportFromAudit, status_error(400, ""))
            .await;
        assert!(page.import_from_audit("2023").await.is_err());
        assert_eq!(page.store(), &before);
        assert!(page.store().shares_record(&before, "2023"));
        assert_eq!(
            page.error(),
            Some("PATCH /projects/p1/energy-accounting failed (400)")
        );
    }

    #[tokio::test]
    async fn import_reloads_backend_totals() {
        let mut page = page_with(YearStore::new().update_notes("2023", "à vérifier")).await;
        page.backend()
            .seed_audit(
                "p1",
                json!({ "year2023": { "operational": [{ "electricity": "1000", "gas": 20 }] } }),
            )
            .await;
        page.load().await.unwrap();
        page.import_from_audit("2023").await.unwrap();
        assert_eq!(page.store().total("2023", Vector::Electricity), 1000.0);
        assert_eq!(page.store().total("2023", Vector::Gas), 20.0);
        assert_eq!(page.store().notes("2023"), "à vérifier");
        assert_eq!(page.error(), None);
    }

    #[tokio::test]
    async fn stalled_request_keeps_the_page_busy() {
        let mut page = page_with(YearStore::new()).await;
        page.load().await.unwrap();
        page.backend().stall(Op::SaveEnergy).await;

        tokio::select! {
            biased;
            _ = page.save() => panic!("a stalled save cannot complete"),
            _ = async {} => {}
        }
        assert!(page.is_saving());
        assert_eq!(page.save().await, Err(PageError::Busy));
        assert_eq!(page.import_from_audit("2023").await, Err(PageError::Busy));
    }

    #[tokio::test]
    async fn save_before_load_is_refused() {
        let mut page = page_with(YearStore::new()).await;
        assert_eq!(page.save().await, Err(PageError::NotReady));
        assert!(page.backend().calls().await.is_empty());
    }

    #[tokio::test]
    async fn prices_survive_reload_and_drive_costs() {
        let store = YearStore::new()
            .update_total("2022", Vector::Electricity, "1000")
            .update_total("2023", Vector::Electricity, "1200");
        let mut page = page_with(store).await;
        page.load().await.unwrap();
        page.set_price(PricedVector::Electricity, "0,25");
        page.save().await.unwrap();

        let view = page.view();
        assert_eq!(
            view.costs.per_year_total(),
            vec![Decimal::from(250), Decimal::from(300)]
        );
        assert_eq!(view.costs.grand_total, Decimal::from(550));
        assert_eq!(view.costs.most_expensive_year.as_deref(), Some("2023"));
        assert_eq!(view.project_name.as_deref(), Some("Brasserie Dupont"));
    }

    #[tokio::test]
    async fn reload_failure_after_save_keeps_the_page_usable() {
        let mut page = page_with(YearStore::new()).await;
        page.load().await.unwrap();
        page.update_total(Vector::Gas, "10");
        page.backend()
            .fail_next(Op::ListProjects, ClientError::Transport("blip".into()))
            .await;

        page.save().await.unwrap();
        let stored = page.backend().stored_energy("p1").await.unwrap();
        assert_eq!(stored.total("2023", Vector::Gas), 10.0);
        assert_eq!(page.status(), &PageStatus::Ready);
        assert!(page.project().is_some());
        assert_eq!(page.store().total("2023", Vector::Gas), 10.0);
        assert_eq!(page.error(), Some("network error: blip"));
        assert!(!page.is_saving());

        page.update_total(Vector::Gas, "12");
        page.save().await.unwrap();
        assert_eq!(page.error(), None);
        assert_eq!(page.store().total("2023", Vector::Gas), 12.0);
    }

    #[tokio::test]
    async fn add_year_selects_it() {
        let mut page = page_with(YearStore::new()).await;
        page.load().await.unwrap();
        assert!(!page.add_year("   "));
        assert!(page.add_year(" 2024 "));
        assert_eq!(page.active_year(), "2024");
        page.update_total(Vector::Biogas, "75");
        assert_eq!(page.store().raw_total("2024", Vector::Biogas), &RawValue::from("75"));
        page.select_year("2023");
        assert_eq!(page.view().active.year, "2023");
    }
}

//! Create and load helpers for the records around a project: the project
//! itself, agenda events, and report metadata.

use energy_client::Backend;
use energy_core::{Event, EventDraft, Project, ProjectDraft, ReportData};
use tracing::info;

use crate::PageError;

/// Check the required fields, then create the project.
pub async fn create_project<B: Backend + ?Sized>(
    backend: &B,
    draft: &ProjectDraft,
) -> Result<Project, PageError> {
    draft.validate()?;
    let project = backend.create_project(draft).await?;
    info!(id = %project.id, name = project.name(), "project created");
    Ok(project)
}

/// Blank optional fields are sent as null; title and start are required.
pub async fn create_event<B: Backend + ?Sized>(
    backend: &B,
    draft: &EventDraft,
) -> Result<Event, PageError> {
    let draft = draft.cleaned();
    draft.validate()?;
    Ok(backend.create_event(&draft).await?)
}

/// Report metadata with the provider name filled when none is stored.
pub async fn load_report<B: Backend + ?Sized>(
    backend: &B,
    project_id: &str,
) -> Result<ReportData, PageError> {
    Ok(backend.report(project_id).await?.with_defaults())
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_client::{MemoryBackend, Op};
    use energy_core::report::DEFAULT_PROVIDER;
    use energy_core::{BuildingType, ProjectStatus, SequentialIds, ValidationError};

    fn draft() -> ProjectDraft {
        ProjectDraft {
            project_name: "Piscine communale".into(),
            client_name: "Commune de Leuze".into(),
            client_email: "travaux@leuze.be".into(),
            client_phone: None,
            building_address: "Rue du Bassin 2".into(),
            building_type: BuildingType::Tertiary,
            audit_type: "AMUREBA".into(),
            status: ProjectStatus::Draft,
        }
    }

    #[tokio::test]
    async fn blank_project_fields_never_reach_the_backend() {
        let backend = MemoryBackend::new(SequentialIds::default());
        let mut d = draft();
        d.building_address = "  ".into();
        let err = create_project(&backend, &d).await.unwrap_err();
        assert_eq!(
            err,
            PageError::Invalid(ValidationError::MissingField("building_address"))
        );
        assert!(backend.calls().await.is_empty());

        let created = create_project(&backend, &draft()).await.unwrap();
        assert_eq!(created.id, "1");
        assert_eq!(backend.calls().await, vec![Op::CreateProject]);
    }

    #[tokio::test]
    async fn events_are_cleaned_before_validation() {
        let backend = MemoryBackend::new(SequentialIds::default());
        let err = create_event(&backend, &EventDraft::new("   ", "2026-03-04T09:30"))
            .await
            .unwrap_err();
        assert_eq!(err, PageError::Invalid(ValidationError::MissingField("title")));

        let mut d = EventDraft::new(" Visite chaufferie ", "2026-03-04T09:30");
        d.location = Some(" ".into());
        let event = create_event(&backend, &d).await.unwrap();
        assert_eq!(event.details.title, "Visite chaufferie");
        assert_eq!(event.details.location, None);
        assert_eq!(backend.calls().await, vec![Op::CreateEvent]);
    }

    #[tokio::test]
    async fn report_provider_defaults_on_load() {
        let backend = MemoryBackend::new(SequentialIds::default());
        let project = create_project(&backend, &draft()).await.unwrap();

        let report = load_report(&backend, &project.id).await.unwrap();
        assert_eq!(report.provider_company, DEFAULT_PROVIDER);

        let stored = ReportData {
            provider_company: "Energia SRL".into(),
            ..ReportData::default()
        };
        backend.save_report(&project.id, &stored).await.unwrap();
        let report = load_report(&backend, &project.id).await.unwrap();
        assert_eq!(report.provider_company, "Energia SRL");
    }
}

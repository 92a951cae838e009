//! Client-request workflow: send a document request, tick off received
//! documents, move the request through its statuses.

use chrono::NaiveDate;
use energy_client::Backend;
use energy_core::{ClientRequest, ClientRequestDraft, ClientRequestPatch, IdGenerator, RequestStatus};
use tracing::info;

use crate::PageError;

/// Validate the draft, assign document ids and create the request.
pub async fn send_request<B: Backend + ?Sized>(
    backend: &B,
    draft: &ClientRequestDraft,
    ids: &mut dyn IdGenerator,
    today: NaiveDate,
) -> Result<ClientRequest, PageError> {
    let body = draft.build(ids, today)?;
    let created = backend.create_client_request(&body).await?;
    info!(
        id = %created.id,
        documents = created.body.documents.len(),
        "client request sent"
    );
    Ok(created)
}

/// Flip one checklist item and store the new checklist.
pub async fn toggle_document<B: Backend + ?Sized>(
    backend: &B,
    request: &ClientRequest,
    doc_id: &str,
) -> Result<ClientRequest, PageError> {
    let patch = ClientRequestPatch {
        documents: Some(request.toggle_document(doc_id)),
        ..ClientRequestPatch::default()
    };
    Ok(backend.patch_client_request(&request.id, &patch).await?)
}

pub async fn set_request_status<B: Backend + ?Sized>(
    backend: &B,
    id: &str,
    status: RequestStatus,
) -> Result<ClientRequest, PageError> {
    let patch = ClientRequestPatch {
        status: Some(status),
        ..ClientRequestPatch::default()
    };
    Ok(backend.patch_client_request(id, &patch).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use energy_client::MemoryBackend;
    use energy_core::{SequentialIds, ValidationError};

    fn draft(labels: &[&str]) -> ClientRequestDraft {
        ClientRequestDraft {
            project_id: Some("p1".into()),
            client_email: "compta@dupont.be".into(),
            message: "Bonjour, pourriez-vous nous transmettre :".into(),
            document_labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[tokio::test]
    async fn request_round_trip() {
        let backend = MemoryBackend::new(SequentialIds::starting_at(100));
        let mut doc_ids = SequentialIds::default();
        let req = send_request(
            &backend,
            &draft(&["Factures électricité 2023", "", "Plans du site"]),
            &mut doc_ids,
            day(),
        )
        .await
        .unwrap();
        assert_eq!(req.id, "req-100");
        assert_eq!(req.progress(), (0, 2));
        assert_eq!(req.body.sent_at.as_deref(), Some("2026-03-02"));

        let req = toggle_document(&backend, &req, "doc-2").await.unwrap();
        assert_eq!(req.progress(), (1, 2));
        let req = toggle_document(&backend, &req, "doc-2").await.unwrap();
        assert_eq!(req.progress(), (0, 2));

        let req = set_request_status(&backend, &req.id, RequestStatus::Replied)
            .await
            .unwrap();
        assert_eq!(req.body.status, RequestStatus::Replied);
    }

    #[tokio::test]
    async fn draft_without_documents_is_rejected_before_sending() {
        let backend = MemoryBackend::new(SequentialIds::default());
        let mut ids = SequentialIds::default();
        let err = send_request(&backend, &draft(&["  "]), &mut ids, day())
            .await
            .unwrap_err();
        assert_eq!(err, PageError::Invalid(ValidationError::NoDocuments));
        assert!(backend.calls().await.is_empty());
    }
}

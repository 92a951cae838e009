//! Document requests sent to clients, with a per-document checklist.

use crate::ids::IdGenerator;
use crate::{require, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a request stands from the auditor's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Sent,
    Opened,
    Replied,
    Late,
    /// Also used for unknown status strings.
    #[default]
    #[serde(other)]
    Draft,
}

impl RequestStatus {
    pub fn label(self) -> &'static str {
        match self {
            RequestStatus::Draft => "Brouillon",
            RequestStatus::Sent => "Envoyé",
            RequestStatus::Opened => "Ouvert",
            RequestStatus::Replied => "Répondu",
            RequestStatus::Late => "En retard",
        }
    }
}

/// One requested document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub received: bool,
}

/// A file the client sent back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedFile {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

/// Request body for `POST /client-requests`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewClientRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    pub client_email: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub sent_at: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentItem>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub received_files: Vec<ReceivedFile>,
}

/// A stored client request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub id: String,
    #[serde(flatten)]
    pub body: NewClientRequest,
}

impl ClientRequest {
    /// Checklist with `doc_id` flipped; unknown ids leave it unchanged.
    pub fn toggle_document(&self, doc_id: &str) -> Vec<DocumentItem> {
        self.body
            .documents
            .iter()
            .map(|d| {
                let mut d = d.clone();
                if d.id == doc_id {
                    d.received = !d.received;
                }
                d
            })
            .collect()
    }

    /// (received, requested) document counts.
    pub fn progress(&self) -> (usize, usize) {
        let received = self.body.documents.iter().filter(|d| d.received).count();
        (received, self.body.documents.len())
    }
}

/// Partial update for `PATCH /client-requests/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRequestPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_files: Option<Vec<ReceivedFile>>,
}

impl ClientRequestPatch {
    pub fn apply(&self, req: &mut ClientRequest) {
        if let Some(s) = self.status {
            req.body.status = s;
        }
        if let Some(d) = &self.documents {
            req.body.documents = d.clone();
        }
        if let Some(f) = &self.feedback {
            req.body.feedback = Some(f.clone());
        }
        if let Some(r) = &self.received_files {
            req.body.received_files = r.clone();
        }
    }
}

/// What the user typed in the "new request" form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientRequestDraft {
    pub project_id: Option<String>,
    pub client_email: String,
    pub message: String,
    pub document_labels: Vec<String>,
}

impl ClientRequestDraft {
    /// Build the POST body: blank labels are dropped, at least one document
    /// must remain, and each document gets an id from `ids`.
    pub fn build(
        &self,
        ids: &mut dyn IdGenerator,
        sent_on: NaiveDate,
    ) -> Result<NewClientRequest, ValidationError> {
        require("client_email", &self.client_email)?;
        let labels: Vec<&str> = self
            .document_labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        if labels.is_empty() {
            return Err(ValidationError::NoDocuments);
        }
        let documents = labels
            .into_iter()
            .map(|label| DocumentItem {
                id: ids.next_id("doc"),
                label: label.to_string(),
                received: false,
            })
            .collect();
        Ok(NewClientRequest {
            project_id: self.project_id.clone().filter(|p| !p.trim().is_empty()),
            client_email: self.client_email.trim().to_string(),
            message: Some(self.message.clone()),
            status: RequestStatus::Sent,
            sent_at: Some(sent_on.format("%Y-%m-%d").to_string()),
            documents,
            feedback: Some(String::new()),
            received_files: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn draft(labels: &[&str]) -> ClientRequestDraft {
        ClientRequestDraft {
            project_id: Some(String::new()),
            client_email: "client@example.be".into(),
            message: "Merci de nous transmettre".into(),
            document_labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn build_drops_blank_documents_and_assigns_ids() {
        let mut ids = SequentialIds::starting_at(1);
        let day = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        let body = draft(&["Factures 2023", "  ", "Plans"]).build(&mut ids, day).unwrap();
        assert_eq!(body.documents.len(), 2);
        assert_eq!(body.documents[0].id, "doc-1");
        assert_eq!(body.documents[1].label, "Plans");
        assert_eq!(body.sent_at.as_deref(), Some("2026-02-27"));
        assert_eq!(body.status, RequestStatus::Sent);
        assert_eq!(body.project_id, None);
    }

    #[test]
    fn build_requires_a_document() {
        let mut ids = SequentialIds::default();
        let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            draft(&["", " "]).build(&mut ids, day),
            Err(ValidationError::NoDocuments)
        );
    }

    #[test]
    fn toggle_and_progress() {
        let req = ClientRequest {
            id: "r1".into(),
            body: NewClientRequest {
                project_id: None,
                client_email: "c@x.be".into(),
                message: None,
                status: RequestStatus::Sent,
                sent_at: None,
                documents: vec![
                    DocumentItem { id: "d1".into(), label: "A".into(), received: false },
                    DocumentItem { id: "d2".into(), label: "B".into(), received: true },
                ],
                feedback: None,
                received_files: vec![],
            },
        };
        let docs = req.toggle_document("d1");
        assert!(docs[0].received);
        assert!(!req.body.documents[0].received);
        assert_eq!(req.progress(), (1, 2));

        let mut updated = req.clone();
        ClientRequestPatch { documents: Some(docs), ..Default::default() }.apply(&mut updated);
        assert_eq!(updated.progress(), (2, 2));
    }

    #[test]
    fn unknown_status_reads_as_draft() {
        let s: RequestStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(s, RequestStatus::Draft);
        let s: RequestStatus = serde_json::from_str("\"late\"").unwrap();
        assert_eq!(s.label(), "En retard");
        let s: RequestStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(s, RequestStatus::Draft);
        assert_eq!(serde_json::to_string(&RequestStatus::Draft).unwrap(), "\"draft\"");
        assert_eq!(RequestStatus::default(), RequestStatus::Draft);
    }
}

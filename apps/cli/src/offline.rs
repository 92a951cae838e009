//! Seeded in-memory backend for `--offline` runs.

use energy_client::MemoryBackend;
use energy_core::{
    BuildingType, ClientRequest, DocumentItem, Event, EventDraft, NewClientRequest, Project,
    ProjectDraft, ProjectStatus, RequestStatus, SequentialIds, Vector, YearStore,
};
use serde_json::json;

pub const DEMO_PROJECT: &str = "demo-1";

fn project(id: &str, name: &str, created_at: &str, status: ProjectStatus) -> Project {
    Project {
        id: id.to_string(),
        created_at: created_at.to_string(),
        details: ProjectDraft {
            project_name: name.to_string(),
            client_name: "Brasserie Dupont SA".to_string(),
            client_email: "energie@dupont.be".to_string(),
            client_phone: Some("+32 69 00 00 00".to_string()),
            building_address: "Rue de la Station 4, 7900 Leuze".to_string(),
            building_type: BuildingType::Industrial,
            audit_type: "AMUREBA".to_string(),
            status,
        },
    }
}

fn energy() -> YearStore {
    let mut store = YearStore::new()
        .update_total("2021", Vector::Electricity, "182 400")
        .update_total("2021", Vector::Gas, "410 000")
        .update_total("2021", Vector::Fuel, "3 200")
        .update_total("2022", Vector::Electricity, "176 950")
        .update_total("2022", Vector::Gas, "388 500")
        .update_total("2022", Vector::Util1, "12 000")
        .update_notes("2022", "Compteur gaz remplacé en juin")
        .update_total("2023", Vector::Electricity, "169 300,5")
        .update_total("2023", Vector::Gas, "352 000")
        .update_total("2023", Vector::Biogas, "25 000")
        .update_total("2023", Vector::Util1, "11 400");
    store.util1_name = Some("Vapeur".to_string());
    store
}

fn audit() -> serde_json::Value {
    json!({
        "year2024": {
            "utility_headers": { "util1_name": "Vapeur", "util1_unit": "t" },
            "operational": [
                { "name": "Salle de brassage", "electricity": "61 000", "gas": "180 000" },
                { "name": "Embouteillage", "electricity": "48 500" }
            ],
            "buildings": [{ "name": "Bureaux", "electricity": "12 300", "gas": "41 000" }],
            "transport": [{ "name": "Camions", "fuel": "9 800" }],
            "utility": [{ "name": "Chaudière vapeur", "util1": "10 900" }]
        }
    })
}

/// A backend holding two projects, three years of accounting and an audit
/// ready to import for 2024.
pub async fn demo_backend() -> MemoryBackend {
    let backend = MemoryBackend::new(SequentialIds::starting_at(1000));
    backend
        .seed_project(project(
            DEMO_PROJECT,
            "Brasserie Dupont",
            "2026-01-12T08:30:00",
            ProjectStatus::InProgress,
        ))
        .await;
    backend
        .seed_project(project(
            "demo-2",
            "Entrepôt Nord",
            "2025-11-03T14:00:00",
            ProjectStatus::OnHold,
        ))
        .await;
    backend.seed_energy(DEMO_PROJECT, energy()).await;
    backend.seed_audit(DEMO_PROJECT, audit()).await;

    let mut visit = EventDraft::new("Visite chaufferie", "2026-03-04T09:30");
    visit.location = Some("Leuze".to_string());
    visit.project_id = Some(DEMO_PROJECT.to_string());
    backend
        .seed_event(Event {
            id: "evt-1".to_string(),
            details: visit,
        })
        .await;
    backend
        .seed_event(Event {
            id: "evt-2".to_string(),
            details: EventDraft::new("Deadline rapport AMUREBA", "2026-03-31T17:00"),
        })
        .await;
    backend
        .seed_event(Event {
            id: "evt-3".to_string(),
            details: EventDraft::new("Call client", "2026-03-02T11:00:00"),
        })
        .await;

    backend
        .seed_request(ClientRequest {
            id: "req-1".to_string(),
            body: NewClientRequest {
                project_id: Some(DEMO_PROJECT.to_string()),
                client_email: "energie@dupont.be".to_string(),
                message: Some("Merci de nous transmettre les documents suivants.".to_string()),
                status: RequestStatus::Opened,
                sent_at: Some("2026-02-20".to_string()),
                documents: vec![
                    DocumentItem {
                        id: "doc-1".to_string(),
                        label: "Factures électricité 2023".to_string(),
                        received: true,
                    },
                    DocumentItem {
                        id: "doc-2".to_string(),
                        label: "Factures gaz 2023".to_string(),
                        received: false,
                    },
                    DocumentItem {
                        id: "doc-3".to_string(),
                        label: "Plans du site".to_string(),
                        received: false,
                    },
                ],
                feedback: Some(String::new()),
                received_files: vec![],
            },
        })
        .await;
    backend
}

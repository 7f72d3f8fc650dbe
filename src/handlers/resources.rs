//! Resource endpoints backed by capability traits
//!
//! Device import, Drive status/upload, and search are stand-ins awaiting
//! real backend wiring. Each is modeled as a narrow capability trait with a
//! mock implementation, so swapping in a backend-backed implementation is a
//! pure dependency-injection change.

use crate::utils::ResponseBuilder;
use actix_web::{web, HttpResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

// ===============================
// DEVICE IMPORT
// ===============================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRow {
    pub name: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceImportRequest {
    #[serde(default)]
    pub devices: Vec<DeviceRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

#[async_trait]
pub trait DeviceImporter: Send + Sync {
    async fn import(&self, rows: &[DeviceRow]) -> ImportSummary;
}

/// Accepts every row; real implementations will validate against inventory
pub struct MockDeviceImporter;

#[async_trait]
impl DeviceImporter for MockDeviceImporter {
    async fn import(&self, rows: &[DeviceRow]) -> ImportSummary {
        ImportSummary {
            imported: rows.len(),
            skipped: 0,
        }
    }
}

/// `POST /api/devices/import`
pub async fn import_devices(
    importer: web::Data<dyn DeviceImporter>,
    body: web::Json<DeviceImportRequest>,
) -> HttpResponse {
    if body.devices.is_empty() {
        return ResponseBuilder::missing_field("devices");
    }
    let summary = importer.import(&body.devices).await;
    ResponseBuilder::ok().json(&summary)
}

// ===============================
// DRIVE STATUS AND UPLOAD
// ===============================

#[derive(Debug, Clone, Serialize)]
pub struct DriveStatus {
    pub connected: bool,
    pub folder: Option<String>,
    pub quota_used_bytes: u64,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub file_id: String,
    pub file_name: String,
}

#[async_trait]
pub trait DriveService: Send + Sync {
    async fn status(&self) -> DriveStatus;
    async fn upload(&self, file_name: &str, content_type: Option<&str>) -> UploadReceipt;
}

pub struct MockDriveService;

#[async_trait]
impl DriveService for MockDriveService {
    async fn status(&self) -> DriveStatus {
        DriveStatus {
            connected: true,
            folder: Some("Facility Hub".to_string()),
            quota_used_bytes: 0,
        }
    }

    async fn upload(&self, file_name: &str, _content_type: Option<&str>) -> UploadReceipt {
        UploadReceipt {
            file_id: format!("mock-{}", file_name.len()),
            file_name: file_name.to_string(),
        }
    }
}

/// `GET /api/drive/status`
pub async fn drive_status(drive: web::Data<dyn DriveService>) -> HttpResponse {
    ResponseBuilder::ok().json(&drive.status().await)
}

/// `POST /api/drive/upload`
pub async fn upload_file(
    drive: web::Data<dyn DriveService>,
    body: web::Json<UploadRequest>,
) -> HttpResponse {
    let Some(file_name) = body.file_name.as_deref().filter(|name| !name.is_empty()) else {
        return ResponseBuilder::missing_field("file_name");
    };
    let receipt = drive.upload(file_name, body.content_type.as_deref()).await;
    ResponseBuilder::ok().json(&receipt)
}

// ===============================
// SEARCH
// ===============================

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub kind: String,
    pub id: String,
    pub title: String,
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Vec<SearchHit>;
}

pub struct MockSearchBackend;

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, query: &str) -> Vec<SearchHit> {
        vec![
            SearchHit {
                kind: "device".to_string(),
                id: "dev-1".to_string(),
                title: format!("Device matching '{query}'"),
            },
            SearchHit {
                kind: "document".to_string(),
                id: "doc-1".to_string(),
                title: format!("Document matching '{query}'"),
            },
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// `GET /api/search`
pub async fn search(
    backend: web::Data<dyn SearchBackend>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) else {
        return ResponseBuilder::missing_field("q");
    };
    let results = backend.search(q).await;
    ResponseBuilder::ok().json(&json!({ "results": results }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_importer_counts_rows() {
        let rows = vec![
            DeviceRow {
                name: "Projector".to_string(),
                room: Some("A-101".to_string()),
                serial_number: None,
            },
            DeviceRow {
                name: "Thermostat".to_string(),
                room: None,
                serial_number: Some("T-42".to_string()),
            },
        ];
        let summary = MockDeviceImporter.import(&rows).await;
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 0
            }
        );
    }

    #[tokio::test]
    async fn mock_drive_reports_connected() {
        let status = MockDriveService.status().await;
        assert!(status.connected);
        assert_eq!(status.folder.as_deref(), Some("Facility Hub"));
    }

    #[tokio::test]
    async fn mock_upload_echoes_file_name() {
        let receipt = MockDriveService.upload("floorplan.pdf", None).await;
        assert_eq!(receipt.file_name, "floorplan.pdf");
        assert!(!receipt.file_id.is_empty());
    }

    #[tokio::test]
    async fn mock_search_returns_canned_hits() {
        let hits = MockSearchBackend.search("boiler").await;
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| hit.title.contains("boiler")));
    }
}

//! HTTP data loader for the org structure views.
//!
//! Read calls never fail outward: any transport, status or decoding problem is logged
//! and replaced by empty data so a view can still render. Mutations report errors.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    Department, DepartmentForm, DepartmentMove, Employee, OrgStructure, ReorderRequest,
    StaffingRow, StructureView,
};

/// Message used when a failed response carries none of its own.
pub const GENERIC_FAILURE: &str = "The request could not be completed. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
}

/// Where view data comes from.
///
/// Implementations normalize failures into empty results.
#[async_trait]
pub trait OrgDataSource: Send + Sync {
    async fn org_structure(&self) -> OrgStructure;
    async fn staffing(&self, view: StructureView) -> Vec<StaffingRow>;
    async fn employees(&self, department_id: i64) -> Vec<Employee>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl<T> Envelope<T> {
    fn failure_message(&self) -> String {
        let from_error = match &self.error {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        };
        from_error
            .or_else(|| self.message.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string())
    }

    fn into_data(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Rejected(self.failure_message()));
        }
        self.data
            .ok_or_else(|| ClientError::Rejected(GENERIC_FAILURE.to_string()))
    }
}

/// Decode a mutation response. A body that is not an envelope (proxy error page,
/// empty 404) becomes the generic failure.
fn decode_envelope<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Envelope<T>, ClientError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(%status, error = %e, "Backend response is not an API envelope");
        ClientError::Rejected(GENERIC_FAILURE.to_string())
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmployeesPayload {
    Bare(Vec<Employee>),
    Wrapped(Envelope<Vec<Employee>>),
}

/// Client for a remote HR backend.
#[derive(Debug, Clone)]
pub struct OrgClient {
    http: reqwest::Client,
    base_url: String,
}

impl OrgClient {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_data<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let envelope: Envelope<T> = self.http.get(url).send().await?.json().await?;
        envelope.into_data()
    }

    /// Divisions, departments, roles and coordinators in one call.
    pub async fn load_structure(&self) -> OrgStructure {
        let url = self.url("org-structure");
        match self.get_data::<OrgStructure>(&url).await {
            Ok(structure) => structure,
            Err(e) => {
                tracing::warn!(%url, error = %e, "Failed to load org structure, using empty structure");
                OrgStructure::default()
            }
        }
    }

    async fn load_rows(&self, view: StructureView) -> Vec<StaffingRow> {
        let url = format!("{}?view={}", self.url("org-structure"), view.as_str());
        match self.get_data::<Vec<StaffingRow>>(&url).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(%url, error = %e, "Failed to load {} rows", view.as_str());
                Vec::new()
            }
        }
    }

    pub async fn load_functional(&self) -> Vec<StaffingRow> {
        self.load_rows(StructureView::Functional).await
    }

    pub async fn load_pay_grades(&self) -> Vec<StaffingRow> {
        self.load_rows(StructureView::PayGrade).await
    }

    async fn fetch_employees(&self, url: &str) -> Result<Vec<Employee>, ClientError> {
        let payload: EmployeesPayload = self.http.get(url).send().await?.json().await?;
        match payload {
            EmployeesPayload::Bare(rows) => Ok(rows),
            EmployeesPayload::Wrapped(envelope) => envelope.into_data(),
        }
    }

    /// Employees of one department; accepts a bare array or an envelope.
    pub async fn load_employees(&self, department_id: i64) -> Vec<Employee> {
        let url = format!("{}?department_id={}", self.url("employees"), department_id);
        match self.fetch_employees(&url).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(%url, error = %e, "Failed to load employees");
                Vec::new()
            }
        }
    }

    /// Send reparent moves. The caller is expected to reload afterwards.
    pub async fn reorder(&self, moves: &[DepartmentMove]) -> Result<(), ClientError> {
        let body = ReorderRequest {
            moves: moves.to_vec(),
            expected_revision: None,
        };
        let request = self.http.post(self.url("departments/reorder")).json(&body);
        let envelope: Envelope<serde_json::Value> = self.send_mutation(request).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(ClientError::Rejected(envelope.failure_message()))
        }
    }

    /// Create (`id == None`) or update a department.
    pub async fn save_department(
        &self,
        id: Option<i64>,
        form: &DepartmentForm,
    ) -> Result<Department, ClientError> {
        let request = match id {
            Some(id) => self.http.put(self.url(&format!("departments/{id}"))),
            None => self.http.post(self.url("departments")),
        };
        let envelope: Envelope<Department> = self.send_mutation(request.json(form)).await?;
        envelope.into_data()
    }

    async fn send_mutation<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }
}

#[async_trait]
impl OrgDataSource for OrgClient {
    async fn org_structure(&self) -> OrgStructure {
        self.load_structure().await
    }

    async fn staffing(&self, view: StructureView) -> Vec<StaffingRow> {
        self.load_rows(view).await
    }

    async fn employees(&self, department_id: i64) -> Vec<Employee> {
        self.load_employees(department_id).await
    }
}

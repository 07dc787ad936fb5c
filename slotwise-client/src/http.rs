//! HTTP transport for the backend API
//!
//! [`ScheduleApi`] is the seam the coordinator and views depend on; tests
//! substitute an in-memory implementation. [`NetworkScheduleApi`] is the
//! reqwest-backed implementation talking to the REST endpoints.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use shared::{
    ApiResponse, Assignment, AvailabilityRecord, AvailabilityRecordCreate,
    AvailabilityRecordUpdate, InventoryTransactionCreate, Product, RecordKind, Reservation,
    ScheduleOverride,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::normalize;

/// Backend API surface consumed by the availability views
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    async fn list_records(
        &self,
        kind: RecordKind,
        date: NaiveDate,
    ) -> ClientResult<Vec<AvailabilityRecord>>;
    async fn create_record(
        &self,
        payload: &AvailabilityRecordCreate,
    ) -> ClientResult<AvailabilityRecord>;
    async fn update_record(
        &self,
        id: &str,
        payload: &AvailabilityRecordUpdate,
    ) -> ClientResult<AvailabilityRecord>;
    async fn delete_record(&self, id: &str) -> ClientResult<()>;

    async fn list_overrides(&self, date: NaiveDate) -> ClientResult<Vec<ScheduleOverride>>;
    async fn list_reservations(&self, date: NaiveDate) -> ClientResult<Vec<Reservation>>;
    async fn list_assignments(&self, resource_id: &str) -> ClientResult<Vec<Assignment>>;
    async fn list_products(&self) -> ClientResult<Vec<Product>>;

    async fn record_inventory_transaction(
        &self,
        payload: &InventoryTransactionCreate,
    ) -> ClientResult<()>;
}

#[async_trait]
impl<A: ScheduleApi + ?Sized> ScheduleApi for std::sync::Arc<A> {
    async fn list_records(
        &self,
        kind: RecordKind,
        date: NaiveDate,
    ) -> ClientResult<Vec<AvailabilityRecord>> {
        (**self).list_records(kind, date).await
    }

    async fn create_record(
        &self,
        payload: &AvailabilityRecordCreate,
    ) -> ClientResult<AvailabilityRecord> {
        (**self).create_record(payload).await
    }

    async fn update_record(
        &self,
        id: &str,
        payload: &AvailabilityRecordUpdate,
    ) -> ClientResult<AvailabilityRecord> {
        (**self).update_record(id, payload).await
    }

    async fn delete_record(&self, id: &str) -> ClientResult<()> {
        (**self).delete_record(id).await
    }

    async fn list_overrides(&self, date: NaiveDate) -> ClientResult<Vec<ScheduleOverride>> {
        (**self).list_overrides(date).await
    }

    async fn list_reservations(&self, date: NaiveDate) -> ClientResult<Vec<Reservation>> {
        (**self).list_reservations(date).await
    }

    async fn list_assignments(&self, resource_id: &str) -> ClientResult<Vec<Assignment>> {
        (**self).list_assignments(resource_id).await
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn record_inventory_transaction(
        &self,
        payload: &InventoryTransactionCreate,
    ) -> ClientResult<()> {
        (**self).record_inventory_transaction(payload).await
    }
}

/// Network client for the backend REST API
#[derive(Debug, Clone)]
pub struct NetworkScheduleApi {
    client: Client,
    base_url: String,
    owner: String,
    project: Option<String>,
    token: Option<String>,
}

impl NetworkScheduleApi {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            project: config.project.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Tenant/project scoping added to every request
    fn scope_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("owner", self.owner.clone())];
        if let Some(project) = &self.project {
            params.push(("project", project.clone()));
        }
        params
    }

    async fn get_value(&self, path: &str, extra: &[(&str, String)]) -> ClientResult<Value> {
        let mut request = self.client.get(self.url(path)).query(&self.scope_params());
        if !extra.is_empty() {
            request = request.query(extra);
        }
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let mut request = self
            .client
            .post(self.url(path))
            .query(&self.scope_params())
            .json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn put<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<Value> {
        let mut request = self
            .client
            .put(self.url(path))
            .query(&self.scope_params())
            .json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let mut request = self
            .client
            .delete(self.url(path))
            .query(&self.scope_params());
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await.map(|_: Value| ())
    }

    /// Map status codes to errors, then hand the body to the caller raw
    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        response.json().await.map_err(Into::into)
    }

    /// Unwrap a mutation response, accepting both enveloped and bare records
    fn mutation_record(value: Value) -> ClientResult<AvailabilityRecord> {
        let envelope: ApiResponse<AvailabilityRecord> = serde_json::from_value(value.clone())?;
        match envelope.data {
            Some(record) => Ok(record),
            None => serde_json::from_value(value)
                .map_err(|e| ClientError::MalformedPayload(format!("record: {e}"))),
        }
    }

    fn kind_path(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Opened => "api/availability/opened",
            RecordKind::Blocked => "api/availability/blocked",
            RecordKind::ScheduleOverride => "api/availability/overrides",
        }
    }
}

#[async_trait]
impl ScheduleApi for NetworkScheduleApi {
    async fn list_records(
        &self,
        kind: RecordKind,
        date: NaiveDate,
    ) -> ClientResult<Vec<AvailabilityRecord>> {
        let value = self
            .get_value(Self::kind_path(kind), &[("date", date.to_string())])
            .await?;
        normalize::availability_records(value)
    }

    async fn create_record(
        &self,
        payload: &AvailabilityRecordCreate,
    ) -> ClientResult<AvailabilityRecord> {
        let value = self.post(Self::kind_path(payload.kind), payload).await?;
        Self::mutation_record(value)
    }

    async fn update_record(
        &self,
        id: &str,
        payload: &AvailabilityRecordUpdate,
    ) -> ClientResult<AvailabilityRecord> {
        let value = self
            .put(&format!("api/availability/records/{id}"), payload)
            .await?;
        Self::mutation_record(value)
    }

    async fn delete_record(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("api/availability/records/{id}")).await
    }

    async fn list_overrides(&self, date: NaiveDate) -> ClientResult<Vec<ScheduleOverride>> {
        let value = self
            .get_value("api/schedule/overrides", &[("date", date.to_string())])
            .await?;
        normalize::schedule_overrides(value)
    }

    async fn list_reservations(&self, date: NaiveDate) -> ClientResult<Vec<Reservation>> {
        let value = self
            .get_value("api/reservations", &[("date", date.to_string())])
            .await?;
        normalize::reservations(value)
    }

    async fn list_assignments(&self, resource_id: &str) -> ClientResult<Vec<Assignment>> {
        let value = self
            .get_value(
                "api/assignments",
                &[("resource_id", resource_id.to_string())],
            )
            .await?;
        normalize::assignments(value)
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let value = self.get_value("api/products", &[]).await?;
        normalize::products(value)
    }

    async fn record_inventory_transaction(
        &self,
        payload: &InventoryTransactionCreate,
    ) -> ClientResult<()> {
        // Validation failure is caught before dispatch; no request goes out.
        if payload.item_id.trim().is_empty() {
            return Err(ClientError::Validation(
                "an inventory item must be selected".to_string(),
            ));
        }
        self.post("api/inventory/transactions", payload).await?;
        Ok(())
    }
}

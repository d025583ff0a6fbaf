//! Payroll REST API Client
//!
//! Thin typed wrapper over the payroll backend. Every resource gets the
//! same five operations (list, get, create, update, delete); employee
//! registration and punches additionally go out as multipart forms.
//!
//! Requests are independent: no batching, no deduplication and no retry.
//! A failure surfaces once to the caller.

mod envelope;
mod error;
mod upload;

pub use envelope::{unwrap_list, unwrap_one};
pub use error::{extract_server_message, ClientError};
pub use upload::{Photo, PunchRequest};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::{Employee, RecordId, Resource, TimeEntry};
use crate::summary::{PeriodFilter, PunchSource, SourceError};
use crate::validation::Validate;

/// Header carrying a per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Header carrying the selected tenant
pub const BUSINESS_ID_HEADER: &str = "X-Business-Id";

/// Configuration for the payroll client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API (e.g. "http://localhost:8000/api")
    pub base_url: String,
    /// Tenant every request is scoped to, when set
    pub business_id: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            business_id: api
                .business_id
                .clone()
                .filter(|id| !id.trim().is_empty()),
            timeout_secs: api.timeout_secs,
            user_agent: api.user_agent.clone(),
        }
    }
}

/// Payroll REST API client
pub struct PayrollClient {
    client: Client,
    config: ClientConfig,
}

impl PayrollClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn record_url<R: Resource>(&self, id: &RecordId) -> String {
        self.url(&format!("{}/{}", R::PATH, urlencoding::encode(id.as_str())))
    }

    /// Send a request and decode the body as JSON. Empty bodies decode to
    /// `Value::Null`.
    async fn send(&self, method: Method, url: &str, build: impl FnOnce(RequestBuilder) -> RequestBuilder) -> Result<Value, ClientError> {
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut builder = self
            .client
            .request(method.clone(), url)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(business_id) = &self.config.business_id {
            builder = builder.header(BUSINESS_ID_HEADER, business_id);
        }

        tracing::debug!(request_id = %request_id, %method, url, "Sending request");

        let response = build(builder).send().await.map_err(|e| {
            tracing::error!(request_id = %request_id, %method, url, "Request failed: {}", e);
            ClientError::from_transport(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::from_transport)?;

        if !status.is_success() {
            let err = ClientError::from_status(status.as_u16(), &body);
            tracing::error!(
                request_id = %request_id,
                %method,
                url,
                status = status.as_u16(),
                "API error: {}",
                err
            );
            return Err(err);
        }

        tracing::debug!(request_id = %request_id, status = status.as_u16(), bytes = body.len(), "Response received");

        if body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }

    fn decode_one<R: Resource>(value: Value) -> Result<R, ClientError> {
        let record = unwrap_one(value, R::SINGULAR)?;
        Ok(serde_json::from_value(record)?)
    }

    fn decode_list<R: Resource>(value: Value) -> Result<Vec<R>, ClientError> {
        unwrap_list(value, R::COLLECTION_KEYS)?
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ClientError::from))
            .collect()
    }

    fn tenant_query<R: Resource>(&self) -> Vec<(&'static str, String)> {
        match (&self.config.business_id, R::TENANT_SCOPED) {
            (Some(id), true) => vec![("business_id", id.clone())],
            _ => Vec::new(),
        }
    }

    /// List every record of a resource in the current tenant
    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ClientError> {
        self.list_with::<R>(&[]).await
    }

    /// List records with extra query parameters
    pub async fn list_with<R: Resource>(&self, params: &[(&str, String)]) -> Result<Vec<R>, ClientError> {
        let mut query = self.tenant_query::<R>();
        query.extend(params.iter().map(|(k, v)| (*k, v.clone())));

        let url = self.url(R::PATH);
        let value = self.send(Method::GET, &url, |b| b.query(&query)).await?;
        let records = Self::decode_list::<R>(value)?;

        tracing::info!("Fetched {} {} records", records.len(), R::PATH);
        Ok(records)
    }

    /// Fetch one record
    pub async fn get<R: Resource>(&self, id: &RecordId) -> Result<R, ClientError> {
        let url = self.record_url::<R>(id);
        let value = self.send(Method::GET, &url, |b| b).await?;
        Self::decode_one(value)
    }

    /// Validate and create a record, returning the server's copy
    pub async fn create<R: Resource + Clone>(&self, record: &R) -> Result<R, ClientError> {
        record.validate()?;

        let url = self.url(R::PATH);
        let value = self.send(Method::POST, &url, |b| b.json(record)).await?;

        let created = match value {
            Value::Null => record.clone(),
            value => Self::decode_one(value)?,
        };
        tracing::info!(id = ?created.id(), "{} created", R::LABEL);
        Ok(created)
    }

    /// Validate and update a record, returning the server's copy
    pub async fn update<R: Resource + Clone>(&self, id: &RecordId, record: &R) -> Result<R, ClientError> {
        record.validate()?;

        let url = self.record_url::<R>(id);
        let value = self.send(Method::PUT, &url, |b| b.json(record)).await?;

        let updated = match value {
            Value::Null => record.clone(),
            value => Self::decode_one(value)?,
        };
        tracing::info!(%id, "{} updated", R::LABEL);
        Ok(updated)
    }

    /// Delete a record
    pub async fn delete<R: Resource>(&self, id: &RecordId) -> Result<(), ClientError> {
        let url = self.record_url::<R>(id);
        self.send(Method::DELETE, &url, |b| b).await?;
        tracing::info!(%id, "{} deleted", R::LABEL);
        Ok(())
    }

    /// Register an employee together with their photo
    pub async fn register_employee(
        &self,
        employee: &Employee,
        photo: Option<Photo>,
    ) -> Result<Employee, ClientError> {
        employee.validate()?;

        let form = upload::registration_form(employee, photo)?;
        let url = self.url("employees/register");
        let value = self.send(Method::POST, &url, |b| b.multipart(form)).await?;

        let registered = match value {
            Value::Null => employee.clone(),
            value => Self::decode_one::<Employee>(value)?,
        };
        tracing::info!(id = ?registered.id, "Employee registered");
        Ok(registered)
    }

    /// Record a time-clock punch
    pub async fn punch(&self, request: PunchRequest) -> Result<TimeEntry, ClientError> {
        request.validate()?;

        let employee_id = request.employee_id.clone();
        let kind = request.kind;
        let form = request.into_form()?;
        let url = self.url("time-entries/punch");
        let value = self.send(Method::POST, &url, |b| b.multipart(form)).await?;

        let entry = match value {
            Value::Null => TimeEntry {
                employee_id: Some(employee_id.clone()),
                punch_type: Some(kind.as_str().to_string()),
                ..Default::default()
            },
            value => Self::decode_one::<TimeEntry>(value)?,
        };
        tracing::info!(%employee_id, %kind, "Punch recorded");
        Ok(entry)
    }

    /// Fetch time entries narrowed by a period filter
    pub async fn time_entries(&self, filter: &PeriodFilter) -> Result<Vec<TimeEntry>, ClientError> {
        let mut params = Vec::new();
        if let Some(id) = &filter.employee_id {
            params.push(("employee_id", id.to_string()));
        }
        if let Some(from) = filter.from {
            params.push(("start", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = filter.to {
            params.push(("end", to.format("%Y-%m-%d").to_string()));
        }
        self.list_with::<TimeEntry>(&params).await
    }
}

#[async_trait]
impl PunchSource for PayrollClient {
    fn name(&self) -> &str {
        "api"
    }

    async fn fetch_entries(&self, filter: &PeriodFilter) -> Result<Vec<TimeEntry>, SourceError> {
        Ok(self.time_entries(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, business_id: Option<&str>) -> PayrollClient {
        PayrollClient::new(ClientConfig {
            base_url: base_url.to_string(),
            business_id: business_id.map(String::from),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.business_id, None);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_urls() {
        let client = client("http://api.test/v1/", None);
        assert_eq!(client.url("employees"), "http://api.test/v1/employees");
        assert_eq!(
            client.record_url::<Employee>(&RecordId::new("a b")),
            "http://api.test/v1/employees/a%20b"
        );
    }

    #[test]
    fn test_tenant_query() {
        use crate::models::Business;

        let scoped = client("http://api.test", Some("12"));
        assert_eq!(
            scoped.tenant_query::<Employee>(),
            vec![("business_id", "12".to_string())]
        );
        assert!(scoped.tenant_query::<Business>().is_empty());
        assert!(client("http://api.test", None)
            .tenant_query::<Employee>()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_before_sending() {
        // Nothing listens here; validation must fail first
        let client = client("http://127.0.0.1:9", None);
        let err = client.create(&Employee::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = client("http://127.0.0.1:9", None);
        let err = client.list::<Employee>().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Unavailable(_) | ClientError::Request(_) | ClientError::Timeout
        ));
    }
}

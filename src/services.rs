use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::config::AppConfig;
use crate::models::{CreatePlanRequest, PaymentRequest, SubscribeRequest, TicketRequest};

/// Service
///
/// The backend services the feature screens read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Account,
    Plan,
    Payment,
    Support,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// 401 from the service. Always handled by the shared forced logout.
    #[error("credential rejected by the {0:?} service")]
    Unauthorized(Service),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        Self::Unavailable(error.to_string())
    }
}

/// Outcome of the subscription call made before a payment is processed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SubscribeOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// 1. ServiceClient Contract
/// ServiceClient
///
/// The feature-screen collaborators' data access. Paths are relative to the
/// chosen service's base URL; the bearer token is attached to every call.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    async fn fetch(&self, service: Service, path: &str, token: &str) -> Result<Value, ServiceError>;

    async fn create_plan(&self, token: &str, plan: CreatePlanRequest) -> Result<(), ServiceError>;

    async fn subscribe(
        &self,
        token: &str,
        request: SubscribeRequest,
    ) -> Result<SubscribeOutcome, ServiceError>;

    async fn process_payment(
        &self,
        token: &str,
        request: PaymentRequest,
    ) -> Result<Option<String>, ServiceError>;

    /// Activates or deactivates a plan in the catalogue (admin).
    async fn set_plan_active(
        &self,
        token: &str,
        plan_id: &str,
        active: bool,
    ) -> Result<(), ServiceError>;

    /// Cancels one of the user's subscriptions.
    async fn cancel_subscription(
        &self,
        token: &str,
        subscription_id: &str,
    ) -> Result<(), ServiceError>;

    async fn create_ticket(&self, token: &str, ticket: TicketRequest) -> Result<(), ServiceError>;

    /// Hands a ticket to an employee (admin).
    async fn assign_ticket(
        &self,
        token: &str,
        ticket_id: i64,
        employee_id: i64,
    ) -> Result<(), ServiceError>;

    /// Moves an assigned ticket to a new status (employee).
    async fn update_ticket_status(
        &self,
        token: &str,
        ticket_id: i64,
        status: &str,
    ) -> Result<(), ServiceError>;
}

// 2. The Real Implementation (HTTP)
/// HttpServiceClient
///
/// Calls the plan, payment, support and account services. Each call runs inside
/// the request that needs it, so a client that disconnects drops the call with
/// its request; the configured timeout bounds the rest.
#[derive(Clone)]
pub struct HttpServiceClient {
    client: reqwest::Client,
    account_url: String,
    plan_url: String,
    payment_url: String,
    support_url: String,
}

impl HttpServiceClient {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::with_timeout(config, config.request_timeout)
    }

    pub fn with_timeout(config: &AppConfig, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            account_url: config.auth_service_url.clone(),
            plan_url: config.plan_service_url.clone(),
            payment_url: config.payment_service_url.clone(),
            support_url: config.support_service_url.clone(),
        })
    }

    fn url(&self, service: Service, path: &str) -> String {
        let base = match service {
            Service::Account => &self.account_url,
            Service::Plan => &self.plan_url,
            Service::Payment => &self.payment_url,
            Service::Support => &self.support_url,
        };
        format!("{base}{path}")
    }

    async fn read(service: Service, response: reqwest::Response) -> Result<Value, ServiceError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ServiceError::Unauthorized(service));
        }
        if status.is_client_error() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("The request was rejected.")
                .to_string();
            return Err(ServiceError::Rejected(message));
        }
        if !status.is_success() {
            warn!(?service, %status, "service call failed");
            return Err(ServiceError::Unavailable(format!("{service:?} returned {status}")));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ServiceError::Unavailable(e.to_string()))
    }

    /// Sends a JSON body with the bearer token and reads the reply like `fetch`.
    async fn send<B>(
        &self,
        method: Method,
        service: Service,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<Value, ServiceError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .client
            .request(method, self.url(service, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::read(service, response).await
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    async fn fetch(&self, service: Service, path: &str, token: &str) -> Result<Value, ServiceError> {
        let response = self
            .client
            .get(self.url(service, path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read(service, response).await
    }

    async fn create_plan(&self, token: &str, plan: CreatePlanRequest) -> Result<(), ServiceError> {
        self.send(Method::POST, Service::Plan, "/plans", token, &plan)
            .await
            .map(|_| ())
    }

    async fn subscribe(
        &self,
        token: &str,
        request: SubscribeRequest,
    ) -> Result<SubscribeOutcome, ServiceError> {
        let body = self
            .send(Method::POST, Service::Plan, "/user-plans/subscribe", token, &request)
            .await?;
        serde_json::from_value(body).map_err(|e| ServiceError::Unavailable(e.to_string()))
    }

    async fn process_payment(
        &self,
        token: &str,
        request: PaymentRequest,
    ) -> Result<Option<String>, ServiceError> {
        let body = self
            .send(Method::POST, Service::Payment, "/payments/process", token, &request)
            .await?;
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn set_plan_active(
        &self,
        token: &str,
        plan_id: &str,
        active: bool,
    ) -> Result<(), ServiceError> {
        let action = if active { "activate" } else { "deactivate" };
        let path = format!("/admin/plans/{plan_id}/{action}");
        self.send(Method::POST, Service::Plan, &path, token, &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    async fn cancel_subscription(
        &self,
        token: &str,
        subscription_id: &str,
    ) -> Result<(), ServiceError> {
        let path = format!("/user-plans/{subscription_id}/cancel");
        self.send(Method::POST, Service::Plan, &path, token, &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    async fn create_ticket(&self, token: &str, ticket: TicketRequest) -> Result<(), ServiceError> {
        self.send(Method::POST, Service::Support, "/support/tickets", token, &ticket)
            .await
            .map(|_| ())
    }

    async fn assign_ticket(
        &self,
        token: &str,
        ticket_id: i64,
        employee_id: i64,
    ) -> Result<(), ServiceError> {
        let path = format!("/support/tickets/{ticket_id}/assign/{employee_id}");
        self.send(Method::PUT, Service::Support, &path, token, &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    async fn update_ticket_status(
        &self,
        token: &str,
        ticket_id: i64,
        status: &str,
    ) -> Result<(), ServiceError> {
        let path = format!("/support/tickets/{ticket_id}/status");
        self.send(
            Method::PUT,
            Service::Support,
            &path,
            token,
            &serde_json::json!({ "status": status }),
        )
        .await
        .map(|_| ())
    }
}

/// ServiceState
///
/// The shared handle to the feature-service collaborator.
pub type ServiceState = Arc<dyn ServiceClient>;

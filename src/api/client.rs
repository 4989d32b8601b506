use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};

use super::{ApiError, Resource};
use crate::config::{normalize_base_url, Config};
use crate::constants::*;
use crate::models::{CommandLog, NewRfidTag, NewWorkPlan, RfidTag, RfidTagPatch};
use crate::normalize;

/// HTTP client for the robot backend. Cheap to clone; spawned tasks each
/// take their own copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.request_timeout_secs)
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send, reject non-2xx, and decode the body as JSON (empty body = null).
    async fn send(&self, req: RequestBuilder) -> Result<Value, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body: text });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        self.send(self.request(method, path).json(body)).await
    }

    /// Raw envelope of one page of a list endpoint.
    pub async fn fetch_page(
        &self,
        resource: Resource,
        page: u32,
        limit: u32,
    ) -> Result<Value, ApiError> {
        tracing::debug!(path = resource.path(), page, limit, "fetching page");
        let req = self
            .request(Method::GET, resource.path())
            .query(&[("page", page), ("limit", limit)]);
        self.send(req).await
    }

    /// Every RFID tag, unpaginated (work plan form choices).
    pub async fn fetch_all_rfid_tags(&self) -> Result<Vec<RfidTag>, ApiError> {
        let body = self.send(self.request(Method::GET, RFID_TAGS_PATH)).await?;
        Ok(normalize::list(&body, normalize::rfid_tag))
    }

    pub async fn latest_command(&self) -> Result<Option<CommandLog>, ApiError> {
        let body = self
            .send(self.request(Method::GET, LATEST_COMMAND_PATH))
            .await?;
        Ok(normalize::latest_command(&body))
    }

    /// `POST /commands/send {"command": code}`.
    pub async fn send_command(&self, code: &str) -> Result<(), ApiError> {
        self.send_json(Method::POST, SEND_COMMAND_PATH, &json!({ "command": code }))
            .await?;
        tracing::info!(command = code, "command sent");
        Ok(())
    }

    pub async fn create_rfid_tag(&self, tag: &NewRfidTag) -> Result<(), ApiError> {
        self.send_json(Method::POST, RFID_TAGS_PATH, tag).await?;
        Ok(())
    }

    pub async fn update_rfid_tag(&self, id: i64, patch: &RfidTagPatch) -> Result<(), ApiError> {
        self.send_json(Method::PATCH, &format!("{RFID_TAGS_PATH}/{id}"), patch)
            .await?;
        Ok(())
    }

    pub async fn delete_rfid_tag(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("{RFID_TAGS_PATH}/{id}")))
            .await?;
        Ok(())
    }

    pub async fn create_work_plan(&self, plan: &NewWorkPlan) -> Result<(), ApiError> {
        self.send_json(Method::POST, WORK_PLANS_PATH, plan).await?;
        Ok(())
    }

    pub async fn delete_work_plan(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("{WORK_PLANS_PATH}/{id}")))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPlanItem;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), 2).unwrap()
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://robot.local:3000/ ", 5).unwrap();
        assert_eq!(client.base_url(), "http://robot.local:3000");
    }

    #[tokio::test]
    async fn fetch_page_sends_page_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/commands"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 1, "command": "STOP"}],
                "totalPages": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server)
            .await
            .fetch_page(Resource::Commands, 2, 15)
            .await
            .unwrap();
        assert_eq!(body["totalPages"], 3);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alert-logs"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .fetch_page(Resource::AlertLogs, 1, 15)
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/obstacle-logs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .fetch_page(Resource::ObstacleLogs, 1, 15)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let client = ApiClient::new("http://127.0.0.1:9", 1).unwrap();
        let err = client.fetch_page(Resource::RobotStatus, 1, 15).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn send_command_posts_the_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/commands/send"))
            .and(body_json(json!({"command": "FORWARD"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .await
            .send_command("FORWARD")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_rfid_tag_sends_only_the_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rfid-tags/4"))
            .and(body_json(json!({"location_name": "Zone B"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4})))
            .expect(1)
            .mount(&server)
            .await;

        let patch = RfidTagPatch {
            location_name: Some("Zone B".into()),
            ..Default::default()
        };
        client_for(&server)
            .await
            .update_rfid_tag(4, &patch)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_work_plan_posts_items() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/work-plans"))
            .and(body_json(json!({
                "description": "Night round",
                "items": [{"rfid_tag_id": 5, "measurement_frequency": 3}],
                "temp_threshold": 2.0,
                "hum_threshold": 5.0,
                "violation_count": 3
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let plan = NewWorkPlan {
            description: "Night round".into(),
            items: vec![NewPlanItem {
                rfid_tag_id: 5,
                measurement_frequency: 3,
            }],
            temp_threshold: 2.0,
            hum_threshold: 5.0,
            violation_count: 3,
        };
        client_for(&server)
            .await
            .create_work_plan(&plan)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_endpoints_use_the_id() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/work-plans/12"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rfid-tags/3"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.delete_work_plan(12).await.unwrap();
        client.delete_rfid_tag(3).await.unwrap();
    }

    #[tokio::test]
    async fn all_rfid_tags_and_latest_command() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rfid-tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 1, "uid": "A1", "location_name": "Dock"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/commands/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 77, "command": "TURN_LEFT", "timestamp": "2024-05-01T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let tags = client.fetch_all_rfid_tags().await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].location_name, "Dock");
        let latest = client.latest_command().await.unwrap().unwrap();
        assert_eq!(latest.command, "TURN_LEFT");
    }
}

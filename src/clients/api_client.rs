/// 题库 API 客户端
///
/// 封装所有与题库服务的 HTTP 调用，每个请求都带 x-access-token 请求头。
/// 失败不自动重试，由操作员重新触发
use crate::clients::store::{ImageStore, RecordStore};
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::question::QuestionRecord;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

/// 访问令牌请求头
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// 题库 API 客户端
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.clone(),
            token: config.access_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 题目 ID 作为查询参数发送（由 reqwest 编码）
    fn fetch_request(&self, id: &str) -> RequestBuilder {
        self.http.get(self.url("questions/")).query(&[("id", id)])
    }

    fn update_request(&self, id: &str) -> RequestBuilder {
        self.http.put(self.url("questions/update/")).query(&[("id", id)])
    }

    /// 发送请求并返回响应正文
    async fn send(&self, request: RequestBuilder, endpoint: &str) -> AppResult<String> {
        let response = request
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        debug!("{} 响应: {} {}", endpoint, status, body);

        if !status.is_success() {
            return Err(AppError::Api(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            }));
        }

        Ok(body)
    }

    /// 发送 JSON 请求
    async fn send_json(&self, request: RequestBuilder, endpoint: &str) -> AppResult<Value> {
        let body = self.send(request, endpoint).await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// 从错误响应中取出 `error` / `message` 字段
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value {
        Value::String(message) => Some(message),
        Value::Object(map) => map
            .get("error")
            .or_else(|| map.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

impl RecordStore for ApiClient {
    async fn fetch_question(&self, id: &str) -> AppResult<QuestionRecord> {
        let endpoint = self.url("questions/");
        let value = self.send_json(self.fetch_request(id), &endpoint).await?;

        if value.is_null() {
            return Err(AppError::Api(ApiError::EmptyResponse { endpoint }));
        }

        Ok(serde_json::from_value(value)?)
    }

    async fn create_question(&self, record: &QuestionRecord) -> AppResult<()> {
        let endpoint = self.url("questions/new");
        debug!("新建题目 Payload: {}", serde_json::to_string(record)?);

        self.send_json(self.http.post(&endpoint).json(record), &endpoint)
            .await?;
        Ok(())
    }

    async fn update_question(&self, id: &str, record: &QuestionRecord) -> AppResult<()> {
        let endpoint = self.url("questions/update/");
        debug!("更新题目 Payload: {}", serde_json::to_string(record)?);

        let request = self.update_request(id).json(record);
        self.send_json(request, &endpoint).await?;
        Ok(())
    }
}

impl ImageStore for ApiClient {
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<String> {
        let endpoint = self.url("images/upload");
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("image", part);

        let body = self
            .send(self.http.post(&endpoint).multipart(form), &endpoint)
            .await?;

        let reference = body.trim();
        if reference.is_empty() {
            return Err(AppError::Api(ApiError::EmptyResponse { endpoint }));
        }
        Ok(reference.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_error_field() {
        assert_eq!(
            error_message(r#"{"error":"Unauthorized","message":"x"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(error_message(r#"{"message":"bad id"}"#).as_deref(), Some("bad id"));
        assert_eq!(error_message(r#""plain""#).as_deref(), Some("plain"));
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn id_is_sent_as_encoded_query() {
        let client = ApiClient::new(&Config::default());

        let fetch = client.fetch_request("a b&c").build().unwrap();
        assert_eq!(
            fetch.url().as_str(),
            "http://localhost:5000/api/questions/?id=a+b%26c"
        );

        let update = client.update_request("q/7").build().unwrap();
        assert_eq!(update.method(), reqwest::Method::PUT);
        assert_eq!(
            update.url().as_str(),
            "http://localhost:5000/api/questions/update/?id=q%2F7"
        );
    }

    #[tokio::test]
    #[ignore] // 需要本地题库服务：cargo test -- --ignored
    async fn fetch_question_from_local_service() {
        let client = ApiClient::new(&Config::from_env());
        let result = client.fetch_question("missing-id").await;
        assert!(result.is_err());
    }
}

use std::time::Duration;

use engine::{EntityKind, ReferenceMaps, RequestError, error_message, fields};
use reqwest::{
    RequestBuilder, Url,
    header::{ACCEPT, LOCATION},
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, Result};

/// A successful write response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    /// Parsed body, `None` when the server sent nothing.
    pub body: Option<Value>,
    /// Last segment of the `Location` header, when it is an id.
    pub location_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::BaseUrl(format!("{base_url} cannot be a base")));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, RequestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestError::Transport(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetches a collection. For warehouses a non-blank `filter` narrows the
    /// list to one location.
    pub async fn list(
        &self,
        kind: EntityKind,
        filter: Option<&str>,
    ) -> std::result::Result<Value, RequestError> {
        let location = filter.map(str::trim).filter(|value| !value.is_empty());
        let endpoint = match (kind, location) {
            (EntityKind::Warehouse, Some(location)) => {
                self.endpoint(&[kind.collection(), "location", location])?
            }
            _ => self.endpoint(&[kind.collection()])?,
        };
        let reply = execute(self.http.get(endpoint)).await?;
        Ok(reply.body.unwrap_or(Value::Null))
    }

    /// Fetches the category, unit and vendor collections concurrently. A
    /// failed fetch only loses hydration for its own kind.
    pub async fn reference_maps(&self) -> ReferenceMaps {
        let (categories, units, vendors) = tokio::join!(
            self.list(EntityKind::Category, None),
            self.list(EntityKind::Unit, None),
            self.list(EntityKind::Vendor, None),
        );
        ReferenceMaps::from_fetches(vec![
            (EntityKind::Category, categories),
            (EntityKind::Unit, units),
            (EntityKind::Vendor, vendors),
        ])
    }

    pub async fn create<T: Serialize>(
        &self,
        kind: EntityKind,
        payload: &T,
    ) -> std::result::Result<Reply, RequestError> {
        let endpoint = self.endpoint(&[kind.collection()])?;
        execute(self.http.post(endpoint).json(payload)).await
    }

    pub async fn update<T: Serialize>(
        &self,
        kind: EntityKind,
        id: i64,
        payload: &T,
    ) -> std::result::Result<Reply, RequestError> {
        let id = id.to_string();
        let endpoint = self.endpoint(&[kind.collection(), id.as_str()])?;
        execute(self.http.put(endpoint).json(payload)).await
    }

    pub async fn delete(&self, kind: EntityKind, id: i64) -> std::result::Result<(), RequestError> {
        let id = id.to_string();
        let endpoint = self.endpoint(&[kind.collection(), id.as_str()])?;
        execute(self.http.delete(endpoint)).await.map(|_| ())
    }
}

async fn execute(request: RequestBuilder) -> std::result::Result<Reply, RequestError> {
    let response = request
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    let url = response.url().clone();
    let location_id = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(location_id);
    let text = response.text().await.map_err(transport)?;
    debug!(%url, status = status.as_u16(), "request settled");

    if !status.is_success() {
        return Err(RequestError::Http {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &text),
        });
    }

    if text.trim().is_empty() {
        return Ok(Reply {
            body: None,
            location_id,
        });
    }
    match serde_json::from_str(&text) {
        Ok(body) => Ok(Reply {
            body: Some(body),
            location_id,
        }),
        Err(err) => {
            debug!(%url, error = %err, "response body is not json");
            Err(RequestError::Malformed(
                "the server response could not be read".to_string(),
            ))
        }
    }
}

fn transport(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Transport("request timed out".to_string())
    } else {
        RequestError::Transport(err.to_string())
    }
}

/// Id at the end of a `Location` header (`/api/units/42` gives 42).
fn location_id(header: &str) -> Option<i64> {
    let path = header.split(['?', '#']).next()?;
    let last = path.trim_end_matches('/').rsplit('/').next()?;
    fields::parse_integer(last)
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        extract::Path,
        http::{StatusCode, header},
        routing::{delete, get, post, put},
    };
    use serde_json::json;

    use super::*;

    async fn serve(router: Router) -> Client {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Client::new(&format!("http://{addr}/api/"), Duration::from_secs(5)).unwrap()
    }

    fn stub() -> Router {
        Router::new()
            .route(
                "/api/units",
                get(|| async {
                    Json(json!({ "data": [{ "unit_id": 1, "code": "EA", "name": "each" }] }))
                })
                .post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "message": ["code should not be empty", "name should not be empty"] })),
                    )
                }),
            )
            .route(
                "/api/units/{id}",
                put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    let mut record = json!({ "unit_id": id, "code": "EA", "name": "each" });
                    if let (Some(record), Some(changes)) = (record.as_object_mut(), body.as_object()) {
                        for (key, value) in changes {
                            record.insert(key.clone(), value.clone());
                        }
                    }
                    Json(record)
                })
                .delete(|| async { StatusCode::NO_CONTENT }),
            )
            .route(
                "/api/vendors",
                get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
            )
            .route("/api/category", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/api/items",
                get(|| async { "<html>not json</html>" }),
            )
            .route(
                "/api/warehouses",
                post(|| async {
                    (
                        StatusCode::CREATED,
                        [(header::LOCATION, "/api/warehouses/42")],
                    )
                }),
            )
            .route(
                "/api/warehouses/location/{location}",
                get(|Path(location): Path<String>| async move {
                    Json(json!([{ "warehouse_id": 1, "name": "Main", "location": location }]))
                }),
            )
            .route("/api/warehouses/{id}", delete(|| async { StatusCode::NO_CONTENT }))
    }

    #[tokio::test]
    async fn list_returns_the_raw_envelope() {
        let client = serve(stub()).await;
        let body = client.list(EntityKind::Unit, None).await.unwrap();
        assert_eq!(engine::envelope::records(&body).len(), 1);
    }

    #[tokio::test]
    async fn error_messages_follow_extraction_order() {
        let client = serve(stub()).await;

        let err = client
            .create(EntityKind::Unit, &json!({ "code": "", "name": "" }))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RequestError::Http {
                status: 400,
                message: "code should not be empty, name should not be empty".to_string(),
            }
        );

        let err = client.list(EntityKind::Vendor, None).await.unwrap_err();
        assert_eq!(err.user_message().as_deref(), Some("upstream down"));

        let err = client.list(EntityKind::Category, None).await.unwrap_err();
        assert_eq!(err.user_message().as_deref(), Some("HTTP 404"));
    }

    #[tokio::test]
    async fn unparseable_success_body_is_malformed() {
        let client = serve(stub()).await;
        let err = client.list(EntityKind::Item, None).await.unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[tokio::test]
    async fn empty_create_reply_carries_location_id() {
        let client = serve(stub()).await;
        let reply = client
            .create(EntityKind::Warehouse, &json!({ "name": "Annex", "location": "Suwon" }))
            .await
            .unwrap();
        assert_eq!(reply.body, None);
        assert_eq!(reply.location_id, Some(42));
    }

    #[tokio::test]
    async fn location_filter_is_a_single_encoded_segment() {
        let client = serve(stub()).await;
        let body = client
            .list(EntityKind::Warehouse, Some("  Seoul Gangnam "))
            .await
            .unwrap();
        assert_eq!(body[0]["location"], "Seoul Gangnam");
    }

    #[tokio::test]
    async fn update_echo_and_bodiless_delete() {
        let client = serve(stub()).await;
        let reply = client
            .update(EntityKind::Unit, 7, &json!({ "name": "piece" }))
            .await
            .unwrap();
        assert_eq!(
            reply.body,
            Some(json!({ "unit_id": 7, "code": "EA", "name": "piece" }))
        );
        client.delete(EntityKind::Unit, 7).await.unwrap();
        client.delete(EntityKind::Warehouse, 3).await.unwrap();
    }

    #[tokio::test]
    async fn failed_reference_fetches_degrade_per_kind() {
        let client = serve(stub()).await;
        let refs = client.reference_maps().await;
        assert_eq!(refs.get(EntityKind::Unit).and_then(|map| map.name(1)), Some("EA"));
        assert!(refs.get(EntityKind::Vendor).is_none());
        assert!(refs.get(EntityKind::Category).is_none());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = Client::new(&format!("http://{addr}/api/"), Duration::from_secs(2)).unwrap();
        let err = client.list(EntityKind::Unit, None).await.unwrap_err();
        assert!(matches!(err, RequestError::Transport(_)));
    }

    #[test]
    fn location_header_ids() {
        assert_eq!(location_id("/api/units/42"), Some(42));
        assert_eq!(location_id("http://host/api/units/42/"), Some(42));
        assert_eq!(location_id("/api/units/42?x=1"), Some(42));
        assert_eq!(location_id("/api/units/new"), None);
    }
}

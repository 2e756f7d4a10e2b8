//! HTTP data source.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use serde_json_path::JsonPath;

use super::SourceOutput;

/// Fixed timeout for API requests.
pub const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Performs a GET on `url`, optionally extracting `json_path` from the body.
///
/// Any status ≥300 is an error carrying the response body. A resolved path
/// is re-serialized pretty-printed.
pub async fn run_api(url: &str, json_path: Option<&str>) -> SourceOutput {
    if url.trim().is_empty() {
        return SourceOutput::failed("Empty URL");
    }

    let client = match reqwest::Client::builder().timeout(API_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => return SourceOutput::failed(format!("Failed to build HTTP client: {e}")),
    };

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return SourceOutput::failed(format!("HTTP GET error: {e}")),
    };

    let status = response.status();
    if status.as_u16() >= 300 {
        let body = response.text().await.unwrap_or_default();
        return SourceOutput::failed(format!(
            "API request failed: status {} {}\n{body}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        ));
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return SourceOutput::failed(format!("Failed to read response body: {e}")),
    };

    let Some(path) = json_path else {
        return SourceOutput::ok(body);
    };

    let document: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => return SourceOutput::failed(format!("Failed to parse API response: {e}")),
    };

    let value = match lookup(&document, path) {
        Ok(value) => value,
        Err(e) => {
            return SourceOutput::failed(format!("Failed to lookup json path '{path}': {e:#}"));
        }
    };

    match serde_json::to_string_pretty(&value) {
        Ok(pretty) => SourceOutput::ok(pretty),
        Err(e) => SourceOutput::failed(format!("Failed to serialize json path result: {e}")),
    }
}

/// Resolves a JSONPath expression against `document`.
///
/// A singular path yields the matched value itself. A path that can select
/// several nodes (wildcards, slices, filters, descendants, unions) yields an
/// array of every match.
///
/// # Errors
/// Returns an error if the path is malformed or a singular path matches
/// nothing.
pub fn lookup(document: &Value, path: &str) -> Result<Value> {
    let compiled = JsonPath::parse(path).context("invalid path")?;
    let nodes = compiled.query(document);
    if selects_many(path) {
        return Ok(Value::Array(nodes.all().into_iter().cloned().collect()));
    }
    nodes.exactly_one().cloned().context("no value at path")
}

fn selects_many(path: &str) -> bool {
    path.contains("..") || path.contains(['*', '?', ':', ','])
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sample() -> Value {
        json!({
            "data": {
                "items": [
                    {"name": "a", "count": 1},
                    {"name": "b", "count": 5},
                    {"name": "c", "count": 3}
                ],
                "odd key": true,
                "empty": null
            }
        })
    }

    #[test]
    fn test_lookup_singular_paths() {
        assert_eq!(lookup(&sample(), "$").unwrap(), sample());
        assert_eq!(lookup(&sample(), "$.data.items[1].name").unwrap(), json!("b"));
        assert_eq!(lookup(&sample(), "$.data.items[-1].count").unwrap(), json!(3));
        assert_eq!(lookup(&sample(), "$.data['odd key']").unwrap(), json!(true));
        assert_eq!(lookup(&sample(), "$.data.empty").unwrap(), Value::Null);
    }

    #[test]
    fn test_lookup_collects_multi_node_paths() {
        assert_eq!(lookup(&sample(), "$.data.items[*].count").unwrap(), json!([1, 5, 3]));
        assert_eq!(lookup(&sample(), "$.data.items[0:2].name").unwrap(), json!(["a", "b"]));
        assert_eq!(lookup(&sample(), "$..name").unwrap(), json!(["a", "b", "c"]));
        assert_eq!(
            lookup(&sample(), "$.data.items[?@.count > 2].name").unwrap(),
            json!(["b", "c"])
        );
    }

    #[test]
    fn test_lookup_single_match_of_wildcard_stays_array() {
        let doc = json!({"items": [7]});
        assert_eq!(lookup(&doc, "$.items[*]").unwrap(), json!([7]));
    }

    #[test]
    fn test_lookup_errors() {
        assert!(lookup(&sample(), "$.data.missing").is_err());
        assert!(lookup(&sample(), "$.data.items[7]").is_err());
        assert!(lookup(&sample(), "data.items").is_err());
        assert!(lookup(&sample(), "$.data[").is_err());
    }

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn test_returns_raw_body_without_path() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("all good"))
            .mount(&server)
            .await;

        let out = run_api(&format!("{}/status", server.uri()), None).await;
        assert_eq!(out, SourceOutput::ok("all good"));
    }

    #[tokio::test]
    async fn test_extracts_and_pretty_prints_path() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"data": {"values": [1, 2]}, "other": true}"#),
            )
            .mount(&server)
            .await;

        let out = run_api(&format!("{}/metrics", server.uri()), Some("$.data.values")).await;
        assert_eq!(out.error, None);
        assert_eq!(out.output, "[\n  1,\n  2\n]");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let out = run_api(&server.uri(), None).await;
        assert_eq!(out.output, "");
        assert_eq!(
            out.error.as_deref(),
            Some("API request failed: status 503 Service Unavailable\nmaintenance")
        );
    }

    #[tokio::test]
    async fn test_unresolved_path_is_error() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"a": 1}"#))
            .mount(&server)
            .await;

        let out = run_api(&server.uri(), Some("$.b")).await;
        assert!(
            out.error
                .unwrap()
                .starts_with("Failed to lookup json path '$.b'")
        );
    }

    #[tokio::test]
    async fn test_empty_url_is_error() {
        assert_eq!(run_api("", None).await, SourceOutput::failed("Empty URL"));
    }
}

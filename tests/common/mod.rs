#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use registro::config::{Config, GraphConfig};
use registro::graph::upload::CHUNK_ALIGNMENT;

pub const TENANT: &str = "test-tenant";
pub const TOKEN: &str = "test-access-token";

/// A running service instance whose token endpoint and Graph API are both mocked.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub graph: MockServer,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a multipart body to `path` with the given Accept header.
    pub async fn post_multipart(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &str)],
        accept: &str,
    ) -> reqwest::Response {
        let (content_type, body) = multipart_body(fields, files);
        self.client
            .post(self.url(path))
            .header("content-type", content_type)
            .header("accept", accept)
            .body(body)
            .send()
            .await
            .expect("multipart request failed")
    }

    /// All requests the mocked Graph API received, in order.
    pub async fn graph_requests(&self) -> Vec<Request> {
        self.graph
            .received_requests()
            .await
            .expect("request recording is enabled")
    }
}

pub fn graph_config(server_uri: &str) -> GraphConfig {
    GraphConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        tenant_id: TENANT.to_string(),
        target_user: None,
        api_url: format!("{server_uri}/v1.0"),
        authority_url: server_uri.to_string(),
        chunk_size: CHUNK_ALIGNMENT,
        retry_delay: Duration::from_millis(10),
        request_timeout: Duration::from_secs(30),
    }
}

pub fn test_config(server_uri: &str) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_folder: "Registro".to_string(),
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
        max_body_size: 16 * 1024 * 1024,
        log_level: "warn".to_string(),
        graph: graph_config(server_uri),
    }
}

/// Token endpoint answering with a one-hour token.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": TOKEN,
        })))
        .mount(server)
        .await;
}

/// Every folder lookup succeeds and every single-shot upload is accepted.
pub async fn mount_permissive_drive(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/v1\.0/me/drive/root:/.+$"))
        .respond_with(ItemFromPath)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/v1\.0/me/drive/root:/.+:/content$"))
        .respond_with(ItemFromPath)
        .mount(server)
        .await;
}

/// Spawn the service against a fresh mock Graph server with a token endpoint.
pub async fn spawn_app() -> TestApp {
    let graph = MockServer::start().await;
    mount_token_endpoint(&graph).await;

    let app = registro::build_app(test_config(&graph.uri())).expect("Failed to build app");

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        graph,
    }
}

/// Responds with a driveItem named after the last segment of the request path.
pub struct ItemFromPath;

impl Respond for ItemFromPath {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let name = item_name(request);
        let status = if request.method.to_string() == "PUT" { 201 } else { 200 };
        let mut item = json!({ "id": format!("id-{name}"), "name": name });
        if request.method.to_string() == "GET" {
            item["folder"] = json!({ "childCount": 0 });
        } else {
            item["size"] = json!(request.body.len());
            item["file"] = json!({});
        }
        ResponseTemplate::new(status).set_body_json(item)
    }
}

/// Decoded item name from `.../root:/a/b/name` or `.../root:/a/b/name:/content`.
pub fn item_name(request: &Request) -> String {
    let path = request.url.path();
    let path = path.strip_suffix(":/content").unwrap_or(path);
    let last = path.rsplit('/').next().unwrap_or_default();
    urlencoding::decode(last)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| last.to_string())
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Build a multipart/form-data body by hand. Returns (content type, body).
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &str)]) -> (String, Vec<u8>) {
    let boundary = "registro-test-boundary";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for (name, filename, content) in files {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

pub fn parse_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("valid JSON body")
}

use std::sync::{Arc, Mutex};

use inventory_web_lib::client::{ApiClient, ClientConfig};
use inventory_web_lib::modules::{AuthSession, MemoryTokenStorage, Navigator};
use inventory_web_lib::proxy::{AxumServer, ProxyConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Visits(Mutex<Vec<String>>);

impl Navigator for Visits {
    fn current_location(&self) -> String {
        "/materials".to_string()
    }

    fn navigate(&self, location: &str) {
        self.0.lock().unwrap().push(location.to_string());
    }
}

async fn gateway(
    backend: &MockServer,
    site: &std::path::Path,
) -> (AxumServer, tokio::task::JoinHandle<()>) {
    let config = ProxyConfig {
        port: 0,
        allow_lan_access: false,
        upstream_url: backend.uri(),
        static_dir: site.to_string_lossy().into_owned(),
        ..ProxyConfig::default()
    };
    AxumServer::start(&config).await.unwrap()
}

#[tokio::test]
async fn client_reaches_backend_through_gateway() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/materials"))
        .and(query_param("keyword", "widget"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/current"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .expect(1)
        .mount(&backend)
        .await;

    let site = tempfile::tempdir().unwrap();
    std::fs::write(site.path().join("index.html"), "<html>app</html>").unwrap();
    let (server, handle) = gateway(&backend, site.path()).await;

    let config = ClientConfig {
        base_url: format!("http://{}/api", server.local_addr()),
        request_timeout: Some(5),
    };
    let visits = Arc::new(Visits::default());
    let session = AuthSession::new(&config)
        .unwrap()
        .with_storage(Arc::new(MemoryTokenStorage::with_token("abc")))
        .with_navigator(visits.clone());
    let client = ApiClient::new(&config, Arc::new(session)).unwrap();

    assert_eq!(client.query_materials("widget").await, vec![json!({ "id": 1 })]);

    assert_eq!(client.get_current_user().await, None);
    assert_eq!(
        *visits.0.lock().unwrap(),
        vec!["/login?redirect=%2Fmaterials".to_string()]
    );
    assert!(!client.session().is_authenticated());

    // Page routes are served by the front end
    let page = reqwest::get(format!("http://{}/stock/3", server.local_addr()))
        .await
        .unwrap();
    assert_eq!(page.status(), 200);
    assert_eq!(page.text().await.unwrap(), "<html>app</html>");

    server.stop();
    handle.await.unwrap();
}

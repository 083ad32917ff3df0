use once_cell::sync::Lazy;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    status: String,
    summary: SummaryBody,
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    columns: Vec<String>,
    shape: [usize; 2],
    missing_values: HashMap<String, u64>,
    data_types: HashMap<String, String>,
    preview: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    status: String,
    analysis: AnalysisBody,
    charts: ChartsBody,
}

#[derive(Debug, Deserialize)]
struct AnalysisBody {
    #[serde(rename = "type")]
    kind: String,
    viz_preference: String,
    insights: Vec<InsightBody>,
    chart_data: ChartDataBody,
}

#[derive(Debug, Deserialize)]
struct InsightBody {
    #[serde(rename = "type")]
    kind: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChartDataBody {
    labels: Vec<String>,
    values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartsBody {
    primary: ChartSpecBody,
    secondary: ChartSpecBody,
}

#[derive(Debug, Deserialize)]
struct ChartSpecBody {
    kind: String,
    labels: Vec<String>,
    values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct MetaBody {
    breadcrumb: String,
}

#[derive(Debug, Deserialize)]
struct NavigateResponse {
    section: String,
    meta: MetaBody,
}

#[derive(Debug, Deserialize)]
struct WorkspaceBody {
    section: String,
    theme: String,
    dataset: Option<serde_json::Value>,
    session_id: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_prefs_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "insight_board_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/workspace")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let prefs_path = unique_prefs_path();
    let child = Command::new(env!("CARGO_BIN_EXE_insight_board"))
        .env("PORT", port.to_string())
        .env("APP_PREFS_PATH", prefs_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn reset_workspace(client: &Client, base_url: &str) {
    let response = client
        .post(format!("{base_url}/api/reset"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn upload_file(
    client: &Client,
    base_url: &str,
    filename: &str,
    bytes: &[u8],
) -> reqwest::Response {
    let part = multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_string());
    let form = multipart::Form::new().part("file", part);
    client
        .post(format!("{base_url}/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

async fn workspace(client: &Client, base_url: &str) -> WorkspaceBody {
    client
        .get(format!("{base_url}/api/workspace"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_upload_csv_loads_preview() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_workspace(&client, &server.base_url).await;

    let csv = b"name,population,area\nOslo,700000,454\nBergen,,465\n";
    let response = upload_file(&client, &server.base_url, "cities.csv", csv).await;
    assert!(response.status().is_success());

    let body: UploadResponse = response.json().await.unwrap();
    assert_eq!(body.status, "success");
    assert!(!body.session_id.is_empty());
    assert_eq!(body.summary.shape, [2, 3]);
    assert_eq!(body.summary.columns, vec!["name", "population", "area"]);
    assert_eq!(body.summary.missing_values["population"], 1);
    assert_eq!(body.summary.data_types["name"], "text");
    assert_eq!(body.summary.data_types["area"], "integer");
    assert_eq!(body.summary.preview.len(), 2);

    let view = workspace(&client, &server.base_url).await;
    assert_eq!(view.section, "preview");
    assert!(view.dataset.is_some());
    assert_eq!(view.session_id.as_deref(), Some(body.session_id.as_str()));
}

#[tokio::test]
async fn http_upload_rejects_unknown_format() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_workspace(&client, &server.base_url).await;

    let response = upload_file(&client, &server.base_url, "report.xlsx", b"binary junk").await;
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Unsupported file format");

    let view = workspace(&client, &server.base_url).await;
    assert_eq!(view.section, "upload");
    assert!(view.dataset.is_none());
    assert!(view.session_id.is_none());
}

#[tokio::test]
async fn http_analyze_without_dataset_errors() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_workspace(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/analyze", server.base_url))
        .json(&serde_json::json!({ "type": "clustering" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No active dataset. Please re-upload your file.");
}

#[tokio::test]
async fn http_analyze_resolves_charts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_workspace(&client, &server.base_url).await;

    let csv = b"x,y\n1,1\n2,1\n3,2\n10,10\n11,11\n12,12\n";
    let uploaded: UploadResponse = upload_file(&client, &server.base_url, "points.csv", csv)
        .await
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/analyze", server.base_url))
        .json(&serde_json::json!({
            "type": "clustering",
            "session_id": uploaded.session_id
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: AnalyzeResponse = response.json().await.unwrap();
    assert_eq!(body.status, "success");
    assert_eq!(body.analysis.kind, "clustering");
    assert_eq!(body.analysis.viz_preference, "auto");
    assert_eq!(body.analysis.insights[0].kind, "ml");
    assert!(body.analysis.insights[0].text.contains("K-Means"));
    let total: f64 = body.analysis.chart_data.values.iter().sum();
    assert_eq!(total, 6.0);
    assert_eq!(body.charts.primary.kind, "doughnut");
    assert_eq!(body.charts.primary.values, body.analysis.chart_data.values);
    assert_eq!(body.charts.secondary.kind, "doughnut");
    assert!(body.charts.secondary.labels.len() <= 3);
    assert_eq!(
        body.charts.secondary.values.len(),
        body.charts.secondary.labels.len()
    );

    let view = workspace(&client, &server.base_url).await;
    assert_eq!(view.section, "results");

    let response = client
        .post(format!("{}/api/analyze", server.base_url))
        .json(&serde_json::json!({
            "type": "descriptive",
            "viz": "hierarchical",
            "session_id": uploaded.session_id
        }))
        .send()
        .await
        .unwrap();
    let body: AnalyzeResponse = response.json().await.unwrap();
    assert_eq!(body.analysis.viz_preference, "hierarchical");
    assert_eq!(body.charts.primary.kind, "polar-area");
    assert_eq!(body.charts.primary.labels, vec!["x", "y"]);
}

#[tokio::test]
async fn http_navigate_requires_dataset() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_workspace(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/navigate", server.base_url))
        .json(&serde_json::json!({ "section": "results" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "Please upload a dataset first.");

    upload_file(&client, &server.base_url, "data.csv", b"v\n1\n2\n").await;

    let response = client
        .post(format!("{}/api/navigate", server.base_url))
        .json(&serde_json::json!({ "section": "results" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: NavigateResponse = response.json().await.unwrap();
    assert_eq!(body.section, "results");
    assert_eq!(body.meta.breadcrumb, "Visualizations");

    let response = client
        .post(format!("{}/api/navigate", server.base_url))
        .json(&serde_json::json!({ "section": "settings" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn http_theme_roundtrip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_workspace(&client, &server.base_url).await;

    let response = client
        .post(format!("{}/api/theme", server.base_url))
        .json(&serde_json::json!({ "theme": "dark" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["theme"], "dark");

    let view = workspace(&client, &server.base_url).await;
    assert_eq!(view.theme, "dark");

    // Reset clears the dataset, not the theme preference.
    reset_workspace(&client, &server.base_url).await;
    let view = workspace(&client, &server.base_url).await;
    assert_eq!(view.theme, "dark");

    let response = client
        .post(format!("{}/api/theme", server.base_url))
        .json(&serde_json::json!({ "theme": "blue" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/theme", server.base_url))
        .json(&serde_json::json!({ "theme": "light" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_stale_session_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset_workspace(&client, &server.base_url).await;

    upload_file(&client, &server.base_url, "data.csv", b"v\n1\n2\n3\n").await;

    let response = client
        .post(format!("{}/api/analyze", server.base_url))
        .json(&serde_json::json!({
            "type": "descriptive",
            "session_id": "stale-token"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No active dataset. Please re-upload your file.");

    // Omitting the token is a same-page retry and still works.
    let response = client
        .post(format!("{}/api/analyze", server.base_url))
        .json(&serde_json::json!({ "type": "descriptive" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: AnalyzeResponse = response.json().await.unwrap();
    assert_eq!(body.analysis.kind, "descriptive");
    assert_eq!(body.analysis.chart_data.labels, vec!["v"]);
    assert_eq!(body.analysis.chart_data.values, vec![2.0]);
}

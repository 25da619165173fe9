use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

use labdeck::api::ApiClient;
use labdeck::credentials::ApiToken;

pub const TOKEN: &str = "aaa.bbb.ccc";

/// In-process stand-in for the platform API, scriptable per test.
#[derive(Clone, Default)]
pub struct Platform(Arc<Mutex<PlatformState>>);

#[derive(Default)]
pub struct PlatformState {
    /// The machine `machine/active` reports, if any.
    pub active: Option<ActiveMachine>,
    /// Make the detail call fail while the summary call succeeds.
    pub fail_detail: bool,
    /// Answer every mutation with this status + message instead of acting.
    pub mutation_failure: Option<(u16, String)>,
    /// Message returned by successful mutations.
    pub message: String,
    /// Request paths seen, for routing assertions.
    pub calls: Vec<String>,
}

#[derive(Clone)]
pub struct ActiveMachine {
    pub id: u64,
    pub name: String,
    pub ip: Option<String>,
    pub seasonal: bool,
}

impl Platform {
    pub fn state(&self) -> MutexGuard<'_, PlatformState> {
        self.0.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }
}

pub struct PlatformGuard {
    pub base_url: String,
    pub platform: Platform,
}

pub async fn spawn_platform() -> PlatformGuard {
    let platform = Platform::default();
    platform.state().message = "Machine deployed to lab.".to_string();

    let app = Router::new()
        .route("/api/v4/machine/active", get(machine_active))
        .route("/api/v4/machine/info/:id", get(machine_info))
        .route("/api/v4/vm/spawn", post(vm_spawn))
        .route("/api/v4/vm/terminate", post(vm_terminate))
        .route("/api/v4/vm/reset", post(vm_reset))
        .route("/api/v4/machine/own", post(machine_own))
        .route("/api/v4/season/machine/spawn", post(season_spawn))
        .route("/api/v4/season/machine/terminate", post(season_terminate))
        .route("/api/v4/season/machine/reset", post(season_reset))
        .route("/api/v4/season/machine/own", post(season_own))
        .with_state(platform.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock platform");
    let addr = listener.local_addr().expect("mock platform addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    PlatformGuard {
        base_url: format!("http://{}", addr),
        platform,
    }
}

pub fn client_for(guard: &PlatformGuard) -> ApiClient {
    let token = ApiToken::new(TOKEN.to_string()).expect("test token");
    ApiClient::new(&guard.base_url, token).expect("build client")
}

// Handlers ------------------------------------------------------------------

fn unauthorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v != format!("Bearer {}", TOKEN))
        .unwrap_or(true)
}

fn reject() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(json!({"message": "Unauthorized"})),
    )
        .into_response()
}

async fn machine_active(State(platform): State<Platform>, headers: HeaderMap) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    let mut state = platform.state();
    state.calls.push("/api/v4/machine/active".to_string());

    let info = match &state.active {
        None => Value::Null,
        Some(machine) => {
            let mut info = json!({"id": machine.id, "name": machine.name});
            if let Some(ip) = &machine.ip {
                info["ip"] = json!(ip);
            }
            if machine.seasonal {
                info["type"] = json!("Seasonal");
            }
            info
        }
    };
    axum::Json(json!({"info": info})).into_response()
}

async fn machine_info(
    State(platform): State<Platform>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    let mut state = platform.state();
    state.calls.push(format!("/api/v4/machine/info/{}", id));

    if state.fail_detail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({"message": "server error"})),
        )
            .into_response();
    }

    axum::Json(json!({
        "info": {
            "id": id,
            "os": "Linux",
            "difficultyText": "Insane",
            "authUserInUserOwns": true,
            "authUserInRootOwns": false,
            "playInfo": {
                "isSpawned": true,
                "isSpawning": false,
                "isActive": true,
                "active_player_count": 3,
                "expires_at": "2026-08-08 12:00:00"
            }
        }
    }))
    .into_response()
}

fn mutate(platform: &Platform, path: &str, spawn_id: Option<u64>) -> Response {
    let mut state = platform.state();
    state.calls.push(path.to_string());

    if let Some((status, message)) = &state.mutation_failure {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST);
        let body = json!({"message": message});
        return (status, axum::Json(body)).into_response();
    }

    if let Some(id) = spawn_id {
        state.active = Some(ActiveMachine {
            id,
            name: format!("box-{}", id),
            ip: Some("10.10.11.9".to_string()),
            seasonal: false,
        });
    }

    axum::Json(json!({"message": state.message})).into_response()
}

async fn vm_spawn(
    State(platform): State<Platform>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    let id = body.get("machine_id").and_then(|v| v.as_u64());
    mutate(&platform, "/api/v4/vm/spawn", id)
}

async fn vm_terminate(
    State(platform): State<Platform>,
    headers: HeaderMap,
    axum::Json(_body): axum::Json<Value>,
) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    let response = mutate(&platform, "/api/v4/vm/terminate", None);
    platform.state().active = None;
    response
}

async fn vm_reset(
    State(platform): State<Platform>,
    headers: HeaderMap,
    axum::Json(_body): axum::Json<Value>,
) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    mutate(&platform, "/api/v4/vm/reset", None)
}

async fn machine_own(
    State(platform): State<Platform>,
    headers: HeaderMap,
    axum::Json(_body): axum::Json<Value>,
) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    mutate(&platform, "/api/v4/machine/own", None)
}

async fn season_spawn(State(platform): State<Platform>, headers: HeaderMap) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    mutate(&platform, "/api/v4/season/machine/spawn", None)
}

async fn season_terminate(State(platform): State<Platform>, headers: HeaderMap) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    mutate(&platform, "/api/v4/season/machine/terminate", None)
}

async fn season_reset(State(platform): State<Platform>, headers: HeaderMap) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    mutate(&platform, "/api/v4/season/machine/reset", None)
}

async fn season_own(State(platform): State<Platform>, headers: HeaderMap) -> Response {
    if unauthorized(&headers) {
        return reject();
    }
    mutate(&platform, "/api/v4/season/machine/own", None)
}

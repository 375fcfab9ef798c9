use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use entity::employee;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use service::{EmployeeError, EmployeeService, NewEmployee};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub employees: EmployeeService,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "staffdir server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeResponse {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}

type HttpResult<T> = Result<T, HttpError>;

async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<NewEmployee>,
) -> HttpResult<(StatusCode, Json<EmployeeResponse>)> {
    let created = state.employees.create(input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn list_employees(State(state): State<AppState>) -> HttpResult<Json<Vec<EmployeeResponse>>> {
    let records = state.employees.list().await?;
    Ok(Json(
        records.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HttpResult<Json<EmployeeResponse>> {
    let record = state
        .employees
        .get_by_id(id)
        .await?
        .ok_or_else(|| HttpError::new(StatusCode::NOT_FOUND, "employee not found"))?;
    Ok(Json(record.into()))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<NewEmployee>,
) -> HttpResult<Json<EmployeeResponse>> {
    let mut existing = state
        .employees
        .get_by_id(id)
        .await?
        .ok_or_else(|| HttpError::new(StatusCode::NOT_FOUND, "employee not found"))?;
    existing.first_name = input.first_name;
    existing.last_name = input.last_name;
    existing.email = input.email;
    let updated = state.employees.update(existing).await?;
    Ok(Json(updated.into()))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HttpResult<&'static str> {
    state.employees.delete_by_id(id).await?;
    Ok("employee deleted")
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.db.get_database_backend();
    let db_ok = state
        .db
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }
}

impl From<EmployeeError> for HttpError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::DuplicateEmail(_) => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            EmployeeError::Db(inner) => {
                error!(error = %inner, "storage failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal server error".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}

use crate::analysis::run_analysis;
use crate::charts::build_charts;
use crate::dataset::parse_upload;
use crate::errors::AppError;
use crate::models::{
    AnalysisKind, AnalysisReport, AnalyzeRequest, AnalyzeResponse, NavigateRequest,
    NavigateResponse, Preferences, Section, Theme, ThemeRequest, ThemeResponse, UploadResponse,
    VizPreference, WorkspaceView,
};
use crate::state::{ActiveDataset, AppState};
use crate::storage::persist_prefs;
use crate::ui::render_index;
use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let workspace = state.workspace.lock().await;
    Html(render_index(&workspace))
}

pub async fn get_workspace(State(state): State<AppState>) -> Result<Json<WorkspaceView>, AppError> {
    let workspace = state.workspace.lock().await;
    Ok(Json(workspace.view()))
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut payload: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::upload_failed(err.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::upload_failed(err.to_string()))?;
            payload = Some((filename, bytes));
        }
    }
    let Some((filename, bytes)) = payload else {
        return Err(AppError::upload_failed("missing 'file' field"));
    };

    let data =
        parse_upload(&filename, &bytes).map_err(|err| AppError::upload_failed(err.to_string()))?;
    let summary = data.summary();
    let session_id = Uuid::new_v4().to_string();

    let mut workspace = state.workspace.lock().await;
    workspace.load_dataset(ActiveDataset {
        session_id: session_id.clone(),
        summary: summary.clone(),
        data,
    });

    Ok(Json(UploadResponse {
        status: "success",
        summary,
        session_id,
    }))
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let kind = AnalysisKind::parse(payload.kind.as_deref());
    let viz = VizPreference::parse(payload.viz.as_deref());

    let mut workspace = state.workspace.lock().await;
    let report = {
        let Some(active) = workspace.dataset_for_session(payload.session_id.as_deref()) else {
            return Err(AppError::analysis_failed(
                "No active dataset. Please re-upload your file.",
            ));
        };
        let analysis = run_analysis(kind, viz, &active.data);
        let charts = build_charts(viz, kind, &analysis.chart_data);
        AnalysisReport { analysis, charts }
    };
    workspace.store_report(report.clone());

    Ok(Json(AnalyzeResponse {
        status: "success",
        analysis: report.analysis,
        charts: report.charts,
    }))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, AppError> {
    let Some(section) = Section::parse(payload.section.trim()) else {
        return Err(AppError::bad_request(format!(
            "unknown section '{}'",
            payload.section
        )));
    };

    let mut workspace = state.workspace.lock().await;
    workspace.navigate(section)?;

    Ok(Json(NavigateResponse {
        section,
        meta: section.meta(),
    }))
}

pub async fn set_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let Some(theme) = Theme::parse(payload.theme.trim()) else {
        return Err(AppError::bad_request("theme must be 'light' or 'dark'"));
    };

    let mut workspace = state.workspace.lock().await;
    workspace.theme = theme;
    persist_prefs(&state.prefs_path, &Preferences { theme }).await?;

    Ok(Json(ThemeResponse { theme }))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<WorkspaceView>, AppError> {
    let mut workspace = state.workspace.lock().await;
    workspace.reset();
    Ok(Json(workspace.view()))
}

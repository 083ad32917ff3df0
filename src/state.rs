use crate::dataset::Dataset;
use crate::errors::AppError;
use crate::models::{AnalysisReport, DatasetSummary, Preferences, Section, Theme, WorkspaceView};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// The dataset currently backing analysis, keyed by its session token.
#[derive(Debug, Clone)]
pub struct ActiveDataset {
    pub session_id: String,
    pub summary: DatasetSummary,
    pub data: Dataset,
}

/// Owned controller state: which section is showing, the theme, the loaded
/// dataset and the last analysis report. One workspace per process.
#[derive(Debug)]
pub struct Workspace {
    pub section: Section,
    pub theme: Theme,
    active: Option<ActiveDataset>,
    report: Option<AnalysisReport>,
}

impl Workspace {
    pub fn new(theme: Theme) -> Self {
        Self {
            section: Section::Upload,
            theme,
            active: None,
            report: None,
        }
    }

    /// Section switch, gated on a loaded dataset for everything past the
    /// upload prompt.
    pub fn navigate(&mut self, section: Section) -> Result<(), AppError> {
        if section != Section::Upload && self.active.is_none() {
            return Err(AppError::bad_request("Please upload a dataset first."));
        }
        self.section = section;
        Ok(())
    }

    /// Install a fresh dataset, dropping any previous report, and move to
    /// the preview section.
    pub fn load_dataset(&mut self, dataset: ActiveDataset) {
        self.active = Some(dataset);
        self.report = None;
        self.section = Section::Preview;
    }

    /// The active dataset, provided the caller's token matches. A missing
    /// token is accepted as a same-page retry.
    pub fn dataset_for_session(&self, session_id: Option<&str>) -> Option<&ActiveDataset> {
        let active = self.active.as_ref()?;
        match session_id {
            Some(token) if token != active.session_id => None,
            _ => Some(active),
        }
    }

    pub fn store_report(&mut self, report: AnalysisReport) {
        self.report = Some(report);
        self.section = Section::Results;
    }

    /// Back to the initial upload prompt. The theme preference survives.
    pub fn reset(&mut self) {
        self.active = None;
        self.report = None;
        self.section = Section::Upload;
    }

    pub fn view(&self) -> WorkspaceView {
        WorkspaceView {
            section: self.section,
            meta: self.section.meta(),
            theme: self.theme,
            dataset: self.active.as_ref().map(|a| a.summary.clone()),
            session_id: self.active.as_ref().map(|a| a.session_id.clone()),
            report: self.report.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub prefs_path: PathBuf,
    pub workspace: Arc<Mutex<Workspace>>,
}

impl AppState {
    pub fn new(prefs_path: PathBuf, prefs: Preferences) -> Self {
        Self {
            prefs_path,
            workspace: Arc::new(Mutex::new(Workspace::new(prefs.theme))),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme preference, persisted across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// On-disk preference file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    pub theme: Theme,
}

/// Dashboard sections, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Upload,
    Preview,
    Analysis,
    Results,
    Insights,
}

#[derive(Debug, Serialize)]
pub struct SectionMeta {
    pub title: &'static str,
    pub desc: &'static str,
    pub breadcrumb: &'static str,
}

impl Section {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "upload" => Some(Self::Upload),
            "preview" => Some(Self::Preview),
            "analysis" => Some(Self::Analysis),
            "results" => Some(Self::Results),
            "insights" => Some(Self::Insights),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Preview => "preview",
            Self::Analysis => "analysis",
            Self::Results => "results",
            Self::Insights => "insights",
        }
    }

    pub fn meta(self) -> &'static SectionMeta {
        match self {
            Self::Upload => &SectionMeta {
                title: "Connect Your Data Source",
                desc: "Upload your dataset to begin automated analysis and intelligent visualization.",
                breadcrumb: "Data Source",
            },
            Self::Preview => &SectionMeta {
                title: "Dataset Overview",
                desc: "Review your data structure and quality metrics.",
                breadcrumb: "Data Preview",
            },
            Self::Analysis => &SectionMeta {
                title: "Configure Analysis",
                desc: "Select analysis type and visualization preferences.",
                breadcrumb: "Configure Analysis",
            },
            Self::Results => &SectionMeta {
                title: "Visual Analytics",
                desc: "Explore your data through intelligent visualizations.",
                breadcrumb: "Visualizations",
            },
            Self::Insights => &SectionMeta {
                title: "AI-Powered Insights",
                desc: "Discover patterns and trends identified by machine learning.",
                breadcrumb: "AI Insights",
            },
        }
    }
}

/// Analysis families the engine understands. Unknown or missing request
/// strings fall back to `Descriptive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisKind {
    #[default]
    Descriptive,
    Clustering,
    Prediction,
    Correlation,
    Trend,
}

impl AnalysisKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("clustering") => Self::Clustering,
            Some("prediction") => Self::Prediction,
            Some("correlation") => Self::Correlation,
            Some("trend") => Self::Trend,
            _ => Self::Descriptive,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Descriptive => "descriptive",
            Self::Clustering => "clustering",
            Self::Prediction => "prediction",
            Self::Correlation => "correlation",
            Self::Trend => "trend",
        }
    }
}

/// User visualization hint steering the primary chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VizPreference {
    #[default]
    Auto,
    Distribution,
    Relational,
    Hierarchical,
    Categorical,
}

impl VizPreference {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("distribution") => Self::Distribution,
            Some("relational") => Self::Relational,
            Some("hierarchical") => Self::Hierarchical,
            Some("categorical") => Self::Categorical,
            _ => Self::Auto,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Distribution => "distribution",
            Self::Relational => "relational",
            Self::Hierarchical => "hierarchical",
            Self::Categorical => "categorical",
        }
    }
}

/// Chart kinds the page renderer understands. The serialized names are part
/// of the wire format; the page script maps them onto Chart.js types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    PolarArea,
    Doughnut,
}

/// What the upload summary reports about a dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub columns: Vec<String>,
    pub shape: [usize; 2],
    pub missing_values: BTreeMap<String, u64>,
    pub data_types: BTreeMap<String, String>,
    pub preview: Vec<serde_json::Map<String, serde_json::Value>>,
    pub uploaded_at: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub summary: DatasetSummary,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub viz: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl Insight {
    pub fn ml(text: impl Into<String>) -> Self {
        Self {
            kind: "ml",
            text: text.into(),
        }
    }

    pub fn stat(text: impl Into<String>) -> Self {
        Self {
            kind: "stat",
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: "warning",
            text: text.into(),
        }
    }
}

/// Analysis result as returned on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub viz_preference: &'static str,
    pub insights: Vec<Insight>,
    pub chart_data: ChartData,
}

/// One chart the page should draw.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Server-resolved rendering plan: one primary chart plus the fixed
/// secondary doughnut.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPair {
    pub primary: ChartSpec,
    pub secondary: ChartSpec,
}

/// Analysis plus its rendering plan; what the workspace retains between
/// requests.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis: Analysis,
    pub charts: ChartPair,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub analysis: Analysis,
    pub charts: ChartPair,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub section: String,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub section: Section,
    pub meta: &'static SectionMeta,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

/// Snapshot of the controller state, served by `GET /api/workspace`.
#[derive(Debug, Serialize)]
pub struct WorkspaceView {
    pub section: Section,
    pub meta: &'static SectionMeta,
    pub theme: Theme,
    pub dataset: Option<DatasetSummary>,
    pub session_id: Option<String>,
    pub report: Option<AnalysisReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_analysis_kind_falls_back_to_descriptive() {
        assert_eq!(AnalysisKind::parse(Some("clustering")), AnalysisKind::Clustering);
        assert_eq!(AnalysisKind::parse(Some("what-even")), AnalysisKind::Descriptive);
        assert_eq!(AnalysisKind::parse(None), AnalysisKind::Descriptive);
    }

    #[test]
    fn unknown_viz_falls_back_to_auto() {
        assert_eq!(VizPreference::parse(Some("hierarchical")), VizPreference::Hierarchical);
        assert_eq!(VizPreference::parse(Some("")), VizPreference::Auto);
        assert_eq!(VizPreference::parse(None), VizPreference::Auto);
    }

    #[test]
    fn section_names_round_trip() {
        for section in [
            Section::Upload,
            Section::Preview,
            Section::Analysis,
            Section::Results,
            Section::Insights,
        ] {
            assert_eq!(Section::parse(section.as_str()), Some(section));
        }
        assert_eq!(Section::parse("settings"), None);
    }

    #[test]
    fn chart_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ChartKind::PolarArea).unwrap();
        assert_eq!(json, "\"polar-area\"");
        let json = serde_json::to_string(&ChartKind::Doughnut).unwrap();
        assert_eq!(json, "\"doughnut\"");
    }

    #[test]
    fn insight_serializes_type_field() {
        let insight = Insight::warning("not enough rows");
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["text"], "not enough rows");
    }
}

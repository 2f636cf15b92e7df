//! Learning path templates and their per-student assignments.
//!
//! `*Dto` types mirror the path service's snake_case payloads with numeric
//! category ids; the plain types are what callers work with.

use super::common::{id_to_string, opt_id_to_string, AssignmentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCategory {
    Math,
    Science,
    Language,
    History,
    Art,
    Other,
}

impl PathCategory {
    /// Unknown ids map to `Other`.
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => PathCategory::Math,
            2 => PathCategory::Science,
            3 => PathCategory::Language,
            4 => PathCategory::History,
            5 => PathCategory::Art,
            _ => PathCategory::Other,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            PathCategory::Math => 1,
            PathCategory::Science => 2,
            PathCategory::Language => 3,
            PathCategory::History => 4,
            PathCategory::Art => 5,
            PathCategory::Other => 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathStepDto {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quiz_id: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathTemplateDto {
    pub id: serde_json::Value,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub steps: Vec<PathStepDto>,
    #[serde(default)]
    pub estimated_days: Option<u32>,
    #[serde(default)]
    pub created_by: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
    pub title: String,
    pub description: String,
    pub quiz_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: PathCategory,
    pub steps: Vec<PathStep>,
    pub estimated_days: Option<u32>,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<PathStepDto> for PathStep {
    fn from(dto: PathStepDto) -> Self {
        PathStep {
            title: dto.title,
            description: dto.description.unwrap_or_default(),
            quiz_id: opt_id_to_string(&dto.quiz_id),
        }
    }
}

impl From<&PathStep> for PathStepDto {
    fn from(step: &PathStep) -> Self {
        PathStepDto {
            title: step.title.clone(),
            description: Some(step.description.clone()),
            quiz_id: step.quiz_id.clone().map(serde_json::Value::String),
        }
    }
}

impl From<PathTemplateDto> for PathTemplate {
    fn from(dto: PathTemplateDto) -> Self {
        PathTemplate {
            id: id_to_string(&dto.id),
            title: dto.title,
            description: dto.description.unwrap_or_default(),
            category: PathCategory::from_id(dto.category_id),
            steps: dto.steps.into_iter().map(PathStep::from).collect(),
            estimated_days: dto.estimated_days,
            created_by: opt_id_to_string(&dto.created_by),
            created_at: dto.created_at,
        }
    }
}

/// Input for creating or replacing a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPathTemplate {
    pub title: String,
    pub description: String,
    pub category: PathCategory,
    pub steps: Vec<PathStep>,
    pub estimated_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathTemplateRequest {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub steps: Vec<PathStepDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u32>,
}

impl From<&NewPathTemplate> for PathTemplateRequest {
    fn from(template: &NewPathTemplate) -> Self {
        PathTemplateRequest {
            title: template.title.clone(),
            description: template.description.clone(),
            category_id: template.category.id(),
            steps: template.steps.iter().map(PathStepDto::from).collect(),
            estimated_days: template.estimated_days,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignPathRequest {
    pub template_id: String,
    pub student_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignedPathDto {
    pub id: serde_json::Value,
    pub template_id: serde_json::Value,
    pub student_id: serde_json::Value,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub template: Option<PathTemplateDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedPath {
    pub id: String,
    pub template_id: String,
    pub student_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AssignmentStatus,
    /// Percentage in `0.0..=100.0`.
    pub progress: f64,
    pub template: Option<PathTemplate>,
}

impl From<AssignedPathDto> for AssignedPath {
    fn from(dto: AssignedPathDto) -> Self {
        AssignedPath {
            id: id_to_string(&dto.id),
            template_id: id_to_string(&dto.template_id),
            student_id: id_to_string(&dto.student_id),
            start_date: dto.start_date,
            end_date: dto.end_date,
            status: dto
                .status
                .as_deref()
                .map(AssignmentStatus::from_backend)
                .unwrap_or(AssignmentStatus::NotStarted),
            progress: dto.progress.clamp(0.0, 100.0),
            template: dto.template.map(PathTemplate::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdateRequest {
    pub progress: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_ids_round_trip() {
        for category in [
            PathCategory::Math,
            PathCategory::Science,
            PathCategory::Language,
            PathCategory::History,
            PathCategory::Art,
            PathCategory::Other,
        ] {
            assert_eq!(PathCategory::from_id(category.id()), category);
        }
        assert_eq!(PathCategory::from_id(42), PathCategory::Other);
    }

    #[test]
    fn test_template_from_backend_shape() {
        let dto: PathTemplateDto = serde_json::from_value(json!({
            "id": 12,
            "title": "Fractions",
            "category_id": 1,
            "estimated_days": 14,
            "created_by": 3,
            "steps": [
                {"title": "Halves", "quiz_id": 99},
                {"title": "Quarters", "description": "Cut it again"}
            ]
        }))
        .unwrap();

        let template = PathTemplate::from(dto);
        assert_eq!(template.id, "12");
        assert_eq!(template.category, PathCategory::Math);
        assert_eq!(template.description, "");
        assert_eq!(template.created_by.as_deref(), Some("3"));
        assert_eq!(template.steps[0].quiz_id.as_deref(), Some("99"));
        assert_eq!(template.steps[1].description, "Cut it again");
    }

    #[test]
    fn test_frontend_shape_is_camel_case() {
        let template = PathTemplate {
            id: "1".to_string(),
            title: "X".to_string(),
            description: String::new(),
            category: PathCategory::Art,
            steps: vec![],
            estimated_days: Some(3),
            created_by: None,
            created_at: None,
        };
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["estimatedDays"], json!(3));
        assert_eq!(value["category"], json!("art"));
    }

    #[test]
    fn test_request_uses_category_id() {
        let input = NewPathTemplate {
            title: "Volcanoes".to_string(),
            description: "Earth science".to_string(),
            category: PathCategory::Science,
            steps: vec![PathStep {
                title: "Magma".to_string(),
                description: String::new(),
                quiz_id: Some("5".to_string()),
            }],
            estimated_days: None,
        };

        let value = serde_json::to_value(PathTemplateRequest::from(&input)).unwrap();
        assert_eq!(value["category_id"], json!(2));
        assert_eq!(value["steps"][0]["quiz_id"], json!("5"));
        assert!(value.get("estimated_days").is_none());
    }

    #[test]
    fn test_assignment_progress_is_clamped() {
        let dto: AssignedPathDto = serde_json::from_value(json!({
            "id": "a1",
            "template_id": 1,
            "student_id": 2,
            "start_date": "2024-09-01",
            "end_date": "2024-09-30",
            "status": "in_progress",
            "progress": 130.0
        }))
        .unwrap();

        let assigned = AssignedPath::from(dto);
        assert_eq!(assigned.progress, 100.0);
        assert_eq!(assigned.status, AssignmentStatus::InProgress);
        assert_eq!(assigned.student_id, "2");
    }
}

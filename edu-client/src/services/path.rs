//! Learning path templates and their assignment to students.

use crate::models::path::{
    AssignPathRequest, AssignedPath, AssignedPathDto, NewPathTemplate, PathTemplate,
    PathTemplateDto, PathTemplateRequest, ProgressUpdateRequest,
};
use crate::services::http::ApiClient;
use chrono::NaiveDate;
use client_core::ApiError;
use urlencoding::encode;

const TEMPLATES_PATH: &str = "/api/paths/templates";
const ASSIGNMENTS_PATH: &str = "/api/paths/assignments";

fn template_url(id: &str) -> String {
    format!("{}/{}", TEMPLATES_PATH, encode(id))
}

fn assignment_url(id: &str) -> String {
    format!("{}/{}", ASSIGNMENTS_PATH, encode(id))
}

#[derive(Clone)]
pub struct PathService {
    api: ApiClient,
}

impl PathService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_templates(&self) -> Result<Vec<PathTemplate>, ApiError> {
        let templates: Vec<PathTemplateDto> = self.api.get_list(TEMPLATES_PATH).await?;
        Ok(templates.into_iter().map(PathTemplate::from).collect())
    }

    pub async fn get_template(&self, id: &str) -> Result<PathTemplate, ApiError> {
        let template: PathTemplateDto = self.api.get(&template_url(id)).await?;
        Ok(template.into())
    }

    pub async fn create_template(
        &self,
        template: &NewPathTemplate,
    ) -> Result<PathTemplate, ApiError> {
        let created: PathTemplateDto = self
            .api
            .post(TEMPLATES_PATH, &PathTemplateRequest::from(template))
            .await?;
        let created = PathTemplate::from(created);

        tracing::info!(template_id = %created.id, "Path template created");
        self.api
            .notify_success(&format!("Learning path \"{}\" created", created.title));
        Ok(created)
    }

    pub async fn update_template(
        &self,
        id: &str,
        template: &NewPathTemplate,
    ) -> Result<PathTemplate, ApiError> {
        let updated: PathTemplateDto = self
            .api
            .put(&template_url(id), &PathTemplateRequest::from(template))
            .await?;
        let updated = PathTemplate::from(updated);

        tracing::info!(template_id = %updated.id, "Path template updated");
        self.api
            .notify_success(&format!("Learning path \"{}\" updated", updated.title));
        Ok(updated)
    }

    pub async fn delete_template(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&template_url(id)).await?;

        tracing::info!(template_id = %id, "Path template deleted");
        self.api.notify_success("Learning path deleted");
        Ok(())
    }

    /// Give a student a path to work through between `start_date` and `end_date`.
    pub async fn assign(
        &self,
        template_id: &str,
        student_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AssignedPath, ApiError> {
        if end_date < start_date {
            return Err(ApiError::Validation {
                status: 400,
                message: "End date must not be before start date".to_string(),
                fields: vec![client_core::FieldError {
                    field: "end_date".to_string(),
                    message: "must not be before start date".to_string(),
                }],
            });
        }

        let request = AssignPathRequest {
            template_id: template_id.to_string(),
            student_id: student_id.to_string(),
            start_date,
            end_date,
        };
        let assigned: AssignedPathDto = self.api.post(ASSIGNMENTS_PATH, &request).await?;
        let assigned = AssignedPath::from(assigned);

        tracing::info!(
            assignment_id = %assigned.id,
            template_id = %template_id,
            student_id = %student_id,
            "Path assigned"
        );
        self.api.notify_success("Learning path assigned");
        Ok(assigned)
    }

    pub async fn get_student_paths(&self, student_id: &str) -> Result<Vec<AssignedPath>, ApiError> {
        let assigned: Vec<AssignedPathDto> = self
            .api
            .get_list(&format!("/api/paths/students/{}", encode(student_id)))
            .await?;
        Ok(assigned.into_iter().map(AssignedPath::from).collect())
    }

    /// Record progress on an assignment. Values are clamped to `0..=100`.
    pub async fn update_progress(
        &self,
        assignment_id: &str,
        progress: f64,
    ) -> Result<AssignedPath, ApiError> {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 100.0)
        };

        let updated: AssignedPathDto = self
            .api
            .put(
                &format!("{}/progress", assignment_url(assignment_id)),
                &ProgressUpdateRequest { progress },
            )
            .await?;

        self.api.notify_success("Progress saved");
        Ok(updated.into())
    }
}

use crate::models::quiz::{
    AssignQuizRequest, AssignedQuiz, AssignedQuizDto, NewQuizTemplate, QuizResult, QuizResultDto,
    QuizTemplate, QuizTemplateDto, QuizTemplateRequest, SubmitAttemptRequest,
};
use crate::services::http::ApiClient;
use chrono::NaiveDate;
use client_core::ApiError;
use urlencoding::encode;

const TEMPLATES_PATH: &str = "/api/quizzes/templates";
const ASSIGNMENTS_PATH: &str = "/api/quizzes/assignments";

fn template_url(id: &str) -> String {
    format!("{}/{}", TEMPLATES_PATH, encode(id))
}

fn assignment_url(id: &str) -> String {
    format!("{}/{}", ASSIGNMENTS_PATH, encode(id))
}

#[derive(Clone)]
pub struct QuizService {
    api: ApiClient,
}

impl QuizService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_templates(&self) -> Result<Vec<QuizTemplate>, ApiError> {
        let templates: Vec<QuizTemplateDto> = self.api.get_list(TEMPLATES_PATH).await?;
        Ok(templates.into_iter().map(QuizTemplate::from).collect())
    }

    pub async fn get_template(&self, id: &str) -> Result<QuizTemplate, ApiError> {
        let template: QuizTemplateDto = self.api.get(&template_url(id)).await?;
        Ok(template.into())
    }

    pub async fn create_template(
        &self,
        template: &NewQuizTemplate,
    ) -> Result<QuizTemplate, ApiError> {
        let created: QuizTemplateDto = self
            .api
            .post(TEMPLATES_PATH, &QuizTemplateRequest::from(template))
            .await?;
        let created = QuizTemplate::from(created);

        tracing::info!(quiz_id = %created.id, questions = created.questions.len(), "Quiz created");
        self.api
            .notify_success(&format!("Quiz \"{}\" created", created.title));
        Ok(created)
    }

    pub async fn update_template(
        &self,
        id: &str,
        template: &NewQuizTemplate,
    ) -> Result<QuizTemplate, ApiError> {
        let updated: QuizTemplateDto = self
            .api
            .put(&template_url(id), &QuizTemplateRequest::from(template))
            .await?;

        self.api.notify_success("Quiz updated");
        Ok(updated.into())
    }

    pub async fn delete_template(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&template_url(id)).await?;

        tracing::info!(quiz_id = %id, "Quiz deleted");
        self.api.notify_success("Quiz deleted");
        Ok(())
    }

    pub async fn assign(
        &self,
        template_id: &str,
        student_id: &str,
        due_date: Option<NaiveDate>,
    ) -> Result<AssignedQuiz, ApiError> {
        let request = AssignQuizRequest {
            template_id: template_id.to_string(),
            student_id: student_id.to_string(),
            due_date,
        };
        let assigned: AssignedQuizDto = self.api.post(ASSIGNMENTS_PATH, &request).await?;

        self.api.notify_success("Quiz assigned");
        Ok(assigned.into())
    }

    pub async fn get_student_quizzes(
        &self,
        student_id: &str,
    ) -> Result<Vec<AssignedQuiz>, ApiError> {
        let assigned: Vec<AssignedQuizDto> = self
            .api
            .get_list(&format!("/api/quizzes/students/{}", encode(student_id)))
            .await?;
        Ok(assigned.into_iter().map(AssignedQuiz::from).collect())
    }

    /// Submit one answer index per question, in question order.
    pub async fn submit_attempt(
        &self,
        assignment_id: &str,
        answers: Vec<usize>,
    ) -> Result<QuizResult, ApiError> {
        let result: QuizResultDto = self
            .api
            .post(
                &format!("{}/attempts", assignment_url(assignment_id)),
                &SubmitAttemptRequest { answers },
            )
            .await?;
        let result = QuizResult::from(result);

        tracing::info!(
            assignment_id = %assignment_id,
            score = result.score,
            max_score = result.max_score,
            "Quiz attempt submitted"
        );
        if result.points_earned > 0 {
            self.api.notify_success(&format!(
                "Quiz complete! You earned {} points",
                result.points_earned
            ));
        } else {
            self.api.notify_success("Quiz submitted");
        }
        Ok(result)
    }
}

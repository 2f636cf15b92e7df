use super::common::{id_to_string, opt_id_to_string, AssignmentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Unknown levels are treated as medium.
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Difficulty::Easy,
            3 => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn level(&self) -> i64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuizQuestionDto {
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_option: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

impl From<QuizQuestionDto> for QuizQuestion {
    fn from(dto: QuizQuestionDto) -> Self {
        QuizQuestion {
            prompt: dto.question_text,
            options: dto.options,
            correct_option: dto.correct_option,
        }
    }
}

impl From<&QuizQuestion> for QuizQuestionDto {
    fn from(question: &QuizQuestion) -> Self {
        QuizQuestionDto {
            question_text: question.prompt.clone(),
            options: question.options.clone(),
            correct_option: question.correct_option,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizTemplateDto {
    pub id: serde_json::Value,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty_level: i64,
    #[serde(default)]
    pub questions: Vec<QuizQuestionDto>,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(default)]
    pub points_reward: u32,
    #[serde(default)]
    pub created_by: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
    pub time_limit_minutes: Option<u32>,
    pub points_reward: u32,
    pub created_by: Option<String>,
}

impl From<QuizTemplateDto> for QuizTemplate {
    fn from(dto: QuizTemplateDto) -> Self {
        QuizTemplate {
            id: id_to_string(&dto.id),
            title: dto.title,
            description: dto.description.unwrap_or_default(),
            difficulty: Difficulty::from_level(dto.difficulty_level),
            questions: dto.questions.into_iter().map(QuizQuestion::from).collect(),
            time_limit_minutes: dto.time_limit_minutes,
            points_reward: dto.points_reward,
            created_by: opt_id_to_string(&dto.created_by),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuizTemplate {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
    pub time_limit_minutes: Option<u32>,
    pub points_reward: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizTemplateRequest {
    pub title: String,
    pub description: String,
    pub difficulty_level: i64,
    pub questions: Vec<QuizQuestionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    pub points_reward: u32,
}

impl From<&NewQuizTemplate> for QuizTemplateRequest {
    fn from(template: &NewQuizTemplate) -> Self {
        QuizTemplateRequest {
            title: template.title.clone(),
            description: template.description.clone(),
            difficulty_level: template.difficulty.level(),
            questions: template.questions.iter().map(QuizQuestionDto::from).collect(),
            time_limit_minutes: template.time_limit_minutes,
            points_reward: template.points_reward,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignQuizRequest {
    pub template_id: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignedQuizDto {
    pub id: serde_json::Value,
    pub template_id: serde_json::Value,
    pub student_id: serde_json::Value,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub best_score: Option<u32>,
    #[serde(default)]
    pub template: Option<QuizTemplateDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedQuiz {
    pub id: String,
    pub template_id: String,
    pub student_id: String,
    pub due_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    pub best_score: Option<u32>,
    pub template: Option<QuizTemplate>,
}

impl From<AssignedQuizDto> for AssignedQuiz {
    fn from(dto: AssignedQuizDto) -> Self {
        AssignedQuiz {
            id: id_to_string(&dto.id),
            template_id: id_to_string(&dto.template_id),
            student_id: id_to_string(&dto.student_id),
            due_date: dto.due_date,
            status: dto
                .status
                .as_deref()
                .map(AssignmentStatus::from_backend)
                .unwrap_or(AssignmentStatus::NotStarted),
            best_score: dto.best_score,
            template: dto.template.map(QuizTemplate::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAttemptRequest {
    /// Selected option index per question, in question order.
    pub answers: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizResultDto {
    pub assignment_id: serde_json::Value,
    pub score: u32,
    pub max_score: u32,
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub assignment_id: String,
    pub score: u32,
    pub max_score: u32,
    pub points_earned: u32,
    pub passed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Share of correct answers needed to pass, in percent.
pub const PASSING_PERCENT: u32 = 60;

impl From<QuizResultDto> for QuizResult {
    fn from(dto: QuizResultDto) -> Self {
        let passed = dto.max_score > 0 && dto.score * 100 >= dto.max_score * PASSING_PERCENT;
        QuizResult {
            assignment_id: id_to_string(&dto.assignment_id),
            score: dto.score,
            max_score: dto.max_score,
            points_earned: dto.points_earned,
            passed,
            completed_at: dto.completed_at,
        }
    }
}

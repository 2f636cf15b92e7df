use crate::models::student::{
    NewStudent, PointsBalance, PointsBalanceDto, Student, StudentDto, StudentRequest,
};
use crate::services::http::ApiClient;
use client_core::ApiError;
use urlencoding::encode;

const STUDENTS_PATH: &str = "/api/students";

fn student_url(id: &str) -> String {
    format!("{}/{}", STUDENTS_PATH, encode(id))
}

#[derive(Clone)]
pub struct StudentService {
    api: ApiClient,
}

impl StudentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Students visible to the caller: all for admins, own children for parents.
    pub async fn get_all(&self) -> Result<Vec<Student>, ApiError> {
        let students: Vec<StudentDto> = self.api.get_list(STUDENTS_PATH).await?;
        Ok(students.into_iter().map(Student::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Student, ApiError> {
        let student: StudentDto = self.api.get(&student_url(id)).await?;
        Ok(student.into())
    }

    pub async fn create(&self, student: &NewStudent) -> Result<Student, ApiError> {
        let created: StudentDto = self
            .api
            .post(STUDENTS_PATH, &StudentRequest::from(student))
            .await?;
        let created = Student::from(created);

        tracing::info!(student_id = %created.id, "Student created");
        self.api
            .notify_success(&format!("{} added", created.full_name()));
        Ok(created)
    }

    pub async fn update(&self, id: &str, student: &NewStudent) -> Result<Student, ApiError> {
        let updated: StudentDto = self
            .api
            .put(&student_url(id), &StudentRequest::from(student))
            .await?;

        self.api.notify_success("Student updated");
        Ok(updated.into())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&student_url(id)).await?;

        tracing::info!(student_id = %id, "Student deleted");
        self.api.notify_success("Student removed");
        Ok(())
    }

    pub async fn get_points(&self, student_id: &str) -> Result<PointsBalance, ApiError> {
        let balance: PointsBalanceDto = self
            .api
            .get(&format!("{}/points", student_url(student_id)))
            .await?;
        Ok(balance.into())
    }
}

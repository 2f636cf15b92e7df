use super::common::{id_to_string, opt_id_to_string};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct StudentDto {
    pub id: serde_json::Value,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub grade_level: Option<u8>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub parent_id: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub grade_level: Option<u8>,
    pub points: i64,
    pub parent_id: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl From<StudentDto> for Student {
    fn from(dto: StudentDto) -> Self {
        Student {
            id: id_to_string(&dto.id),
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            grade_level: dto.grade_level,
            points: dto.points,
            parent_id: opt_id_to_string(&dto.parent_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub grade_level: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<u8>,
}

impl From<&NewStudent> for StudentRequest {
    fn from(student: &NewStudent) -> Self {
        StudentRequest {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            grade_level: student.grade_level,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointsBalanceDto {
    pub student_id: serde_json::Value,
    #[serde(alias = "total_points")]
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsBalance {
    pub student_id: String,
    pub points: i64,
}

impl From<PointsBalanceDto> for PointsBalance {
    fn from(dto: PointsBalanceDto) -> Self {
        PointsBalance {
            student_id: id_to_string(&dto.student_id),
            points: dto.points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_mapping() {
        let dto: StudentDto = serde_json::from_value(json!({
            "id": 9,
            "first_name": "Lin",
            "last_name": "Chen",
            "grade_level": 4,
            "points": 120,
            "parent_id": 2
        }))
        .unwrap();

        let student = Student::from(dto);
        assert_eq!(student.id, "9");
        assert_eq!(student.full_name(), "Lin Chen");
        assert_eq!(student.parent_id.as_deref(), Some("2"));

        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["gradeLevel"], json!(4));
    }

    #[test]
    fn test_points_accepts_total_points_alias() {
        let dto: PointsBalanceDto =
            serde_json::from_value(json!({"student_id": "s1", "total_points": 75})).unwrap();
        assert_eq!(PointsBalance::from(dto).points, 75);
    }
}

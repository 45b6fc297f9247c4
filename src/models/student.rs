// src/models/student.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,14}$").expect("phone regex is valid"));

/// Represents the 'students' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub school: String,
    pub father_name: String,
    pub mother_name: String,
    pub address: String,
    pub favourite_subject: String,

    /// Free-form class label as entered on the form (e.g. "10").
    pub class_level: String,

    /// Stream, e.g. "Science" or "Commerce".
    pub stream: String,
    pub father_occupation: String,
    pub mother_occupation: String,
    pub phone: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for registering a student.
/// Missing fields deserialize as empty and are reported by validation.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub school: String,
    #[validate(length(min = 1, max = 100))]
    pub father_name: String,
    #[validate(length(min = 1, max = 100))]
    pub mother_name: String,
    #[validate(length(min = 1, max = 1000))]
    pub address: String,
    #[validate(length(max = 100))]
    pub favourite_subject: String,
    #[validate(length(min = 1, max = 10, message = "Class level is required."))]
    pub class_level: String,
    #[validate(length(min = 1, max = 20, message = "Stream is required."))]
    pub stream: String,
    #[validate(length(max = 100))]
    pub father_occupation: String,
    #[validate(length(max = 100))]
    pub mother_occupation: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone must be 7 to 14 digits, optionally prefixed with '+'."))]
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateStudentRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Asha Rao",
            "school": "Green Valley High",
            "fatherName": "Ravi Rao",
            "motherName": "Meena Rao",
            "address": "12 Main Road, Pune",
            "favouriteSubject": "Math",
            "classLevel": "10",
            "stream": "Science",
            "fatherOccupation": "Engineer",
            "motherOccupation": "Teacher",
            "phone": "9876543210"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_bad_phone_is_reported_per_field() {
        let mut req = request();
        req.phone = "call me".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_missing_fields_are_reported_per_field() {
        let req: CreateStudentRequest =
            serde_json::from_value(serde_json::json!({ "name": "Asha" })).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("school"));
        assert!(fields.contains_key("phone"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_missing_class_level_is_rejected() {
        let mut req = request();
        req.class_level = String::new();
        assert!(req.validate().is_err());
    }
}

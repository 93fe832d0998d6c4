//! Records for the thirteen backend resources. Field spelling follows
//! the wire exactly (`_id`, camelCase); anything the backend may omit or
//! return un-joined stays optional.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Keyed;

/// A relation the backend may or may not have expanded. Depending on the
/// endpoint (and on whether the join ran), the same field arrives as a
/// raw id string or as the joined object, so both shapes must decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FkRef<T> {
    Resolved(T),
    Unresolved(String),
}

impl<T: Keyed> FkRef<T> {
    pub fn id(&self) -> &str {
        match self {
            FkRef::Resolved(record) => record.key(),
            FkRef::Unresolved(id) => id,
        }
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            FkRef::Resolved(record) => Some(record),
            FkRef::Unresolved(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub dob: Option<DateTime<Utc>>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub mother_name: Option<String>,
    #[serde(default)]
    pub father_phone: Option<String>,
    #[serde(default)]
    pub mother_phone: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: Option<FkRef<Subject>>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institute {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject_fee: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionYear {
    #[serde(rename = "_id")]
    pub id: String,
    pub year_name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub course_type: Option<String>,
    #[serde(default)]
    pub course_fee: f64,
    #[serde(default)]
    pub session_year: Option<FkRef<SessionYear>>,
    #[serde(default)]
    pub subject_ids: Vec<FkRef<Subject>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(rename = "_id")]
    pub id: String,
    pub batch_name: String,
    #[serde(default)]
    pub session_year_id: Option<FkRef<SessionYear>>,
    #[serde(default)]
    pub location_id: Option<FkRef<Location>>,
    #[serde(default)]
    pub course_id: Option<FkRef<Course>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchClass {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub batch_id: Option<FkRef<Batch>>,
    #[serde(default)]
    pub subject_id: Option<FkRef<Subject>>,
    #[serde(default)]
    pub teacher_id: Option<FkRef<Teacher>>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStudent {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub batch_id: Option<FkRef<Batch>>,
    #[serde(default)]
    pub student_id: Option<FkRef<Student>>,
    #[serde(default)]
    pub installment_type: Option<String>,
    #[serde(default)]
    pub number_of_installments: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub batch_class_id: Option<FkRef<BatchClass>>,
    #[serde(default)]
    pub batch_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub class_type: Option<String>,
    #[serde(default)]
    pub session_mode: Option<String>,
    #[serde(default)]
    pub subject_id: Option<FkRef<Subject>>,
    #[serde(default)]
    pub teacher_id: Option<FkRef<Teacher>>,
    #[serde(default)]
    pub absent_notification: bool,
    #[serde(default)]
    pub present_notification: bool,
    #[serde(default)]
    pub session_type: Option<String>,
    /// Recurrence fields as submitted; shape varies by session type, so
    /// the cache carries them opaquely.
    #[serde(default)]
    pub schedule_details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub session_id: Option<FkRef<ClassSession>>,
    #[serde(default)]
    pub student_id: Option<FkRef<Student>>,
    #[serde(default)]
    pub attendance_type: Option<String>,
    #[serde(default)]
    pub attendance_source: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

macro_rules! keyed_by_id {
    ($($ty:ty),+ $(,)?) => {
        $(impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.id
            }
        })+
    };
}

keyed_by_id!(
    UserProfile,
    Student,
    Teacher,
    Institute,
    Location,
    Subject,
    SessionYear,
    Course,
    Batch,
    BatchClass,
    BatchStudent,
    ClassSession,
    Attendance,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fk_ref_decodes_raw_id_and_expanded_object() {
        let raw: FkRef<SessionYear> = serde_json::from_value(serde_json::json!(
            "66b2a1"
        ))
        .expect("raw id");
        assert_eq!(raw.id(), "66b2a1");
        assert!(raw.resolved().is_none());

        let expanded: FkRef<SessionYear> = serde_json::from_value(serde_json::json!({
            "_id": "66b2a1",
            "yearName": "2024-25"
        }))
        .expect("expanded object");
        assert_eq!(expanded.id(), "66b2a1");
        assert_eq!(expanded.resolved().map(|y| y.year_name.as_str()), Some("2024-25"));
    }
}

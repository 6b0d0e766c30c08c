use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::derive::{
    active_patient_count, fallback_email, last_login_date, last_session_phrase, numeric_id,
};
use super::fields::{resolve, resolve_text};
use crate::store::Record;

/// A patient as shown under a therapist on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientView {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub age: Option<Value>,
    pub status: String,
    pub last_session: String,
    pub risk_level: Option<String>,
    pub screening_stage: Option<String>,
}

impl PatientView {
    pub fn from_record(record: &Record, today: NaiveDate) -> Self {
        Self {
            id: resolve(record, &["patient_id", "id"]).cloned(),
            name: resolve_text(record, &["name", "patient_name", "full_name"]),
            age: resolve(record, &["age", "patient_age"]).cloned(),
            status: resolve_text(record, &["status", "screening_status"])
                .unwrap_or_else(|| "In Progress".to_string()),
            last_session: last_session_phrase(
                resolve(record, &["last_session_date", "last_session"]),
                today,
            ),
            risk_level: resolve_text(record, &["risk_level", "riskLevel"]),
            screening_stage: resolve_text(record, &["screening_stage", "screeningStage"]),
        }
    }
}

/// A clinician with their patients, denormalized for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistView {
    /// Display id, see [`numeric_id`]. Not unique.
    pub id: u64,
    #[serde(rename = "doctor_id")]
    pub doctor_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub last_login: String,
    pub total_patients: u64,
    pub patients: Vec<PatientView>,
}

impl TherapistView {
    /// Normalize one clinician record.
    ///
    /// `patients` are the already-joined views for this clinician and
    /// `emails` is the account lookup table from [`super::email_index`].
    pub fn from_record(
        record: &Record,
        patients: Vec<PatientView>,
        emails: &HashMap<String, String>,
    ) -> Self {
        let doctor_id = resolve_text(record, &["doctor_id"]).unwrap_or_default();
        let user_id = resolve_text(record, &["user_id"]);

        // A blank account id links to nothing
        let account = user_id.as_deref().filter(|id| !id.is_empty());
        let email = account
            .and_then(|id| emails.get(id))
            .cloned()
            .unwrap_or_else(|| fallback_email(account));

        let name = resolve_text(record, &["name"]).unwrap_or_else(|| {
            format!("Dr. {}", user_id.as_deref().unwrap_or("Unknown"))
        });

        Self {
            id: numeric_id(&doctor_id),
            name,
            email,
            role: resolve_text(record, &["occupation"]).unwrap_or_else(|| "Therapist".to_string()),
            status: resolve_text(record, &["status"]).unwrap_or_else(|| "active".to_string()),
            last_login: last_login_date(resolve(record, &["last_login", "created_at"])),
            total_patients: active_patient_count(
                resolve(record, &["active_patients"]),
                patients.len(),
            ),
            patients,
            doctor_id,
        }
    }
}

/// Summary counts for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_therapists: usize,
    pub total_patients: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_patient_view_resolves_alternate_names() {
        let view = PatientView::from_record(
            &record(json!({
                "id": 9,
                "patient_name": "Sam",
                "patient_age": 7,
                "screening_status": "Complete",
                "last_session": "2025-06-14T10:00:00Z",
                "riskLevel": "Low",
                "screeningStage": "Intake",
            })),
            today(),
        );

        assert_eq!(view.id, Some(json!(9)));
        assert_eq!(view.name.as_deref(), Some("Sam"));
        assert_eq!(view.age, Some(json!(7)));
        assert_eq!(view.status, "Complete");
        assert_eq!(view.last_session, "1 day ago");
        assert_eq!(view.risk_level.as_deref(), Some("Low"));
        assert_eq!(view.screening_stage.as_deref(), Some("Intake"));
    }

    #[test]
    fn test_patient_view_defaults() {
        let view = PatientView::from_record(&record(json!({})), today());
        assert_eq!(view.id, None);
        assert_eq!(view.name, None);
        assert_eq!(view.status, "In Progress");
        assert_eq!(view.last_session, "No sessions yet");
    }

    #[test]
    fn test_patient_view_serializes_camel_case_with_nulls() {
        let view = PatientView::from_record(&record(json!({"patient_id": "p1"})), today());
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "p1",
                "name": null,
                "age": null,
                "status": "In Progress",
                "lastSession": "No sessions yet",
                "riskLevel": null,
                "screeningStage": null,
            })
        );
    }

    #[test]
    fn test_therapist_view_uses_account_email() {
        let mut emails = HashMap::new();
        emails.insert("u-1".to_string(), "ada@clinic.org".to_string());

        let view = TherapistView::from_record(
            &record(json!({
                "doctor_id": "00000010-aaaa-bbbb-cccc-dddddddddddd",
                "user_id": "u-1",
                "name": "Dr. Ada",
                "occupation": "Psychologist",
                "status": "inactive",
                "last_login": "2025-01-02T03:04:05Z",
                "active_patients": 4,
            })),
            Vec::new(),
            &emails,
        );

        assert_eq!(view.id, 16);
        assert_eq!(view.email, "ada@clinic.org");
        assert_eq!(view.name, "Dr. Ada");
        assert_eq!(view.role, "Psychologist");
        assert_eq!(view.status, "inactive");
        assert_eq!(view.last_login, "2025-01-02");
        assert_eq!(view.total_patients, 4);
    }

    #[test]
    fn test_therapist_view_blank_user_id() {
        let mut emails = HashMap::new();
        emails.insert(String::new(), "nobody@clinic.org".to_string());

        let view = TherapistView::from_record(
            &record(json!({"doctor_id": "d", "user_id": ""})),
            Vec::new(),
            &emails,
        );

        assert_eq!(view.email, "doctorunknown@bloomsense.com");
        assert_eq!(view.name, "Dr. ");
    }

    #[test]
    fn test_therapist_view_fallbacks() {
        let patients = vec![PatientView::from_record(&record(json!({})), today())];
        let view = TherapistView::from_record(
            &record(json!({
                "doctor_id": "d-9",
                "user_id": "1234567890abcdef",
                "created_at": "garbage",
            })),
            patients,
            &HashMap::new(),
        );

        assert_eq!(view.email, "doctor12345678@bloomsense.com");
        assert_eq!(view.name, "Dr. 1234567890abcdef");
        assert_eq!(view.role, "Therapist");
        assert_eq!(view.status, "active");
        assert_eq!(view.last_login, "2024-01-20");
        assert_eq!(view.total_patients, 1);
    }

    #[test]
    fn test_therapist_without_user_id() {
        let view = TherapistView::from_record(
            &record(json!({"doctor_id": "d-1"})),
            Vec::new(),
            &HashMap::new(),
        );
        assert_eq!(view.email, "doctorunknown@bloomsense.com");
        assert_eq!(view.name, "Dr. Unknown");
    }

    #[test]
    fn test_therapist_serializes_dashboard_keys() {
        let view = TherapistView::from_record(
            &record(json!({"doctor_id": "d-1"})),
            Vec::new(),
            &HashMap::new(),
        );
        let value = serde_json::to_value(&view).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        for key in [
            "id",
            "doctor_id",
            "name",
            "email",
            "role",
            "status",
            "lastLogin",
            "totalPatients",
            "patients",
        ] {
            assert!(keys.contains(&key.to_string()), "missing {key}");
        }
    }
}

//! Reshapes raw store collections into the admin dashboard payload.
//!
//! Clinicians, patients and user accounts are fetched independently and only
//! loosely related: patients point at a clinician through
//! `assigned_doctor_id`, and a clinician's email lives on the user account
//! named by its `user_id`. This module joins them, normalizes inconsistent
//! field names and computes the display-only fields.

pub mod derive;
pub mod fields;
pub mod join;
pub mod views;

pub use join::{email_index, patients_for};
pub use views::{DashboardStats, PatientView, TherapistView};

use chrono::NaiveDate;

use crate::store::Record;

/// Build one view per clinician, in the order the clinicians were fetched.
///
/// `today` is the local calendar date used for the "days ago" phrases.
pub fn therapist_views(
    clinicians: &[Record],
    patients: &[Record],
    users: &[Record],
    today: NaiveDate,
) -> Vec<TherapistView> {
    let emails = email_index(users);

    clinicians
        .iter()
        .map(|clinician| {
            let assigned = match fields::resolve_text(clinician, &["doctor_id"]) {
                Some(id) => patients_for(patients, &id),
                None => Vec::new(),
            };
            let patient_views = assigned
                .into_iter()
                .map(|patient| PatientView::from_record(patient, today))
                .collect();

            TherapistView::from_record(clinician, patient_views, &emails)
        })
        .collect()
}

/// Plain record counts; incomplete records are counted like any other.
pub fn aggregate(clinicians: &[Record], patients: &[Record]) -> DashboardStats {
    DashboardStats {
        total_therapists: clinicians.len(),
        total_patients: patients.len(),
    }
}

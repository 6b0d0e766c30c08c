use std::collections::HashMap;

use super::fields::{resolve_text, value_text};
use crate::store::Record;

/// Field on a patient record naming its clinician.
pub const CLINICIAN_FOREIGN_KEY: &str = "assigned_doctor_id";

/// Patients whose foreign key string-equals `clinician_id`, in input order.
pub fn patients_for<'a>(patients: &'a [Record], clinician_id: &str) -> Vec<&'a Record> {
    patients
        .iter()
        .filter(|patient| {
            patient
                .get(CLINICIAN_FOREIGN_KEY)
                .and_then(value_text)
                .is_some_and(|key| key == clinician_id)
        })
        .collect()
}

/// `user_id -> email` lookup table. Later duplicates overwrite earlier ones.
///
/// Accounts without a user id or with an empty email are left out, so the
/// caller falls back to a synthesized address.
pub fn email_index(users: &[Record]) -> HashMap<String, String> {
    let mut index = HashMap::with_capacity(users.len());
    for user in users {
        let Some(user_id) = resolve_text(user, &["user_id"]) else {
            continue;
        };
        match resolve_text(user, &["email"]) {
            Some(email) if !email.is_empty() => {
                index.insert(user_id, email);
            }
            _ => {
                index.remove(&user_id);
            }
        }
    }
    index
}

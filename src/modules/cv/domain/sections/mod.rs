use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::shared::validation::ValidationErrors;

pub mod contact;
pub mod education;
pub mod experience;
pub mod interest;
pub mod language;
pub mod skill;

pub use contact::{Contact, ContactDraft, ContactPayload, ContactSection};
pub use education::{Education, EducationDraft, EducationPayload, EducationSection};
pub use experience::{Experience, ExperienceDraft, ExperiencePayload, ExperienceSection};
pub use interest::{Interest, InterestDraft, InterestPayload, InterestSection};
pub use language::{Language, LanguageDraft, LanguagePayload, LanguageSection};
pub use skill::{Skill, SkillCategory, SkillDraft, SkillPayload, SkillSection};

/// One kind of CV section. The CRUD service, the repository and the HTTP
/// handlers are written once against this trait.
///
/// `Payload` is the client's JSON with every field optional, `Draft` is what
/// survives validation and gets written, `Record` is what is read back.
pub trait SectionKind: Send + Sync + 'static {
    type Record: Serialize + Clone + Debug + Send + Sync + 'static;
    type Payload: DeserializeOwned + Debug + Send + Sync + 'static;
    type Draft: Clone + Debug + Send + Sync + 'static;

    /// Singular noun used in messages and logs.
    const LABEL: &'static str;

    fn record_id(record: &Self::Record) -> Uuid;
    fn record_cv(record: &Self::Record) -> Uuid;
    fn payload_cv(payload: &Self::Payload) -> Option<Uuid>;

    fn validate(payload: Self::Payload) -> Result<Self::Draft, ValidationErrors>;

    fn duplicate_message() -> &'static str {
        "A record with these values already exists for this CV."
    }

    /// Runs after a PATCH body has been laid over the stored record.
    fn adjust_patch(_merged: &mut Map<String, Value>, _patch: &Map<String, Value>) {}
}

/// Lays a partial JSON body over the stored record, so that PATCH can be
/// validated exactly like a full PUT.
pub fn merge_patch<S: SectionKind>(
    current: &S::Record,
    patch: &Map<String, Value>,
) -> Result<S::Payload, ValidationErrors> {
    let mut merged = match serde_json::to_value(current) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    S::adjust_patch(&mut merged, patch);

    parse_payload::<S>(Value::Object(merged))
}

/// Deserializes a request body into the section payload, turning type
/// mismatches into field errors.
pub fn parse_payload<S: SectionKind>(body: Value) -> Result<S::Payload, ValidationErrors> {
    serde_json::from_value(body).map_err(|e| {
        ValidationErrors::single("non_field_errors", format!("Invalid {}: {e}", S::LABEL))
    })
}

/// Start/end dated sections: setting `is_current` through PATCH clears the
/// stored end date unless the same body sends one.
pub(crate) fn clear_end_date_for_current(
    merged: &mut Map<String, Value>,
    patch: &Map<String, Value>,
) {
    let becomes_current = patch.get("is_current").and_then(Value::as_bool) == Some(true);
    if becomes_current && !patch.contains_key("end_date") {
        merged.remove("end_date");
    }
}

/// Serializes dates as `YYYY-MM-DD`.
pub(crate) mod iso_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format("%Y-%m-%d"))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, s),
                None => s.serialize_none(),
            }
        }
    }
}

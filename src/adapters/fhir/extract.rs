//! Per-resource field extraction
//!
//! Each resource type has a fixed field list that one fetch flattens into a
//! [`FlatRecord`]. Missing fields yield null, never an error — upstream data
//! quality varies wildly and the silver layer backfills whatever is absent.

use crate::domain::{FlatRecord, ResourceType};
use serde_json::Value;

/// Flattens one FHIR resource into the fixed field list for its type
pub fn extract(resource_type: ResourceType, resource: &Value) -> FlatRecord {
    match resource_type {
        ResourceType::Patient => extract_patient(resource),
        ResourceType::Practitioner => extract_practitioner(resource),
        ResourceType::Condition => extract_condition(resource),
        ResourceType::Observation => extract_observation(resource),
        ResourceType::Encounter => extract_encounter(resource),
    }
}

fn extract_patient(resource: &Value) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert("id", field(resource, "id"));
    record.insert("gender", field(resource, "gender"));
    record.insert("birthDate", field(resource, "birthDate"));
    record.insert("active", field(resource, "active"));
    record
}

fn extract_practitioner(resource: &Value) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert("id", field(resource, "id"));
    record.insert("name", practitioner_full_name(resource));
    record.insert("gender", field(resource, "gender"));
    record.insert(
        "identifier",
        first_element(resource, "identifier")
            .map(|entry| field(entry, "value"))
            .unwrap_or(Value::Null),
    );
    record
}

fn extract_condition(resource: &Value) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert("id", field(resource, "id"));
    record.insert("recordedDate", field(resource, "recordedDate"));
    record.insert(
        "subject_reference",
        resource
            .get("subject")
            .map(|subject| field(subject, "reference"))
            .unwrap_or(Value::Null),
    );
    record.insert(
        "code_text",
        resource
            .get("code")
            .and_then(|code| first_element(code, "coding"))
            .map(|coding| field(coding, "display"))
            .unwrap_or(Value::Null),
    );
    record
}

fn extract_observation(resource: &Value) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert("id", field(resource, "id"));
    record.insert("status", field(resource, "status"));
    record.insert("category", field(resource, "category"));
    record.insert("code", field(resource, "code"));
    record.insert("subject", field(resource, "subject"));
    record.insert("valueQuantity", field(resource, "valueQuantity"));
    record.insert("issued", field(resource, "issued"));
    record.insert("effectiveDateTime", field(resource, "effectiveDateTime"));
    record
}

fn extract_encounter(resource: &Value) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert("id", field(resource, "id"));
    record.insert("status", field(resource, "status"));
    record.insert("class", field(resource, "class"));
    record.insert("subject", field(resource, "subject"));
    record.insert("type", field(resource, "type"));
    record.insert("period", field(resource, "period"));
    record
}

/// Space-joined given names plus family name from the first name entry
///
/// Null when the resource has no name entries at all.
fn practitioner_full_name(resource: &Value) -> Value {
    let Some(name) = first_element(resource, "name") else {
        return Value::Null;
    };

    let given = name
        .get("given")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let family = name.get("family").and_then(Value::as_str).unwrap_or("");

    let full = format!("{given} {family}").trim().to_string();
    if full.is_empty() {
        Value::Null
    } else {
        Value::String(full)
    }
}

fn field(value: &Value, name: &str) -> Value {
    value.get(name).cloned().unwrap_or(Value::Null)
}

fn first_element<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value.get(name).and_then(Value::as_array)?.first()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_patient() {
        let resource = json!({
            "id": "p1",
            "gender": "female",
            "birthDate": "1990-01-01",
            "active": true
        });
        let record = extract(ResourceType::Patient, &resource);

        assert_eq!(record.get("id"), Some(&json!("p1")));
        assert_eq!(record.get("birthDate"), Some(&json!("1990-01-01")));
        assert_eq!(record.get("active"), Some(&json!(true)));
    }

    #[test]
    fn test_extract_patient_missing_fields_are_null() {
        let resource = json!({ "id": "p2" });
        let record = extract(ResourceType::Patient, &resource);

        assert_eq!(record.get("gender"), Some(&Value::Null));
        assert_eq!(record.get("birthDate"), Some(&Value::Null));
        assert_eq!(record.get("active"), Some(&Value::Null));
    }

    #[test]
    fn test_extract_practitioner_name_concatenation() {
        let resource = json!({
            "id": "pr1",
            "name": [{"given": ["Ada", "Mae"], "family": "Lovelace"}],
            "gender": "female",
            "identifier": [{"value": "NPI-123"}]
        });
        let record = extract(ResourceType::Practitioner, &resource);

        assert_eq!(record.get("name"), Some(&json!("Ada Mae Lovelace")));
        assert_eq!(record.get("identifier"), Some(&json!("NPI-123")));
    }

    #[test]
    fn test_extract_practitioner_without_name() {
        let resource = json!({ "id": "pr2" });
        let record = extract(ResourceType::Practitioner, &resource);

        assert_eq!(record.get("name"), Some(&Value::Null));
        assert_eq!(record.get("identifier"), Some(&Value::Null));
    }

    #[test]
    fn test_extract_practitioner_family_only() {
        let resource = json!({
            "id": "pr3",
            "name": [{"family": "Curie"}]
        });
        let record = extract(ResourceType::Practitioner, &resource);
        assert_eq!(record.get("name"), Some(&json!("Curie")));
    }

    #[test]
    fn test_extract_condition_nested_paths() {
        let resource = json!({
            "id": "c1",
            "recordedDate": "2023-06-01",
            "subject": {"reference": "Patient/p1"},
            "code": {"coding": [{"display": "Hypertension", "code": "38341003"}]}
        });
        let record = extract(ResourceType::Condition, &resource);

        assert_eq!(record.get("subject_reference"), Some(&json!("Patient/p1")));
        assert_eq!(record.get("code_text"), Some(&json!("Hypertension")));
    }

    #[test]
    fn test_extract_condition_empty_coding() {
        let resource = json!({
            "id": "c2",
            "code": {"coding": []}
        });
        let record = extract(ResourceType::Condition, &resource);
        assert_eq!(record.get("code_text"), Some(&Value::Null));
    }

    #[test]
    fn test_extract_observation_keeps_nested_values() {
        let resource = json!({
            "id": "o1",
            "status": "final",
            "valueQuantity": {"value": 37.5, "unit": "C"},
            "subject": {"reference": "Patient/p1"}
        });
        let record = extract(ResourceType::Observation, &resource);

        assert_eq!(
            record.get("valueQuantity"),
            Some(&json!({"value": 37.5, "unit": "C"}))
        );
        assert_eq!(record.get("category"), Some(&Value::Null));
    }

    #[test]
    fn test_extract_encounter_field_list() {
        let resource = json!({
            "id": "e1",
            "status": "finished",
            "class": {"code": "AMB"},
            "period": {"start": "2024-01-01T10:00:00Z"}
        });
        let record = extract(ResourceType::Encounter, &resource);

        let names: Vec<&str> = record
            .fields()
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["id", "status", "class", "subject", "type", "period"]
        );
    }
}

use super::{stamp_last_updated, MappingContext};
use crate::constants::{ONSET_NOT_RECORDED, SNOMED_SYSTEM};
use crate::dates;
use crate::schema::ConditionRow;
use fhir::datatypes::{CodeableConcept, Coding, Reference};
use fhir::Condition;

pub fn map_condition(row: &ConditionRow, ctx: &MappingContext<'_>) -> Condition {
    let mut condition = Condition::new(row.diagnosis_id.as_str());
    stamp_last_updated(&mut condition.meta, row.last_updated.as_deref());

    condition.clinical_status = row.clinical_status.clone();
    condition.subject = ctx.subject(row.mrn.as_deref());

    if row.snomed_code.is_some() || row.diagnosis_name.is_some() {
        let coding = row
            .snomed_code
            .clone()
            .map(|code| Coding::from_parts(Some(SNOMED_SYSTEM.to_owned()), Some(code), None));
        condition.code = Some(CodeableConcept {
            coding: coding.into_iter().collect(),
            text: row.diagnosis_name.clone(),
        });
    }

    match row.date_onset.as_deref() {
        Some(ONSET_NOT_RECORDED) => condition.onset_string = Some(ONSET_NOT_RECORDED.to_owned()),
        onset => condition.onset_date_time = dates::recorded(onset),
    }

    condition.asserter = row.authorising_hcp.clone().map(Reference::display);
    condition.asserted_date = dates::recorded(row.authorised_date.as_deref());
    condition.abatement_date_time = dates::recorded(row.resolved_date.as_deref());

    condition
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{config, now};
    use super::*;
    use crate::row::Row;
    use serde_json::Value;

    fn map(row: Row) -> Value {
        let cfg = config();
        let ctx = MappingContext::new(&cfg, now());
        let row: ConditionRow = row.decode("Condition").expect("decode");
        serde_json::to_value(map_condition(&row, &ctx)).expect("serialise")
    }

    #[test]
    fn maps_coded_condition() {
        let value = map(
            Row::new()
                .with("PTdiagnosisID", 501)
                .with("MRN", "100234")
                .with("clinicalStatus", "active")
                .with("snomedCode", "38341003")
                .with("diagnosisName", "Hypertension")
                .with("dateOnset", "2019-03-04")
                .with("authHCP", "Dr Who")
                .with("authdate", "2019-03-05")
                .with("resolvedDate", "1900-01-01"),
        );
        assert_eq!(value["id"], "501");
        assert_eq!(value["clinicalStatus"], "active");
        assert_eq!(value["code"]["coding"][0]["system"], SNOMED_SYSTEM);
        assert_eq!(value["code"]["coding"][0]["code"], "38341003");
        assert_eq!(value["code"]["text"], "Hypertension");
        assert_eq!(value["onsetDateTime"], "2019-03-04");
        assert_eq!(value["asserter"]["display"], "Dr Who");
        assert_eq!(value["assertedDate"], "2019-03-05");
        assert!(value.get("abatementDateTime").is_none());
        assert_eq!(
            value["subject"]["reference"],
            "https://sider.example.nhs.uk/fhir/patient/100234"
        );
    }

    #[test]
    fn unrecorded_onset_is_a_string() {
        let value = map(
            Row::new()
                .with("PTdiagnosisID", "1")
                .with("dateOnset", ONSET_NOT_RECORDED),
        );
        assert_eq!(value["onsetString"], ONSET_NOT_RECORDED);
        assert!(value.get("onsetDateTime").is_none());
    }

    #[test]
    fn sentinel_onset_is_dropped() {
        let value = map(Row::new().with("PTdiagnosisID", "1").with("dateOnset", "T00:00"));
        assert!(value.get("onsetDateTime").is_none());
        assert!(value.get("onsetString").is_none());
        assert!(value.get("code").is_none());
        assert!(value.get("subject").is_none());
    }
}

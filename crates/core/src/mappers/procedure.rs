use super::{stamp_last_updated, MappingContext};
use crate::coding::decode;
use crate::dates;
use crate::schema::ProcedureRow;
use fhir::datatypes::{Annotation, CodeableConcept, Reference};
use fhir::procedure::ProcedurePerformer;
use fhir::Procedure;

pub fn map_procedure(row: &ProcedureRow, ctx: &MappingContext<'_>) -> Procedure {
    let mut procedure = Procedure::new(row.procedure_id.as_str());
    stamp_last_updated(&mut procedure.meta, row.last_updated.as_deref());

    procedure.status = row.status.clone();
    procedure.subject = ctx.subject(row.mrn.as_deref());

    let coding: Vec<_> = decode(row.procedure_types.as_deref())
        .iter()
        .map(|entry| entry.to_coding())
        .collect();
    if !coding.is_empty() {
        procedure.code = Some(CodeableConcept { coding, text: None });
    }

    procedure.performed_date_time = dates::recorded(row.performed.as_deref());

    if let Some(clinician) = row.clinician_name.clone() {
        procedure.performer.push(ProcedurePerformer {
            actor: Reference::display(clinician),
        });
    }
    if let Some(text) = row.note.clone() {
        procedure.note.push(Annotation { text });
    }

    procedure
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
        let row: ProcedureRow = row.decode("Procedure").expect("decode");
        serde_json::to_value(map_procedure(&row, &ctx)).expect("serialise")
    }

    #[test]
    fn maps_all_codings_into_one_concept() {
        let value = map(
            Row::new()
                .with("procedureID", "P1")
                .with("MRN", "100234")
                .with("status", "completed")
                .with(
                    "proceduretype",
                    "http://snomed.info/sct,80146002,Appendicectomy|https://opcs,H01.9,Emergency excision",
                )
                .with("procedureDatetime", "2023-05-10T09:30:00")
                .with("clinicanName", "Mr Surgeon")
                .with("procedureNote", "Uneventful"),
        );
        assert_eq!(value["status"], "completed");
        let coding = value["code"]["coding"].as_array().expect("coding");
        assert_eq!(coding.len(), 2);
        assert_eq!(coding[0]["code"], "80146002");
        assert_eq!(coding[1]["code"], "H01.9");
        assert_eq!(value["performedDateTime"], "2023-05-10T09:30:00");
        assert_eq!(value["performer"][0]["actor"]["display"], "Mr Surgeon");
        assert_eq!(value["note"][0]["text"], "Uneventful");
    }

    #[test]
    fn optional_blocks_are_omitted() {
        let value = map(
            Row::new()
                .with("procedureID", "P2")
                .with("procedureDatetime", "1900-01-01T00:00:00"),
        );
        for member in ["code", "performedDateTime", "performer", "note", "subject"] {
            assert!(value.get(member).is_none(), "{member} should be omitted");
        }
    }
}

use super::{stamp_last_updated, MappingContext};
use crate::coding::decode_concepts;
use crate::constants::*;
use crate::dates;
use crate::schema::EncounterRow;
use crate::visibility::{classify, VisibilityRule, VisibilitySubject};
use fhir::datatypes::{CodeableConcept, Coding, Extension, Identifier, Period, Reference};
use fhir::encounter::{EncounterLocation, EncounterParticipant, Hospitalization};
use fhir::Encounter;

/// Participation roles recorded against an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Admitter,
    Discharger,
    Consultant,
}

impl Role {
    fn concept(self) -> CodeableConcept {
        let (code, display) = match self {
            Role::Admitter => ("ADM", "admitter"),
            Role::Discharger => ("DIS", "discharger"),
            Role::Consultant => ("CON", "consultant"),
        };
        CodeableConcept::single(Coding::fixed(PARTICIPATION_TYPE_SYSTEM, code, display))
    }
}

/// Map an encounter row.
///
/// Visibility is `summary` for encounters started within the recency window, `detail` for older
/// ones, and `none` for anything still planned.
pub fn map_encounter(row: &EncounterRow, ctx: &MappingContext<'_>) -> Encounter {
    let mut encounter = Encounter::new(row.encounter_id.as_str());
    stamp_last_updated(&mut encounter.meta, row.last_updated.as_deref());

    encounter.status = row.status.clone();
    encounter.subject = ctx.subject(row.mrn.as_deref());

    if let Some(class_name) = row.class_name.clone() {
        encounter.class = Some(Coding::from_parts(
            Some(ENCOUNTER_CLASS_SYSTEM.to_owned()),
            row.class_code.clone(),
            Some(class_name),
        ));
    }

    encounter.encounter_type = match row.encounter_types.as_deref() {
        Some(types) => decode_concepts(Some(types)),
        None => row
            .service_code
            .clone()
            .map(|code| {
                CodeableConcept::single(Coding::from_parts(
                    Some(SPECIALTY_SYSTEM.to_owned()),
                    Some(code),
                    row.service.clone(),
                ))
            })
            .into_iter()
            .collect(),
    };

    encounter.participant = participants(row);

    let period = Period {
        start: dates::recorded(row.start_date.as_deref()),
        end: dates::recorded(row.end_date.as_deref()),
    };

    let hospitalization = hospitalization(row);
    if !hospitalization.is_empty() {
        encounter.hospitalization = Some(hospitalization);
    }

    // Older feeds compared against `XXIMP`, which never matched, so no wards were emitted.
    // Inpatient stays now carry their ward history.
    if row.location_class_code.as_deref() == Some(INPATIENT_CLASS_CODE) {
        encounter.location = wards(row, &period);
    }
    encounter.period = period.non_empty();

    let subject = VisibilitySubject {
        start: row.start_date.as_deref(),
        status: row.status.as_deref(),
        ..Default::default()
    };
    let rules = [
        VisibilityRule::RecencyWindow {
            days: ctx.cfg.recency_window_days(),
            now: ctx.now,
        },
        VisibilityRule::SuppressStatus(PLANNED_STATUS),
    ];
    if let Some(tag) = classify(&subject, &rules) {
        encounter.meta.tag = vec![tag.to_coding()];
    }

    encounter
}

fn individual(code: &str, display: Option<&String>) -> Reference {
    Reference {
        reference: None,
        identifier: Some(Identifier::value(Some(code.to_owned()))),
        display: display.cloned(),
    }
}

fn participant(roles: &[Role], code: &str, display: Option<&String>) -> EncounterParticipant {
    EncounterParticipant {
        participant_type: roles.iter().map(|role| role.concept()).collect(),
        individual: Some(individual(code, display)),
    }
}

/// Admitter and discharger collapse into one participant when they are the same person.
fn participants(row: &EncounterRow) -> Vec<EncounterParticipant> {
    let mut participants = Vec::new();

    match (&row.admitting_code, &row.discharging_code) {
        (Some(admitting), Some(discharging)) if admitting == discharging => {
            participants.push(participant(
                &[Role::Admitter, Role::Discharger],
                admitting,
                row.admitting_display.as_ref(),
            ));
        }
        (admitting, discharging) => {
            if let Some(code) = admitting {
                participants.push(participant(
                    &[Role::Admitter],
                    code,
                    row.admitting_display.as_ref(),
                ));
            }
            if let Some(code) = discharging {
                participants.push(participant(
                    &[Role::Discharger],
                    code,
                    row.discharging_display.as_ref(),
                ));
            }
        }
    }

    if let Some(code) = &row.attending_code {
        participants.push(participant(
            &[Role::Consultant],
            code,
            row.attending_display.as_ref(),
        ));
    }

    participants
}

fn coded(system: &str, code: &Option<String>, display: &Option<String>) -> Option<CodeableConcept> {
    code.clone().map(|code| {
        CodeableConcept::single(Coding::from_parts(
            Some(system.to_owned()),
            Some(code),
            display.clone(),
        ))
    })
}

fn hospitalization(row: &EncounterRow) -> Hospitalization {
    let extension = [
        (
            ADMISSION_METHOD_EXTENSION,
            coded(
                ADMISSION_METHOD_SYSTEM,
                &row.admission_method_code,
                &row.admission_method_desc,
            ),
        ),
        (
            DISCHARGE_METHOD_EXTENSION,
            coded(
                DISCHARGE_METHOD_SYSTEM,
                &row.discharge_method_code,
                &row.discharge_method_desc,
            ),
        ),
    ]
    .into_iter()
    .filter_map(|(url, concept)| concept.map(|concept| Extension::codeable_concept(url, concept)))
    .collect();

    Hospitalization {
        extension,
        admit_source: coded(
            ADMIT_SOURCE_SYSTEM,
            &row.admit_source_code,
            &row.admit_source_desc,
        ),
        discharge_disposition: coded(
            DISCHARGE_DESTINATION_SYSTEM,
            &row.discharge_disposition_code,
            &row.discharge_disposition_desc,
        ),
    }
}

/// Admitting ward is bound to the encounter start, discharge ward to its end. A ward is only
/// listed when the matching bound was recorded.
fn wards(row: &EncounterRow, period: &Period) -> Vec<EncounterLocation> {
    let mut wards = Vec::new();

    if let (Some(ward), Some(start)) = (&row.admitting_ward_id, &period.start) {
        wards.push(EncounterLocation {
            location: individual(ward, row.admitting_ward_display.as_ref()),
            period: Some(Period {
                start: Some(start.clone()),
                end: None,
            }),
        });
    }
    if let (Some(ward), Some(end)) = (&row.discharge_ward_id, &period.end) {
        wards.push(EncounterLocation {
            location: individual(ward, row.discharge_ward_display.as_ref()),
            period: Some(Period {
                start: None,
                end: Some(end.clone()),
            }),
        });
    }

    wards
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
        let row: EncounterRow = row.decode("Encounter").expect("decode");
        serde_json::to_value(map_encounter(&row, &ctx)).expect("serialise")
    }

    fn inpatient_row() -> Row {
        Row::new()
            .with("Encounter_ID", "E1")
            .with("MRN", "100234")
            .with("status", "finished")
            .with("classCode", "IMP")
            .with("className", "inpatient encounter")
            .with("encounterClassCode", "IMP")
            .with("Start_Date", "2024-06-20T08:00:00")
            .with("End_Date", "2024-06-25T12:00:00")
            .with("Service_Code", "300")
            .with("Service", "General Medicine")
            .with("encounterParticipantIndividualCode_admitting", "C123")
            .with("encounterParticipantIndividualDisplay_admitting", "Dr Admit")
            .with("encounterParticipantIndividualCode_discharging", "C456")
            .with("encounterParticipantIndividualDisplay_discharging", "Dr Discharge")
            .with("encounterAdmissionmethodCodingCode", "21")
            .with("encounterAdmissionmethodCodingDesc", "Emergency")
            .with("encounterHospitalizationAdmitsourceCodingCode", "19")
            .with("encounterLocation1Identifier", "W1")
            .with("encounterLocation1Display", "Ward 1")
            .with("encounterLocation2Identifier", "W2")
            .with("encounterLocation2Display", "Ward 2")
    }

    #[test]
    fn maps_inpatient_stay() {
        let value = map(inpatient_row());
        assert_eq!(value["status"], "finished");
        assert_eq!(value["class"]["system"], ENCOUNTER_CLASS_SYSTEM);
        assert_eq!(value["class"]["code"], "IMP");
        assert_eq!(value["type"][0]["coding"][0]["system"], SPECIALTY_SYSTEM);
        assert_eq!(value["type"][0]["coding"][0]["display"], "General Medicine");
        assert_eq!(value["period"]["start"], "2024-06-20T08:00:00");
        assert_eq!(value["period"]["end"], "2024-06-25T12:00:00");

        let hospitalization = &value["hospitalization"];
        assert_eq!(hospitalization["extension"][0]["url"], ADMISSION_METHOD_EXTENSION);
        assert_eq!(
            hospitalization["extension"].as_array().map(Vec::len),
            Some(1)
        );
        assert_eq!(hospitalization["admitSource"]["coding"][0]["code"], "19");
        assert!(hospitalization.get("dischargeDisposition").is_none());

        assert_eq!(value["location"][0]["location"]["identifier"]["value"], "W1");
        assert_eq!(value["location"][0]["period"]["start"], "2024-06-20T08:00:00");
        assert_eq!(value["location"][1]["location"]["display"], "Ward 2");
        assert_eq!(value["location"][1]["period"]["end"], "2024-06-25T12:00:00");
        assert_eq!(value["meta"]["tag"][0]["code"], "summary");
    }

    #[test]
    fn separate_admitter_and_discharger() {
        let value = map(inpatient_row());
        let participants = value["participant"].as_array().expect("participants");
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0]["type"][0]["coding"][0]["code"], "ADM");
        assert_eq!(participants[0]["individual"]["identifier"]["value"], "C123");
        assert_eq!(participants[1]["type"][0]["coding"][0]["code"], "DIS");
        assert_eq!(participants[1]["individual"]["display"], "Dr Discharge");
    }

    #[test]
    fn same_admitter_and_discharger_is_one_participant() {
        let value = map(
            inpatient_row()
                .with("encounterParticipantIndividualCode_discharging", "C123")
                .with("encounterParticipantIndividualCode_opattending", "C789"),
        );
        let participants = value["participant"].as_array().expect("participants");
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0]["type"][0]["coding"][0]["code"], "ADM");
        assert_eq!(participants[0]["type"][1]["coding"][0]["code"], "DIS");
        assert_eq!(participants[1]["type"][0]["coding"][0]["code"], "CON");
        assert_eq!(participants[1]["individual"]["identifier"]["value"], "C789");
    }

    #[test]
    fn decoded_types_take_precedence_over_service() {
        let value = map(inpatient_row().with("encountertype", "sys,A,Alpha|sys,B,Beta"));
        let types = value["type"].as_array().expect("types");
        assert_eq!(types.len(), 2);
        assert_eq!(types[1]["coding"][0]["display"], "Beta");
    }

    #[test]
    fn wards_need_inpatient_class_and_recorded_bounds() {
        let value = map(inpatient_row().with("encounterClassCode", "AMB"));
        assert!(value.get("location").is_none());

        let value = map(inpatient_row().with("End_Date", "1900-01-01"));
        let locations = value["location"].as_array().expect("locations");
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0]["location"]["identifier"]["value"], "W1");
    }

    #[test]
    fn visibility_follows_recency_and_status() {
        let tag = |row: Row| map(row)["meta"]["tag"][0]["code"].clone();
        assert_eq!(tag(inpatient_row().with("Start_Date", "2024-05-21")), "detail");
        assert_eq!(tag(inpatient_row().with("Start_Date", "T00:00:00")), "detail");
        assert_eq!(tag(inpatient_row().with("status", "planned")), "none");
    }

    #[test]
    fn bare_encounter_omits_optional_blocks() {
        let value = map(Row::new().with("Encounter_ID", "E2"));
        for member in ["class", "type", "participant", "period", "hospitalization", "location"] {
            assert!(value.get(member).is_none(), "{member} should be omitted");
        }
        assert_eq!(value["meta"]["tag"][0]["code"], "detail");
    }
}

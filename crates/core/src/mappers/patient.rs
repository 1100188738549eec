use super::{stamp_last_updated, MappingContext};
use crate::coding::{decode_positions, CodedEntry};
use crate::constants::*;
use crate::dates;
use crate::schema::PatientRow;
use fhir::datatypes::{
    Address, AddressType, AddressUse, CodeableConcept, Coding, ContactPoint, ContactPointUse,
    Extension, HumanName, Identifier, IdentifierUse, NameUse, Reference,
};
use fhir::patient::{AdministrativeGender, PatientContact};
use fhir::Patient;
use sider_types::{boolean_from_presence, present_or_absent};

/// Map a patient row.
///
/// A row carrying the do-not-distribute alert is redacted: telecom and address are dropped and
/// the resource is labelled restricted.
pub fn map_patient(row: &PatientRow, ctx: &MappingContext<'_>) -> Patient {
    let mut patient = Patient::new(row.mrn.as_str());
    stamp_last_updated(&mut patient.meta, row.last_updated.as_deref());

    patient.language = Some(PATIENT_LANGUAGE.to_owned());
    patient.identifier = identifiers(row, ctx);
    patient.name = name(row).into_iter().collect();
    patient.gender = row.sex.as_deref().map(gender);
    patient.birth_date = dates::recorded(row.date_of_birth.as_deref());
    patient.deceased_boolean = Some(boolean_from_presence(row.date_of_death.as_deref()));
    patient.address = address(row).into_iter().collect();
    patient.contact = contacts(row, ctx);
    patient.telecom = telecom(row);

    if let Some(code) = row.ethnic_code.clone() {
        patient.extension.push(Extension::codeable_concept(
            ETHNIC_CATEGORY_EXTENSION,
            CodeableConcept::single(Coding::from_parts(
                Some(ETHNIC_CATEGORY_SYSTEM.to_owned()),
                Some(code),
                row.ethnic_text.clone(),
            )),
        ));
    }

    if let (Some(code), Some(desc)) = (&row.marital_status_code, &row.marital_status_desc) {
        patient.marital_status = Some(CodeableConcept::single(Coding::from_parts(
            Some(MARITAL_STATUS_SYSTEM.to_owned()),
            Some(code.clone()),
            Some(desc.clone()),
        )));
    }

    if row.do_not_distribute.is_some() {
        patient.redact();
    }

    patient
}

fn identifiers(row: &PatientRow, ctx: &MappingContext<'_>) -> Vec<Identifier> {
    let mut identifiers = vec![Identifier {
        use_type: Some(IdentifierUse::Usual),
        system: Some(LOCAL_PATIENT_ID_SYSTEM.to_owned()),
        value: Some(row.mrn.as_str().to_owned()),
        extension: Vec::new(),
    }];

    if let Some(nhs_number) = &row.nhs_number {
        let (code, display) = match row.nhs_verified.as_deref() {
            None | Some("0") => (
                NHS_UNTRACED_CODE.to_owned(),
                Some(NHS_UNTRACED_DISPLAY.to_owned()),
            ),
            Some(code) => (code.to_owned(), row.nhs_trace_status_desc.clone()),
        };
        identifiers.push(Identifier {
            use_type: Some(IdentifierUse::Official),
            system: Some(ctx.cfg.patient_id_system().to_owned()),
            value: Some(nhs_number.clone()),
            extension: vec![Extension::codeable_concept(
                NHS_VERIFICATION_EXTENSION,
                CodeableConcept::single(Coding::from_parts(
                    Some(NHS_VERIFICATION_SYSTEM.to_owned()),
                    Some(code),
                    display,
                )),
            )],
        });
    }

    identifiers
}

fn name(row: &PatientRow) -> Option<HumanName> {
    if row.surname.is_none() && row.forename.is_none() && row.title.is_none() {
        return None;
    }
    Some(HumanName {
        use_type: Some(NameUse::Usual),
        text: None,
        family: row.surname.clone(),
        given: row.forename.iter().cloned().collect(),
        prefix: row.title.iter().cloned().collect(),
    })
}

fn gender(sex: &str) -> AdministrativeGender {
    match sex {
        "1" => AdministrativeGender::Male,
        "2" => AdministrativeGender::Female,
        _ => AdministrativeGender::Other,
    }
}

fn address(row: &PatientRow) -> Option<Address> {
    let line: Vec<String> = [&row.address_line1, &row.address_line2, &row.address_line3]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let address = Address {
        use_type: Some(AddressUse::Home),
        address_type: Some(AddressType::Postal),
        line,
        city: row.address_line4.clone(),
        district: row.address_line5.clone(),
        postal_code: row.postcode.clone(),
    };

    let populated = !address.line.is_empty()
        || address.city.is_some()
        || address.district.is_some()
        || address.postal_code.is_some();
    populated.then_some(address)
}

/// Next of kin first, in row order, then the organisation switchboard.
fn contacts(row: &PatientRow, ctx: &MappingContext<'_>) -> Vec<PatientContact> {
    let mut contacts: Vec<PatientContact> = decode_positions::<6>(row.next_of_kin.as_deref())
        .into_iter()
        .map(|[system, code, display, given, family, phone]| {
            let relationship = CodedEntry {
                system,
                code,
                display,
            };
            let text = present_or_absent(Some(
                [given.as_deref(), family.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" "),
            ));
            PatientContact {
                relationship: vec![relationship.to_concept()],
                name: Some(HumanName {
                    use_type: Some(NameUse::Usual),
                    text,
                    family,
                    given: given.into_iter().collect(),
                    prefix: Vec::new(),
                }),
                telecom: phone
                    .map(|phone| ContactPoint::phone(Some(phone), None))
                    .into_iter()
                    .collect(),
                organization: None,
            }
        })
        .collect();

    let switchboard = ctx.cfg.switchboard();
    contacts.push(PatientContact {
        relationship: Vec::new(),
        name: Some(HumanName {
            use_type: Some(NameUse::Anonymous),
            text: Some(switchboard.name.clone()),
            ..HumanName::default()
        }),
        telecom: vec![ContactPoint::phone(Some(switchboard.phone.clone()), None)],
        organization: Some(Reference {
            reference: Some(switchboard.organisation_reference.clone()),
            identifier: None,
            display: Some(switchboard.organisation_display.clone()),
        }),
    });

    contacts
}

fn telecom(row: &PatientRow) -> Vec<ContactPoint> {
    [
        (&row.home_number, ContactPointUse::Home),
        (&row.work_number, ContactPointUse::Mobile),
    ]
    .into_iter()
    .filter_map(|(number, use_type)| {
        number
            .clone()
            .map(|number| ContactPoint::phone(Some(number), Some(use_type)))
    })
    .collect()
}

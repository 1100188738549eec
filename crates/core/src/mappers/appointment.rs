use super::{stamp_last_updated, MappingContext};
use crate::coding::decode_concepts;
use crate::constants::{APPOINTMENT_PARTICIPANT_TYPE_SYSTEM, CANCELLED_STATUS};
use crate::dates;
use crate::schema::AppointmentRow;
use fhir::appointment::{AppointmentParticipant, ParticipationStatus, CANCELLATION_REASON_EXTENSION};
use fhir::datatypes::{CodeableConcept, Coding, Extension, Reference};
use fhir::Appointment;

pub fn map_appointment(row: &AppointmentRow, ctx: &MappingContext<'_>) -> Appointment {
    let mut appointment = Appointment::new(row.booking_id.as_str());
    stamp_last_updated(&mut appointment.meta, row.last_updated.as_deref());

    appointment.status = row.status.clone();
    appointment.subject = ctx.subject(row.mrn.as_deref());

    appointment.specialty = coded_or_single(
        row.specialties.as_deref(),
        &row.specialty_system,
        &row.specialty_code,
        &row.specialty_name,
    );
    appointment.service_type = coded_or_single(
        row.service_types.as_deref(),
        &row.service_system,
        &row.service_code,
        &row.service_name,
    );

    appointment.priority = row.priority.as_deref().and_then(|v| v.trim().parse().ok());
    appointment.minutes_duration = row.duration.as_deref().and_then(|v| v.trim().parse().ok());
    appointment.start = dates::recorded(row.start_date.as_deref());
    appointment.end = dates::recorded(row.end_date.as_deref());

    if let Some(owner) = row.list_owner.clone() {
        appointment.participant.push(AppointmentParticipant {
            participant_type: vec![CodeableConcept::single(Coding::fixed(
                APPOINTMENT_PARTICIPANT_TYPE_SYSTEM,
                "CON",
                "consultant",
            ))],
            actor: Some(Reference::display(owner)),
            status: ParticipationStatus::Accepted,
        });
    }

    if row.status.as_deref() == Some(CANCELLED_STATUS) {
        if let Some(reason) = row.cancel_reason.clone() {
            appointment
                .extension
                .push(Extension::string(CANCELLATION_REASON_EXTENSION, reason));
        }
    }

    appointment
}

/// The decoded multi-value column if present, otherwise a single coding from the separate
/// system/code/name columns when a name was recorded.
fn coded_or_single(
    packed: Option<&str>,
    system: &Option<String>,
    code: &Option<String>,
    name: &Option<String>,
) -> Vec<CodeableConcept> {
    if packed.is_some() {
        return decode_concepts(packed);
    }
    name.clone()
        .map(|name| {
            CodeableConcept::single(Coding::from_parts(system.clone(), code.clone(), Some(name)))
        })
        .into_iter()
        .collect()
}

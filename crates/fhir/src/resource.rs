//! The resource sum type.
//!
//! `Resource` is internally tagged on `resourceType`, so every variant serialises with its
//! discriminant alongside its fields.

use crate::datatypes::Meta;
use crate::{Appointment, Condition, Encounter, FhirResult, Flag, Patient, Procedure};
use serde::{Deserialize, Serialize};

/// One of the resource documents the listener can produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
#[allow(clippy::large_enum_variant)]
pub enum Resource {
    Patient(Patient),
    Condition(Condition),
    Encounter(Encounter),
    Flag(Flag),
    Procedure(Procedure),
    Appointment(Appointment),
}

impl Resource {
    /// The `resourceType` discriminant.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::Patient(_) => "Patient",
            Resource::Condition(_) => "Condition",
            Resource::Encounter(_) => "Encounter",
            Resource::Flag(_) => "Flag",
            Resource::Procedure(_) => "Procedure",
            Resource::Appointment(_) => "Appointment",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Resource::Patient(r) => &r.id,
            Resource::Condition(r) => &r.id,
            Resource::Encounter(r) => &r.id,
            Resource::Flag(r) => &r.id,
            Resource::Procedure(r) => &r.id,
            Resource::Appointment(r) => &r.id,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Resource::Patient(r) => &r.meta,
            Resource::Condition(r) => &r.meta,
            Resource::Encounter(r) => &r.meta,
            Resource::Flag(r) => &r.meta,
            Resource::Procedure(r) => &r.meta,
            Resource::Appointment(r) => &r.meta,
        }
    }

    /// Render the resource as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Json`] if serialisation fails.
    pub fn render(&self) -> FhirResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

macro_rules! impl_from_resource {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Resource {
                fn from(value: $variant) -> Self {
                    Resource::$variant(value)
                }
            }
        )*
    };
}

impl_from_resource!(Patient, Condition, Encounter, Flag, Procedure, Appointment);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::Reference;

    #[test]
    fn serialises_with_resource_type_discriminant() {
        let mut condition = Condition::new("D1");
        condition.subject = Some(Reference::to("https://api.example/patient/1"));
        let resource = Resource::from(condition);

        let value = serde_json::to_value(&resource).expect("serialise");
        assert_eq!(value["resourceType"], "Condition");
        assert_eq!(value["id"], "D1");
        assert_eq!(resource.resource_type(), "Condition");
        assert_eq!(resource.id(), "D1");
    }
}

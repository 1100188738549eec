use super::{stamp_last_updated, MappingContext};
use crate::constants::{LOCAL_CODE_SYSTEM, SNOMED_SYSTEM};
use crate::dates;
use crate::schema::FlagRow;
use crate::visibility::{classify, VisibilityRule, VisibilitySubject};
use fhir::datatypes::{CodeableConcept, Coding, Period};
use fhir::Flag;

/// Map an alert row. Visibility comes from the configured code allow-lists.
pub fn map_flag(row: &FlagRow, ctx: &MappingContext<'_>) -> Flag {
    let mut flag = Flag::new(row.alert_id.as_str());
    stamp_last_updated(&mut flag.meta, row.last_updated.as_deref());

    flag.status = row.status.clone();
    flag.subject = ctx.subject(row.mrn.as_deref());

    if let Some(category_id) = row.category_id.clone() {
        flag.category = Some(CodeableConcept::single(Coding::from_parts(
            Some(LOCAL_CODE_SYSTEM.to_owned()),
            Some(category_id),
            row.category.clone(),
        )));
    }

    // SNOMED wins over the local code when both are present.
    let code = match (&row.snomed_code, &row.local_code) {
        (Some(snomed), _) => Some((SNOMED_SYSTEM, snomed)),
        (None, Some(local)) => Some((LOCAL_CODE_SYSTEM, local)),
        (None, None) => None,
    };
    if let Some((system, code)) = code {
        flag.code = CodeableConcept::single(Coding::from_parts(
            Some(system.to_owned()),
            Some(code.clone()),
            row.alert.clone(),
        ));
    }

    flag.period = Period {
        start: dates::recorded(row.started.as_deref()),
        end: dates::recorded(row.ended.as_deref()),
    }
    .non_empty();

    let subject = VisibilitySubject {
        standard_code: row.snomed_code.as_deref(),
        local_code: row.local_code.as_deref(),
        start: row.started.as_deref(),
        status: row.status.as_deref(),
    };
    let rules = [VisibilityRule::AllowList(ctx.cfg.flag_codes())];
    if let Some(tag) = classify(&subject, &rules) {
        flag.meta.tag = vec![tag.to_coding()];
    }

    flag
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{config, now};
    use super::*;
    use crate::config::CodeAllowList;
    use crate::row::Row;
    use fhir::visibility::VISIBILITY_SYSTEM;
    use serde_json::Value;

    fn map(row: Row) -> Value {
        let cfg = config().with_flag_codes(CodeAllowList {
            standard: ["15188001".to_string()].into(),
            local: ["DNACPR".to_string()].into(),
        });
        let ctx = MappingContext::new(&cfg, now());
        let row: FlagRow = row.decode("Flag").expect("decode");
        serde_json::to_value(map_flag(&row, &ctx)).expect("serialise")
    }

    #[test]
    fn maps_alert() {
        let value = map(
            Row::new()
                .with("PT_alertID", "A1")
                .with("MRN", "100234")
                .with("status", "active")
                .with("alertCatID", "C1")
                .with("alertCat", "Clinical")
                .with("snomed", "15188001")
                .with("localID", "HEAR")
                .with("alert", "Hearing impaired")
                .with("started", "2022-02-02")
                .with("ended", "1900-01-01")
                .with("Last_Updated", "2022-02-03"),
        );
        assert_eq!(value["status"], "active");
        assert_eq!(value["category"]["coding"][0]["system"], LOCAL_CODE_SYSTEM);
        assert_eq!(value["category"]["coding"][0]["display"], "Clinical");
        assert_eq!(value["code"]["coding"][0]["system"], SNOMED_SYSTEM);
        assert_eq!(value["code"]["coding"][0]["display"], "Hearing impaired");
        assert_eq!(value["period"]["start"], "2022-02-02");
        assert!(value["period"].get("end").is_none());
        assert_eq!(value["meta"]["lastUpdated"], "2022-02-03");
        assert_eq!(value["meta"]["tag"][0]["system"], VISIBILITY_SYSTEM);
        assert_eq!(value["meta"]["tag"][0]["code"], "summary");
    }

    #[test]
    fn local_code_used_without_snomed() {
        let value = map(
            Row::new()
                .with("PT_alertID", "A2")
                .with("localID", "DNACPR")
                .with("alert", "Do not resuscitate"),
        );
        assert_eq!(value["code"]["coding"][0]["system"], LOCAL_CODE_SYSTEM);
        assert_eq!(value["code"]["coding"][0]["code"], "DNACPR");
        assert_eq!(value["meta"]["tag"][0]["code"], "summary");
    }

    #[test]
    fn codes_outside_allow_lists_are_hidden() {
        let value = map(Row::new().with("PT_alertID", "A3").with("snomed", "999"));
        assert_eq!(value["meta"]["tag"][0]["code"], "none");

        let value = map(Row::new().with("PT_alertID", "A4"));
        assert_eq!(value["meta"]["tag"][0]["code"], "none");
        assert!(value.get("period").is_none());
        assert!(value.get("category").is_none());
    }
}

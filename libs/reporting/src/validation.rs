//! Input validation for energy records, waste records and users
//!
//! Every check runs on every call so a client sees all of its field errors
//! at once. Validation never fails: it yields either [`Validation::Valid`]
//! or the field-keyed messages in [`Validation::Invalid`].

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::{collections::BTreeMap, str::FromStr, sync::OnceLock};

use crate::models::{
    EnergyDraft, EnergyPayload, NumericInput, UserPayload, WasteDraft, WastePayload, non_blank,
};

/// Field name to human-readable message
pub type FieldErrors = BTreeMap<String, String>;

/// Outcome of validating a candidate record
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid,
    Invalid(FieldErrors),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Validation::Valid => None,
            Validation::Invalid(errors) => Some(errors),
        }
    }
}

impl<T> From<Result<T, FieldErrors>> for Validation {
    fn from(result: Result<T, FieldErrors>) -> Self {
        match result {
            Ok(_) => Validation::Valid,
            Err(errors) => Validation::Invalid(errors),
        }
    }
}

/// Validate an energy record submission
pub fn validate_energy_record(input: &EnergyPayload) -> Validation {
    check_energy_record(input).into()
}

/// Validate a waste record submission
pub fn validate_waste_record(input: &WastePayload) -> Validation {
    check_waste_record(input).into()
}

/// Validate a registration submission
pub fn validate_user(input: &UserPayload) -> Validation {
    let mut errors = FieldErrors::new();

    match input.email.as_deref().map(str::trim) {
        None | Some("") => {
            errors.insert("email".into(), "Email is required".into());
        }
        Some(email) if !email_regex().is_match(email) => {
            errors.insert("email".into(), "Invalid email format".into());
        }
        Some(_) => {}
    }

    if non_blank(&input.name).is_none() {
        errors.insert("name".into(), "Name is required".into());
    }

    match input.password.as_deref() {
        None | Some("") => {
            errors.insert("password".into(), "Password is required".into());
        }
        Some(password) if password.chars().count() < 6 => {
            errors.insert(
                "password".into(),
                "Password must be at least 6 characters".into(),
            );
        }
        Some(_) => {}
    }

    if errors.is_empty() {
        Validation::Valid
    } else {
        Validation::Invalid(errors)
    }
}

/// Validate an energy submission and produce its typed body
pub fn check_energy_record(input: &EnergyPayload) -> Result<EnergyDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let site_name = required_text(&input.site_name, "site_name", "Site name", &mut errors);
    let (start, end) = reporting_period(
        &input.reporting_period_start,
        &input.reporting_period_end,
        &mut errors,
    );
    let energy_type = labelled(&input.energy_type, "energy_type", "Energy type", &mut errors);
    let consumption = required_amount(
        &input.consumption_mwh,
        "consumption_mwh",
        "Consumption",
        &mut errors,
    );
    let cost = optional_amount(&input.cost, "cost", "Cost", &mut errors);
    let reduction_target = optional_amount(
        &input.reduction_target_mwh,
        "reduction_target_mwh",
        "Reduction target",
        &mut errors,
    );

    match (site_name, start, end, energy_type, consumption) {
        (Some(site_name), Some(start), Some(end), Some(energy_type), Some(consumption))
            if errors.is_empty() =>
        {
            Ok(EnergyDraft {
                site_name,
                reporting_period_start: start,
                reporting_period_end: end,
                energy_type,
                consumption_mwh: consumption,
                cost,
                supplier_name: non_blank(&input.supplier_name),
                energy_source_mix: non_blank(&input.energy_source_mix),
                reduction_target_mwh: reduction_target,
                remarks: non_blank(&input.remarks),
            })
        }
        _ => Err(errors),
    }
}

/// Validate a waste submission and produce its typed body
pub fn check_waste_record(input: &WastePayload) -> Result<WasteDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let site_name = required_text(&input.site_name, "site_name", "Site name", &mut errors);
    let waste_type = labelled(&input.waste_type, "waste_type", "Waste type", &mut errors);
    let quantity = required_amount(&input.quantity_tons, "quantity_tons", "Quantity", &mut errors);
    let disposal_method = labelled(
        &input.disposal_method,
        "disposal_method",
        "Disposal method",
        &mut errors,
    );
    let (start, end) = reporting_period(
        &input.reporting_period_start,
        &input.reporting_period_end,
        &mut errors,
    );

    let disposal_date = match non_blank(&input.disposal_date) {
        None => None,
        Some(raw) => match parse_date(&raw) {
            None => {
                errors.insert("disposal_date".into(), "Invalid disposal date".into());
                None
            }
            Some(date) => {
                if start.is_some_and(|start| date < start) {
                    errors.insert(
                        "disposal_date".into(),
                        "Disposal date must be on or after reporting period start".into(),
                    );
                }
                Some(date)
            }
        },
    };

    let compliance = labelled(
        &input.regulatory_compliance,
        "regulatory_compliance",
        "Regulatory compliance status",
        &mut errors,
    );

    match (site_name, waste_type, quantity, disposal_method, start, end, compliance) {
        (
            Some(site_name),
            Some(waste_type),
            Some(quantity),
            Some(disposal_method),
            Some(start),
            Some(end),
            Some(compliance),
        ) if errors.is_empty() => Ok(WasteDraft {
            site_name,
            waste_type,
            quantity_tons: quantity,
            disposal_method,
            reporting_period_start: start,
            reporting_period_end: end,
            disposal_date,
            contractor_name: non_blank(&input.contractor_name),
            regulatory_compliance: compliance,
            remarks: non_blank(&input.remarks),
        }),
        _ => Err(errors),
    }
}

/// Parse a calendar date given as `YYYY-MM-DD` or as an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    })
}

fn required_text(
    value: &Option<String>,
    field: &str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let text = non_blank(value);
    if text.is_none() {
        errors.insert(field.into(), format!("{} is required", label));
    }
    text
}

fn labelled<T: FromStr>(
    value: &Option<String>,
    field: &str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match value.as_deref() {
        None | Some("") => {
            errors.insert(field.into(), format!("{} is required", label));
            None
        }
        Some(raw) => match raw.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.insert(field.into(), format!("Invalid {}", label.to_lowercase()));
                None
            }
        },
    }
}

fn required_amount(
    value: &Option<NumericInput>,
    field: &str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<f64> {
    match value {
        None => {
            errors.insert(field.into(), format!("{} is required", label));
            None
        }
        Some(input) => non_negative(input, field, label, errors),
    }
}

fn optional_amount(
    value: &Option<NumericInput>,
    field: &str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<f64> {
    match value {
        None => None,
        Some(input) if input.is_blank() => None,
        Some(input) => non_negative(input, field, label, errors),
    }
}

fn non_negative(
    input: &NumericInput,
    field: &str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<f64> {
    match input.value() {
        Some(amount) if amount >= 0.0 => Some(amount),
        _ => {
            errors.insert(
                field.into(),
                format!("{} must be a non-negative number", label),
            );
            None
        }
    }
}

fn reporting_period(
    start: &Option<String>,
    end: &Option<String>,
    errors: &mut FieldErrors,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let start = period_bound(start, "reporting_period_start", "start", errors);
    let end = period_bound(end, "reporting_period_end", "end", errors);

    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.insert(
                "reporting_period_end".into(),
                "Reporting period end must be after start date".into(),
            );
        }
    }

    (start, end)
}

fn period_bound(
    value: &Option<String>,
    field: &str,
    bound: &str,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    match non_blank(value) {
        None => {
            errors.insert(
                field.into(),
                format!("Reporting period {} is required", bound),
            );
            None
        }
        Some(raw) => {
            let date = parse_date(&raw);
            if date.is_none() {
                errors.insert(
                    field.into(),
                    format!("Reporting period {} is not a valid date", bound),
                );
            }
            date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplianceStatus, EnergyRecord, EnergyType, RecordDraft, WasteRecord};
    use chrono::Utc;
    use uuid::Uuid;

    fn energy_payload() -> EnergyPayload {
        EnergyPayload {
            site_name: Some("Plant A".into()),
            reporting_period_start: Some("2024-01-01".into()),
            reporting_period_end: Some("2024-01-31".into()),
            energy_type: Some("Natural Gas".into()),
            consumption_mwh: Some(NumericInput::Number(120.5)),
            cost: Some(NumericInput::Text("3400".into())),
            supplier_name: Some("GridCo".into()),
            energy_source_mix: None,
            reduction_target_mwh: Some(NumericInput::Text("".into())),
            remarks: Some("   ".into()),
        }
    }

    fn waste_payload() -> WastePayload {
        WastePayload {
            site_name: Some("Plant A".into()),
            waste_type: Some("Recyclable".into()),
            quantity_tons: Some(NumericInput::Number(4.0)),
            disposal_method: Some("Recycling".into()),
            reporting_period_start: Some("2024-03-01".into()),
            reporting_period_end: Some("2024-03-31".into()),
            disposal_date: Some("2024-03-15".into()),
            contractor_name: None,
            regulatory_compliance: Some("Compliant".into()),
            remarks: None,
        }
    }

    #[test]
    fn accepts_complete_energy_record() {
        let draft = check_energy_record(&energy_payload()).expect("payload should be valid");
        assert_eq!(draft.energy_type, EnergyType::NaturalGas);
        assert_eq!(draft.cost, Some(3400.0));
        assert_eq!(draft.reduction_target_mwh, None);
        assert_eq!(draft.remarks, None);
        assert!(validate_energy_record(&energy_payload()).is_valid());
    }

    #[test]
    fn reports_every_energy_error_at_once() {
        let payload = EnergyPayload {
            site_name: Some("  ".into()),
            energy_type: Some("Coal".into()),
            consumption_mwh: Some(NumericInput::Number(-1.0)),
            cost: Some(NumericInput::Text("free".into())),
            reduction_target_mwh: Some(NumericInput::Number(-5.0)),
            ..EnergyPayload::default()
        };

        let errors = validate_energy_record(&payload)
            .errors()
            .cloned()
            .expect("payload should be invalid");

        assert_eq!(errors["site_name"], "Site name is required");
        assert_eq!(
            errors["reporting_period_start"],
            "Reporting period start is required"
        );
        assert_eq!(
            errors["reporting_period_end"],
            "Reporting period end is required"
        );
        assert_eq!(errors["energy_type"], "Invalid energy type");
        assert_eq!(
            errors["consumption_mwh"],
            "Consumption must be a non-negative number"
        );
        assert_eq!(errors["cost"], "Cost must be a non-negative number");
        assert!(errors.contains_key("reduction_target_mwh"));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn missing_consumption_is_required() {
        let payload = EnergyPayload {
            consumption_mwh: None,
            ..energy_payload()
        };
        let errors = check_energy_record(&payload).unwrap_err();
        assert_eq!(errors["consumption_mwh"], "Consumption is required");
    }

    #[test]
    fn period_end_must_follow_start() {
        let payload = EnergyPayload {
            reporting_period_end: Some("2024-01-01".into()),
            ..energy_payload()
        };
        let errors = check_energy_record(&payload).unwrap_err();
        assert_eq!(
            errors["reporting_period_end"],
            "Reporting period end must be after start date"
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn stored_energy_record_revalidates_cleanly() {
        let draft = check_energy_record(&energy_payload()).unwrap();
        let record: EnergyRecord =
            draft.into_record("EN-000001".into(), Uuid::new_v4(), Utc::now());
        assert_eq!(
            validate_energy_record(&EnergyPayload::from(&record)),
            Validation::Valid
        );
    }

    #[test]
    fn accepts_complete_waste_record() {
        let draft = check_waste_record(&waste_payload()).expect("payload should be valid");
        assert_eq!(draft.regulatory_compliance, ComplianceStatus::Compliant);
        assert_eq!(draft.disposal_date, NaiveDate::from_ymd_opt(2024, 3, 15));

        let record: WasteRecord = draft.into_record("WS-000001".into(), Uuid::new_v4(), Utc::now());
        assert!(validate_waste_record(&WastePayload::from(&record)).is_valid());
    }

    #[test]
    fn waste_reports_disposal_date_and_period_together() {
        let payload = WastePayload {
            reporting_period_end: Some("2024-02-01".into()),
            disposal_date: Some("2024-02-20".into()),
            ..waste_payload()
        };

        let errors = check_waste_record(&payload).unwrap_err();
        assert_eq!(
            errors["reporting_period_end"],
            "Reporting period end must be after start date"
        );
        assert_eq!(
            errors["disposal_date"],
            "Disposal date must be on or after reporting period start"
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn waste_requires_enumerated_fields() {
        let errors = check_waste_record(&WastePayload::default()).unwrap_err();
        for field in [
            "site_name",
            "waste_type",
            "quantity_tons",
            "disposal_method",
            "reporting_period_start",
            "reporting_period_end",
            "regulatory_compliance",
        ] {
            assert!(errors.contains_key(field), "missing error for {}", field);
        }
        assert!(!errors.contains_key("disposal_date"));

        let payload = WastePayload {
            regulatory_compliance: Some("Maybe".into()),
            ..waste_payload()
        };
        let errors = check_waste_record(&payload).unwrap_err();
        assert_eq!(
            errors["regulatory_compliance"],
            "Invalid regulatory compliance status"
        );
    }

    #[test]
    fn disposal_date_on_period_start_is_allowed() {
        let payload = WastePayload {
            disposal_date: Some("2024-03-01".into()),
            ..waste_payload()
        };
        assert!(validate_waste_record(&payload).is_valid());
    }

    #[test]
    fn validates_user_fields() {
        let valid = UserPayload {
            email: Some("ops@example.com".into()),
            name: Some("Ops".into()),
            password: Some("secret".into()),
        };
        assert!(validate_user(&valid).is_valid());

        let invalid = UserPayload {
            email: Some("not-an-email".into()),
            name: None,
            password: Some("12345".into()),
        };
        let errors = validate_user(&invalid).errors().cloned().unwrap();
        assert_eq!(errors["email"], "Invalid email format");
        assert_eq!(errors["name"], "Name is required");
        assert_eq!(errors["password"], "Password must be at least 6 characters");
    }

    #[test]
    fn parses_dates_and_timestamps() {
        assert_eq!(parse_date("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(
            parse_date("2024-05-01T10:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(parse_date("01/05/2024"), None);
    }
}

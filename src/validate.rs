//! Request payloads and their validation rules.
//!
//! Every mutating endpoint deserializes one of these inputs and runs it
//! through its `validate_*` function before touching the store. A failed
//! check produces field-level messages the client renders inline.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 24-hour "HH:MM", zero-padded, 00-23 hours and 00-59 minutes.
pub fn is_valid_time(value: &str) -> bool {
    value.len() == 5
        && value.as_bytes()[2] == b':'
        && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleEntry {
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityEntry {
    pub date: String,
    pub is_available: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpaScheduleEntry {
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_holiday: bool,
    pub specific_date: Option<String>,
}

fn default_true() -> bool {
    true
}

pub fn validate_schedules(entries: &[ScheduleEntry]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut seen_days = [false; 7];

    for (index, entry) in entries.iter().enumerate() {
        let field = |name: &str| format!("schedules[{index}].{name}");

        if !(0..=6).contains(&entry.day_of_week) {
            errors.push(FieldError::new(
                field("day_of_week"),
                "El día debe estar entre 0 (lunes) y 6 (domingo)",
            ));
        } else {
            let day = entry.day_of_week as usize;
            if seen_days[day] {
                errors.push(FieldError::new(
                    field("day_of_week"),
                    "Ya existe un horario para este día",
                ));
            }
            seen_days[day] = true;
        }

        errors.extend(check_time_pair(
            &entry.start_time,
            &entry.end_time,
            &field("start_time"),
            &field("end_time"),
        ));
    }

    errors
}

pub fn validate_availability(entries: &[AvailabilityEntry]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut seen_dates: Vec<&str> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let field = |name: &str| format!("availability[{index}].{name}");

        if !is_valid_date(&entry.date) {
            errors.push(FieldError::new(
                field("date"),
                "La fecha debe tener el formato AAAA-MM-DD",
            ));
        } else if seen_dates.contains(&entry.date.as_str()) {
            errors.push(FieldError::new(
                field("date"),
                "Ya existe una excepción para esta fecha",
            ));
        } else {
            seen_dates.push(entry.date.as_str());
        }

        // Times are only meaningful for special-hours days. A full-day
        // absence carries no times at all.
        if entry.is_available {
            match (&entry.start_time, &entry.end_time) {
                (Some(start), Some(end)) => {
                    errors.extend(check_time_pair(
                        start,
                        end,
                        &field("start_time"),
                        &field("end_time"),
                    ));
                }
                (None, _) => errors.push(FieldError::new(
                    field("start_time"),
                    "La hora de inicio es obligatoria para un día disponible",
                )),
                (_, None) => errors.push(FieldError::new(
                    field("end_time"),
                    "La hora de fin es obligatoria para un día disponible",
                )),
            }
        }
    }

    errors
}

pub fn validate_spa_schedules(entries: &[SpaScheduleEntry]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut seen: Vec<(i64, Option<&str>)> = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let field = |name: &str| format!("schedules[{index}].{name}");

        if !(0..=6).contains(&entry.day_of_week) {
            errors.push(FieldError::new(
                field("day_of_week"),
                "El día debe estar entre 0 (lunes) y 6 (domingo)",
            ));
        }

        if let Some(date) = &entry.specific_date {
            if !is_valid_date(date) {
                errors.push(FieldError::new(
                    field("specific_date"),
                    "La fecha debe tener el formato AAAA-MM-DD",
                ));
            }
        }

        let key = (entry.day_of_week, entry.specific_date.as_deref());
        if seen.contains(&key) {
            errors.push(FieldError::new(
                field("day_of_week"),
                "Entrada duplicada para este día",
            ));
        }
        seen.push(key);

        errors.extend(check_time_pair(
            &entry.start_time,
            &entry.end_time,
            &field("start_time"),
            &field("end_time"),
        ));
    }

    errors
}

fn check_time_pair(
    start: &str,
    end: &str,
    start_field: &str,
    end_field: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_time(start) {
        errors.push(FieldError::new(
            start_field,
            "La hora debe tener el formato HH:MM",
        ));
    }
    if !is_valid_time(end) {
        errors.push(FieldError::new(
            end_field,
            "La hora debe tener el formato HH:MM",
        ));
    }
    if errors.is_empty() && start >= end {
        errors.push(FieldError::new(
            end_field,
            "La hora de fin debe ser posterior a la de inicio",
        ));
    }
    errors
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

pub fn validate_client(input: &ClientInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "El nombre es obligatorio"));
    }
    if input.phone.trim().is_empty() {
        errors.push(FieldError::new("phone", "El teléfono es obligatorio"));
    }
    errors
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManicuristInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

pub fn validate_manicurist(input: &ManicuristInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "El nombre es obligatorio"));
    }
    errors
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub duration_minutes: i64,
    #[serde(default = "default_true")]
    pub active: bool,
}

pub fn validate_service(input: &ServiceInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "El nombre es obligatorio"));
    }
    if input.price < 0 {
        errors.push(FieldError::new("price", "El precio no puede ser negativo"));
    }
    if input.duration_minutes <= 0 {
        errors.push(FieldError::new(
            "duration_minutes",
            "La duración debe ser mayor que cero",
        ));
    }
    errors
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodInput {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

pub fn validate_payment_method(input: &PaymentMethodInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.name.trim().is_empty() {
        errors.push(FieldError::new("name", "El nombre es obligatorio"));
    }
    errors
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalesGoalInput {
    pub year: i64,
    pub month: i64,
    pub target_amount: i64,
}

pub fn validate_sales_goal(input: &SalesGoalInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !(1..=12).contains(&input.month) {
        errors.push(FieldError::new("month", "El mes debe estar entre 1 y 12"));
    }
    if input.year < 2000 || input.year > 2100 {
        errors.push(FieldError::new("year", "Año fuera de rango"));
    }
    if input.target_amount <= 0 {
        errors.push(FieldError::new(
            "target_amount",
            "La meta debe ser mayor que cero",
        ));
    }
    errors
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentServiceInput {
    pub service_id: String,
    pub manicurist_id: String,
    pub price: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentInput {
    pub client_id: String,
    pub manicurist_id: Option<String>,
    pub scheduled_at: String,
    pub payment_method_id: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub services: Vec<AppointmentServiceInput>,
}

pub fn validate_appointment(input: &AppointmentInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.client_id.trim().is_empty() {
        errors.push(FieldError::new("client_id", "El cliente es obligatorio"));
    }
    if parse_timestamp(&input.scheduled_at).is_none() {
        errors.push(FieldError::new(
            "scheduled_at",
            "La fecha y hora deben tener el formato AAAA-MM-DDTHH:MM",
        ));
    }
    for (index, service) in input.services.iter().enumerate() {
        if service.service_id.trim().is_empty() {
            errors.push(FieldError::new(
                format!("services[{index}].service_id"),
                "El servicio es obligatorio",
            ));
        }
        if service.manicurist_id.trim().is_empty() {
            errors.push(FieldError::new(
                format!("services[{index}].manicurist_id"),
                "La manicurista es obligatoria",
            ));
        }
        if service.price < 0 {
            errors.push(FieldError::new(
                format!("services[{index}].price"),
                "El precio no puede ser negativo",
            ));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: i64, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            is_active: true,
        }
    }

    #[test]
    fn well_formed_times_pass() {
        for value in ["00:00", "09:30", "18:00", "23:59"] {
            assert!(is_valid_time(value), "{value} should be valid");
        }
    }

    #[test]
    fn malformed_times_fail() {
        for value in ["24:00", "09:60", "9:30", "09:3", "0930", "09-30", "", "aa:bb", "09:30 "] {
            assert!(!is_valid_time(value), "{value} should be invalid");
        }
    }

    #[test]
    fn schedule_with_valid_blocks_passes() {
        let entries = vec![entry(0, "09:00", "18:00"), entry(2, "10:00", "14:00")];
        assert!(validate_schedules(&entries).is_empty());
    }

    #[test]
    fn schedule_rejects_day_out_of_range() {
        let errors = validate_schedules(&[entry(7, "09:00", "18:00")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "schedules[0].day_of_week");
    }

    #[test]
    fn schedule_rejects_duplicate_day() {
        let errors = validate_schedules(&[entry(3, "09:00", "12:00"), entry(3, "13:00", "18:00")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "schedules[1].day_of_week");
    }

    #[test]
    fn schedule_rejects_inverted_range() {
        let errors = validate_schedules(&[entry(1, "18:00", "09:00")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "schedules[0].end_time");
    }

    fn availability(date: &str, available: bool, start: Option<&str>, end: Option<&str>) -> AvailabilityEntry {
        AvailabilityEntry {
            date: date.to_string(),
            is_available: available,
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
            reason: None,
        }
    }

    #[test]
    fn unavailable_day_needs_no_times() {
        let entries = vec![availability("2024-07-15", false, None, None)];
        assert!(validate_availability(&entries).is_empty());
    }

    #[test]
    fn unavailable_day_ignores_malformed_times() {
        let entries = vec![availability("2024-07-15", false, Some("99:99"), None)];
        assert!(validate_availability(&entries).is_empty());
    }

    #[test]
    fn available_day_requires_both_times() {
        let errors = validate_availability(&[availability("2024-07-15", true, Some("09:00"), None)]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "availability[0].end_time");

        let errors = validate_availability(&[availability("2024-07-15", true, None, Some("18:00"))]);
        assert_eq!(errors[0].field, "availability[0].start_time");
    }

    #[test]
    fn available_day_rejects_malformed_times() {
        let errors =
            validate_availability(&[availability("2024-07-15", true, Some("25:00"), Some("18:00"))]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "availability[0].start_time");
    }

    #[test]
    fn availability_rejects_bad_date_and_duplicates() {
        let errors = validate_availability(&[availability("15/07/2024", false, None, None)]);
        assert_eq!(errors[0].field, "availability[0].date");

        let errors = validate_availability(&[
            availability("2024-07-15", false, None, None),
            availability("2024-07-15", true, Some("09:00"), Some("12:00")),
        ]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "availability[1].date");
    }

    #[test]
    fn spa_schedule_allows_same_day_with_distinct_dates() {
        let base = SpaScheduleEntry {
            day_of_week: 0,
            start_time: "09:00".to_string(),
            end_time: "18:00".to_string(),
            is_active: true,
            is_holiday: false,
            specific_date: None,
        };
        let holiday = SpaScheduleEntry {
            specific_date: Some("2024-12-25".to_string()),
            is_holiday: true,
            ..base.clone()
        };
        assert!(validate_spa_schedules(&[base, holiday]).is_empty());
    }

    #[test]
    fn sales_goal_bounds() {
        let ok = SalesGoalInput { year: 2024, month: 6, target_amount: 5_000_000 };
        assert!(validate_sales_goal(&ok).is_empty());

        let bad = SalesGoalInput { year: 2024, month: 13, target_amount: 0 };
        let errors = validate_sales_goal(&bad);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn appointment_requires_client_and_timestamp() {
        let input = AppointmentInput {
            client_id: " ".to_string(),
            manicurist_id: None,
            scheduled_at: "mañana".to_string(),
            payment_method_id: None,
            notes: None,
            services: vec![],
        };
        let errors = validate_appointment(&input);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn appointment_accepts_both_timestamp_shapes() {
        assert!(parse_timestamp("2024-01-01T09:30").is_some());
        assert!(parse_timestamp("2024-01-01T09:30:00").is_some());
        assert!(parse_timestamp("2024-01-01 09:30").is_none());
    }
}

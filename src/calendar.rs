//! Week-view bucketing for the appointment calendar.
//!
//! The dashboard calendar shows one Monday-started week across the
//! business-hours window. Each (day, hour) cell holds the appointments
//! whose timestamp lands on that day with that hour component. A linear
//! scan per cell is fine at salon volumes.

use chrono::{Datelike, Days, NaiveDate, Timelike};
use serde::Serialize;

use crate::filters;
use crate::models::{AppointmentRow, AppointmentServiceRow};
use crate::validate::parse_timestamp;

/// Business-hours window, inclusive on both ends: 09:00 through 18:00.
pub const OPENING_HOUR: u32 = 9;
pub const CLOSING_HOUR: u32 = 18;

#[derive(Debug, Clone, Serialize)]
pub struct WeekGrid {
    pub week_start: String,
    pub days: Vec<DayColumn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayColumn {
    pub date: String,
    pub label: String,
    pub hours: Vec<HourCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourCell {
    pub hour: u32,
    pub appointments: Vec<AppointmentRow>,
}

/// The Monday of the week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    let days_back = date.weekday().num_days_from_monday() as u64;
    date - Days::new(days_back)
}

/// Bucket `appointments` into the week starting at `monday`. Rows with
/// an unparseable timestamp are dropped rather than failing the view.
pub fn bucket_week(appointments: &[AppointmentRow], monday: NaiveDate) -> WeekGrid {
    let mut days = Vec::with_capacity(7);

    for offset in 0..7u64 {
        let date = monday + Days::new(offset);
        let mut hours = Vec::with_capacity((CLOSING_HOUR - OPENING_HOUR + 1) as usize);

        for hour in OPENING_HOUR..=CLOSING_HOUR {
            let matching: Vec<AppointmentRow> = appointments
                .iter()
                .filter(|appointment| {
                    parse_timestamp(&appointment.scheduled_at)
                        .map(|at| at.date() == date && at.hour() == hour)
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            hours.push(HourCell {
                hour,
                appointments: matching,
            });
        }

        days.push(DayColumn {
            date: date.format("%Y-%m-%d").to_string(),
            label: filters::format_date_es(date),
            hours,
        });
    }

    WeekGrid {
        week_start: monday.format("%Y-%m-%d").to_string(),
        days,
    }
}

/// Displayed total of an appointment: the sum of its line-item prices.
pub fn appointment_total(services: &[AppointmentServiceRow]) -> i64 {
    services.iter().map(|service| service.price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: &str, scheduled_at: &str) -> AppointmentRow {
        AppointmentRow {
            id: id.to_string(),
            spa_id: "spa-1".to_string(),
            client_id: "client-1".to_string(),
            client_name: None,
            manicurist_id: None,
            manicurist_name: None,
            scheduled_at: scheduled_at.to_string(),
            status: "SCHEDULED".to_string(),
            payment_method_id: None,
            notes: None,
            created_at: "2024-01-01T00:00:00".to_string(),
        }
    }

    fn line_item(price: i64) -> AppointmentServiceRow {
        AppointmentServiceRow {
            id: "as-1".to_string(),
            appointment_id: "appt-1".to_string(),
            service_id: "svc-1".to_string(),
            service_name: None,
            manicurist_id: "mani-1".to_string(),
            price,
        }
    }

    fn cell<'a>(grid: &'a WeekGrid, date: &str, hour: u32) -> &'a HourCell {
        let day = grid
            .days
            .iter()
            .find(|day| day.date == date)
            .expect("day in grid");
        day.hours
            .iter()
            .find(|cell| cell.hour == hour)
            .expect("hour in window")
    }

    #[test]
    fn monday_of_week() {
        // 2024-01-03 is a Wednesday.
        let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(week_monday(wednesday), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        // A Monday maps to itself.
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(week_monday(monday), monday);
        // A Sunday belongs to the week that started six days earlier.
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(week_monday(sunday), monday);
    }

    #[test]
    fn appointments_land_in_their_hour_cell() {
        let rows = vec![
            appointment("a", "2024-01-01T09:30"),
            appointment("b", "2024-01-01T10:15"),
        ];
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let grid = bucket_week(&rows, monday);

        let nine = cell(&grid, "2024-01-01", 9);
        assert_eq!(nine.appointments.len(), 1);
        assert_eq!(nine.appointments[0].id, "a");

        let ten = cell(&grid, "2024-01-01", 10);
        assert_eq!(ten.appointments.len(), 1);
        assert_eq!(ten.appointments[0].id, "b");

        let eleven = cell(&grid, "2024-01-01", 11);
        assert!(eleven.appointments.is_empty());
    }

    #[test]
    fn grid_covers_seven_days_and_ten_slots() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let grid = bucket_week(&[], monday);
        assert_eq!(grid.days.len(), 7);
        for day in &grid.days {
            assert_eq!(day.hours.len(), 10);
            assert_eq!(day.hours.first().unwrap().hour, 9);
            assert_eq!(day.hours.last().unwrap().hour, 18);
        }
        assert_eq!(grid.days[0].date, "2024-01-01");
        assert_eq!(grid.days[6].date, "2024-01-07");
    }

    #[test]
    fn out_of_week_and_unparseable_rows_are_dropped() {
        let rows = vec![
            appointment("next-week", "2024-01-08T09:00"),
            appointment("garbage", "not-a-date"),
            appointment("after-hours", "2024-01-01T19:30"),
        ];
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let grid = bucket_week(&rows, monday);
        let total: usize = grid
            .days
            .iter()
            .flat_map(|day| day.hours.iter())
            .map(|cell| cell.appointments.len())
            .sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn total_sums_line_item_prices() {
        let services = vec![line_item(20_000), line_item(15_000), line_item(0)];
        assert_eq!(appointment_total(&services), 35_000);
        assert_eq!(appointment_total(&[]), 0);
    }
}

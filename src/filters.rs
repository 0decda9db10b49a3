//! Display conventions: Colombian peso amounts and Spanish-locale dates.

use chrono::{Datelike, NaiveDate};

const WEEKDAYS: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Colombian pesos carry no decimals: `$ 35.000`.
pub fn format_cop(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-$ {grouped}")
    } else {
        format!("$ {grouped}")
    }
}

/// "lunes 1 de enero de 2024".
pub fn format_date_es(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{weekday} {} de {month} de {}", date.day(), date.year())
}

pub fn month_name_es(month: u32) -> &'static str {
    MONTHS.get((month as usize).saturating_sub(1)).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peso_amounts_group_thousands_with_dots() {
        assert_eq!(format_cop(0), "$ 0");
        assert_eq!(format_cop(950), "$ 950");
        assert_eq!(format_cop(35_000), "$ 35.000");
        assert_eq!(format_cop(1_250_000), "$ 1.250.000");
        assert_eq!(format_cop(-35_000), "-$ 35.000");
    }

    #[test]
    fn dates_render_in_spanish() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date_es(date), "lunes 1 de enero de 2024");
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(format_date_es(date), "miércoles 25 de diciembre de 2024");
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name_es(1), "enero");
        assert_eq!(month_name_es(12), "diciembre");
        assert_eq!(month_name_es(0), "");
        assert_eq!(month_name_es(13), "");
    }
}

//! Spanish date and wind labels for the forecast panels.

use chrono::{Datelike, NaiveDate, Weekday};

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "enero",
        2 => "febrero",
        3 => "marzo",
        4 => "abril",
        5 => "mayo",
        6 => "junio",
        7 => "julio",
        8 => "agosto",
        9 => "septiembre",
        10 => "octubre",
        11 => "noviembre",
        12 => "diciembre",
        _ => "",
    }
}

/// "miércoles, 1 de mayo"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} de {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date.month())
    )
}

/// "mié." (counted in characters, not bytes)
pub fn short_weekday(date: NaiveDate) -> String {
    let name: String = weekday_name(date.weekday()).chars().take(3).collect();
    format!("{}.", name)
}

/// Arrow pointing where the wind blows to, from AEMET's Spanish compass
/// abbreviation. Calm ("C"), empty and unknown directions have no arrow.
pub fn wind_arrow(direction: &str) -> &'static str {
    match direction.trim() {
        "N" => "↓",
        "NE" => "↙",
        "E" => "←",
        "SE" => "↖",
        "S" => "↑",
        "SO" => "↗",
        "O" => "→",
        "NO" => "↘",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(long_date(date), "miércoles, 1 de mayo");
    }

    #[test]
    fn test_short_weekday_keeps_accents() {
        assert_eq!(short_weekday(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()), "mié.");
        assert_eq!(short_weekday(NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()), "sáb.");
        assert_eq!(short_weekday(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()), "lun.");
    }

    #[test]
    fn test_wind_arrows() {
        assert_eq!(wind_arrow("N"), "↓");
        assert_eq!(wind_arrow("SO"), "↗");
        assert_eq!(wind_arrow("NO"), "↘");
        assert_eq!(wind_arrow("C"), "");
        assert_eq!(wind_arrow(""), "");
        assert_eq!(wind_arrow("XYZ"), "");
    }
}

//! Forecast display model.
//!
//! Turns AEMET documents into the rows shown on the Forecast tab and keeps
//! track of what was last applied, so the same document is only rebuilt
//! when the time of day moves it forward.

use super::labels::{long_date, short_weekday, weekday_name, wind_arrow};
use crate::aemet::types::{DailyEntry, HourlyEntry, PeriodValue, Text};
use crate::aemet::{DailyForecast, HourlyForecast};
use crate::workers::ForecastUpdate;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Number of day cards after today.
pub const DAY_CARDS: usize = 5;

/// Index into the daily per-period arrays for the quarter of the day.
pub fn period_index(hour: u32) -> usize {
    match hour {
        0..=5 => 3,
        6..=11 => 4,
        12..=17 => 5,
        _ => 6,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodayCard {
    /// AEMET sky code, e.g. "12" or "12n".
    pub icon: String,
    pub date: String,
    pub min_temp: String,
    pub max_temp: String,
    pub wind_arrow: String,
    pub wind_speed: String,
    pub precipitation: String,
    pub description: String,
    pub thermal_sensation: String,
    pub uv_max: String,
    pub humidity: String,
}

impl Default for TodayCard {
    fn default() -> Self {
        Self {
            icon: "11".to_string(),
            date: "lunes, 1 de enero".to_string(),
            min_temp: "--°".to_string(),
            max_temp: "--°".to_string(),
            wind_arrow: String::new(),
            wind_speed: "-- km/h".to_string(),
            precipitation: "--%".to_string(),
            description: String::new(),
            thermal_sensation: "--°/--°".to_string(),
            uv_max: "--".to_string(),
            humidity: "--%/--%".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub icon: String,
    pub weekday: String,
    pub min_temp: String,
    pub max_temp: String,
    pub wind_arrow: String,
    pub wind_speed: String,
    pub precipitation: String,
}

impl Default for DayCard {
    fn default() -> Self {
        Self {
            icon: "11".to_string(),
            weekday: "--".to_string(),
            min_temp: "--°".to_string(),
            max_temp: "--°".to_string(),
            wind_arrow: String::new(),
            wind_speed: "--".to_string(),
            precipitation: "--%".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourRow {
    /// Start of the hour this row describes; `None` for placeholders.
    pub starts_at: Option<NaiveDateTime>,
    pub icon: String,
    pub weekday: String,
    pub hour: String,
    pub temperature: String,
    pub humidity: String,
    pub wind_arrow: String,
    pub wind_speed: String,
    /// Expected precipitation; empty when none.
    pub precipitation: String,
}

impl Default for HourRow {
    fn default() -> Self {
        Self {
            starts_at: None,
            icon: "11".to_string(),
            weekday: "--".to_string(),
            hour: "--".to_string(),
            temperature: "--°".to_string(),
            humidity: "--%".to_string(),
            wind_arrow: String::new(),
            wind_speed: "--".to_string(),
            precipitation: String::new(),
        }
    }
}

pub struct ForecastView {
    pub today: TodayCard,
    pub days: Vec<DayCard>,
    pub hours: Vec<HourRow>,
    /// Municipality name from the last daily document.
    pub location: Option<String>,

    visible_hours: usize,
    window_start: usize,
    current_hour_index: usize,
    period_index: Option<usize>,
    daily_issued: Option<NaiveDateTime>,
    hourly_issued: Option<NaiveDateTime>,

    // Kept so the display can advance with the clock between fetches.
    daily: Option<DailyForecast>,
    hourly: Option<HourlyForecast>,
}

impl ForecastView {
    pub fn new(visible_hours: usize) -> Self {
        let visible_hours = visible_hours.max(1);
        Self {
            today: TodayCard::default(),
            days: vec![DayCard::default(); DAY_CARDS],
            hours: vec![HourRow::default(); visible_hours],
            location: None,
            visible_hours,
            window_start: 0,
            current_hour_index: 0,
            period_index: None,
            daily_issued: None,
            hourly_issued: None,
            daily: None,
            hourly: None,
        }
    }

    /// Whether at least one real document has been applied.
    pub fn is_loaded(&self) -> bool {
        self.daily_issued.is_some() || self.hourly_issued.is_some()
    }

    /// Applies a worker result. Documents missing from `update` keep the
    /// previously cached ones.
    pub fn apply(&mut self, update: ForecastUpdate, now: NaiveDateTime) -> bool {
        if let Some(daily) = update.daily {
            self.daily = Some(daily);
        }
        if let Some(hourly) = update.hourly {
            self.hourly = Some(hourly);
        }
        self.refresh(now)
    }

    /// Re-applies the cached documents at `now`.
    pub fn refresh(&mut self, now: NaiveDateTime) -> bool {
        let mut changed = false;
        if let Some(daily) = self.daily.take() {
            changed |= self.update_daily(&daily, now);
            self.daily = Some(daily);
        }
        if let Some(hourly) = self.hourly.take() {
            changed |= self.update_hourly(&hourly, now);
            self.hourly = Some(hourly);
        }
        changed
    }

    /// Rebuilds the today and day cards when the document is newer or the
    /// period of the day changed.
    pub fn update_daily(&mut self, doc: &DailyForecast, now: NaiveDateTime) -> bool {
        let period = period_index(now.hour());
        let is_newer = self.daily_issued.map_or(true, |t| doc.elaborado > t);
        if !is_newer && self.period_index == Some(period) {
            return false;
        }

        let entries = &doc.prediccion.dia;
        let Some(today_index) = entries.iter().position(|e| e.fecha.day() == now.day()) else {
            log::warn!(
                "Daily forecast issued {} has no entry for day {}",
                doc.elaborado,
                now.day()
            );
            return false;
        };

        self.today = today_card(&entries[today_index], period);
        self.days = entries
            .iter()
            .skip(today_index + 1)
            .take(DAY_CARDS)
            .map(day_card)
            .collect();

        self.location = doc.nombre.clone();
        self.period_index = Some(period);
        self.daily_issued = Some(doc.elaborado);
        true
    }

    /// Rebuilds the hour rows for a newer document; otherwise only follows
    /// the clock by moving the window to the current hour.
    pub fn update_hourly(&mut self, doc: &HourlyForecast, now: NaiveDateTime) -> bool {
        let is_newer = self.hourly_issued.map_or(true, |t| doc.elaborado > t);
        if is_newer {
            let rows: Vec<HourRow> = doc.prediccion.dia.iter().flat_map(hour_rows).collect();
            if rows.is_empty() {
                log::warn!("Hourly forecast issued {} has no hours", doc.elaborado);
                return false;
            }
            self.hours = rows;
            self.hourly_issued = Some(doc.elaborado);
            self.window_start = 0;
            self.reset_window(now);
            true
        } else if self.update_current_hour_index(now) {
            self.reset_window(now);
            true
        } else {
            false
        }
    }

    fn update_current_hour_index(&mut self, now: NaiveDateTime) -> bool {
        let hour_start = now
            .date()
            .and_hms_opt(now.hour(), 0, 0)
            .unwrap_or(now);
        let index = self
            .hours
            .iter()
            .position(|row| row.starts_at == Some(hour_start))
            .unwrap_or(0);

        let moved = index != self.current_hour_index;
        self.current_hour_index = index;
        moved
    }

    /// Moves the window back to the current hour. Returns whether it moved.
    pub fn reset_window(&mut self, now: NaiveDateTime) -> bool {
        self.update_current_hour_index(now);
        if self.window_start != self.current_hour_index {
            self.window_start = self.current_hour_index;
            true
        } else {
            false
        }
    }

    /// Scrolls the window by `delta` rows if the result stays between the
    /// current hour and the last full window.
    pub fn move_window(&mut self, delta: isize) -> bool {
        let target = self.window_start as isize + delta;
        let limit = self.hours.len() as isize - self.visible_hours as isize;
        if self.current_hour_index as isize <= target && target < limit {
            self.window_start = target as usize;
            true
        } else {
            false
        }
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    pub fn current_hour_index(&self) -> usize {
        self.current_hour_index
    }

    pub fn visible_rows(&self) -> &[HourRow] {
        let start = self.window_start.min(self.hours.len());
        let end = (start + self.visible_hours).min(self.hours.len());
        &self.hours[start..end]
    }
}

/// Value for `period`, falling back to the whole-day entry when AEMET sent
/// fewer periods.
fn at_period<T>(values: &[T], period: usize) -> Option<&T> {
    values.get(period).or_else(|| values.first())
}

fn text_of(values: &[PeriodValue], index: usize) -> &str {
    values.get(index).map(|v| v.value.as_str()).unwrap_or("")
}

fn today_card(entry: &DailyEntry, period: usize) -> TodayCard {
    let sky = at_period(&entry.sky, period);
    let wind = at_period(&entry.wind, period);

    TodayCard {
        icon: sky.map(|s| s.value.to_string()).unwrap_or_default(),
        date: long_date(entry.fecha.date()),
        min_temp: format!("{}°", entry.temperature.minima),
        max_temp: format!("{}°", entry.temperature.maxima),
        wind_arrow: wind.map(|w| wind_arrow(&w.direccion)).unwrap_or("").to_string(),
        wind_speed: format!("{} km/h", wind.map(|w| w.velocidad.as_str()).unwrap_or("--")),
        precipitation: format!(
            "{}%",
            at_period(&entry.precipitation_probability, period)
                .map(|p| p.value.as_str())
                .unwrap_or("--")
        ),
        description: sky.map(|s| s.descripcion.clone()).unwrap_or_default(),
        thermal_sensation: format!(
            "{}°/{}°",
            entry.thermal_sensation.minima, entry.thermal_sensation.maxima
        ),
        uv_max: entry
            .uv_max
            .as_ref()
            .filter(|uv| !uv.is_empty())
            .map(Text::to_string)
            .unwrap_or_else(|| "--".to_string()),
        humidity: format!(
            "{}%/{}%",
            entry.relative_humidity.minima, entry.relative_humidity.maxima
        ),
    }
}

fn day_card(entry: &DailyEntry) -> DayCard {
    let wind = entry.wind.first();
    DayCard {
        icon: entry
            .sky
            .first()
            .map(|s| s.value.to_string())
            .unwrap_or_default(),
        weekday: weekday_name(entry.fecha.weekday()).to_string(),
        min_temp: format!("{}°", entry.temperature.minima),
        max_temp: format!("{}°", entry.temperature.maxima),
        wind_arrow: wind.map(|w| wind_arrow(&w.direccion)).unwrap_or("").to_string(),
        wind_speed: wind.map(|w| w.velocidad.to_string()).unwrap_or_default(),
        precipitation: format!("{}%", text_of(&entry.precipitation_probability, 0)),
    }
}

fn hour_rows(entry: &HourlyEntry) -> Vec<HourRow> {
    let date = entry.fecha.date();
    let weekday = short_weekday(date);
    let winds: Vec<_> = entry.winds().collect();

    entry
        .sky
        .iter()
        .enumerate()
        .map(|(i, sky)| {
            let hour = sky.periodo.clone().unwrap_or_default();
            let starts_at = hour
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|h| date.and_hms_opt(h, 0, 0));
            let wind = winds.get(i);
            let precipitation = match text_of(&entry.precipitation, i) {
                "0" => String::new(),
                other => other.to_string(),
            };

            HourRow {
                starts_at,
                icon: sky.value.to_string(),
                weekday: weekday.clone(),
                hour,
                temperature: format!("{}°", text_of(&entry.temperature, i)),
                humidity: format!("{}%", text_of(&entry.relative_humidity, i)),
                wind_arrow: wind.map(|w| wind_arrow(w.direction())).unwrap_or("").to_string(),
                wind_speed: wind.map(|w| w.speed().to_string()).unwrap_or_default(),
                precipitation,
            }
        })
        .collect()
}

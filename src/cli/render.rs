//! Plain-text views of calendar state.

use crate::calendar::CalendarUiState;
use crate::domain::{month_grid, DailyEntry, Mood};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

const WEEKDAY_HEADERS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
const EMPTY_MARK: &str = "  ";

/// Month grid with one mood emoji per recorded day and today in brackets,
/// followed by the legend, the month's entries and any pending error.
pub fn render_month(state: &CalendarUiState, today: NaiveDate) -> String {
    let month = state.current_month;
    let mut lines = Vec::new();

    let title = month.first_day().format("%B %Y").to_string();
    lines.push(format!("{:^35}", title));
    let header: Vec<String> = WEEKDAY_HEADERS.iter().map(|d| format!(" {} ", d)).collect();
    lines.push(header.join("  ").trim_end().to_string());

    for week in month_grid(month) {
        // A week cut short at the start of the date range keeps its columns.
        let offset = week
            .first()
            .map_or(0, |day| day.weekday().num_days_from_monday() as usize);
        let mut cells = vec![blank_cell(); offset];
        cells.extend(week.iter().map(|day| {
            if !month.contains(*day) {
                return blank_cell();
            }
            let mark = state
                .entry_for(*day)
                .map(|e| e.mood().emoji())
                .unwrap_or(EMPTY_MARK);
            if *day == today {
                format!("[{:>2}]{}", day.day(), mark)
            } else {
                format!(" {:>2} {}", day.day(), mark)
            }
        }));
        lines.push(cells.concat().trim_end().to_string());
    }

    lines.push(String::new());
    lines.push(render_legend());

    if !state.entries_by_date.is_empty() {
        lines.push(String::new());
        lines.extend(state.entries_by_date.values().map(render_entry));
    }

    if let Some(message) = &state.error_message {
        lines.push(String::new());
        lines.push(format!("Error: {}", message));
    }

    to_text(lines)
}

/// One line per day of `days`, with the mood and note where recorded.
pub fn render_week(days: &[NaiveDate], entries: &[DailyEntry]) -> String {
    let by_date: BTreeMap<NaiveDate, &DailyEntry> = entries.iter().map(|e| (e.date(), e)).collect();

    let lines = days.iter().map(|day| match by_date.get(day) {
        Some(entry) => format!("{} {}", day.format("%a"), render_entry(entry)),
        None => format!("{} {}  -", day.format("%a"), day),
    });

    to_text(lines)
}

pub fn render_entry(entry: &DailyEntry) -> String {
    let line = format!("{} {} {}", entry.date(), entry.mood().emoji(), entry.mood());
    if entry.note().is_empty() {
        line
    } else {
        format!("{}: {}", line, entry.note())
    }
}

fn blank_cell() -> String {
    format!("    {}", EMPTY_MARK)
}

/// Newline-terminated lines.
fn to_text(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// Mood legend with the colour of each mood.
pub fn render_legend() -> String {
    Mood::ALL
        .iter()
        .map(|mood| format!("{} {} ({})", mood.emoji(), mood, mood.color_hex()))
        .collect::<Vec<_>>()
        .join("   ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearMonth;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_month_marks_entries_and_today() {
        let mut state = CalendarUiState::new(YearMonth::new(2024, 3).unwrap());
        let entry = DailyEntry::new(date(2024, 3, 15), Mood::Happy, "Good day").unwrap();
        state.entries_by_date.insert(entry.date(), entry);

        let out = render_month(&state, date(2024, 3, 20));

        assert!(out.contains("March 2024"));
        assert!(out.contains(" 15 😊"));
        assert!(out.contains("[20]"));
        assert!(out.contains("#4CAF50"));
        assert!(out.contains("2024-03-15 😊 Happy: Good day"));
        assert!(!out.contains("Error"));
    }

    #[test]
    fn test_render_month_shows_error() {
        let mut state = CalendarUiState::new(YearMonth::new(2024, 3).unwrap());
        state.error_message = Some("Failed to load entries: boom".to_string());

        let out = render_month(&state, date(2000, 1, 1));
        assert!(out.contains("Error: Failed to load entries: boom"));
    }

    #[test]
    fn test_render_earliest_month() {
        let state = CalendarUiState::new(YearMonth::containing(NaiveDate::MIN));
        let out = render_month(&state, date(2024, 3, 20));

        let first_row = out.lines().nth(2).unwrap();
        let offset = NaiveDate::MIN.weekday().num_days_from_monday() as usize;
        assert_eq!(first_row.find(" 1 "), Some(offset * 6 + 1));
    }

    #[test]
    fn test_render_week() {
        let days: Vec<NaiveDate> = (11..=17).map(|d| date(2024, 3, d)).collect();
        let entries = vec![DailyEntry::new(date(2024, 3, 12), Mood::Calm, "").unwrap()];

        let out = render_week(&days, &entries);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Mon 2024-03-11  -");
        assert_eq!(lines[1], "Tue 2024-03-12 😌 Calm");
    }

    #[test]
    fn test_legend_lists_every_mood() {
        let legend = render_legend();
        for mood in Mood::ALL {
            assert!(legend.contains(mood.color_hex()));
        }
    }
}

use super::counters::{seconds_to_interval, DailyCounters};
use prettytable::{row, Table};
use std::error::Error;

pub struct View {}

impl View {
    pub fn day(counters: &DailyCounters) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "SCREEN TIME", "OVERUSE", "SESSIONS", "DAYS OF USE"]);
        table.add_row(row![
            counters.date.format("%Y-%m-%d"),
            seconds_to_interval(counters.screen_time_secs),
            seconds_to_interval(counters.overuse_secs),
            counters.sessions_count,
            counters.days_of_use
        ]);
        table.printstd();

        Ok(())
    }

    pub fn breaks(counters: &DailyCounters) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();

        table.add_row(row!["CHOICE", "TAKEN", "ENDED EARLY"]);
        table.add_row(row![
            "Eye exercise",
            counters.eye_exercise,
            counters.eye_exercise_early_end
        ]);
        table.add_row(row![
            "Close eyes",
            counters.eye_close,
            counters.eye_close_early_end
        ]);
        table.add_row(row!["Skipped", counters.skip, "-"]);
        table.printstd();

        Ok(())
    }

    pub fn history(days: &Vec<DailyCounters>) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "SCREEN TIME", "OVERUSE", "SESSIONS"]);
        for day in days {
            table.add_row(row![
                day.date.format("%Y-%m-%d"),
                seconds_to_interval(day.screen_time_secs),
                seconds_to_interval(day.overuse_secs),
                day.sessions_count
            ]);
        }
        table.printstd();

        Ok(())
    }
}

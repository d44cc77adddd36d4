use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{Page, Result};

pub(crate) fn parse_date_input(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    None
}

impl Page {
    pub fn relative_time(&self, date_string: &str) -> String {
        let Some(date) = parse_date_input(date_string) else {
            return String::new();
        };
        let days = (date - self.current_date()).num_days();
        if days < 0 {
            let past = -days;
            if past == 1 {
                "1 day ago".to_string()
            } else {
                format!("{past} days ago")
            }
        } else if days == 0 {
            "today".to_string()
        } else if days == 1 {
            "tomorrow".to_string()
        } else {
            format!("{days} days from now")
        }
    }

    pub fn format_date(&self, date_string: &str) -> String {
        let Some(date) = parse_date_input(date_string) else {
            return String::new();
        };
        let today = self.current_date();
        if date == today {
            "today".to_string()
        } else if date == today.succ_opt().unwrap_or(today) {
            "tomorrow".to_string()
        } else {
            date.format("%Y-%m-%d").to_string()
        }
    }

    pub(crate) fn update_relative_times(&mut self) -> Result<()> {
        for element in self.dom.query_all(self.dom.root, "[data-time]")? {
            let date_string = self.dom.attr(element, "data-time").unwrap_or_default();
            let label = self.relative_time(&date_string);
            self.dom.set_text_content(element, &label)?;
        }
        Ok(())
    }
}

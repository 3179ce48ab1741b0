use chrono::{Duration, NaiveDate};

use crate::storage::entities::LogEntry;
use crate::utils::time::format_timedelta;

/// Aggregate of one contiguous run of entries sharing a date.
#[derive(Debug, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total: Duration,
    /// Per-project totals, ordered by first appearance within the group.
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, PartialEq)]
pub struct ProjectSummary {
    pub name: String,
    pub total: Duration,
    /// From/To lines of the contributing shifts, in encounter order.
    pub file_history: String,
}

/// Folds raw log entries into per-date, per-project summaries.
///
/// Grouping is by adjacency: a new date group starts exactly when an entry's
/// date differs from the immediately preceding entry's. The log's append
/// order is chronological, so in practice each date forms one group; a
/// non-contiguous repeat of a date produces a separate group rather than
/// being merged back. Known limitation, kept on purpose.
pub fn condense(entries: &[LogEntry]) -> Vec<DaySummary> {
    let mut days = Vec::<DaySummary>::new();

    for entry in entries {
        match days.last() {
            Some(day) if day.date == entry.date => {}
            _ => days.push(DaySummary {
                date: entry.date,
                total: Duration::zero(),
                projects: vec![],
            }),
        }
        let day = days.last_mut().expect("a day group was just ensured");

        day.total += entry.time;

        let name = entry.display_project();
        let project = match day.projects.iter().position(|p| p.name == name) {
            Some(index) => &mut day.projects[index],
            None => {
                day.projects.push(ProjectSummary {
                    name: name.to_owned(),
                    total: Duration::zero(),
                    file_history: String::new(),
                });
                day.projects.last_mut().expect("just pushed")
            }
        };
        project.total += entry.time;
        if let (Some(first), Some(last)) = (&entry.first_save, &entry.last_save) {
            project
                .file_history
                .push_str(&format!("  * From: {first}  To: {last}\n"));
        }
    }

    days
}

/// Renders summaries as the textual aggregate report handed to the display
/// surface.
pub fn render(days: &[DaySummary]) -> String {
    let mut out = String::new();
    for day in days {
        out.push_str(&format!(
            "\n\n{} - Time: {}\n\n",
            day.date.format("%m/%d/%Y"),
            format_timedelta(day.total),
        ));
        for project in &day.projects {
            out.push_str(&format!(
                "{} - Time: {}\n",
                project.name,
                format_timedelta(project.total),
            ));
            out.push_str(&project.file_history);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::storage::entities::MISC_PROJECT;

    use super::*;

    fn entry(project: Option<&str>, minutes: i64, date: (i32, u32, u32)) -> LogEntry {
        LogEntry {
            project_name: project.map(Arc::from),
            time: Duration::minutes(minutes),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            files_saved: vec![],
            first_save: None,
            last_save: None,
        }
    }

    #[test]
    fn test_same_project_times_accumulate() {
        let days = condense(&[
            entry(Some("foo"), 10, (2018, 7, 4)),
            entry(Some("foo"), 25, (2018, 7, 4)),
            entry(Some("bar"), 5, (2018, 7, 4)),
        ]);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].total, Duration::minutes(40));
        assert_eq!(days[0].projects.len(), 2);
        assert_eq!(days[0].projects[0].name, "foo");
        assert_eq!(days[0].projects[0].total, Duration::minutes(35));
        assert_eq!(days[0].projects[1].total, Duration::minutes(5));
    }

    #[test]
    fn test_adjacency_grouping_splits_interleaved_dates() {
        let days = condense(&[
            entry(Some("foo"), 10, (2018, 7, 4)),
            entry(Some("foo"), 20, (2018, 7, 5)),
            entry(Some("foo"), 30, (2018, 7, 4)),
        ]);

        // Two separate groups for the repeated date, not one merged group.
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, days[2].date);
        assert_eq!(days[0].total, Duration::minutes(10));
        assert_eq!(days[2].total, Duration::minutes(30));
    }

    #[test]
    fn test_missing_project_surfaces_as_misc() {
        let days = condense(&[entry(None, 15, (2018, 7, 4))]);
        assert_eq!(days[0].projects[0].name, MISC_PROJECT);
    }

    #[test]
    fn test_file_history_concatenates_in_order() {
        let mut first = entry(Some("foo"), 10, (2018, 7, 4));
        first.first_save = Some("2018-07-04 10:00:00.000000".into());
        first.last_save = Some("2018-07-04 10:10:00.000000".into());
        let mut second = entry(Some("foo"), 5, (2018, 7, 4));
        second.first_save = Some("2018-07-04 11:00:00.000000".into());
        second.last_save = Some("2018-07-04 11:05:00.000000".into());

        let days = condense(&[first, second]);
        let history = &days[0].projects[0].file_history;
        assert_eq!(history.matches("  * From: ").count(), 2);
        assert!(
            history.find("10:00:00").unwrap() < history.find("11:00:00").unwrap(),
            "history should keep encounter order"
        );
    }

    #[test]
    fn test_render_lists_days_and_projects() {
        let days = condense(&[
            entry(Some("foo"), 30, (2018, 7, 4)),
            entry(Some("bar"), 15, (2018, 7, 5)),
        ]);

        let text = render(&days);
        assert!(text.contains("07/04/2018 - Time: 0:30:00"));
        assert!(text.contains("foo - Time: 0:30:00"));
        assert!(text.contains("07/05/2018 - Time: 0:15:00"));
        assert!(text.contains("bar - Time: 0:15:00"));
    }
}

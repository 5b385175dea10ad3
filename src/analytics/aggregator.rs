//! Pure aggregation functions
//!
//! Everything here works on already-loaded records so it can be tested
//! without a store. Durations are `end - start` in hours; every reported
//! hour figure and rate is rounded to two decimals.

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use super::models::*;
use crate::calendar::{CalendarEvent, EventStatus};
use crate::diary::DiaryEntry;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Something that can be ranked by engagement
pub trait Popular {
    fn likes(&self) -> u64;
    fn views(&self) -> u64;

    /// `likes * 2 + views`
    fn popularity_score(&self) -> u64 {
        self.likes() * 2 + self.views()
    }
}

/// Highest score first, ties keep their input order, at most `limit` items
pub fn rank_by_popularity<T: Popular>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.sort_by(|a, b| b.popularity_score().cmp(&a.popularity_score()));
    items.truncate(limit);
    items
}

/// Sum tracked hours per referenced record
///
/// Only completed or in-progress events inside the window count. Events
/// whose reference has no entry in `names` are dropped.
pub fn time_by_group<F>(
    events: &[CalendarEvent],
    names: &HashMap<Uuid, String>,
    window: &TimeWindow,
    reference: F,
) -> Vec<GroupTime>
where
    F: Fn(&CalendarEvent) -> Option<Uuid>,
{
    let mut groups: Vec<GroupTime> = Vec::new();
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for event in events {
        if !event.status.is_tracked() || !window.contains(event.start_time) {
            continue;
        }
        let Some(id) = reference(event) else {
            continue;
        };
        let Some(name) = names.get(&id) else {
            continue;
        };

        let pos = *positions.entry(id).or_insert_with(|| {
            groups.push(GroupTime {
                id,
                name: name.clone(),
                total_hours: 0.0,
                task_count: 0,
            });
            groups.len() - 1
        });
        groups[pos].total_hours += event.duration_hours();
        groups[pos].task_count += 1;
    }

    // Rank on the exact sums, round only for reporting
    groups.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));
    for group in &mut groups {
        group.total_hours = round2(group.total_hours);
    }
    groups
}

/// Task counts and hours over every event in the window, whatever its status
pub fn productivity_overview(events: &[CalendarEvent], window: &TimeWindow) -> ProductivityOverview {
    let in_window: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| window.contains(e.start_time))
        .collect();

    let total_tasks = in_window.len();
    let completed_tasks = in_window
        .iter()
        .filter(|e| e.status == EventStatus::Completed)
        .count();
    let total_hours: f64 = in_window.iter().map(|e| e.duration_hours()).sum();

    // Day buckets in first-seen order so ties go to the earliest seen day
    let mut days: Vec<(String, f64, usize)> = Vec::new();
    let mut day_positions: HashMap<String, usize> = HashMap::new();
    for event in &in_window {
        let day = event.start_time.format("%Y-%m-%d").to_string();
        let pos = match day_positions.get(&day) {
            Some(pos) => *pos,
            None => {
                days.push((day.clone(), 0.0, 0));
                day_positions.insert(day, days.len() - 1);
                days.len() - 1
            }
        };
        days[pos].1 += event.duration_hours();
        days[pos].2 += 1;
    }

    let mut best: Option<&(String, f64, usize)> = None;
    for day in &days {
        if best.map_or(true, |b| day.1 > b.1) {
            best = Some(day);
        }
    }
    let most_productive_day = best.map(|(date, hours, tasks)| ProductiveDay {
        date: date.clone(),
        hours: round2(*hours),
        tasks: *tasks,
    });

    let (completion_rate, average_hours_per_task) = if total_tasks > 0 {
        (
            round2(completed_tasks as f64 / total_tasks as f64 * 100.0),
            round2(total_hours / total_tasks as f64),
        )
    } else {
        (0.0, 0.0)
    };

    ProductivityOverview {
        total_tasks,
        completed_tasks,
        completion_rate,
        total_hours: round2(total_hours),
        average_hours_per_task,
        most_productive_day,
    }
}

/// Count entries per mood, by entry date. Entries without a mood are skipped.
pub fn mood_summary(entries: &[DiaryEntry], window: &TimeWindow) -> MoodSummary {
    let mut counts = BTreeMap::new();
    for entry in entries {
        if !window.contains_date(entry.date) {
            continue;
        }
        if let Some(mood) = entry.mood {
            *counts.entry(mood).or_insert(0) += 1;
        }
    }
    MoodSummary(counts)
}

/// Totals over the tracked events referencing one skill
pub fn skill_stats(events: &[CalendarEvent], skill_id: Uuid) -> SkillStats {
    let tracked = events
        .iter()
        .filter(|e| e.skill_id == Some(skill_id) && e.status.is_tracked());

    let mut stats = SkillStats::default();
    for event in tracked {
        stats.total_hours += event.duration_hours();
        if event.status == EventStatus::Completed {
            stats.tasks_completed += 1;
        }
        if stats.last_practiced.map_or(true, |last| event.end_time > last) {
            stats.last_practiced = Some(event.end_time);
        }
    }
    stats.total_hours = round2(stats.total_hours);
    stats
}

/// Totals over the tracked events referencing one project
pub fn project_stats(events: &[CalendarEvent], project_id: Uuid) -> ProjectStats {
    let tracked = events
        .iter()
        .filter(|e| e.project_id == Some(project_id) && e.status.is_tracked());

    let mut stats = ProjectStats::default();
    for event in tracked {
        stats.total_hours += event.duration_hours();
        stats.total_tasks += 1;
        if event.status == EventStatus::Completed {
            stats.completed_tasks += 1;
        }
    }
    stats.total_hours = round2(stats.total_hours);
    stats
}

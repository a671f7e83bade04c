// Habit store
// Caches habits and tags, tracks the selected habit, and derives the header
// view fields (title, count, tag badges, streak) the habit panel renders.

use super::ActionResult;
use crate::api::habits::{Habit, NewHabit};
use crate::api::ApiClient;

/// A tag with its display color class.
#[derive(Debug, Clone, PartialEq)]
pub struct TagBadge {
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Default)]
pub struct HabitsStore {
    habits: Vec<Habit>,
    tags: Vec<String>,
    selected: Option<usize>,
    total_count: u32,
    last_error: Option<String>,
}

impl HabitsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn selected_habit(&self) -> Option<&Habit> {
        self.selected.and_then(|i| self.habits.get(i))
    }

    /// Select a habit by index; selecting the current one clears selection.
    pub fn select(&mut self, index: usize) {
        if self.selected == Some(index) {
            self.selected = None;
        } else if index < self.habits.len() {
            self.selected = Some(index);
        }
    }

    pub fn header_title(&self) -> String {
        match self.selected_habit() {
            Some(habit) => habit.name.clone(),
            None => "Pick or add a habit".to_string(),
        }
    }

    /// Selected habit's completion count, or the total across all habits.
    pub fn header_count(&self) -> u32 {
        match self.selected_habit() {
            Some(habit) => habit.completion_count,
            None => self.total_count,
        }
    }

    pub fn header_streak(&self) -> u32 {
        self.selected_habit().map(|h| h.streak).unwrap_or(0)
    }

    pub fn header_tags(&self) -> Vec<TagBadge> {
        match self.selected_habit() {
            Some(habit) if !habit.tags.is_empty() => habit
                .tags
                .iter()
                .map(|tag| TagBadge {
                    label: tag.clone(),
                    color: tag_color(tag),
                })
                .collect(),
            _ => vec![TagBadge {
                label: "no notes".to_string(),
                color: "green",
            }],
        }
    }

    /// Replace the cache with the server's habits, normalizing icons and
    /// recomputing the total completion count.
    pub async fn fetch_habits(&mut self, api: &ApiClient) -> ActionResult {
        match api.habits().await {
            Ok(mut habits) => {
                for habit in &mut habits {
                    normalize_icon(habit);
                }
                self.total_count = habits.iter().map(|h| h.completion_count).sum();
                self.habits = habits;
                self.selected = None;
                self.ok()
            }
            Err(e) => self.record_error("Failed to fetch habits", e),
        }
    }

    pub async fn fetch_tags(&mut self, api: &ApiClient) -> ActionResult {
        match api.habit_tags().await {
            Ok(tags) => {
                self.tags = tags;
                self.ok()
            }
            Err(e) => self.record_error("Failed to fetch habit tags", e),
        }
    }

    pub async fn add_habit(&mut self, api: &ApiClient, habit: &NewHabit) -> ActionResult {
        match api.create_habit(habit).await {
            Ok(mut created) => {
                normalize_icon(&mut created);
                self.habits.push(created);
                self.selected = Some(self.habits.len() - 1);
                self.ok()
            }
            Err(e) => self.record_error("Failed to create habit", e),
        }
    }

    pub async fn update_habit(
        &mut self,
        api: &ApiClient,
        habit_id: &str,
        habit: &NewHabit,
    ) -> ActionResult {
        match api.update_habit(habit_id, habit).await {
            Ok(mut updated) => {
                normalize_icon(&mut updated);
                if let Some(cached) = self.habits.iter_mut().find(|h| h.id == habit_id) {
                    *cached = updated;
                }
                self.ok()
            }
            Err(e) => self.record_error("Failed to update habit", e),
        }
    }

    pub async fn delete_habit(&mut self, api: &ApiClient, habit_id: &str) -> ActionResult {
        match api.delete_habit(habit_id).await {
            Ok(()) => {
                if let Some(selected) = self.selected {
                    if self
                        .habits
                        .get(selected)
                        .map(|h| h.id == habit_id)
                        .unwrap_or(false)
                    {
                        self.selected = None;
                    }
                }
                self.habits.retain(|h| h.id != habit_id);
                self.ok()
            }
            Err(e) => self.record_error("Failed to delete habit", e),
        }
    }

    /// Mark a habit done for today, patching counters from the server record.
    /// Reading habits cap at one completion per day and are skipped silently
    /// once at the cap.
    pub async fn complete(&mut self, api: &ApiClient, habit_id: &str) -> ActionResult {
        if let Some(habit) = self.habits.iter().find(|h| h.id == habit_id) {
            if !can_complete(habit) {
                tracing::debug!(%habit_id, "Reading habit already at daily cap");
                return self.ok();
            }
        }

        match api.complete_habit(habit_id).await {
            Ok(updated) => {
                self.patch_counters(habit_id, updated);
                self.ok()
            }
            Err(e) => self.record_error("Failed to complete habit", e),
        }
    }

    /// Undo today's completion, patching counters from the server record.
    pub async fn uncomplete(&mut self, api: &ApiClient, habit_id: &str) -> ActionResult {
        match api.uncomplete_habit(habit_id).await {
            Ok(updated) => {
                self.patch_counters(habit_id, updated);
                self.ok()
            }
            Err(e) => self.record_error("Failed to uncomplete habit", e),
        }
    }

    /// Apply the server's counters to the cached record, shifting the total
    /// by the observed delta.
    fn patch_counters(&mut self, habit_id: &str, updated: Habit) {
        let total_delta: i64;
        if let Some(cached) = self.habits.iter_mut().find(|h| h.id == habit_id) {
            let before = cached.completion_count;
            cached.completion_count = updated.completion_count;
            cached.completed_today = updated.completed_today;
            cached.streak = updated.streak;
            total_delta = i64::from(cached.completion_count) - i64::from(before);
        } else {
            return;
        }
        self.total_count = (i64::from(self.total_count) + total_delta).max(0) as u32;
    }

    fn ok(&mut self) -> ActionResult {
        self.last_error = None;
        ActionResult::ok()
    }

    fn record_error(&mut self, context: &str, e: crate::api::ApiError) -> ActionResult {
        let message = format!("{context}: {e}");
        tracing::error!("{message}");
        self.last_error = Some(message.clone());
        ActionResult::fail(message)
    }
}

/// Display color class for a habit tag.
pub fn tag_color(tag: &str) -> &'static str {
    match tag {
        "bad" | "negative" => "red",
        "entertainment" | "fun" | "leisure" => "orange",
        "health" | "study" | "personal" => "green",
        "work" => "blue",
        "reading" => "purple",
        _ => "green",
    }
}

fn has_reading_tag(habit: &Habit) -> bool {
    habit.tags.iter().any(|t| t == "reading")
}

/// Reading habits are limited to one completion per day.
fn can_complete(habit: &Habit) -> bool {
    !has_reading_tag(habit) || habit.completion_count < 1
}

/// Replace a missing icon, or a legacy asset path, with a name derived from
/// the habit's tags.
fn normalize_icon(habit: &mut Habit) {
    let needs_icon = match &habit.icon {
        None => true,
        Some(icon) => icon.is_empty() || icon.contains('/'),
    };
    if !needs_icon {
        return;
    }

    let icon = if has_reading_tag(habit) {
        "book"
    } else if habit.tags.iter().any(|t| t == "health") {
        "heart"
    } else if habit.tags.iter().any(|t| t == "study") {
        "graduation-cap"
    } else if habit.tags.iter().any(|t| t == "work") {
        "briefcase"
    } else if habit.tags.iter().any(|t| t == "entertainment") {
        "gamepad"
    } else {
        "star"
    };
    habit.icon = Some(icon.to_string());
}

// Habit endpoints

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// e.g. "daily", "weekly".
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub completion_count: u32,
    #[serde(default)]
    pub completed_today: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHabit {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NewHabit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl ApiClient {
    pub async fn habits(&self) -> ApiResult<Vec<Habit>> {
        let token = self.bearer()?;
        self.send(self.http().get(self.url("/habits")).bearer_auth(token))
            .await
    }

    pub async fn habit_tags(&self) -> ApiResult<Vec<String>> {
        let token = self.bearer()?;
        self.send(self.http().get(self.url("/habits/tags")).bearer_auth(token))
            .await
    }

    pub async fn habit(&self, habit_id: &str) -> ApiResult<Habit> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .get(self.url(&format!("/habits/{habit_id}")))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn create_habit(&self, habit: &NewHabit) -> ApiResult<Habit> {
        tracing::debug!(name = %habit.name, "Creating habit");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url("/habits"))
                .bearer_auth(token)
                .json(habit),
        )
        .await
    }

    pub async fn update_habit(&self, habit_id: &str, habit: &NewHabit) -> ApiResult<Habit> {
        let token = self.bearer()?;
        self.send(
            self.http()
                .put(self.url(&format!("/habits/{habit_id}")))
                .bearer_auth(token)
                .json(habit),
        )
        .await
    }

    /// Mark a habit done for today. Returns the updated record with the
    /// bumped counters.
    pub async fn complete_habit(&self, habit_id: &str) -> ApiResult<Habit> {
        tracing::debug!(%habit_id, "Completing habit");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url(&format!("/habits/{habit_id}/complete")))
                .bearer_auth(token)
                .json(&serde_json::json!({})),
        )
        .await
    }

    /// Undo today's completion.
    pub async fn uncomplete_habit(&self, habit_id: &str) -> ApiResult<Habit> {
        tracing::debug!(%habit_id, "Uncompleting habit");
        let token = self.bearer()?;
        self.send(
            self.http()
                .post(self.url(&format!("/habits/{habit_id}/uncomplete")))
                .bearer_auth(token)
                .json(&serde_json::json!({})),
        )
        .await
    }

    pub async fn delete_habit(&self, habit_id: &str) -> ApiResult<()> {
        tracing::debug!(%habit_id, "Deleting habit");
        let token = self.bearer()?;
        self.send_unit(
            self.http()
                .delete(self.url(&format!("/habits/{habit_id}")))
                .bearer_auth(token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_counters_default_to_zero() {
        let habit: Habit =
            serde_json::from_str(r#"{"_id":"h1","name":"read","tags":["reading"]}"#).unwrap();
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.completion_count, 0);
        assert!(!habit.completed_today);
    }

    #[test]
    fn habit_parses_full_record() {
        let habit: Habit = serde_json::from_str(
            r##"{"_id":"h2","name":"run","tags":["health"],"frequency":"daily",
                "streak":4,"completionCount":17,"completedToday":true,
                "color":"#1f2937","icon":"heart"}"##,
        )
        .unwrap();
        assert_eq!(habit.streak, 4);
        assert_eq!(habit.completion_count, 17);
        assert!(habit.completed_today);
    }
}

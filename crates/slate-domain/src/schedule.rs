//! Shooting schedule input and the planned shoot-day shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One scene from the production's shooting schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub location: String,
    /// Scene numbers arrive as `12` or `"12A"` depending on the source tool.
    #[serde(default, deserialize_with = "number_or_string")]
    pub scene_number: String,
    #[serde(default)]
    pub scene_title: String,
    #[serde(default)]
    pub time_of_day: String,
}

/// Externally supplied shooting schedule document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub shooting_schedule: Vec<Scene>,
}

impl Schedule {
    pub fn is_empty(&self) -> bool {
        self.shooting_schedule.is_empty()
    }
}

/// A planned shoot day: one synthetic date and the scenes assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: String,
    pub scenes: Vec<Scene>,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_number_accepts_numbers_and_strings() {
        let a: Scene = serde_json::from_str(r#"{"scene_number": 12}"#).unwrap();
        let b: Scene = serde_json::from_str(r#"{"scene_number": "12A"}"#).unwrap();
        assert_eq!(a.scene_number, "12");
        assert_eq!(b.scene_number, "12A");
    }

    #[test]
    fn empty_document_is_an_empty_schedule() {
        let schedule: Schedule = serde_json::from_str("{}").unwrap();
        assert!(schedule.is_empty());
    }
}

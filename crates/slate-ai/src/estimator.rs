//! Shoot-day planning, prompt construction, and response parsing.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use slate_domain::{DaySchedule, EstimateMap, Schedule};
use tracing::info;

use crate::{AiError, GenerativeModel, RateLimiter};

const DEFAULT_CALL_INTERVAL: Duration = Duration::from_secs(4);

/// Turns a shooting schedule into a per-date cost estimate via a
/// generative model.
pub struct BudgetEstimator {
    model: Arc<dyn GenerativeModel>,
    limiter: RateLimiter,
}

impl BudgetEstimator {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self::with_interval(model, DEFAULT_CALL_INTERVAL)
    }

    pub fn with_interval(model: Arc<dyn GenerativeModel>, min_interval: Duration) -> Self {
        Self {
            model,
            limiter: RateLimiter::new(min_interval),
        }
    }

    /// Plans shoot days starting today. See [`Self::plan_shoot_days_from`].
    pub fn plan_shoot_days(schedule: &Schedule) -> Vec<DaySchedule> {
        Self::plan_shoot_days_from(schedule, Utc::now().date_naive())
    }

    /// Groups scenes by location (first-seen order) and assigns each
    /// location group one synthetic consecutive date from `start`.
    ///
    /// One shooting day per distinct location is a planning simplification;
    /// real calendar dates are out of scope. A zero-scene schedule plans
    /// zero days.
    pub fn plan_shoot_days_from(schedule: &Schedule, start: NaiveDate) -> Vec<DaySchedule> {
        let mut groups: Vec<(String, Vec<slate_domain::Scene>)> = Vec::new();
        for scene in &schedule.shooting_schedule {
            match groups.iter_mut().find(|(loc, _)| *loc == scene.location) {
                Some((_, scenes)) => scenes.push(scene.clone()),
                None => groups.push((scene.location.clone(), vec![scene.clone()])),
            }
        }

        groups
            .into_iter()
            .enumerate()
            .map(|(offset, (_, scenes))| DaySchedule {
                date: (start + ChronoDuration::days(offset as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                scenes,
            })
            .collect()
    }

    /// Builds the estimation prompt: one block per planned day, then the
    /// required output schema with a JSON-only instruction.
    pub fn build_prompt(days: &[DaySchedule]) -> String {
        let mut prompt = String::from(
            "You are an expert film production budget estimator. Based on the \
             following daily shooting schedule, generate a detailed daily budget \
             estimation in JSON format.\n\nSchedule:\n",
        );
        for day in days {
            let _ = writeln!(prompt, "\nDate: {}", day.date);
            for scene in &day.scenes {
                let _ = writeln!(
                    prompt,
                    "- Scene {}: {} at {} ({})",
                    scene.scene_number, scene.scene_title, scene.location, scene.time_of_day
                );
            }
        }
        prompt.push_str(
            "\nInstructions:\n\
             Generate a JSON object where each key is a date string (YYYY-MM-DD) \
             from the schedule. For each date, provide estimates for:\n\
             - junior_artist_wage: junior artist cost between 10000 and 40000.\n\
             - location_rent: location rent between 10000 and 75000.\n\
             - travel_expense: travel costs between 7000 and 30000.\n\
             - food_expense: cast and crew food between 8000 and 15000.\n\
             - art_costume_expense: art department and costume costs.\n\
             Calculate the total_estimated for each day.\n\n\
             Output format (JSON only):\n\
             {\n  \"YYYY-MM-DD\": {\n    \"junior_artist_wage\": <amount>,\n    \
             \"location_rent\": <amount>,\n    \"travel_expense\": <amount>,\n    \
             \"food_expense\": <amount>,\n    \"art_costume_expense\": <amount>,\n    \
             \"total_estimated\": <total_amount>\n  }\n}\n",
        );
        prompt
    }

    /// Runs the full pipeline for a schedule: plan days, prompt the model
    /// (rate limited), and parse its reply into an estimate map.
    pub async fn estimate(&self, schedule: &Schedule) -> Result<EstimateMap, AiError> {
        self.estimate_days(&Self::plan_shoot_days(schedule)).await
    }

    /// As [`Self::estimate`], for an already-planned set of days.
    pub async fn estimate_days(&self, days: &[DaySchedule]) -> Result<EstimateMap, AiError> {
        let prompt = Self::build_prompt(days);
        self.limiter.acquire().await;
        let raw = self.model.generate(&prompt).await?;
        let estimates = parse_response(&raw)?;
        info!(days = estimates.len(), "parsed model estimate");
        Ok(estimates)
    }
}

/// Extracts the first `{`-to-last-`}` substring and decodes it.
pub(crate) fn parse_response(raw: &str) -> Result<EstimateMap, AiError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    let json = extract_json_object(text).ok_or_else(|| AiError::NoJsonObject {
        raw: text.to_string(),
    })?;
    serde_json::from_str(json).map_err(|err| AiError::InvalidJson {
        message: err.to_string(),
        raw: json.to_string(),
    })
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

//! Advisory text client: turns a computed assessment plus a free-text
//! question into practical guidance via an OpenAI-compatible chat
//! completions API.
//!
//! Strictly a downstream consumer: it reads an already-computed
//! [`AqiResult`] and profile and feeds nothing back into the pipeline.

use anyhow::{Context, Result};
use aqi_kernel::{AqiResult, PollutantProfile, WIND_SPEED};
use serde::{Deserialize, Serialize};

/// System prompt framing the assistant for every advisory request.
pub const ADVISORY_SYSTEM_PROMPT: &str = "You are an air quality and public health \
    assistant. Respond in clear, concise, and practical language.";

/// Who is asking: tailors the advice between daily-life precautions and
/// policy/enforcement actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Citizen,
    Authority,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => "citizen",
            UserRole::Authority => "authority",
        }
    }
}

/// Weather conditions accompanying an assessment.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WeatherSnapshot {
    pub wind_speed: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl WeatherSnapshot {
    /// Pull whatever weather parameters rode along in the profile.
    pub fn from_profile(profile: &PollutantProfile) -> Self {
        Self {
            wind_speed: profile.get(WIND_SPEED).copied(),
            temperature: profile.get("temperature").copied(),
            humidity: profile
                .get("humidity")
                .or_else(|| profile.get("relativehumidity"))
                .copied(),
        }
    }
}

/// Build the context-rich user prompt for one advisory request.
///
/// Pollutants are listed in sorted key order so the prompt is deterministic
/// for a given profile.
pub fn build_advisory_prompt(
    role: UserRole,
    aqi: &AqiResult,
    pollutants: &PollutantProfile,
    weather: &WeatherSnapshot,
    query: &str,
) -> String {
    let index = aqi
        .index
        .map_or_else(|| "unknown".to_string(), |i| i.to_string());
    let dominant = aqi
        .dominant_pollutant
        .map_or("none", |p| p.as_str());

    let mut keys: Vec<&String> = pollutants.keys().collect();
    keys.sort();
    let pollutant_lines = keys
        .iter()
        .map(|k| format!("{}: {}", k.to_uppercase(), pollutants[*k]))
        .collect::<Vec<_>>()
        .join(", ");

    let mut weather_lines = Vec::new();
    if let Some(w) = weather.wind_speed {
        weather_lines.push(format!("Wind Speed: {w}"));
    }
    if let Some(t) = weather.temperature {
        weather_lines.push(format!("Temperature: {t}"));
    }
    if let Some(h) = weather.humidity {
        weather_lines.push(format!("Humidity: {h}"));
    }

    let role_focus = match role {
        UserRole::Citizen => "Focus on health precautions and daily activities.",
        UserRole::Authority => "Focus on policy, enforcement, and short-term mitigation actions.",
    };

    format!(
        "USER TYPE:\n{role}\n\n\
         CURRENT AIR QUALITY:\n- AQI: {index} ({category})\n- Dominant Pollutant: {dominant}\n\n\
         POLLUTANT LEVELS:\n{pollutants}\n\n\
         WEATHER CONDITIONS:\n{weather}\n\n\
         TASK:\nBased on the above data:\n\
         - Explain the current pollution situation\n\
         - Provide actionable safety advice\n\
         - Suggest mitigation steps\n\
         {role_focus}\n\n\
         USER QUESTION:\n\"{query}\"",
        role = role.as_str(),
        category = aqi.category,
        pollutants = pollutant_lines,
        weather = weather_lines.join(", "),
    )
}

/// A chat message with role and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request body for /v1/chat/completions.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Response from /v1/chat/completions.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for the advisory model endpoint.
#[derive(Clone)]
pub struct AdvisoryClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl AdvisoryClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Answer a free-text question in the context of an assessment.
    pub async fn advise(
        &self,
        role: UserRole,
        aqi: &AqiResult,
        pollutants: &PollutantProfile,
        weather: &WeatherSnapshot,
        query: &str,
    ) -> Result<String> {
        let prompt = build_advisory_prompt(role, aqi, pollutants, weather, query);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: ADVISORY_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            max_tokens: 512,
            temperature: 0.3,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("failed to send request to advisory model")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("advisory request failed with status {}: {}", status, body);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("failed to parse advisory response")?;

        chat.choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .context("no choices in advisory response")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use aqi_kernel::{Category, Pollutant};

    use super::*;

    fn sample_aqi() -> AqiResult {
        let mut sub_indices = BTreeMap::new();
        sub_indices.insert(Pollutant::Pm25, 235);
        AqiResult {
            index: Some(235),
            category: Category::Poor,
            dominant_pollutant: Some(Pollutant::Pm25),
            sub_indices,
        }
    }

    #[test]
    fn test_prompt_carries_assessment_and_question() {
        let pollutants: PollutantProfile = [
            ("pm25".to_string(), 168.0),
            ("pm10".to_string(), 240.0),
            ("no2".to_string(), 42.0),
        ]
        .into_iter()
        .collect();
        let weather = WeatherSnapshot {
            wind_speed: Some(1.5),
            temperature: Some(28.0),
            humidity: Some(62.0),
        };

        let prompt = build_advisory_prompt(
            UserRole::Citizen,
            &sample_aqi(),
            &pollutants,
            &weather,
            "Is it safe to go for a morning walk today?",
        );

        assert!(prompt.contains("USER TYPE:\ncitizen"));
        assert!(prompt.contains("AQI: 235 (Poor)"));
        assert!(prompt.contains("Dominant Pollutant: pm25"));
        // Sorted key order keeps the prompt deterministic.
        assert!(prompt.contains("NO2: 42, PM10: 240, PM25: 168"));
        assert!(prompt.contains("Wind Speed: 1.5, Temperature: 28, Humidity: 62"));
        assert!(prompt.contains("health precautions"));
        assert!(prompt.contains("\"Is it safe to go for a morning walk today?\""));
    }

    #[test]
    fn test_authority_prompt_focuses_on_policy() {
        let prompt = build_advisory_prompt(
            UserRole::Authority,
            &sample_aqi(),
            &PollutantProfile::new(),
            &WeatherSnapshot::default(),
            "What should we do this week?",
        );

        assert!(prompt.contains("USER TYPE:\nauthority"));
        assert!(prompt.contains("policy, enforcement"));
        assert!(!prompt.contains("daily activities"));
    }

    #[test]
    fn test_weather_snapshot_reads_profile_parameters() {
        let profile: PollutantProfile = [
            ("wind_speed".to_string(), 1.2),
            ("relativehumidity".to_string(), 58.0),
        ]
        .into_iter()
        .collect();

        let weather = WeatherSnapshot::from_profile(&profile);
        assert_eq!(weather.wind_speed, Some(1.2));
        assert_eq!(weather.humidity, Some(58.0));
        assert_eq!(weather.temperature, None);
    }
}

use bon::Builder;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use suncast::WeatherCondition;

use crate::models::client::{GenerationRequest, Message, MessageRole};

pub struct NarratorPrompt {}

impl fmt::Display for NarratorPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You are a friendly weather assistant. Generate a short, engaging weather forecast description."
        )
    }
}

/// Facts about a city's day that get phrased into a narrative.
#[derive(Builder, Clone, Debug)]
pub struct ForecastPrompt {
    #[builder(into)]
    pub location: String,
    pub date: NaiveDate,
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    pub temperature: f64,
    pub condition: WeatherCondition,
}

impl fmt::Display for ForecastPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location: {}\n\
             Date: {}\n\
             Sunrise: {}\n\
             Sunset: {}\n\
             Temperature: {:.1}°C\n\
             Conditions: {}\n\
             \n\
             Please provide a 2-3 sentence description that's:\n\
             - Conversational and friendly\n\
             - Includes an interesting fact or tip about the day\n\
             - Mentions any notable weather conditions\n\
             - Keeps it positive and engaging\n\
             \n\
             Format the response as plain text, no markdown or special formatting.",
            self.location,
            self.date.format("%Y-%m-%d"),
            self.sunrise.format("%H:%M"),
            self.sunset.format("%H:%M"),
            self.temperature,
            self.condition,
        )
    }
}

impl ForecastPrompt {
    pub fn to_generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            messages: vec![
                Message {
                    role: MessageRole::System,
                    content: NarratorPrompt {}.to_string(),
                },
                Message {
                    role: MessageRole::User,
                    content: self.to_string(),
                },
            ],
        }
    }

    /// Templated narrative used whenever the model can't be reached.
    pub fn fallback(&self) -> String {
        format!(
            "In {}, the sun will rise at {} and set at {}. Expect {} with temperatures around {:.1}°C. Have a wonderful day!",
            self.location,
            self.sunrise.format("%H:%M"),
            self.sunset.format("%H:%M"),
            self.condition.label().to_lowercase(),
            self.temperature,
        )
    }
}

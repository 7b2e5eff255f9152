//! Human-friendly rendering of a weather record.

use std::fmt;

use weather_core::Weather;

const OBSERVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One metric per line, rounded to whole numbers.
pub struct Report<'a>(pub &'a Weather);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weather = self.0;

        if let Some(observed_at) = weather.observed_at {
            writeln!(f, "As of {}", observed_at.format(OBSERVED_AT_FORMAT))?;
        }
        writeln!(f, "Temperature: {}°F", whole(weather.temp))?;
        writeln!(f, "Feels Like: {}°F", whole(weather.feels_like))?;
        writeln!(f, "Humidity: {}%", whole(weather.humidity))?;

        if let Some(uv) = weather.uv {
            writeln!(f, "UV Index: {}", whole(uv))?;
        }
        if let Some(temp) = weather.temp_forecast {
            writeln!(f, "Forecast: {}°F", whole(temp))?;
        }

        Ok(())
    }
}

pub fn render(weather: &Weather) -> String {
    Report(weather).to_string()
}

fn whole(value: f64) -> String {
    // `round` goes half away from zero; `{:.0}` alone would round half to even.
    format!("{:.0}", value.round())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn weather() -> Weather {
        Weather {
            temp: 72.4,
            humidity: 55.0,
            feels_like: 70.5,
            uv: None,
            temp_forecast: None,
            observed_at: None,
        }
    }

    #[test]
    fn renders_current_metrics_rounded() {
        assert_eq!(
            render(&weather()),
            "Temperature: 72°F\nFeels Like: 71°F\nHumidity: 55%\n"
        );
    }

    #[test]
    fn renders_optional_metrics_when_present() {
        let observed_at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 15, 0))
            .expect("valid date");
        let weather = Weather {
            uv: Some(3.2),
            temp_forecast: Some(68.0),
            observed_at: Some(observed_at),
            ..weather()
        };

        let out = render(&weather);

        assert!(out.starts_with("As of 2024-06-01 12:15\n"));
        assert!(out.contains("UV Index: 3\n"));
        assert!(out.contains("Forecast: 68°F\n"));
    }

    #[test]
    fn report_formats_inline() {
        let line = format!("{}", Report(&weather()));
        assert_eq!(line, render(&weather()));
        assert!(line.ends_with("Humidity: 55%\n"));
    }

    #[test]
    fn negative_values_round_away_from_zero() {
        assert_eq!(whole(-2.5), "-3");
        assert_eq!(whole(2.5), "3");
    }
}

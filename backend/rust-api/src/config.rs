use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Products of two operands stay exactly representable as `f64`, which the
/// arithmetic scorer compares against.
pub const MAX_ARITHMETIC_OPERAND: u32 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub quiz: QuizConfig,
    pub session: SessionConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    pub vocab_dir: PathBuf,
    pub default_question_count: usize,
    pub choices_per_question: usize,
    pub session_timeout_minutes: i64,
    pub sweep_interval_secs: u64,
    pub arithmetic_min: u32,
    pub arithmetic_max: u32,
    pub demo_topic_on_empty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP/HTTP collector; span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            vocab_dir: PathBuf::from("vocabulary"),
            default_question_count: 15,
            choices_per_question: 4,
            session_timeout_minutes: 120,
            sweep_interval_secs: 60,
            arithmetic_min: 1,
            arithmetic_max: 20,
            demo_topic_on_empty: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "quiz_session_id".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            quiz: QuizConfig::default(),
            session: SessionConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Defaults from the structs, then config/*.toml, then APP__* overrides
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let quiz = &self.quiz;
        if quiz.arithmetic_max > MAX_ARITHMETIC_OPERAND {
            return Err(config::ConfigError::Message(format!(
                "quiz.arithmetic_max ({}) must not exceed {}",
                quiz.arithmetic_max, MAX_ARITHMETIC_OPERAND
            )));
        }
        if quiz.arithmetic_min > quiz.arithmetic_max {
            return Err(config::ConfigError::Message(format!(
                "quiz.arithmetic_min ({}) must not exceed quiz.arithmetic_max ({})",
                quiz.arithmetic_min, quiz.arithmetic_max
            )));
        }
        if quiz.default_question_count == 0 {
            return Err(config::ConfigError::Message(
                "quiz.default_question_count must be positive".to_string(),
            ));
        }
        if quiz.choices_per_question == 0 {
            return Err(config::ConfigError::Message(
                "quiz.choices_per_question must be positive".to_string(),
            ));
        }
        if quiz.session_timeout_minutes <= 0 {
            return Err(config::ConfigError::Message(
                "quiz.session_timeout_minutes must be positive".to_string(),
            ));
        }
        if quiz.sweep_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "quiz.sweep_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn session_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.quiz.session_timeout_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quiz.default_question_count, 15);
        assert_eq!(config.session.cookie_name, "quiz_session_id");
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert!(config.telemetry.otlp_endpoint.is_none());
    }

    #[test]
    fn test_inverted_arithmetic_range_rejected() {
        let mut config = Config::default();
        config.quiz.arithmetic_min = 50;
        config.quiz.arithmetic_max = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("arithmetic_min"));
    }

    #[test]
    fn test_oversized_arithmetic_range_rejected() {
        let mut config = Config::default();
        config.quiz.arithmetic_min = u32::MAX - 10;
        config.quiz.arithmetic_max = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("arithmetic_max"));

        config.quiz.arithmetic_min = 1;
        config.quiz.arithmetic_max = MAX_ARITHMETIC_OPERAND;
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("APP__QUIZ__DEFAULT_QUESTION_COUNT", "7");
        std::env::set_var("APP__QUIZ__VOCAB_DIR", "/tmp/wlingo-vocab");
        let config = Config::load();
        std::env::remove_var("APP__QUIZ__DEFAULT_QUESTION_COUNT");
        std::env::remove_var("APP__QUIZ__VOCAB_DIR");

        let config = config.unwrap();
        assert_eq!(config.quiz.default_question_count, 7);
        assert_eq!(config.quiz.vocab_dir, PathBuf::from("/tmp/wlingo-vocab"));
        assert_eq!(config.quiz.choices_per_question, 4);
    }
}

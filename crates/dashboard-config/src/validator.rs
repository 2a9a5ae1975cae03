//! Configuration validation.

use dashboard_protocols::AgentKind;

use crate::schema::Config;

/// Number of records a `GET_LOGS` request sends back.
const RECENT_LOGS_WINDOW: usize = 50;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_dashboard(config, &mut result);
        Self::validate_llm(config, &mut result);
        Self::validate_agents(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_dashboard(config: &Config, result: &mut ValidationResult) {
        let dashboard = &config.dashboard;

        if dashboard.log_capacity == 0 {
            result.add_error(ValidationError::new(
                "dashboard.log_capacity",
                "log_capacity must be greater than 0",
            ));
        } else if dashboard.log_capacity < RECENT_LOGS_WINDOW {
            result.add_warning(ValidationWarning::new(
                "dashboard.log_capacity",
                format!(
                    "log_capacity is below {}, GET_LOGS will return fewer records",
                    RECENT_LOGS_WINDOW
                ),
            ));
        }

        if dashboard.observer_buffer == 0 {
            result.add_error(ValidationError::new(
                "dashboard.observer_buffer",
                "observer_buffer must be greater than 0",
            ));
        }

        if let Err(e) = dashboard.capture_level() {
            result.add_error(ValidationError::new("dashboard.capture_level", e.to_string()));
        }
    }

    fn validate_llm(config: &Config, result: &mut ValidationResult) {
        for (name, llm) in &config.llm {
            if llm.api_key.is_none() {
                result.add_warning(ValidationWarning::new(
                    format!("llm.{}.api_key", name),
                    "API key is not set",
                ));
            }

            if let Some(ref url) = llm.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("llm.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }
        }
    }

    fn validate_agents(config: &Config, result: &mut ValidationResult) {
        for (name, agent) in &config.agents {
            if name.parse::<AgentKind>().is_err() {
                let known: Vec<_> = AgentKind::ALL.iter().map(|k| k.as_str()).collect();
                result.add_error(ValidationError::new(
                    format!("agents.{}", name),
                    format!("Unknown agent type '{}', valid values: {:?}", name, known),
                ));
            }

            if agent.command.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("agents.{}.command", name),
                    "command cannot be empty",
                ));
            }

            if agent.timeout_seconds == Some(0) {
                result.add_error(ValidationError::new(
                    format!("agents.{}.timeout_seconds", name),
                    "timeout_seconds must be greater than 0",
                ));
            }

            if let Some(cleanup) = &agent.cleanup_command {
                if cleanup.is_empty() {
                    result.add_error(ValidationError::new(
                        format!("agents.{}.cleanup_command", name),
                        "cleanup_command cannot be empty",
                    ));
                }
            }
        }

        for kind in AgentKind::ALL {
            if config.agent(kind).is_none() {
                result.add_warning(ValidationWarning::new(
                    format!("agents.{}", kind),
                    format!("No command configured, {} tasks will fail to start", kind),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

use citytrotter_core::error::{AnalysisError, CitytrotterError, ErrorKind};
use console::style;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: None, suggestions: Vec::new(), help_command: None }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Error for a failed call to the analysis service
pub fn service_failed(api_url: &str, error: &AnalysisError) -> CliError {
    match error.kind() {
        ErrorKind::Network => CliError::new("Cannot reach the analysis service")
            .with_context(format!("API URL: {}\n\nError: {}", api_url, error))
            .with_suggestion("Start the backend: uvicorn app.main:app --port 8000")
            .with_suggestion(
                "Or point at another instance: export CITYTROTTER_API_URL=\"http://host:8000\"",
            )
            .with_suggestion("Or raise the timeout: --timeout 60")
            .with_help("Run: citytrotter health"),
        ErrorKind::Server => CliError::new("The analysis service returned an error")
            .with_context(format!("API URL: {}\n\nError: {}", api_url, error))
            .with_suggestion("Check the backend logs for the failing request")
            .with_help("Run: citytrotter health"),
    }
}

/// Error for building parameters or a location the session rejected
pub fn invalid_input(error: &CitytrotterError) -> CliError {
    CliError::new("Invalid building placement")
        .with_context(error.to_string())
        .with_suggestion("Latitude must be within [-90, 90] and longitude within [-180, 180]")
        .with_suggestion("Stories must be 1-20 and the footprint area 800-8000 sq ft")
        .with_help("Run: citytrotter analyze --help")
}

/// Map a library error onto a CLI error with suggestions
pub fn from_core(api_url: &str, error: CitytrotterError) -> CliError {
    match error {
        CitytrotterError::Analysis(ref analysis) => service_failed(api_url, analysis),
        ref e if e.is_validation() => invalid_input(e),
        other => CliError::new(other.to_string()),
    }
}

//! Headless model of the interactive search surface: a mode selector, a
//! text field, an image field, a result-count selector bounded to `[1, 10]`
//! and a submit action whose output feeds a gallery.

use crate::application::present::{GalleryItem, ResultPresenter};
use crate::application::query::QueryService;
use crate::domain::error::DomainError;
use crate::domain::values::include::Include;
use crate::domain::values::result_count::ResultCount;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryMode {
    #[default]
    Text,
    Image,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Text => write!(f, "Text Query"),
            QueryMode::Image => write!(f, "Image Query"),
        }
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "text query" => Ok(QueryMode::Text),
            "image" | "image query" => Ok(QueryMode::Image),
            _ => Err(format!("Unknown mode: '{s}'. Use 'text' or 'image'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryForm {
    pub mode: QueryMode,
    pub text: String,
    pub image_path: Option<PathBuf>,
    pub result_count: ResultCount,
}

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_result_count(&mut self, n: usize) -> Result<(), DomainError> {
        self.result_count = ResultCount::interactive(n)?;
        Ok(())
    }

    /// Runs one query-then-present cycle for the active mode. Any failure is
    /// logged and shown as an empty gallery.
    pub async fn submit(&self, service: &QueryService, presenter: &ResultPresenter) -> Vec<GalleryItem> {
        match self.run(service).await {
            Ok(results) => presenter.present(&results),
            Err(e) => {
                warn!(mode = %self.mode, error = %e, "Query failed, showing no results");
                Vec::new()
            }
        }
    }

    async fn run(
        &self,
        service: &QueryService,
    ) -> Result<crate::domain::entities::result_set::ResultSet, DomainError> {
        let n = self.result_count.value();
        match self.mode {
            QueryMode::Text => service.query_by_text(&self.text, n, Include::default()).await,
            QueryMode::Image => {
                let path = self
                    .image_path
                    .clone()
                    .ok_or_else(|| DomainError::InvalidInput("No image selected".into()))?;
                service.query_by_image(path, n, Include::default()).await
            }
        }
    }
}

/// One line of input to the terminal surface.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    Mode(QueryMode),
    Count(usize),
    Text(String),
    Image(PathBuf),
    Submit,
    Show,
    Help,
    Quit,
}

impl FromStr for FormCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        match head.to_lowercase().as_str() {
            "mode" => rest.parse().map(FormCommand::Mode),
            "n" | "count" => rest
                .parse()
                .map(FormCommand::Count)
                .map_err(|_| format!("Expected a number, got '{rest}'")),
            "text" if !rest.is_empty() => Ok(FormCommand::Text(rest.to_string())),
            "image" if !rest.is_empty() => Ok(FormCommand::Image(PathBuf::from(rest))),
            "text" | "image" => Err(format!("'{head}' needs a value")),
            "go" | "submit" | "search" => Ok(FormCommand::Submit),
            "show" => Ok(FormCommand::Show),
            "help" | "?" => Ok(FormCommand::Help),
            "quit" | "exit" | "q" => Ok(FormCommand::Quit),
            "" => Err("Empty command".into()),
            other => Err(format!("Unknown command: '{other}'")),
        }
    }
}

impl QueryForm {
    /// Applies an editing command. Returns an error for out-of-range counts;
    /// `Submit`, `Show`, `Help` and `Quit` leave the form unchanged.
    pub fn apply(&mut self, command: &FormCommand) -> Result<(), DomainError> {
        match command {
            FormCommand::Mode(mode) => self.mode = *mode,
            FormCommand::Count(n) => self.set_result_count(*n)?,
            FormCommand::Text(text) => {
                self.mode = QueryMode::Text;
                self.text = text.clone();
            }
            FormCommand::Image(path) => {
                self.mode = QueryMode::Image;
                self.image_path = Some(path.clone());
            }
            FormCommand::Submit | FormCommand::Show | FormCommand::Help | FormCommand::Quit => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("mode image".parse::<FormCommand>().unwrap(), FormCommand::Mode(QueryMode::Image));
        assert_eq!("n 4".parse::<FormCommand>().unwrap(), FormCommand::Count(4));
        assert_eq!(
            "text  red brick building ".parse::<FormCommand>().unwrap(),
            FormCommand::Text("red brick building".into())
        );
        assert_eq!("go".parse::<FormCommand>().unwrap(), FormCommand::Submit);
        assert!("text".parse::<FormCommand>().is_err());
        assert!("n many".parse::<FormCommand>().is_err());
        assert!("dance".parse::<FormCommand>().is_err());
    }

    #[test]
    fn test_count_bounded_to_ten() {
        let mut form = QueryForm::new();
        assert!(form.apply(&FormCommand::Count(11)).is_err());
        assert!(form.apply(&FormCommand::Count(0)).is_err());
        form.apply(&FormCommand::Count(10)).unwrap();
        assert_eq!(form.result_count.value(), 10);
    }

    #[test]
    fn test_setting_a_field_switches_mode() {
        let mut form = QueryForm::new();
        form.apply(&FormCommand::Image(PathBuf::from("/tmp/q.png"))).unwrap();
        assert_eq!(form.mode, QueryMode::Image);
        form.apply(&FormCommand::Text("harbor".into())).unwrap();
        assert_eq!(form.mode, QueryMode::Text);
        assert_eq!(form.image_path, Some(PathBuf::from("/tmp/q.png")));
    }
}

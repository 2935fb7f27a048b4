//! Dialoguer respondent implementation for the Respondent trait.

use dialoguer::{Input, MultiSelect, Select, theme::ColorfulTheme};
use survey_flow::{AnswerValue, FlowError, QuestionId, QuestionNode, QuestionType, Respondent, SurveyOption};
use thiserror::Error;

/// Error type for the Dialoguer respondent.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the survey (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// A choice question arrived without any options to pick from.
    #[error("Question {0} has no options to choose from")]
    NoOptions(QuestionId),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

/// Check whether a flow error means the respondent cancelled, including
/// cancellations raised by a [`DialoguerRespondent`].
pub fn is_cancellation(err: &FlowError) -> bool {
    match err {
        FlowError::Cancelled => true,
        FlowError::Backend(inner) => matches!(inner.downcast_ref::<DialoguerError>(), Some(DialoguerError::Cancelled)),
        _ => false,
    }
}

fn map_err(err: dialoguer::Error) -> DialoguerError {
    if is_cancelled(&err) {
        DialoguerError::Cancelled
    } else {
        DialoguerError::Dialoguer(err)
    }
}

/// Dialoguer respondent for interactive CLI prompts.
///
/// Single-choice and rating questions with options use a select list,
/// multiple-choice questions a checkbox list, ratings without options a
/// bounded number prompt, and text questions a line prompt.
#[derive(Debug, Default, Clone)]
pub struct DialoguerRespondent {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerRespondent {
    /// Rating bounds used when the question carries none.
    pub const DEFAULT_RATING_RANGE: (i64, i64) = (1, 5);

    /// Create a new Dialoguer respondent with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a respondent with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn ask_single(
        &self,
        prompt: &str,
        question: &QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, DialoguerError> {
        let option = self.select_option(prompt, question, previous)?;
        Ok(AnswerValue::Text(option.id.clone()))
    }

    fn select_option<'q>(
        &self,
        prompt: &str,
        question: &'q QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<&'q SurveyOption, DialoguerError> {
        let options = question.options();
        if options.is_empty() {
            return Err(DialoguerError::NoOptions(question.id().clone()));
        }
        let items: Vec<&str> = options.iter().map(label).collect();

        let mut builder: Select;
        let _theme;
        if self.colorful {
            _theme = ColorfulTheme::default();
            builder = Select::with_theme(&_theme);
        } else {
            builder = Select::new();
        }

        builder = builder.with_prompt(prompt).items(&items);

        let default_idx = previous
            .and_then(AnswerValue::scalar)
            .and_then(|raw| options.iter().position(|o| o.matches(&raw)));
        if let Some(default_idx) = default_idx {
            builder = builder.default(default_idx);
        }

        let index = builder.interact().map_err(map_err)?;
        Ok(&options[index])
    }

    fn ask_multiple(
        &self,
        prompt: &str,
        question: &QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, DialoguerError> {
        let options = question.options();
        if options.is_empty() {
            return Err(DialoguerError::NoOptions(question.id().clone()));
        }
        let items: Vec<&str> = options.iter().map(label).collect();
        let chosen = previous.and_then(AnswerValue::as_list).unwrap_or_default();
        let defaults: Vec<bool> = options
            .iter()
            .map(|o| chosen.iter().any(|raw| o.matches(raw)))
            .collect();

        let selections = loop {
            let mut builder: MultiSelect;
            let _theme;
            if self.colorful {
                _theme = ColorfulTheme::default();
                builder = MultiSelect::with_theme(&_theme);
            } else {
                builder = MultiSelect::new();
            }

            builder = builder.with_prompt(prompt).items(&items).defaults(&defaults);

            let indices = builder.interact().map_err(map_err)?;
            if indices.is_empty() {
                println!("Error: Select at least one option");
                continue;
            }
            break indices;
        };

        Ok(AnswerValue::List(
            selections.into_iter().map(|i| options[i].id.clone()).collect(),
        ))
    }

    fn ask_rating(
        &self,
        prompt: &str,
        question: &QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, DialoguerError> {
        if !question.options().is_empty() {
            let option = self.select_option(prompt, question, previous)?;
            return Ok(rating_value(&option.value));
        }

        let (default_min, default_max) = Self::DEFAULT_RATING_RANGE;
        let min = question.min_rating().unwrap_or(default_min);
        let max = question.max_rating().unwrap_or(default_max);
        let prompt = format!("{prompt} ({min}-{max})");

        loop {
            let mut _theme;
            let mut builder: Input<i64>;
            if self.colorful {
                _theme = ColorfulTheme::default();
                builder = Input::with_theme(&_theme);
            } else {
                builder = Input::new();
            }

            builder = builder.with_prompt(&prompt);
            if let Some(value) = previous.and_then(AnswerValue::as_number) {
                builder = builder.default(value as i64);
            }

            let value = builder.interact_text().map_err(map_err)?;
            if value < min {
                println!("Error: Value must be at least {min}");
                continue;
            }
            if value > max {
                println!("Error: Value must be at most {max}");
                continue;
            }
            return Ok(AnswerValue::Number(value as f64));
        }
    }

    fn ask_text(
        &self,
        prompt: &str,
        question: &QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, DialoguerError> {
        let mut _theme;
        let mut builder: Input<String>;
        if self.colorful {
            _theme = ColorfulTheme::default();
            builder = Input::with_theme(&_theme);
        } else {
            builder = Input::new();
        }

        builder = builder
            .with_prompt(prompt)
            .allow_empty(!question.is_required());

        if let Some(text) = previous.and_then(AnswerValue::as_str) {
            builder = builder.default(text.to_string());
        }

        let value = builder.interact_text().map_err(map_err)?;
        Ok(AnswerValue::Text(value))
    }
}

impl Respondent for DialoguerRespondent {
    type Error = DialoguerError;

    fn respond(
        &mut self,
        question: &QuestionNode,
        previous: Option<&AnswerValue>,
    ) -> Result<AnswerValue, Self::Error> {
        let prompt = prompt(question);
        tracing::debug!(question = %question.id(), kind = %question.question_type(), "prompting");
        match question.question_type() {
            QuestionType::SingleChoice => self.ask_single(&prompt, question, previous),
            QuestionType::MultipleChoice => self.ask_multiple(&prompt, question, previous),
            QuestionType::Rating => self.ask_rating(&prompt, question, previous),
            QuestionType::Text => self.ask_text(&prompt, question, previous),
        }
    }
}

/// The prompt for a question; required questions are marked with `*`.
fn prompt(question: &QuestionNode) -> String {
    let text = if question.text().is_empty() {
        format!("Question {}", question.id())
    } else {
        question.text().to_string()
    };
    if question.is_required() {
        format!("{text} *")
    } else {
        text
    }
}

fn label(option: &SurveyOption) -> &str {
    if option.content.is_empty() {
        &option.value
    } else {
        &option.content
    }
}

/// Ratings are numbers when the option value is numeric.
fn rating_value(value: &str) -> AnswerValue {
    value
        .trim()
        .parse::<f64>()
        .map_or_else(|_| AnswerValue::Text(value.to_string()), AnswerValue::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respondent_creation() {
        let _respondent = DialoguerRespondent::new();
        let _plain = DialoguerRespondent::plain();
    }

    #[test]
    fn error_types() {
        let err = DialoguerError::Cancelled;
        assert_eq!(err.to_string(), "Survey cancelled by user");

        let err = DialoguerError::NoOptions("7".into());
        assert_eq!(err.to_string(), "Question 7 has no options to choose from");
    }

    #[test]
    fn cancellation_survives_flow_error() {
        assert!(is_cancellation(&FlowError::Cancelled));
        assert!(is_cancellation(&FlowError::backend(DialoguerError::Cancelled)));
        assert!(!is_cancellation(&FlowError::backend(DialoguerError::NoOptions("1".into()))));
        assert!(!is_cancellation(&FlowError::NoQuestions));
    }

    #[test]
    fn prompts_mark_required_questions() {
        let required = QuestionNode::new("1", "How was your stay?", QuestionType::Rating).with_required(true);
        assert_eq!(prompt(&required), "How was your stay? *");
        let untitled = QuestionNode::new("2", "", QuestionType::Text);
        assert_eq!(prompt(&untitled), "Question 2");
    }

    #[test]
    fn labels_fall_back_to_value() {
        assert_eq!(label(&SurveyOption::new("1", "").with_value("one")), "one");
        assert_eq!(label(&SurveyOption::new("1", "One")), "One");
    }

    #[test]
    fn rating_values() {
        assert_eq!(rating_value("4"), AnswerValue::Number(4.0));
        assert_eq!(rating_value("good"), AnswerValue::Text("good".into()));
    }
}

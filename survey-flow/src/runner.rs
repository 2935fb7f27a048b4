use survey_flow_types::{FlowError, Respondent, SurveyTree};

use crate::SurveySession;

/// Run a survey to completion with the given respondent.
///
/// Asks the current question of the session until every root's path is
/// complete, then returns the finished session for submission.
pub fn run<R: Respondent>(tree: &SurveyTree, mut respondent: R) -> Result<SurveySession<'_>, FlowError> {
    if tree.is_empty() {
        return Err(FlowError::NoQuestions);
    }
    let mut session = SurveySession::new(tree);
    while let Some(question) = session.current_question() {
        let previous = session.answers().get(question.id().as_str()).cloned();
        tracing::debug!(question = %question.id(), kind = %question.question_type(), "asking");
        let value = respondent
            .respond(question, previous.as_ref())
            .map_err(into_flow_error)?;
        if value.is_empty() {
            return Err(FlowError::EmptyAnswer(question.id().clone()));
        }
        if !question.accepts(&value) {
            return Err(FlowError::WrongShape {
                question: question.id().clone(),
                expected: question.question_type(),
                actual: value.type_name(),
            });
        }
        session.answer(question.id(), value)?;
    }
    tracing::info!(answers = session.answers().len(), "survey complete");
    Ok(session)
}

/// Keep flow errors raised inside a respondent (such as cancellation)
/// recognizable; wrap anything else as a backend failure.
fn into_flow_error(err: impl Into<anyhow::Error>) -> FlowError {
    match err.into().downcast::<FlowError>() {
        Ok(flow) => flow,
        Err(other) => FlowError::Backend(other),
    }
}

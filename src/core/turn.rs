use crate::core::bridge::Interpreter;
use crate::core::translator::Translator;
use crate::errors::AppResult;

/// How a turn was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Template(String),
    FreeForm(String),
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Answer::Template(s) | Answer::FreeForm(s) => s,
        }
    }
}

/// Resolve one question: intent extraction → translator → free-form fallback.
pub fn answer_text(
    extractor: &mut dyn Interpreter,
    freeform: &mut dyn Interpreter,
    translator: &Translator,
    text: &str,
) -> AppResult<Answer> {
    let intent = extractor.ask(text)?;
    let resolution = translator.process_query(&intent)?;

    if resolution.is_custom {
        return Ok(Answer::FreeForm(freeform.ask(text)?));
    }
    Ok(Answer::Template(resolution.answer))
}

//! The question flow that builds up [`Answers`]
//!
//! Questions are evaluated strictly in order. Each one carries a predicate over
//! the answers collected so far; a question whose predicate is false is not
//! asked and records its default instead. Answers are never revisited.

use super::answers::{Answer, Answers};
use anyhow::Result;

pub const NAME: &str = "name";
pub const WFLOADER: &str = "wfloader";
pub const REACT: &str = "react";
pub const REACT_ROUTER: &str = "reactRouter";
pub const MOBX: &str = "mobx";
pub const REDUX: &str = "redux";
pub const NODE: &str = "node";
pub const MONGO: &str = "mongo";
pub const API: &str = "api";
pub const JWT: &str = "jwt";
pub const HEROKU: &str = "heroku";
pub const JEST: &str = "jest";
pub const FLOW: &str = "flow";

/// What kind of answer a question expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free text; the default is supplied by the caller
    Input,
    /// Yes/no with a fixed default
    Confirm { default: bool },
}

/// A single question definition
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub key: &'static str,
    pub message: &'static str,
    pub kind: QuestionKind,
    /// Whether the question is asked, given the answers so far
    pub when: fn(&Answers) -> bool,
}

impl Question {
    pub fn is_visible(&self, answers: &Answers) -> bool {
        (self.when)(answers)
    }
}

fn always(_: &Answers) -> bool {
    true
}

fn with_react(a: &Answers) -> bool {
    a.flag(REACT)
}

fn react_without_redux(a: &Answers) -> bool {
    a.flag(REACT) && !a.flag(REDUX)
}

fn react_without_mobx(a: &Answers) -> bool {
    a.flag(REACT) && !a.flag(MOBX)
}

fn with_node(a: &Answers) -> bool {
    a.flag(NODE)
}

fn with_mongo(a: &Answers) -> bool {
    a.flag(MONGO)
}

fn with_api(a: &Answers) -> bool {
    a.flag(API)
}

const fn confirm(
    key: &'static str,
    message: &'static str,
    when: fn(&Answers) -> bool,
) -> Question {
    Question {
        key,
        message,
        kind: QuestionKind::Confirm { default: false },
        when,
    }
}

/// The full question sequence, in asking order
pub const QUESTIONS: &[Question] = &[
    Question {
        key: NAME,
        message: "Your project name",
        kind: QuestionKind::Input,
        when: always,
    },
    confirm(WFLOADER, "Do you need Web Font Loader?", always),
    confirm(REACT, "Do you need React?", always),
    confirm(REACT_ROUTER, "with React-Router?", with_react),
    confirm(MOBX, "using MobX?", react_without_redux),
    confirm(REDUX, "using Redux?", react_without_mobx),
    confirm(NODE, "Do you need a Node server? (Hapi)", always),
    confirm(MONGO, "with MongoDB? (Mongoose)", with_node),
    confirm(API, "Do you need an API?", with_mongo),
    confirm(JWT, "with authentication? (JWT)", with_api),
    confirm(HEROKU, "ready for deployment to Heroku?", with_node),
    confirm(JEST, "need testing? (Jest)", always),
    confirm(FLOW, "need Flow (type checking)?", always),
];

/// Source of answers for visible questions
pub trait Prompter {
    /// Ask a yes/no question
    fn confirm(&mut self, question: &Question, default: bool) -> Result<bool>;

    /// Ask a free-text question
    fn input(&mut self, question: &Question, default: &str) -> Result<String>;
}

/// Answers every question with its default (non-interactive mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn confirm(&mut self, _question: &Question, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn input(&mut self, _question: &Question, default: &str) -> Result<String> {
        Ok(default.to_string())
    }
}

/// Run the question flow
///
/// `presets` holds answers supplied up front (e.g. from command line flags);
/// a visible question with a preset is not prompted. Presets for hidden
/// questions are dropped in favour of the default.
pub fn collect<P: Prompter>(
    prompter: &mut P,
    presets: &Answers,
    default_name: &str,
) -> Result<Answers> {
    let mut answers = Answers::new();

    for question in QUESTIONS {
        let answer = if !question.is_visible(&answers) {
            default_answer(question, default_name)
        } else if let Some(preset) = presets.get(question.key) {
            preset.clone()
        } else {
            match question.kind {
                QuestionKind::Input => Answer::Text(prompter.input(question, default_name)?),
                QuestionKind::Confirm { default } => {
                    Answer::Bool(prompter.confirm(question, default)?)
                }
            }
        };
        answers.set(question.key, answer);
    }

    Ok(answers)
}

fn default_answer(question: &Question, default_name: &str) -> Answer {
    match question.kind {
        QuestionKind::Input => Answer::Text(default_name.to_string()),
        QuestionKind::Confirm { default } => Answer::Bool(default),
    }
}

/// Preset keys whose value did not survive the flow (their question was hidden)
pub fn ignored_presets(presets: &Answers, answers: &Answers) -> Vec<&'static str> {
    presets
        .iter()
        .filter(|(key, value)| answers.get(key) != Some(*value))
        .map(|(key, _)| key)
        .collect()
}

/// Map a feature name from the command line to its question key
pub fn parse_feature(s: &str) -> Option<&'static str> {
    match s.trim().to_lowercase().as_str() {
        "wfloader" | "webfont" | "webfontloader" => Some(WFLOADER),
        "react" => Some(REACT),
        "router" | "react-router" | "reactrouter" => Some(REACT_ROUTER),
        "mobx" => Some(MOBX),
        "redux" => Some(REDUX),
        "node" | "server" | "hapi" => Some(NODE),
        "mongo" | "mongodb" | "mongoose" => Some(MONGO),
        "api" => Some(API),
        "jwt" | "auth" => Some(JWT),
        "heroku" => Some(HEROKU),
        "jest" | "test" | "tests" => Some(JEST),
        "flow" => Some(FLOW),
        _ => None,
    }
}

/// Convert a project name to its slug form: every space becomes a hyphen
pub fn slugify(name: &str) -> String {
    name.replace(' ', "-")
}

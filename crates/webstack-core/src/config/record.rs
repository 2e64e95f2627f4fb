//! The finalized configuration record
//!
//! Built once from the collected [`Answers`] and never mutated afterwards. The
//! nested layout makes the dependency chains of the question flow explicit:
//! a router or store cannot exist without React, an API cannot exist without
//! MongoDB, and so on.

use super::answers::Answers;
use super::questions::{self, slugify};
use serde::Serialize;
use thiserror::Error;

/// Errors raised when answers cannot form a valid record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("configuration is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("configuration field '{field}' must be {expected}, got {found}")]
    WrongKind {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{field}' requires '{requires}' to be enabled")]
    UnmetDependency {
        field: &'static str,
        requires: &'static str,
    },

    #[error("'mobx' and 'redux' cannot both be enabled")]
    ConflictingStores,

    #[error("project name must not be empty")]
    EmptyName,

    #[error("project name '{name}' contains {found:?}, which cannot appear in package.json")]
    InvalidName { name: String, found: char },
}

/// State management library for a React project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Store {
    #[default]
    None,
    Redux,
    Mobx,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReactConfig {
    pub router: bool,
    pub store: Store,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiConfig {
    pub jwt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MongoConfig {
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeConfig {
    pub mongo: Option<MongoConfig>,
    pub heroku: bool,
}

/// Values detected from the machine rather than asked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Use yarn instead of npm
    pub yarn: bool,
    pub node_version: String,
    /// Random token injected into generated config
    pub secret: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            yarn: false,
            node_version: "*".to_string(),
            secret: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    pub name: String,
    pub wfloader: bool,
    pub react: Option<ReactConfig>,
    pub node: Option<NodeConfig>,
    pub jest: bool,
    pub flow: bool,
    pub environment: Environment,
}

/// Flat view of the record handed to every template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext {
    pub name: String,
    pub wfloader: bool,
    pub react: bool,
    pub react_router: bool,
    pub mobx: bool,
    pub redux: bool,
    pub node: bool,
    pub mongo: bool,
    pub api: bool,
    pub jwt: bool,
    pub heroku: bool,
    pub jest: bool,
    pub flow: bool,
    pub yarn: bool,
    pub node_version: String,
    pub secret: String,
}

impl ConfigRecord {
    /// Build a record from a complete set of answers
    ///
    /// Every question key must be present. Skipped questions are expected to
    /// carry their default, so a missing key points at a collector bug.
    pub fn from_answers(answers: &Answers, environment: Environment) -> Result<Self, RecordError> {
        let name = project_name(text(answers, questions::NAME)?)?;

        let react = flag(answers, questions::REACT)?;
        let react_router = flag(answers, questions::REACT_ROUTER)?;
        let mobx = flag(answers, questions::MOBX)?;
        let redux = flag(answers, questions::REDUX)?;
        let node = flag(answers, questions::NODE)?;
        let mongo = flag(answers, questions::MONGO)?;
        let api = flag(answers, questions::API)?;
        let jwt = flag(answers, questions::JWT)?;
        let heroku = flag(answers, questions::HEROKU)?;

        requires(react_router, questions::REACT_ROUTER, react, questions::REACT)?;
        requires(mobx, questions::MOBX, react, questions::REACT)?;
        requires(redux, questions::REDUX, react, questions::REACT)?;
        requires(mongo, questions::MONGO, node, questions::NODE)?;
        requires(heroku, questions::HEROKU, node, questions::NODE)?;
        requires(api, questions::API, mongo, questions::MONGO)?;
        requires(jwt, questions::JWT, api, questions::API)?;

        let store = match (redux, mobx) {
            (true, true) => return Err(RecordError::ConflictingStores),
            (true, false) => Store::Redux,
            (false, true) => Store::Mobx,
            (false, false) => Store::None,
        };

        Ok(Self {
            name,
            wfloader: flag(answers, questions::WFLOADER)?,
            react: react.then_some(ReactConfig {
                router: react_router,
                store,
            }),
            node: node.then(|| NodeConfig {
                mongo: mongo.then(|| MongoConfig {
                    api: api.then_some(ApiConfig { jwt }),
                }),
                heroku,
            }),
            jest: flag(answers, questions::JEST)?,
            flow: flag(answers, questions::FLOW)?,
            environment,
        })
    }

    pub fn react(&self) -> bool {
        self.react.is_some()
    }

    pub fn react_router(&self) -> bool {
        self.react.as_ref().is_some_and(|r| r.router)
    }

    pub fn redux(&self) -> bool {
        self.store() == Store::Redux
    }

    pub fn mobx(&self) -> bool {
        self.store() == Store::Mobx
    }

    pub fn store(&self) -> Store {
        self.react.as_ref().map(|r| r.store).unwrap_or_default()
    }

    pub fn node(&self) -> bool {
        self.node.is_some()
    }

    pub fn mongo(&self) -> bool {
        self.mongo_config().is_some()
    }

    pub fn api(&self) -> bool {
        self.api_config().is_some()
    }

    pub fn jwt(&self) -> bool {
        self.api_config().is_some_and(|a| a.jwt)
    }

    pub fn heroku(&self) -> bool {
        self.node.as_ref().is_some_and(|n| n.heroku)
    }

    fn mongo_config(&self) -> Option<&MongoConfig> {
        self.node.as_ref().and_then(|n| n.mongo.as_ref())
    }

    fn api_config(&self) -> Option<&ApiConfig> {
        self.mongo_config().and_then(|m| m.api.as_ref())
    }

    /// Human-readable list of enabled features, in question order
    pub fn feature_labels(&self) -> Vec<&'static str> {
        [
            (self.wfloader, "Web Font Loader"),
            (self.react(), "React"),
            (self.react_router(), "React-Router"),
            (self.mobx(), "MobX"),
            (self.redux(), "Redux"),
            (self.node(), "Node (Hapi)"),
            (self.mongo(), "MongoDB"),
            (self.api(), "API"),
            (self.jwt(), "JWT auth"),
            (self.heroku(), "Heroku"),
            (self.jest, "Jest"),
            (self.flow, "Flow"),
        ]
        .into_iter()
        .filter_map(|(enabled, label)| enabled.then_some(label))
        .collect()
    }

    pub fn template_context(&self) -> TemplateContext {
        TemplateContext {
            name: self.name.clone(),
            wfloader: self.wfloader,
            react: self.react(),
            react_router: self.react_router(),
            mobx: self.mobx(),
            redux: self.redux(),
            node: self.node(),
            mongo: self.mongo(),
            api: self.api(),
            jwt: self.jwt(),
            heroku: self.heroku(),
            jest: self.jest,
            flow: self.flow,
            yarn: self.environment.yarn,
            node_version: self.environment.node_version.clone(),
            secret: self.environment.secret.clone(),
        }
    }
}

fn flag(answers: &Answers, field: &'static str) -> Result<bool, RecordError> {
    let answer = answers.get(field).ok_or(RecordError::MissingField(field))?;
    answer.as_bool().ok_or(RecordError::WrongKind {
        field,
        expected: "boolean",
        found: answer.kind(),
    })
}

fn text<'a>(answers: &'a Answers, field: &'static str) -> Result<&'a str, RecordError> {
    let answer = answers.get(field).ok_or(RecordError::MissingField(field))?;
    answer.as_text().ok_or(RecordError::WrongKind {
        field,
        expected: "text",
        found: answer.kind(),
    })
}

/// Trimmed, slugified name; refuses characters that would break the JSON
/// string it is rendered into
fn project_name(raw: &str) -> Result<String, RecordError> {
    let name = slugify(raw.trim());
    if name.is_empty() {
        return Err(RecordError::EmptyName);
    }

    let invalid = name
        .chars()
        .find(|&c| matches!(c, '"' | '\\') || c.is_control());
    if let Some(found) = invalid {
        return Err(RecordError::InvalidName { name, found });
    }

    Ok(name)
}

fn requires(
    enabled: bool,
    field: &'static str,
    parent: bool,
    parent_field: &'static str,
) -> Result<(), RecordError> {
    if enabled && !parent {
        return Err(RecordError::UnmetDependency {
            field,
            requires: parent_field,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::questions::{collect, DefaultsPrompter, QUESTIONS};

    fn answers(enabled: &[&'static str]) -> Answers {
        let mut answers = collect(&mut DefaultsPrompter, &Answers::new(), "my site").unwrap();
        for &key in enabled {
            answers.set_bool(key, true);
        }
        answers
    }

    #[test]
    fn test_defaults_build_minimal_record() {
        let record = ConfigRecord::from_answers(&answers(&[]), Environment::default()).unwrap();

        assert_eq!(record.name, "my-site");
        assert!(record.react.is_none());
        assert!(record.node.is_none());
        assert!(!record.jest);
        assert!(record.feature_labels().is_empty());
    }

    #[test]
    fn test_nested_chain() {
        let record = ConfigRecord::from_answers(
            &answers(&["node", "mongo", "api", "jwt", "heroku"]),
            Environment::default(),
        )
        .unwrap();

        assert!(record.node() && record.mongo() && record.api() && record.jwt());
        assert!(record.heroku());
        assert!(!record.react_router());
    }

    #[test]
    fn test_missing_field_fails_fast() {
        for question in QUESTIONS {
            let mut incomplete = answers(&[]);
            incomplete.remove(question.key);
            assert_eq!(
                ConfigRecord::from_answers(&incomplete, Environment::default()),
                Err(RecordError::MissingField(question.key))
            );
        }
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let mut bad = answers(&[]);
        bad.set_text("react", "yes");
        assert!(matches!(
            ConfigRecord::from_answers(&bad, Environment::default()),
            Err(RecordError::WrongKind { field: "react", .. })
        ));
    }

    #[test]
    fn test_both_stores_rejected() {
        let result = ConfigRecord::from_answers(
            &answers(&["react", "mobx", "redux"]),
            Environment::default(),
        );
        assert_eq!(result, Err(RecordError::ConflictingStores));
    }

    #[test]
    fn test_orphaned_flags_rejected() {
        let cases: &[(&[&'static str], &'static str, &'static str)] = &[
            (&["reactRouter"], "reactRouter", "react"),
            (&["redux"], "redux", "react"),
            (&["mongo"], "mongo", "node"),
            (&["node", "api"], "api", "mongo"),
            (&["node", "mongo", "jwt"], "jwt", "api"),
            (&["heroku"], "heroku", "node"),
        ];

        for (enabled, field, parent) in cases {
            let result = ConfigRecord::from_answers(&answers(enabled), Environment::default());
            assert_eq!(
                result,
                Err(RecordError::UnmetDependency {
                    field: *field,
                    requires: *parent
                })
            );
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut bad = answers(&[]);
        bad.set_text("name", "   ");
        assert_eq!(
            ConfigRecord::from_answers(&bad, Environment::default()),
            Err(RecordError::EmptyName)
        );
    }

    #[test]
    fn test_name_keeps_inner_spacing() {
        let mut spaced = answers(&[]);
        spaced.set_text("name", "  my  site ");
        let record = ConfigRecord::from_answers(&spaced, Environment::default()).unwrap();
        assert_eq!(record.name, "my--site");
    }

    #[test]
    fn test_name_that_breaks_package_json_rejected() {
        for (raw, found) in [("my\"site", '"'), ("back\\slash", '\\'), ("tab\there", '\t')] {
            let mut bad = answers(&[]);
            bad.set_text("name", raw);
            assert!(matches!(
                ConfigRecord::from_answers(&bad, Environment::default()),
                Err(RecordError::InvalidName { found: f, .. }) if f == found
            ));
        }
    }

    #[test]
    fn test_template_context_uses_template_field_names() {
        let environment = Environment {
            yarn: true,
            node_version: "20.11.0".to_string(),
            secret: "abc".to_string(),
        };
        let record =
            ConfigRecord::from_answers(&answers(&["react", "reactRouter", "redux"]), environment)
                .unwrap();

        let value = serde_yaml::to_value(record.template_context()).unwrap();
        assert_eq!(value["reactRouter"], serde_yaml::Value::Bool(true));
        assert_eq!(value["redux"], serde_yaml::Value::Bool(true));
        assert_eq!(value["mobx"], serde_yaml::Value::Bool(false));
        assert_eq!(value["nodeVersion"].as_str(), Some("20.11.0"));
        assert_eq!(value["secret"].as_str(), Some("abc"));
        assert_eq!(value["name"].as_str(), Some("my-site"));
    }
}

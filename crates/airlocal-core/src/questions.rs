//! Creation questionnaire
//!
//! Questions are asked in declaration order. Each one carries a
//! [`Precondition`] evaluated against the answers gathered so far, a prompt
//! kind with its default, and the filter applied to raw input. The actual
//! prompting is delegated to an [`AnswerSource`] so the same graph drives the
//! terminal prompts and scripted tests.

use crate::error::{Error, Result};
use crate::hostname::{default_proxy, parse_hostname, parse_proxy_url, split_hosts};
use crate::types::{Answers, InstallType, PhpVersion};

/// Answer slot a question fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Hostname,
    AddMoreHosts,
    ExtraHosts,
    MediaProxy,
    Proxy,
    PhpVersion,
    Elasticsearch,
    WordPress,
    WordPressType,
    EmptyContent,
    Title,
    Username,
    Password,
    Email,
}

impl Field {
    /// Key used in answers files
    pub fn key(&self) -> &'static str {
        match self {
            Self::Hostname => "hostname",
            Self::AddMoreHosts => "addMoreHosts",
            Self::ExtraHosts => "extraHosts",
            Self::MediaProxy => "mediaProxy",
            Self::Proxy => "proxy",
            Self::PhpVersion => "phpVersion",
            Self::Elasticsearch => "elasticsearch",
            Self::WordPress => "wordpress",
            Self::WordPressType => "wordpressType",
            Self::EmptyContent => "emptyContent",
            Self::Title => "title",
            Self::Username => "username",
            Self::Password => "password",
            Self::Email => "email",
        }
    }
}

/// Condition under which a question is asked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Always,
    AddMoreHosts,
    MediaProxy,
    WordPress,
}

impl Precondition {
    pub fn holds(&self, answers: &Answers) -> bool {
        match self {
            Self::Always => true,
            Self::AddMoreHosts => answers.add_more_hosts,
            Self::MediaProxy => answers.media_proxy,
            Self::WordPress => answers.wordpress,
        }
    }
}

/// Default offered for a free-text question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDefault {
    None,
    Fixed(&'static str),
    /// The primary hostname answered earlier
    Hostname,
    /// Production origin guessed from the primary hostname
    ProxyFromHostname,
}

impl InputDefault {
    fn resolve(&self, answers: &Answers) -> Option<String> {
        match self {
            Self::None => None,
            Self::Fixed(value) => Some((*value).to_string()),
            Self::Hostname => Some(answers.hostname.clone()),
            Self::ProxyFromHostname => Some(default_proxy(&answers.hostname)),
        }
    }
}

/// One entry of a select question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Input {
        default: InputDefault,
        required: bool,
    },
    Confirm {
        default: bool,
    },
    Select {
        choices: Vec<Choice>,
        default: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub field: Field,
    pub message: &'static str,
    pub kind: PromptKind,
    pub when: Precondition,
}

impl Question {
    fn input(field: Field, message: &'static str, default: InputDefault, required: bool) -> Self {
        Self {
            field,
            message,
            kind: PromptKind::Input { default, required },
            when: Precondition::Always,
        }
    }

    fn confirm(field: Field, message: &'static str, default: bool) -> Self {
        Self {
            field,
            message,
            kind: PromptKind::Confirm { default },
            when: Precondition::Always,
        }
    }

    fn select(
        field: Field,
        message: &'static str,
        choices: Vec<Choice>,
        default: &'static str,
    ) -> Self {
        Self {
            field,
            message,
            kind: PromptKind::Select { choices, default },
            when: Precondition::Always,
        }
    }

    fn when(mut self, when: Precondition) -> Self {
        self.when = when;
        self
    }

    pub fn is_required(&self) -> bool {
        matches!(self.kind, PromptKind::Input { required: true, .. })
    }
}

/// Something that can answer questions: a terminal, or a script in tests
pub trait AnswerSource {
    /// Free text; `default` is returned for empty input
    fn input(&mut self, question: &Question, default: Option<&str>) -> Result<String>;

    fn confirm(&mut self, question: &Question, default: bool) -> Result<bool>;

    /// Index into `choices`
    fn select(&mut self, question: &Question, choices: &[Choice], default: usize) -> Result<usize>;
}

/// The creation questionnaire, in the order it is asked
pub fn creation_questions() -> Vec<Question> {
    let php_choices = PhpVersion::all()
        .into_iter()
        .map(|v| Choice {
            value: v.as_str(),
            label: v.as_str(),
        })
        .collect();
    let type_choices = InstallType::all()
        .into_iter()
        .map(|t| Choice {
            value: t.as_str(),
            label: t.label(),
        })
        .collect();

    vec![
        Question::input(
            Field::Hostname,
            "What is the primary hostname for your site? (Ex: docker.test)",
            InputDefault::None,
            true,
        ),
        Question::confirm(
            Field::AddMoreHosts,
            "Are there additional domains the site should respond to?",
            false,
        ),
        Question::input(
            Field::ExtraHosts,
            "Enter additional hostnames separated by spaces (Ex: docker1.test docker2.test)",
            InputDefault::None,
            false,
        )
        .when(Precondition::AddMoreHosts),
        Question::confirm(
            Field::MediaProxy,
            "Do you want to set a proxy for media assets? (i.e. Serving /uploads/ directory assets from a production site)",
            false,
        ),
        Question::input(
            Field::Proxy,
            "Proxy URL",
            InputDefault::ProxyFromHostname,
            true,
        )
        .when(Precondition::MediaProxy),
        Question::select(
            Field::PhpVersion,
            "What version of PHP would you like to use?",
            php_choices,
            PhpVersion::default().as_str(),
        ),
        Question::confirm(Field::Elasticsearch, "Do you need Elasticsearch", true),
        Question::confirm(Field::WordPress, "Do you want to install WordPress?", true),
        Question::select(
            Field::WordPressType,
            "Select a WordPress installation type:",
            type_choices,
            InstallType::default().as_str(),
        )
        .when(Precondition::WordPress),
        Question::confirm(
            Field::EmptyContent,
            "Do you want to remove the default content?",
            true,
        )
        .when(Precondition::WordPress),
        Question::input(Field::Title, "Site Name", InputDefault::Hostname, true)
            .when(Precondition::WordPress),
        Question::input(
            Field::Username,
            "Admin Username",
            InputDefault::Fixed("admin"),
            true,
        )
        .when(Precondition::WordPress),
        Question::input(
            Field::Password,
            "Admin Password",
            InputDefault::Fixed("password"),
            true,
        )
        .when(Precondition::WordPress),
        Question::input(
            Field::Email,
            "Admin Email",
            InputDefault::Fixed("admin@example.com"),
            true,
        )
        .when(Precondition::WordPress),
    ]
}

/// Ask every applicable question and assemble the answers
pub fn collect_answers(source: &mut dyn AnswerSource) -> Result<Answers> {
    let mut answers = Answers::default();

    for question in creation_questions() {
        if !question.when.holds(&answers) {
            continue;
        }

        match &question.kind {
            PromptKind::Input { default, required } => {
                let default = default.resolve(&answers);
                let raw = source.input(&question, default.as_deref())?;
                let raw = match (raw.trim().is_empty(), default) {
                    (true, Some(default)) => default,
                    _ => raw,
                };
                if *required && raw.trim().is_empty() {
                    return Err(Error::empty_field(question.field.key()));
                }
                apply_text(&mut answers, question.field, &raw)?;
            }
            PromptKind::Confirm { default } => {
                let value = source.confirm(&question, *default)?;
                apply_flag(&mut answers, question.field, value);
            }
            PromptKind::Select { choices, default } => {
                let default_idx = choices
                    .iter()
                    .position(|c| c.value == *default)
                    .unwrap_or(0);
                let idx = source.select(&question, choices, default_idx)?;
                let choice = choices.get(idx).ok_or_else(|| {
                    Error::invalid_answer(
                        question.field.key(),
                        idx.to_string(),
                        &choices.iter().map(|c| c.value).collect::<Vec<_>>(),
                    )
                })?;
                apply_text(&mut answers, question.field, choice.value)?;
            }
        }
    }

    Ok(answers)
}

fn apply_text(answers: &mut Answers, field: Field, raw: &str) -> Result<()> {
    let value = raw.trim().to_string();
    match field {
        Field::Hostname => {
            let host = parse_hostname(&value);
            if host.is_empty() {
                return Err(Error::empty_field(field.key()));
            }
            answers.hostname = host;
        }
        Field::ExtraHosts => answers.extra_hosts = split_hosts(&value),
        Field::Proxy => answers.proxy = Some(parse_proxy_url(&value)),
        Field::PhpVersion => answers.php_version = value,
        Field::WordPressType => answers.wordpress_type = Some(value),
        Field::Title => answers.title = Some(value),
        Field::Username => answers.username = Some(value),
        Field::Password => answers.password = Some(value),
        Field::Email => answers.email = Some(value),
        other => {
            return Err(Error::invalid_answer(other.key(), value, &["true", "false"]));
        }
    }
    Ok(())
}

fn apply_flag(answers: &mut Answers, field: Field, value: bool) {
    match field {
        Field::AddMoreHosts => answers.add_more_hosts = value,
        Field::MediaProxy => answers.media_proxy = value,
        Field::Elasticsearch => answers.elasticsearch = value,
        Field::WordPress => answers.wordpress = value,
        Field::EmptyContent => answers.empty_content = value,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned replies; `None` accepts the offered default
    #[derive(Default)]
    struct Script {
        replies: VecDeque<Option<String>>,
        asked: Vec<Field>,
    }

    impl Script {
        fn new(replies: &[Option<&str>]) -> Self {
            Self {
                replies: replies.iter().map(|r| r.map(str::to_string)).collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self, question: &Question) -> Option<String> {
            self.asked.push(question.field);
            self.replies.pop_front().flatten()
        }
    }

    impl AnswerSource for Script {
        fn input(&mut self, question: &Question, default: Option<&str>) -> Result<String> {
            Ok(self
                .next(question)
                .or_else(|| default.map(str::to_string))
                .unwrap_or_default())
        }

        fn confirm(&mut self, question: &Question, default: bool) -> Result<bool> {
            Ok(self.next(question).map(|r| r == "y").unwrap_or(default))
        }

        fn select(&mut self, question: &Question, choices: &[Choice], default: usize) -> Result<usize> {
            Ok(self
                .next(question)
                .and_then(|r| choices.iter().position(|c| c.value == r))
                .unwrap_or(default))
        }
    }

    #[test]
    fn test_questions_keep_declared_order() {
        let keys: Vec<&str> = creation_questions().iter().map(|q| q.field.key()).collect();
        assert_eq!(
            keys,
            [
                "hostname",
                "addMoreHosts",
                "extraHosts",
                "mediaProxy",
                "proxy",
                "phpVersion",
                "elasticsearch",
                "wordpress",
                "wordpressType",
                "emptyContent",
                "title",
                "username",
                "password",
                "email"
            ]
        );
    }

    #[test]
    fn test_minimal_run_skips_conditional_questions() {
        let mut script = Script::new(&[
            Some("https://docker.test/some/path"),
            Some("n"),
            Some("n"),
            None,
            Some("n"),
            Some("n"),
        ]);
        let answers = collect_answers(&mut script).unwrap();

        assert_eq!(answers.hostname, "docker.test");
        assert_eq!(answers.php_version, "7.3");
        assert!(!answers.wordpress);
        assert!(answers.proxy.is_none());
        assert_eq!(
            script.asked,
            [
                Field::Hostname,
                Field::AddMoreHosts,
                Field::MediaProxy,
                Field::PhpVersion,
                Field::Elasticsearch,
                Field::WordPress
            ]
        );
    }

    #[test]
    fn test_full_run_applies_filters_and_defaults() {
        let mut script = Script::new(&[
            Some("Docker.test"),
            Some("y"),
            Some("  one.test   http://two.test/x "),
            Some("y"),
            None,
            Some("7.1"),
            Some("y"),
            Some("y"),
            Some("subdomain"),
            Some("n"),
            None,
            None,
            Some("secret"),
            None,
        ]);
        let answers = collect_answers(&mut script).unwrap();

        assert_eq!(answers.extra_hosts, ["one.test", "two.test"]);
        assert_eq!(answers.proxy.as_deref(), Some("http://Docker.com"));
        assert_eq!(answers.php_version, "7.1");
        assert_eq!(answers.wordpress_type.as_deref(), Some("subdomain"));
        assert!(!answers.empty_content);
        assert_eq!(answers.title.as_deref(), Some("Docker.test"));
        assert_eq!(answers.username.as_deref(), Some("admin"));
        assert_eq!(answers.password.as_deref(), Some("secret"));
        assert_eq!(answers.email.as_deref(), Some("admin@example.com"));
        answers.validate().unwrap();
    }

    #[test]
    fn test_proxy_gains_scheme() {
        let mut script = Script::new(&[
            Some("docker.test"),
            Some("n"),
            Some("y"),
            Some("example.com/"),
            None,
            Some("n"),
            Some("n"),
        ]);
        let answers = collect_answers(&mut script).unwrap();
        assert_eq!(answers.proxy_url(), Some("http://example.com"));
    }

    #[test]
    fn test_blank_hostname_is_rejected() {
        let mut script = Script::new(&[Some("   ")]);
        let err = collect_answers(&mut script).unwrap_err();
        assert!(matches!(err, Error::EmptyField { ref field } if field == "hostname"));
        assert!(err.to_string().contains("This field is required"));
    }
}

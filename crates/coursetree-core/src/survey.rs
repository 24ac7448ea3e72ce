//! Course surveys: forms shown to learners and the answers they give.
//!
//! A [`SurveyForm`] is not tied to a course run, so one survey can be shared
//! across courses. A course opts in through [`CourseSurveySettings`].
//!
//! # Storage
//!
//! [`SurveyStore`] keeps everything in memory. Answers are keyed by
//! `(form, user, field)`; saving the same field twice overwrites it.
//!
//! Answers are not validated against the form markup. Callers must validate
//! before calling [`SurveyStore::save_user_answers`]. Only the column limits
//! below are enforced: form and field names up to [`MAX_NAME_CHARS`]
//! characters, answers up to [`MAX_FIELD_VALUE_CHARS`].

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Longest form or field name, in characters.
pub const MAX_NAME_CHARS: usize = 255;
/// Longest single answer, in characters.
pub const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// `user_id -> field_name -> field_value`
pub type AnswerMap = BTreeMap<u64, BTreeMap<String, String>>;

/// Errors from survey operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurveyError {
    #[error("survey form '{0}' already exists")]
    DuplicateName(String),
    #[error("survey form '{0}' not found")]
    FormNotFound(String),
    #[error("survey form '{name}' is invalid: {reason}")]
    InvalidForm { name: String, reason: &'static str },
    #[error("answer to '{field}' is invalid: {reason}")]
    InvalidAnswer { field: String, reason: &'static str },
}

/// Markup of a survey presented to learners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyForm {
    pub name: String,
    pub form: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SurveyAnswer {
    field_value: String,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

/// Per-course survey opt-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSurveySettings {
    #[serde(default)]
    pub survey_required: bool,
    #[serde(default)]
    pub survey_name: Option<String>,
}

/// In-memory store of forms and answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyStore {
    forms: BTreeMap<String, SurveyForm>,
    /// form name -> user id -> field name -> answer
    answers: BTreeMap<String, BTreeMap<u64, BTreeMap<String, SurveyAnswer>>>,
}

impl SurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form, or replace the markup of an existing one when
    /// `update_if_exists` is set.
    ///
    /// # Errors
    ///
    /// [`SurveyError::InvalidForm`] for empty markup or a name longer than
    /// [`MAX_NAME_CHARS`], or
    /// [`SurveyError::DuplicateName`] if the name is taken and
    /// `update_if_exists` is false.
    pub fn create_form(
        &mut self,
        name: &str,
        form: &str,
        update_if_exists: bool,
    ) -> Result<&SurveyForm, SurveyError> {
        if form.trim().is_empty() {
            return Err(SurveyError::InvalidForm {
                name: name.to_string(),
                reason: "form markup is empty",
            });
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(SurveyError::InvalidForm {
                name: name.to_string(),
                reason: "form name is longer than 255 characters",
            });
        }

        let now = Utc::now();
        if self.forms.contains_key(name) && !update_if_exists {
            return Err(SurveyError::DuplicateName(name.to_string()));
        }

        let entry = self
            .forms
            .entry(name.to_string())
            .and_modify(|existing| {
                existing.form = form.to_string();
                existing.modified = now;
            })
            .or_insert_with(|| SurveyForm {
                name: name.to_string(),
                form: form.to_string(),
                created: now,
                modified: now,
            });
        info!(name, "survey form saved");
        Ok(&*entry)
    }

    pub fn get_form(&self, name: &str) -> Option<&SurveyForm> {
        self.forms.get(name)
    }

    /// Store `answers` for `user_id`, overwriting fields answered before.
    ///
    /// # Errors
    ///
    /// [`SurveyError::FormNotFound`] if `form` does not exist, or
    /// [`SurveyError::InvalidAnswer`] if a field name or value is too long.
    /// Nothing is stored when any answer is rejected.
    pub fn save_user_answers(
        &mut self,
        form: &str,
        user_id: u64,
        answers: &BTreeMap<String, String>,
    ) -> Result<(), SurveyError> {
        if !self.forms.contains_key(form) {
            return Err(SurveyError::FormNotFound(form.to_string()));
        }
        for (name, value) in answers {
            check_answer(name, value)?;
        }

        let now = Utc::now();
        let fields = self
            .answers
            .entry(form.to_string())
            .or_default()
            .entry(user_id)
            .or_default();

        for (name, value) in answers {
            fields
                .entry(name.clone())
                .and_modify(|answer| {
                    answer.field_value.clone_from(value);
                    answer.modified = now;
                })
                .or_insert_with(|| SurveyAnswer {
                    field_value: value.clone(),
                    created: now,
                    modified: now,
                });
        }
        debug!(form, user_id, fields = answers.len(), "saved survey answers");
        Ok(())
    }

    /// Answers to `form`, for one user or (with `None`) for every user.
    ///
    /// Users without answers are absent from the result.
    pub fn get_answers(&self, form: &str, user_id: Option<u64>) -> AnswerMap {
        let Some(by_user) = self.answers.get(form) else {
            return AnswerMap::new();
        };

        by_user
            .iter()
            .filter(|(user, _)| user_id.is_none_or(|wanted| wanted == **user))
            .filter(|(_, fields)| !fields.is_empty())
            .map(|(user, fields)| {
                let values = fields
                    .iter()
                    .map(|(name, answer)| (name.clone(), answer.field_value.clone()))
                    .collect();
                (*user, values)
            })
            .collect()
    }

    pub fn has_user_answered(&self, form: &str, user_id: u64) -> bool {
        self.answers
            .get(form)
            .and_then(|by_user| by_user.get(&user_id))
            .is_some_and(|fields| !fields.is_empty())
    }

    /// Distinct field names answered for `form`, sorted.
    pub fn field_names(&self, form: &str) -> Vec<String> {
        let Some(by_user) = self.answers.get(form) else {
            return Vec::new();
        };
        by_user
            .values()
            .flat_map(BTreeMap::keys)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// A course requires a survey when the flag is set and the named form exists.
pub fn is_survey_required_for_course(settings: &CourseSurveySettings, store: &SurveyStore) -> bool {
    required_form(settings, store).is_some()
}

/// Whether `user_id` has answered the survey `settings` requires.
///
/// `false` when the course requires no survey.
pub fn has_user_answered_required_survey(
    settings: &CourseSurveySettings,
    store: &SurveyStore,
    user_id: u64,
) -> bool {
    required_form(settings, store).is_some_and(|form| store.has_user_answered(&form.name, user_id))
}

fn check_answer(name: &str, value: &str) -> Result<(), SurveyError> {
    let reason = if name.chars().count() > MAX_NAME_CHARS {
        "field name is longer than 255 characters"
    } else if value.chars().count() > MAX_FIELD_VALUE_CHARS {
        "value is longer than 1024 characters"
    } else {
        return Ok(());
    };
    Err(SurveyError::InvalidAnswer {
        field: name.to_string(),
        reason,
    })
}

fn required_form<'a>(
    settings: &CourseSurveySettings,
    store: &'a SurveyStore,
) -> Option<&'a SurveyForm> {
    if !settings.survey_required {
        return None;
    }
    store.get_form(settings.survey_name.as_deref()?)
}

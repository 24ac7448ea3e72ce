//! Keyword substitution for personalized course text.
//!
//! Course e-mails and announcements may embed keywords such as
//! `%%USER_FULLNAME%%`; each one is replaced with data about the recipient
//! and the course. The set of keywords is a [`KeywordMap`] owned by the
//! caller: there is no process-wide table to patch.
//!
//! Only registered keywords are replaced. Anything else between `%%`
//! markers (lowercase variants, typos such as `%%user-id%%`) is left in
//! place verbatim.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const USER_ID: &str = "%%USER_ID%%";
pub const USER_FULLNAME: &str = "%%USER_FULLNAME%%";
pub const COURSE_DISPLAY_NAME: &str = "%%COURSE_DISPLAY_NAME%%";
pub const COURSE_END_DATE: &str = "%%COURSE_END_DATE%%";

const MARKER: &str = "%%";

/// Recipient data available to keyword functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Course-independent anonymous id; never the database id.
    pub anonymous_id: String,
    pub full_name: String,
}

/// Course data available to keyword functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub display_name: String,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

/// Everything a keyword function may look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionContext {
    pub user: UserInfo,
    pub course: CourseInfo,
}

type KeywordFn = Box<dyn Fn(&SubstitutionContext) -> String + Send + Sync>;

/// Mapping from keyword tag (including the `%%` markers) to the function
/// producing its replacement.
#[derive(Default)]
pub struct KeywordMap {
    functions: BTreeMap<String, KeywordFn>,
}

impl fmt::Debug for KeywordMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordMap")
            .field("tags", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeywordMap {
    /// An empty map: substitution returns its input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// The four keywords supported by course e-mail.
    pub fn standard() -> Self {
        let mut map = Self::new();
        map.insert(USER_ID, |ctx| ctx.user.anonymous_id.clone());
        map.insert(USER_FULLNAME, |ctx| ctx.user.full_name.clone());
        map.insert(COURSE_DISPLAY_NAME, |ctx| ctx.course.display_name.clone());
        map.insert(COURSE_END_DATE, |ctx| {
            ctx.course.end.map(default_time_display).unwrap_or_default()
        });
        map
    }

    /// Register `tag`, replacing any previous function for it.
    pub fn insert<F>(&mut self, tag: impl Into<String>, function: F)
    where
        F: Fn(&SubstitutionContext) -> String + Send + Sync + 'static,
    {
        self.functions.insert(tag.into(), Box::new(function));
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.functions.remove(tag).is_some()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.functions.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Replace every registered keyword in `text`.
    ///
    /// Text is scanned once, left to right; replacement values are not
    /// rescanned, so data containing `%%` cannot inject further keywords.
    pub fn substitute(&self, text: &str, ctx: &SubstitutionContext) -> String {
        if self.functions.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(MARKER) {
            let after_open = &rest[start + MARKER.len()..];
            let Some(close) = after_open.find(MARKER) else {
                break;
            };
            let tag_end = start + MARKER.len() + close + MARKER.len();
            let tag = &rest[start..tag_end];

            if let Some(function) = self.functions.get(tag) {
                trace!(tag, "substituting keyword");
                out.push_str(&rest[..start]);
                out.push_str(&function(ctx));
                rest = &rest[tag_end..];
            } else {
                // Keep the opening marker; the closing one may open a real tag.
                let keep = start + MARKER.len() + close;
                out.push_str(&rest[..keep]);
                rest = &rest[keep..];
            }
        }

        out.push_str(rest);
        out
    }
}

/// Render a timestamp the way course pages display dates.
pub fn default_time_display(at: DateTime<Utc>) -> String {
    at.format("%b %d, %Y at %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx() -> SubstitutionContext {
        SubstitutionContext {
            user: UserInfo {
                anonymous_id: "5afe5d9bb03796557ee2614f5c9611fb".to_string(),
                full_name: "Test User".to_string(),
            },
            course: CourseInfo {
                display_name: "test_course".to_string(),
                end: Utc.with_ymd_and_hms(2015, 3, 1, 17, 30, 0).single(),
            },
        }
    }

    #[test]
    fn substitutes_course_name() {
        let out = KeywordMap::standard()
            .substitute("Course Display Name: %%COURSE_DISPLAY_NAME%%", &ctx());
        assert_eq!(out, "Course Display Name: test_course");
    }

    #[test]
    fn substitutes_inside_markup() {
        let out = KeywordMap::standard().substitute("<some tag>%%USER_ID%%</some tag>", &ctx());
        assert_eq!(out, "<some tag>5afe5d9bb03796557ee2614f5c9611fb</some tag>");
    }

    #[test]
    fn lowercase_tag_is_not_a_keyword() {
        let text = "%%user_id%%";
        assert_eq!(KeywordMap::standard().substitute(text, &ctx()), text);
    }

    #[test]
    fn text_without_tags_is_unchanged() {
        let text = "this string has no subtags";
        assert_eq!(KeywordMap::standard().substitute(text, &ctx()), text);
    }

    #[test]
    fn multiple_tags_with_an_invalid_one() {
        let out = KeywordMap::standard().substitute(
            "The user with id %%user-id%% is named %%USER_FULLNAME%% and is in %%COURSE_DISPLAY_NAME%%",
            &ctx(),
        );
        assert_eq!(
            out,
            "The user with id %%user-id%% is named Test User and is in test_course"
        );
    }

    #[test]
    fn empty_map_substitutes_nothing() {
        let text = "This user's name is %%USER_FULLNAME%%";
        assert_eq!(KeywordMap::new().substitute(text, &ctx()), text);
    }

    #[test]
    fn end_date_is_formatted_or_empty() {
        let map = KeywordMap::standard();
        assert_eq!(
            map.substitute("ends %%COURSE_END_DATE%%", &ctx()),
            "ends Mar 01, 2015 at 17:30 UTC"
        );

        let mut open_ended = ctx();
        open_ended.course.end = None;
        assert_eq!(map.substitute("ends %%COURSE_END_DATE%%", &open_ended), "ends ");
    }

    #[test]
    fn replacement_values_are_not_rescanned() {
        let mut map = KeywordMap::standard();
        map.insert(USER_FULLNAME, |_| "%%USER_ID%%".to_string());
        assert_eq!(map.substitute("%%USER_FULLNAME%%", &ctx()), "%%USER_ID%%");
    }

    #[test]
    fn custom_keyword_can_be_registered_and_removed() {
        let mut map = KeywordMap::new();
        map.insert("%%PLATFORM%%", |_| "edX".to_string());
        assert!(map.contains("%%PLATFORM%%"));
        assert_eq!(map.substitute("Welcome to %%PLATFORM%%!", &ctx()), "Welcome to edX!");

        assert!(map.remove("%%PLATFORM%%"));
        assert!(map.is_empty());
    }

    #[test]
    fn unterminated_marker_is_kept() {
        let text = "100%% sure, %%USER_FULLNAME";
        assert_eq!(KeywordMap::standard().substitute(text, &ctx()), text);
    }
}

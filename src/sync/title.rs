// file: src/sync/title.rs
use crate::models::EventType;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(name|label|age)\}").unwrap();
}

/// Localized strings used for generated titles and the calendar name.
///
/// Templates use `{name}`, `{label}` and `{age}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translations {
    pub calendar_display_name: &'static str,
    pub birthday_with_age: &'static str,
    pub birthday_without_age: &'static str,
    pub anniversary_with_age: &'static str,
    pub anniversary_without_age: &'static str,
    pub custom_with_age: &'static str,
    pub custom_without_age: &'static str,
    pub other_with_age: &'static str,
    pub other_without_age: &'static str,
}

impl Translations {
    pub const ENGLISH: Translations = Translations {
        calendar_display_name: "Birthdays",
        birthday_with_age: "{name}'s Birthday ({age})",
        birthday_without_age: "{name}'s Birthday",
        anniversary_with_age: "{name}'s Anniversary ({age})",
        anniversary_without_age: "{name}'s Anniversary",
        custom_with_age: "{name}'s {label} ({age})",
        custom_without_age: "{name}'s {label}",
        other_with_age: "{name}'s Event ({age})",
        other_without_age: "{name}'s Event",
    };

    pub const GERMAN: Translations = Translations {
        calendar_display_name: "Geburtstage",
        birthday_with_age: "Geburtstag von {name} ({age})",
        birthday_without_age: "Geburtstag von {name}",
        anniversary_with_age: "Jahrestag von {name} ({age})",
        anniversary_without_age: "Jahrestag von {name}",
        custom_with_age: "{label} von {name} ({age})",
        custom_without_age: "{label} von {name}",
        other_with_age: "Ereignis von {name} ({age})",
        other_without_age: "Ereignis von {name}",
    };

    /// Strings for an ISO 639-1 language code; English when unknown.
    pub fn for_language(code: &str) -> &'static Translations {
        match code.trim().to_lowercase().as_str() {
            "de" => &Self::GERMAN,
            _ => &Self::ENGLISH,
        }
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::ENGLISH
    }
}

#[derive(Debug, Clone)]
pub struct TitleGenerator {
    translations: &'static Translations,
}

impl TitleGenerator {
    pub fn new(translations: &'static Translations) -> Self {
        Self { translations }
    }

    pub fn for_language(code: &str) -> Self {
        Self::new(Translations::for_language(code))
    }

    pub fn translations(&self) -> &'static Translations {
        self.translations
    }

    /// Title for one projected year, or `None` without a display name.
    /// `age` is only rendered when `include_age` is set.
    pub fn title(
        &self,
        event_type: EventType,
        custom_label: Option<&str>,
        display_name: Option<&str>,
        include_age: bool,
        age: i32,
    ) -> Option<String> {
        let name = display_name?;
        let t = self.translations;

        let (template, label) = match (event_type, custom_label) {
            (EventType::Custom, Some(label)) => {
                (pick(include_age, t.custom_with_age, t.custom_without_age), Some(label))
            }
            (EventType::Anniversary, _) => (
                pick(include_age, t.anniversary_with_age, t.anniversary_without_age),
                None,
            ),
            (EventType::Birthday, _) => (
                pick(include_age, t.birthday_with_age, t.birthday_without_age),
                None,
            ),
            // Custom without a label falls back to the generic template
            (EventType::Custom, None) | (EventType::Other, _) => {
                (pick(include_age, t.other_with_age, t.other_without_age), None)
            }
        };

        Some(render(template, name, label, age))
    }
}

impl Default for TitleGenerator {
    fn default() -> Self {
        Self::new(&Translations::ENGLISH)
    }
}

fn pick(include_age: bool, with_age: &'static str, without_age: &'static str) -> &'static str {
    if include_age {
        with_age
    } else {
        without_age
    }
}

/// Fill every placeholder in a single pass over the template, so braces in
/// a name or label are never expanded.
fn render(template: &str, name: &str, label: Option<&str>, age: i32) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "name" => name.to_string(),
            "age" => age.to_string(),
            _ => label.unwrap_or(&caps[0]).to_string(),
        })
        .into_owned()
}

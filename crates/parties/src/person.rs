use serde::{Deserialize, Serialize};

use marketerp_core::ValueObject;

/// A person's name as captured at registration.
///
/// Surnames are optional; nothing is normalized on input so the stored value is
/// exactly what was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub given_names: String,
    #[serde(default)]
    pub paternal_surname: Option<String>,
    #[serde(default)]
    pub maternal_surname: Option<String>,
}

impl ValueObject for PersonName {}

impl PersonName {
    pub fn new(
        given_names: impl Into<String>,
        paternal_surname: Option<&str>,
        maternal_surname: Option<&str>,
    ) -> Self {
        Self {
            given_names: given_names.into(),
            paternal_surname: paternal_surname.map(str::to_string),
            maternal_surname: maternal_surname.map(str::to_string),
        }
    }

    /// Human-readable full name, or `None` when every part is blank.
    pub fn display_name(&self) -> Option<String> {
        join_name_parts([
            Some(self.given_names.as_str()),
            self.paternal_surname.as_deref(),
            self.maternal_surname.as_deref(),
        ])
    }
}

/// Join the present, non-blank parts with single spaces.
///
/// Missing parts are skipped rather than rendered, so the result never contains
/// placeholder text and never has leading, trailing or doubled spaces.
pub fn join_name_parts<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined = parts
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    (!joined.is_empty()).then_some(joined)
}

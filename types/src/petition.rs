//! The petition record and its creation input.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::{PetitionId, ValidationError};

/// A stored petition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petition {
    pub id: PetitionId,
    pub title: String,
    pub description: String,
    /// Signature counter. Starts at zero; nothing increments it yet.
    pub signatures: u64,
}

/// A petition as submitted by a client, before validation.
///
/// Both fields are optional so that a body missing one of them still
/// deserializes and can be rejected with a [`ValidationError`] instead of a
/// parse error. Falsy JSON scalars (`null`, `false`, `0`) count as missing
/// too; any other non-string value is a parse error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPetition {
    #[serde(
        default,
        deserialize_with = "falsy_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "falsy_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

fn falsy_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldVisitor;

    impl<'de> Visitor<'de> for FieldVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, null, false or 0")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            if v {
                Err(E::invalid_type(de::Unexpected::Bool(v), &self))
            } else {
                Ok(None)
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            if v == 0 {
                Ok(None)
            } else {
                Err(E::invalid_type(de::Unexpected::Signed(v), &self))
            }
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            if v == 0 {
                Ok(None)
            } else {
                Err(E::invalid_type(de::Unexpected::Unsigned(v), &self))
            }
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v == 0.0 || v.is_nan() {
                Ok(None)
            } else {
                Err(E::invalid_type(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(FieldVisitor)
}

impl NewPetition {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Check presence of both fields.
    ///
    /// Only absent or empty values are rejected. Whitespace-only text and
    /// arbitrary lengths are accepted unchanged.
    pub fn validate(self) -> Result<ValidPetition, ValidationError> {
        match (self.title, self.description) {
            (Some(title), Some(description)) if !title.is_empty() && !description.is_empty() => {
                Ok(ValidPetition { title, description })
            }
            _ => Err(ValidationError::MissingField),
        }
    }
}

/// A petition that passed [`NewPetition::validate`] and is ready to be
/// appended to a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidPetition {
    title: String,
    description: String,
}

impl ValidPetition {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Materialize the stored record under a store-assigned id.
    pub fn into_petition(self, id: PetitionId) -> Petition {
        Petition {
            id,
            title: self.title,
            description: self.description,
            signatures: 0,
        }
    }
}

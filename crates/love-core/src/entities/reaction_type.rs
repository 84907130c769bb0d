//! ReactionType entity - a named, weighted category of reaction
//!
//! Types are never auto-created; they come from the seed operation or an
//! explicit add-type command. Name lookups are exact and case-sensitive.

use chrono::{DateTime, Utc};

use crate::value_objects::{Rate, Snowflake};

/// ReactionType entity
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionType {
    pub id: Snowflake,
    pub name: String,
    /// Signed weight coefficient applied to every reaction of this type
    pub mass: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReactionType {
    /// Mass applied when none is given
    pub const DEFAULT_MASS: i32 = 0;

    /// Create a new ReactionType
    pub fn new(id: Snowflake, name: String, mass: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            mass,
            created_at: now,
            updated_at: now,
        }
    }

    /// Effective weight contributed by one reaction of this type at `rate`
    #[inline]
    pub fn weight_of(&self, rate: Rate) -> f64 {
        f64::from(self.mass) * rate.value()
    }

    /// Check the type against an exact, case-sensitive name
    #[inline]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    /// Convert a free-form name to StudlyCase (`nice_one` -> `NiceOne`)
    pub fn studly_case(name: &str) -> String {
        name.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect()
    }

    /// Check a studly-cased name against the accepted shape:
    /// an ASCII uppercase letter followed by ASCII alphanumerics or underscores
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_uppercase() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }
}

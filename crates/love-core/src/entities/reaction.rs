//! Reaction entity - one directed reaction event
//!
//! A specific reacter reacted to a specific reactant with a specific type and
//! rate. At most one reaction exists per (reacter, reactant, type) triple;
//! that uniqueness is enforced by the maintenance engine.

use chrono::{DateTime, Utc};

use crate::entities::{Reactant, Reacter, ReactionType};
use crate::value_objects::{Rate, Snowflake};

/// Reaction entity
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub id: Snowflake,
    pub reactant_id: Snowflake,
    pub reacter_id: Snowflake,
    pub reaction_type_id: Snowflake,
    pub rate: Rate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(
        id: Snowflake,
        reactant_id: Snowflake,
        reacter_id: Snowflake,
        reaction_type_id: Snowflake,
        rate: Rate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            reactant_id,
            reacter_id,
            reaction_type_id,
            rate,
            created_at: now,
            updated_at: now,
        }
    }

    /// Effective weight of this reaction: `mass * rate`
    #[inline]
    pub fn weight(&self, reaction_type: &ReactionType) -> f64 {
        reaction_type.weight_of(self.rate)
    }

    /// Check if reaction is of the given type
    #[inline]
    pub fn is_of_type(&self, reaction_type: &ReactionType) -> bool {
        self.reaction_type_id == reaction_type.id
    }

    #[inline]
    pub fn is_not_of_type(&self, reaction_type: &ReactionType) -> bool {
        !self.is_of_type(reaction_type)
    }

    /// Check if reaction targets the given reactant; false for a null reactant
    pub fn is_to_reactant(&self, reactant: &Reactant) -> bool {
        reactant
            .id()
            .map(|id| id == self.reactant_id)
            .unwrap_or(false)
    }

    pub fn is_not_to_reactant(&self, reactant: &Reactant) -> bool {
        !self.is_to_reactant(reactant)
    }

    /// Check if reaction was made by the given reacter; false for a null reacter
    pub fn is_by_reacter(&self, reacter: &Reacter) -> bool {
        reacter
            .id()
            .map(|id| id == self.reacter_id)
            .unwrap_or(false)
    }

    pub fn is_not_by_reacter(&self, reacter: &Reacter) -> bool {
        !self.is_by_reacter(reacter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reaction() -> Reaction {
        Reaction::new(
            Snowflake::new(1),
            Snowflake::new(10),
            Snowflake::new(20),
            Snowflake::new(30),
            Rate::default(),
        )
    }

    #[test]
    fn test_weight() {
        let like = ReactionType::new(Snowflake::new(30), "Like".to_string(), 4);
        let mut reaction = sample_reaction();
        reaction.rate = Rate::new(1.2).unwrap();
        assert_eq!(reaction.weight(&like), 4.8);
    }

    #[test]
    fn test_is_of_type() {
        let like = ReactionType::new(Snowflake::new(30), "Like".to_string(), 1);
        let dislike = ReactionType::new(Snowflake::new(31), "Dislike".to_string(), -1);
        let reaction = sample_reaction();
        assert!(reaction.is_of_type(&like));
        assert!(reaction.is_not_of_type(&dislike));
    }

    #[test]
    fn test_is_to_reactant() {
        let reaction = sample_reaction();
        let reactant = Reactant::registered(Snowflake::new(10), "Article");
        assert!(reaction.is_to_reactant(&reactant));
        assert!(reaction.is_not_to_reactant(&Reactant::registered(Snowflake::new(11), "Article")));
    }

    #[test]
    fn test_null_identities_never_match() {
        let reaction = sample_reaction();
        assert!(!reaction.is_to_reactant(&Reactant::null("Article")));
        assert!(!reaction.is_by_reacter(&Reacter::null("User")));
    }
}

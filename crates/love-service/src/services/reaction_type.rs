//! Reaction type management service
//!
//! Types are never created implicitly by reacting; they enter the system
//! through the seed operation or an explicit add-type command.

use tracing::{info, instrument};

use love_core::entities::ReactionType;
use love_core::DomainError;

use crate::dto::{ReactionTypeResponse, SeedReport};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Default types installed by `seed_defaults`
const DEFAULT_TYPES: [(&str, i32); 2] = [("Like", 1), ("Dislike", -1)];

/// Reaction type service
pub struct ReactionTypeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionTypeService<'a> {
    /// Create a new ReactionTypeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Install the default Like/Dislike types, skipping ones that exist
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self) -> ServiceResult<SeedReport> {
        let mut report = SeedReport {
            created: Vec::new(),
            skipped: Vec::new(),
        };

        for (name, mass) in DEFAULT_TYPES {
            if self.ctx.reaction_type_repo().name_exists(name).await? {
                report.skipped.push(name.to_string());
                continue;
            }

            let reaction_type =
                ReactionType::new(self.ctx.generate_id(), name.to_string(), mass);
            self.ctx.reaction_type_repo().create(&reaction_type).await?;

            info!(name, mass, "Reaction type seeded");
            report.created.push(ReactionTypeResponse::from(&reaction_type));
        }

        Ok(report)
    }

    /// Add a new reaction type
    ///
    /// The name is studly-cased first (`nice_one` -> `NiceOne`), then checked
    /// against the accepted shape. Duplicate names fail.
    #[instrument(skip(self))]
    pub async fn add_type(&self, name: &str, mass: i32) -> ServiceResult<ReactionType> {
        let name = ReactionType::studly_case(name);

        if !ReactionType::is_valid_name(&name) {
            return Err(DomainError::ReactionTypeNameInvalid(name).into());
        }
        if self.ctx.reaction_type_repo().name_exists(&name).await? {
            return Err(DomainError::ReactionTypeAlreadyExists(name).into());
        }

        let reaction_type = ReactionType::new(self.ctx.generate_id(), name, mass);
        self.ctx.reaction_type_repo().create(&reaction_type).await?;

        info!(name = %reaction_type.name, mass, "Reaction type created");
        Ok(reaction_type)
    }

    /// Look up a type by exact name
    pub async fn find_by_name(&self, name: &str) -> ServiceResult<ReactionType> {
        self.ctx
            .reaction_type_repo()
            .find_by_name(name)
            .await?
            .ok_or_else(|| DomainError::ReactionTypeInvalid(name.to_string()).into())
    }

    /// All registered types
    pub async fn all(&self) -> ServiceResult<Vec<ReactionType>> {
        Ok(self.ctx.reaction_type_repo().all().await?)
    }
}

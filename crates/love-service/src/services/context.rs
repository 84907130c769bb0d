//! Service context - dependency container for services
//!
//! Holds the repositories, the morph-map registry, and the ID generator
//! shared by all services.

use std::sync::Arc;

use love_common::RecountConfig;
use love_core::registry::MorphMap;
use love_core::traits::{
    ReactantRepository, ReacterRepository, ReactionCounterRepository, ReactionRepository,
    ReactionTotalRepository, ReactionTypeRepository, RegistrationRepository,
};
use love_core::{Snowflake, SnowflakeGenerator};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repository ports (backed by PostgreSQL in production)
/// - The reactable/reacterable morph-map registry
/// - Snowflake generator for ID generation
/// - Recount tuning knobs
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    reaction_type_repo: Arc<dyn ReactionTypeRepository>,
    reactant_repo: Arc<dyn ReactantRepository>,
    reacter_repo: Arc<dyn ReacterRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    counter_repo: Arc<dyn ReactionCounterRepository>,
    total_repo: Arc<dyn ReactionTotalRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,

    // Registry
    morph_map: Arc<MorphMap>,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Tuning
    recount: RecountConfig,
}

impl ServiceContext {
    /// Start building a service context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    /// Get the reaction type repository
    pub fn reaction_type_repo(&self) -> &dyn ReactionTypeRepository {
        self.reaction_type_repo.as_ref()
    }

    /// Get the reactant repository
    pub fn reactant_repo(&self) -> &dyn ReactantRepository {
        self.reactant_repo.as_ref()
    }

    /// Get the reacter repository
    pub fn reacter_repo(&self) -> &dyn ReacterRepository {
        self.reacter_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the reaction counter repository
    pub fn counter_repo(&self) -> &dyn ReactionCounterRepository {
        self.counter_repo.as_ref()
    }

    /// Get the reaction total repository
    pub fn total_repo(&self) -> &dyn ReactionTotalRepository {
        self.total_repo.as_ref()
    }

    /// Get the registration repository
    pub fn registration_repo(&self) -> &dyn RegistrationRepository {
        self.registration_repo.as_ref()
    }

    // === Registry ===

    /// Get the morph-map registry
    pub fn morph_map(&self) -> &MorphMap {
        self.morph_map.as_ref()
    }

    // === Services ===

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Get the recount configuration
    pub fn recount_config(&self) -> &RecountConfig {
        &self.recount
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    reaction_type_repo: Option<Arc<dyn ReactionTypeRepository>>,
    reactant_repo: Option<Arc<dyn ReactantRepository>>,
    reacter_repo: Option<Arc<dyn ReacterRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    counter_repo: Option<Arc<dyn ReactionCounterRepository>>,
    total_repo: Option<Arc<dyn ReactionTotalRepository>>,
    registration_repo: Option<Arc<dyn RegistrationRepository>>,
    morph_map: Option<Arc<MorphMap>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    recount: Option<RecountConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reaction_type_repo(mut self, repo: Arc<dyn ReactionTypeRepository>) -> Self {
        self.reaction_type_repo = Some(repo);
        self
    }

    pub fn reactant_repo(mut self, repo: Arc<dyn ReactantRepository>) -> Self {
        self.reactant_repo = Some(repo);
        self
    }

    pub fn reacter_repo(mut self, repo: Arc<dyn ReacterRepository>) -> Self {
        self.reacter_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn counter_repo(mut self, repo: Arc<dyn ReactionCounterRepository>) -> Self {
        self.counter_repo = Some(repo);
        self
    }

    pub fn total_repo(mut self, repo: Arc<dyn ReactionTotalRepository>) -> Self {
        self.total_repo = Some(repo);
        self
    }

    pub fn registration_repo(mut self, repo: Arc<dyn RegistrationRepository>) -> Self {
        self.registration_repo = Some(repo);
        self
    }

    pub fn morph_map(mut self, map: MorphMap) -> Self {
        self.morph_map = Some(Arc::new(map));
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn recount(mut self, recount: RecountConfig) -> Self {
        self.recount = Some(recount);
        self
    }

    /// Build the context
    ///
    /// # Panics
    /// Panics if any repository or the ID generator was not provided. The
    /// context is wired once at startup, so a missing dependency is a
    /// programming error, not a runtime condition.
    pub fn build(self) -> ServiceContext {
        ServiceContext {
            reaction_type_repo: self
                .reaction_type_repo
                .expect("reaction_type_repo is required"),
            reactant_repo: self.reactant_repo.expect("reactant_repo is required"),
            reacter_repo: self.reacter_repo.expect("reacter_repo is required"),
            reaction_repo: self.reaction_repo.expect("reaction_repo is required"),
            counter_repo: self.counter_repo.expect("counter_repo is required"),
            total_repo: self.total_repo.expect("total_repo is required"),
            registration_repo: self
                .registration_repo
                .expect("registration_repo is required"),
            morph_map: self.morph_map.unwrap_or_default(),
            snowflake_generator: self
                .snowflake_generator
                .expect("snowflake_generator is required"),
            recount: self.recount.unwrap_or_default(),
        }
    }
}

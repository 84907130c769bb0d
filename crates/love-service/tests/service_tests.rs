//! Service layer tests over in-memory repositories
//!
//! These tests exercise the mutation API, the recount algorithm, reaction
//! type management, registration, and the query facade without a database.
//! The in-memory store mirrors the transactional repository contract: a
//! failed aggregate step leaves the reaction log untouched.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use love_core::entities::{Reactant, Reacter, Reaction, ReactionCounter, ReactionTotal, ReactionType};
use love_core::registry::{MorphMap, MorphTypeDef};
use love_core::traits::{
    RankedReactant, ReactantRepository, ReacterRepository, ReactionCounterRepository,
    ReactionRepository, ReactionTotalRepository, ReactionTypeRepository, RegistrationRepository,
    RepoResult,
};
use love_core::{DomainError, Rate, Snowflake, SnowflakeGenerator};
use love_service::{
    QueryService, ReactionService, ReactionTypeService, RecountService, RegistryService,
    ServiceContext, ServiceError,
};

fn next_id() -> Snowflake {
    static COUNTER: AtomicI64 = AtomicI64::new(1);
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[derive(Debug, Clone)]
struct Aggregate {
    id: Snowflake,
    count: i64,
    weight: f64,
}

#[derive(Debug, Clone)]
struct EntityRow {
    id: i64,
    fk: Option<i64>,
}

#[derive(Default)]
struct State {
    types: Vec<ReactionType>,
    reactants: Vec<(Snowflake, String)>,
    reacters: Vec<(Snowflake, String)>,
    reactions: Vec<Reaction>,
    counters: HashMap<(Snowflake, Snowflake), Aggregate>,
    totals: HashMap<Snowflake, Aggregate>,
    /// Fake application tables, keyed by table name
    entities: HashMap<String, Vec<EntityRow>>,
    /// (table, column) pairs added by the setup operation
    fk_columns: HashSet<(String, String)>,
}

/// In-memory implementation of every repository port
#[derive(Default)]
struct MemoryRepo {
    state: Mutex<State>,
}

impl MemoryRepo {
    fn corrupt_counter(&self, reactant_id: Snowflake, reaction_type_id: Snowflake) {
        let mut state = self.state.lock().unwrap();
        if let Some(agg) = state.counters.get_mut(&(reactant_id, reaction_type_id)) {
            agg.count += 40;
            agg.weight += 40.0;
        }
    }

    fn drop_aggregates(&self, reactant_id: Snowflake) {
        let mut state = self.state.lock().unwrap();
        state.counters.retain(|(rid, _), _| *rid != reactant_id);
        state.totals.remove(&reactant_id);
    }

    fn has_fk_column(&self, table: &str, column: &str) -> bool {
        let state = self.state.lock().unwrap();
        state
            .fk_columns
            .contains(&(table.to_string(), column.to_string()))
    }

    fn seed_entities(&self, table: &str, ids: &[i64]) {
        let mut state = self.state.lock().unwrap();
        let rows = ids.iter().map(|&id| EntityRow { id, fk: None }).collect();
        state.entities.insert(table.to_string(), rows);
    }

    fn entity_fk(&self, table: &str, id: i64) -> Option<i64> {
        let state = self.state.lock().unwrap();
        state
            .entities
            .get(table)
            .and_then(|rows| rows.iter().find(|r| r.id == id))
            .and_then(|r| r.fk)
    }
}

#[async_trait]
impl ReactionTypeRepository for MemoryRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ReactionType>> {
        let state = self.state.lock().unwrap();
        Ok(state.types.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<ReactionType>> {
        let state = self.state.lock().unwrap();
        Ok(state.types.iter().find(|t| t.is_named(name)).cloned())
    }

    async fn name_exists(&self, name: &str) -> RepoResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.types.iter().any(|t| t.is_named(name)))
    }

    async fn all(&self) -> RepoResult<Vec<ReactionType>> {
        let state = self.state.lock().unwrap();
        Ok(state.types.clone())
    }

    async fn create(&self, reaction_type: &ReactionType) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.types.iter().any(|t| t.name == reaction_type.name) {
            return Err(DomainError::ReactionTypeAlreadyExists(
                reaction_type.name.clone(),
            ));
        }
        state.types.push(reaction_type.clone());
        Ok(())
    }
}

#[async_trait]
impl ReactantRepository for MemoryRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reactant>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reactants
            .iter()
            .find(|(rid, _)| *rid == id)
            .map(|(rid, kind)| Reactant::registered(*rid, kind.clone())))
    }

    async fn ids_by_kind(&self, kind: &str) -> RepoResult<Vec<Snowflake>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reactants
            .iter()
            .filter(|(_, k)| k == kind)
            .map(|(id, _)| *id)
            .collect())
    }

    async fn all_ids(&self) -> RepoResult<Vec<Snowflake>> {
        let state = self.state.lock().unwrap();
        Ok(state.reactants.iter().map(|(id, _)| *id).collect())
    }

    async fn create(&self, reactant: &Reactant) -> RepoResult<()> {
        let id = reactant.id()?;
        let mut state = self.state.lock().unwrap();
        state.reactants.push((id, reactant.kind().to_string()));
        Ok(())
    }
}

#[async_trait]
impl ReacterRepository for MemoryRepo {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Reacter>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reacters
            .iter()
            .find(|(rid, _)| *rid == id)
            .map(|(rid, kind)| Reacter::registered(*rid, kind.clone())))
    }

    async fn create(&self, reacter: &Reacter) -> RepoResult<()> {
        let id = reacter.id()?;
        let mut state = self.state.lock().unwrap();
        state.reacters.push((id, reacter.kind().to_string()));
        Ok(())
    }
}

fn increment_aggregates(state: &mut State, reaction: &Reaction, weight: f64) {
    let counter = state
        .counters
        .entry((reaction.reactant_id, reaction.reaction_type_id))
        .or_insert_with(|| Aggregate {
            id: next_id(),
            count: 0,
            weight: 0.0,
        });
    counter.count += 1;
    counter.weight += weight;

    let total = state
        .totals
        .entry(reaction.reactant_id)
        .or_insert_with(|| Aggregate {
            id: next_id(),
            count: 0,
            weight: 0.0,
        });
    total.count += 1;
    total.weight += weight;
}

#[async_trait]
impl ReactionRepository for MemoryRepo {
    async fn find(
        &self,
        reacter_id: Snowflake,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
    ) -> RepoResult<Option<Reaction>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reactions
            .iter()
            .find(|r| {
                r.reacter_id == reacter_id
                    && r.reactant_id == reactant_id
                    && r.reaction_type_id == reaction_type_id
            })
            .cloned())
    }

    async fn find_by_reactant(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Reaction>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reactions
            .iter()
            .filter(|r| {
                r.reactant_id == reactant_id
                    && reaction_type_id.is_none_or(|t| r.reaction_type_id == t)
            })
            .cloned()
            .collect())
    }

    async fn record(&self, reaction: &Reaction, weight: f64) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        let duplicate = state.reactions.iter().any(|r| {
            r.reacter_id == reaction.reacter_id
                && r.reactant_id == reaction.reactant_id
                && r.reaction_type_id == reaction.reaction_type_id
        });
        if duplicate {
            return Err(DomainError::ReactionAlreadyExists);
        }

        state.reactions.push(reaction.clone());
        increment_aggregates(&mut state, reaction, weight);
        Ok(())
    }

    async fn remove(&self, reaction: &Reaction, mass: i32) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        // Weight comes from the stored rate, as the SQL delete derives it
        // from the deleted row
        let stored_rate = state
            .reactions
            .iter()
            .find(|r| r.id == reaction.id)
            .map(|r| r.rate.value())
            .ok_or(DomainError::ReactionNotExists)?;
        let weight = f64::from(mass) * stored_rate;
        state.reactions.retain(|r| r.id != reaction.id);

        let counter = state
            .counters
            .get_mut(&(reaction.reactant_id, reaction.reaction_type_id))
            .ok_or(DomainError::ReactionCounterMissing)?;
        if counter.count < 1 {
            return Err(DomainError::ReactionCounterBadValue);
        }
        counter.count -= 1;
        counter.weight -= weight;

        let total = state
            .totals
            .get_mut(&reaction.reactant_id)
            .ok_or(DomainError::ReactionTotalMissing)?;
        if total.count < 1 {
            return Err(DomainError::ReactionTotalBadValue);
        }
        total.count -= 1;
        total.weight -= weight;
        Ok(())
    }

    async fn change_rate(&self, reaction: &Reaction, new_rate: Rate, mass: i32) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .reactions
            .iter_mut()
            .find(|r| r.id == reaction.id)
            .ok_or(DomainError::ReactionNotExists)?;
        let weight_delta = f64::from(mass) * (new_rate.value() - stored.rate.value());
        stored.rate = new_rate;

        let counter = state
            .counters
            .get_mut(&(reaction.reactant_id, reaction.reaction_type_id))
            .ok_or(DomainError::ReactionCounterMissing)?;
        counter.weight += weight_delta;

        let total = state
            .totals
            .get_mut(&reaction.reactant_id)
            .ok_or(DomainError::ReactionTotalMissing)?;
        total.weight += weight_delta;
        Ok(())
    }

    async fn exists(
        &self,
        reacter_id: Snowflake,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
        rate: Option<Rate>,
    ) -> RepoResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.reactions.iter().any(|r| {
            r.reacter_id == reacter_id
                && r.reactant_id == reactant_id
                && reaction_type_id.is_none_or(|t| r.reaction_type_id == t)
                && rate.is_none_or(|rt| r.rate == rt)
        }))
    }

    async fn reacted_reactant_ids(
        &self,
        reacter_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Snowflake>> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<Snowflake> = state
            .reactions
            .iter()
            .filter(|r| {
                r.reacter_id == reacter_id
                    && reaction_type_id.is_none_or(|t| r.reaction_type_id == t)
            })
            .map(|r| r.reactant_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn unreacted_reactant_ids(
        &self,
        reacter_id: Snowflake,
        kind: &str,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<Vec<Snowflake>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reactants
            .iter()
            .filter(|(id, k)| {
                k == kind
                    && !state.reactions.iter().any(|r| {
                        r.reactant_id == *id
                            && r.reacter_id == reacter_id
                            && reaction_type_id.is_none_or(|t| r.reaction_type_id == t)
                    })
            })
            .map(|(id, _)| *id)
            .collect())
    }
}

#[async_trait]
impl ReactionCounterRepository for MemoryRepo {
    async fn find(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
    ) -> RepoResult<ReactionCounter> {
        let state = self.state.lock().unwrap();
        Ok(state
            .counters
            .get(&(reactant_id, reaction_type_id))
            .map_or(ReactionCounter::Null, |agg| ReactionCounter::Present {
                id: agg.id,
                reactant_id,
                reaction_type_id,
                count: agg.count,
                weight: agg.weight,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
    }

    async fn find_by_reactant(&self, reactant_id: Snowflake) -> RepoResult<Vec<ReactionCounter>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .counters
            .iter()
            .filter(|((rid, _), _)| *rid == reactant_id)
            .map(|((rid, tid), agg)| ReactionCounter::Present {
                id: agg.id,
                reactant_id: *rid,
                reaction_type_id: *tid,
                count: agg.count,
                weight: agg.weight,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect())
    }

    async fn create(&self, counter: &ReactionCounter) -> RepoResult<()> {
        let ReactionCounter::Present {
            id,
            reactant_id,
            reaction_type_id,
            count,
            weight,
            ..
        } = counter
        else {
            return Err(DomainError::ReactionCounterInvalid);
        };

        let mut state = self.state.lock().unwrap();
        if state.counters.contains_key(&(*reactant_id, *reaction_type_id)) {
            return Err(DomainError::ReactionCounterDuplicate);
        }
        state.counters.insert(
            (*reactant_id, *reaction_type_id),
            Aggregate {
                id: *id,
                count: *count,
                weight: *weight,
            },
        );
        Ok(())
    }

    async fn increment(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Snowflake,
        weight: f64,
    ) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        let agg = state
            .counters
            .entry((reactant_id, reaction_type_id))
            .or_insert_with(|| Aggregate {
                id: next_id(),
                count: 0,
                weight: 0.0,
            });
        agg.count += 1;
        agg.weight += weight;
        Ok(())
    }

    async fn reset(
        &self,
        reactant_id: Snowflake,
        reaction_type_id: Option<Snowflake>,
    ) -> RepoResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut touched = 0;
        for ((rid, tid), agg) in &mut state.counters {
            if *rid == reactant_id && reaction_type_id.is_none_or(|t| *tid == t) {
                agg.count = 0;
                agg.weight = 0.0;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn rank_by_type(
        &self,
        kind: &str,
        reaction_type_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<RankedReactant>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<RankedReactant> = state
            .reactants
            .iter()
            .filter(|(_, k)| k == kind)
            .map(|(id, _)| {
                let agg = state.counters.get(&(*id, reaction_type_id));
                RankedReactant {
                    reactant_id: *id,
                    count: agg.map_or(0, |a| a.count),
                    weight: agg.map_or(0.0, |a| a.weight),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

#[async_trait]
impl ReactionTotalRepository for MemoryRepo {
    async fn find_by_reactant(&self, reactant_id: Snowflake) -> RepoResult<ReactionTotal> {
        let state = self.state.lock().unwrap();
        Ok(state
            .totals
            .get(&reactant_id)
            .map_or(ReactionTotal::Null, |agg| ReactionTotal::Present {
                id: agg.id,
                reactant_id,
                count: agg.count,
                weight: agg.weight,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
    }

    async fn create(&self, total: &ReactionTotal) -> RepoResult<()> {
        let ReactionTotal::Present {
            id,
            reactant_id,
            count,
            weight,
            ..
        } = total
        else {
            return Err(DomainError::ReactionTotalMissing);
        };

        let mut state = self.state.lock().unwrap();
        if state.totals.contains_key(reactant_id) {
            return Err(DomainError::ReactionTotalDuplicate);
        }
        state.totals.insert(
            *reactant_id,
            Aggregate {
                id: *id,
                count: *count,
                weight: *weight,
            },
        );
        Ok(())
    }

    async fn recompute(&self, reactant_id: Snowflake) -> RepoResult<ReactionTotal> {
        let mut state = self.state.lock().unwrap();
        let (count, weight) = state
            .counters
            .iter()
            .filter(|((rid, _), _)| *rid == reactant_id)
            .fold((0i64, 0.0f64), |(c, w), (_, agg)| {
                (c + agg.count, w + agg.weight)
            });

        let agg = state.totals.entry(reactant_id).or_insert_with(|| Aggregate {
            id: next_id(),
            count: 0,
            weight: 0.0,
        });
        agg.count = count;
        agg.weight = weight;

        Ok(ReactionTotal::Present {
            id: agg.id,
            reactant_id,
            count,
            weight,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn rank(&self, kind: &str, limit: i64) -> RepoResult<Vec<RankedReactant>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<RankedReactant> = state
            .reactants
            .iter()
            .filter(|(_, k)| k == kind)
            .map(|(id, _)| {
                let agg = state.totals.get(id);
                RankedReactant {
                    reactant_id: *id,
                    count: agg.map_or(0, |a| a.count),
                    weight: agg.map_or(0.0, |a| a.weight),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

#[async_trait]
impl RegistrationRepository for MemoryRepo {
    async fn fk_column_exists(&self, def: &MorphTypeDef) -> RepoResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state
            .fk_columns
            .contains(&(def.table.clone(), def.fk_column.clone())))
    }

    async fn add_fk_column(&self, def: &MorphTypeDef, _identity_table: &str) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state
            .fk_columns
            .insert((def.table.clone(), def.fk_column.clone()))
        {
            return Err(DomainError::DatabaseError(format!(
                "column {} already exists on {}",
                def.fk_column, def.table
            )));
        }
        Ok(())
    }

    async fn unregistered_ids(
        &self,
        def: &MorphTypeDef,
        ids: Option<&[i64]>,
    ) -> RepoResult<Vec<i64>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entities
            .get(&def.table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.fk.is_none() && ids.is_none_or(|ids| ids.contains(&r.id)))
                    .map(|r| r.id)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn attach_reactant(
        &self,
        def: &MorphTypeDef,
        entity_id: i64,
        reactant: &Reactant,
    ) -> RepoResult<()> {
        let id = reactant.id()?;
        let mut state = self.state.lock().unwrap();
        let Some(row) = state
            .entities
            .get_mut(&def.table)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == entity_id && r.fk.is_none()))
        else {
            return Ok(());
        };
        row.fk = Some(id.into_inner());
        state.reactants.push((id, reactant.kind().to_string()));
        Ok(())
    }

    async fn attach_reacter(
        &self,
        def: &MorphTypeDef,
        entity_id: i64,
        reacter: &Reacter,
    ) -> RepoResult<()> {
        let id = reacter.id()?;
        let mut state = self.state.lock().unwrap();
        let Some(row) = state
            .entities
            .get_mut(&def.table)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == entity_id && r.fk.is_none()))
        else {
            return Ok(());
        };
        row.fk = Some(id.into_inner());
        state.reacters.push((id, reacter.kind().to_string()));
        Ok(())
    }
}

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    repo: Arc<MemoryRepo>,
    ctx: ServiceContext,
}

fn fixture() -> Fixture {
    let repo = Arc::new(MemoryRepo::default());

    let mut map = MorphMap::new();
    map.register_reactable(
        MorphTypeDef::new("Article", "articles", "id", "love_reactant_id").with_alias("articles"),
    );
    map.register_reacterable(
        MorphTypeDef::new("User", "users", "id", "love_reacter_id").with_alias("users"),
    );

    let ctx = ServiceContext::builder()
        .reaction_type_repo(repo.clone())
        .reactant_repo(repo.clone())
        .reacter_repo(repo.clone())
        .reaction_repo(repo.clone())
        .counter_repo(repo.clone())
        .total_repo(repo.clone())
        .registration_repo(repo.clone())
        .morph_map(map)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(0)))
        .build();

    Fixture { repo, ctx }
}

async fn seed_like(ctx: &ServiceContext, mass: i32) -> ReactionType {
    ReactionTypeService::new(ctx)
        .add_type(&format!("Like{}", next_id().into_inner()), mass)
        .await
        .unwrap()
}

async fn seed_reactant(repo: &MemoryRepo) -> Reactant {
    let reactant = Reactant::registered(next_id(), "Article");
    ReactantRepository::create(repo, &reactant).await.unwrap();
    reactant
}

async fn seed_reacter(repo: &MemoryRepo) -> Reacter {
    let reacter = Reacter::registered(next_id(), "User");
    ReacterRepository::create(repo, &reacter).await.unwrap();
    reacter
}

// ============================================================================
// Mutation API
// ============================================================================

#[tokio::test]
async fn test_react_to_creates_reaction_and_aggregates() {
    let f = fixture();
    let like = seed_like(&f.ctx, 2).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    let reaction = service
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();
    assert_eq!(reaction.rate.value(), 1.0);

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        query
            .reactions_weight_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        2.0
    );
    assert_eq!(query.reactions_total_count(&reactant).await.unwrap(), 1);
    assert_eq!(query.reactions_total_weight(&reactant).await.unwrap(), 2.0);
}

#[tokio::test]
async fn test_react_twice_without_rate_fails() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    service
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();

    let err = service
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactionAlreadyExists)
    ));
}

#[tokio::test]
async fn test_react_again_with_new_rate_shifts_weight() {
    let f = fixture();
    let like = seed_like(&f.ctx, 2).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    service
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();

    let updated = service
        .react_to(&reacter, &reactant, &like, Some(Rate::new(1.5).unwrap()))
        .await
        .unwrap();
    assert_eq!(updated.rate.value(), 1.5);

    let query = QueryService::new(&f.ctx);
    // count unchanged, weight moved from 2.0 to 3.0
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        query
            .reactions_weight_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        3.0
    );
    assert_eq!(query.reactions_total_weight(&reactant).await.unwrap(), 3.0);
}

#[tokio::test]
async fn test_react_again_with_same_rate_fails() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    service
        .react_to(&reacter, &reactant, &like, Some(Rate::new(1.2).unwrap()))
        .await
        .unwrap();

    let err = service
        .react_to(&reacter, &reactant, &like, Some(Rate::new(1.2).unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::RateInvalid)
    ));
}

#[tokio::test]
async fn test_unreact_round_trip_restores_aggregates() {
    let f = fixture();
    let like = seed_like(&f.ctx, 3).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    service
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();
    service
        .unreact_to(&reacter, &reactant, &like)
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        query
            .reactions_weight_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        0.0
    );
    assert_eq!(query.reactions_total_count(&reactant).await.unwrap(), 0);
}

#[tokio::test]
async fn test_remove_derives_weight_from_stored_rate() {
    let f = fixture();
    let like = seed_like(&f.ctx, 2).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    service
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();

    // A copy of the reaction read before a rate change lands still carries
    // rate 1.0
    let stale = ReactionRepository::find(
        &*f.repo,
        reacter.id().unwrap(),
        reactant.id().unwrap(),
        like.id,
    )
    .await
    .unwrap()
    .unwrap();

    service
        .react_to(&reacter, &reactant, &like, Some(Rate::new(1.5).unwrap()))
        .await
        .unwrap();

    // The decrement must use the stored rate 1.5, not the stale 1.0
    ReactionRepository::remove(&*f.repo, &stale, like.mass)
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        query
            .reactions_weight_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        0.0
    );
    assert_eq!(query.reactions_total_weight(&reactant).await.unwrap(), 0.0);
}

#[tokio::test]
async fn test_change_rate_derives_delta_from_replaced_rate() {
    let f = fixture();
    let like = seed_like(&f.ctx, 2).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    ReactionService::new(&f.ctx)
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();

    let stale = ReactionRepository::find(
        &*f.repo,
        reacter.id().unwrap(),
        reactant.id().unwrap(),
        like.id,
    )
    .await
    .unwrap()
    .unwrap();

    // Two updates through the same stale copy: each shift must be computed
    // against the rate actually replaced, so the weight lands at 4.0 and
    // not at 2 * (2.0 - 1.0) on top of the first change
    ReactionRepository::change_rate(&*f.repo, &stale, Rate::new(1.5).unwrap(), like.mass)
        .await
        .unwrap();
    ReactionRepository::change_rate(&*f.repo, &stale, Rate::new(2.0).unwrap(), like.mass)
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        query
            .reactions_weight_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        4.0
    );
    assert_eq!(query.reactions_total_weight(&reactant).await.unwrap(), 4.0);
}

#[tokio::test]
async fn test_unreact_without_reaction_fails() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let err = ReactionService::new(&f.ctx)
        .unreact_to(&reacter, &reactant, &like)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactionNotExists)
    ));
}

#[tokio::test]
async fn test_null_objects_fail_mutations() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);

    let err = service
        .react_to(&Reacter::null("User"), &reactant, &like, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReacterInvalid)
    ));

    let err = service
        .react_to(&reacter, &Reactant::null("Article"), &like, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactantInvalid)
    ));
}

// ============================================================================
// Query facade
// ============================================================================

#[tokio::test]
async fn test_is_reacted_by_with_filters_and_null_objects() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    ReactionService::new(&f.ctx)
        .react_to(&reacter, &reactant, &like, Some(Rate::new(1.2).unwrap()))
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    assert!(query
        .is_reacted_by(&reacter, &reactant, None, None)
        .await
        .unwrap());
    assert!(query
        .is_reacted_by(&reacter, &reactant, Some(&like.name), None)
        .await
        .unwrap());
    assert!(query
        .is_reacted_by(
            &reacter,
            &reactant,
            Some(&like.name),
            Some(Rate::new(1.2).unwrap()),
        )
        .await
        .unwrap());
    assert!(!query
        .is_reacted_by(
            &reacter,
            &reactant,
            Some(&like.name),
            Some(Rate::new(2.0).unwrap()),
        )
        .await
        .unwrap());

    // Null objects answer false, never fail
    assert!(!query
        .is_reacted_by(&Reacter::null("User"), &reactant, None, None)
        .await
        .unwrap());
    assert!(query
        .is_not_reacted_by(&reacter, &Reactant::null("Article"), None, None)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_unknown_type_name_fails_queries() {
    let f = fixture();
    let reactant = seed_reactant(&f.repo).await;

    let err = QueryService::new(&f.ctx)
        .reactions_count_for_type(&reactant, "Ghost")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactionTypeInvalid(name)) if name == "Ghost"
    ));
}

#[tokio::test]
async fn test_null_reactant_reads_as_zero() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;

    let query = QueryService::new(&f.ctx);
    let null = Reactant::null("Article");
    assert_eq!(
        query
            .reactions_count_for_type(&null, &like.name)
            .await
            .unwrap(),
        0
    );
    assert_eq!(query.reactions_total_count(&null).await.unwrap(), 0);
    assert_eq!(query.reactions_total_weight(&null).await.unwrap(), 0.0);
}

#[tokio::test]
async fn test_scoped_reacted_and_unreacted_queries() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let touched = seed_reactant(&f.repo).await;
    let untouched = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    ReactionService::new(&f.ctx)
        .react_to(&reacter, &touched, &like, None)
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query.reacted_to_ids(&reacter, None).await.unwrap(),
        vec![touched.id().unwrap()]
    );
    assert_eq!(
        query
            .not_reacted_to_ids(&reacter, "articles", None)
            .await
            .unwrap(),
        vec![untouched.id().unwrap()]
    );

    let err = query
        .not_reacted_to_ids(&reacter, "Ghost", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactableInvalid(_))
    ));
}

#[tokio::test]
async fn test_rank_orders_by_weight_with_zero_fill() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let popular = seed_reactant(&f.repo).await;
    let silent = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    ReactionService::new(&f.ctx)
        .react_to(&reacter, &popular, &like, Some(Rate::new(5.0).unwrap()))
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    let ranked = query.rank("Article", 10).await.unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].reactant_id, popular.id().unwrap());
    assert_eq!(ranked[1].reactant_id, silent.id().unwrap());
    assert_eq!(ranked[1].count, 0);

    let by_type = query.rank_by_type("Article", &like.name, 1).await.unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].reactant_id, popular.id().unwrap());
}

// ============================================================================
// Reaction type management
// ============================================================================

#[tokio::test]
async fn test_seed_defaults_is_idempotent() {
    let f = fixture();
    let service = ReactionTypeService::new(&f.ctx);

    let first = service.seed_defaults().await.unwrap();
    assert_eq!(first.created.len(), 2);
    assert!(first.skipped.is_empty());

    let second = service.seed_defaults().await.unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.skipped, vec!["Like", "Dislike"]);

    let like = service.find_by_name("Like").await.unwrap();
    assert_eq!(like.mass, 1);
    let dislike = service.find_by_name("Dislike").await.unwrap();
    assert_eq!(dislike.mass, -1);
}

#[tokio::test]
async fn test_add_type_studly_cases_and_validates() {
    let f = fixture();
    let service = ReactionTypeService::new(&f.ctx);

    let added = service.add_type("nice_one", 2).await.unwrap();
    assert_eq!(added.name, "NiceOne");

    let err = service.add_type("nice_one", 2).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactionTypeAlreadyExists(name)) if name == "NiceOne"
    ));

    let err = service.add_type("1bad", 1).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactionTypeNameInvalid(_))
    ));
}

// ============================================================================
// Recount
// ============================================================================

#[tokio::test]
async fn test_recount_repairs_drifted_aggregates() {
    let f = fixture();
    let like = seed_like(&f.ctx, 2).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    ReactionService::new(&f.ctx)
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();

    // Simulate drift from a direct log edit
    f.repo.corrupt_counter(reactant.id().unwrap(), like.id);

    let report = RecountService::new(&f.ctx)
        .recount(None, None)
        .await
        .unwrap();
    assert_eq!(report.rebuilt, 1);
    assert_eq!(report.reactions_replayed, 1);

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        query
            .reactions_weight_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        2.0
    );
    assert_eq!(query.reactions_total_count(&reactant).await.unwrap(), 1);
}

#[tokio::test]
async fn test_recount_is_idempotent() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    ReactionService::new(&f.ctx)
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();

    let service = RecountService::new(&f.ctx);
    service.recount(None, None).await.unwrap();
    service.recount(None, None).await.unwrap();

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_recount_scoped_to_type_leaves_other_counters() {
    let f = fixture();
    let like = seed_like(&f.ctx, 1).await;
    let dislike = seed_like(&f.ctx, -1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter_a = seed_reacter(&f.repo).await;
    let reacter_b = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    service
        .react_to(&reacter_a, &reactant, &like, None)
        .await
        .unwrap();
    service
        .react_to(&reacter_b, &reactant, &dislike, None)
        .await
        .unwrap();

    f.repo.corrupt_counter(reactant.id().unwrap(), like.id);

    RecountService::new(&f.ctx)
        .recount(None, Some(&like.name))
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &dislike.name)
            .await
            .unwrap(),
        1
    );
    // The total still spans both types
    assert_eq!(query.reactions_total_count(&reactant).await.unwrap(), 2);
    assert_eq!(query.reactions_total_weight(&reactant).await.unwrap(), 0.0);
}

#[tokio::test]
async fn test_recount_recreates_deleted_counters() {
    let f = fixture();
    let like = seed_like(&f.ctx, 2).await;
    let dislike = seed_like(&f.ctx, -1).await;
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    let service = ReactionService::new(&f.ctx);
    service
        .react_to(&reacter, &reactant, &like, None)
        .await
        .unwrap();
    service
        .react_to(&reacter, &reactant, &dislike, None)
        .await
        .unwrap();

    // Aggregate rows lost entirely, as after a botched migration
    f.repo.drop_aggregates(reactant.id().unwrap());

    RecountService::new(&f.ctx)
        .recount(None, Some(&like.name))
        .await
        .unwrap();

    let query = QueryService::new(&f.ctx);
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        query
            .reactions_weight_for_type(&reactant, &like.name)
            .await
            .unwrap(),
        2.0
    );
    // The other type's counter stays absent until its own recount
    assert_eq!(
        query
            .reactions_count_for_type(&reactant, &dislike.name)
            .await
            .unwrap(),
        0
    );
    // The total spans only the counters that exist again
    assert_eq!(query.reactions_total_count(&reactant).await.unwrap(), 1);
    assert_eq!(query.reactions_total_weight(&reactant).await.unwrap(), 2.0);
}

#[tokio::test]
async fn test_recount_fails_on_dangling_type_reference() {
    let f = fixture();
    let reactant = seed_reactant(&f.repo).await;
    let reacter = seed_reacter(&f.repo).await;

    // A log entry pointing at a type that no longer exists
    let orphan = Reaction {
        id: next_id(),
        reactant_id: reactant.id().unwrap(),
        reacter_id: reacter.id().unwrap(),
        reaction_type_id: next_id(),
        rate: Rate::default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    ReactionRepository::record(&*f.repo, &orphan, 1.0)
        .await
        .unwrap();

    let err = RecountService::new(&f.ctx)
        .recount(None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Internal(_)));
}

#[tokio::test]
async fn test_recount_skips_untouched_reactants() {
    let f = fixture();
    seed_reactant(&f.repo).await;

    let report = RecountService::new(&f.ctx)
        .recount(None, None)
        .await
        .unwrap();
    assert_eq!(report.rebuilt, 0);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_recount_unknown_scope_fails() {
    let f = fixture();
    let service = RecountService::new(&f.ctx);

    let err = service.recount(Some("Ghost"), None).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactableInvalid(name)) if name == "Ghost"
    ));

    let err = service.recount(None, Some("Ghost")).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactionTypeInvalid(name)) if name == "Ghost"
    ));
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_reactants_backfills_and_is_idempotent() {
    let f = fixture();
    f.repo.seed_entities("articles", &[1, 2, 3]);

    let service = RegistryService::new(&f.ctx);
    let report = service.register_reactants("articles", None).await.unwrap();
    assert_eq!(report.kind, "Article");
    assert_eq!(report.registered, 3);

    assert!(f.repo.entity_fk("articles", 1).is_some());
    assert!(f.repo.entity_fk("articles", 3).is_some());

    // Second run finds nothing left to register
    let report = service.register_reactants("articles", None).await.unwrap();
    assert_eq!(report.registered, 0);
}

#[tokio::test]
async fn test_register_scoped_to_ids() {
    let f = fixture();
    f.repo.seed_entities("users", &[10, 20]);

    let service = RegistryService::new(&f.ctx);
    let report = service
        .register_reacters("users", Some(&[10]))
        .await
        .unwrap();
    assert_eq!(report.registered, 1);
    assert!(f.repo.entity_fk("users", 10).is_some());
    assert!(f.repo.entity_fk("users", 20).is_none());
}

#[tokio::test]
async fn test_setup_reactable_adds_column_once() {
    let f = fixture();
    let service = RegistryService::new(&f.ctx);

    let def = service.setup_reactable("articles").await.unwrap();
    assert_eq!(def.table, "articles");
    assert!(f.repo.has_fk_column("articles", "love_reactant_id"));

    let err = service.setup_reactable("articles").await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_setup_reacterable_and_unknown_kinds() {
    let f = fixture();
    let service = RegistryService::new(&f.ctx);

    let def = service.setup_reacterable("User").await.unwrap();
    assert_eq!(def.fk_column, "love_reacter_id");
    assert!(f.repo.has_fk_column("users", "love_reacter_id"));

    let err = service.setup_reactable("Ghost").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactableInvalid(_))
    ));

    let err = service.setup_reacterable("Ghost").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReacterableInvalid(_))
    ));
}

#[tokio::test]
async fn test_register_unknown_kind_fails() {
    let f = fixture();
    let err = RegistryService::new(&f.ctx)
        .register_reactants("Ghost", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::ReactableInvalid(_))
    ));
}

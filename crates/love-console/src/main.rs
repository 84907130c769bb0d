//! Operator console entry point
//!
//! Run with:
//! ```bash
//! cargo run -p love-console -- seed-types
//! cargo run -p love-console -- add-type --name nice_one --mass 2
//! cargo run -p love-console -- recount --model Article --type Like
//! cargo run -p love-console -- setup-reactable --model Article
//! cargo run -p love-console -- register-reactants --model Article --ids 1 2 3
//! ```
//!
//! Configuration comes from environment variables (`DATABASE_URL`,
//! `MORPH_MAP_PATH`, `RECOUNT_CONCURRENCY`, `WORKER_ID`), with `.env`
//! support. Failures print a message naming the offending value and exit
//! non-zero, with the exit code classifying the failure.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;

use love_common::{try_init_tracing, AppConfig, AppError};
use love_core::registry::MorphMap;
use love_core::SnowflakeGenerator;
use love_db::{
    create_pool, run_migrations, DatabaseConfig, PgReactantRepository, PgReacterRepository,
    PgReactionCounterRepository, PgReactionRepository, PgReactionTotalRepository,
    PgReactionTypeRepository, PgRegistrationRepository,
};
use love_service::dto::RankedReactantResponse;
use love_service::{
    load_morph_map, QueryService, ReactionTypeService, RecountService, RegistryService,
    ServiceContext,
};

#[derive(Parser)]
#[command(name = "love")]
#[command(about = "Reaction aggregation engine - operator console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Install the default Like/Dislike reaction types
    SeedTypes,

    /// Add a reaction type
    AddType {
        /// Type name (studly-cased before validation)
        #[arg(long)]
        name: String,

        /// Signed weight coefficient
        #[arg(long)]
        mass: i32,
    },

    /// List registered reaction types
    ListTypes,

    /// Rebuild counters and totals from the reaction log
    Recount {
        /// Restrict to one reactable kind (or alias)
        #[arg(long)]
        model: Option<String>,

        /// Restrict to one reaction type name
        #[arg(long = "type")]
        type_name: Option<String>,
    },

    /// Add the reactant FK column to a kind's entity table
    SetupReactable {
        /// Reactable kind (or alias) from the morph map
        #[arg(long)]
        model: String,
    },

    /// Add the reacter FK column to a kind's actor entity table
    SetupReacterable {
        /// Reacterable kind (or alias) from the morph map
        #[arg(long)]
        model: String,
    },

    /// Create reactant identities for unregistered entities of a kind
    RegisterReactants {
        /// Reactable kind (or alias) from the morph map
        #[arg(long)]
        model: String,

        /// Restrict to these entity IDs
        #[arg(long, num_args = 1..)]
        ids: Option<Vec<i64>>,
    },

    /// Create reacter identities for unregistered actor entities of a kind
    RegisterReacters {
        /// Reacterable kind (or alias) from the morph map
        #[arg(long)]
        model: String,

        /// Restrict to these entity IDs
        #[arg(long, num_args = 1..)]
        ids: Option<Vec<i64>>,
    },

    /// Rank reactants of a kind by total weight
    Rank {
        /// Reactable kind (or alias) from the morph map
        #[arg(long)]
        model: String,

        /// Restrict the ranking to one reaction type's counters
        #[arg(long = "type")]
        type_name: Option<String>,

        /// Number of rows to print
        #[arg(long, default_value = "10")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, code = e.error_code(), "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..DatabaseConfig::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if let Commands::Migrate = cli.command {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        println!("Migrations applied");
        return Ok(());
    }

    let morph_map = match &config.registry.morph_map_path {
        Some(path) => load_morph_map(path).map_err(AppError::from)?,
        None => MorphMap::new(),
    };

    let ids = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));
    let ctx = ServiceContext::builder()
        .reaction_type_repo(Arc::new(PgReactionTypeRepository::new(pool.clone())))
        .reactant_repo(Arc::new(PgReactantRepository::new(pool.clone())))
        .reacter_repo(Arc::new(PgReacterRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone(), ids.clone())))
        .counter_repo(Arc::new(PgReactionCounterRepository::new(
            pool.clone(),
            ids.clone(),
        )))
        .total_repo(Arc::new(PgReactionTotalRepository::new(
            pool.clone(),
            ids.clone(),
        )))
        .registration_repo(Arc::new(PgRegistrationRepository::new(pool)))
        .morph_map(morph_map)
        .snowflake_generator(ids)
        .recount(config.recount.clone())
        .build();

    match cli.command {
        Commands::Migrate => unreachable!("handled above"),
        Commands::SeedTypes => {
            let report = ReactionTypeService::new(&ctx).seed_defaults().await?;
            for created in &report.created {
                println!("Created {} (mass {})", created.name, created.mass);
            }
            for skipped in &report.skipped {
                println!("Skipped {skipped} (already exists)");
            }
        }
        Commands::AddType { name, mass } => {
            let reaction_type = ReactionTypeService::new(&ctx).add_type(&name, mass).await?;
            println!(
                "Created {} (mass {}, id {})",
                reaction_type.name, reaction_type.mass, reaction_type.id
            );
        }
        Commands::ListTypes => {
            for reaction_type in ReactionTypeService::new(&ctx).all().await? {
                println!(
                    "{}\t{}\tmass {}",
                    reaction_type.id, reaction_type.name, reaction_type.mass
                );
            }
        }
        Commands::Recount { model, type_name } => {
            let report = RecountService::new(&ctx)
                .recount(model.as_deref(), type_name.as_deref())
                .await?;
            println!(
                "Rebuilt {} reactant(s), replayed {} reaction(s), skipped {}",
                report.rebuilt, report.reactions_replayed, report.skipped
            );
        }
        Commands::SetupReactable { model } => {
            let def = RegistryService::new(&ctx).setup_reactable(&model).await?;
            println!("Added column {} to table {}", def.fk_column, def.table);
        }
        Commands::SetupReacterable { model } => {
            let def = RegistryService::new(&ctx).setup_reacterable(&model).await?;
            println!("Added column {} to table {}", def.fk_column, def.table);
        }
        Commands::RegisterReactants { model, ids } => {
            let report = RegistryService::new(&ctx)
                .register_reactants(&model, ids.as_deref())
                .await?;
            println!(
                "Registered {} {} reactant(s), skipped {}",
                report.registered, report.kind, report.skipped
            );
        }
        Commands::RegisterReacters { model, ids } => {
            let report = RegistryService::new(&ctx)
                .register_reacters(&model, ids.as_deref())
                .await?;
            println!(
                "Registered {} {} reacter(s), skipped {}",
                report.registered, report.kind, report.skipped
            );
        }
        Commands::Rank {
            model,
            type_name,
            limit,
        } => {
            let query = QueryService::new(&ctx);
            let rows = match type_name {
                Some(name) => query.rank_by_type(&model, &name, limit).await?,
                None => query.rank(&model, limit).await?,
            };
            for row in rows.into_iter().map(RankedReactantResponse::from) {
                println!("{}\tcount {}\tweight {}", row.reactant_id, row.count, row.weight);
            }
        }
    }

    Ok(())
}

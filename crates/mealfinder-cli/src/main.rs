use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use mealfinder_core::{
    Config, ExpirySpec, IngredientRepository, JsonFileStore, MealDbSource, RecipeDetail,
    RecipeSearchEngine, RecipeSummary, TrackedIngredient,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mealfinder")]
#[command(version, about = "Track what's in the pantry and find recipes that use it", long_about = None)]
struct Cli {
    /// Config file to use instead of the default one
    #[arg(long, global = true, env = "MEALFINDER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the pantry file
    #[arg(long, global = true, env = "MEALFINDER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add an ingredient to the pantry
    #[command(group(ArgGroup::new("expiry").required(true).args(["on", "in_days"])))]
    Add {
        /// Ingredient name
        name: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        on: Option<String>,
        /// Expires this many days from now
        #[arg(long, allow_hyphen_values = true)]
        in_days: Option<String>,
    },
    /// Remove an ingredient by id
    Remove {
        id: String,
    },
    /// List the pantry, most urgent first
    List,
    /// Find recipes that use one ingredient
    Search {
        ingredient: String,
    },
    /// Show a recipe in full
    Show {
        /// Recipe id
        id: String,
    },
    /// Find recipes that use all of the given ingredients
    Match {
        /// Ingredient names
        names: Vec<String>,
        /// Include every saved pantry ingredient
        #[arg(long)]
        saved: bool,
    },
}

/// Pantry row as printed by `list --json`
#[derive(Serialize)]
struct PantryRow<'a> {
    #[serde(flatten)]
    item: &'a TrackedIngredient,
    color: &'static str,
    image_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealfinder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;
    if let Some(dir) = cli.data_dir.clone() {
        config.storage.data_dir = Some(dir);
    }

    match cli.command {
        Some(Commands::Add { name, on, in_days }) => {
            let spec = match (on, in_days) {
                (Some(date), _) => ExpirySpec::parse_date(&date)?,
                (None, Some(days)) => ExpirySpec::parse_days(&days)?,
                (None, None) => anyhow::bail!("Give either --on or --in-days"),
            };
            let record = repository(&config)?.add(&name, spec)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("Added {} ({})", record.name, record.id);
            }
        }
        Some(Commands::Remove { id }) => {
            let removed = repository(&config)?.remove(&id)?;
            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "removed": removed }));
            } else if removed {
                println!("Removed {}", id);
            } else {
                println!("Nothing with id {}", id);
            }
        }
        Some(Commands::List) => {
            let pantry = repository(&config)?.list(&chrono::Local::now());
            if cli.json {
                let rows: Vec<_> = pantry
                    .iter()
                    .map(|item| PantryRow {
                        item,
                        color: item.tier.color_hex(),
                        image_url: mealfinder_api::ingredient_image_url(&item.record.name),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_pantry(&pantry);
            }
        }
        Some(Commands::Search { ingredient }) => {
            tracing::info!("Searching recipes with {}", ingredient);
            let results = engine(&config)?.search_by_ingredient(&ingredient).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_summaries(&results);
            }
        }
        Some(Commands::Show { id }) => match engine(&config)?.lookup_detail(&id).await? {
            Some(detail) if cli.json => println!("{}", serde_json::to_string_pretty(&detail)?),
            Some(detail) => print_detail(&detail),
            None if cli.json => println!("null"),
            None => println!("No recipe with id {}", id),
        },
        Some(Commands::Match { mut names, saved }) => {
            if saved {
                names.extend(repository(&config)?.names());
            }
            if names.iter().all(|n| n.trim().is_empty()) {
                anyhow::bail!("Name at least one ingredient, or pass --saved");
            }

            let results = engine(&config)?
                .search_by_multiple_ingredients(&names)
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("No recipes found.");
            } else {
                for detail in &results {
                    print_detail(detail);
                    println!();
                }
            }
        }
        None => {
            println!("No command specified. Try --help");
        }
    }

    Ok(())
}

fn repository(config: &Config) -> anyhow::Result<IngredientRepository<JsonFileStore>> {
    let store = config.ingredient_store()?;
    tracing::debug!("Using pantry at {}", store.path().display());
    Ok(IngredientRepository::new(store))
}

fn engine(config: &Config) -> anyhow::Result<RecipeSearchEngine<MealDbSource>> {
    let source = MealDbSource::with_base_url(&config.api.base_url)?;
    Ok(RecipeSearchEngine::new(source).with_lookup_concurrency(config.search.lookup_concurrency))
}

fn print_pantry(pantry: &[TrackedIngredient]) {
    if pantry.is_empty() {
        println!("No ingredients yet. Add some with `mealfinder add`.");
        return;
    }

    for item in pantry {
        let when = match item.days_left {
            d if d < 0 => format!("expired {} days ago", -d),
            0 => "expires today".to_string(),
            1 => "1 day left".to_string(),
            d => format!("{} days left", d),
        };
        println!(
            "[{:<8}] {:<24} {} ({})  {}",
            item.tier.label(),
            item.record.name,
            when,
            item.record.expiry.with_timezone(&chrono::Local).format("%Y-%m-%d"),
            item.record.id
        );
    }
}

fn print_summaries(results: &[RecipeSummary]) {
    if results.is_empty() {
        println!("No recipes found.");
        return;
    }

    for recipe in results {
        println!("{:>6}  {}", recipe.id, recipe.name);
    }
}

fn print_detail(detail: &RecipeDetail) {
    println!("{}  [{}]", detail.name, detail.id);

    let meta: Vec<&str> = [detail.category.as_deref(), detail.area.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        println!("{}", meta.join(" / "));
    }
    if !detail.tags.is_empty() {
        println!("Tags: {}", detail.tags.join(", "));
    }

    println!("\nIngredients:");
    for line in &detail.ingredients {
        if line.measure.is_empty() {
            println!("  - {}", line.ingredient);
        } else {
            println!("  - {} - {}", line.ingredient, line.measure);
        }
    }

    if !detail.instructions.is_empty() {
        println!("\nInstructions:\n{}", detail.instructions.trim());
    }
    if let Some(video) = &detail.youtube {
        println!("\nVideo: {}", video);
    }
    if let Some(source) = &detail.source {
        println!("Source: {}", source);
    }
}

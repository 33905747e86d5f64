use advocate_directory::api::ApiServer;
use advocate_directory::cli::{Cli, Commands, ConfigAction, SearchOpts};
use advocate_directory::client::{AdvocateClient, AdvocateSearch, SearchParams};
use advocate_directory::config::{validate_config_object, Config};
use advocate_directory::db::{seed, Advocate, SqliteAdvocateStore};
use advocate_directory::format::format_phone_number;
use advocate_directory::logging;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(opts) => {
            let config = Config::load(opts.config.as_deref())?;
            logging::init(&config.logging);
            validate_config_object(&config)?;
            info!("Starting advocate directory server");
            let server = ApiServer::start(config, opts).await?;
            server.run_until_shutdown().await?;
        }
        Commands::Seed(opts) => {
            let mut config = Config::load(opts.config.as_deref())?;
            logging::init(&config.logging);
            if let Some(ref database) = opts.database {
                config.database.apply_url(database);
            }
            let store = SqliteAdvocateStore::from_config(&config.database)?
                .ok_or_else(|| anyhow::anyhow!("No database configured; pass --database or set DATABASE_URL"))?;
            let inserted = seed::seed(&store, opts.force).await?;
            println!("Inserted {inserted} advocates into {}", store.path().display());
        }
        Commands::Search(opts) => {
            logging::init(&Default::default());
            run_search(opts).await?;
        }
        Commands::Config(opts) => {
            if let ConfigAction::Init = opts.action {
                Config::write_default(opts.config.as_deref().unwrap_or("advocates.json"))?;
                println!("Configuration file created");
                return Ok(());
            }

            let config = Config::load(opts.config.as_deref())?;
            logging::init(&config.logging);
            match opts.action {
                ConfigAction::Show => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                ConfigAction::Validate => {
                    validate_config_object(&config)?;
                    info!("Configuration is valid");
                }
                ConfigAction::Init => {}
            }
        }
        Commands::Version => {
            println!("advocate-directory {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

async fn run_search(opts: SearchOpts) -> anyhow::Result<()> {
    let search = AdvocateSearch::new(AdvocateClient::new(&opts.url)?);
    let params = SearchParams {
        q: opts.q.filter(|q| !q.trim().is_empty()),
        order_by: opts.order_by,
        sort: opts.sort,
    };

    let advocates = search.search(&params).await?;
    if advocates.is_empty() {
        println!("No advocates found");
        return Ok(());
    }

    for advocate in &advocates {
        print_row(advocate);
    }
    println!("{} advocate(s)", advocates.len());
    Ok(())
}

fn print_row(advocate: &Advocate) {
    println!(
        "{:<24} {:<16} {:<6} {:>3}y  {:<18} {}",
        advocate.full_name(),
        advocate.city,
        advocate.degree,
        advocate.years_of_experience,
        format_phone_number(advocate.phone_number),
        advocate.specialties.join(", ")
    );
}

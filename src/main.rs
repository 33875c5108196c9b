use clap::Parser;
use dialoguer::Password;
use dotenv::dotenv;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use good_first_issues_lib::{
    limit, render, server, Args, Command, Config, CredentialStore, IssueSearcher,
    RateLimitReporter, Scope,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize the tracing logger on stderr so stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    debug!("Using config {:?}", config);

    match args.command {
        Command::Config => {
            let token = Password::new()
                .with_prompt("Enter your GitHub Access Token (hidden)")
                .allow_empty_password(true)
                .interact()?;
            CredentialStore::new(&config).store(&token)?;
        }
        Command::RateLimit { rest } => {
            RateLimitReporter::new(&config)?.report(!rest).await?;
        }
        Command::Search {
            name,
            user,
            limit,
            all,
            web,
        } => {
            let scope = Scope::from_name(name.as_deref(), user);
            let ceiling = limit::resolve(limit, all);
            info!("Searching {:?} with limit {:?}", scope, ceiling);

            let issues = IssueSearcher::new(&config)?.search(&scope, ceiling).await?;
            if issues.is_empty() {
                println!("No good first issues found");
            } else if web {
                server::serve(&render::issues_table(&issues), &config).await?;
            } else {
                print!("{}", render::text_table(&issues));
            }
        }
    }

    Ok(())
}

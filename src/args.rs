use clap::{Parser, Subcommand};

/// Find issues labelled "good first issue" on GitHub, check your API quota and
/// preview results in the browser.
#[derive(Parser)]
#[clap(
    author,
    version,
    about,
    long_about = "Find open GitHub issues labelled \"good first issue\" in a repository, organization or user account, and optionally preview them as an HTML table served on localhost."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Prompt for a GitHub personal access token and store it.
    Config,

    /// Show how many GitHub API requests remain.
    RateLimit {
        /// Query the REST API quota instead of the GraphQL one.
        #[clap(long)]
        rest: bool,
    },

    /// Search for good first issues.
    Search {
        /// Repository (`owner/name`), organization or user to search.
        /// Searches all of GitHub when omitted.
        name: Option<String>,

        /// Treat NAME as a user account rather than an organization.
        #[clap(short, long)]
        user: bool,

        /// Maximum number of issues to list.
        #[clap(short, long, value_name = "NUM")]
        limit: Option<u32>,

        /// List every issue the search returns.
        #[clap(short, long)]
        all: bool,

        /// Serve the results as an HTML table on localhost.
        #[clap(short, long)]
        web: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_rate_limit_flag() {
        let args = Args::parse_from(["good-first-issues", "rate-limit", "--rest"]);
        assert!(matches!(args.command, Command::RateLimit { rest: true }));

        let args = Args::parse_from(["good-first-issues", "rate-limit"]);
        assert!(matches!(args.command, Command::RateLimit { rest: false }));
    }

    #[test]
    fn parses_search_options() {
        let args = Args::parse_from([
            "good-first-issues",
            "search",
            "rust-lang/rust",
            "--limit",
            "5",
            "--web",
        ]);
        match args.command {
            Command::Search {
                name,
                user,
                limit,
                all,
                web,
            } => {
                assert_eq!(name.as_deref(), Some("rust-lang/rust"));
                assert!(!user);
                assert_eq!(limit, Some(5));
                assert!(!all);
                assert!(web);
            }
            _ => panic!("expected search command"),
        }
    }
}

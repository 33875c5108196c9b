use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::github;
use crate::progress;

const PER_PAGE: u32 = 100;
const LABEL_QUERY: &str = r#"label:"good first issue" state:open is:issue"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub repository: String,
    pub title: String,
    pub url: String,
}

/// Where to look for issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Everywhere,
    Repository(String),
    Organization(String),
    User(String),
}

impl Scope {
    /// `owner/name` selects a repository; anything else is an organization,
    /// or a user account when `user` is set.
    pub fn from_name(name: Option<&str>, user: bool) -> Self {
        match name {
            None => Scope::Everywhere,
            Some(name) if name.contains('/') => Scope::Repository(name.to_string()),
            Some(name) if user => Scope::User(name.to_string()),
            Some(name) => Scope::Organization(name.to_string()),
        }
    }

    pub fn query(&self) -> String {
        match self {
            Scope::Everywhere => LABEL_QUERY.to_string(),
            Scope::Repository(repo) => format!("{} repo:{}", LABEL_QUERY, repo),
            Scope::Organization(org) => format!("{} org:{}", LABEL_QUERY, org),
            Scope::User(user) => format!("{} user:{}", LABEL_QUERY, user),
        }
    }
}

pub struct IssueSearcher {
    client: Client,
    credentials: CredentialStore,
    api_url: String,
}

impl IssueSearcher {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(github::client()?, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        IssueSearcher {
            client,
            credentials: CredentialStore::new(config),
            api_url: config.api_url.clone(),
        }
    }

    /// Collect up to `limit` open good-first-issues in `scope`; `None` means
    /// everything the search API will return.
    pub async fn search(&self, scope: &Scope, limit: Option<u32>) -> Result<Vec<Issue>> {
        let token = self.credentials.load()?;
        let query = scope.query();
        let per_page = limit.map_or(PER_PAGE, |l| l.min(PER_PAGE));

        let pb = progress::spinner("Searching good first issues...");
        let mut issues = Vec::new();
        let mut page: u32 = 1;

        loop {
            pb.set_message(format!("Searching good first issues - page {}", page));

            let batch = match self
                .search_page(&query, page, per_page, token.as_deref())
                .await
            {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(e) => {
                    progress::fail(&pb, "search failed");
                    return Err(e);
                }
            };

            let last_page = (batch.len() as u32) < per_page;
            issues.extend(batch);

            if let Some(limit) = limit {
                if issues.len() >= limit as usize {
                    issues.truncate(limit as usize);
                    debug!("Limit of {} issues reached", limit);
                    break;
                }
            }
            if last_page {
                break;
            }
            page += 1;
        }

        progress::succeed(&pb, &format!("found {} issues", issues.len()));
        info!("Found {} issues for '{}'", issues.len(), query);
        Ok(issues)
    }

    /// Fetch one page of results. `None` signals the end of the result set.
    async fn search_page(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
        token: Option<&str>,
    ) -> Result<Option<Vec<Issue>>> {
        let url = format!("{}/search/issues", self.api_url);
        debug!("Requesting URL: {} page {}", url, page);

        let request = self.client.get(&url).query(&[
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ]);
        let response = github::authorize(request, token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        // GitHub stops serving search results after the first 1000 hits
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            warn!("Reached search limit at page {}", page);
            return Ok(None);
        }

        let json: Value = github::check_status(response)?.json().await?;
        let items = match json["items"].as_array() {
            Some(items) if !items.is_empty() => items,
            Some(_) => return Ok(None),
            None => {
                warn!("No 'items' array found in search response");
                return Ok(None);
            }
        };

        Ok(Some(items.iter().map(issue_from_item).collect()))
    }
}

fn issue_from_item(item: &Value) -> Issue {
    let title = item.get("title").and_then(|v| v.as_str()).unwrap_or("");
    let url = item.get("html_url").and_then(|v| v.as_str()).unwrap_or("");
    let repository = item
        .get("repository_url")
        .and_then(|v| v.as_str())
        .and_then(|u| u.split("/repos/").nth(1))
        .unwrap_or("");

    Issue {
        repository: repository.to_string(),
        title: title.to_string(),
        url: url.to_string(),
    }
}

use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{GfiError, Result};

/// GraphQL query returning the remaining GraphQL quota.
pub const RATE_LIMIT_QUERY: &str = r#"
query {
  rateLimit {
    limit
    remaining
    resetAt
  }
}
"#;

/// HTTP client with the User-Agent GitHub requires on every request.
pub fn client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()?;
    Ok(client)
}

/// Attach `Authorization: token <value>` when a non-empty token is known.
pub fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) if !token.is_empty() => {
            request.header("Authorization", format!("token {}", token))
        }
        _ => request,
    }
}

/// Turn a non-success response into [`GfiError::Status`].
pub fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(GfiError::Status {
            status,
            url: response.url().to_string(),
        })
    }
}

/// POST `query` with `variables` to the GraphQL endpoint and return the raw
/// JSON payload.
pub async fn graphql(
    client: &Client,
    url: &str,
    token: Option<&str>,
    query: &str,
    variables: Value,
) -> Result<Value> {
    debug!("POST {}", url);
    let body = json!({ "query": query, "variables": variables });
    let response = authorize(client.post(url), token)
        .json(&body)
        .send()
        .await?;

    let payload: Value = check_status(response)?.json().await?;
    Ok(payload)
}

/// Look up a JSON pointer (`/a/b/c`) and read it as an unsigned integer.
pub fn required_u64(payload: &Value, pointer: &str) -> Result<u64> {
    payload
        .pointer(pointer)
        .and_then(Value::as_u64)
        .ok_or_else(|| {
            let path = pointer.trim_start_matches('/').replace('/', ".");
            GfiError::MissingField(path)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_sets_token_header() {
        let client = Client::new();
        let request = authorize(
            client.get("https://api.github.com/rate_limit"),
            Some("abc123"),
        );

        let built = request.build().unwrap();
        assert_eq!(built.headers().get("Authorization").unwrap(), "token abc123");
    }

    #[test]
    fn authorize_skips_missing_or_empty_token() {
        let client = Client::new();
        for token in [None, Some("")] {
            let built = authorize(client.get("https://api.github.com/rate_limit"), token)
                .build()
                .unwrap();
            assert!(built.headers().get("Authorization").is_none());
        }
    }

    #[test]
    fn required_u64_reports_dotted_path() {
        let payload = json!({ "data": { "rateLimit": {} } });
        let err = required_u64(&payload, "/data/rateLimit/remaining").unwrap_err();
        assert!(matches!(err, GfiError::MissingField(ref p) if p == "data.rateLimit.remaining"));
    }

    #[tokio::test]
    async fn graphql_posts_query_and_variables() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("authorization", "token abc123")
            .match_body(mockito::Matcher::PartialJson(json!({ "variables": {} })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"rateLimit":{"remaining":4999}}}"#)
            .create_async()
            .await;

        let payload = graphql(
            &Client::new(),
            &format!("{}/graphql", server.url()),
            Some("abc123"),
            RATE_LIMIT_QUERY,
            json!({}),
        )
        .await
        .unwrap();

        assert_eq!(required_u64(&payload, "/data/rateLimit/remaining").unwrap(), 4999);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn graphql_non_success_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(401)
            .create_async()
            .await;

        let result = graphql(
            &Client::new(),
            &format!("{}/graphql", server.url()),
            None,
            RATE_LIMIT_QUERY,
            json!({}),
        )
        .await;

        assert!(matches!(result, Err(GfiError::Status { status, .. }) if status == 401));
    }
}

use crate::config::{MapConfig, QueryEncoding};
use crate::traits::ArticleProvider;
use crate::{ArticleResult, LookupError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Article lookup through the MediaWiki `opensearch` action.
pub struct WikipediaProvider {
    client: Client,
    endpoint: String,
    article_base_url: String,
    encoding: QueryEncoding,
    timeout_ms: u64,
}

impl WikipediaProvider {
    pub fn from_config(config: &MapConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.lookup_timeout())
            .build()
            .map_err(|error| LookupError::Transport(error.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.article_endpoint.clone(),
            article_base_url: config.article_base_url.clone(),
            encoding: config.article_query_encoding,
            timeout_ms: config.lookup_timeout_ms,
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> LookupError {
        if error.is_timeout() {
            LookupError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            LookupError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl ArticleProvider for WikipediaProvider {
    async fn search_articles(&self, query: &str) -> Result<Vec<ArticleResult>, LookupError> {
        let search = sanitize_article_query(query, self.encoding);
        let url = opensearch_url(&self.endpoint, &search)
            .map_err(|error| LookupError::Transport(error.to_string()))?;
        debug!(query = %query, search = %search, "article lookup request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| self.transport_error(error))?;

        if !response.status().is_success() {
            return Err(LookupError::Transport(format!("HTTP {}", response.status())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|error| self.transport_error(error))?;
        parse_opensearch_response(&search, &self.article_base_url, &body)
    }
}

/// Removes characters that would split the query string when the legacy
/// encoding is selected.
pub fn sanitize_article_query(query: &str, encoding: QueryEncoding) -> String {
    match encoding {
        QueryEncoding::StripSeparators => query.replace('&', ""),
        QueryEncoding::PercentEncode => query.to_string(),
    }
}

pub fn opensearch_url(endpoint: &str, search: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("action", "opensearch")
        .append_pair("search", search);
    Ok(url)
}

/// Parses `[query, titles[], descriptions[], ...]`.
pub fn parse_opensearch_response(
    search: &str,
    article_base_url: &str,
    body: &Value,
) -> Result<Vec<ArticleResult>, LookupError> {
    let titles = body
        .pointer("/1")
        .and_then(Value::as_array)
        .ok_or_else(|| LookupError::Transport("malformed opensearch response".to_string()))?;

    if titles.is_empty() {
        return Err(LookupError::NoMatch {
            query: search.to_string(),
        });
    }

    let descriptions = body
        .pointer("/2")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(titles
        .iter()
        .enumerate()
        .filter_map(|(index, title)| {
            let title = title.as_str()?;
            let snippet = descriptions
                .get(index)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(ArticleResult {
                title: title.to_string(),
                snippet,
                url: format!("{}{}", article_base_url, title.replace(' ', "_")),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WIKIPEDIA_API_ENDPOINT, WIKIPEDIA_ARTICLE_BASE};
    use serde_json::json;

    #[test]
    fn legacy_encoding_strips_ampersand() {
        assert_eq!(
            sanitize_article_query("AT&T Park", QueryEncoding::StripSeparators),
            "ATT Park"
        );
        assert_eq!(
            sanitize_article_query("A&B&C", QueryEncoding::StripSeparators),
            "ABC"
        );
    }

    #[test]
    fn stripped_query_reaches_the_search_parameter() {
        let search = sanitize_article_query("AT&T Park", QueryEncoding::StripSeparators);
        let url = opensearch_url(WIKIPEDIA_API_ENDPOINT, &search).expect("url should build");
        let value = url
            .query_pairs()
            .find(|(key, _)| key == "search")
            .map(|(_, value)| value.into_owned());
        assert_eq!(value.as_deref(), Some("ATT Park"));
        assert!(url.as_str().contains("action=opensearch"));
        assert!(url.as_str().contains("format=json"));
    }

    #[test]
    fn percent_encoding_keeps_ampersand_inside_the_value() {
        let search = sanitize_article_query("AT&T Park", QueryEncoding::PercentEncode);
        let url = opensearch_url(WIKIPEDIA_API_ENDPOINT, &search).expect("url should build");
        assert!(url.as_str().contains("search=AT%26T+Park"));
        let value = url
            .query_pairs()
            .find(|(key, _)| key == "search")
            .map(|(_, value)| value.into_owned());
        assert_eq!(value.as_deref(), Some("AT&T Park"));
    }

    #[test]
    fn opensearch_results_keep_rank_and_build_links() {
        let body = json!([
            "Oracle Park",
            ["Oracle Park", "Oracle Park (disambiguation)"],
            ["Baseball park in San Francisco", ""],
            []
        ]);
        let articles = parse_opensearch_response("Oracle Park", WIKIPEDIA_ARTICLE_BASE, &body)
            .expect("response should parse");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Oracle Park");
        assert_eq!(articles[0].snippet, "Baseball park in San Francisco");
        assert_eq!(articles[0].url, "https://en.wikipedia.org/wiki/Oracle_Park");
        assert_eq!(articles[1].snippet, "");
    }

    #[test]
    fn empty_titles_mean_no_match() {
        let body = json!(["zzqx", [], [], []]);
        assert_eq!(
            parse_opensearch_response("zzqx", WIKIPEDIA_ARTICLE_BASE, &body),
            Err(LookupError::NoMatch {
                query: "zzqx".to_string()
            })
        );
    }

    #[test]
    fn malformed_body_is_a_transport_error() {
        let body = json!({"error": "bad"});
        assert!(matches!(
            parse_opensearch_response("x", WIKIPEDIA_ARTICLE_BASE, &body),
            Err(LookupError::Transport(_))
        ));
    }
}

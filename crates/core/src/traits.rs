use crate::{ArticleResult, Coordinates, GeocodeError, LookupError, RawPlace, SearchError};
use async_trait::async_trait;

#[async_trait]
pub trait PlaceProvider {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;

    /// Places near `center` in provider relevance order.
    async fn search(
        &self,
        center: Coordinates,
        radius_meters: u32,
        query: &str,
    ) -> Result<Vec<RawPlace>, SearchError>;
}

#[async_trait]
pub trait ArticleProvider {
    /// Every ranked match for `query`; an empty match set is `NoMatch`.
    async fn search_articles(&self, query: &str) -> Result<Vec<ArticleResult>, LookupError>;

    async fn lookup(&self, query: &str) -> Result<ArticleResult, LookupError> {
        self.search_articles(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NoMatch {
                query: query.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RankedArticles {
        titles: Vec<&'static str>,
    }

    #[async_trait]
    impl ArticleProvider for RankedArticles {
        async fn search_articles(&self, _query: &str) -> Result<Vec<ArticleResult>, LookupError> {
            Ok(self
                .titles
                .iter()
                .map(|title| ArticleResult {
                    title: title.to_string(),
                    snippet: String::new(),
                    url: format!("https://en.wikipedia.org/wiki/{title}"),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn lookup_returns_the_top_ranked_article() {
        let provider = RankedArticles {
            titles: vec!["Oracle Park", "Oracle Arena"],
        };
        let article = provider.lookup("ATT Park").await.expect("lookup should match");
        assert_eq!(article.title, "Oracle Park");
    }

    #[tokio::test]
    async fn lookup_turns_an_empty_ranking_into_no_match() {
        let provider = RankedArticles { titles: Vec::new() };
        assert_eq!(
            provider.lookup("zzqx").await,
            Err(LookupError::NoMatch {
                query: "zzqx".to_string()
            })
        );
    }
}

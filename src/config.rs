use eyre::{
    eyre,
    Context as _,
    Result,
};
use std::time::Duration;
use url::Url;

/// Runtime configuration for one check invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub search_url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub minutes: i64,
    pub request_time_field: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(
        uri: &str,
        index: &str,
        username: Option<String>,
        password: Option<String>,
        minutes: i64,
        request_time_field: String,
        timeout: Duration,
    ) -> Result<Self> {
        let search_url = Self::build_search_url(uri, index)?;

        Ok(Self {
            search_url,
            username,
            password,
            minutes,
            request_time_field,
            timeout,
        })
    }

    /// Builds the search endpoint for an index prefix:
    /// `https://host:9200` + `nginx-access` becomes
    /// `https://host:9200/nginx-access*/_search`.
    fn build_search_url(uri: &str, index: &str) -> Result<Url> {
        let mut url = Url::parse(uri).wrap_err_with(|| format!("invalid Elasticsearch URI '{uri}'"))?;

        url.path_segments_mut()
            .map_err(|()| eyre!("Elasticsearch URI '{uri}' cannot be used as a base"))?
            .pop_if_empty()
            .push(&format!("{index}*"))
            .push("_search");

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(uri: &str, index: &str) -> Result<Config> {
        Config::new(
            uri,
            index,
            None,
            None,
            5,
            "request_time".to_string(),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn builds_the_wildcard_search_url() {
        let config = config("https://es.example.com:9200", "nginx-access").unwrap();
        assert_eq!(
            config.search_url.as_str(),
            "https://es.example.com:9200/nginx-access*/_search"
        );
    }

    #[test]
    fn keeps_an_existing_base_path() {
        let config = config("https://example.com/elasticsearch", "nginx").unwrap();
        assert_eq!(
            config.search_url.as_str(),
            "https://example.com/elasticsearch/nginx*/_search"
        );
    }

    #[test]
    fn trailing_slash_does_not_double_up() {
        let config = config("https://es.example.com:9200/", "nginx").unwrap();
        assert_eq!(config.search_url.as_str(), "https://es.example.com:9200/nginx*/_search");
    }

    #[test]
    fn rejects_an_invalid_uri() {
        assert!(config("not a uri", "nginx").is_err());
    }
}

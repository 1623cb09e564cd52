use advent_core::{FetchError, VerseListResponse, VerseQuery, VerseSource};
use gloo::net::http::Request;

/// Verse source talking to the remote `/advent` endpoint.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HttpVerseSource {
    base_url: String,
}

impl HttpVerseSource {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/advent", self.base_url.trim_end_matches('/'))
    }
}

impl VerseSource for HttpVerseSource {
    fn fetch_verses(
        &self,
        query: &VerseQuery,
    ) -> impl Future<Output = Result<VerseListResponse, FetchError>> {
        let url = self.endpoint();
        let params = query.pairs();
        async move {
            log::debug!("GET {} {:?}", url, params);
            let response = Request::get(&url)
                .query(params)
                .send()
                .await
                .map_err(|err| FetchError::Network(err.to_string()))?;
            if !response.ok() {
                return Err(FetchError::from_status(response.status()));
            }
            response
                .json::<VerseListResponse>()
                .await
                .map_err(|err| FetchError::Decode(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            HttpVerseSource::new("https://api.example.com/").endpoint(),
            "https://api.example.com/advent"
        );
        assert_eq!(HttpVerseSource::new("/api").endpoint(), "/api/advent");
    }
}

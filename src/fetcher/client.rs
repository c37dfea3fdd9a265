use crate::config::Config;
use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, ClientBuilder, StatusCode, header};
use tracing::{debug, instrument};
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const MAX_REDIRECTS: usize = 10;

const SEARCH_PAGE: &str = "GetCourses.aspx";
const DETAILS_PAGE: &str = "GetCourseDetails.aspx";
// Results page variant for the main campus listing.
const SEARCH_SITE: &str = "C";

// Keep the unreserved marks readable; everything else is escaped, spaces as %20.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// HTTP access to one course catalog host.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let http = ClientBuilder::new()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GetCourses.aspx?Keyword=<keyword>&site=C` under the catalog root.
    pub fn search_url(&self, keyword: &str) -> Result<Url, FetchError> {
        let relative = format!(
            "{SEARCH_PAGE}?Keyword={}&site={SEARCH_SITE}",
            utf8_percent_encode(keyword, QUERY_VALUE)
        );
        Ok(self.base_url.join(&relative)?)
    }

    /// `GetCourseDetails.aspx?course=<code>` under the catalog root.
    pub fn details_url(&self, course_code: &str) -> Result<Url, FetchError> {
        let relative = format!(
            "{DETAILS_PAGE}?course={}",
            utf8_percent_encode(course_code, QUERY_VALUE)
        );
        Ok(self.base_url.join(&relative)?)
    }

    pub async fn search(&self, keyword: &str) -> Result<PageResponse, FetchError> {
        let url = self.search_url(keyword)?;
        self.fetch(url).await
    }

    pub async fn course_details(&self, course_code: &str) -> Result<PageResponse, FetchError> {
        let url = self.details_url(course_code)?;
        self.fetch(url).await
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: Url) -> Result<PageResponse, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Http { status });
        }

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        // Whatever the declared type, a 200 is handed to the parsers.
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;

        // Content-Length may be missing or wrong for compressed bodies.
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        debug!(bytes = body_bytes.len(), content_type = %content_type, "page downloaded");
        Ok(process_response(final_url, status, &body_bytes, &content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CatalogClient {
        CatalogClient::new(&Config::default()).unwrap()
    }

    #[test]
    fn search_url_encodes_spaces_as_percent_20() {
        let url = client().search_url("large language model").unwrap();
        assert_eq!(
            url.as_str(),
            "https://courseinfo.canterbury.ac.nz/GetCourses.aspx?Keyword=large%20language%20model&site=C"
        );
    }

    #[test]
    fn search_url_escapes_query_metacharacters() {
        let url = client().search_url("R&D #1").unwrap();
        assert!(url.as_str().ends_with("Keyword=R%26D%20%231&site=C"));
    }

    #[test]
    fn details_url_for_course_code() {
        let url = client().details_url("COSC367").unwrap();
        assert_eq!(
            url.as_str(),
            "https://courseinfo.canterbury.ac.nz/GetCourseDetails.aspx?course=COSC367"
        );
    }

    #[test]
    fn urls_stay_under_a_nested_base() {
        let config = Config::new("http://127.0.0.1:9000/catalog").unwrap();
        let client = CatalogClient::new(&config).unwrap();
        assert_eq!(
            client.details_url("DATA101").unwrap().as_str(),
            "http://127.0.0.1:9000/catalog/GetCourseDetails.aspx?course=DATA101"
        );
    }
}

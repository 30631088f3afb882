use reqwest::blocking::RequestBuilder;

pub trait Authentication {
    fn apply(&self, request_builder: RequestBuilder) -> RequestBuilder;
}

// Google Maps Platform expects the key in a header rather than the query string.
pub struct ApiKeyAuthentication {
    pub api_key: String,
}

impl Authentication for ApiKeyAuthentication {
    fn apply(&self, request_builder: RequestBuilder) -> RequestBuilder {
        request_builder.header("X-Goog-Api-Key", self.api_key.clone())
    }
}

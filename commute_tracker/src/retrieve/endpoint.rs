pub trait Endpoint {
    fn url(&self) -> String;

    fn headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// An endpoint that only returns the response fields asked for.  Google
// calls the selection a field mask and rejects requests that omit it.
pub struct MaskedEndpoint {
    pub base_url: String,
    pub fields: &'static [&'static str],
}

impl MaskedEndpoint {
    pub fn field_mask(&self) -> String {
        self.fields.join(",")
    }
}

impl Endpoint for MaskedEndpoint {
    fn url(&self) -> String {
        self.base_url.clone()
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        vec![("X-Goog-FieldMask", self.field_mask())]
    }
}

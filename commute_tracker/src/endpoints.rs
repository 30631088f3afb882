pub mod google_routes {
    use crate::retrieve::endpoint::MaskedEndpoint;

    static COMPUTE_ROUTES_PATH: &str = "directions/v2:computeRoutes";

    pub static ROUTE_FIELDS: &[&str] = &[
        "routes.duration",
        "routes.distanceMeters",
        "routes.staticDuration",
        "routes.description",
    ];

    pub fn compute_routes(host: &str) -> MaskedEndpoint {
        let base_url = format!("{}/{}", host.trim_end_matches('/'), COMPUTE_ROUTES_PATH);
        MaskedEndpoint {
            base_url,
            fields: ROUTE_FIELDS,
        }
    }
}

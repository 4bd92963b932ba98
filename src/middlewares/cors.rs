use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        // mobile clients send no Origin; browser tooling may come from anywhere
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}

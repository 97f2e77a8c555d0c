use axum::{Router, routing::{get, post}};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::intake_handler::{
    IntakeState,
    api_info_handler,
    create_business_handler,
    create_contact_handler,
    create_quote_handler,
    fallback_handler,
    health_handler,
    list_records_handler,
    root_handler,
};
use crate::util::error::PanicResponder;

/// Answers a panicking handler with a 500 JSON body instead of dropping the connection.
pub fn catch_panic_layer(debug: bool) -> CatchPanicLayer<PanicResponder> {
    CatchPanicLayer::custom(PanicResponder { debug })
}

pub fn intake_router(state: IntakeState) -> Router {
    let debug = state.debug;

    // Public submission routes
    let api = Router::new()
        .route("/api", get(api_info_handler))
        .route("/api/quote", post(create_quote_handler))
        .route("/api/contact", post(create_contact_handler))
        .route("/api/business", post(create_business_handler));

    // Refuses to serve unless the store is ephemeral
    let dev = Router::new()
        .route("/api/dev/{collection}", get(list_records_handler));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .merge(dev)
        .fallback(fallback_handler)
        .with_state(state)
        .layer(catch_panic_layer(debug))
}

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry::metrics::Counter;

use crate::store::UserStore;
use crate::telemetry::SERVICE_NAME;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub users_created_counter: Counter<u64>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        let meter = global::meter(SERVICE_NAME);

        Self {
            store,
            users_created_counter: meter
                .u64_counter("users_created")
                .with_description("Number of users created")
                .build(),
        }
    }
}

// src/lib.rs

use std::sync::Arc;

use store::VersionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VersionStore>,
}

pub mod entities {
    pub mod prelude;
    pub mod unit_versions;
}

pub mod services {
    pub mod children;
    pub mod deletion;
    pub mod history;
    pub mod import;
    pub mod sales;
    pub mod tree;
    pub mod validation;
}

pub mod models {
    pub mod datetime;
    pub mod unit;
}

pub mod error;
pub mod handlers;
pub mod store;

pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod state;
    pub mod tracing_init;
}

pub mod alerts {
    pub mod alert_log;
    pub mod sink;
}

pub mod handlers {
    pub mod admin;
    pub mod alerts;
    pub mod fallback;
    pub mod health;
    pub mod metrics;
    pub mod users;
}

pub mod models {
    pub mod address;
    pub mod api;
    pub mod user;
}

pub mod stores {
    pub mod user_registry;
}

pub mod security {
    pub mod verify_limiter;
}

pub mod metrics {
    pub mod collector;
}

pub mod validation {
    pub mod params;
}

pub mod utils {
    pub mod auth;
    pub mod time;
}

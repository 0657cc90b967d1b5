use dotenvy::dotenv;
use std::env;

use crate::engine::rules::LeavePolicy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Quota policy; the 1/1/12 defaults are the current business rules.
    pub leave_policy: LeavePolicy,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            leave_policy: LeavePolicy {
                max_span_days: env_i64("MAX_LEAVE_SPAN_DAYS", 1),
                monthly_cap_days: env_i64("MONTHLY_LEAVE_CAP_DAYS", 1),
                yearly_cap_days: env_i64("YEARLY_LEAVE_CAP_DAYS", 12),
            },
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap()
}

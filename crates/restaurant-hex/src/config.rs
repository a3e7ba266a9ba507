use anyhow::Context;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub mongo_uri: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "8000".into());
        let mongo_uri = env::var("MONGO_URI")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .context("MONGO_URI not set in environment variables")?;
        Ok(Self {
            server_port,
            mongo_uri,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations cannot interleave.
    #[test]
    fn mongo_uri_is_required_and_port_defaults() {
        env::remove_var("SERVER_PORT");
        env::remove_var("MONGO_URI");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("MONGO_URI"));

        env::set_var("MONGO_URI", "  ");
        assert!(Config::from_env().is_err());

        env::set_var("MONGO_URI", "mongodb://localhost:27017");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.server_port, "8000");
        assert_eq!(cfg.mongo_uri, "mongodb://localhost:27017");
        env::remove_var("MONGO_URI");
    }
}

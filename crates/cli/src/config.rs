//! Command-line configuration.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default                     | Description                        |
//! |-------------------------|----------|-----------------------------|------------------------------------|
//! | `CONNECT_API_URL`       | no       | `http://localhost:8080/api` | Backend API base URL               |
//! | `CONNECT_FLOW`          | no       | `registration`              | Flow to run when no argument given |
//! | `CONNECT_SPONSOR_LEVEL` | no       | --                          | Pre-selected sponsorship level     |
//! | `RUST_LOG`              | no       | see [`DEFAULT_LOG_FILTER`]  | Log filter                         |

use std::fmt;
use std::str::FromStr;

use alumni_client::ClientConfig;
use alumni_core::sponsorship::SPONSORSHIP_LEVELS;

pub const DEFAULT_LOG_FILTER: &str = "alumni_cli=info,alumni_wizard=info,alumni_client=info";

/// Which wizard to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Registration,
    Nomination,
    Sponsorship,
}

impl Flow {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Nomination => "nomination",
            Self::Sponsorship => "sponsorship",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "registration" | "register" => Ok(Self::Registration),
            "nomination" | "nominate" => Ok(Self::Nomination),
            "sponsorship" | "sponsor" => Ok(Self::Sponsorship),
            other => anyhow::bail!(
                "Unknown flow '{other}'. Expected registration, nomination or sponsorship"
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub flow: Flow,
    pub sponsor_level: Option<String>,
    pub client: ClientConfig,
}

impl CliConfig {
    /// Build from the first command-line argument and the environment.
    pub fn from_env(flow_arg: Option<String>) -> anyhow::Result<Self> {
        Self::resolve(
            flow_arg,
            std::env::var("CONNECT_FLOW").ok(),
            std::env::var("CONNECT_SPONSOR_LEVEL").ok(),
            ClientConfig::from_env(),
        )
    }

    /// The argument wins over `CONNECT_FLOW`.
    fn resolve(
        flow_arg: Option<String>,
        flow_env: Option<String>,
        level_env: Option<String>,
        client: ClientConfig,
    ) -> anyhow::Result<Self> {
        let flow = match flow_arg.or(flow_env).filter(|f| !f.trim().is_empty()) {
            Some(raw) => raw.parse()?,
            None => Flow::Registration,
        };

        let sponsor_level = level_env
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty());
        if let Some(level) = &sponsor_level {
            if !SPONSORSHIP_LEVELS.contains(&level.as_str()) {
                anyhow::bail!(
                    "CONNECT_SPONSOR_LEVEL '{level}' is not one of: {}",
                    SPONSORSHIP_LEVELS.join(", ")
                );
            }
        }

        Ok(Self {
            flow,
            sponsor_level,
            client,
        })
    }
}

//! Liveness probes for external dependencies
//!
//! Each probe is independent and read-only. [`check_all`] runs them in
//! parallel and waits for every result before reporting.

use crate::config::{usable_key, Config};
use crate::providers::make_agent;
use rayon::prelude::*;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeStatus {
    pub service: String,
    pub status: ServiceState,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeStatus {
    pub fn up(service: &str, response_time_ms: u64) -> Self {
        Self {
            service: service.to_string(),
            status: ServiceState::Up,
            response_time_ms,
            error: None,
        }
    }

    pub fn down(service: &str, response_time_ms: u64, error: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            status: ServiceState::Down,
            response_time_ms,
            error: Some(error.into()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ServiceState::Up
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub services: Vec<ProbeStatus>,
}

pub trait Probe: Send + Sync {
    fn check(&self) -> ProbeStatus;
}

/// How an HTTP probe authenticates
#[derive(Debug, Clone)]
enum ProbeAuth {
    /// `Authorization: token <value>`; sent even when empty
    Token(Option<String>),
    /// `Authorization: Bearer <value>`; probe is down without a usable key
    RequiredBearer(Option<String>),
}

/// GET a URL; 200 and 401 both mean the service is reachable
pub struct HttpProbe {
    service: String,
    url: String,
    auth: ProbeAuth,
    agent: ureq::Agent,
}

fn reachable(status: u16) -> bool {
    matches!(status, 200 | 401)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl HttpProbe {
    fn new(service: &str, url: String, auth: ProbeAuth) -> Self {
        Self {
            service: service.to_string(),
            url,
            auth,
            agent: make_agent(PROBE_TIMEOUT),
        }
    }

    pub fn github(config: &Config) -> Self {
        Self::new(
            "github_api",
            format!("{}/user", config.github.api_url.trim_end_matches('/')),
            ProbeAuth::Token(config.github.token.clone()),
        )
    }

    pub fn openrouter(config: &Config) -> Self {
        Self::new(
            "openrouter",
            format!("{}/models", config.assessor.base_url.trim_end_matches('/')),
            ProbeAuth::RequiredBearer(config.assessor.api_key.clone()),
        )
    }

    pub fn together(config: &Config) -> Self {
        Self::new(
            "together_ai",
            format!("{}/models", config.renderer.base_url.trim_end_matches('/')),
            ProbeAuth::RequiredBearer(config.renderer.api_key.clone()),
        )
    }
}

impl Probe for HttpProbe {
    fn check(&self) -> ProbeStatus {
        let header = match &self.auth {
            ProbeAuth::Token(token) => format!("token {}", token.as_deref().unwrap_or("")),
            ProbeAuth::RequiredBearer(key) => match usable_key(key.as_deref()) {
                Some(key) => format!("Bearer {}", key),
                None => return ProbeStatus::down(&self.service, 0, "API key not configured"),
            },
        };

        let start = Instant::now();
        let result = self
            .agent
            .get(&self.url)
            .header("Authorization", &header)
            .call();
        let ms = elapsed_ms(start);

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                if reachable(status) {
                    ProbeStatus::up(&self.service, ms)
                } else {
                    ProbeStatus::down(&self.service, ms, format!("HTTP {}", status))
                }
            }
            Err(e) => ProbeStatus::down(&self.service, ms, e.to_string()),
        }
    }
}

/// Probes for every dependency the pipeline calls
pub fn default_probes(config: &Config) -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(HttpProbe::github(config)),
        Box::new(HttpProbe::openrouter(config)),
        Box::new(HttpProbe::together(config)),
    ]
}

/// Run every probe concurrently; healthy only when all are up
pub fn check_all(probes: &[Box<dyn Probe>]) -> HealthReport {
    let services: Vec<ProbeStatus> = probes.par_iter().map(|p| p.check()).collect();

    for s in &services {
        match &s.error {
            None => debug!("{} up ({}ms)", s.service, s.response_time_ms),
            Some(e) => warn!("{} down: {}", s.service, e),
        }
    }

    let status = if services.iter().all(ProbeStatus::is_up) {
        OverallStatus::Healthy
    } else {
        OverallStatus::Degraded
    };

    HealthReport { status, services }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(ProbeStatus);

    impl Probe for FixedProbe {
        fn check(&self) -> ProbeStatus {
            self.0.clone()
        }
    }

    #[test]
    fn test_all_up_is_healthy() {
        let probes: Vec<Box<dyn Probe>> = vec![
            Box::new(FixedProbe(ProbeStatus::up("github_api", 40))),
            Box::new(FixedProbe(ProbeStatus::up("openrouter", 80))),
        ];
        let report = check_all(&probes);
        assert_eq!(report.status, OverallStatus::Healthy);
        assert_eq!(report.services.len(), 2);
        // par_iter().collect() keeps input order
        assert_eq!(report.services[0].service, "github_api");
    }

    #[test]
    fn test_any_down_is_degraded() {
        let probes: Vec<Box<dyn Probe>> = vec![
            Box::new(FixedProbe(ProbeStatus::up("github_api", 40))),
            Box::new(FixedProbe(ProbeStatus::down("together_ai", 0, "HTTP 503"))),
        ];
        assert_eq!(check_all(&probes).status, OverallStatus::Degraded);
    }

    #[test]
    fn test_no_probes_is_healthy() {
        assert_eq!(check_all(&[]).status, OverallStatus::Healthy);
    }

    #[test]
    fn test_reachable_statuses() {
        assert!(reachable(200));
        assert!(reachable(401));
        assert!(!reachable(403));
        assert!(!reachable(500));
    }

    #[test]
    fn test_missing_key_skips_network() {
        let probe = HttpProbe::openrouter(&Config::default());
        let status = probe.check();
        assert_eq!(status.status, ServiceState::Down);
        assert_eq!(status.error.as_deref(), Some("API key not configured"));
        assert_eq!(status.response_time_ms, 0);
    }

    #[test]
    fn test_report_serialization() {
        let report = HealthReport {
            status: OverallStatus::Degraded,
            services: vec![ProbeStatus::down("together_ai", 0, "API key not configured")],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["services"][0]["status"], "down");
    }
}

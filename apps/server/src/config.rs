use std::{net::SocketAddr, time::Duration};

use vnquant_market_data::provider::{fmarket, gold, msn, tcbs, vcb, vci};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub upstream_timeout: Duration,
    pub vci_base_url: String,
    pub tcbs_base_url: String,
    pub msn_base_url: String,
    pub msn_api_key: String,
    pub fmarket_base_url: String,
    pub sjc_base_url: String,
    pub btmc_base_url: String,
    pub vcb_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("VNQ_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:9007".to_string())
            .parse()
            .expect("Invalid VNQ_LISTEN_ADDR");
        let cors_allow = std::env::var("VNQ_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout_ms: u64 = std::env::var("VNQ_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let upstream_timeout_ms: u64 = std::env::var("VNQ_UPSTREAM_TIMEOUT_MS")
            .unwrap_or_else(|_| "20000".into())
            .parse()
            .unwrap_or(20000);
        Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(request_timeout_ms),
            upstream_timeout: Duration::from_millis(upstream_timeout_ms),
            vci_base_url: base_url("VNQ_VCI_BASE_URL", vci::DEFAULT_BASE_URL),
            tcbs_base_url: base_url("VNQ_TCBS_BASE_URL", tcbs::DEFAULT_BASE_URL),
            msn_base_url: base_url("VNQ_MSN_BASE_URL", msn::DEFAULT_BASE_URL),
            msn_api_key: base_url("VNQ_MSN_API_KEY", msn::DEFAULT_API_KEY),
            fmarket_base_url: base_url("VNQ_FMARKET_BASE_URL", fmarket::DEFAULT_BASE_URL),
            sjc_base_url: base_url("VNQ_SJC_BASE_URL", gold::DEFAULT_SJC_BASE_URL),
            btmc_base_url: base_url("VNQ_BTMC_BASE_URL", gold::DEFAULT_BTMC_BASE_URL),
            vcb_base_url: base_url("VNQ_VCB_BASE_URL", vcb::DEFAULT_BASE_URL),
        }
    }
}

fn base_url(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

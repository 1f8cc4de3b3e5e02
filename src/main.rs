// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use agentready::application::use_cases::scan_use_case::ScanUseCase;
use agentready::config::settings::Settings;
use agentready::domain::services::llm_service::{ContentIntelligence, LLMService};
use agentready::engines::probe_engine::ReqwestProber;
use agentready::engines::traits::Prober;
use agentready::presentation::routes;
use agentready::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting agentready...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    if settings.metrics.enabled {
        agentready::infrastructure::metrics::init_metrics(&settings.metrics.listen)?;
    }

    // 3. Initialize components
    let prober = if settings.scan.block_private_hosts {
        ReqwestProber::guarded(&settings.probe)?
    } else {
        ReqwestProber::new(&settings.probe)?
    };
    let prober: Arc<dyn Prober> = Arc::new(prober);
    info!(prober = prober.name(), identities = settings.probe.user_agents.len(), "Prober initialized");
    let intelligence: Arc<dyn ContentIntelligence> = Arc::new(LLMService::new(
        settings.llm.clone(),
        settings.grounding.clone(),
    ));
    if settings.llm.api_key.is_none() {
        warn!("No LLM API key configured; content analysis will degrade to defaults");
    }
    if settings.grounding.api_key.is_none() {
        warn!("No grounding API key configured; competitor discovery uses plain generation only");
    }
    let use_case = Arc::new(ScanUseCase::new(settings.clone(), prober, intelligence));

    // 4. Start HTTP server
    let app = routes::routes(use_case);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

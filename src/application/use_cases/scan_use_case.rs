// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use futures::future::join_all;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::domain::models::artifact::HostScan;
use crate::domain::models::competitor::{Competitor, CompetitorReport};
use crate::domain::models::report::{Issues, ScanReport};
use crate::domain::services::artifact_scanner::ArtifactScanner;
use crate::domain::services::benchmark_selector::BenchmarkSelector;
use crate::domain::services::competitor_discovery::CompetitorDiscovery;
use crate::domain::services::content_analysis::ContentAnalyzer;
use crate::domain::services::extraction_service::ExtractionService;
use crate::domain::services::llm_service::ContentIntelligence;
use crate::domain::services::profile_builder::ProfileBuilder;
use crate::domain::services::result_assembler::{competitor_advantages, ResultAssembler};
use crate::domain::services::scoring::ScoringEngine;
use crate::engines::traits::Prober;
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::url_utils::{bare_domain, normalize_target_url, origin_of};
use crate::utils::validators::{validate_public_host, HostGuardError};

/// 终止扫描的错误
///
/// 只有输入无效或目标首页在完整重试预算后仍不可达才会终止；
/// 其它阶段的失败都降级为默认值并记录到 `analysisErrors`。
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Could not reach {url}: {reason}")]
    NetworkUnreachable { url: String, reason: String },
}

/// 扫描用例
///
/// 编排完整的扫描流水线：
/// 首页抓取 -> 提取 -> 制品扫描与内容分析（并发）-> 公司画像 -> 竞争对手发现与预扫描
/// -> 竞争对手完整扫描（并发）-> 评分 -> 基准选择 -> 报告组装。
///
/// 每次扫描都是独立且无共享可变状态的，同一个实例可以被并发调用。
pub struct ScanUseCase {
    settings: Arc<Settings>,
    prober: Arc<dyn Prober>,
    scanner: Arc<ArtifactScanner>,
    analyzer: ContentAnalyzer,
    profiles: ProfileBuilder,
    discovery: CompetitorDiscovery,
    scoring: ScoringEngine,
    benchmarks: BenchmarkSelector,
    assembler: ResultAssembler,
    home_policy: RetryPolicy,
}

impl ScanUseCase {
    /// 创建扫描用例
    ///
    /// # 参数
    ///
    /// * `settings` - 不可变配置
    /// * `prober` - 网络探测器
    /// * `intelligence` - 内容智能服务
    pub fn new(
        settings: Arc<Settings>,
        prober: Arc<dyn Prober>,
        intelligence: Arc<dyn ContentIntelligence>,
    ) -> Self {
        let scanner = Arc::new(ArtifactScanner::new(prober.clone(), &settings.probe));
        let scoring = ScoringEngine::new(settings.scoring.clone());

        Self {
            analyzer: ContentAnalyzer::new(intelligence.clone(), settings.scan.min_content_chars),
            profiles: ProfileBuilder::new(intelligence.clone()),
            discovery: CompetitorDiscovery::new(
                intelligence,
                prober.clone(),
                &settings.probe,
                &settings.scan,
            ),
            benchmarks: BenchmarkSelector::new(
                scanner.clone(),
                scoring.clone(),
                settings.benchmarks.reference_sites.clone(),
                settings.scan.max_competitors,
            ),
            assembler: ResultAssembler::new(settings.benchmarks.clone(), settings.scoring.clone()),
            home_policy: RetryPolicy::main_fetch(&settings.probe),
            scoring,
            scanner,
            prober,
            settings,
        }
    }

    /// 执行扫描
    pub async fn execute(&self, input: &str) -> Result<ScanReport, ScanError> {
        let started = Instant::now();
        counter!("scans_total").increment(1);

        let result = self.run(input, started).await;
        if let Err(e) = &result {
            counter!("scans_failed_total").increment(1);
            warn!(input, error = %e, "Scan aborted");
        }
        histogram!("scan_duration_seconds").record(started.elapsed().as_secs_f64());
        result
    }

    async fn run(&self, input: &str, started: Instant) -> Result<ScanReport, ScanError> {
        let crawled_at = Utc::now();
        let url = normalize_target_url(input)
            .ok_or_else(|| ScanError::InvalidInput(format!("'{}' is not a valid URL", input.trim())))?;
        if self.settings.scan.block_private_hosts {
            validate_public_host(&url).await.map_err(|e| match e {
                HostGuardError::Private(_) => ScanError::InvalidInput(e.to_string()),
                HostGuardError::Unresolvable { reason, .. } => ScanError::NetworkUnreachable {
                    url: url.to_string(),
                    reason,
                },
            })?;
        }

        let origin = origin_of(&url);
        let domain = bare_domain(&url);
        info!(url = %url, "Starting scan");

        let home = self.prober.probe(url.as_str(), &self.home_policy).await;
        if !home.ok {
            return Err(ScanError::NetworkUnreachable {
                url: url.to_string(),
                reason: home
                    .error
                    .unwrap_or_else(|| format!("HTTP {}", home.status)),
            });
        }
        let page = ExtractionService::extract(&home.body);
        let mut analysis_errors = Vec::new();

        let (target_scan, analysis) = tokio::join!(
            self.scanner.scan(&origin, Some(&page)),
            self.analyzer.analyze(url.as_str(), &page),
        );
        let analysis = analysis.collect_into(&mut analysis_errors);
        info!(url = %url, found = target_scan.artifacts.found_count(), "Target artifacts scanned");

        let profile = self
            .profiles
            .build(&domain, &page, &analysis)
            .await
            .collect_into(&mut analysis_errors);

        let discovery = self
            .discovery
            .discover(&profile, &url)
            .await
            .collect_into(&mut analysis_errors);
        let ranked = self.discovery.rank(discovery.competitors).await;

        let scans = join_all(ranked.iter().map(|(c, _)| self.scan_competitor(c))).await;

        let target = self.scoring.score_entity(
            url.as_str(),
            target_scan,
            Some(analysis.content_gap.content_score),
        );

        let mut competitors: Vec<CompetitorReport> = ranked
            .into_iter()
            .zip(scans)
            .map(|((competitor, pre_scan), scan)| {
                let scored = self.scoring.score_entity(&competitor.url, scan, None);
                let mut report = CompetitorReport::new(competitor, scored, Some(pre_scan));
                report.advantages =
                    competitor_advantages(&target.artifact_checks, &report.artifact_checks);
                report
            })
            .collect();
        self.benchmarks.apply(&mut competitors).await;

        let findings = self
            .assembler
            .findings(&target.artifact_checks, &analysis, &competitors);
        let opportunities = self.assembler.opportunities(&target.artifact_checks);
        let benchmarks = self
            .assembler
            .benchmark_summary(&analysis.topic_recognition.industry, target.score);

        info!(
            url = %url,
            score = target.score,
            competitors = competitors.len(),
            degraded = analysis_errors.len(),
            "Scan completed"
        );

        Ok(ScanReport {
            success: true,
            scan_id: Uuid::new_v4(),
            url: url.to_string(),
            crawled_at,
            duration_ms: started.elapsed().as_millis() as u64,
            score: target.score,
            benchmarks,
            issues: Issues::tally(&findings),
            findings,
            opportunities,
            artifact_checks: target.artifact_checks,
            analysis,
            company_profile: profile,
            content_info: page.content_info(),
            competitors,
            competitor_sources: discovery.sources,
            analysis_errors,
        })
    }

    async fn scan_competitor(&self, competitor: &Competitor) -> HostScan {
        if self.settings.scan.block_private_hosts {
            let allowed = match normalize_target_url(&competitor.url) {
                Some(url) => validate_public_host(&url).await.is_ok(),
                None => false,
            };
            if !allowed {
                return HostScan::unreachable("Host is not publicly routable");
            }
        }
        self.scanner.scan_site(&competitor.url).await
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    analysis_reply, closed_port_url, reference, scan_use_case, test_settings, FakeIntelligence,
    MockSite,
};
use agentready::application::use_cases::scan_use_case::ScanError;
use agentready::domain::models::artifact::CheckStatus;
use agentready::domain::models::competitor::CompetitorType;
use agentready::domain::models::report::Severity;
use serde_json::json;

/// 裸站点：没有任何制品，分数只来自内容缺口项
#[tokio::test]
async fn test_bare_site_scores_only_content_gap() {
    let target = MockSite::start().await;
    target.homepage(&[]).await;

    let use_case = scan_use_case(test_settings(vec![]), FakeIntelligence::new());
    let report = use_case.execute(&target.url()).await.unwrap();

    assert!(report.success);
    assert_eq!(report.score, 7);
    assert_eq!(report.artifact_checks.found_count(), 0);
    assert_eq!(report.artifact_checks.json_ld_schema.status, CheckStatus::NotFound);

    let critical: Vec<&str> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .map(|f| f.title.as_str())
        .collect();
    assert!(critical.contains(&"Missing JSON-LD Structured Data"));
    assert!(critical.contains(&"Missing llms.txt"));
    assert_eq!(report.issues.critical, critical.len());
    assert!(report.competitors.is_empty());
    assert!(report.analysis_errors.is_empty());
    assert_eq!(report.content_info.title, "Acme Widgets");
}

/// 结构化数据、AI 指令、大站点地图与 llms.txt 的组合分数
#[tokio::test]
async fn test_partially_ready_site_score() {
    let target = MockSite::start().await;
    target.homepage(&["Organization", "WebSite", "Product"]).await;
    target.robots_with_ai_rules().await;
    target.sitemap(15).await;
    target.llms_txt().await;

    let use_case = scan_use_case(test_settings(vec![]), FakeIntelligence::new());
    let report = use_case.execute(&target.url()).await.unwrap();

    let checks = &report.artifact_checks;
    assert_eq!(checks.json_ld_schema.types.len(), 3);
    assert!(checks.robots_txt.directives.has_ai_directives);
    assert_eq!(checks.sitemap.url_count, 15);
    assert!(checks.llms_txt.has_instructions);
    assert_eq!(report.score, 49 + 7);
    assert!(!report.opportunities.iter().any(|o| o.id == "add-schema"));
}

/// 以 HTML 错误页响应 200 的 JSON 路径不算作发现
#[tokio::test]
async fn test_html_error_pages_are_not_artifacts() {
    let target = MockSite::start().await;
    target.homepage(&[]).await;
    let error_page = "<!DOCTYPE html><html><body><h1>Page not found</h1></body></html>";
    target
        .serve("/.well-known/ai-manifest.json", 200, "text/html", error_page)
        .await;
    target.serve("/.well-known/mcp.json", 200, "text/html", error_page).await;
    target.serve("/openapi.json", 200, "text/html", error_page).await;
    target.serve("/llms.txt", 200, "text/html", error_page).await;
    target.serve("/sitemap.xml", 200, "text/html", error_page).await;

    let use_case = scan_use_case(test_settings(vec![]), FakeIntelligence::new());
    let report = use_case.execute(&target.url()).await.unwrap();

    let checks = &report.artifact_checks;
    assert_eq!(checks.ai_manifest.status, CheckStatus::NotFound);
    assert_eq!(checks.mcp_config.status, CheckStatus::NotFound);
    assert_eq!(checks.open_api.status, CheckStatus::NotFound);
    assert_eq!(checks.llms_txt.status, CheckStatus::NotFound);
    assert_eq!(checks.sitemap.status, CheckStatus::NotFound);
}

/// 所有竞争对手不可达时，第一个合格的参考站点作为基准插入最前
#[tokio::test]
async fn test_unreachable_competitors_get_reference_benchmark() {
    let target = MockSite::start().await;
    target.homepage(&[]).await;

    let weak_reference = MockSite::start().await;
    weak_reference.homepage(&[]).await;
    weak_reference.robots_with_ai_rules().await;

    let strong_reference = MockSite::start().await;
    strong_reference.fully_ready().await;

    let competitors: Vec<_> = (1..=5)
        .map(|port| {
            json!({
                "name": format!("Rival {}", port),
                "url": closed_port_url(port),
                "competitorType": "direct"
            })
        })
        .collect();
    let intelligence = FakeIntelligence::new().with_competitors(json!(competitors));

    let settings = test_settings(vec![
        reference("Weak Reference", &weak_reference.url()),
        reference("Strong Reference", &strong_reference.url()),
    ]);
    let use_case = scan_use_case(settings, intelligence);
    let report = use_case.execute(&target.url()).await.unwrap();

    assert_eq!(report.competitors.len(), 5);
    let benchmark = &report.competitors[0];
    assert!(benchmark.is_benchmark);
    assert_eq!(benchmark.name, "Strong Reference");
    assert_eq!(benchmark.competitor_type, CompetitorType::Aspirational);
    assert_eq!(benchmark.artifacts_found_count, 8);
    assert_eq!(benchmark.artifacts_found_percentage, 100);
    assert!(benchmark.crawled_successfully);

    for rival in &report.competitors[1..] {
        assert!(!rival.is_benchmark);
        assert!(!rival.crawled_successfully);
        assert_eq!(rival.score, 0);
        assert!(!rival.pre_scan.as_ref().unwrap().reachable);
    }
}

/// 没有参考站点达到门槛时不插入基准
#[tokio::test]
async fn test_no_benchmark_when_nothing_qualifies() {
    let target = MockSite::start().await;
    target.homepage(&[]).await;

    let weak_reference = MockSite::start().await;
    weak_reference.homepage(&["Organization"]).await;
    weak_reference.llms_txt().await;

    let intelligence = FakeIntelligence::new().with_competitors(json!([
        {"name": "Gone", "url": closed_port_url(1)}
    ]));
    let settings = test_settings(vec![reference("Weak Reference", &weak_reference.url())]);
    let report = scan_use_case(settings, intelligence)
        .execute(&target.url())
        .await
        .unwrap();

    assert_eq!(report.competitors.len(), 1);
    assert!(report.competitors.iter().all(|c| !c.is_benchmark));
    assert_eq!(report.competitors[0].name, "Gone");
}

/// 竞争对手按预扫描结果排序，目标自身被排除
#[tokio::test]
async fn test_competitors_are_ranked_by_pre_scan() {
    let target = MockSite::start().await;
    target.homepage(&[]).await;

    let plain = MockSite::start().await;
    plain.homepage(&[]).await;

    let with_llms = MockSite::start().await;
    with_llms.homepage(&[]).await;
    with_llms.llms_txt().await;
    with_llms.robots_with_ai_rules().await;

    let with_robots = MockSite::start().await;
    with_robots.homepage(&[]).await;
    with_robots.robots_with_ai_rules().await;

    let intelligence = FakeIntelligence::new().with_competitors(json!([
        {"name": "Offline", "url": closed_port_url(1)},
        {"name": "Plain", "url": plain.url()},
        {"name": "Acme Widgets Clone", "url": target.url()},
        {"name": "Robots", "url": with_robots.url()},
        {"name": "Llms", "url": with_llms.url()},
    ]));
    let report = scan_use_case(test_settings(vec![]), intelligence)
        .execute(&target.url())
        .await
        .unwrap();

    let names: Vec<&str> = report.competitors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Llms", "Robots", "Plain", "Offline"]);

    let weights: Vec<u32> = report
        .competitors
        .iter()
        .map(|c| c.pre_scan.as_ref().unwrap().artifact_count)
        .collect();
    assert_eq!(weights, vec![3, 1, 0, 0]);
    assert_eq!(report.competitors[0].advantages, vec!["Has llms.txt"]);
    assert_eq!(report.competitor_sources.len(), 1);

    let note = report
        .findings
        .iter()
        .find(|f| f.id == "no-llms-txt")
        .and_then(|f| f.competitor_note.clone());
    assert_eq!(note.as_deref(), Some("1 of your competitors already has llms.txt"));
}

/// 已有合格竞争对手时标记制品最多者，不使用参考站点
#[tokio::test]
async fn test_best_competitor_is_marked_as_benchmark() {
    let target = MockSite::start().await;
    target.homepage(&[]).await;

    let leader = MockSite::start().await;
    leader.fully_ready().await;

    let reference_site = MockSite::start().await;
    reference_site.fully_ready().await;

    let intelligence = FakeIntelligence::new().with_competitors(json!([
        {"name": "Leader", "url": leader.url(), "competitorType": "indirect"}
    ]));
    let settings = test_settings(vec![reference("Reference", &reference_site.url())]);
    let report = scan_use_case(settings, intelligence)
        .execute(&target.url())
        .await
        .unwrap();

    assert_eq!(report.competitors.len(), 1);
    let leader_report = &report.competitors[0];
    assert_eq!(leader_report.name, "Leader");
    assert!(leader_report.is_benchmark);
    assert_eq!(leader_report.competitor_type, CompetitorType::Indirect);
    // JSON-LD 5 + 3x3, every other artifact at full weight
    assert_eq!(leader_report.score, 84);
}

/// 智能服务全部失败时扫描仍然完成，只记录降级说明
#[tokio::test]
async fn test_intelligence_failures_degrade_gracefully() {
    let target = MockSite::start().await;
    target.homepage(&["Organization"]).await;

    let report = scan_use_case(test_settings(vec![]), FakeIntelligence::failing())
        .execute(&target.url())
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.analysis.topic_recognition.industry, "general");
    assert_eq!(report.analysis.content_gap.content_score, 50.0);
    assert!(report.company_profile.company_name.starts_with("127.0.0.1:"));
    assert!(report.competitors.is_empty());
    assert_eq!(report.analysis_errors.len(), 3);
    // JSON-LD 5 + 3, content gap 5
    assert_eq!(report.score, 13);
    assert_eq!(report.benchmarks.industry, "general");
}

/// 搜索增强失败时使用普通生成的候选
#[tokio::test]
async fn test_discovery_falls_back_to_plain_generation() {
    let target = MockSite::start().await;
    target.homepage(&[]).await;
    let rival = MockSite::start().await;
    rival.homepage(&[]).await;

    let mut intelligence =
        FakeIntelligence::new().with_competitors(json!({"competitors": [{"name": "Rival", "url": rival.url()}]}));
    intelligence.grounded = false;
    intelligence.analysis = Some(analysis_reply(100));

    let report = scan_use_case(test_settings(vec![]), intelligence)
        .execute(&target.url())
        .await
        .unwrap();

    assert_eq!(report.competitors.len(), 1);
    assert!(report.competitor_sources.is_empty());
    assert!(report.analysis_errors.is_empty());
    assert_eq!(report.score, 10);
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let use_case = scan_use_case(test_settings(vec![]), FakeIntelligence::new());

    for input in ["", "   ", "ftp://example.com", "http://"] {
        let err = use_case.execute(input).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)), "input {:?}", input);
    }
}

#[tokio::test]
async fn test_unreachable_homepage_aborts_scan() {
    let use_case = scan_use_case(test_settings(vec![]), FakeIntelligence::new());

    let err = use_case.execute(&closed_port_url(1)).await.unwrap_err();

    match err {
        ScanError::NetworkUnreachable { url, .. } => assert_eq!(url, "http://127.0.0.1:1/"),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_private_hosts_are_rejected_when_guard_enabled() {
    let mut settings = test_settings(vec![]);
    settings.scan.block_private_hosts = true;
    let use_case = scan_use_case(settings, FakeIntelligence::new());

    let err = use_case.execute("http://127.0.0.1:8080").await.unwrap_err();

    assert!(matches!(err, ScanError::InvalidInput(_)));
}

/// 无法解析的主机属于网络层失败，不是输入错误
#[tokio::test]
async fn test_unresolvable_host_is_unreachable_when_guard_enabled() {
    let mut settings = test_settings(vec![]);
    settings.scan.block_private_hosts = true;
    let use_case = scan_use_case(settings, FakeIntelligence::new());

    let err = use_case
        .execute("https://no-such-host-agentready.invalid")
        .await
        .unwrap_err();

    match err {
        ScanError::NetworkUnreachable { url, .. } => {
            assert!(url.contains("no-such-host-agentready.invalid"));
        }
        other => panic!("expected NetworkUnreachable, got {:?}", other),
    }
}

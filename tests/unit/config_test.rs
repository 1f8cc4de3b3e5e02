// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 验证仓库自带的 config/default.toml 能被完整加载

#[cfg(test)]
mod tests {
    use agentready::config::settings::Settings;

    #[test]
    fn test_config_loading_from_default_toml() {
        let settings = Settings::from_file("config/default").unwrap();

        assert_eq!(settings.server.port, 3000);
        assert!(!settings.metrics.enabled);
        assert_eq!(settings.probe.main_attempts, 3);
        assert_eq!(settings.probe.retryable_statuses, vec![403, 429]);
        // Not listed in the file, filled from built-in defaults
        assert_eq!(settings.probe.user_agents.len(), 4);
        assert_eq!(settings.benchmarks.reference_sites.len(), 3);
        assert!(settings.scan.block_private_hosts);
        assert_eq!(settings.scan.max_competitors, 5);
        assert_eq!(settings.scoring.benchmark_min_artifacts, 4);
        assert!(settings.llm.api_key.is_none());
    }
}

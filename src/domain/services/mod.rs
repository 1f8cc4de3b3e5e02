// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含扫描流水线的各个阶段，每个服务只负责一件事，
/// 由 `application::use_cases::scan_use_case` 负责编排。
///
/// 包含的服务：
/// - 提取服务（extraction_service）：从首页 HTML 中提取 JSON-LD、元标签、标题与正文
/// - 制品扫描（artifact_scanner）：探测并校验八类机器可读制品
/// - LLM服务（llm_service）：文本生成与搜索增强生成
/// - 内容分析（content_analysis）：主题、内容缺口、NAP、事实核查与用户问题
/// - 画像构建（profile_builder）：公司画像推断
/// - 竞争对手发现（competitor_discovery）：候选清洗、预扫描与排序
/// - 评分（scoring）：加权制品分数
/// - 基准选择（benchmark_selector）：最佳实践竞争对手或参考站点替补
/// - 报告组装（result_assembler）：发现项、机会、行业基准与竞争优势
pub mod artifact_scanner;
pub mod benchmark_selector;
pub mod competitor_discovery;
pub mod content_analysis;
pub mod extraction_service;
pub mod llm_service;
pub mod profile_builder;
pub mod result_assembler;
pub mod scoring;

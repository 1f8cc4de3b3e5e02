// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了扫描流水线的核心数据结构，包括：
/// - 制品检查（artifact）：8 项机器可读制品的检查结果
/// - 内容分析（analysis）：主题、内容缺口、NAP 与事实核查
/// - 公司画像（profile）：用于竞争对手发现的结构化画像
/// - 竞争对手（competitor）：发现、预扫描与评分后的竞争对手
/// - 报告（report）：发现项、改进机会与最终报告
///
/// 所有实体都在单次扫描内创建和消费，不做持久化。
pub mod analysis;
pub mod artifact;
pub mod competitor;
pub mod profile;
pub mod report;

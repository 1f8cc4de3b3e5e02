// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：制品检查、内容分析、公司画像、竞争对手与报告
/// - 服务（services）：提取、制品扫描、智能分析、竞争对手发现、评分与报告组装
///
/// 领域层只依赖 `engines::traits::Prober` 与 `ContentIntelligence` 两个抽象，
/// 网络与模型调用都可以在测试中替换。
pub mod models;
pub mod services;

/// 繰り返し（次回支払日）計算機能モジュール
///
/// このモジュールは以下を提供します：
/// - 繰り返し記述子（"Monthly", "Every 3 Months" など）の解析と生成
/// - 次回支払日の計算（月末丸め）
/// - 過去の支払日からの追いつき計算
pub mod engine;
pub mod models;

mod engine_test;

// 公開インターフェース
pub use engine::RecurrenceEngine;
pub use models::{describe_recurrence, Recurrence, RecurrenceUnit};

/// 支出集計機能モジュール
///
/// 支払い記録を 月 → 日 → サービス の順にドリルダウンできる形で集計します。
/// 通貨換算は行わず、通貨ごとに別のグループとして扱います。
pub mod aggregator;
pub mod currency;
pub mod models;


// 公開インターフェース
pub use aggregator::SpendAggregator;
pub use currency::{currency_symbol, DEFAULT_CURRENCY_SYMBOL};
pub use models::{
    AggregationNode, CleanupNotice, DayBarKey, DayDetail, DayKey, DrillDown, MonthDetail,
    MonthKey, Overview, SpendLevel, SpendView, SubscriptionGroupKey,
};

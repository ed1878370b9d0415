/// サブスクリプション機能モジュール
///
/// このモジュールは、サブスクリプションと支払い記録に関する計算を提供します：
/// - 次回支払日の計算と自動支払いの追いつき
/// - リマインダー用の残り日数
/// - 月額合計の計算
/// - 永続化層から受け取るデータの読み込みと検証
pub mod models;
pub mod service;

pub use models::{PaymentRecord, Subscription};

pub use service::{
    calculate_monthly_total, calculate_next_due_date, catch_up_autopay, days_until_due,
    parse_payments_json, parse_subscriptions_json, validate_subscription,
};

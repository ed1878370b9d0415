use super::models::{PaymentRecord, Subscription};
use crate::features::dates::{instant_from_millis, DateNormalizer, NormalizedDate};
use crate::features::recurrence::RecurrenceEngine;
use crate::shared::errors::AppResult;
use crate::shared::utils::{
    validate_amount, validate_currency_code, validate_required_field, validate_text_length,
};
use chrono::{DateTime, Utc};

/// サブスクリプションの次回支払日を計算する
///
/// # 引数
/// * `engine` - 繰り返し計算エンジン
/// * `subscription` - 対象のサブスクリプション
///
/// # 戻り値
/// 次回支払日。支払日未設定・Custom の場合は None、
/// 支払日が日時として扱えない値の場合はエラー
pub fn calculate_next_due_date(
    engine: &RecurrenceEngine,
    subscription: &Subscription,
) -> AppResult<Option<NormalizedDate>> {
    let Some(due_millis) = subscription.due_date else {
        return Ok(None);
    };

    let due = instant_from_millis(due_millis)?;
    Ok(engine.next_due_date(due, &subscription.recurrence))
}

/// 自動支払いのサブスクリプションの支払日を今日以降まで進める
///
/// # 戻り値
/// 進めた後の支払日。自動支払いでない・支払日未設定・Custom の場合は None
pub fn catch_up_autopay(
    engine: &RecurrenceEngine,
    subscription: &Subscription,
    today: DateTime<Utc>,
) -> AppResult<Option<NormalizedDate>> {
    if !subscription.autopay || !subscription.active {
        return Ok(None);
    }
    let Some(due_millis) = subscription.due_date else {
        return Ok(None);
    };

    let due = instant_from_millis(due_millis)?;
    Ok(engine.advance_until(due, &subscription.recurrence, today))
}

/// 次回支払日までの日数を計算する（リマインダーの判定用）
///
/// # 戻り値
/// 日数（過ぎている場合は負の値）、支払日未設定の場合は None
pub fn days_until_due(
    normalizer: &DateNormalizer,
    subscription: &Subscription,
    today: DateTime<Utc>,
) -> AppResult<Option<i64>> {
    let Some(due_millis) = subscription.due_date else {
        return Ok(None);
    };

    let due = normalizer.normalize_millis(due_millis)?;
    Ok(Some(normalizer.normalize(today).days_until(&due)))
}

/// 有効なサブスクリプションの月額合計を計算する
///
/// # 引数
/// * `subscriptions` - サブスクリプション一覧
/// * `currency` - 集計対象の通貨コード（通貨換算は行わない）
///
/// # 戻り値
/// 月額換算の合計金額（Custom は含めない）
pub fn calculate_monthly_total(subscriptions: &[Subscription], currency: &str) -> f64 {
    subscriptions
        .iter()
        .filter(|sub| sub.active && sub.currency == currency)
        .fold(0.0, |acc, sub| acc + sub.cost * sub.recurrence.monthly_factor())
}

/// サブスクリプションの入力値を検証する（永続化層へ渡す前の境界チェック）
pub fn validate_subscription(subscription: &Subscription) -> AppResult<()> {
    validate_required_field(&subscription.name, "サービス名")?;
    validate_text_length(&subscription.name, 100, "サービス名")?;
    validate_amount(subscription.cost)?;
    validate_currency_code(&subscription.currency)?;
    validate_text_length(&subscription.category, 50, "カテゴリ")?;
    if let Some(due_millis) = subscription.due_date {
        instant_from_millis(due_millis)?;
    }
    Ok(())
}

/// JSON 配列からサブスクリプション一覧を読み込む
pub fn parse_subscriptions_json(json: &str) -> AppResult<Vec<Subscription>> {
    let subscriptions: Vec<Subscription> = serde_json::from_str(json)?;
    log::debug!("サブスクリプションを読み込みました: {}件", subscriptions.len());
    Ok(subscriptions)
}

/// JSON 配列から支払い記録一覧を読み込む
pub fn parse_payments_json(json: &str) -> AppResult<Vec<PaymentRecord>> {
    let payments: Vec<PaymentRecord> = serde_json::from_str(json)?;
    log::debug!("支払い記録を読み込みました: {}件", payments.len());
    Ok(payments)
}

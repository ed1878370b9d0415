use crate::features::recurrence::Recurrence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// サブスクリプションデータモデル（永続化層から受け取る読み取り専用データ）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,                // サービス名、100文字以内
    pub due_date: Option<i64>,       // 次回支払日（エポックミリ秒、UTC）
    pub cost: f64,                   // 0以上の数値
    pub currency: String,            // "JPY" などの通貨コード
    pub recurrence: Recurrence,      // "Monthly" / "Every 3 Months" / "Custom" など
    #[serde(default)]
    pub category: String,            // カテゴリ名
    #[serde(default = "default_true")]
    pub active: bool,                // 有効/無効
    #[serde(default)]
    pub autopay: bool,               // 自動支払い
}

fn default_true() -> bool {
    true
}

/// 支払い記録データモデル
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,                // 支払日時（エポックミリ秒、UTC）
    pub amount: f64,
    #[serde(default)]
    pub subscription_name: Option<String>,  // 欠けている記録は集計対象外
    #[serde(default)]
    pub subscription_id: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub user_id: String,
}

impl PaymentRecord {
    /// 集計に使えるサービス名（空白のみ・欠落の場合は None）
    pub fn valid_name(&self) -> Option<&str> {
        self.subscription_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// 集計対象として有効な記録かどうか
    pub fn is_valid(&self) -> bool {
        self.valid_name().is_some()
    }
}

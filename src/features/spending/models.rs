use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// 年月の集計キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 指定した日付がこの月に含まれるかどうか
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// 日の集計キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DayKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DayKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// この日が属する月のキー（ドリルダウンから戻るときに使う）
    pub fn month(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// 月詳細の棒のキー（日 × 通貨）
///
/// 通貨換算は行わないため、同じ日に2通貨あれば棒は2本になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DayBarKey {
    pub day: DayKey,
    pub currency: String,
}

/// 日詳細のキー（サービス名 × 通貨）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubscriptionGroupKey {
    pub name: String,
    pub currency: String,
}

/// 次の粒度へのドリルダウン先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "key", rename_all = "camelCase")]
pub enum DrillDown {
    Month(MonthKey),
    Day(DayKey),
}

/// 集計結果の1グループ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationNode<K> {
    pub key: K,
    pub label: String,
    pub total: f64,
    /// 代表（最も古い）支払いの通貨コード
    pub currency: String,
    pub currency_symbol: String,
    pub payment_count: usize,
    /// 最小粒度（日詳細）では None
    pub drill_down: Option<DrillDown>,
}

/// サービス名が欠けた支払い記録の整理を促すための通知
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupNotice {
    pub count: usize,
    pub payment_ids: Vec<String>,
}

impl CleanupNotice {
    /// 削除するか残すかをユーザーに確認する必要があるか
    pub fn needs_cleanup(&self) -> bool {
        self.count > 0
    }
}

/// 第1階層: 月ごとの支出一覧
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub groups: Vec<AggregationNode<MonthKey>>,
    pub total: f64,
    /// 支払いのある月数（0除算を避けるため最小1）
    pub month_count: usize,
    pub average: f64,
    pub cleanup: CleanupNotice,
}

impl Overview {
    /// 空状態を表示すべきかどうか（ゼロ値のグラフは出さない）
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// 第2階層: 選択した月の日ごとの支出
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthDetail {
    pub month: MonthKey,
    pub label: String,
    pub groups: Vec<AggregationNode<DayBarKey>>,
    pub total: f64,
    pub cleanup: CleanupNotice,
}

/// 第3階層: 選択した日のサービスごとの支出
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    pub day: DayKey,
    pub label: String,
    pub groups: Vec<AggregationNode<SubscriptionGroupKey>>,
    pub total: f64,
    pub cleanup: CleanupNotice,
}

/// 表示中の階層
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "key", rename_all = "camelCase")]
pub enum SpendLevel {
    Overview,
    Month(MonthKey),
    Day(DayKey),
}

impl SpendLevel {
    /// 1つ上の階層（最上位では None）
    ///
    /// 日から戻るときは日キーから所属する月を復元する。
    pub fn parent(&self) -> Option<SpendLevel> {
        match self {
            SpendLevel::Overview => None,
            SpendLevel::Month(_) => Some(SpendLevel::Overview),
            SpendLevel::Day(day) => Some(SpendLevel::Month(day.month())),
        }
    }
}

impl From<DrillDown> for SpendLevel {
    fn from(target: DrillDown) -> Self {
        match target {
            DrillDown::Month(month) => SpendLevel::Month(month),
            DrillDown::Day(day) => SpendLevel::Day(day),
        }
    }
}

/// 階層ごとの集計結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "level", rename_all = "camelCase")]
pub enum SpendView {
    Overview(Overview),
    Month(MonthDetail),
    Day(DayDetail),
}

impl SpendView {
    /// この集計結果の階層
    pub fn level(&self) -> SpendLevel {
        match self {
            SpendView::Overview(_) => SpendLevel::Overview,
            SpendView::Month(detail) => SpendLevel::Month(detail.month),
            SpendView::Day(detail) => SpendLevel::Day(detail.day),
        }
    }

    pub fn total(&self) -> f64 {
        match self {
            SpendView::Overview(overview) => overview.total,
            SpendView::Month(detail) => detail.total,
            SpendView::Day(detail) => detail.total,
        }
    }
}

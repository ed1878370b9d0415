use super::currency::currency_symbol;
use super::models::{
    AggregationNode, CleanupNotice, DayBarKey, DayDetail, DayKey, DrillDown, MonthDetail,
    MonthKey, Overview, SpendLevel, SpendView, SubscriptionGroupKey,
};
use crate::features::dates::DateNormalizer;
use crate::features::subscriptions::PaymentRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 月ラベルの書式（例: "Mar 2024"）
const MONTH_LABEL_FORMAT: &str = "%b %Y";
/// 日ラベルの書式（例: "Mar 10"）
const DAY_LABEL_FORMAT: &str = "%b %-d";

/// 集計対象として有効な支払いと、そのローカル日付
struct DatedPayment<'a> {
    payment: &'a PaymentRecord,
    name: &'a str,
    date: NaiveDate,
}

/// 1グループ分の集計途中の値
struct GroupTotal<'a> {
    total: f64,
    count: usize,
    /// 最も古い支払い（ラベル・通貨記号の代表）
    earliest: &'a DatedPayment<'a>,
}

impl<'a> GroupTotal<'a> {
    fn new(first: &'a DatedPayment<'a>) -> Self {
        Self {
            total: 0.0,
            count: 0,
            earliest: first,
        }
    }

    fn add(&mut self, entry: &'a DatedPayment<'a>) {
        self.total += entry.payment.amount;
        self.count += 1;
        if representative_order(entry) < representative_order(self.earliest) {
            self.earliest = entry;
        }
    }
}

/// 代表の選び方: 日時が最も古いもの、同時刻なら通貨・ID の順
fn representative_order<'a>(
    entry: &'a DatedPayment<'a>,
) -> (chrono::DateTime<chrono::Utc>, &'a str, &'a str) {
    (
        entry.payment.date,
        entry.payment.currency.as_str(),
        entry.payment.id.as_str(),
    )
}

/// キーごとに合計する（BTreeMap なのでキー順に並ぶ）
fn group_by<'a, K, F>(entries: &'a [DatedPayment<'a>], key_of: F) -> BTreeMap<K, GroupTotal<'a>>
where
    K: Ord,
    F: Fn(&DatedPayment<'a>) -> K,
{
    let mut groups: BTreeMap<K, GroupTotal<'a>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(key_of(entry))
            .or_insert_with(|| GroupTotal::new(entry))
            .add(entry);
    }
    groups
}

fn sum_amounts(entries: &[DatedPayment<'_>]) -> f64 {
    entries.iter().map(|entry| entry.payment.amount).sum()
}

/// 支払い記録をドリルダウン形式で集計するコンポーネント
///
/// 毎回渡された支払い一覧から集計し直すため、階層を移動する間に
/// 記録が削除されても古い集計が残ることはない。
#[derive(Debug, Clone, Copy)]
pub struct SpendAggregator {
    normalizer: DateNormalizer,
}

impl SpendAggregator {
    pub fn new(normalizer: DateNormalizer) -> Self {
        Self { normalizer }
    }

    /// サービス名が欠けた記録を数える（集計とは独立に確認したい場合）
    pub fn cleanup_notice(&self, payments: &[PaymentRecord]) -> CleanupNotice {
        self.partition(payments).1
    }

    /// 有効な記録と整理が必要な記録に分ける
    fn partition<'a>(&self, payments: &'a [PaymentRecord]) -> (Vec<DatedPayment<'a>>, CleanupNotice) {
        let mut valid = Vec::with_capacity(payments.len());
        let mut cleanup = CleanupNotice::default();

        for payment in payments {
            match payment.valid_name() {
                Some(name) => valid.push(DatedPayment {
                    payment,
                    name,
                    date: self.normalizer.local_date(payment.date),
                }),
                None => {
                    cleanup.count += 1;
                    cleanup.payment_ids.push(payment.id.clone());
                }
            }
        }

        if cleanup.needs_cleanup() {
            log::warn!(
                "サービス名のない支払い記録を集計から除外しました: {}件",
                cleanup.count
            );
        }

        (valid, cleanup)
    }

    /// 第1階層: 月ごとの集計
    pub fn overview(&self, payments: &[PaymentRecord]) -> Overview {
        let (entries, cleanup) = self.partition(payments);

        let groups: Vec<AggregationNode<MonthKey>> = group_by(&entries, |e| MonthKey::of(e.date))
            .into_iter()
            .map(|(key, group)| {
                build_node(
                    key,
                    group.earliest.date.format(MONTH_LABEL_FORMAT).to_string(),
                    &group,
                    Some(DrillDown::Month(key)),
                )
            })
            .collect();

        let total = sum_amounts(&entries);
        let month_count = groups.len().max(1);

        log::debug!(
            "月別集計を作成しました: payments={}, months={}, total={total}",
            entries.len(),
            groups.len()
        );

        Overview {
            groups,
            total,
            month_count,
            average: total / month_count as f64,
            cleanup,
        }
    }

    /// 第2階層: 指定月の日 × 通貨ごとの集計
    pub fn month_detail(&self, payments: &[PaymentRecord], month: MonthKey) -> MonthDetail {
        let (entries, cleanup) = self.partition(payments);
        let entries: Vec<DatedPayment<'_>> = entries
            .into_iter()
            .filter(|entry| month.contains(entry.date))
            .collect();

        let groups = group_by(&entries, |e| DayBarKey {
            day: DayKey::of(e.date),
            currency: e.payment.currency.clone(),
        })
        .into_iter()
        .map(|(key, group)| {
            let label = group.earliest.date.format(DAY_LABEL_FORMAT).to_string();
            let target = DrillDown::Day(key.day);
            build_node(key, label, &group, Some(target))
        })
        .collect();

        MonthDetail {
            month,
            label: month_label(month),
            groups,
            total: sum_amounts(&entries),
            cleanup,
        }
    }

    /// 第3階層: 指定日のサービス名 × 通貨ごとの集計（最小粒度）
    pub fn day_detail(&self, payments: &[PaymentRecord], day: DayKey) -> DayDetail {
        let (entries, cleanup) = self.partition(payments);
        let entries: Vec<DatedPayment<'_>> = entries
            .into_iter()
            .filter(|entry| day.contains(entry.date))
            .collect();

        let groups = group_by(&entries, |e| SubscriptionGroupKey {
            name: e.name.to_string(),
            currency: e.payment.currency.clone(),
        })
        .into_iter()
        .map(|(key, group)| {
            let label = key.name.clone();
            build_node(key, label, &group, None)
        })
        .collect();

        DayDetail {
            day,
            label: day_label(day),
            groups,
            total: sum_amounts(&entries),
            cleanup,
        }
    }

    /// 指定した階層の集計を現在の支払い一覧から作成する
    pub fn view(&self, payments: &[PaymentRecord], level: SpendLevel) -> SpendView {
        match level {
            SpendLevel::Overview => SpendView::Overview(self.overview(payments)),
            SpendLevel::Month(month) => SpendView::Month(self.month_detail(payments, month)),
            SpendLevel::Day(day) => SpendView::Day(self.day_detail(payments, day)),
        }
    }

    /// 1つ上の階層へ戻る
    ///
    /// 直前の集計を使い回さず、現在の支払い一覧で親階層を作り直す。
    /// 最上位にいる場合は月別集計を返す。
    pub fn navigate_up(&self, payments: &[PaymentRecord], current: SpendLevel) -> SpendView {
        self.view(payments, current.parent().unwrap_or(SpendLevel::Overview))
    }
}

fn build_node<K>(
    key: K,
    label: String,
    group: &GroupTotal<'_>,
    drill_down: Option<DrillDown>,
) -> AggregationNode<K> {
    let currency = group.earliest.payment.currency.clone();
    AggregationNode {
        key,
        label,
        total: group.total,
        currency_symbol: currency_symbol(&currency),
        currency,
        payment_count: group.count,
        drill_down,
    }
}

fn month_label(month: MonthKey) -> String {
    NaiveDate::from_ymd_opt(month.year, month.month, 1)
        .map(|date| date.format(MONTH_LABEL_FORMAT).to_string())
        .unwrap_or_else(|| month.to_string())
}

fn day_label(day: DayKey) -> String {
    NaiveDate::from_ymd_opt(day.year, day.month, day.day)
        .map(|date| date.format(DAY_LABEL_FORMAT).to_string())
        .unwrap_or_else(|| day.to_string())
}

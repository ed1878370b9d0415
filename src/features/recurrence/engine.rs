use super::models::Recurrence;
use crate::features::dates::{DateNormalizer, NormalizedDate};
use chrono::{DateTime, Utc};

/// 追いつき計算で繰り返す最大回数（毎日なら約27年分）
const MAX_CATCH_UP_STEPS: usize = 10_000;

/// 次回支払日を計算するエンジン
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceEngine {
    normalizer: DateNormalizer,
}

impl RecurrenceEngine {
    /// 正規化器を指定してエンジンを作成
    pub fn new(normalizer: DateNormalizer) -> Self {
        Self { normalizer }
    }

    /// 内部で使用している正規化器
    pub fn normalizer(&self) -> &DateNormalizer {
        &self.normalizer
    }

    /// 次回支払日を計算する
    ///
    /// # 引数
    /// * `from` - 現在の支払日（正規化前でもよい）
    /// * `recurrence` - 繰り返し設定
    ///
    /// # 戻り値
    /// ローカル正午の次回支払日、Custom の場合は None
    pub fn next_due_date(
        &self,
        from: DateTime<Utc>,
        recurrence: &Recurrence,
    ) -> Option<NormalizedDate> {
        let base = self.normalizer.normalize(from);
        self.advance(&base, recurrence)
    }

    /// 記述子文字列を受け取って次回支払日を計算する
    pub fn next_due_date_str(&self, from: DateTime<Utc>, descriptor: &str) -> Option<NormalizedDate> {
        self.next_due_date(from, &Recurrence::parse(descriptor))
    }

    /// 正規化済みの支払日を1周期進める
    ///
    /// 加算結果が表現可能な範囲を超える場合は元の日付を返す。
    pub fn advance(&self, base: &NormalizedDate, recurrence: &Recurrence) -> Option<NormalizedDate> {
        let (unit, step) = match recurrence {
            Recurrence::Custom => return None,
            Recurrence::Fixed(unit) => (*unit, 1),
            Recurrence::Every { unit, step } => (*unit, (*step).max(1)),
        };

        let next = unit.add_to(base.date(), step).unwrap_or_else(|| {
            log::warn!(
                "次回支払日が表現可能な範囲を超えるため据え置きます: base={}, recurrence={recurrence}",
                base.date()
            );
            base.date()
        });

        log::debug!("次回支払日を計算しました: {} + {recurrence} -> {next}", base.date());
        Some(self.normalizer.at_local_noon(next))
    }

    /// 支払日が `not_before` 以降になるまで周期を進める
    ///
    /// 自動支払いで支払日が過去のまま残っている場合の追いつき計算に使う。
    ///
    /// # 戻り値
    /// `not_before` と同日以降の支払日、Custom の場合は None
    pub fn advance_until(
        &self,
        from: DateTime<Utc>,
        recurrence: &Recurrence,
        not_before: DateTime<Utc>,
    ) -> Option<NormalizedDate> {
        if !recurrence.is_periodic() {
            return None;
        }

        let target = self.normalizer.normalize(not_before).date();
        let mut due = self.normalizer.normalize(from);

        for _ in 0..MAX_CATCH_UP_STEPS {
            if due.date() >= target {
                return Some(due);
            }
            let next = self.advance(&due, recurrence)?;
            if next == due {
                // 範囲外で進めなくなった
                return Some(due);
            }
            due = next;
        }

        log::warn!(
            "追いつき計算が上限回数に達しました: recurrence={recurrence}, due={}",
            due.date()
        );
        Some(due)
    }
}

use crate::shared::config::EnvironmentConfig;
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;

/// 正規化後の時刻（ローカル正午）
const LOCAL_NOON_HOUR: u32 = 12;
/// ローカル正午が存在しない場合に探索する日数
const GAP_SEARCH_DAYS: usize = 3;

/// ローカル正午に正規化された日付
///
/// 常に設定タイムゾーンの 12:00:00.000 を保持する。
/// 深夜0時付近の日付跨ぎによる1日ずれを防ぐための表現。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedDate(DateTime<Tz>);

impl NormalizedDate {
    /// カレンダー上の日付
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// ローカルタイムゾーン付きの日時
    pub fn as_datetime(&self) -> &DateTime<Tz> {
        &self.0
    }

    /// UTC の日時に変換する
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// エポックミリ秒（UTC）
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// 正規化に使用したタイムゾーン
    pub fn timezone(&self) -> Tz {
        self.0.timezone()
    }

    /// `other` までの暦日数（過ぎている場合は負の値）
    pub fn days_until(&self, other: &NormalizedDate) -> i64 {
        (other.date() - self.date()).num_days()
    }
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// 境界を越えるときはエポックミリ秒で表現する
impl Serialize for NormalizedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.timestamp_millis())
    }
}

/// 日付の正規化を行うコンポーネント
///
/// 生のタイムスタンプを解釈するのはこの型だけ。
/// 他のコンポーネントは必ずここを経由して日付を得る。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    tz: Tz,
}

impl DateNormalizer {
    /// 指定したタイムゾーンを「ローカル」として扱う正規化器を作成
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// 環境設定のタイムゾーンから正規化器を作成
    ///
    /// # 戻り値
    /// 正規化器、またはタイムゾーン名が不正な場合は設定エラー
    pub fn from_config(config: &EnvironmentConfig) -> AppResult<Self> {
        Ok(Self::new(config.timezone()?))
    }

    /// ローカルタイムゾーン
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// タイムスタンプをローカル正午に正規化する
    ///
    /// # 判定ロジック
    /// 1. 既にローカル正午であればローカル日付をそのまま使う（冪等性の保証）
    /// 2. UTC の時刻がちょうど 00:00:00.000 なら UTC の日付を使う
    ///    （常に UTC 深夜0時を返す旧日付ピッカーの保存形式）
    /// 3. それ以外はローカル日付を使う
    /// 4. 決定した日付のローカル正午を返す
    pub fn normalize(&self, instant: DateTime<Utc>) -> NormalizedDate {
        let local = instant.with_timezone(&self.tz);

        let date = if local.time() == noon_time() {
            local.date_naive()
        } else if is_utc_midnight(&instant) {
            instant.date_naive()
        } else {
            local.date_naive()
        };

        self.at_local_noon(date)
    }

    /// エポックミリ秒を受け取って正規化する
    ///
    /// # 戻り値
    /// 正規化済み日付、または表現できない範囲の値の場合はバリデーションエラー
    pub fn normalize_millis(&self, millis: i64) -> AppResult<NormalizedDate> {
        Ok(self.normalize(instant_from_millis(millis)?))
    }

    /// カレンダー日付をローカル正午の正規化済み日付にする
    ///
    /// 正午が存在しない日（夏時間の切り替え、日付変更線の移動で消えた日）は
    /// 同じ日の以降の時刻、それも無ければ翌日以降の正午を採用する。
    pub fn at_local_noon(&self, date: NaiveDate) -> NormalizedDate {
        let resolved = date
            .iter_days()
            .take(GAP_SEARCH_DAYS)
            .flat_map(|day| {
                (LOCAL_NOON_HOUR..24).filter_map(move |hour| day.and_hms_opt(hour, 0, 0))
            })
            .find_map(|naive| self.tz.from_local_datetime(&naive).earliest());

        let local = resolved
            .unwrap_or_else(|| self.tz.from_utc_datetime(&date.and_time(noon_time())));
        NormalizedDate(local)
    }

    /// 日付ピッカーへ渡す値（UTC 深夜0時のエポックミリ秒）に変換する
    pub fn to_picker_selection(&self, instant: DateTime<Utc>) -> i64 {
        let date = self.normalize(instant).date();
        Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
            .timestamp_millis()
    }

    /// 日付ピッカーの選択値（UTC 深夜0時のエポックミリ秒）を正規化済み日付にする
    pub fn from_picker_selection(&self, millis: i64) -> AppResult<NormalizedDate> {
        let instant = instant_from_millis(millis)?;
        Ok(self.at_local_noon(instant.date_naive()))
    }

    /// ローカルのカレンダー日付（正規化を行わない単純な射影）
    ///
    /// 支払い記録の日付は作成時点の具体的な日時なので、集計ではこちらを使う。
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }
}

/// エポックミリ秒を UTC 日時に変換する
pub fn instant_from_millis(millis: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        AppError::validation(format!("日時として扱えない値です: {millis}"))
    })
}

fn noon_time() -> NaiveTime {
    NaiveTime::from_hms_opt(LOCAL_NOON_HOUR, 0, 0).unwrap_or_default()
}

fn is_utc_midnight(instant: &DateTime<Utc>) -> bool {
    instant.num_seconds_from_midnight() == 0 && instant.nanosecond() == 0
}

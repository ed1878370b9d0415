use chrono::{Days, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// "Every <N> <Unit>" 形式の記述子
static EVERY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^every\s+(\S+)\s+(\S+)$").expect("繰り返し記述子の正規表現が不正です")
});

/// 繰り返しの単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecurrenceUnit {
    Day,
    Week,
    /// 長さが変わる暦月
    Month,
    Year,
}

impl RecurrenceUnit {
    /// 全単位（テスト・UI の選択肢用）
    pub const ALL: [RecurrenceUnit; 4] = [
        RecurrenceUnit::Month,
        RecurrenceUnit::Year,
        RecurrenceUnit::Week,
        RecurrenceUnit::Day,
    ];

    /// 頻度1のときのキーワード（"Monthly" など）
    pub fn keyword(&self) -> &'static str {
        match self {
            RecurrenceUnit::Day => "Daily",
            RecurrenceUnit::Week => "Weekly",
            RecurrenceUnit::Month => "Monthly",
            RecurrenceUnit::Year => "Yearly",
        }
    }

    /// "Every N" 形式で使う複数形（"Months" など）
    pub fn plural(&self) -> &'static str {
        match self {
            RecurrenceUnit::Day => "Days",
            RecurrenceUnit::Week => "Weeks",
            RecurrenceUnit::Month => "Months",
            RecurrenceUnit::Year => "Years",
        }
    }

    /// 単位名を解析する
    ///
    /// キーワード・単数形・複数形のいずれも受け付け、大文字小文字は区別しない。
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "days" => Some(RecurrenceUnit::Day),
            "weekly" | "week" | "weeks" => Some(RecurrenceUnit::Week),
            "monthly" | "month" | "months" => Some(RecurrenceUnit::Month),
            "yearly" | "year" | "years" => Some(RecurrenceUnit::Year),
            _ => None,
        }
    }

    /// 日付に `step` 単位を加算する
    ///
    /// 月・年の加算は月末に丸める（1/31 + 1ヶ月 = 2月末日、2/29 + 1年 = 2/28）。
    ///
    /// # 戻り値
    /// 加算後の日付、または表現可能な範囲を超えた場合は None
    pub fn add_to(&self, date: NaiveDate, step: u32) -> Option<NaiveDate> {
        match self {
            RecurrenceUnit::Day => date.checked_add_days(Days::new(u64::from(step))),
            RecurrenceUnit::Week => date.checked_add_days(Days::new(u64::from(step) * 7)),
            RecurrenceUnit::Month => date.checked_add_months(Months::new(step)),
            RecurrenceUnit::Year => step
                .checked_mul(12)
                .and_then(|months| date.checked_add_months(Months::new(months))),
        }
    }

    /// 1単位あたりの月数換算
    fn months_per_unit(&self) -> f64 {
        match self {
            RecurrenceUnit::Day => 12.0 / 365.0,
            RecurrenceUnit::Week => 12.0 / 52.0,
            RecurrenceUnit::Month => 1.0,
            RecurrenceUnit::Year => 12.0,
        }
    }
}

/// サブスクリプションの繰り返し設定
///
/// 文字列の記述子はシリアライズ境界でのみ扱い、内部ではこの型を使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recurrence {
    /// 自動で次回支払日を決めない
    Custom,
    /// 1単位ごと（"Monthly" など）
    Fixed(RecurrenceUnit),
    /// N単位ごと（"Every 3 Months" など）
    Every { unit: RecurrenceUnit, step: u32 },
}

impl Default for Recurrence {
    fn default() -> Self {
        Recurrence::Fixed(RecurrenceUnit::Month)
    }
}

impl Recurrence {
    /// N単位ごとの繰り返しを作成する
    ///
    /// `step` が1以下の場合は `Fixed` に正規化する。
    pub fn every(unit: RecurrenceUnit, step: u32) -> Self {
        if step <= 1 {
            Recurrence::Fixed(unit)
        } else {
            Recurrence::Every { unit, step }
        }
    }

    /// 記述子文字列を解析する
    ///
    /// 解析は失敗しない。解釈できない部分は次の規則でフォールバックする:
    /// - 不明な記述子は毎月（Monthly）
    /// - "Every" の N が数値でない・0 の場合は 1
    /// - "Every" の単位が不明な場合は月
    pub fn parse(descriptor: &str) -> Self {
        let trimmed = descriptor.trim();

        if trimmed.eq_ignore_ascii_case("custom") {
            return Recurrence::Custom;
        }

        if let Some(captures) = EVERY_PATTERN.captures(trimmed) {
            let step = match captures[1].parse::<u32>() {
                Ok(step) if step > 0 => step,
                _ => {
                    log::warn!("繰り返し頻度を解釈できないため1として扱います: {descriptor}");
                    1
                }
            };
            let unit = RecurrenceUnit::from_name(&captures[2]).unwrap_or_else(|| {
                log::warn!("繰り返し単位を解釈できないため月として扱います: {descriptor}");
                RecurrenceUnit::Month
            });
            return Recurrence::every(unit, step);
        }

        match RecurrenceUnit::from_name(trimmed) {
            Some(unit) if is_keyword(trimmed) => Recurrence::Fixed(unit),
            _ => {
                log::warn!("不明な繰り返し記述子のため毎月として扱います: {descriptor}");
                Recurrence::default()
            }
        }
    }

    /// 繰り返しの単位（Custom は None）
    pub fn unit(&self) -> Option<RecurrenceUnit> {
        match self {
            Recurrence::Custom => None,
            Recurrence::Fixed(unit) | Recurrence::Every { unit, .. } => Some(*unit),
        }
    }

    /// 1回あたりに進む単位数（Custom は None）
    pub fn step(&self) -> Option<u32> {
        match self {
            Recurrence::Custom => None,
            Recurrence::Fixed(_) => Some(1),
            Recurrence::Every { step, .. } => Some(*step),
        }
    }

    /// 自動で次回支払日が進むかどうか
    pub fn is_periodic(&self) -> bool {
        !matches!(self, Recurrence::Custom)
    }

    /// 月額換算の係数
    ///
    /// 金額にこの係数を掛けると1ヶ月あたりの金額になる。Custom は 0。
    pub fn monthly_factor(&self) -> f64 {
        match (self.unit(), self.step()) {
            (Some(unit), Some(step)) => 1.0 / (unit.months_per_unit() * f64::from(step)),
            _ => 0.0,
        }
    }
}

/// "Monthly" などの単独キーワードかどうか（"Month" 単体は記述子として認めない）
fn is_keyword(text: &str) -> bool {
    RecurrenceUnit::ALL
        .iter()
        .any(|unit| unit.keyword().eq_ignore_ascii_case(text))
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Custom => f.write_str("Custom"),
            Recurrence::Fixed(unit) => f.write_str(unit.keyword()),
            Recurrence::Every { unit, step } => write!(f, "Every {step} {}", unit.plural()),
        }
    }
}

impl FromStr for Recurrence {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Recurrence::parse(s))
    }
}

impl Serialize for Recurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let descriptor = String::deserialize(deserializer)?;
        Ok(Recurrence::parse(&descriptor))
    }
}

/// UI の単位選択と頻度から記述子文字列を作成する
///
/// # 引数
/// * `unit` - "Monthly" / "Yearly" / "Weekly" / "Daily" / "Custom"
/// * `frequency` - 頻度（0 は 1 として扱う）
///
/// # 戻り値
/// - unit が "Custom" の場合は常に "Custom"
/// - 頻度1の場合は単位キーワード（"Monthly"）
/// - 頻度2以上の場合は "Every <頻度> <複数形>"（"Every 3 Months"）
pub fn describe_recurrence(unit: &str, frequency: u32) -> String {
    if unit.trim().eq_ignore_ascii_case("custom") {
        return Recurrence::Custom.to_string();
    }

    let unit = RecurrenceUnit::from_name(unit).unwrap_or_else(|| {
        log::warn!("不明な繰り返し単位のため月として扱います: {unit}");
        RecurrenceUnit::Month
    });

    Recurrence::every(unit, frequency.max(1)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Recurrence::parse("Custom"), Recurrence::Custom);
        assert_eq!(
            Recurrence::parse("Monthly"),
            Recurrence::Fixed(RecurrenceUnit::Month)
        );
        assert_eq!(
            Recurrence::parse("Yearly"),
            Recurrence::Fixed(RecurrenceUnit::Year)
        );
        assert_eq!(
            Recurrence::parse("Weekly"),
            Recurrence::Fixed(RecurrenceUnit::Week)
        );
        assert_eq!(
            Recurrence::parse(" daily "),
            Recurrence::Fixed(RecurrenceUnit::Day)
        );
    }

    #[test]
    fn test_parse_every_singular_and_plural() {
        let expected = Recurrence::Every {
            unit: RecurrenceUnit::Week,
            step: 2,
        };
        assert_eq!(Recurrence::parse("Every 2 Weeks"), expected);
        assert_eq!(Recurrence::parse("Every 2 Week"), expected);
        assert_eq!(Recurrence::parse("every  2  weeks"), expected);
    }

    #[test]
    fn test_parse_every_one_is_fixed() {
        assert_eq!(
            Recurrence::parse("Every 1 Year"),
            Recurrence::Fixed(RecurrenceUnit::Year)
        );
    }

    #[test]
    fn test_parse_fallbacks() {
        // 数値でない頻度 → 1
        assert_eq!(
            Recurrence::parse("Every two Days"),
            Recurrence::Fixed(RecurrenceUnit::Day)
        );
        // 0 の頻度 → 1
        assert_eq!(
            Recurrence::parse("Every 0 Weeks"),
            Recurrence::Fixed(RecurrenceUnit::Week)
        );
        // 不明な単位 → 月
        assert_eq!(
            Recurrence::parse("Every 3 Fortnights"),
            Recurrence::Every {
                unit: RecurrenceUnit::Month,
                step: 3
            }
        );
        // 不明な記述子 → 毎月
        assert_eq!(Recurrence::parse("Quarterly"), Recurrence::default());
        assert_eq!(Recurrence::parse(""), Recurrence::default());
        assert_eq!(Recurrence::parse("Month"), Recurrence::default());
        assert_eq!(Recurrence::parse("Every Month"), Recurrence::default());
    }

    #[test]
    fn test_display() {
        assert_eq!(Recurrence::Custom.to_string(), "Custom");
        assert_eq!(
            Recurrence::Fixed(RecurrenceUnit::Year).to_string(),
            "Yearly"
        );
        assert_eq!(
            Recurrence::every(RecurrenceUnit::Day, 10).to_string(),
            "Every 10 Days"
        );
    }

    #[test]
    fn test_describe_recurrence() {
        assert_eq!(describe_recurrence("Monthly", 1), "Monthly");
        assert_eq!(describe_recurrence("Monthly", 3), "Every 3 Months");
        assert_eq!(describe_recurrence("Weekly", 2), "Every 2 Weeks");
        assert_eq!(describe_recurrence("Yearly", 0), "Yearly");
        assert_eq!(describe_recurrence("Custom", 1), "Custom");
        assert_eq!(describe_recurrence("Custom", 7), "Custom");
        assert_eq!(describe_recurrence("Hourly", 4), "Every 4 Months");
    }

    #[test]
    fn test_add_to_clamps_month_end() {
        let jan_31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            RecurrenceUnit::Month.add_to(jan_31, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        let feb_29 = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            RecurrenceUnit::Year.add_to(feb_29, 1),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
    }

    #[test]
    fn test_add_to_overflow_is_none() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(RecurrenceUnit::Year.add_to(date, u32::MAX), None);
    }

    #[test]
    fn test_monthly_factor() {
        assert_eq!(Recurrence::Custom.monthly_factor(), 0.0);
        assert_eq!(Recurrence::parse("Monthly").monthly_factor(), 1.0);
        assert!((Recurrence::parse("Yearly").monthly_factor() - 1.0 / 12.0).abs() < 1e-12);
        assert!((Recurrence::parse("Every 3 Months").monthly_factor() - 1.0 / 3.0).abs() < 1e-12);
        assert!((Recurrence::parse("Weekly").monthly_factor() - 52.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_serde_as_descriptor_string() {
        let recurrence = Recurrence::every(RecurrenceUnit::Month, 6);
        let json = serde_json::to_string(&recurrence).unwrap();
        assert_eq!(json, "\"Every 6 Months\"");

        let parsed: Recurrence = serde_json::from_str("\"Weekly\"").unwrap();
        assert_eq!(parsed, Recurrence::Fixed(RecurrenceUnit::Week));
    }
}

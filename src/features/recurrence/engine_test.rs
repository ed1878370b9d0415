//! 繰り返し計算のプロパティテスト
//!
//! 記述子のエンコード／デコードの往復と、任意の日付での Custom・正午不変条件を検証します。

#[cfg(test)]
mod engine_test {
    use crate::features::dates::{DateNormalizer, NormalizedDate};
    use crate::features::recurrence::{describe_recurrence, Recurrence, RecurrenceEngine, RecurrenceUnit};
    use chrono::{DateTime, NaiveDate, NaiveTime};
    use chrono_tz::Tz;
    use quickcheck_macros::quickcheck;

    const ZONES: &[Tz] = &[
        chrono_tz::Asia::Tokyo,
        chrono_tz::America::New_York,
        chrono_tz::Europe::Berlin,
        chrono_tz::Australia::Sydney,
    ];

    /// 1970-01-01 から 2100-01-01 まで
    const RANGE_MILLIS: i64 = 4_102_444_800_000;

    fn engine(selector: u8) -> RecurrenceEngine {
        RecurrenceEngine::new(DateNormalizer::new(ZONES[selector as usize % ZONES.len()]))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon_of(engine: &RecurrenceEngine, d: NaiveDate) -> NormalizedDate {
        engine.normalizer().at_local_noon(d)
    }

    #[quickcheck]
    fn custom_never_has_successor(raw: i64, selector: u8) -> bool {
        let from = DateTime::from_timestamp_millis(raw.rem_euclid(RANGE_MILLIS)).unwrap();
        engine(selector).next_due_date_str(from, "Custom").is_none()
    }

    #[quickcheck]
    fn next_due_date_is_local_noon(raw: i64, selector: u8, unit_index: u8, frequency: u8) -> bool {
        let from = DateTime::from_timestamp_millis(raw.rem_euclid(RANGE_MILLIS)).unwrap();
        let unit = RecurrenceUnit::ALL[unit_index as usize % RecurrenceUnit::ALL.len()];
        let recurrence = Recurrence::every(unit, u32::from(frequency));
        let next = engine(selector).next_due_date(from, &recurrence).unwrap();
        next.as_datetime().time() == NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[quickcheck]
    fn next_due_date_moves_forward(raw: i64, selector: u8, unit_index: u8, frequency: u8) -> bool {
        let engine = engine(selector);
        let from = DateTime::from_timestamp_millis(raw.rem_euclid(RANGE_MILLIS)).unwrap();
        let unit = RecurrenceUnit::ALL[unit_index as usize % RecurrenceUnit::ALL.len()];
        let recurrence = Recurrence::every(unit, u32::from(frequency));
        let base = engine.normalizer().normalize(from);
        engine.next_due_date(from, &recurrence).unwrap().date() > base.date()
    }

    #[quickcheck]
    fn describe_then_parse_round_trips(unit_index: u8, frequency: u16) -> bool {
        let unit = RecurrenceUnit::ALL[unit_index as usize % RecurrenceUnit::ALL.len()];
        let frequency = u32::from(frequency).max(1);
        let parsed = Recurrence::parse(&describe_recurrence(unit.keyword(), frequency));
        parsed.unit() == Some(unit) && parsed.step() == Some(frequency)
    }

    #[quickcheck]
    fn next_due_date_is_deterministic(raw: i64, selector: u8) -> bool {
        let engine = engine(selector);
        let from = DateTime::from_timestamp_millis(raw.rem_euclid(RANGE_MILLIS)).unwrap();
        engine.next_due_date_str(from, "Every 2 Weeks")
            == engine.next_due_date_str(from, "Every 2 Weeks")
    }

    /// エンコードした記述子で計算すると、ちょうど頻度分だけ進む
    #[test]
    fn test_encoded_descriptor_advances_by_frequency() {
        let base = date(2024, 1, 15);
        let cases = [
            ("Monthly", 1, date(2024, 2, 15)),
            ("Monthly", 2, date(2024, 3, 15)),
            ("Monthly", 5, date(2024, 6, 15)),
            ("Yearly", 1, date(2025, 1, 15)),
            ("Yearly", 2, date(2026, 1, 15)),
            ("Yearly", 5, date(2029, 1, 15)),
            ("Weekly", 1, date(2024, 1, 22)),
            ("Weekly", 2, date(2024, 1, 29)),
            ("Weekly", 5, date(2024, 2, 19)),
            ("Daily", 1, date(2024, 1, 16)),
            ("Daily", 2, date(2024, 1, 17)),
            ("Daily", 5, date(2024, 1, 20)),
        ];

        for selector in 0..ZONES.len() as u8 {
            let engine = engine(selector);
            let from = noon_of(&engine, base).to_utc();
            for (unit, frequency, expected) in cases {
                let descriptor = describe_recurrence(unit, frequency);
                let next = engine.next_due_date_str(from, &descriptor);
                assert_eq!(
                    next,
                    Some(noon_of(&engine, expected)),
                    "descriptor={descriptor}, zone={:?}",
                    engine.normalizer().timezone()
                );
            }
        }
    }

    /// シナリオ: 1/31 の毎月払いは2月の末日に丸められる
    #[test]
    fn test_month_end_rollover_lands_on_last_day_of_february() {
        let engine = engine(0);
        let next = engine
            .next_due_date_str(noon_of(&engine, date(2024, 1, 31)).to_utc(), "Monthly")
            .unwrap();
        assert_eq!(next.date(), date(2024, 2, 29));

        let next = engine
            .next_due_date_str(noon_of(&engine, date(2025, 1, 31)).to_utc(), "Monthly")
            .unwrap();
        assert_eq!(next.date(), date(2025, 2, 28));
    }
}

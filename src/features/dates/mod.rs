/// 日付正規化機能モジュール
///
/// 旧形式（UTC 深夜0時）とローカル日時の混在を解消し、
/// すべての日付をローカル正午の正規形に揃えます。
pub mod normalizer;


pub use normalizer::{instant_from_millis, DateNormalizer, NormalizedDate};

/// 機能別モジュール
///
/// 各機能モジュールは、その機能に関連するモデルと計算ロジックを含む自己完結型のユニットです。
/// どのモジュールも入出力を持たない純粋な計算のみを行います。
pub mod dates;
pub mod recurrence;
pub mod spending;
pub mod subscriptions;

use crate::shared::errors::{AppError, AppResult};

/// 繰り返し頻度の上限値
pub const MAX_FREQUENCY: u32 = 999;

/// 繰り返し頻度のバリデーション
///
/// # 引数
/// * `frequency` - UIから受け取った頻度（符号付き）
///
/// # 戻り値
/// 有効な頻度の場合はその値、無効な場合はエラー
///
/// # バリデーション規則
/// - 1以上であること
/// - 999以下であること
pub fn validate_frequency(frequency: i64) -> AppResult<u32> {
    if frequency < 1 {
        return Err(AppError::validation("頻度は1以上で入力してください"));
    }

    if frequency > i64::from(MAX_FREQUENCY) {
        return Err(AppError::validation(format!(
            "頻度は{MAX_FREQUENCY}以下で入力してください"
        )));
    }

    Ok(frequency as u32)
}

/// 金額のバリデーション
///
/// # 引数
/// * `amount` - 金額
///
/// # バリデーション規則
/// - 0以上の数値であること（無料トライアルを許可）
/// - 10桁以内であること
/// - 有限の値であること
pub fn validate_amount(amount: f64) -> AppResult<()> {
    if !amount.is_finite() {
        return Err(AppError::validation("無効な金額です"));
    }

    if amount < 0.0 {
        return Err(AppError::validation("金額は0以上で入力してください"));
    }

    if amount >= 10_000_000_000.0 {
        return Err(AppError::validation("金額は10桁以内で入力してください"));
    }

    Ok(())
}

/// 通貨コードのバリデーション
///
/// # バリデーション規則
/// - 英大文字3文字であること（例: "JPY", "USD"）
pub fn validate_currency_code(code: &str) -> AppResult<()> {
    if !is_currency_code_shape(code) {
        return Err(AppError::validation(format!(
            "通貨コードは英大文字3文字で入力してください（現在: {code}）"
        )));
    }
    Ok(())
}

/// 通貨コードの形式（英大文字3文字）かどうかを判定
pub fn is_currency_code_shape(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// 文字列の長さバリデーション
///
/// # 引数
/// * `text` - 検証対象の文字列
/// * `max_length` - 最大文字数
/// * `field_name` - フィールド名（エラーメッセージ用）
pub fn validate_text_length(text: &str, max_length: usize, field_name: &str) -> AppResult<()> {
    let char_count = text.chars().count();
    if char_count > max_length {
        return Err(AppError::validation(format!(
            "{field_name}は{max_length}文字以内で入力してください（現在: {char_count}文字）"
        )));
    }
    Ok(())
}

/// 必須フィールドのバリデーション
///
/// # 引数
/// * `text` - 検証対象の文字列
/// * `field_name` - フィールド名（エラーメッセージ用）
pub fn validate_required_field(text: &str, field_name: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation(format!("{field_name}は必須項目です")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_frequency() {
        assert_eq!(validate_frequency(1).unwrap(), 1);
        assert_eq!(validate_frequency(12).unwrap(), 12);
        assert_eq!(validate_frequency(999).unwrap(), 999);

        assert!(validate_frequency(0).is_err());
        assert!(validate_frequency(-3).is_err()); // 負の頻度
        assert!(validate_frequency(1000).is_err()); // 上限超過
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0).is_ok()); // 無料トライアル
        assert!(validate_amount(980.0).is_ok());
        assert!(validate_amount(9.99).is_ok());

        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(10_000_000_000.0).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
        assert!(validate_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("JPY").is_ok());
        assert!(validate_currency_code("USD").is_ok());

        assert!(validate_currency_code("usd").is_err());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("EURO").is_err());
        assert!(validate_currency_code("").is_err());
    }

    #[test]
    fn test_validate_text_length() {
        assert!(validate_text_length("Netflix", 100, "サービス名").is_ok());
        assert!(validate_text_length("", 10, "テスト").is_ok());
        assert!(validate_text_length("これは非常に長いテキストです", 5, "テスト").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        assert!(validate_required_field("Spotify", "サービス名").is_ok());
        assert!(validate_required_field("  Spotify  ", "サービス名").is_ok());

        assert!(validate_required_field("", "サービス名").is_err());
        assert!(validate_required_field("   ", "サービス名").is_err());
    }
}

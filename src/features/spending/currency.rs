use crate::shared::utils::is_currency_code_shape;

/// 通貨コードが不正な場合に表示する記号
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// 通貨コードから表示用の記号を取得する
///
/// # 戻り値
/// - 既知の通貨: 記号（"JPY" → "¥"）
/// - 未知だが形式が正しいコード: コードそのもの
/// - 形式が不正なコード: `DEFAULT_CURRENCY_SYMBOL`
pub fn currency_symbol(code: &str) -> String {
    let code = code.trim().to_ascii_uppercase();

    if let Some(symbol) = known_symbol(&code) {
        return symbol.to_string();
    }

    if is_currency_code_shape(&code) {
        code
    } else {
        log::debug!("通貨コードが不正なためデフォルト記号を使用します: {code:?}");
        DEFAULT_CURRENCY_SYMBOL.to_string()
    }
}

fn known_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "JPY" | "CNY" => "¥",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "INR" => "₹",
        "KRW" => "₩",
        "AUD" => "A$",
        "CAD" => "CA$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "SGD" => "S$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "RUB" => "₽",
        "TRY" => "₺",
        "THB" => "฿",
        "PHP" => "₱",
        "VND" => "₫",
        "ILS" => "₪",
        "UAH" => "₴",
        "PLN" => "zł",
        "IDR" => "Rp",
        "ZAR" => "R",
        "SEK" | "NOK" | "DKK" => "kr",
        _ => return None,
    };
    Some(symbol)
}

use thiserror::Error;

/// 境界処理（入力変換・設定読み込み）で使用される統一エラー型
///
/// 日付計算・繰り返し計算・集計そのものはエラーを返さない。
/// エラーになるのは外部から受け取ったデータの変換と検証のみ。
#[derive(Debug, Error)]
pub enum AppError {
    /// バリデーション関連のエラー
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// JSON解析エラー
    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（外部データの形式不正など）
    Medium,
    /// 高重要度（設定不備など）
    High,
}

impl AppError {
    /// ユーザーに表示するためのフレンドリーなメッセージを取得
    ///
    /// # 戻り値
    /// ユーザーに表示可能なエラーメッセージ
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Validation(msg) => msg,
            AppError::Configuration(_) => "設定エラーが発生しました",
            AppError::Json(_) => "データ形式の解析でエラーが発生しました",
        }
    }

    /// エラーの詳細情報を取得
    ///
    /// # 戻り値
    /// エラーの詳細情報（ログ出力用）
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::Json(_) => ErrorSeverity::Medium,
            AppError::Configuration(_) => ErrorSeverity::High,
        }
    }

    /// バリデーションエラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - バリデーションエラーメッセージ
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// 設定エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - 設定エラーメッセージ
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

/// AppErrorからStringへの変換（呼び出し側UIへの受け渡し用）
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.user_message().to_string()
    }
}

/// Result型のエイリアス（クレート全体で使用）
pub type AppResult<T> = Result<T, AppError>;

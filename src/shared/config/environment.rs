use crate::shared::errors::{AppError, AppResult};
use chrono_tz::Tz;
use std::str::FromStr;

/// タイムゾーン未設定時に使用するデフォルト値
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// デバッグモードの有効/無効
    pub debug_mode: bool,
    /// ログレベル
    pub log_level: String,
    /// 日付計算に使用するローカルタイムゾーン（IANA名）
    pub timezone: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    ///
    /// # 戻り値
    /// 環境設定
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });
        let timezone =
            std::env::var("APP_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
            timezone,
        }
    }

    /// 指定したタイムゾーンで設定を作成する（テスト・組み込み用）
    ///
    /// # 引数
    /// * `timezone` - IANAタイムゾーン名
    pub fn with_timezone<S: Into<String>>(timezone: S) -> Self {
        Self {
            environment: "development".to_string(),
            debug_mode: true,
            log_level: "debug".to_string(),
            timezone: timezone.into(),
        }
    }

    /// プロダクション環境かどうかを判定
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 開発環境かどうかを判定
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 設定されたタイムゾーンを解析する
    ///
    /// # 戻り値
    /// タイムゾーン、または名前が不正な場合は設定エラー
    pub fn timezone(&self) -> AppResult<Tz> {
        Tz::from_str(self.timezone.trim()).map_err(|e| {
            AppError::configuration(format!(
                "APP_TIMEZONE の値が不正です: {} ({e})",
                self.timezone
            ))
        })
    }

    /// 設定されたログレベルをフィルタ値に変換する
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. コンパイル時埋め込み環境変数を最優先
/// 2. 実行時環境変数 ENVIRONMENT を確認
/// 3. デバッグビルドの場合は Development
/// 4. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        let env = match embedded_env {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("環境判定: コンパイル時埋め込み値を使用 -> {embedded_env} -> {env:?}");
        return env;
    }

    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    // フォールバック: ビルド設定に基づく判定
    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

/// 環境に応じた.envファイルを読み込む
///
/// # 処理内容
/// 1. コンパイル時埋め込み環境変数をチェック
/// 2. 環境に応じた.envファイルを読み込み
/// 3. フォールバック処理
pub fn load_environment_variables() {
    if let Some(env) = option_env!("EMBEDDED_ENVIRONMENT") {
        log::info!("コンパイル時埋め込み環境設定を使用: {env}");
        return;
    }

    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    let env_file = match environment.as_str() {
        "production" => ".env.production",
        _ => ".env",
    };

    log::info!("環境: {environment}, 読み込み対象: {env_file}");

    match dotenv::from_filename(env_file) {
        Ok(_) => {
            log::info!("{env_file}ファイルを読み込みました");
        }
        Err(_) => {
            // 環境固有のファイルがない場合は、デフォルトの.envを試行
            if env_file != ".env" && dotenv::dotenv().is_ok() {
                log::warn!("{env_file}が見つからないため、デフォルトの.envファイルを読み込みました");
            } else {
                log::warn!("環境変数ファイルが見つかりません。直接設定された環境変数を使用します。");
            }
        }
    }
}

/// ログシステムを初期化する
///
/// 二回目以降の呼び出しは何もしない（テストから何度呼ばれてもよい）。
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();

    let initialized = env_logger::Builder::from_default_env()
        .filter_level(env_config.log_level_filter())
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .is_ok();

    if initialized {
        log::info!(
            "ログシステムを初期化しました: level={}, environment={}, timezone={}",
            env_config.log_level,
            env_config.environment,
            env_config.timezone
        );
    }
}

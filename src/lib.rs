//! サブスクリプション管理アプリの計算コア
//!
//! 日付の正規化、次回支払日の計算、支出のドリルダウン集計を提供します。
//! 永続化・通知・UI は呼び出し側が担当し、このクレートは純粋な計算のみを行います。

pub mod features;
pub mod shared;

pub use features::dates::{DateNormalizer, NormalizedDate};
pub use features::recurrence::{describe_recurrence, Recurrence, RecurrenceEngine, RecurrenceUnit};
pub use features::spending::{Overview, SpendAggregator, SpendLevel, SpendView};
pub use features::subscriptions::{PaymentRecord, Subscription};
pub use shared::{AppError, AppResult, EnvironmentConfig};

use log::info;

/// 設定から組み立てた計算コンポーネント一式
#[derive(Debug, Clone, Copy)]
pub struct CoreServices {
    pub normalizer: DateNormalizer,
    pub recurrence: RecurrenceEngine,
    pub spending: SpendAggregator,
}

impl CoreServices {
    /// 環境設定のタイムゾーンでコンポーネントを作成する
    pub fn from_config(config: &EnvironmentConfig) -> AppResult<Self> {
        let normalizer = DateNormalizer::from_config(config)?;
        Ok(Self {
            normalizer,
            recurrence: RecurrenceEngine::new(normalizer),
            spending: SpendAggregator::new(normalizer),
        })
    }
}

/// 環境変数の読み込み・ログ初期化を行い、計算コンポーネントを作成する
///
/// # 戻り値
/// 計算コンポーネント一式、またはタイムゾーン設定が不正な場合は設定エラー
pub fn initialize() -> AppResult<CoreServices> {
    shared::load_environment_variables();
    shared::initialize_logging_system();

    let config = EnvironmentConfig::from_env();
    let services = CoreServices::from_config(&config).map_err(|e| {
        log::error!("計算コアの初期化に失敗しました: {e}");
        e
    })?;

    info!(
        "計算コアを初期化しました: timezone={}, environment={}",
        config.timezone, config.environment
    );
    Ok(services)
}

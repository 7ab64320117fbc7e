//! 감시 파이프라인 -- 로그 추적, 분류, 전송 채널을 하나의 생명주기로 관리합니다.
//!
//! [`WatchPipeline`]은 core의 [`Pipeline`](dolphin_core::pipeline::Pipeline) trait을 구현하여
//! `dolphin-daemon`에서 start/stop/health_check로 관리됩니다.
//!
//! # 내부 아키텍처
//! ```text
//! LogTail -> LineClassifier -> mpsc(capacity 1) -> delivery
//! ```
//! 추적기와 분류기(UUID 캐시 포함)는 하나의 생산자 태스크가 단독으로 소유합니다.
//! 채널이 가득 차면 생산자는 전송 단계가 메시지를 가져갈 때까지 대기하므로,
//! 느린 전송 단계는 로그 읽기 속도를 늦춥니다.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use dolphin_core::error::{DolphinError, PipelineError};
use dolphin_core::event::MinecraftMessage;
use dolphin_core::pipeline::{HealthStatus, Pipeline};

use crate::classifier::LineClassifier;
use crate::config::WatchConfig;
use crate::error::LogWatcherError;
use crate::tail::LogTail;

/// 파이프라인 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    /// 초기화됨, 아직 시작하지 않음
    Initialized,
    /// 실행 중
    Running,
    /// 정지됨
    Stopped,
}

/// 생산자 태스크 결과 (전송한 메시지 수)
type ProducerHandle = JoinHandle<Result<u64, LogWatcherError>>;

/// Minecraft 로그 감시 파이프라인
///
/// # 사용 예시
/// ```ignore
/// use dolphin_log_watcher::{WatchConfig, WatchPipelineBuilder};
/// use dolphin_core::pipeline::Pipeline;
///
/// let (mut pipeline, rx) = WatchPipelineBuilder::new()
///     .config(WatchConfig::for_path("/srv/minecraft/logs/latest.log"))
///     .build()?;
///
/// pipeline.start().await?;
/// ```
pub struct WatchPipeline {
    config: WatchConfig,
    state: PipelineState,
    tx: mpsc::Sender<MinecraftMessage>,
    cancel: CancellationToken,
    task: Option<ProducerHandle>,
    /// 생산자 태스크가 `stop()` 없이 끝난 이유
    exit_reason: Option<String>,
}

impl WatchPipeline {
    /// 현재 상태 이름을 반환합니다.
    pub fn state_name(&self) -> &str {
        match self.state {
            PipelineState::Initialized => "initialized",
            PipelineState::Running => "running",
            PipelineState::Stopped => "stopped",
        }
    }

    /// 파이프라인 설정
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// 생산자 태스크가 끝날 때까지 대기합니다.
    ///
    /// 정상적으로는 `stop()` 이후에만 끝나므로, 데몬은 시그널과 함께 이 future를
    /// `select!`하여 로그 추적 실패를 감지합니다. 실행 중이 아니면 즉시 반환합니다.
    pub async fn wait(&mut self) -> Result<u64, DolphinError> {
        let Some(task) = self.task.as_mut() else {
            return Err(PipelineError::NotRunning.into());
        };

        let result = join_producer(task).await;
        self.exit_reason = Some(match &result {
            Ok(sent) => format!("log watcher exited after {sent} messages"),
            Err(e) => format!("log watcher exited: {e}"),
        });
        self.task = None;
        self.state = PipelineState::Stopped;
        self.cancel.cancel();
        result
    }
}

impl Pipeline for WatchPipeline {
    async fn start(&mut self) -> Result<(), DolphinError> {
        if self.state == PipelineState::Running {
            return Err(PipelineError::AlreadyRunning.into());
        }

        info!("starting watch pipeline");

        let cancel = CancellationToken::new();
        let tail = LogTail::open(&self.config, cancel.clone()).await?;
        let classifier = LineClassifier::new(self.config.death_keywords.clone());
        let tx = self.tx.clone();

        self.task = Some(tokio::spawn(produce(
            tail,
            classifier,
            tx,
            cancel.clone(),
        )));
        self.cancel = cancel;
        self.state = PipelineState::Running;
        self.exit_reason = None;

        info!(path = %self.config.log_path.display(), "watch pipeline started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), DolphinError> {
        if self.state != PipelineState::Running {
            return Err(PipelineError::NotRunning.into());
        }

        info!("stopping watch pipeline");
        self.cancel.cancel();
        self.state = PipelineState::Stopped;

        if let Some(mut task) = self.task.take() {
            let sent = join_producer(&mut task).await?;
            info!(messages = sent, "watch pipeline stopped");
        }
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            PipelineState::Running => match &self.task {
                Some(task) if task.is_finished() => {
                    HealthStatus::Unhealthy("log watcher task exited".to_owned())
                }
                Some(_) => HealthStatus::Healthy,
                None => HealthStatus::Unhealthy("log watcher task missing".to_owned()),
            },
            PipelineState::Initialized => HealthStatus::Unhealthy("not started".to_owned()),
            PipelineState::Stopped => HealthStatus::Unhealthy(
                self.exit_reason
                    .clone()
                    .unwrap_or_else(|| "stopped".to_owned()),
            ),
        }
    }
}

async fn join_producer(task: &mut ProducerHandle) -> Result<u64, DolphinError> {
    match task.await {
        Ok(result) => result.map_err(DolphinError::from),
        Err(e) => Err(PipelineError::SourceFailed(format!("log watcher task panicked: {e}")).into()),
    }
}

/// 생산자 루프: 라인 읽기 → 분류 → 채널 전송
///
/// 취소되면 `Ok`로, 로그 추적 실패나 수신측 종료 시 에러로 끝납니다.
async fn produce(
    mut tail: LogTail,
    mut classifier: LineClassifier,
    tx: mpsc::Sender<MinecraftMessage>,
    cancel: CancellationToken,
) -> Result<u64, LogWatcherError> {
    let mut sent: u64 = 0;

    loop {
        let line = match tail.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "log watcher failed");
                tail.close();
                return Err(e);
            }
        };

        let Some(message) = classifier.parse_line(&line) else {
            continue;
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            result = tx.send(message) => {
                if result.is_err() {
                    error!("message receiver dropped, stopping log watcher");
                    tail.close();
                    return Err(LogWatcherError::Channel("message receiver dropped".to_owned()));
                }
                sent += 1;
            }
        }
    }

    tail.close();
    debug!(messages = sent, "log watcher loop finished");
    Ok(sent)
}

/// 감시 파이프라인 빌더
///
/// 파이프라인을 구성하고 필요한 채널을 생성합니다.
pub struct WatchPipelineBuilder {
    config: WatchConfig,
    message_tx: Option<mpsc::Sender<MinecraftMessage>>,
    channel_capacity: Option<usize>,
}

impl WatchPipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: WatchConfig::default(),
            message_tx: None,
            channel_capacity: None,
        }
    }

    /// 감시 설정을 지정합니다.
    pub fn config(mut self, config: WatchConfig) -> Self {
        self.config = config;
        self
    }

    /// 외부 메시지 전송 채널을 설정합니다.
    ///
    /// 설정하지 않으면 빌더가 새 채널을 생성합니다.
    pub fn message_sender(mut self, tx: mpsc::Sender<MinecraftMessage>) -> Self {
        self.message_tx = Some(tx);
        self
    }

    /// 채널 용량을 설정합니다 (외부 채널 미사용 시). 기본값은 설정의 `channel_capacity`입니다.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }

    /// 파이프라인을 빌드합니다.
    ///
    /// # Returns
    /// - `WatchPipeline`: 파이프라인 인스턴스
    /// - `Option<mpsc::Receiver<MinecraftMessage>>`: 메시지 수신 채널
    ///   (외부 message_sender를 설정한 경우 None)
    pub fn build(
        self,
    ) -> Result<(WatchPipeline, Option<mpsc::Receiver<MinecraftMessage>>), LogWatcherError> {
        let mut config = self.config;
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }
        config.validate()?;

        let (tx, rx) = match self.message_tx {
            Some(tx) => (tx, None),
            None => {
                let (tx, rx) = mpsc::channel(config.channel_capacity);
                (tx, Some(rx))
            }
        };

        let pipeline = WatchPipeline {
            config,
            state: PipelineState::Initialized,
            tx,
            cancel: CancellationToken::new(),
            task: None,
            exit_reason: None,
        };

        Ok((pipeline, rx))
    }
}

impl Default for WatchPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

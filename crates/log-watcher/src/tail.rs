//! 로그 파일 추적기 -- `tail -f`와 유사한 비동기 라인 소스
//!
//! [`LogTail`]은 열 때 파일의 끝으로 이동하며, 이전에 기록된 내용은 읽지 않습니다.
//! 새 데이터가 없으면 `poll_interval_ms` 주기로 다시 확인합니다.
//!
//! # 로테이션 감지
//! - inode/device 변경: 새 파일을 열고 처음부터 읽음
//! - 파일 크기 축소 (truncation): 읽기 위치를 0으로 되돌림
//! - 로테이션 중 파일이 잠시 없으면 다시 생길 때까지 대기

use std::collections::VecDeque;
use std::fs::Metadata;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dolphin_core::metrics as m;

use crate::config::WatchConfig;
use crate::error::LogWatcherError;

/// 한 번에 읽는 바이트 수
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// 파일 식별자 (device, inode)
type FileIdentity = (u64, u64);

/// 로그 파일을 따라가며 완성된 라인을 순서대로 반환합니다.
pub struct LogTail {
    path: PathBuf,
    file: Option<File>,
    /// 현재 읽기 위치 (바이트 오프셋)
    offset: u64,
    identity: Option<FileIdentity>,
    poll_interval: Duration,
    lines: LineSplitter,
    chunk: Vec<u8>,
    cancel: CancellationToken,
}

impl LogTail {
    /// 로그 파일을 열고 끝으로 이동합니다.
    ///
    /// 파일이 없으면 `LogFileNotFound`를 반환합니다.
    pub async fn open(
        config: &WatchConfig,
        cancel: CancellationToken,
    ) -> Result<Self, LogWatcherError> {
        let path = config.log_path.clone();

        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LogWatcherError::LogFileNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), "using Minecraft log file");
        let identity = file_identity(&file.metadata().await?);
        let offset = file.seek(SeekFrom::End(0)).await?;

        info!(path = %path.display(), offset, "log watcher started and waiting for lines");

        Ok(Self {
            path,
            file: Some(file),
            offset,
            identity,
            poll_interval: config.poll_interval(),
            lines: LineSplitter::new(config.max_line_length),
            chunk: vec![0; READ_CHUNK_SIZE],
            cancel,
        })
    }

    /// 현재 읽기 위치
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 추적이 종료되었는지 확인합니다.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 다음 완성된 라인을 반환합니다.
    ///
    /// 새 라인이 없으면 대기하며, [`close`](Self::close) 이후에만 `Ok(None)`을 반환합니다.
    /// 줄바꿈이 오지 않은 마지막 데이터는 줄바꿈이 도착할 때까지 보관합니다.
    pub async fn next_line(&mut self) -> Result<Option<String>, LogWatcherError> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }

            if let Some(line) = self.lines.pop() {
                return Ok(Some(line));
            }

            if self.read_available().await? > 0 {
                continue;
            }

            if self.check_rotation().await? {
                continue;
            }

            tokio::select! {
                _ = self.cancel.cancelled() => return Ok(None),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// 추적을 종료하고 파일 핸들을 해제합니다.
    ///
    /// 대기 중인 `next_line`은 `Ok(None)`을 반환합니다. 두 번 호출해도 안전합니다.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.file = None;
    }

    /// 현재 파일에서 읽을 수 있는 만큼 읽습니다.
    async fn read_available(&mut self) -> Result<usize, LogWatcherError> {
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };

        let n = file
            .read(&mut self.chunk)
            .await
            .map_err(|e| follow_error(&self.path, e))?;
        if n > 0 {
            self.offset += n as u64;
            self.lines.push(&self.chunk[..n]);
        }
        Ok(n)
    }

    /// 로테이션 또는 truncation 여부를 확인하고 처리합니다.
    ///
    /// 읽기 위치가 바뀌었으면 `true`를 반환합니다.
    async fn check_rotation(&mut self) -> Result<bool, LogWatcherError> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "log file missing, waiting for it to reappear");
                return Ok(false);
            }
            Err(e) => return Err(follow_error(&self.path, e)),
        };

        let identity = file_identity(&metadata);
        if identity.is_some() && identity != self.identity {
            let file = match File::open(&self.path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %self.path.display(), "log file vanished before reopen");
                    return Ok(false);
                }
                Err(e) => return Err(follow_error(&self.path, e)),
            };

            info!(path = %self.path.display(), "log file rotated, reading new file from start");
            self.file = Some(file);
            self.identity = identity;
            self.offset = 0;
            self.lines.reset();
            metrics::counter!(m::WATCHER_ROTATIONS_TOTAL).increment(1);
            return Ok(true);
        }

        if metadata.len() < self.offset {
            info!(
                path = %self.path.display(),
                previous_offset = self.offset,
                len = metadata.len(),
                "log file truncated, rewinding"
            );
            if let Some(file) = self.file.as_mut() {
                file.seek(SeekFrom::Start(0))
                    .await
                    .map_err(|e| follow_error(&self.path, e))?;
            }
            self.offset = 0;
            self.lines.reset();
            metrics::counter!(m::WATCHER_ROTATIONS_TOTAL).increment(1);
            return Ok(true);
        }

        Ok(false)
    }
}

fn follow_error(path: &Path, e: std::io::Error) -> LogWatcherError {
    LogWatcherError::Follow {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[cfg(unix)]
fn file_identity(metadata: &Metadata) -> Option<FileIdentity> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn file_identity(_metadata: &Metadata) -> Option<FileIdentity> {
    None
}

/// 바이트 스트림을 라인 단위로 나눕니다.
///
/// `\n`과 `\r\n`을 모두 줄 끝으로 인식하며, `max_line_length`를 넘는 라인은 버립니다.
#[derive(Debug)]
struct LineSplitter {
    pending: Vec<u8>,
    ready: VecDeque<String>,
    max_line_length: usize,
    /// 너무 긴 라인의 나머지를 다음 줄바꿈까지 버리는 중
    discarding: bool,
}

impl LineSplitter {
    fn new(max_line_length: usize) -> Self {
        Self {
            pending: Vec::new(),
            ready: VecDeque::new(),
            max_line_length,
            discarding: false,
        }
    }

    fn push(&mut self, mut bytes: &[u8]) {
        while let Some(pos) = bytes.iter().position(|b| *b == b'\n') {
            self.append(&bytes[..pos]);
            self.finish_line();
            bytes = &bytes[pos + 1..];
        }
        self.append(bytes);
    }

    fn pop(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.ready.clear();
        self.discarding = false;
    }

    fn append(&mut self, bytes: &[u8]) {
        if self.discarding || bytes.is_empty() {
            return;
        }

        // 줄 끝의 `\r` 한 바이트는 길이 제한에서 제외
        if self.pending.len() + bytes.len() > self.max_line_length + 1 {
            self.pending.clear();
            self.discarding = true;
            self.record_drop();
            return;
        }
        self.pending.extend_from_slice(bytes);
    }

    fn finish_line(&mut self) {
        if self.discarding {
            self.discarding = false;
            return;
        }

        let mut line = std::mem::take(&mut self.pending);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.len() > self.max_line_length {
            self.record_drop();
            return;
        }

        metrics::counter!(m::WATCHER_LINES_READ_TOTAL).increment(1);
        let line = match String::from_utf8(line) {
            Ok(line) => line,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        self.ready.push_back(line);
    }

    fn record_drop(&self) {
        warn!(
            max_line_length = self.max_line_length,
            "dropping log line exceeding maximum length"
        );
        metrics::counter!(m::WATCHER_LINES_DROPPED_TOTAL).increment(1);
    }
}

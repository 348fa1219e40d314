//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 참조 데이터 조회 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 성공이 아닌 HTTP 상태 코드
    #[error("HTTP {status} from {endpoint}")]
    Transport { endpoint: String, status: u16 },

    /// 상태 코드를 받지 못한 요청 실패 (연결, 타임아웃, 본문 읽기)
    #[error("Request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    /// 응답은 성공했으나 필요한 필드/차원이 없음
    #[error("Unexpected data shape: {0}")]
    DataShape(String),

    /// JSON 본문 파싱 실패
    #[error("Parse error: {0}")]
    Parse(String),

    /// 결과 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 알 수 없는 증권 분류 값
    #[error("Unrecognized security kind '{kind}' for {identifier}")]
    UnrecognizedKind { identifier: String, kind: String },

    /// 잘못된 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DataError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 내부에서 재시도하지 않으며, 호출자가 판단할 때 사용합니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::Request { .. } => true,
            DataError::Transport { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP 상태 코드 (Transport 에러인 경우).
    pub fn status(&self) -> Option<u16> {
        match self {
            DataError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

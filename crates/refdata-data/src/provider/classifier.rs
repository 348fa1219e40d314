//! ETF 배당 정책 분류기.
//!
//! 상세 페이지 HTML만으로 누적형(배당 재투자) 여부를 판단합니다.
//! 페이지 레이아웃에 의존하므로 `AccumulationClassifier`로 교체할 수 있게 둡니다.

use once_cell::sync::Lazy;
use regex::Regex;

/// 상세 페이지 HTML에서 누적형 여부를 판단하는 분류기.
pub trait AccumulationClassifier: Send + Sync {
    /// 배당을 분배하지 않는(누적형) 펀드면 `true`.
    fn is_accumulating(&self, html: &str) -> bool;
}

impl<F> AccumulationClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_accumulating(&self, html: &str) -> bool {
        self(html)
    }
}

/// 배당수익률 "N/A" 표시 원문. "Dividend"와 "Yield" 사이는 공백 문자 하나.
const DIVIDEND_YIELD_NA_PATTERN: &str = r#"<span class="float_lang_base_1">Dividend\sYield</span><span class="float_lang_base_2 bold">N/A</span>"#;

static DIVIDEND_YIELD_NA: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(DIVIDEND_YIELD_NA_PATTERN).ok());

/// 배당수익률 항목이 "N/A"로 표시되면 누적형으로 판단하는 기본 분류기.
///
/// HTML을 파싱하지 않고 원문에서 아래 마크업을 그대로 찾습니다.
/// 속성 순서, 클래스, 엔티티(`&nbsp;`)가 다르면 일치하지 않으며,
/// `<script>` 문자열 안에 있어도 일치합니다.
///
/// `<span class="float_lang_base_1">Dividend Yield</span><span class="float_lang_base_2 bold">N/A</span>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DividendYieldMarker;

impl AccumulationClassifier for DividendYieldMarker {
    fn is_accumulating(&self, html: &str) -> bool {
        DIVIDEND_YIELD_NA
            .as_ref()
            .is_some_and(|marker| marker.is_match(html))
    }
}

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;

use crate::sources::{LyricsDocument, LyricsQuery, LyricsSource};

pub const LRCLIB_URL: &str = "https://lrclib.net/api/get";

/// 같은 엔드포인트로 보내는 요청 사이의 최소 간격.
pub const REQUEST_DELAY: Duration = Duration::from_millis(100);

const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION")
);

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// lrclib.net 가사 API 클라이언트.
/// 인증 없이 `/api/get`으로 트랙 하나의 가사를 가져온다.
pub struct LrclibClient {
    client: reqwest::blocking::Client,
    limiter: DirectLimiter,
    clock: DefaultClock,
}

impl LrclibClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .context("lrclib HTTP 클라이언트 생성에 실패했습니다")?;

        let quota = Quota::with_period(REQUEST_DELAY)
            .context("요청 간격이 0일 수 없습니다")?
            .allow_burst(NonZeroU32::MIN);

        Ok(Self {
            client,
            limiter: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
        })
    }

    /// 직전 요청 이후 최소 간격이 지날 때까지 기다린다.
    fn wait_for_slot(&self) {
        while let Err(not_until) = self.limiter.check() {
            let wait = not_until.wait_time_from(self.clock.now());
            log::trace!("lrclib rate limit, sleeping {:?}", wait);
            std::thread::sleep(wait);
        }
    }
}

impl LyricsSource for LrclibClient {
    fn name(&self) -> &str {
        "lrclib"
    }

    fn lookup(&self, query: &LyricsQuery) -> Result<Option<LyricsDocument>> {
        self.wait_for_slot();

        let resp = self
            .client
            .get(LRCLIB_URL)
            .query(&query.to_args())
            .send()
            .context("lrclib 연결에 실패했습니다")?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let doc: LyricsDocument = resp
            .error_for_status()
            .context("lrclib 요청이 실패했습니다")?
            .json()
            .context("lrclib 응답 파싱에 실패했습니다")?;

        Ok(Some(doc))
    }
}

pub mod lrclib;

use anyhow::Result;
use serde::Deserialize;

/// 가사 검색 요청 인자.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
}

impl LyricsQuery {
    /// 쿼리스트링 인자 목록. `album_name`은 있을 때만 포함된다.
    pub fn to_args(&self) -> Vec<(&'static str, &str)> {
        let mut args = vec![
            ("track_name", self.track_name.as_str()),
            ("artist_name", self.artist_name.as_str()),
        ];
        if let Some(ref album) = self.album_name {
            args.push(("album_name", album.as_str()));
        }
        args
    }
}

/// 가사 서비스 응답. 두 필드 모두 없을 수 있다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LyricsDocument {
    #[serde(rename = "plainLyrics", default)]
    pub plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics", default)]
    pub synced_lyrics: Option<String>,
}

impl LyricsDocument {
    pub fn plain(&self) -> Option<&str> {
        self.plain_lyrics.as_deref().filter(|s| !s.is_empty())
    }

    pub fn synced(&self) -> Option<&str> {
        self.synced_lyrics.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.plain().is_none() && self.synced().is_none()
    }
}

/// 가사 소스 트레이트.
/// 요청 하나에 응답 하나. 호출한 스레드에서 결과가 돌아온다.
pub trait LyricsSource {
    fn name(&self) -> &str;
    /// 가사를 조회한다. 찾지 못하면 `Ok(None)`.
    fn lookup(&self, query: &LyricsQuery) -> Result<Option<LyricsDocument>>;
}

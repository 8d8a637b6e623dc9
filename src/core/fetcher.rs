use anyhow::Result;

use crate::config::LyricsSettings;
use crate::core::cache::LyricsCache;
use crate::models::Metadata;
use crate::sources::{LyricsDocument, LyricsQuery, LyricsSource};

/// 요청을 보내지 않은 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// 가사 기록 옵션이 모두 꺼져 있음
    Disabled,
    /// 제목 또는 아티스트 없음
    MissingTags,
    /// 이미 가사가 있고 교체 금지
    AlreadyHasLyrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Skipped(Skip),
    /// 요청 실패 (네트워크, HTTP 상태, 응답 파싱)
    LookupFailed,
    /// 응답이 없거나 가사 필드가 모두 비어 있음
    NotFound,
    /// 가사를 받아 캐시에 넣었다. `embedded`는 태그에도 기록했는지 여부.
    Fetched { embedded: bool },
}

/// 태그와 설정으로 가사 요청을 만든다. 요청할 필요가 없으면 그 이유를 돌려준다.
pub fn build_query(settings: &LyricsSettings, metadata: &Metadata) -> Result<LyricsQuery, Skip> {
    if !settings.embeds_any() {
        return Err(Skip::Disabled);
    }

    let (title, artist) = match (metadata.title(), metadata.artist()) {
        (Some(title), Some(artist)) => (title, artist),
        _ => {
            log::debug!(
                "skipping lyrics for {:?}: both title and artist are required",
                metadata.album().unwrap_or_default()
            );
            return Err(Skip::MissingTags);
        }
    };

    if settings.never_replace_lyrics && metadata.has("lyrics") {
        log::debug!("skipping lyrics for {}: lyrics already embedded", title);
        return Err(Skip::AlreadyHasLyrics);
    }

    Ok(LyricsQuery {
        track_name: title.to_string(),
        artist_name: artist.to_string(),
        album_name: metadata.album().map(str::to_string),
    })
}

/// 가사 응답을 캐시와 태그에 반영한다.
///
/// 일반 가사와 싱크 가사는 각각 처리된다. 둘 다 있으면 캐시에는 싱크 가사가 남는다.
/// 싱크 가사는 아직 태그에 기록하지 않는다.
pub fn apply_response(
    settings: &LyricsSettings,
    cache: &mut LyricsCache,
    metadata: &mut Metadata,
    query: &LyricsQuery,
    response: Result<Option<LyricsDocument>>,
) -> FetchOutcome {
    let doc = match response {
        Ok(Some(doc)) if !doc.is_empty() => doc,
        Ok(_) => {
            log::debug!("no lyrics found for {}", query.track_name);
            return FetchOutcome::NotFound;
        }
        Err(e) => {
            log::debug!("could not fetch lyrics for {}: {:#}", query.track_name, e);
            return FetchOutcome::LookupFailed;
        }
    };

    let title = query.track_name.as_str();
    let mut embedded = false;

    if let Some(plain) = doc.plain() {
        cache.insert(title, plain);
        let blocked = settings.never_replace_lyrics && metadata.has("lyrics");
        if settings.add_unsynced_lyrics && !blocked {
            metadata.set("lyrics", plain);
            embedded = true;
        }
    }

    if let Some(synced) = doc.synced() {
        cache.insert(title, synced);
    }

    log::debug!("fetched lyrics for {} (embedded: {})", title, embedded);
    FetchOutcome::Fetched { embedded }
}

/// 요청 하나를 보내고 응답을 반영한다.
pub fn fetch_lyrics(
    source: &dyn LyricsSource,
    settings: &LyricsSettings,
    cache: &mut LyricsCache,
    metadata: &mut Metadata,
) -> FetchOutcome {
    let query = match build_query(settings, metadata) {
        Ok(query) => query,
        Err(skip) => return FetchOutcome::Skipped(skip),
    };
    log::debug!(
        "requesting lyrics from {}: {} - {}",
        source.name(),
        query.artist_name,
        query.track_name
    );
    let response = source.lookup(&query);
    apply_response(settings, cache, metadata, &query, response)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use anyhow::bail;

    use super::*;

    /// 받은 요청을 기록하고 정해진 응답을 돌려주는 가사 소스.
    pub(crate) struct MockSource {
        pub requests: RefCell<Vec<LyricsQuery>>,
        response: Option<Option<LyricsDocument>>,
    }

    impl MockSource {
        pub fn returning(doc: LyricsDocument) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                response: Some(Some(doc)),
            }
        }

        pub fn plain(text: &str) -> Self {
            Self::returning(LyricsDocument {
                plain_lyrics: Some(text.to_string()),
                synced_lyrics: None,
            })
        }

        pub fn not_found() -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                response: Some(None),
            }
        }

        pub fn failing() -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                response: None,
            }
        }
    }

    impl LyricsSource for MockSource {
        fn name(&self) -> &str {
            "mock"
        }

        fn lookup(&self, query: &LyricsQuery) -> Result<Option<LyricsDocument>> {
            self.requests.borrow_mut().push(query.clone());
            match &self.response {
                Some(doc) => Ok(doc.clone()),
                None => bail!("connection refused"),
            }
        }
    }

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs.iter().copied().collect()
    }

    fn both_enabled() -> LyricsSettings {
        LyricsSettings {
            add_unsynced_lyrics: true,
            add_synced_lyrics: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_request_without_album() {
        let source = MockSource::not_found();
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B")]);

        fetch_lyrics(&source, &both_enabled(), &mut cache, &mut m);

        let requests = source.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].to_args(),
            vec![("track_name", "A"), ("artist_name", "B")]
        );
    }

    #[test]
    fn test_album_included_when_present() {
        let m = meta(&[("title", "A"), ("artist", "B"), ("album", "C")]);
        let query = build_query(&both_enabled(), &m).unwrap();
        assert_eq!(query.album_name.as_deref(), Some("C"));
    }

    #[test]
    fn test_plain_lyrics_embedded_and_cached() {
        let source = MockSource::plain("la la");
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B")]);

        let outcome = fetch_lyrics(&source, &LyricsSettings::default(), &mut cache, &mut m);

        assert_eq!(outcome, FetchOutcome::Fetched { embedded: true });
        assert_eq!(m.lyrics(), Some("la la"));
        assert_eq!(cache.get("A"), Some("la la"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_never_replace_skips_request() {
        let source = MockSource::plain("new");
        let settings = LyricsSettings {
            never_replace_lyrics: true,
            ..Default::default()
        };
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B"), ("lyrics", "existing")]);

        let outcome = fetch_lyrics(&source, &settings, &mut cache, &mut m);

        assert_eq!(outcome, FetchOutcome::Skipped(Skip::AlreadyHasLyrics));
        assert!(source.requests.borrow().is_empty());
        assert_eq!(m.lyrics(), Some("existing"));
    }

    #[test]
    fn test_never_replace_guards_late_response() {
        // 요청 이후 다른 경로로 가사가 생긴 경우
        let settings = LyricsSettings {
            never_replace_lyrics: true,
            ..Default::default()
        };
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B")]);
        let query = build_query(&settings, &m).unwrap();
        m.set("lyrics", "existing");

        let doc = LyricsDocument {
            plain_lyrics: Some("new".to_string()),
            synced_lyrics: Some("[00:01.000] new".to_string()),
        };
        let outcome = apply_response(&settings, &mut cache, &mut m, &query, Ok(Some(doc)));

        assert_eq!(outcome, FetchOutcome::Fetched { embedded: false });
        assert_eq!(m.lyrics(), Some("existing"));
    }

    #[test]
    fn test_disabled_options_skip() {
        let settings = LyricsSettings {
            add_unsynced_lyrics: false,
            add_synced_lyrics: false,
            ..Default::default()
        };
        let m = meta(&[("title", "A"), ("artist", "B")]);
        assert_eq!(build_query(&settings, &m), Err(Skip::Disabled));
    }

    #[test]
    fn test_missing_artist_skips() {
        let m = meta(&[("title", "A"), ("artist", "")]);
        assert_eq!(
            build_query(&LyricsSettings::default(), &m),
            Err(Skip::MissingTags)
        );
    }

    #[test]
    fn test_synced_only_cached_not_embedded() {
        let source = MockSource::returning(LyricsDocument {
            plain_lyrics: None,
            synced_lyrics: Some("[00:01.000] la".to_string()),
        });
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B")]);

        let outcome = fetch_lyrics(&source, &both_enabled(), &mut cache, &mut m);

        assert_eq!(outcome, FetchOutcome::Fetched { embedded: false });
        assert_eq!(m.lyrics(), None);
        assert_eq!(cache.get("A"), Some("[00:01.000] la"));
    }

    #[test]
    fn test_synced_wins_cache_slot() {
        let source = MockSource::returning(LyricsDocument {
            plain_lyrics: Some("la".to_string()),
            synced_lyrics: Some("[00:01.000] la".to_string()),
        });
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B")]);

        fetch_lyrics(&source, &both_enabled(), &mut cache, &mut m);

        assert_eq!(m.lyrics(), Some("la"));
        assert_eq!(cache.get("A"), Some("[00:01.000] la"));
    }

    #[test]
    fn test_unsynced_disabled_still_caches() {
        let settings = LyricsSettings {
            add_unsynced_lyrics: false,
            add_synced_lyrics: true,
            ..Default::default()
        };
        let source = MockSource::plain("la");
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B")]);

        let outcome = fetch_lyrics(&source, &settings, &mut cache, &mut m);

        assert_eq!(outcome, FetchOutcome::Fetched { embedded: false });
        assert_eq!(m.lyrics(), None);
        assert_eq!(cache.get("A"), Some("la"));
    }

    #[test]
    fn test_error_and_empty_are_noops() {
        let mut cache = LyricsCache::new();
        let mut m = meta(&[("title", "A"), ("artist", "B")]);
        let settings = LyricsSettings::default();

        let outcome = fetch_lyrics(&MockSource::failing(), &settings, &mut cache, &mut m);
        assert_eq!(outcome, FetchOutcome::LookupFailed);

        let outcome = fetch_lyrics(
            &MockSource::returning(LyricsDocument::default()),
            &settings,
            &mut cache,
            &mut m,
        );
        assert_eq!(outcome, FetchOutcome::NotFound);

        let outcome = fetch_lyrics(&MockSource::not_found(), &settings, &mut cache, &mut m);
        assert_eq!(outcome, FetchOutcome::NotFound);

        assert_eq!(cache.len(), 0);
        assert_eq!(m.lyrics(), None);
    }

    #[test]
    fn test_same_title_collides_in_cache() {
        let settings = LyricsSettings::default();
        let mut cache = LyricsCache::new();
        let mut first = meta(&[("title", "Intro"), ("artist", "X")]);
        let mut second = meta(&[("title", "Intro"), ("artist", "Y")]);

        fetch_lyrics(&MockSource::plain("x intro"), &settings, &mut cache, &mut first);
        fetch_lyrics(&MockSource::plain("y intro"), &settings, &mut cache, &mut second);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("Intro"), Some("y intro"));
        assert_eq!(first.lyrics(), Some("x intro"));
    }
}

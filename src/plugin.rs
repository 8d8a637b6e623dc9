use crate::config::LyricsSettings;
use crate::core::cache::LyricsCache;
use crate::core::exporter::{self, ExportOutcome};
use crate::core::fetcher::{self, FetchOutcome};
use crate::core::importer::{self, ImportOutcome};
use crate::models::{Track, TrackFile};
use crate::sources::LyricsSource;

/// 가사 가져오기/내보내기 세션.
///
/// 설정, 가사 소스, 캐시를 한곳에 묶는다. 모든 훅은 `&mut self`로 한 스레드에서만
/// 불리므로 캐시에 잠금이 필요 없다.
pub struct LyricsPlugin<S: LyricsSource> {
    settings: LyricsSettings,
    source: S,
    cache: LyricsCache,
}

impl<S: LyricsSource> LyricsPlugin<S> {
    pub fn new(settings: LyricsSettings, source: S) -> Self {
        Self {
            settings,
            source,
            cache: LyricsCache::new(),
        }
    }

    /// 파일이 트랙에 연결된 직후 호출된다.
    pub fn on_file_added(&mut self, file: &mut TrackFile) -> FetchOutcome {
        fetcher::fetch_lyrics(
            &self.source,
            &self.settings,
            &mut self.cache,
            &mut file.metadata,
        )
    }

    /// 파일 저장 직후 호출된다.
    pub fn on_file_saved(&mut self, file: &TrackFile) -> ExportOutcome {
        exporter::export_lrc(&self.settings, &mut self.cache, file)
    }

    /// "lrc 파일에서 가사 가져오기" 동작. 트랙마다 첫 번째 파일만 처리한다.
    pub fn import_lrc(&self, tracks: &mut [Track]) -> Vec<ImportOutcome> {
        tracks
            .iter_mut()
            .map(|track| match track.first_file_mut() {
                Some(file) => importer::import_lrc(&self.settings, file),
                None => {
                    log::debug!("skipping lrc import for a track without files");
                    ImportOutcome::NoFile
                }
            })
            .collect()
    }

    /// 받아두었지만 아직 내보내지 않은 가사.
    pub fn cached_lyrics(&self, title: &str) -> Option<&str> {
        self.cache.get(title)
    }

    pub fn pending_exports(&self) -> usize {
        self.cache.len()
    }

    pub fn settings(&self) -> &LyricsSettings {
        &self.settings
    }
}

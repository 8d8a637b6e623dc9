use std::io::ErrorKind;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LyricsSettings;
use crate::core::template;
use crate::models::TrackFile;

static SYNCED_LYRICS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\[\d\d:\d\d\.\d\d\d\]|<\d\d:\d\d\.\d\d\d>)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(PathBuf),
    /// 싱크 가사 파일. 태그에는 아직 반영하지 않는다.
    Synced(PathBuf),
    NotFound(PathBuf),
    /// 읽기 실패 (권한, 인코딩 등)
    Failed(PathBuf),
    /// 트랙에 파일이 없음
    NoFile,
}

/// `[mm:ss.xxx]` 또는 `<mm:ss.xxx>` 시간 표시가 하나라도 있으면 싱크 가사로 본다.
pub fn is_synced(lyrics: &str) -> bool {
    SYNCED_LYRICS_PATTERN.is_match(lyrics)
}

/// lrc 파일 내용을 파일의 가사 태그로 가져온다.
/// 경로는 내보내기와 같은 `exported_lrc_filename` 패턴으로 정한다.
pub fn import_lrc(settings: &LyricsSettings, file: &mut TrackFile) -> ImportOutcome {
    let path = template::resolve_lrc_path(
        &settings.exported_lrc_filename,
        &file.path,
        &file.metadata,
    );

    let lyrics = match std::fs::read_to_string(&path) {
        Ok(lyrics) => lyrics,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!(
                "could not find matching lrc file for {}",
                file.metadata.display_title()
            );
            return ImportOutcome::NotFound(path);
        }
        Err(e) => {
            log::debug!("could not read {}: {}", path.display(), e);
            return ImportOutcome::Failed(path);
        }
    };

    if is_synced(&lyrics) {
        log::debug!("{} holds synced lyrics, leaving tags unchanged", path.display());
        return ImportOutcome::Synced(path);
    }

    file.metadata.set("lyrics", lyrics);
    ImportOutcome::Imported(path)
}

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::LyricsSettings;
use crate::core::cache::LyricsCache;
use crate::core::template;
use crate::models::TrackFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// 내보내기 옵션이 꺼져 있음
    Disabled,
    /// 캐시에도 태그에도 가사가 없음
    NoLyrics,
    /// 대상 파일이 이미 있고 덮어쓰기 금지
    Exists(PathBuf),
    Written(PathBuf),
    /// 쓰기 실패. 저장 작업은 계속된다.
    Failed(PathBuf),
}

/// 저장된 파일의 가사를 lrc 파일로 내보낸다.
///
/// 캐시에 받아둔 가사가 우선이고, 없으면 태그의 가사를 쓴다.
/// 캐시 항목은 꺼내는 순간 지워진다. 실패는 로그만 남기고 삼킨다.
pub fn export_lrc(
    settings: &LyricsSettings,
    cache: &mut LyricsCache,
    file: &TrackFile,
) -> ExportOutcome {
    if !settings.exported_lrc {
        return ExportOutcome::Disabled;
    }

    let metadata = &file.metadata;
    let title = metadata.title().unwrap_or_default();
    let lyrics = cache
        .take(title)
        .filter(|l| !l.is_empty())
        .or_else(|| metadata.lyrics().map(str::to_string));

    let Some(lyrics) = lyrics else {
        log::debug!("no lyrics to export for {}", file.filename());
        return ExportOutcome::NoLyrics;
    };

    let path = template::resolve_lrc_path(&settings.exported_lrc_filename, &file.path, metadata);
    if settings.never_replace_lrc && path.exists() {
        log::debug!("keeping existing lrc file {}", path.display());
        return ExportOutcome::Exists(path);
    }

    match write_lrc(&path, &lyrics) {
        Ok(()) => {
            log::debug!("created lyrics file at {}", path.display());
            ExportOutcome::Written(path)
        }
        Err(e) => {
            log::debug!("could not create the lrc file for {}: {:#}", file.filename(), e);
            ExportOutcome::Failed(path)
        }
    }
}

fn write_lrc(path: &std::path::Path, lyrics: &str) -> Result<()> {
    std::fs::write(path, lyrics)
        .with_context(|| format!("lrc 파일을 쓸 수 없습니다: {}", path.display()))
}

use std::path::Path;

use anyhow::Result;

use crate::core::tagger;
use crate::models::{Metadata, TrackFile};

/// 디렉토리를 재귀 탐색하여 모든 MP3 파일을 스캔한다.
/// 각 파일의 ID3 태그를 읽어 TrackFile 목록을 반환한다.
pub fn scan_directory(dir: &Path) -> Result<Vec<TrackFile>> {
    let mut files = Vec::new();
    collect_mp3_files(dir, &mut files)?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn collect_mp3_files(dir: &Path, files: &mut Vec<TrackFile>) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{}은(는) 디렉토리가 아닙니다", dir.display());
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_mp3_files(&path, files)?;
        } else if is_mp3(&path) {
            files.push(load_track_file(&path));
        }
    }

    Ok(())
}

/// 확장자가 .mp3인지 확인한다 (대소문자 무시).
fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

/// 태그를 읽지 못한 파일도 빈 태그로 목록에 넣는다.
fn load_track_file(path: &Path) -> TrackFile {
    let metadata = tagger::read_tags(path).unwrap_or_else(|e| {
        log::warn!("{:#}", e);
        Metadata::new()
    });
    TrackFile::new(path, metadata)
}

/// 단일 MP3 파일을 로드한다. 파일이 없거나 MP3가 아니면 에러.
pub fn load_single_file(path: &Path) -> Result<TrackFile> {
    if !path.exists() {
        anyhow::bail!("파일을 찾을 수 없습니다: {}", path.display());
    }
    if !is_mp3(path) {
        anyhow::bail!("MP3 파일이 아닙니다: {}", path.display());
    }
    Ok(load_track_file(path))
}

/// 경로가 디렉토리면 재귀 스캔, 파일이면 단일 로드한다.
pub fn scan_path(path: &Path) -> Result<Vec<TrackFile>> {
    if path.is_dir() {
        scan_directory(path)
    } else {
        Ok(vec![load_single_file(path)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_finds_nested_mp3_only() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("disc2");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.mp3"), [0u8; 64]).unwrap();
        std::fs::write(nested.join("a.MP3"), [0u8; 64]).unwrap();
        std::fs::write(dir.path().join("b.lrc"), "lyrics").unwrap();

        let files = scan_path(dir.path()).unwrap();

        let names: Vec<_> = files.iter().map(|f| f.filename()).collect();
        assert_eq!(names, vec!["b.mp3", "a.MP3"]);
        assert!(files.iter().all(|f| f.metadata.is_empty()));
    }

    #[test]
    fn test_single_file_must_be_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let lrc = dir.path().join("song.lrc");
        std::fs::write(&lrc, "x").unwrap();
        assert!(scan_path(&lrc).is_err());
        assert!(scan_path(&dir.path().join("missing.mp3")).is_err());
    }
}

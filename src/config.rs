use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LRC_FILENAME: &str = "%filename%.lrc";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lyrics: LyricsSettings,
}

/// 가사 관련 설정. 옵션 페이지의 여섯 항목과 1:1로 대응한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsSettings {
    /// 받아온 일반 가사를 태그에 기록한다.
    pub add_unsynced_lyrics: bool,
    /// 싱크 가사 태그 기록. 아직 태그에 반영되지 않는다.
    pub add_synced_lyrics: bool,
    /// 이미 가사 태그가 있으면 가져오지도, 덮어쓰지도 않는다.
    pub never_replace_lyrics: bool,
    /// lrc 파일명 패턴. `%tag%` 자리표시자를 쓴다.
    pub exported_lrc_filename: String,
    /// 저장할 때 lrc 파일로 내보낸다.
    pub exported_lrc: bool,
    /// lrc 파일이 이미 있으면 덮어쓰지 않는다.
    pub never_replace_lrc: bool,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            add_unsynced_lyrics: true,
            add_synced_lyrics: false,
            never_replace_lyrics: false,
            exported_lrc_filename: DEFAULT_LRC_FILENAME.to_string(),
            exported_lrc: false,
            never_replace_lrc: false,
        }
    }
}

impl LyricsSettings {
    pub fn embeds_any(&self) -> bool {
        self.add_unsynced_lyrics || self.add_synced_lyrics
    }
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("lrctag")
        .join("config.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            log::warn!("ignoring invalid config {}: {:#}", path.display(), e);
            Config::default()
        }),
        Err(e) => {
            log::warn!("could not read config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("설정 파일 형식이 올바르지 않습니다")
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)
        .with_context(|| format!("설정을 저장할 수 없습니다: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LyricsSettings::default();
        assert!(settings.add_unsynced_lyrics);
        assert!(!settings.add_synced_lyrics);
        assert!(!settings.never_replace_lyrics);
        assert_eq!(settings.exported_lrc_filename, "%filename%.lrc");
        assert!(!settings.exported_lrc);
        assert!(!settings.never_replace_lrc);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.lyrics, LyricsSettings::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg = parse_config("[lyrics]\nexported_lrc = true\n").unwrap();
        assert!(cfg.lyrics.exported_lrc);
        assert!(cfg.lyrics.add_unsynced_lyrics);
        assert_eq!(cfg.lyrics.exported_lrc_filename, DEFAULT_LRC_FILENAME);
    }

    #[test]
    fn test_invalid_type_is_error() {
        assert!(parse_config("[lyrics]\nexported_lrc = \"yes\"\n").is_err());
    }

    #[test]
    fn test_embeds_any() {
        let mut settings = LyricsSettings {
            add_unsynced_lyrics: false,
            ..Default::default()
        };
        assert!(!settings.embeds_any());
        settings.add_synced_lyrics = true;
        assert!(settings.embeds_any());
    }
}

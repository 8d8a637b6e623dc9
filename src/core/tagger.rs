use std::path::Path;

use anyhow::{Context, Result};
use id3::frame::Lyrics;
use id3::{Tag, TagLike, Version};

use crate::models::Metadata;

/// MP3 파일의 ID3 태그를 읽어 Metadata로 변환한다.
/// 태그가 없으면 빈 Metadata를 반환한다.
pub fn read_tags(path: &Path) -> Result<Metadata> {
    let tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(id3::Error {
            kind: id3::ErrorKind::NoTag,
            ..
        }) => return Ok(Metadata::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("태그를 읽을 수 없습니다: {}", path.display()))
        }
    };

    let mut meta = Metadata::new();
    let text_fields = [
        ("title", tag.title()),
        ("artist", tag.artist()),
        ("album", tag.album()),
        ("albumartist", tag.album_artist()),
    ];
    for (key, value) in text_fields {
        if let Some(value) = value {
            meta.set(key, value);
        }
    }
    if let Some(track) = tag.track() {
        meta.set("tracknumber", track.to_string());
    }
    if let Some(year) = tag.year() {
        meta.set("date", year.to_string());
    }
    if let Some(genre) = tag.genre_parsed() {
        meta.set("genre", genre.into_owned());
    }
    if let Some(lyrics) = tag.lyrics().next() {
        meta.set("lyrics", lyrics.text.clone());
    }

    Ok(meta)
}

/// Metadata를 MP3 파일에 ID3v2.4 태그로 기록한다.
/// 기존 태그가 있으면 Metadata에 있는 필드만 덮어쓴다.
pub fn write_tags(path: &Path, meta: &Metadata) -> Result<()> {
    let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());

    if let Some(title) = meta.get_non_empty("title") {
        tag.set_title(title);
    }
    if let Some(artist) = meta.get_non_empty("artist") {
        tag.set_artist(artist);
    }
    if let Some(album) = meta.get_non_empty("album") {
        tag.set_album(album);
    }
    if let Some(album_artist) = meta.get_non_empty("albumartist") {
        tag.set_album_artist(album_artist);
    }
    if let Some(track) = meta.get("tracknumber").and_then(|t| t.parse().ok()) {
        tag.set_track(track);
    }
    if let Some(year) = meta.get("date").and_then(|y| y.parse().ok()) {
        tag.set_year(year);
    }
    if let Some(genre) = meta.get_non_empty("genre") {
        tag.set_genre(genre);
    }
    if let Some(text) = meta.lyrics() {
        tag.remove_all_lyrics();
        tag.add_frame(Lyrics {
            lang: "eng".to_string(),
            description: String::new(),
            text: text.to_string(),
        });
    }

    tag.write_to_path(path, Version::Id3v24)
        .with_context(|| format!("태그를 기록할 수 없습니다: {}", path.display()))?;
    Ok(())
}

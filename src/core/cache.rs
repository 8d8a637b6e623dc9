use std::collections::HashMap;

/// 가져온 가사를 내보내기 단계까지 들고 있는 캐시.
/// 트랙 제목을 키로 쓰므로 같은 제목의 트랙끼리는 한 칸을 공유한다.
#[derive(Debug, Default)]
pub struct LyricsCache {
    entries: HashMap<String, String>,
}

impl LyricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기존 값이 있으면 덮어쓴다.
    pub fn insert(&mut self, title: &str, lyrics: &str) {
        self.entries.insert(title.to_string(), lyrics.to_string());
    }

    /// 꺼내면서 캐시에서 지운다.
    pub fn take(&mut self, title: &str) -> Option<String> {
        self.entries.remove(title)
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.entries.get(title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

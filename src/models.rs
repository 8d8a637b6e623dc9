use std::collections::BTreeMap;
use std::path::PathBuf;

/// 트랙에 붙은 태그를 문자열 키/값으로 보관한다.
/// 키 이름은 `title`, `artist`, `album`, `lyrics` 등 소문자 태그 이름을 쓴다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    tags: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// 키가 없으면 None. 빈 문자열도 그대로 반환한다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// 값이 있고 비어있지 않을 때만 반환한다.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get_non_empty(key).is_some()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        self.get_non_empty("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.get_non_empty("artist")
    }

    pub fn album(&self) -> Option<&str> {
        self.get_non_empty("album")
    }

    pub fn lyrics(&self) -> Option<&str> {
        self.get_non_empty("lyrics")
    }

    pub fn display_title(&self) -> &str {
        self.title().unwrap_or("알 수 없음")
    }

    pub fn display_artist(&self) -> &str {
        self.artist().unwrap_or("알 수 없음")
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tags: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 디스크 위의 오디오 파일 하나와 그 태그.
#[derive(Debug, Clone)]
pub struct TrackFile {
    pub path: PathBuf,
    pub metadata: Metadata,
}

impl TrackFile {
    pub fn new(path: impl Into<PathBuf>, metadata: Metadata) -> Self {
        Self {
            path: path.into(),
            metadata,
        }
    }

    pub fn filename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("알 수 없음")
    }
}

/// 트랙. 이 도구에서는 보통 파일 하나만 연결된다.
#[derive(Debug, Clone, Default)]
pub struct Track {
    pub files: Vec<TrackFile>,
}

impl Track {
    pub fn from_file(file: TrackFile) -> Self {
        Self { files: vec![file] }
    }

    pub fn first_file_mut(&mut self) -> Option<&mut TrackFile> {
        self.files.first_mut()
    }
}

use super::base::{StorageBackend, StorageCategory, StorageError};
use async_trait::async_trait;
use erased_serde::Serialize as ErasedSerialize;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// File names of each artifact, relative to the storage root.
#[derive(Debug, Clone)]
struct DiskLayout {
    topics_file: String,
    answers_file: String,
    search_screenshot: String,
    screenshot_dir: String,
}

impl Default for DiskLayout {
    fn default() -> Self {
        Self {
            topics_file: "topic.json".to_string(),
            answers_file: "top.json".to_string(),
            search_screenshot: "screenshot.png".to_string(),
            screenshot_dir: "screenshot".to_string(),
        }
    }
}

/// Writes every artifact under one root, replacing any previous file.
///
/// Missing parent directories, including the `screenshot/` directory for
/// per-topic captures, are created on write rather than expected to exist.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    base_path: PathBuf,
    layout: DiskLayout,
    pretty: bool,
}

impl DiskStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            layout: DiskLayout::default(),
            pretty: false,
        })
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path_for(&self, category: &StorageCategory) -> PathBuf {
        match category {
            StorageCategory::Topics => self.base_path.join(&self.layout.topics_file),
            StorageCategory::Answers => self.base_path.join(&self.layout.answers_file),
            StorageCategory::SearchScreenshot => {
                self.base_path.join(&self.layout.search_screenshot)
            }
            StorageCategory::TopicScreenshot(id) => self
                .base_path
                .join(&self.layout.screenshot_dir)
                .join(format!("topic-{}.png", id)),
        }
    }

    fn write(&self, category: &StorageCategory, contents: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.path_for(category);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}

#[async_trait]
impl StorageBackend for DiskStorage {
    async fn store_serialized(
        &self,
        category: StorageCategory,
        data: &(dyn ErasedSerialize + Sync),
    ) -> Result<PathBuf, StorageError> {
        let json = if self.pretty {
            serde_json::to_vec_pretty(data)?
        } else {
            serde_json::to_vec(data)?
        };
        self.write(&category, &json)
    }

    async fn store_bytes(
        &self,
        category: StorageCategory,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        self.write(&category, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Answer, Author, StatusLink, Topic, TopicAnswerMap};

    fn topic(id: &str) -> Topic {
        let link = |suffix: &str| StatusLink {
            link: format!("https://www.zhihu.com/topic/{}/{}", id, suffix),
            text: suffix.to_string(),
        };
        Topic {
            id: id.to_string(),
            title: format!("title {}", id),
            desc: "desc".to_string(),
            focus: link("followers"),
            question: link("questions"),
            top: link("top-answers"),
        }
    }

    #[tokio::test]
    async fn test_rewrite_overwrites_instead_of_appending() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap();
        let topics = vec![topic("1"), topic("2")];

        let path = storage
            .store_serialized(StorageCategory::Topics, &topics)
            .await
            .unwrap();
        let first = fs::read(&path).unwrap();

        storage
            .store_serialized(StorageCategory::Topics, &topics)
            .await
            .unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(path, dir.path().join("topic.json"));
        let decoded: Vec<Topic> = serde_json::from_slice(&second).unwrap();
        assert_eq!(decoded, topics);
    }

    #[tokio::test]
    async fn test_shorter_rewrite_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap();

        let many = vec![topic("1"), topic("2"), topic("3")];
        let few = vec![topic("4")];
        storage
            .store_serialized(StorageCategory::Topics, &many)
            .await
            .unwrap();
        let path = storage
            .store_serialized(StorageCategory::Topics, &few)
            .await
            .unwrap();

        assert_eq!(fs::read(&path).unwrap(), serde_json::to_vec(&few).unwrap());
    }

    #[tokio::test]
    async fn test_answers_written_as_object() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap().with_pretty(true);
        let mut map = TopicAnswerMap::new();
        map.insert(
            "42".to_string(),
            vec![Answer {
                author: Author {
                    name: "X".to_string(),
                    avatar: "http://img/a.png".to_string(),
                },
                id: "t1".to_string(),
                upvote_num: 5,
                comment_num: 2,
            }],
        );

        let path = storage
            .store_serialized(StorageCategory::Answers, &map)
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("top.json"));

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["42"][0]["upvoteNum"], 5);
        assert_eq!(value["42"][0]["author"]["name"], "X");
    }

    #[tokio::test]
    async fn test_topic_screenshot_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap();

        let path = storage
            .store_bytes(StorageCategory::TopicScreenshot("19554298".to_string()), b"png")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("screenshot").join("topic-19554298.png"));
        assert_eq!(fs::read(path).unwrap(), b"png");
    }
}

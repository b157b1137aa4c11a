use super::{first_in, resolve_link, selector};
use crate::{ScraperError, ScraperResult};
use log::trace;
use scraper::Html;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

pub const ANSWER_ITEM_SELECTOR: &str = ".AnswerItem";
pub const ANSWER_WAIT_SELECTOR: &str = "div.AnswerItem";
const AVATAR_SELECTOR: &str = ".AuthorInfo-avatar";
const ZOP_ATTR: &str = "data-zop";
const EXTRA_MODULE_ATTR: &str = "data-za-extra-module";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub author: Author,
    pub id: String,
    pub upvote_num: u64,
    pub comment_num: u64,
}

#[derive(Debug, Deserialize)]
struct ZopData {
    #[serde(rename = "authorName", default)]
    author_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtraModule {
    card: ExtraCard,
}

#[derive(Debug, Deserialize)]
struct ExtraCard {
    content: ExtraContent,
}

#[derive(Debug, Deserialize)]
struct ExtraContent {
    token: String,
    upvote_num: u64,
    comment_num: u64,
}

/// Builds an [`Answer`] from the two JSON data attributes of an answer item
/// and the avatar URL of its author.
pub fn shape_answer(zop: &str, extra_module: &str, avatar: &str) -> ScraperResult<Answer> {
    let zop: ZopData = serde_json::from_str(zop)?;
    let extra: ExtraModule = serde_json::from_str(extra_module)?;
    let content = extra.card.content;

    Ok(Answer {
        author: Author {
            name: zop.author_name.unwrap_or_default(),
            avatar: avatar.to_string(),
        },
        id: content.token,
        upvote_num: content.upvote_num,
        comment_num: content.comment_num,
    })
}

/// Shapes every answer item of a detail page snapshot, in document order.
pub fn parse_answers(html: &str, page_url: &Url) -> ScraperResult<Vec<Answer>> {
    let document = Html::parse_document(html);
    let item_sel = selector(ANSWER_ITEM_SELECTOR)?;
    let avatar_sel = selector(AVATAR_SELECTOR)?;

    trace!("Parsing detail snapshot of {} bytes", html.len());

    document
        .select(&item_sel)
        .enumerate()
        .map(|(index, item)| {
            let attr = |name: &str| {
                item.value().attr(name).ok_or_else(|| {
                    ScraperError::ExtractionError(format!("answer item {} has no {}", index, name))
                })
            };
            let zop = attr(ZOP_ATTR)?;
            let extra = attr(EXTRA_MODULE_ATTR)?;
            let avatar = first_in(&item, &avatar_sel, "author avatar")?
                .value()
                .attr("src")
                .map(|src| resolve_link(page_url, src))
                .unwrap_or_default();
            shape_answer(zop, extra, &avatar)
        })
        .collect()
}

/// Answers per topic id, serialized as a JSON object in crawl order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicAnswerMap {
    entries: Vec<(String, Vec<Answer>)>,
}

impl TopicAnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated id keeps its original position and takes the new answers.
    pub fn insert(&mut self, topic_id: String, answers: Vec<Answer>) {
        match self.entries.iter_mut().find(|(id, _)| *id == topic_id) {
            Some(entry) => entry.1 = answers,
            None => self.entries.push((topic_id, answers)),
        }
    }

    pub fn get(&self, topic_id: &str) -> Option<&[Answer]> {
        self.entries
            .iter()
            .find(|(id, _)| id == topic_id)
            .map(|(_, answers)| answers.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_answers(&self) -> usize {
        self.entries.iter().map(|(_, answers)| answers.len()).sum()
    }
}

impl FromIterator<(String, Vec<Answer>)> for TopicAnswerMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Answer>)>>(iter: I) -> Self {
        let mut map = TopicAnswerMap::new();
        for (topic_id, answers) in iter {
            map.insert(topic_id, answers);
        }
        map
    }
}

impl Serialize for TopicAnswerMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (topic_id, answers) in &self.entries {
            map.serialize_entry(topic_id, answers)?;
        }
        map.end()
    }
}

use super::{first_in, resolve_link, selector, text_content};
use crate::{ScraperError, ScraperResult};
use log::{debug, trace};
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

pub const CARD_SELECTOR: &str = ".SearchResult-Card";
pub const CARD_WAIT_SELECTOR: &str = "div.SearchResult-Card";
const TOPIC_LINK_SELECTOR: &str = ".TopicLink";
const TITLE_SELECTOR: &str = ".Highlight";
const DESC_SELECTOR: &str = ".SearchItem-meta";
const STATUS_LINK_SELECTOR: &str = ".Search-statusLink";

/// focus, question, top
const STATUS_LINKS_PER_CARD: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLink {
    pub link: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub focus: StatusLink,
    pub question: StatusLink,
    pub top: StatusLink,
}

/// The id is whatever follows the last `/` of the topic link.
pub fn topic_id_from_link(link: &str) -> String {
    match link.rfind('/') {
        Some(idx) => link[idx + 1..].to_string(),
        None => link.to_string(),
    }
}

/// Extracts one [`Topic`] per search result card in a page snapshot.
///
/// Relative links are resolved against `page_url`. Every card must carry
/// exactly three status links; anything else is reported as a
/// [`ScraperError::StructureError`].
pub fn parse_topics(html: &str, page_url: &Url) -> ScraperResult<Vec<Topic>> {
    let document = Html::parse_document(html);
    let card_sel = selector(CARD_SELECTOR)?;
    let link_sel = selector(TOPIC_LINK_SELECTOR)?;
    let title_sel = selector(TITLE_SELECTOR)?;
    let desc_sel = selector(DESC_SELECTOR)?;
    let status_sel = selector(STATUS_LINK_SELECTOR)?;

    trace!("Parsing search snapshot of {} bytes", html.len());

    let mut topics = Vec::new();
    for (index, card) in document.select(&card_sel).enumerate() {
        let link = first_in(&card, &link_sel, "topic link")?
            .value()
            .attr("href")
            .map(|href| resolve_link(page_url, href))
            .ok_or_else(|| {
                ScraperError::ExtractionError(format!("topic link of card {} has no href", index))
            })?;
        let title = text_content(&first_in(&card, &title_sel, "title")?);
        let desc = text_content(&first_in(&card, &desc_sel, "description")?);

        let mut status_links: Vec<StatusLink> = card
            .select(&status_sel)
            .map(|item| StatusLink {
                link: item
                    .value()
                    .attr("href")
                    .map(|href| resolve_link(page_url, href))
                    .unwrap_or_default(),
                text: text_content(&item),
            })
            .collect();

        if status_links.len() != STATUS_LINKS_PER_CARD {
            return Err(ScraperError::StructureError {
                context: format!("status links of search card {}", index),
                expected: STATUS_LINKS_PER_CARD,
                found: status_links.len(),
            });
        }

        let top = status_links.remove(2);
        let question = status_links.remove(1);
        let focus = status_links.remove(0);

        let topic = Topic {
            id: topic_id_from_link(&link),
            title,
            desc,
            focus,
            question,
            top,
        };
        debug!("Extracted topic {} ({})", topic.id, topic.title);
        topics.push(topic);
    }

    Ok(topics)
}

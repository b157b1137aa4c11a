pub mod answer;
pub mod cookie;
pub mod topic;

pub use answer::{parse_answers, shape_answer, Answer, Author, TopicAnswerMap};
pub use cookie::{parse_cookie_string, Cookie};
pub use topic::{parse_topics, topic_id_from_link, StatusLink, Topic};

use crate::{ScraperError, ScraperResult};
use scraper::{ElementRef, Selector};
use url::Url;

pub(crate) fn selector(css: &str) -> ScraperResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::ExtractionError(format!("invalid selector {:?}: {:?}", css, e)))
}

/// Equivalent of the DOM `textContent` of an element.
pub(crate) fn text_content(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// Resolves a raw attribute the way the DOM `href`/`src` properties do.
pub(crate) fn resolve_link(base: &Url, raw: &str) -> String {
    base.join(raw)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn first_in<'a>(
    element: &ElementRef<'a>,
    selector: &Selector,
    what: &str,
) -> ScraperResult<ElementRef<'a>> {
    element
        .select(selector)
        .next()
        .ok_or_else(|| ScraperError::ExtractionError(format!("missing {} element", what)))
}

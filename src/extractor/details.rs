use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::courses::DetailFacts;
use crate::extractor::ExtractError;

const RESTRICTIONS_ID: &str = "ctl00_ContentPlaceHolder1_PCRRepeater_ctl00_PCRDescriptionLabel";
const EQUIVALENTS_ID: &str = "ctl00_ContentPlaceHolder1_PCRRepeater_ctl01_PCRDescriptionLabel";
// FIXME: same label as restrictions, so the prerequisites column always echoes
// the restrictions text. Swap in the real label once the catalog confirms it.
const PREREQUISITES_ID: &str = RESTRICTIONS_ID;
const CONTRIBUTORS_ID: &str = "ctl00_ContentPlaceHolder1_ContributorsDiv";

/// Relative links to staff profiles start with this page name.
const PERSON_PAGE: &str = "ShowPeopleDetails.aspx";

fn by_id(tag: &str, id: &str) -> Selector {
    Selector::parse(&format!("{tag}#{id}")).expect("Invalid detail region selector")
}

static RESTRICTIONS: LazyLock<Selector> = LazyLock::new(|| by_id("span", RESTRICTIONS_ID));
static EQUIVALENTS: LazyLock<Selector> = LazyLock::new(|| by_id("span", EQUIVALENTS_ID));
static PREREQUISITES: LazyLock<Selector> = LazyLock::new(|| by_id("span", PREREQUISITES_ID));
static CONTRIBUTORS: LazyLock<Selector> = LazyLock::new(|| by_id("div", CONTRIBUTORS_ID));
static SELECTOR_A: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("Invalid a selector"));

fn link_texts(region: ElementRef<'_>) -> Vec<String> {
    region
        .select(&SELECTOR_A)
        .map(|link| link.text().collect())
        .collect()
}

/// Region text with a space between text nodes, then the text of each link.
fn text_and_links(region: ElementRef<'_>) -> Vec<String> {
    let text = region.text().collect::<Vec<_>>().join(" ");
    let mut out = vec![text.trim().to_string()];
    out.extend(link_texts(region));
    out
}

/// `"<name> (<url>)"` for the first linked contributor, profile links made absolute.
fn contact_person(region: ElementRef<'_>, base_url: &Url) -> Option<String> {
    let link = region.select(&SELECTOR_A).next()?;
    let href = link.value().attr("href")?;
    let name: String = link.text().collect();

    let href = if href.starts_with(PERSON_PAGE) {
        format!("{base_url}{href}")
    } else {
        href.to_string()
    };
    Some(format!("{name} ({href})"))
}

/// Read restrictions, equivalents, prerequisites and the contact person from a
/// course detail page.
pub fn parse_course_details(html: &str, base_url: &Url) -> Result<DetailFacts, ExtractError> {
    let document = Html::parse_document(html);

    let restrictions = document.select(&RESTRICTIONS).next();
    let equivalents = document.select(&EQUIVALENTS).next();
    let prerequisites = document.select(&PREREQUISITES).next();
    let contributors = document.select(&CONTRIBUTORS).next();

    if restrictions.is_none()
        && equivalents.is_none()
        && prerequisites.is_none()
        && contributors.is_none()
    {
        return Err(ExtractError::NoDetailSection);
    }

    Ok(DetailFacts {
        restrictions: restrictions.map(link_texts).unwrap_or_default(),
        equivalents: equivalents.map(link_texts).unwrap_or_default(),
        prerequisites: prerequisites.map(text_and_links).unwrap_or_default(),
        contact_persons: contributors
            .and_then(|region| contact_person(region, base_url))
            .into_iter()
            .collect(),
    })
}

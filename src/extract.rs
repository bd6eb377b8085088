use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

use crate::models::{ExtractedProduct, PanelSnapshot};
use crate::parsers::{clean_text, find_ingredients_line, preview_text};

// The site's markup alternates between a precise title element and a
// generic one, hence the two-tier chain.
static TITLE_PRIMARY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2#modalTitle.title.description").expect("Invalid title selector")
});
static TITLE_FALLBACK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, .modal-title").expect("Invalid title fallback selector"));
static PRICE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".number").expect("Invalid price selector"));
static SMALL_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".smallText").expect("Invalid small-text selector"));
static BRAND: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".brand-name").expect("Invalid brand selector"));
static IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img.pic, img[itemprop='image']").expect("Invalid image selector"));
static NUTRITION_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".nutritionItem").expect("Invalid nutrition item selector"));
static NUTRITION_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".text").expect("Invalid nutrition label selector"));
static NUTRITION_VALUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".number").expect("Invalid nutrition value selector"));

/// Unit prices are small-print lines carrying the shekel marker.
const CURRENCY_MARKER: &str = "ש\"ח";

pub const PREVIEW_MAX_CHARS: usize = 300;

/// Read every known field out of a captured detail panel. Fields fail
/// independently: a selector that matches nothing leaves its field unset
/// and extraction moves on. Always returns a record, never an error.
pub fn extract_product(snapshot: &PanelSnapshot, base_url: &str) -> ExtractedProduct {
    let doc = Html::parse_fragment(&snapshot.html);

    let title = select_text(&doc, &TITLE_PRIMARY)
        .or_else(|| select_text(&doc, &TITLE_FALLBACK))
        .unwrap_or_default();

    let price = select_text(&doc, &PRICE);
    let unit_price = doc
        .select(&SMALL_TEXT)
        .map(element_text)
        .find(|text| text.contains(CURRENCY_MARKER));

    let brand = select_text(&doc, &BRAND);

    let image_url = doc
        .select(&IMAGE)
        .find_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(|src| absolutize(src, base_url));

    let ingredients = snapshot.text.as_deref().and_then(find_ingredients_line);

    let nutrition = extract_nutrition(&doc);
    let nutrition = (!nutrition.is_empty()).then_some(nutrition);

    let raw_preview = snapshot
        .text
        .as_deref()
        .map(|text| preview_text(text, PREVIEW_MAX_CHARS));

    ExtractedProduct {
        title,
        price,
        unit_price,
        brand,
        image_url,
        ingredients,
        nutrition,
        raw_preview,
    }
}

/// Each nutrition item is its own failure unit: a row missing its label or
/// value is skipped without disturbing the rest of the enumeration.
fn extract_nutrition(doc: &Html) -> BTreeMap<String, String> {
    let mut facts = BTreeMap::new();
    for item in doc.select(&NUTRITION_ITEM) {
        let label = item
            .select(&NUTRITION_LABEL)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let value = item
            .select(&NUTRITION_VALUE)
            .next()
            .map(element_text)
            .unwrap_or_default();
        if !label.is_empty() && !value.is_empty() {
            facts.insert(label, value);
        }
    }
    facts
}

fn select_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn element_text(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

fn absolutize(src: &str, base_url: &str) -> String {
    if Url::parse(src).is_ok() {
        return src.to_string();
    }
    if let Ok(base) = Url::parse(base_url) {
        if let Ok(joined) = base.join(src) {
            return joined.to_string();
        }
    }
    src.to_string()
}

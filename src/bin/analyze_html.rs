use anyhow::Result;
use reqwest::Client;
use scraper::{Html, Selector};
use std::fs;

#[tokio::main]
async fn main() -> Result<()> {
    let client = Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36")
        .build()?;

    println!("Fetching category page HTML...");
    let response = client
        .get("https://www.shufersal.co.il/online/he/קטגוריות/סופרמרקט/חלב-וביצים/c/A01")
        .send()
        .await?;
    let html = response.text().await?;
    fs::write("category_sample.html", &html)?;

    let document = Html::parse_document(&html);

    let card_selector = Selector::parse("li.miglog-prod").unwrap();
    let cards = document.select(&card_selector);
    println!("Found {} product card elements", cards.count());

    // Probe the production selectors against the static page. The modal
    // content is client-rendered, so zero matches here only means the field
    // needs the live browser run.
    let selectors = vec![
        "a.imgContainer[data-target='#productModal']",
        "#productModal",
        "h2#modalTitle.title.description",
        "h1, .modal-title",
        ".brand-name",
        ".number",
        ".smallText",
        "img.pic, img[itemprop='image']",
        ".nutritionItem",
    ];

    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            let count = document.select(&selector).count();
            if count > 0 {
                println!("Selector '{}' matched {} elements", selector_str, count);
            }
        }
    }

    Ok(())
}

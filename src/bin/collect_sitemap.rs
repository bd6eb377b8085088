use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{error, info, warn};

/// URL paths that mark a product detail page.
static PRODUCT_PATH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/product/|/p/").expect("Invalid product path regex"));

pub struct SitemapConfig {
    pub root_sitemap: PathBuf,
    pub output_file: PathBuf,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            root_sitemap: PathBuf::from("GoogleSitemap.xml"),
            output_file: PathBuf::from("shufersal_products.txt"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("collect_sitemap=info".parse()?),
        )
        .init();

    let config = SitemapConfig::default();
    match collect_product_urls(&config) {
        Ok(urls) => {
            write_url_list(&config.output_file, &urls)?;
            info!(
                "Saved {} product URLs to {}",
                urls.len(),
                config.output_file.display()
            );
            Ok(())
        }
        Err(e) => {
            // Fatal: no output file is produced.
            error!("Sitemap collection failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Read the root sitemap, then every child sitemap that exists locally,
/// keeping product-path URLs in encounter order. A missing or unreadable
/// child is skipped with a warning; a missing root is fatal.
fn collect_product_urls(config: &SitemapConfig) -> Result<Vec<String>> {
    if !config.root_sitemap.exists() {
        bail!("main sitemap not found: {}", config.root_sitemap.display());
    }

    info!("Reading main sitemap: {}", config.root_sitemap.display());
    let urls = parse_sitemap_file(&config.root_sitemap)?;
    info!("Found {} URLs in main sitemap", urls.len());

    let child_sitemaps: Vec<&String> = urls
        .iter()
        .filter(|url| url.to_lowercase().ends_with(".xml"))
        .collect();
    info!("Found {} child sitemaps", child_sitemaps.len());

    let base_dir = config.root_sitemap.parent().unwrap_or(Path::new("."));
    let mut products = Vec::new();

    for child in child_sitemaps {
        let Some(filename) = child.rsplit('/').next().filter(|name| !name.is_empty()) else {
            continue;
        };
        let local_path = base_dir.join(filename);
        if !local_path.exists() {
            warn!("Missing local file for {}, skipping", filename);
            continue;
        }

        info!("Parsing {}", filename);
        match parse_sitemap_file(&local_path) {
            Ok(child_urls) => {
                let before = products.len();
                products.extend(child_urls.into_iter().filter(|url| is_product_url(url)));
                info!("{} product URLs found in {}", products.len() - before, filename);
            }
            Err(e) => warn!("Could not parse {}, skipping: {:#}", filename, e),
        }
    }

    Ok(products)
}

/// Return all `<loc>` URLs from a sitemap XML file. Tag names are matched
/// by suffix so the sitemap namespace prefix does not matter.
fn parse_sitemap_file(path: &Path) -> Result<Vec<String>> {
    let xml =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut in_loc = false;
    let mut locs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref().ends_with(b"loc") => in_loc = true,
            Ok(Event::End(e)) if e.name().as_ref().ends_with(b"loc") => in_loc = false,
            Ok(Event::Text(t)) if in_loc => {
                locs.push(t.unescape()?.trim().to_string());
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("XML error in {}: {}", path.display(), e),
            _ => {}
        }
        buf.clear();
    }

    Ok(locs)
}

fn is_product_url(url: &str) -> bool {
    PRODUCT_PATH_REGEX.is_match(url)
}

fn write_url_list(path: &Path, urls: &[String]) -> Result<()> {
    let mut out = String::new();
    for url in urls {
        out.push_str(url);
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const ROOT_SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://www.example.com/a.xml</loc></sitemap>
  <sitemap><loc>https://www.example.com/b.xml</loc></sitemap>
</sitemapindex>"#;

    const CHILD_A: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://www.example.com/product/123</loc></url>
  <url><loc>https://www.example.com/about</loc></url>
  <url><loc>https://www.example.com/p/456</loc></url>
</urlset>"#;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn collects_product_urls_from_present_children_in_order() {
        let dir = TempDir::new().unwrap();
        let root = write_file(dir.path(), "GoogleSitemap.xml", ROOT_SITEMAP);
        write_file(dir.path(), "a.xml", CHILD_A);
        // b.xml is deliberately absent: it must be skipped, not fatal.

        let config = SitemapConfig {
            root_sitemap: root,
            output_file: dir.path().join("out.txt"),
        };
        let urls = collect_product_urls(&config).unwrap();

        assert_eq!(
            urls,
            vec![
                "https://www.example.com/product/123".to_string(),
                "https://www.example.com/p/456".to_string(),
            ]
        );
    }

    #[test]
    fn missing_root_sitemap_is_fatal_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = SitemapConfig {
            root_sitemap: dir.path().join("GoogleSitemap.xml"),
            output_file: dir.path().join("out.txt"),
        };

        assert!(collect_product_urls(&config).is_err());
        assert!(!config.output_file.exists());
    }

    #[test]
    fn parses_loc_entries_with_namespace_prefix() {
        let dir = TempDir::new().unwrap();
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sm:sitemapindex xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sm:sitemap><sm:loc>https://www.example.com/c.xml</sm:loc></sm:sitemap>
</sm:sitemapindex>"#;
        let path = write_file(dir.path(), "prefixed.xml", xml);

        let locs = parse_sitemap_file(&path).unwrap();
        assert_eq!(locs, vec!["https://www.example.com/c.xml".to_string()]);
    }

    #[test]
    fn product_path_pattern() {
        assert!(is_product_url("https://www.example.com/product/123"));
        assert!(is_product_url("https://www.example.com/p/456"));
        assert!(!is_product_url("https://www.example.com/category/milk"));
    }

    #[test]
    fn writes_one_url_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let urls = vec!["https://a/product/1".to_string(), "https://a/p/2".to_string()];
        write_url_list(&path, &urls).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "https://a/product/1\nhttps://a/p/2\n"
        );
    }
}

//! HTML parser producing the facts the scorer and prioritizer consult
//!
//! A fetched page is parsed exactly once into a [`PageDocument`], a plain-data
//! snapshot (title, full text, headings, metas, paragraphs, lists, classed
//! blocks, anchors). Everything downstream works on that snapshot, so the
//! non-`Send` scraper tree never lives across an await point.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta"));
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static LISTS: LazyLock<Selector> = LazyLock::new(|| selector("ul, ol"));
static LIST_ITEMS: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static CLASSED_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| selector("div[class], section[class]"));
static ARTICLES: LazyLock<Selector> = LazyLock::new(|| selector("article"));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// A `<meta>` tag's identifying attributes and content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTag {
    pub name: Option<String>,
    pub property: Option<String>,
    pub content: String,
}

/// A heading (`h1` or `h2`) in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 or 2
    pub level: u8,
    pub text: String,
}

/// A `ul`/`ol` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBlock {
    /// Text of every descendant text node, trimmed and space-joined
    pub text: String,
    /// Trimmed text of every descendant `li`
    pub items: Vec<String>,
}

/// A `div` or `section` carrying a class attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassedBlock {
    pub class: String,
    /// Character count of the block's text with whitespace-only runs removed
    pub text_len: usize,
}

/// An anchor with an `href`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    /// Trimmed link text
    pub text: String,
    /// Class attribute of the closest enclosing `nav`, `ul` or `li`
    pub region_class: Option<String>,
}

/// Parsed facts of one HTML page
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    pub title: Option<String>,
    /// All text of the document, newlines preserved
    pub text: String,
    pub headings: Vec<Heading>,
    pub metas: Vec<MetaTag>,
    /// Trimmed paragraph texts
    pub paragraphs: Vec<String>,
    pub lists: Vec<ListBlock>,
    pub blocks: Vec<ClassedBlock>,
    pub article_count: usize,
    pub anchors: Vec<Anchor>,
}

impl PageDocument {
    /// Parses an HTML document
    ///
    /// # Example
    ///
    /// ```
    /// use ui_faculty_finder::crawler::PageDocument;
    ///
    /// let html = r#"<html><head><title>Fakultas Teknik</title></head>
    ///     <body><h1>Selamat Datang</h1><a href="/akademik/">Akademik</a></body></html>"#;
    /// let page = PageDocument::parse(html);
    /// assert_eq!(page.title.as_deref(), Some("Fakultas Teknik"));
    /// assert_eq!(page.anchors[0].text, "Akademik");
    /// ```
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE)
            .next()
            .map(|element| element_text(&element).trim().to_string())
            .filter(|s| !s.is_empty());

        let headings = document
            .select(&HEADINGS)
            .map(|element| Heading {
                level: if element.value().name() == "h1" { 1 } else { 2 },
                text: element_text(&element).trim().to_string(),
            })
            .collect();

        let metas = document
            .select(&META)
            .map(|element| {
                let attrs = element.value();
                MetaTag {
                    name: attrs.attr("name").map(str::to_string),
                    property: attrs.attr("property").map(str::to_string),
                    content: attrs.attr("content").unwrap_or_default().trim().to_string(),
                }
            })
            .collect();

        let paragraphs = document
            .select(&PARAGRAPHS)
            .map(|element| element_text(&element).trim().to_string())
            .collect();

        let lists = document
            .select(&LISTS)
            .map(|element| ListBlock {
                text: stripped_strings(&element).join(" "),
                items: element
                    .select(&LIST_ITEMS)
                    .map(|li| element_text(&li).trim().to_string())
                    .collect(),
            })
            .collect();

        let blocks = document
            .select(&CLASSED_BLOCKS)
            .map(|element| ClassedBlock {
                class: element.value().attr("class").unwrap_or_default().to_string(),
                text_len: stripped_strings(&element)
                    .iter()
                    .map(|s| s.chars().count())
                    .sum(),
            })
            .collect();

        let anchors = document
            .select(&ANCHORS)
            .filter_map(|element| {
                let href = element.value().attr("href")?.to_string();
                Some(Anchor {
                    href,
                    text: element_text(&element).trim().to_string(),
                    region_class: region_class(&element),
                })
            })
            .collect();

        Self {
            title,
            text: element_text(&document.root_element()),
            headings,
            metas,
            paragraphs,
            lists,
            blocks,
            article_count: document.select(&ARTICLES).count(),
            anchors,
        }
    }

    /// Lowercased page title, empty when the page has none
    pub fn title_lower(&self) -> String {
        self.title.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Text of the first heading at the given level
    pub fn first_heading(&self, level: u8) -> Option<&str> {
        self.headings
            .iter()
            .find(|h| h.level == level)
            .map(|h| h.text.as_str())
    }

    /// Content of the first meta tag with the given `name`
    pub fn meta_by_name(&self, name: &str) -> Option<&str> {
        self.metas
            .iter()
            .find(|m| m.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .map(|m| m.content.as_str())
    }

    /// Content of the first meta tag with the given `property`
    pub fn meta_by_property(&self, property: &str) -> Option<&str> {
        self.metas
            .iter()
            .find(|m| m.property.as_deref() == Some(property))
            .map(|m| m.content.as_str())
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

fn stripped_strings(element: &ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn region_class(element: &ElementRef<'_>) -> Option<String> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| matches!(ancestor.value().name(), "nav" | "ul" | "li"))
        .and_then(|ancestor| ancestor.value().attr("class").map(str::to_string))
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then_some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://www.ui.ac.id/akademik/").unwrap()
    }

    #[test]
    fn test_title_is_trimmed() {
        let page = PageDocument::parse("<html><head><title>  Beranda  </title></head></html>");
        assert_eq!(page.title.as_deref(), Some("Beranda"));
        assert_eq!(page.title_lower(), "beranda");
    }

    #[test]
    fn test_missing_title() {
        let page = PageDocument::parse("<html><head></head><body></body></html>");
        assert_eq!(page.title, None);
        assert_eq!(page.title_lower(), "");
    }

    #[test]
    fn test_headings_in_document_order() {
        let html = "<body><h2>Berita</h2><h1>Fakultas Hukum</h1><h2>Profil</h2></body>";
        let page = PageDocument::parse(html);
        assert_eq!(page.headings.len(), 3);
        assert_eq!(page.first_heading(1), Some("Fakultas Hukum"));
        assert_eq!(page.first_heading(2), Some("Berita"));
    }

    #[test]
    fn test_meta_lookup() {
        let html = r#"<head>
            <meta name="Description" content=" Kampus hijau ">
            <meta property="og:site_name" content="Fakultas Farmasi UI">
        </head>"#;
        let page = PageDocument::parse(html);
        assert_eq!(page.meta_by_name("description"), Some("Kampus hijau"));
        assert_eq!(page.meta_by_property("og:site_name"), Some("Fakultas Farmasi UI"));
        assert_eq!(page.meta_by_property("og:type"), None);
    }

    #[test]
    fn test_lists_collect_items() {
        let html = "<ul><li> Sarjana Farmasi </li><li>Magister Farmasi</li></ul>";
        let page = PageDocument::parse(html);
        assert_eq!(page.lists.len(), 1);
        assert_eq!(page.lists[0].items, vec!["Sarjana Farmasi", "Magister Farmasi"]);
        assert_eq!(page.lists[0].text, "Sarjana Farmasi Magister Farmasi");
    }

    #[test]
    fn test_classed_block_length_ignores_whitespace_runs() {
        let html = r#"<div class="faculty-profile">  abc  <span> de </span>  </div>"#;
        let page = PageDocument::parse(html);
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].class, "faculty-profile");
        assert_eq!(page.blocks[0].text_len, 5);
    }

    #[test]
    fn test_anchor_region_class() {
        let html = r#"
            <nav class="main-menu"><a href="/akademik/">Akademik</a></nav>
            <div><a href="/berita/">Berita</a></div>
        "#;
        let page = PageDocument::parse(html);
        assert_eq!(page.anchors.len(), 2);
        assert_eq!(page.anchors[0].region_class.as_deref(), Some("main-menu"));
        assert_eq!(page.anchors[1].region_class, None);
    }

    #[test]
    fn test_article_count() {
        let page = PageDocument::parse("<article></article><article></article>");
        assert_eq!(page.article_count, 2);
    }

    #[test]
    fn test_resolve_relative_link() {
        let resolved = resolve_link("fakultas/", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://www.ui.ac.id/akademik/fakultas/");

        let resolved = resolve_link("/riset/", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://www.ui.ac.id/riset/");
    }

    #[test]
    fn test_resolve_absolute_link() {
        let resolved = resolve_link("https://eng.ui.ac.id/", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://eng.ui.ac.id/");
    }

    #[test]
    fn test_resolve_skips_special_links() {
        for href in [
            "",
            "#top",
            "javascript:void(0)",
            "JavaScript:alert(1)",
            "mailto:humas@ui.ac.id",
            "tel:+62217867222",
            "data:text/html,<h1>x</h1>",
            "ftp://ftp.ui.ac.id/",
        ] {
            assert!(resolve_link(href, &base_url()).is_none(), "{}", href);
        }
    }
}

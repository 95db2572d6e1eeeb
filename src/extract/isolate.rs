//! Main-content isolation
//!
//! Reduces a full HTML document to the fragment most likely to hold its
//! primary readable content, discarding navigation, footers, and other
//! boilerplate. The strategy is pluggable behind [`MainContentIsolator`];
//! the shipped implementation is a readability-style density heuristic.

use scraper::{ElementRef, Html, Selector};

/// A reduced HTML fragment plus typed access to its paragraph sequence.
#[derive(Debug, Clone)]
pub struct ContentFragment {
    html: String,
}

impl ContentFragment {
    /// Wraps an HTML string, typically an isolated main-content region.
    pub fn new(html: String) -> Self {
        Self { html }
    }

    /// Raw HTML of the fragment.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Paragraph texts in document order.
    ///
    /// Each entry is the concatenated text of one `<p>` element, untrimmed;
    /// callers normalize before applying length thresholds.
    pub fn paragraphs(&self) -> Vec<String> {
        let document = Html::parse_fragment(&self.html);
        let Ok(selector) = Selector::parse("p") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .map(|p| p.text().collect::<String>())
            .collect()
    }
}

/// Strategy interface for main-content isolation
///
/// Returns `None` when the document has no region the strategy is confident
/// about; the caller then falls back to the raw document.
pub trait MainContentIsolator: Send + Sync {
    fn isolate(&self, html: &str) -> Option<ContentFragment>;
}

/// Class/id substrings that mark a block as boilerplate. A container whose
/// attributes match any of these is never selected as main content.
const BOILERPLATE_MARKERS: &[&str] = &[
    "nav", "menu", "footer", "header", "sidebar", "banner", "breadcrumb", "comment", "cookie",
    "promo", "advert", "share", "social", "subscribe", "related", "widget",
];

/// Minimum density score for a block to count as main content. Blocks below
/// this are treated as failed isolation rather than returned as a fragment.
const MIN_CONTENT_SCORE: i64 = 120;

/// Readability-style isolation: pick the candidate block with the highest
/// text density after penalizing link-heavy regions.
pub struct ReadabilityIsolator;

impl ReadabilityIsolator {
    /// Scores a candidate block: total text length minus twice the length of
    /// link text. Link-heavy blocks (menus, tag clouds, footers) go negative.
    fn score(element: ElementRef<'_>, link_selector: &Selector) -> i64 {
        let text_len: usize = element.text().map(str::len).sum();
        let link_len: usize = element
            .select(link_selector)
            .flat_map(|a| a.text())
            .map(str::len)
            .sum();

        text_len as i64 - 2 * link_len as i64
    }

    /// Returns true when the element's class or id marks it as boilerplate.
    fn is_boilerplate(element: ElementRef<'_>) -> bool {
        let attrs = format!(
            "{} {}",
            element.value().attr("class").unwrap_or(""),
            element.value().attr("id").unwrap_or("")
        )
        .to_lowercase();

        BOILERPLATE_MARKERS.iter().any(|m| attrs.contains(m))
    }
}

impl MainContentIsolator for ReadabilityIsolator {
    fn isolate(&self, html: &str) -> Option<ContentFragment> {
        let document = Html::parse_document(html);
        let candidates = Selector::parse("article, main, section, div").ok()?;
        let links = Selector::parse("a").ok()?;

        let mut best: Option<(i64, ElementRef<'_>)> = None;

        for element in document.select(&candidates) {
            if Self::is_boilerplate(element) {
                continue;
            }

            let score = Self::score(element, &links);
            if score < MIN_CONTENT_SCORE {
                continue;
            }

            // Ties go to the earlier (usually outer) block.
            match best {
                Some((best_score, _)) if best_score >= score => {}
                _ => best = Some((score, element)),
            }
        }

        best.map(|(score, element)| {
            tracing::trace!(
                "Isolated main content block (score {}, {} bytes)",
                score,
                element.inner_html().len()
            );
            ContentFragment::new(element.inner_html())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolate(html: &str) -> Option<ContentFragment> {
        ReadabilityIsolator.isolate(html)
    }

    const ARTICLE_TEXT: &str = "The tower was completed in 1889 and held the title of the \
         world's tallest man-made structure for over four decades, drawing millions of \
         visitors every single year since it first opened to the public.";

    #[test]
    fn test_picks_dense_article_over_nav() {
        let html = format!(
            r#"<html><body>
            <div class="navbar"><a href="/a">Home</a><a href="/b">About</a><a href="/c">Contact</a></div>
            <article><p>{}</p></article>
            <div class="footer"><a href="/p">Privacy</a><a href="/t">Terms</a></div>
            </body></html>"#,
            ARTICLE_TEXT
        );

        let fragment = isolate(&html).expect("should isolate article");
        assert!(fragment.html().contains("completed in 1889"));
        assert!(!fragment.html().contains("Privacy"));
    }

    #[test]
    fn test_boilerplate_classes_excluded() {
        // The sidebar has plenty of text but a boilerplate class.
        let html = format!(
            r#"<html><body>
            <div class="sidebar-promo">{}</div>
            <div class="content"><p>{}</p></div>
            </body></html>"#,
            "x".repeat(500),
            ARTICLE_TEXT
        );

        let fragment = isolate(&html).expect("should isolate content div");
        assert!(fragment.html().contains("completed in 1889"));
        assert!(!fragment.html().contains("xxxxx"));
    }

    #[test]
    fn test_link_heavy_block_penalized() {
        let link_farm = (0..30)
            .map(|i| format!("<a href=\"/{i}\">A reasonably long link label {i}</a>"))
            .collect::<String>();
        let html = format!(
            r#"<html><body>
            <div class="listing">{}</div>
            <div class="story"><p>{}</p></div>
            </body></html>"#,
            link_farm, ARTICLE_TEXT
        );

        let fragment = isolate(&html).expect("should isolate story");
        assert!(fragment.html().contains("completed in 1889"));
    }

    #[test]
    fn test_sparse_document_fails_isolation() {
        let html = "<html><body><div><p>Too short.</p></div></body></html>";
        assert!(isolate(html).is_none());
    }

    #[test]
    fn test_non_html_input_fails_isolation() {
        assert!(isolate("just some plain text, no markup at all").is_none());
    }

    #[test]
    fn test_paragraphs_in_document_order() {
        let fragment = ContentFragment::new(
            "<p>first</p><div><p>second</p></div><p>third</p>".to_string(),
        );
        assert_eq!(fragment.paragraphs(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_paragraphs_empty_when_none_present() {
        let fragment = ContentFragment::new("<div>no paragraphs here</div>".to_string());
        assert!(fragment.paragraphs().is_empty());
    }

    #[test]
    fn test_paragraph_text_concatenates_inline_markup() {
        let fragment =
            ContentFragment::new("<p>one <em>two</em> three</p>".to_string());
        assert_eq!(fragment.paragraphs(), vec!["one two three"]);
    }
}

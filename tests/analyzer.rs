use websift::analyzer::*;
use websift::summarizer::*;

#[cfg(test)]
mod html_text_filter_tests {
    use super::*;

    fn visible(html: &str) -> String {
        WhitespaceFilter.filter(HtmlTextFilter.filter(html.to_string()))
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(visible(""), "");
    }

    #[test]
    fn test_plain_text_no_html() {
        assert_eq!(visible("Hello World"), "Hello World");
    }

    #[test]
    fn test_nested_html() {
        assert_eq!(
            visible("<div><p>Hello <span>World</span></p></div>"),
            "Hello World"
        );
    }

    #[test]
    fn test_removes_script_tags() {
        let result = visible("<p>Before</p><script>alert('evil')</script><p>After</p>");
        assert!(!result.contains("alert"));
        assert_eq!(result, "Before After");
    }

    #[test]
    fn test_removes_style_tags() {
        let result = visible("<p>Content</p><style>body { color: red; }</style>");
        assert!(!result.contains("color"));
        assert_eq!(result, "Content");
    }

    #[test]
    fn test_removes_noscript_and_template() {
        let result =
            visible("<p>Main</p><noscript>Enable JS</noscript><template><p>Hidden</p></template>");
        assert_eq!(result, "Main");
    }

    #[test]
    fn test_keeps_navigation_and_footer_text() {
        // visible text is taken whole, boilerplate included
        let result = visible(r#"<div class="navbar">Menu</div><p>Content</p><footer>Bye</footer>"#);
        assert_eq!(result, "Menu Content Bye");
    }

    #[test]
    fn test_head_is_not_visible() {
        let result = visible("<html><head><title>Title</title></head><body>Body</body></html>");
        assert_eq!(result, "Body");
    }

    #[test]
    fn test_deeply_nested_elements() {
        let depth = 100_000;
        let html = format!("{}x{}", "<span>".repeat(depth), "</span>".repeat(depth));
        assert_eq!(HtmlTextFilter.filter(html), "x");
    }

    #[test]
    fn test_document_order_preserved() {
        let result = visible("<div><p>one <b>two</b></p><p>three</p></div><p>four</p>");
        assert_eq!(result, "one two three four");
    }

    #[test]
    fn test_malformed_html() {
        let result = visible("<p>Unclosed <b>bold <i>both</p> tail");
        assert_eq!(result, "Unclosed bold both tail");
    }
}

#[cfg(test)]
mod normalizer_tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::standard().unwrap()
    }

    fn has_double_whitespace(s: &str) -> bool {
        s.chars()
            .zip(s.chars().skip(1))
            .any(|(a, b)| a.is_whitespace() && b.is_whitespace())
    }

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "plain",
        "  lots \n\n of\t\t  space  ",
        "emoji 😀 in 🎉 the ✨ middle",
        "😀 leading and trailing 🎉",
        "ﬁne ｆｕｌｌｗｉｄｔｈ and x² ①",
        "non\u{00A0}breaking\u{2003}spaces\u{200B}here",
        "e\u{1F600}\u{0301} combining after an emoji",
        "☀ sunny ☂ and © marks",
    ];

    #[test]
    fn test_no_double_whitespace() {
        let n = normalizer();
        for sample in SAMPLES {
            let out = n.normalize(sample.to_string());
            assert!(!has_double_whitespace(&out), "{sample:?} -> {out:?}");
            assert_eq!(out, out.trim(), "{sample:?} -> {out:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        let n = normalizer();
        for sample in SAMPLES {
            let once = n.normalize(sample.to_string());
            let twice = n.normalize(once.clone());
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let n = normalizer();
        let text = "one two three four five six".to_string();
        let once = n.normalize_and_truncate(text, 4);
        assert_eq!(once, "one two three four");
        assert_eq!(n.normalize_and_truncate(once.clone(), 4), once);
    }

    #[test]
    fn test_symbols_removed() {
        let out = normalizer().normalize("☀ sunny ☂ and © marks".to_string());
        assert_eq!(out, "sunny and marks");
    }

    #[test]
    fn test_compatibility_forms() {
        let out = normalizer().normalize("ﬁne ｆｕｌｌｗｉｄｔｈ".to_string());
        assert_eq!(out, "fine fullwidth");
    }

    #[test]
    fn test_custom_pipeline() {
        let n = TextNormalizer::new(vec![Box::new(WhitespaceFilter)]);
        assert_eq!(n.normalize("a 😀  b".to_string()), "a 😀 b");
    }
}

#[cfg(test)]
mod summarizer_properties {
    use super::*;

    #[test]
    fn test_excerpt_length_bound() {
        for len in [0usize, 1, 50, 199, 200, 201, 1000] {
            let content = "x".repeat(len);
            let out = excerpt(&content, DEFAULT_EXCERPT_LENGTH);
            assert!(out.chars().count() <= DEFAULT_EXCERPT_LENGTH + ELLIPSIS.len());
            if len <= DEFAULT_EXCERPT_LENGTH {
                assert_eq!(out, content);
            }
        }
    }

    #[test]
    fn test_main_points_bounds() {
        let content = "Short one. This is a reasonably long sentence! \
                       And here is another long sentence? x. \
                       Yet another sentence which is long. And one more long sentence here.";
        for max in 0..5 {
            let points = main_points(content, max);
            assert!(points.len() <= max);
            for p in &points {
                assert!(p.trim().chars().count() > MIN_POINT_LENGTH, "{p:?}");
            }
        }
    }
}

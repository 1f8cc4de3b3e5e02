// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;

const HOMEPAGE: &str = r#"
    <html>
        <head>
            <title>  Acme   Widgets </title>
            <meta name="description" content="Widgets for everyone">
            <meta property="og:title" content="Acme OG">
            <meta charset="utf-8">
            <script type="application/ld+json">
                {"@context": "https://schema.org", "@type": "Organization", "name": "Acme"}
            </script>
            <script type="application/ld+json">
                {"@context": "https://schema.org", "@graph": [
                    {"@type": "WebSite"},
                    {"@type": ["Organization", "LocalBusiness"]}
                ]}
            </script>
            <script type="application/ld+json">{ not json </script>
            <style>body { color: red; }</style>
        </head>
        <body>
            <h1>Welcome to <span>Acme</span></h1>
            <h2>Products</h2>
            <h2>  </h2>
            <h3>Contact <b>us</b></h3>
            <p>We build widgets.</p>
            <script>var hidden = "do not index";</script>
        </body>
    </html>
"#;

#[test]
fn test_extract_json_ld_types_deduplicated() {
    let extract = ExtractionService::extract(HOMEPAGE);

    assert_eq!(
        extract.json_ld_types,
        vec!["Organization", "WebSite", "LocalBusiness"]
    );
    // The malformed block is skipped
    assert_eq!(extract.json_ld_blocks.len(), 2);
}

#[test]
fn test_extract_meta_and_headings() {
    let extract = ExtractionService::extract(HOMEPAGE);

    assert_eq!(
        extract.meta_tags.get("description").map(String::as_str),
        Some("Widgets for everyone")
    );
    assert_eq!(extract.meta_tags.len(), 2);
    assert_eq!(extract.headings.h1, vec!["Welcome to Acme"]);
    assert_eq!(extract.headings.h2, vec!["Products"]);
    assert_eq!(extract.headings.h3, vec!["Contact us"]);
    assert_eq!(extract.title, "Acme Widgets");
}

#[test]
fn test_visible_text_skips_scripts_and_styles() {
    let extract = ExtractionService::extract(HOMEPAGE);

    assert!(extract.text.contains("We build widgets."));
    assert!(!extract.text.contains("do not index"));
    assert!(!extract.text.contains("color: red"));
}

#[test]
fn test_content_info_falls_back_to_open_graph() {
    let html = r#"<html><head>
        <meta property="og:title" content="OG Title">
        <meta property="og:description" content="OG Description">
    </head><body></body></html>"#;

    let info = ExtractionService::extract(html).content_info();

    assert_eq!(info.title, "OG Title");
    assert_eq!(info.description, "OG Description");
    assert_eq!(info.meta_tag_count, 2);
}

#[test]
fn test_page_without_json_ld() {
    let extract = ExtractionService::extract("<html><body><p>plain</p></body></html>");

    assert!(extract.json_ld_types.is_empty());
    assert!(extract.json_ld_blocks.is_empty());
}

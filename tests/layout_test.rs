//! Integration tests for reading-order reconstruction.

use reflow::layout::classifier::classify_blocks;
use reflow::layout::zoning::cluster_vertically;
use reflow::render::CleanupPipeline;
use reflow::{
    reconstruct, reconstruct_with_options, Block, BoundingBox, CleanupPreset, Document, Error,
    HeaderFooterPolicy, LayoutAnalyzer, LayoutOptions, Page, PageSelection, Reflow, RenderOptions,
};

fn block(x0: f32, y0: f32, x1: f32, y1: f32, text: &str) -> Block {
    Block::from_text_lines(BoundingBox::new(x0, y0, x1, y1), &[text])
}

fn left(y0: f32, text: &str) -> Block {
    block(50.0, y0, 290.0, y0 + 80.0, text)
}

fn right(y0: f32, text: &str) -> Block {
    block(320.0, y0, 560.0, y0 + 80.0, text)
}

fn single_page(blocks: Vec<Block>) -> Document {
    let mut page = Page::letter(1);
    for b in blocks {
        page.add_block(b);
    }
    let mut doc = Document::new();
    doc.add_page(page);
    doc
}

/// A two-column page: title, two balanced columns, then a full-width table.
fn academic_page(number: u32) -> Page {
    let mut page = Page::letter(number);
    page.add_block(block(72.0, 20.0, 540.0, 40.0, "Proceedings of the Layout Workshop"));
    page.add_block(right(190.0, &format!("Right column first paragraph {}", number)));
    page.add_block(left(100.0, &format!("Title spanning the page {}", number)));
    page.add_block(left(190.0, &format!("Left column first paragraph {}", number)));
    page.add_block(right(275.0, &format!("Right column second paragraph {}", number)));
    page.add_block(left(275.0, &format!("Left column second paragraph {}", number)));
    page.add_block(right(100.0, &format!("Abstract next to title {}", number)));
    page.add_block(Block::from_text_lines(
        BoundingBox::new(40.0, 500.0, 580.0, 560.0),
        &["Table", "1"],
    ));
    page.add_block(block(72.0, 750.0, 540.0, 770.0, &format!("Page {}", number)));
    page
}

#[test]
fn test_single_block_page_is_its_text() {
    let doc = single_page(vec![block(
        72.0,
        300.0,
        540.0,
        340.0,
        "  A  single   paragraph of text.  ",
    )]);
    assert_eq!(reconstruct(&doc).unwrap(), "A single paragraph of text.");
}

#[test]
fn test_two_columns_left_before_right_in_any_input_order() {
    let blocks = vec![
        right(185.0, "right column block two"),
        left(270.0, "left column block three"),
        right(100.0, "right column block one"),
        left(100.0, "left column block one"),
        right(270.0, "right column block three"),
        left(185.0, "left column block two"),
    ];
    let expected = "left column block one\nleft column block two\nleft column block three\n\
                    right column block one\nright column block two\nright column block three";

    assert_eq!(reconstruct(&single_page(blocks.clone())).unwrap(), expected);

    let mut reversed = blocks;
    reversed.reverse();
    assert_eq!(reconstruct(&single_page(reversed)).unwrap(), expected);
}

#[test]
fn test_unbalanced_split_reads_top_to_bottom() {
    let blocks = vec![
        block(50.0, 100.0, 290.0, 150.0, "left block number one"),
        block(50.0, 160.0, 290.0, 210.0, "left block number two"),
        block(50.0, 220.0, 290.0, 270.0, "left block number three"),
        block(50.0, 280.0, 290.0, 330.0, "left block number four"),
        block(50.0, 340.0, 290.0, 390.0, "left block number five"),
        block(320.0, 130.0, 560.0, 150.0, "a lone margin note"),
    ];
    let doc = single_page(blocks);
    let analyzer = LayoutAnalyzer::new(LayoutOptions::default()).unwrap();
    let pages = analyzer.analyze(&doc).unwrap();

    assert_eq!(pages[0].diagnostics.assembly.two_column_zones, 0);
    assert_eq!(
        pages[0].text,
        "left block number one\na lone margin note\nleft block number two\n\
         left block number three\nleft block number four\nleft block number five"
    );
}

#[test]
fn test_academic_page_reading_order() {
    let mut doc = Document::new();
    doc.add_page(academic_page(1));

    let text = reconstruct(&doc).unwrap();
    assert_eq!(
        text,
        "Title spanning the page 1\nLeft column first paragraph 1\nLeft column second paragraph 1\n\
         Abstract next to title 1\nRight column first paragraph 1\nRight column second paragraph 1\n\
         Table 1"
    );
}

#[test]
fn test_figure_caption_removed() {
    let doc = single_page(vec![
        block(72.0, 100.0, 540.0, 140.0, "Our method improves recall."),
        block(72.0, 145.0, 540.0, 160.0, "Figure 3: results overview"),
        block(72.0, 165.0, 540.0, 200.0, "The gains hold across datasets."),
    ]);
    assert_eq!(
        reconstruct(&doc).unwrap(),
        "Our method improves recall.\nThe gains hold across datasets."
    );
}

#[test]
fn test_references_truncation_spans_later_pages() {
    let mut doc = Document::new();
    doc.add_page(
        Page::letter(1)
            .with_block(block(72.0, 100.0, 540.0, 140.0, "We conclude the paper here."))
            .with_block(block(72.0, 150.0, 540.0, 170.0, "References"))
            .with_block(block(72.0, 175.0, 540.0, 200.0, "[1] A. Author. Early work.")),
    );
    doc.add_page(
        Page::letter(2).with_block(block(72.0, 100.0, 540.0, 140.0, "[2] B. Author. Later work.")),
    );
    doc.add_page(
        Page::letter(3).with_block(block(72.0, 100.0, 540.0, 140.0, "Appendix A follows here.")),
    );

    assert_eq!(reconstruct(&doc).unwrap(), "We conclude the paper here.");

    let raw = reconstruct_with_options(
        &doc,
        &LayoutOptions::default(),
        &RenderOptions::default().without_cleanup(),
    )
    .unwrap();
    assert!(raw.contains("Appendix A follows here."));
}

#[test]
fn test_cleanup_is_idempotent_on_reconstructed_text() {
    let mut doc = Document::new();
    for n in 1..=3 {
        doc.add_page(academic_page(n));
    }
    let raw = reconstruct_with_options(
        &doc,
        &LayoutOptions::default(),
        &RenderOptions::default().without_cleanup(),
    )
    .unwrap();

    for preset in [
        CleanupPreset::Minimal,
        CleanupPreset::Standard,
        CleanupPreset::Aggressive,
    ] {
        let pipeline = CleanupPipeline::from_preset(preset);
        let once = pipeline.process(&raw);
        assert_eq!(pipeline.process(&once), once);
    }
}

#[test]
fn test_zoner_splits_on_large_gaps() {
    let blocks: Vec<Block> = [0.0, 5.0, 40.0, 45.0]
        .iter()
        .map(|&y| Block::graphic(BoundingBox::new(10.0, y, 100.0, y + 5.0)))
        .collect();
    let indexed: Vec<(usize, &Block)> = blocks.iter().enumerate().collect();
    let classified = classify_blocks(&indexed, 612.0, 3, 0.8);

    let zones = cluster_vertically(&classified, 15.0);
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].len(), 2);
    assert_eq!(zones[1].len(), 2);
}

fn numbered_footer_document() -> Document {
    let mut doc = Document::new();
    for n in 1..=10 {
        doc.add_page(
            Page::letter(n)
                .with_block(block(72.0, 300.0, 540.0, 340.0, &format!("Body of page {}", n)))
                // Inside the frequency band but above the bottom margin
                .with_block(block(250.0, 715.0, 360.0, 730.0, &format!("Page {}", n))),
        );
    }
    doc
}

#[test]
fn test_frequency_policy_removes_numbered_footers() {
    let doc = numbered_footer_document();
    let expected: Vec<String> = (1..=10).map(|n| format!("Body of page {}", n)).collect();

    let options =
        LayoutOptions::default().with_header_footer_policy(HeaderFooterPolicy::Frequency);
    let text = reconstruct_with_options(&doc, &options, &RenderOptions::default()).unwrap();
    assert_eq!(text, expected.join("\n"));

    // The margin policy leaves them in place
    let text = reconstruct(&doc).unwrap();
    assert!(text.contains("Page 7"));
}

#[test]
fn test_frequency_statistics_use_every_page() {
    let doc = numbered_footer_document();
    let options = LayoutOptions::default()
        .with_header_footer_policy(HeaderFooterPolicy::Frequency)
        .with_pages(PageSelection::Pages(vec![4]));
    let text = reconstruct_with_options(&doc, &options, &RenderOptions::default()).unwrap();
    assert_eq!(text, "Body of page 4");
}

#[test]
fn test_parallel_matches_sequential() {
    let mut doc = Document::new();
    for n in 1..=12 {
        doc.add_page(academic_page(n));
    }

    for policy in [HeaderFooterPolicy::Margin, HeaderFooterPolicy::Frequency] {
        let options = LayoutOptions::default().with_header_footer_policy(policy);
        let parallel = LayoutAnalyzer::new(options.clone()).unwrap().analyze(&doc).unwrap();
        let sequential = LayoutAnalyzer::new(options.sequential())
            .unwrap()
            .analyze(&doc)
            .unwrap();

        assert_eq!(parallel.len(), sequential.len());
        for (p, s) in parallel.iter().zip(&sequential) {
            assert_eq!(p.number, s.number);
            assert_eq!(p.text, s.text);
            assert_eq!(p.diagnostics, s.diagnostics);
        }
    }
}

#[test]
fn test_malformed_blocks_lenient_and_strict() {
    let doc = single_page(vec![
        block(72.0, 100.0, 540.0, 140.0, "A valid paragraph of text."),
        block(f32::NAN, 150.0, 540.0, 190.0, "broken coordinates here"),
    ]);

    let result = Reflow::new().process(&doc).unwrap();
    assert_eq!(result.text(), "A valid paragraph of text.");
    assert_eq!(result.stats().blocks_skipped, 1);

    let err = Reflow::new().strict().process(&doc).unwrap_err();
    assert!(matches!(err, Error::MalformedBlock { page: 1, block: 1, .. }));
}

#[test]
fn test_invalid_configuration_rejected() {
    let options = LayoutOptions::default().with_column_balance_threshold(1.5);
    let err = reconstruct_with_options(&single_page(vec![]), &options, &RenderOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidConfig {
            field: "column_balance_threshold",
            ..
        }
    ));
}

#[test]
fn test_page_out_of_range() {
    let options = LayoutOptions::default().with_pages(PageSelection::Range(3..=5));
    let err = reconstruct_with_options(
        &single_page(vec![]),
        &options,
        &RenderOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::PageOutOfRange(3, 1)));
}

#[test]
fn test_empty_document_and_pages() {
    assert_eq!(reconstruct(&Document::new()).unwrap(), "");

    let mut doc = Document::new();
    doc.add_page(Page::letter(1));
    doc.add_page(Page::letter(2).with_block(block(72.0, 300.0, 540.0, 340.0, "only page two")));
    doc.add_page(Page::letter(3).with_block(Block::graphic(BoundingBox::new(
        100.0, 100.0, 300.0, 300.0,
    ))));
    assert_eq!(reconstruct(&doc).unwrap(), "only page two");
}

#[test]
fn test_json_ingestion() {
    let json = r#"{
        "pages": [
            {
                "width": 612.0,
                "height": 792.0,
                "blocks": [
                    {"type": 0, "number": 0, "bbox": [320, 100, 560, 180],
                     "lines": [{"bbox": [320, 100, 560, 115], "spans": [
                        {"text": "Right", "size": 10.0, "font": "Times-Roman", "flags": 0},
                        {"text": "side", "size": 10.0, "font": "Times-Roman"},
                        {"text": "text", "size": 10.0, "font": "Times-Roman"}]}]},
                    {"type": 0, "number": 1, "bbox": [50, 100, 290, 180],
                     "lines": [{"spans": [
                        {"text": "Left"}, {"text": "side"}, {"text": "text"}]}]},
                    {"type": 1, "number": 2, "bbox": [100, 400, 200, 450]}
                ]
            },
            {"width": 612, "height": 792, "blocks": []}
        ]
    }"#;

    let doc = reflow::document_from_json(json).unwrap();
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.pages[1].number, 2);
    assert_eq!(doc.block_count(), 3);

    let text = reconstruct(&doc).unwrap();
    assert_eq!(text, "Left side text\nRight side text");

    assert!(matches!(
        reflow::document_from_json("{\"pages\": [{\"width\": \"wide\"}]}"),
        Err(Error::Json(_))
    ));
}

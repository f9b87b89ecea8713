use pretty_assertions::assert_eq;
use rstest::rstest;
use simple_blurb_engine::{
    Block, BlockRegistry, BlurbContentAttributes, ColorAttributes, Document, SchemaVersion,
};

fn read_fixture(name: &str) -> String {
    let path = format!(
        "{}/tests/fixtures/{}.html",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"))
}

/// Parse a fixture and check it serializes back byte for byte.
fn assert_fixture(registry: &BlockRegistry, name: &str) -> Document {
    let source = read_fixture(name);
    let document = registry.parse_document(&source);
    let serialized = registry.serialize_document(&document).unwrap();
    assert_eq!(serialized, source.trim_end(), "fixture `{name}` did not round trip");
    document
}

fn only_blurb_content(blocks: &[Block]) -> &BlurbContentAttributes {
    match blocks {
        [Block::BlurbContent(blurb)] => &blurb.attributes,
        [Block::SimpleBlurb(parent)] => only_blurb_content(&parent.inner_blocks),
        other => panic!("expected a single blurb-content, got {other:?}"),
    }
}

#[rstest]
#[case("linked_image")]
#[case("mixed_document")]
#[case("legacy_v1")]
fn fixtures_round_trip(#[case] name: &str) {
    let document = assert_fixture(&BlockRegistry::with_defaults(), name);
    assert!(document.errors.is_empty(), "{:?}", document.errors);
}

#[test]
fn linked_image_reads_every_field() {
    let document = assert_fixture(&BlockRegistry::with_defaults(), "linked_image");
    let [Block::SimpleBlurb(parent)] = &document.blocks[..] else {
        panic!("expected a simple-blurb, got {:?}", document.blocks);
    };
    assert_eq!(
        parent.attributes.colors,
        ColorAttributes {
            background_color: Some("pale-pink".into()),
            ..Default::default()
        }
    );

    let attributes = only_blurb_content(&document.blocks);
    assert_eq!(
        attributes,
        &BlurbContentAttributes {
            image_id: Some(42),
            image_url: Some("https://example.com/a.jpg".into()),
            alt: "cat".into(),
            link: Some("https://example.com/cats".into()),
            link_target: Some("_blank".into()),
            link_rel: Some("noopener".into()),
            image_align: Some("center".into()),
            image_has_effect: true,
            width: Some(100),
            height: Some(80),
            max_width: Some("320px".into()),
            content: "<!-- wp:heading {\"className\":\"jc-blurb-title\",\"level\":4,\"placeholder\":\"Blurb Title\"} -->\n\
                      <h4 class=\"wp-block-heading jc-blurb-title\">Cats</h4>\n\
                      <!-- /wp:heading -->\n\n\
                      <!-- wp:paragraph {\"className\":\"jc-blurb-description\",\"placeholder\":\"Blurb Content\"} -->\n\
                      <p class=\"jc-blurb-description\">All about cats &amp; kittens.</p>\n\
                      <!-- /wp:paragraph -->"
                .into(),
            ..Default::default()
        }
    );
    assert!(attributes.opens_in_new_tab());
}

#[test]
fn mixed_document_keeps_foreign_blocks() {
    let document = assert_fixture(&BlockRegistry::with_defaults(), "mixed_document");
    let names: Vec<_> = document.blocks.iter().map(Block::name).collect();
    assert_eq!(
        names,
        vec![Some("core/paragraph"), Some("jc-blocks/simple-blurb"), None]
    );

    let attributes = only_blurb_content(&document.blocks[1..2]);
    assert_eq!(attributes.image_slug, "medium");
    assert!(attributes.allow_blocks);
    assert_eq!(attributes.image_id, None);
    assert!(attributes.inner_blocks_policy().allows("core/list"));
}

#[test]
fn legacy_markup_reads_under_either_schema() {
    let latest = assert_fixture(&BlockRegistry::with_defaults(), "legacy_v1");
    let v1 = assert_fixture(
        &BlockRegistry::with_defaults().with_version(SchemaVersion::V1),
        "legacy_v1",
    );
    assert_eq!(latest.blocks, v1.blocks);

    let attributes = only_blurb_content(&v1.blocks);
    assert_eq!(attributes.image_id, Some(9));
    assert_eq!(attributes.image_slug, "full");
    assert_eq!(attributes.link(), None);
}

#[test]
fn malformed_width_falls_back_and_is_dropped_on_save() {
    let registry = BlockRegistry::with_defaults();
    let source = read_fixture("malformed_width");
    let document = registry.parse_document(&source);

    assert_eq!(document.errors.len(), 1);
    assert_eq!(document.errors[0].field(), "width");

    let attributes = only_blurb_content(&document.blocks);
    assert_eq!(attributes.width, None);
    assert_eq!(attributes.image_url.as_deref(), Some("https://example.com/a.jpg"));
    assert_eq!(attributes.alt, "a");

    let serialized = registry.serialize_document(&document).unwrap();
    assert!(serialized.contains(r#"<img src="https://example.com/a.jpg" alt="a"/>"#));
    assert!(!serialized.contains("wide"));

    // The cleaned-up markup is stable from here on.
    let reparsed = registry.parse_document(&serialized);
    assert!(reparsed.errors.is_empty());
    assert_eq!(registry.serialize_document(&reparsed).unwrap(), serialized);
}

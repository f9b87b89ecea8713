use simple_blurb_engine::{Block, BlockRegistry, BlurbContent, BlurbContentAttributes, SimpleBlurb};

// Used from the bench targets; each compiles this module separately.
#[allow(dead_code)]
pub fn sample_blurb(index: usize) -> BlurbContentAttributes {
    BlurbContentAttributes {
        image_id: Some(index as u64),
        image_url: Some(format!("https://example.com/uploads/{index}.jpg")),
        alt: format!("Image {index}"),
        link: Some(format!("https://example.com/posts/{index}")),
        image_align: Some("center".into()),
        image_has_effect: index % 2 == 0,
        max_width: Some("320px".into()),
        content: format!(
            "<!-- wp:paragraph -->\n<p>Blurb number {index} &amp; friends.</p>\n<!-- /wp:paragraph -->"
        ),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn generate_document(blurbs: usize) -> String {
    let blocks: Vec<Block> = (0..blurbs)
        .map(|i| {
            Block::SimpleBlurb(SimpleBlurb {
                attributes: Default::default(),
                inner_blocks: vec![Block::BlurbContent(BlurbContent {
                    attributes: sample_blurb(i),
                })],
            })
        })
        .collect();
    BlockRegistry::with_defaults()
        .serialize_blocks(&blocks)
        .unwrap()
}

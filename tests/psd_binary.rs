use std::path::Path;
use std::sync::Arc;

use adlens::model::SourceFile;
use adlens::pipeline::{PipelineOptions, PsdPipeline};
use adlens::psd::binary::from_psd_slice;
use adlens::psd::{walk, AutoPsdParser, BinaryPsdParser, LayerKind, NameBucket, PsdParser};

mod common;

fn layer_paths(bytes: &[u8]) -> Vec<String> {
    let document = BinaryPsdParser
        .parse(Path::new("nested-groups.psd"), bytes)
        .unwrap();
    walk(&document).layers.into_iter().map(|l| l.path).collect()
}

#[test]
fn nested_groups_come_out_in_panel_order() {
    let walked = walk(&from_psd_slice(&common::nested_groups_psd()).unwrap());

    let layers: Vec<&str> = walked.layers.iter().map(|l| l.path.as_str()).collect();
    assert_eq!(
        layers,
        [
            "outside group/first group inside/First Layer",
            "outside group/second group inside/sub sub group/Second Layer",
            "outside group/second group inside/Third Layer",
            "outside group/Fourth Layer",
            "Firth Layer",
            "outside group 2/Sixth Layer",
        ]
    );

    let groups: Vec<&str> = walked.groups.iter().map(|g| g.path.as_str()).collect();
    assert_eq!(
        groups,
        [
            "outside group",
            "outside group/first group inside",
            "outside group/second group inside",
            "outside group/second group inside/sub sub group",
            "outside group/third group inside",
            "outside group 2",
        ]
    );

    // the empty group still sits before the layer that follows it
    assert!(walked.groups[4].layers.is_empty());
    let outside: Vec<&str> = walked.groups[0].layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(outside, ["Fourth Layer"]);
}

#[test]
fn repeated_parses_give_identical_trees() {
    let bytes = common::nested_groups_psd();
    let first = from_psd_slice(&bytes).unwrap();
    let first_paths = layer_paths(&bytes);
    for _ in 0..20 {
        assert_eq!(from_psd_slice(&bytes).unwrap(), first);
        assert_eq!(layer_paths(&bytes), first_paths);
    }
}

#[test]
fn one_pixel_layers_keep_their_bounds() {
    let document = from_psd_slice(&common::nested_groups_psd()).unwrap();
    let firth = document
        .children
        .iter()
        .find(|n| n.name == "Firth Layer")
        .unwrap();
    assert_eq!(firth.kind, LayerKind::Image);
    assert_eq!((firth.bounds.width(), firth.bounds.height()), (1, 1));
}

#[test]
fn layer_names_carry_copy_and_pixels_carry_color() {
    let bytes = common::psd_bytes(
        4,
        2,
        &[
            ("Headline Summer Sale", [200, 30, 30]),
            ("<FR> Soldes d'ete", [255, 255, 255]),
            ("CTA Shop now", [20, 40, 200]),
            ("Background", [10, 10, 10]),
        ],
    );
    let document = AutoPsdParser.parse(Path::new("flat.psd"), &bytes).unwrap();
    assert_eq!((document.width, document.height), (4, 2));

    let walked = walk(&document);
    let texts: Vec<(NameBucket, &str)> = walked
        .texts
        .iter()
        .map(|t| (t.bucket, t.element.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        [
            (NameBucket::Headline, "Headline Summer Sale"),
            (NameBucket::Primary, "Soldes d'ete"),
            (NameBucket::CallToAction, "CTA Shop now"),
        ]
    );

    let colors: Vec<&str> = walked.colors.iter().map(|c| c.hex.as_str()).collect();
    assert_eq!(colors, ["#c81e1e", "#ffffff", "#1428c8", "#0a0a0a"]);
    assert_eq!(walked.layers[0].bounds.width(), 4);
    assert_eq!(walked.layers[0].bounds.height(), 2);
}

#[tokio::test]
async fn binary_document_runs_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.psd");
    std::fs::write(
        &path,
        common::psd_bytes(
            2,
            2,
            &[
                ("Headline Big Deal", [255, 0, 0]),
                ("<FR> Bonjour", [0, 0, 0]),
                ("Description Free returns", [0, 0, 255]),
            ],
        ),
    )
    .unwrap();

    let pipeline = PsdPipeline::new(Arc::new(AutoPsdParser), PipelineOptions::default());
    let record = pipeline.extract(&SourceFile::from_path(&path)).await.unwrap();

    assert_eq!(record.text_extraction.headline, "Headline Big Deal");
    assert_eq!(record.text_extraction.primary_text, "Bonjour");
    assert_eq!(record.text_extraction.description, "Description Free returns");
    assert_eq!(record.analysis.content.color_scheme.dominant.as_deref(), Some("#ff0000"));
    assert_eq!(record.analysis.image_specs.resolution.as_deref(), Some("72 dpi"));
}

//! End-to-end pipeline tests: building pipelines from command strings,
//! running them against in-memory and on-disk lexicons, boundary parsing of
//! the dataset file formats, and output rendering.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, to_value};

use hiergen::cmd_pipeline::builder::{build_pipeline, build_pipeline_with_lexicon};
use hiergen::cmd_pipeline::interface::render_values;
use hiergen::cmd_pipeline::PipelineValues;
use hiergen::file_format::class_index::{read_class_index, read_id_list};
use hiergen::file_format::coco_categories::read_coco_categories;
use hiergen::file_format::openimages::read_openimages_hierarchy;
use hiergen::lexicon::{make_memory_lexicon, AbstractLexicon, SynsetSeed};

fn animal_graph() -> Box<dyn AbstractLexicon + Send + Sync> {
    make_memory_lexicon(vec![
        SynsetSeed::new("n00000001", "entity.n.01", &["entity"], &[], &["n00000002"]),
        SynsetSeed::new(
            "n00000002",
            "animal.n.01",
            &["animal"],
            &["n00000001"],
            &["n00000003", "n00000004"],
        ),
        SynsetSeed::new("n00000003", "dog.n.01", &["dog"], &["n00000002"], &[]),
        SynsetSeed::new("n00000004", "cat.n.01", &["cat"], &["n00000002"], &[]),
    ])
}

async fn run_canonical(arg_str: &str) -> serde_json::Value {
    let (pipeline, _) = build_pipeline_with_lexicon(animal_graph(), arg_str).unwrap();
    match pipeline.run(false).await.unwrap() {
        PipelineValues::CanonicalTree(ct) => to_value(&ct.root).unwrap(),
        _ => panic!("expected a CanonicalTree out of: {}", arg_str),
    }
}

#[tokio::test]
async fn test_expand_then_canonicalize() {
    let value = run_canonical("expand-tree --root animal.n.01 --max-depth 2 | canonicalize").await;
    assert_eq!(value, json!({"animal": ["cat", "dog"]}));
}

#[tokio::test]
async fn test_expand_flattens_then_canonicalizes() {
    let value = run_canonical("expand-tree --root entity.n.01 --max-depth 1 | canonicalize").await;
    insta::assert_compact_json_snapshot!(value, @r#"{"entity": {"animal": ["cat", "dog"]}}"#);
}

#[tokio::test]
async fn test_merge_then_flatten_then_canonicalize() {
    let value = run_canonical(
        "merge-paths n00000003 n00000004 --max-depth 10 | flatten --max-depth 1 | canonicalize",
    )
    .await;
    assert_eq!(value, json!({"entity": ["cat", "dog"]}));
}

#[tokio::test]
async fn test_canonicalize_twice_is_stable() {
    let once = run_canonical("expand-tree --root entity.n.01 --max-depth 2 | canonicalize").await;
    let twice =
        run_canonical("expand-tree --root entity.n.01 --max-depth 2 | canonicalize | canonicalize")
            .await;
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_yaml_rendering() {
    let (pipeline, format) = build_pipeline_with_lexicon(
        animal_graph(),
        "expand-tree --root animal.n.01 --max-depth 2 | canonicalize",
    )
    .unwrap();
    let values = pipeline.run(false).await.unwrap();
    let rendered = render_values(&values, &format).unwrap();
    assert!(rendered.starts_with("animal:"));
    assert!(rendered.contains("- cat"));
    assert!(rendered.contains("- dog"));
}

#[tokio::test]
async fn test_bad_command_is_rejected() {
    assert!(build_pipeline_with_lexicon(animal_graph(), "frobnicate --hard").is_err());
}

#[tokio::test]
async fn test_type_mismatch_is_rejected() {
    // flatten at the head of a pipeline has nothing to flatten.
    let (pipeline, _) = build_pipeline_with_lexicon(animal_graph(), "flatten").unwrap();
    assert!(pipeline.run(false).await.is_err());
}

// ## On-disk lexicon

fn write_graph_dump(path: &std::path::Path) {
    let records = vec![
        r#"{"key":"n00000001","name":"entity.n.01","lemmas":["entity"],"hyponyms":["n00000002"]}"#,
        r#"{"key":"n00000002","name":"animal.n.01","lemmas":["animal"],"hypernyms":["n00000001"],"hyponyms":["n00000003","n00000004"]}"#,
        r#"{"key":"n00000003","name":"dog.n.01","lemmas":["dog"],"hypernyms":["n00000002"]}"#,
        r#"{"key":"n00000004","name":"cat.n.01","lemmas":["cat"],"hypernyms":["n00000002"]}"#,
    ];
    let file = std::fs::File::create(path).unwrap();
    let mut gz = GzEncoder::new(file, Compression::default());
    for record in records {
        writeln!(gz, "{}", record).unwrap();
    }
    gz.finish().unwrap();
}

#[tokio::test]
async fn test_local_dump_merge_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let dump_path = dir.path().join("graph.ndjson.gz");
    write_graph_dump(&dump_path);
    let out_path = dir.path().join("wildcards.yaml");

    let arg_str = format!(
        "--lexicon {} merge-paths n00000003 n00000004 --max-depth 10 | canonicalize | save-output --output {} --format yaml",
        dump_path.display(),
        out_path.display()
    );
    let (pipeline, _) = build_pipeline("hiergen-tool", &arg_str).unwrap();
    let values = pipeline.run(false).await.unwrap();
    assert!(matches!(values, PipelineValues::Void));

    let saved = std::fs::read_to_string(&out_path).unwrap();
    assert!(saved.starts_with("entity:"));
    assert!(saved.contains("- cat"));
    assert!(saved.contains("- dog"));
}

#[tokio::test]
async fn test_merge_reads_identifier_files() {
    let dir = tempfile::tempdir().unwrap();
    let list_path = dir.path().join("ids.txt");
    std::fs::write(&list_path, "n00000003\n\nn00000004\n").unwrap();

    let arg_str = format!(
        "merge-paths --from-file {} --max-depth 10 | canonicalize",
        list_path.display()
    );
    let (pipeline, _) = build_pipeline_with_lexicon(animal_graph(), &arg_str).unwrap();
    let value = match pipeline.run(false).await.unwrap() {
        PipelineValues::CanonicalTree(ct) => to_value(&ct.root).unwrap(),
        _ => panic!("expected a CanonicalTree"),
    };
    assert_eq!(value, json!({"entity": {"animal": ["cat", "dog"]}}));
}

// ## Validity-set boundary parsing

#[tokio::test]
async fn test_class_index_parses_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("imagenet_class_index.json");
    std::fs::write(
        &path,
        r#"{"0": ["n01440764", "tench"], "1": ["n01443537", "goldfish"]}"#,
    )
    .unwrap();

    let set = read_class_index(path.to_str().unwrap()).await.unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("n01440764"));
    assert!(!set.contains("n02084071"));
}

#[tokio::test]
async fn test_malformed_class_index_degrades_to_no_restriction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    assert!(read_class_index(path.to_str().unwrap()).await.is_none());
    assert!(read_class_index("/no/such/file.json").await.is_none());
}

#[tokio::test]
async fn test_id_list_parses_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ids.txt");
    std::fs::write(&path, "n01440764\n\n  n01443537  \n").unwrap();

    let set = read_id_list(path.to_str().unwrap()).await.unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("n01443537"));
}

// ## Flat category-group sources

#[tokio::test]
async fn test_coco_supercategory_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("instances.json");
    std::fs::write(
        &path,
        r#"{
            "categories": [
                {"supercategory": "animal", "id": 18, "name": "dog"},
                {"supercategory": "outdoor", "id": 10, "name": "traffic light"},
                {"supercategory": "animal", "id": 17, "name": "cat"}
            ]
        }"#,
    )
    .unwrap();

    let tree = read_coco_categories(path.to_str().unwrap()).await.unwrap();
    assert_eq!(
        to_value(&tree).unwrap(),
        json!({"animal": ["cat", "dog"], "outdoor": ["traffic light"]})
    );
}

#[tokio::test]
async fn test_openimages_tree_with_misc_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let hierarchy_path = dir.path().join("hierarchy.json");
    let descriptions_path = dir.path().join("descriptions.csv");
    std::fs::write(
        &hierarchy_path,
        r#"{
            "LabelName": "/m/0bl9f",
            "Subcategories": [
                {"LabelName": "/m/01", "Subcategories": [{"LabelName": "/m/03"}]},
                {"LabelName": "/m/02"}
            ]
        }"#,
    )
    .unwrap();
    std::fs::write(
        &descriptions_path,
        "/m/01,Animal\n/m/02,\"Food, canned\"\n/m/03,Dog\n",
    )
    .unwrap();

    let tree = read_openimages_hierarchy(
        hierarchy_path.to_str().unwrap(),
        descriptions_path.to_str().unwrap(),
    )
    .await
    .unwrap();

    // Childless subcategories land under a misc bucket; the undescribed root
    // label falls back to its machine identifier.
    assert_eq!(
        to_value(&tree).unwrap(),
        json!({
            "/m/0bl9f": {
                "Animal": {"misc": ["Dog"]},
                "misc": ["Food, canned"]
            }
        })
    );
}

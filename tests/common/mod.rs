#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use cramers_assoc::features::{write_workdir, FeatureFile, ProjectSummary, SnpFeatureRecord};
use cramers_assoc::FeatureEncoding;

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

const UPDATE_VAR: &str = "CRAMERS_ASSOC_UPDATE_SNAPSHOTS";

/// Compare `actual` with the golden file `name`, or rewrite the golden file
/// when `CRAMERS_ASSOC_UPDATE_SNAPSHOTS` is set.
pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var_os(UPDATE_VAR).is_some() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("missing snapshot {}: {err}", path.display()));
    let expected = normalize(&expected);
    let actual = normalize(actual);
    if let Some((line, (want, got))) = expected
        .lines()
        .zip(actual.lines())
        .enumerate()
        .find(|(_, (want, got))| want != got)
    {
        panic!(
            "{} differs at record {}: expected {want:?}, got {got:?} \
             (set {UPDATE_VAR}=1 to regenerate)",
            path.display(),
            line + 1,
        );
    }
    assert_eq!(
        expected.lines().count(),
        actual.lines().count(),
        "{} record count differs (set {UPDATE_VAR}=1 to regenerate)",
        path.display()
    );
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

/// Build a feature file with one 3-column block per SNP, placed on
/// `chrom` at positions 100, 200, 300, ...
pub fn feature_file(
    chrom: &str,
    blocks: &[Vec<[f64; 3]>],
    class_labels: &[&str],
) -> FeatureFile {
    let n_samples = class_labels.len();
    let mut feature_matrix = vec![Vec::with_capacity(blocks.len() * 3); n_samples];
    let mut snp_features = Vec::with_capacity(blocks.len());

    for (snp, block) in blocks.iter().enumerate() {
        assert_eq!(block.len(), n_samples, "block rows must match samples");
        for (row, values) in feature_matrix.iter_mut().zip(block) {
            row.extend_from_slice(values);
        }
        let base = snp * 3;
        snp_features.push(SnpFeatureRecord {
            chrom: chrom.to_string(),
            pos: (snp as u64 + 1) * 100,
            columns: vec![base, base + 1, base + 2],
        });
    }

    FeatureFile {
        feature_matrix,
        snp_features,
        class_labels: class_labels.iter().map(|s| s.to_string()).collect(),
    }
}

/// 3-column one-hot rows for 1-based categories.
pub fn categories(values: &[u32]) -> Vec<[f64; 3]> {
    values
        .iter()
        .map(|&c| {
            let mut row = [0.0; 3];
            row[(c - 1) as usize] = 1.0;
            row
        })
        .collect()
}

/// Write a work directory and return its guard.
pub fn workdir(encoding: FeatureEncoding, file: &FeatureFile) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_workdir(dir.path(), &ProjectSummary::new(encoding), file).expect("write workdir");
    dir
}

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quality_tools::config::{interpolate, ConfigBuilder, ConfigMerger, ConfigValidator, MapEnv};
use quality_tools::paths::exclusion::{ExclusionSet, MatchCandidates};
use quality_tools::paths::normalize;
use quality_tools::paths::{PathScanner, ToolPathSpec};
use quality_tools::project::VendorDirectory;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("with_dots", |b| {
        b.iter(|| normalize::resolve_components(black_box(Path::new("/a/b/../c/./d"))));
    });

    group.bench_function("to_slash", |b| {
        b.iter(|| normalize::to_slash(black_box(Path::new("/app/vendor/cpsit/package"))));
    });

    group.finish();
}

fn bench_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("config");

    group.bench_function("defaults_build", |b| {
        b.iter(|| ConfigBuilder::new().skip_files().build());
    });

    let sources = ConfigBuilder::new().skip_files().sources().unwrap();
    let merged = ConfigMerger::merge(&sources);
    group.bench_function("validate_defaults", |b| {
        b.iter(|| ConfigValidator::validate(black_box(&merged)));
    });

    let env = MapEnv::new().with("LEVEL", "8");
    let text = "quality-tools:\n  tools:\n    phpstan:\n      level: ${LEVEL:-6}\n      memory_limit: ${MEM:-1G}\n";
    group.bench_function("interpolate", |b| {
        b.iter(|| interpolate(black_box(text), &env));
    });

    group.finish();
}

fn bench_exclusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("exclusion");

    let patterns: Vec<String> = ["var/", "vendor/", "node_modules/", "public/", "**/Tests"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let set = ExclusionSet::compile(&patterns).unwrap();
    let root = Path::new("/app");
    let vendor = Some(Path::new("/app/vendor"));
    let candidates =
        MatchCandidates::for_path(Path::new("/app/packages/site/Classes/Domain"), root, vendor);

    group.bench_function("not_excluded", |b| {
        b.iter(|| set.is_excluded(black_box(&candidates), false));
    });

    group.finish();
}

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    for packages in [10, 100] {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        for i in 0..packages {
            fs::create_dir_all(root.join(format!("packages/pkg-{i}/Classes"))).unwrap();
            fs::create_dir_all(root.join(format!("vendor/cpsit/lib-{i}"))).unwrap();
        }
        let vendor = VendorDirectory::Detected(root.join("vendor"));
        let spec = ToolPathSpec::new(
            vec!["packages/*".into(), "cpsit/*".into()],
            vec!["vendor/".into(), "node_modules/".into()],
            vec!["cpsit/*".into()],
        );

        group.bench_with_input(BenchmarkId::new("uncached", packages), &spec, |b, spec| {
            b.iter(|| PathScanner::new(&root).resolve(spec, &vendor));
        });

        let mut scanner = PathScanner::new(&root);
        group.bench_with_input(BenchmarkId::new("cached", packages), &spec, |b, spec| {
            b.iter(|| scanner.resolve(spec, &vendor));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_config, bench_exclusion, bench_scanner);
criterion_main!(benches);

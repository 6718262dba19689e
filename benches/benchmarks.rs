//! Performance benchmarks for the GKE catalog provider
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

use gke_catalog_provider::{
    catalog::{EntityMutation, StdoutSink},
    gke::{ClusterRecord, ListClustersResponse},
    provider::cluster_to_resource,
    PROVIDER_NAME,
};

fn list_response(cluster_count: usize) -> serde_json::Value {
    let clusters: Vec<_> = (0..cluster_count)
        .map(|i| {
            json!({
                "name": format!("cluster-{}", i),
                "selfLink": format!(
                    "https://container.googleapis.com/v1/projects/bench/locations/us-central1/clusters/cluster-{}",
                    i
                ),
                "location": "us-central1",
                "endpoint": format!("10.0.{}.{}", i / 256, i % 256),
                "masterAuth": { "clusterCaCertificate": "LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0t" },
                "status": "RUNNING",
                "currentNodeCount": 3
            })
        })
        .collect();

    json!({ "clusters": clusters })
}

/// Benchmark parsing a list clusters response body
fn bench_list_response_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_response_parsing");

    for cluster_count in [10, 100, 1000].iter() {
        let body = serde_json::to_string(&list_response(*cluster_count)).unwrap();

        group.throughput(Throughput::Elements(*cluster_count as u64));
        group.bench_with_input(
            BenchmarkId::new("deserialize", cluster_count),
            &body,
            |b, body| {
                b.iter(|| serde_json::from_str::<ListClustersResponse>(black_box(body)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark mapping clusters to catalog entities
fn bench_entity_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_mapping");

    for cluster_count in [10, 100, 1000].iter() {
        let response: ListClustersResponse =
            serde_json::from_value(list_response(*cluster_count)).unwrap();
        let clusters: Vec<ClusterRecord> = response.clusters.into_iter().flatten().collect();

        group.throughput(Throughput::Elements(*cluster_count as u64));
        group.bench_with_input(
            BenchmarkId::new("cluster_to_resource", cluster_count),
            &clusters,
            |b, clusters| {
                b.iter(|| {
                    clusters
                        .iter()
                        .filter_map(|c| cluster_to_resource(PROVIDER_NAME, black_box(c)))
                        .count()
                });
            },
        );
    }

    group.finish();
}

/// Benchmark rendering a full mutation for the catalog
fn bench_mutation_rendering(c: &mut Criterion) {
    let response: ListClustersResponse = serde_json::from_value(list_response(100)).unwrap();
    let entities = response
        .clusters
        .iter()
        .flatten()
        .filter_map(|c| cluster_to_resource(PROVIDER_NAME, c))
        .collect();
    let mutation = EntityMutation::full(entities);

    c.bench_function("mutation_to_json", |b| {
        b.iter(|| serde_json::to_vec(black_box(&mutation)).unwrap());
    });

    c.bench_function("mutation_to_yaml", |b| {
        b.iter(|| StdoutSink::render(PROVIDER_NAME, black_box(&mutation)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_list_response_parsing,
    bench_entity_mapping,
    bench_mutation_rendering,
);

criterion_main!(benches);

#[macro_use]
extern crate criterion;

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use criterion::Criterion;

use flodvakt_core::{EngineConfig, FlowRecord, SlidingWindowEngine};

fn bench_ingest_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_throughput");

    for sources in [1_u32, 256, 65_536] {
        group.throughput(criterion::Throughput::Elements(1));
        group.bench_function(format!("sources_{}", sources), |b| {
            let mut engine = SlidingWindowEngine::new(EngineConfig::default()).unwrap();
            let target = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1));
            let mut tick = 0_u64;
            b.iter(|| {
                let source = IpAddr::V4(Ipv4Addr::from(0x0a00_0000 + (tick as u32 % sources)));
                let flow = FlowRecord::new(Duration::from_millis(tick), source, target)
                    .with_packets(3, 180)
                    .with_packet_size(60);
                tick += 1;
                engine.ingest(&flow)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ingest_throughput);
criterion_main!(benches);

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depot_dispatch::{
    cargo::Cargo, CargoId, CargoService, CityId, CityNetwork, ClientId, ClientRepository,
    CreateCargoRequest, DispatchQueue, Status,
};
use rand::{thread_rng, Rng};

fn random_destinations(count: usize) -> Vec<u32> {
    let mut rng = thread_rng();
    (0..count).map(|_| rng.gen_range(1..=5)).collect()
}

// Enqueue then drain the queue directly against the bootstrap network
pub fn queue_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_queue");
    let network = CityNetwork::bootstrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for size in [100usize, 1_000, 10_000].iter() {
        let destinations = random_destinations(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut queue = DispatchQueue::new();
                for (i, city) in destinations.iter().enumerate() {
                    let cargo = Cargo::new(
                        CargoId(i as u32),
                        date,
                        Status::Processing,
                        ClientId(1),
                        CityId(*city),
                    );
                    queue.add_cargo(&network, cargo.into_shared()).unwrap();
                }

                let mut drained = 0;
                while queue.process_next().is_some() {
                    drained += 1;
                }
                black_box(drained)
            });
        });
    }

    group.finish();
}

// Full create path: city list, queue and ledger under the service lock
pub fn service_benchmark(c: &mut Criterion) {
    let destinations = random_destinations(1_000);

    c.bench_function("service_create_and_dispatch_1000", |b| {
        b.iter(|| {
            let clients = Arc::new(ClientRepository::new());
            clients.register(ClientId(1), "bench", "client").unwrap();
            let service = CargoService::new(CityNetwork::bootstrap(), clients);

            for (i, city) in destinations.iter().enumerate() {
                let day = NaiveDate::from_ymd_opt(2024, 1, 1 + (i % 28) as u32).unwrap();
                let request = CreateCargoRequest::new(
                    CargoId(i as u32),
                    day,
                    Status::Processing,
                    ClientId(1),
                    CityId(*city),
                );
                service.create_cargo(request).unwrap();
            }

            while service.dispatch_next().is_some() {}
            black_box(service.recent_shipments(ClientId(1), 5).unwrap())
        });
    });
}

criterion_group!(benches, queue_benchmark, service_benchmark);
criterion_main!(benches);
